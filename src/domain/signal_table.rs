//! Price bars paired with the two per-side entry streams.

use crate::domain::error::SimError;
use crate::domain::ohlcv::PriceBar;
use crate::domain::signal::{LONG_ENTRY, SHORT_ENTRY, Side, SignalStream, count_code};

#[derive(Debug, Clone, PartialEq)]
pub struct SignalTable {
    pub bars: Vec<PriceBar>,
    pub long_entries: SignalStream,
    pub short_entries: SignalStream,
}

impl SignalTable {
    /// Build a table, checking that every column has one value per bar and
    /// that each stream only carries its own side's entry code.
    pub fn new(
        bars: Vec<PriceBar>,
        long_entries: SignalStream,
        short_entries: SignalStream,
    ) -> Result<Self, SimError> {
        if long_entries.len() != bars.len() || short_entries.len() != bars.len() {
            return Err(SimError::Data {
                reason: format!(
                    "column length mismatch: {} bars, {} long signals, {} short signals",
                    bars.len(),
                    long_entries.len(),
                    short_entries.len()
                ),
            });
        }
        check_entries(&long_entries, LONG_ENTRY, "long_entries")?;
        check_entries(&short_entries, SHORT_ENTRY, "short_entries")?;
        Ok(Self {
            bars,
            long_entries,
            short_entries,
        })
    }

    pub fn bar_count(&self) -> usize {
        self.bars.len()
    }

    pub fn entries(&self, side: Side) -> &[Option<i8>] {
        match side {
            Side::Long => &self.long_entries,
            Side::Short => &self.short_entries,
        }
    }

    pub fn entry_count(&self, side: Side) -> usize {
        count_code(self.entries(side), side.entry())
    }
}

fn check_entries(stream: &[Option<i8>], expected: i8, column: &str) -> Result<(), SimError> {
    match stream
        .iter()
        .enumerate()
        .find(|(_, v)| matches!(v, Some(code) if *code != expected))
    {
        Some((row, Some(code))) => Err(SimError::DataRow {
            row,
            reason: format!("{column} may only contain {expected}, found {code}"),
        }),
        _ => Ok(()),
    }
}
