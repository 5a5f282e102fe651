//! CSV price/signal table adapter and returns writer.
//!
//! Input columns are located by header name: `date`, `high`, `low`,
//! `close`, `long_entries`, `short_entries`. Empty signal cells are gaps.

use crate::domain::error::SimError;
use crate::domain::ohlcv::PriceBar;
use crate::domain::returns::RealizedReturn;
use crate::domain::signal_table::SignalTable;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

const COLUMNS: [&str; 6] = ["date", "high", "low", "close", "long_entries", "short_entries"];

pub struct CsvAdapter {
    path: PathBuf,
}

impl CsvAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl DataPort for CsvAdapter {
    fn load_table(&self) -> Result<SignalTable, SimError> {
        let content = fs::read_to_string(&self.path).map_err(|e| SimError::Data {
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })?;
        parse_table(&content)
    }
}

type Row = (PriceBar, Option<i8>, Option<i8>);

pub fn parse_table(content: &str) -> Result<SignalTable, SimError> {
    let mut rdr = csv::Reader::from_reader(content.as_bytes());
    let headers = rdr.headers().map_err(|e| SimError::Data {
        reason: format!("CSV header error: {}", e),
    })?;

    let mut index = [0usize; 6];
    for (slot, name) in index.iter_mut().zip(COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
            .ok_or_else(|| SimError::Data {
                reason: format!("missing {} column", name),
            })?;
    }
    let [date_col, high_col, low_col, close_col, long_col, short_col] = index;

    let mut rows: Vec<Row> = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        let record = result.map_err(|e| SimError::DataRow {
            row,
            reason: format!("CSV parse error: {}", e),
        })?;
        let field = |col: usize| record.get(col).map(str::trim).unwrap_or("");

        let date = NaiveDate::parse_from_str(field(date_col), "%Y-%m-%d").map_err(|e| {
            SimError::DataRow {
                row,
                reason: format!("invalid date: {}", e),
            }
        })?;
        let bar = PriceBar {
            date,
            high: parse_price(field(high_col), "high", row)?,
            low: parse_price(field(low_col), "low", row)?,
            close: parse_price(field(close_col), "close", row)?,
        };
        let long = parse_signal(field(long_col), "long_entries", row)?;
        let short = parse_signal(field(short_col), "short_entries", row)?;
        rows.push((bar, long, short));
    }

    rows.sort_by_key(|(bar, _, _)| bar.date);

    let mut bars = Vec::with_capacity(rows.len());
    let mut long_entries = Vec::with_capacity(rows.len());
    let mut short_entries = Vec::with_capacity(rows.len());
    for (bar, long, short) in rows {
        bars.push(bar);
        long_entries.push(long);
        short_entries.push(short);
    }
    SignalTable::new(bars, long_entries, short_entries)
}

fn parse_price(value: &str, column: &str, row: usize) -> Result<f64, SimError> {
    value.parse().map_err(|e| SimError::DataRow {
        row,
        reason: format!("invalid {} value: {}", column, e),
    })
}

/// Empty cells and `NaN` are gaps; `-1` and `-1.0` are both accepted.
fn parse_signal(value: &str, column: &str, row: usize) -> Result<Option<i8>, SimError> {
    if value.is_empty() || value.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    let number: f64 = value.parse().map_err(|e| SimError::DataRow {
        row,
        reason: format!("invalid {} value: {}", column, e),
    })?;
    if number.fract() != 0.0 || number.abs() > f64::from(i8::MAX) {
        return Err(SimError::DataRow {
            row,
            reason: format!("invalid {} code: {}", column, value),
        });
    }
    Ok(Some(number as i8))
}

/// Write returns as `date,side,return` rows.
pub fn write_returns<W: Write>(writer: W, returns: &[RealizedReturn]) -> Result<(), SimError> {
    let mut wtr = csv::Writer::from_writer(writer);
    let to_err = |e: csv::Error| SimError::Data {
        reason: format!("CSV write error: {}", e),
    };

    wtr.write_record(["date", "side", "return"]).map_err(to_err)?;
    for r in returns {
        wtr.write_record([
            r.date.format("%Y-%m-%d").to_string(),
            r.side.to_string(),
            r.value.to_string(),
        ])
        .map_err(to_err)?;
    }
    wtr.flush()?;
    Ok(())
}
