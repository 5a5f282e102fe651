//! Trade resolution and return orchestration.
//!
//! Decides which sides have enough entries to trade, resolves their exits,
//! merges the two sides when both trade, and turns the resulting stream into
//! realized returns.

use tracing::{info, warn};

use crate::domain::config::SimulationConfig;
use crate::domain::error::SimError;
use crate::domain::exit_loop::resolve_exits;
use crate::domain::merger::merge_streams;
use crate::domain::ohlcv::PriceBar;
use crate::domain::returns::{RealizedReturn, compute_returns};
use crate::domain::signal::{Side, SignalStream, count_code, first_entry};
use crate::domain::signal_table::SignalTable;

/// Which sides get resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionPlan {
    /// Not enough entries; the result is empty.
    Skip,
    Single(Side),
    /// Both sides trade; `primary` entered first and takes precedence.
    Merged { primary: Side },
}

/// A side trades when it has more than two entries and
/// `count > minimum_trades * count / total`.
pub fn side_qualifies(count: usize, total: usize, minimum_trades: usize) -> bool {
    if count <= 2 || total == 0 {
        return false;
    }
    count as f64 > minimum_trades as f64 * count as f64 / total as f64
}

pub fn plan_resolution(
    long_entries: &[Option<i8>],
    short_entries: &[Option<i8>],
    minimum_trades: usize,
) -> ResolutionPlan {
    let long_count = count_code(long_entries, Side::Long.entry());
    let short_count = count_code(short_entries, Side::Short.entry());
    let total = long_count + short_count;

    if total < 2 || total < minimum_trades {
        return ResolutionPlan::Skip;
    }

    let long_ok = side_qualifies(long_count, total, minimum_trades);
    let short_ok = side_qualifies(short_count, total, minimum_trades);

    match (long_ok, short_ok) {
        (true, true) => {
            let primary = match (
                first_entry(long_entries, Side::Long),
                first_entry(short_entries, Side::Short),
            ) {
                (Some(l), Some(s)) if s < l => Side::Short,
                _ => Side::Long,
            };
            ResolutionPlan::Merged { primary }
        }
        (true, false) => ResolutionPlan::Single(Side::Long),
        (false, true) => ResolutionPlan::Single(Side::Short),
        (false, false) => ResolutionPlan::Skip,
    }
}

/// Resolve the merged trade stream, or `None` when no side qualifies.
pub fn resolve_trades(
    bars: &[PriceBar],
    long_entries: &[Option<i8>],
    short_entries: &[Option<i8>],
    config: &SimulationConfig,
) -> Result<Option<SignalStream>, SimError> {
    let entries = |side: Side| match side {
        Side::Long => long_entries,
        Side::Short => short_entries,
    };

    let plan = plan_resolution(long_entries, short_entries, config.minimum_trades);
    info!(?plan, bars = bars.len(), "resolution plan");

    let trade = match plan {
        ResolutionPlan::Skip => return Ok(None),
        ResolutionPlan::Single(side) => resolve_exits(bars, entries(side), side, config)?.stream,
        ResolutionPlan::Merged { primary } => {
            let secondary = primary.opposite();
            let primary_stream = resolve_exits(bars, entries(primary), primary, config)?.stream;
            let secondary_stream =
                resolve_exits(bars, entries(secondary), secondary, config)?.stream;
            merge_streams(&primary_stream, &secondary_stream, primary)
        }
    };
    Ok(Some(trade))
}

/// Realized returns for the given bars and entry streams.
///
/// An empty result means the entries were insufficient or no side
/// qualified; it is not an error.
pub fn simulate(
    bars: &[PriceBar],
    long_entries: &[Option<i8>],
    short_entries: &[Option<i8>],
    config: &SimulationConfig,
) -> Result<Vec<RealizedReturn>, SimError> {
    if long_entries.len() != bars.len() || short_entries.len() != bars.len() {
        return Err(SimError::Data {
            reason: format!(
                "signal streams must match {} bars (long {}, short {})",
                bars.len(),
                long_entries.len(),
                short_entries.len()
            ),
        });
    }

    let Some(trade) = resolve_trades(bars, long_entries, short_entries, config)? else {
        warn!("insufficient or ineligible entries, no returns computed");
        return Ok(Vec::new());
    };

    let returns = compute_returns(bars, &trade, config);
    info!(trades = returns.len(), "returns computed");
    Ok(returns)
}

pub fn simulate_table(
    table: &SignalTable,
    config: &SimulationConfig,
) -> Result<Vec<RealizedReturn>, SimError> {
    simulate(
        &table.bars,
        &table.long_entries,
        &table.short_entries,
        config,
    )
}
