//! Realized returns of a resolved trade stream.

use chrono::NaiveDate;

use crate::domain::config::SimulationConfig;
use crate::domain::ohlcv::PriceBar;
use crate::domain::signal::Side;

/// Return realized by one completed entry/exit pair.
#[derive(Debug, Clone, PartialEq)]
pub struct RealizedReturn {
    /// Date of the exit bar.
    pub date: NaiveDate,
    /// Side owning the exit code.
    pub side: Side,
    pub value: f64,
}

/// Return of an exit bar measured against the close of the preceding trade
/// record.
///
/// Long: high above `entry_close * (1 + take_profit)` pays
/// `take_profit - fee + delay`, otherwise low below
/// `entry_close * (1 - stop_loss)` pays `-stop_loss - fee - delay`.
/// Short: high above `entry_close * (1 + stop_loss)` pays
/// `stop_loss - fee + delay`, otherwise low below
/// `entry_close * (1 - take_profit)` pays `-take_profit - fee - delay`.
/// `None` when neither barrier is beyond the bar's range.
pub fn exit_return(
    side: Side,
    bar: &PriceBar,
    entry_close: f64,
    config: &SimulationConfig,
) -> Option<f64> {
    let SimulationConfig {
        stop_loss,
        take_profit,
        fee,
        delay,
        ..
    } = *config;
    let (up, down) = match side {
        Side::Long => (take_profit, stop_loss),
        Side::Short => (stop_loss, take_profit),
    };

    if bar.high_above(entry_close, up) {
        Some(up - fee + delay)
    } else if bar.low_below(entry_close, down) {
        Some(-down - fee - delay)
    } else {
        None
    }
}

/// Compute returns from a resolved trade stream.
///
/// Only bars holding a trade value are kept. Every second record (the
/// second, fourth, ...) is an exit when the stream alternates; exit records
/// with a return are emitted in order. Records past the end of `bars` are
/// ignored.
pub fn compute_returns(
    bars: &[PriceBar],
    trade: &[Option<i8>],
    config: &SimulationConfig,
) -> Vec<RealizedReturn> {
    let records: Vec<(usize, i8)> = trade
        .iter()
        .enumerate()
        .take(bars.len())
        .filter_map(|(i, v)| v.map(|code| (i, code)))
        .collect();

    records
        .windows(2)
        .step_by(2)
        .filter_map(|pair| {
            let (entry_idx, _) = pair[0];
            let (exit_idx, code) = pair[1];
            if code <= 0 {
                return None;
            }
            let side = Side::of_code(code)?;
            let bar = &bars[exit_idx];
            exit_return(side, bar, bars[entry_idx].close, config).map(|value| RealizedReturn {
                date: bar.date,
                side,
                value,
            })
        })
        .collect()
}
