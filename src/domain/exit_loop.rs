//! Per-side exit resolution.
//!
//! The barrier for an exit is measured from the trailing entry level, and
//! the trailing level depends on which entries survive earlier exits, so the
//! stream is rebuilt pass after pass until the number of exits settles.

use tracing::debug;

use crate::domain::config::SimulationConfig;
use crate::domain::error::SimError;
use crate::domain::ohlcv::PriceBar;
use crate::domain::signal::{
    Side, SignalStream, collapse_repeats, count_code, entry_markers, forward_fill,
};
use crate::domain::trailing::trailing_levels;

/// The two streams produced by one resolution pass.
#[derive(Debug, Clone, PartialEq)]
pub struct PassOutcome {
    /// Re-stamped stream with repeated values removed.
    pub collapsed: SignalStream,
    /// `collapsed` with original entries put back after closed positions;
    /// this is what the next pass starts from.
    pub restored: SignalStream,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub stream: SignalStream,
    pub iterations: usize,
}

/// Run one pass over `stream`. `entries` holds the side's original entry
/// markers and is only used to refill entries after a closed position.
pub fn resolution_pass(
    bars: &[PriceBar],
    stream: &[Option<i8>],
    entries: &[Option<i8>],
    side: Side,
    take_profit: f64,
    stop_loss: f64,
) -> PassOutcome {
    let levels = trailing_levels(bars, stream, side);
    let cleared: SignalStream = stream
        .iter()
        .map(|v| v.filter(|code| *code != side.exit()))
        .collect();
    let stamped = side.stamp_exits(bars, &levels, take_profit, stop_loss, &cleared);
    let collapsed = collapse_repeats(&stamped);
    let restored = restore_entries(&collapsed, entries, side);
    PassOutcome {
        collapsed,
        restored,
    }
}

/// Put original entries back on bars where the position is already closed.
///
/// A bar qualifies when the last signal at or before it is an exit and the
/// last signal before it is not an entry; such a bar takes the original entry
/// value (or nothing). This recovers entries that collapsing dropped because
/// a re-stamped exit landed on them.
pub fn restore_entries(
    collapsed: &[Option<i8>],
    entries: &[Option<i8>],
    side: Side,
) -> SignalStream {
    let filled = forward_fill(collapsed);
    let mut restored = collapsed.to_vec();
    for i in 0..restored.len() {
        let prev = if i == 0 { None } else { filled[i - 1] };
        if filled[i] == Some(side.exit()) && prev != Some(side.entry()) {
            restored[i] = entries.get(i).copied().flatten();
        }
    }
    restored
}

/// Resolve `signals` (one side's entry markers) into an alternating
/// entry/exit stream.
///
/// Passes run until the exit count entering a pass equals the count entering
/// the pass before it; that pass's collapsed stream is the result. More than
/// `config.max_iterations` passes is reported as [`SimError::NotConverged`].
///
/// The result is not a fixed point in general: the final pass may start
/// from a restored entry inside an open position, measure exits from it and
/// then collapse it away, so resolving the result again can move an exit.
pub fn resolve_exits(
    bars: &[PriceBar],
    signals: &[Option<i8>],
    side: Side,
    config: &SimulationConfig,
) -> Result<Resolution, SimError> {
    let (take_profit, stop_loss) = config.barriers();
    let entries = entry_markers(signals, side);
    let mut current = signals.to_vec();
    let mut settled: Option<usize> = None;

    for iteration in 1..=config.max_iterations {
        let entering = count_code(&current, side.exit());
        let pass = resolution_pass(bars, &current, &entries, side, take_profit, stop_loss);
        debug!(
            %side,
            iteration,
            exits = count_code(&pass.collapsed, side.exit()),
            "exit resolution pass"
        );

        if settled == Some(entering) {
            return Ok(Resolution {
                stream: pass.collapsed,
                iterations: iteration,
            });
        }
        settled = Some(entering);
        current = pass.restored;
    }

    Err(SimError::NotConverged {
        side,
        iterations: config.max_iterations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::signal::is_alternating;
    use chrono::NaiveDate;

    fn bars(closes: &[f64]) -> Vec<PriceBar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, c)| PriceBar {
                date: start + chrono::Duration::days(i as i64),
                high: c + 0.5,
                low: c - 0.5,
                close: *c,
            })
            .collect()
    }

    fn config() -> SimulationConfig {
        SimulationConfig::new(0.03, 0.02, 0.001, 0, 0.0)
    }

    #[test]
    fn single_entry_take_profit() {
        let b = bars(&[100.0, 101.0, 103.0, 97.0, 100.0]);
        let signals = vec![Some(-1), None, None, None, None];
        let res = resolve_exits(&b, &signals, Side::Long, &config()).unwrap();
        assert_eq!(res.stream, vec![Some(-1), None, Some(1), None, None]);
    }

    #[test]
    fn entries_while_open_are_dropped() {
        let b = bars(&[100.0, 100.5, 103.0, 101.0, 101.0, 104.0]);
        let signals = vec![Some(-1), Some(-1), None, Some(-1), None, None];
        let res = resolve_exits(&b, &signals, Side::Long, &config()).unwrap();
        assert_eq!(
            res.stream,
            vec![Some(-1), None, Some(1), Some(-1), None, Some(1)]
        );
        assert!(is_alternating(&res.stream));
        assert_eq!(res.iterations, 3);
    }

    #[test]
    fn no_exit_when_no_barrier_is_touched() {
        let b = bars(&[100.0, 100.5, 101.0, 100.0]);
        let signals = vec![Some(-2), None, Some(-2), None];
        let res = resolve_exits(&b, &signals, Side::Short, &config()).unwrap();
        assert_eq!(res.stream, vec![Some(-2), None, None, None]);
    }

    #[test]
    fn empty_input() {
        let res = resolve_exits(&[], &[], Side::Long, &config()).unwrap();
        assert!(res.stream.is_empty());
    }

    #[test]
    fn rerunning_on_converged_output_is_stable() {
        let b = bars(&[100.0, 100.5, 103.0, 101.0, 101.0, 104.0]);
        let signals = vec![Some(-1), Some(-1), None, Some(-1), None, None];
        let first = resolve_exits(&b, &signals, Side::Long, &config()).unwrap();
        let second = resolve_exits(&b, &first.stream, Side::Long, &config()).unwrap();
        assert_eq!(first.stream, second.stream);
    }

    #[test]
    fn rerun_can_move_exit_measured_from_dropped_entry() {
        let b = bars(&[100.0, 97.0, 97.0, 94.0, 97.0]);
        let signals = vec![Some(-1), Some(-1), Some(-1), Some(-1), None];

        let first = resolve_exits(&b, &signals, Side::Long, &config()).unwrap();
        // Exit on bar 4 is measured from the entry on bar 3, which the
        // collapsed result no longer holds.
        assert_eq!(
            first.stream,
            vec![Some(-1), Some(1), Some(-1), None, Some(1)]
        );

        let second = resolve_exits(&b, &first.stream, Side::Long, &config()).unwrap();
        assert_eq!(
            second.stream,
            vec![Some(-1), Some(1), Some(-1), Some(1), None]
        );
    }

    #[test]
    fn iteration_bound_reports_non_convergence() {
        let b = bars(&[100.0, 101.0, 103.0]);
        let cfg = SimulationConfig {
            max_iterations: 1,
            ..config()
        };
        let err = resolve_exits(&b, &[Some(-1), None, None], Side::Long, &cfg).unwrap_err();
        assert!(matches!(
            err,
            SimError::NotConverged {
                side: Side::Long,
                iterations: 1
            }
        ));
    }

    #[test]
    fn restore_refills_entries_after_closed_positions() {
        let entries = vec![Some(-1), None, None, Some(-1), None];
        let collapsed = vec![Some(-1), Some(1), None, None, None];
        assert_eq!(
            restore_entries(&collapsed, &entries, Side::Long),
            vec![Some(-1), Some(1), None, Some(-1), None]
        );
    }

    #[test]
    fn restore_leaves_open_positions_alone() {
        let entries = vec![Some(-1), Some(-1), None];
        let collapsed = vec![Some(-1), None, None];
        assert_eq!(
            restore_entries(&collapsed, &entries, Side::Long),
            collapsed
        );
    }

    #[test]
    fn pass_clears_stale_exits() {
        let b = bars(&[100.0, 100.0, 100.0]);
        let stream = vec![Some(-1), Some(1), None];
        let entries = vec![Some(-1), None, None];
        let pass = resolution_pass(&b, &stream, &entries, Side::Long, 0.02, 0.03);
        assert_eq!(pass.collapsed, vec![Some(-1), None, None]);
        assert_eq!(pass.restored, pass.collapsed);
    }
}
