//! Take-profit / stop-loss barrier crossing detection.
//!
//! A bar fires only when it is the first one past a barrier: the previous bar
//! must sit strictly inside the barrier (measured against its own trailing
//! level) and the current bar strictly beyond it. Bars lingering past a
//! barrier never fire again.

use crate::domain::ohlcv::PriceBar;
use crate::domain::signal::{Side, SignalStream};

impl Side {
    /// Whether `bar` is the first crossing of either barrier for this side.
    pub fn crosses_barrier(
        self,
        prev: (&PriceBar, f64),
        current: (&PriceBar, f64),
        take_profit: f64,
        stop_loss: f64,
    ) -> bool {
        let (prev_bar, prev_level) = prev;
        let (bar, level) = current;
        match self {
            Side::Long => {
                let take = prev_bar.high_below(prev_level, take_profit)
                    && bar.high_above(level, take_profit);
                let stop =
                    prev_bar.low_above(prev_level, stop_loss) && bar.low_below(level, stop_loss);
                take || stop
            }
            Side::Short => {
                let take = prev_bar.low_above(prev_level, take_profit)
                    && bar.low_below(level, take_profit);
                let stop = prev_bar.high_below(prev_level, stop_loss)
                    && bar.high_above(level, stop_loss);
                take || stop
            }
        }
    }

    /// Write this side's exit code on every first-crossing bar of `stream`,
    /// overwriting whatever the bar held.
    pub fn stamp_exits(
        self,
        bars: &[PriceBar],
        levels: &[Option<f64>],
        take_profit: f64,
        stop_loss: f64,
        stream: &[Option<i8>],
    ) -> SignalStream {
        let mut stamped = stream.to_vec();
        for i in 1..bars.len().min(stamped.len()) {
            let (Some(prev_level), Some(level)) = (levels[i - 1], levels[i]) else {
                continue;
            };
            if self.crosses_barrier(
                (&bars[i - 1], prev_level),
                (&bars[i], level),
                take_profit,
                stop_loss,
            ) {
                stamped[i] = Some(self.exit());
            }
        }
        stamped
    }
}
