//! Trailing entry level: the close of the most recent entry bar, held until
//! the next entry.

use crate::domain::ohlcv::PriceBar;
use crate::domain::signal::Side;

pub fn trailing_levels(bars: &[PriceBar], stream: &[Option<i8>], side: Side) -> Vec<Option<f64>> {
    let mut level = None;
    bars.iter()
        .zip(stream)
        .map(|(bar, signal)| {
            if *signal == Some(side.entry()) {
                level = Some(bar.close);
            }
            level
        })
        .collect()
}
