//! Price bar representation.

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl PriceBar {
    /// level * (1 + fraction)
    pub fn upper_barrier(level: f64, fraction: f64) -> f64 {
        level * (1.0 + fraction)
    }

    /// level * (1 - fraction)
    pub fn lower_barrier(level: f64, fraction: f64) -> f64 {
        level * (1.0 - fraction)
    }

    pub fn high_above(&self, level: f64, fraction: f64) -> bool {
        self.high > Self::upper_barrier(level, fraction)
    }

    pub fn high_below(&self, level: f64, fraction: f64) -> bool {
        self.high < Self::upper_barrier(level, fraction)
    }

    pub fn low_below(&self, level: f64, fraction: f64) -> bool {
        self.low < Self::lower_barrier(level, fraction)
    }

    pub fn low_above(&self, level: f64, fraction: f64) -> bool {
        self.low > Self::lower_barrier(level, fraction)
    }
}
