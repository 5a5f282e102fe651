//! Simulation parameters.

pub const DEFAULT_MAX_ITERATIONS: usize = 1000;

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Stop-loss distance as a fraction of the entry level.
    pub stop_loss: f64,
    /// Take-profit distance as a fraction of the entry level.
    pub take_profit: f64,
    /// Fee deducted from every realized return.
    pub fee: f64,
    pub minimum_trades: usize,
    /// Signed slippage added to winners and subtracted from losers.
    pub delay: f64,
    /// Upper bound on exit resolution passes per side.
    pub max_iterations: usize,
}

impl SimulationConfig {
    pub fn new(
        stop_loss: f64,
        take_profit: f64,
        fee: f64,
        minimum_trades: usize,
        delay: f64,
    ) -> Self {
        SimulationConfig {
            stop_loss,
            take_profit,
            fee,
            minimum_trades,
            delay,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// The barrier fractions as `(take_profit, stop_loss)`.
    pub fn barriers(&self) -> (f64, f64) {
        (self.take_profit, self.stop_loss)
    }
}
