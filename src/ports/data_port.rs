//! Data access port trait.

use crate::domain::error::SimError;
use crate::domain::signal_table::SignalTable;

pub trait DataPort {
    /// Load bars and both entry streams, ordered by date.
    fn load_table(&self) -> Result<SignalTable, SimError>;
}
