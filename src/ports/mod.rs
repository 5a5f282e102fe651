//! Port traits decoupling the domain from concrete I/O.

pub mod config_port;
pub mod data_port;
