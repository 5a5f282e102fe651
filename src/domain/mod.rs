//! Core domain types and logic.

pub mod ohlcv;
pub mod signal;
pub mod signal_table;
pub mod trailing;
pub mod barrier;
pub mod exit_loop;
pub mod merger;
pub mod returns;
pub mod simulator;
pub mod config;
pub mod config_validation;
pub mod error;
