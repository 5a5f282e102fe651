//! Domain error types.

use crate::domain::signal::Side;

/// Top-level error type for barrier-returns.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("data error at row {row}: {reason}")]
    DataRow { row: usize, reason: String },

    #[error("{side} exit resolution did not converge after {iterations} iterations")]
    NotConverged { side: Side, iterations: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&SimError> for std::process::ExitCode {
    fn from(err: &SimError) -> Self {
        let code: u8 = match err {
            SimError::Io(_) => 1,
            SimError::ConfigParse { .. }
            | SimError::ConfigMissing { .. }
            | SimError::ConfigInvalid { .. } => 2,
            SimError::Data { .. } | SimError::DataRow { .. } => 3,
            SimError::NotConverged { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
