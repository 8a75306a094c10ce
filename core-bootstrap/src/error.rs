use std::time::Duration;
use thiserror::Error;

/// Failure of the one-time bootstrap sequence.
///
/// `Clone` because a single failure is handed to every caller of the bridge.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BootstrapError {
    #[error("Failed to load script {url}: {message}")]
    ScriptLoad { url: String, message: String },

    #[error("Failed to fetch module {path}: {message}")]
    Fetch { path: String, message: String },

    #[error("Failed to instantiate module: {0}")]
    Instantiation(String),
}

/// Failure of a bounded readiness wait. The unbounded wait has no failure path.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessError {
    #[error("Module entry points not ready within {0:?}")]
    TimedOut(Duration),

    #[error("Readiness wait cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, BootstrapError>;
