use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    #[error("Bridge capability not available: {0}")]
    NotAvailable(String),

    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),

    /// Error reported by an entry point of the external module itself.
    #[error("External module error: {0}")]
    Module(String),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
