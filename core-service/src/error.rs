use bridge_traits::BridgeError;
use core_bootstrap::{BootstrapError, ReadinessError};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("WasmFetch configuration rejected: {0}")]
    Config(#[from] core_runtime::Error),

    /// The shared initialization failed. Every call on the context sees the
    /// same cause.
    #[error("WasmFetch initialization failed: {0}")]
    Init(#[from] BootstrapError),

    #[error("WasmFetch readiness wait aborted: {0}")]
    Readiness(#[from] ReadinessError),

    /// A delegated call failed. Only that call is affected.
    #[error("WasmFetch call failed: {0}")]
    Call(#[from] BridgeError),
}

pub type Result<T> = std::result::Result<T, Error>;
