//! Error types for WebAssembly bridge implementations

use bridge_traits::error::BridgeError;
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};

/// Errors that can occur in WebAssembly bridge implementations
#[derive(Error, Debug)]
pub enum WasmError {
    /// Value could not be converted between JS and Rust
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_wasm_bindgen::Error),
}

impl From<WasmError> for BridgeError {
    fn from(err: WasmError) -> Self {
        BridgeError::OperationFailed(err.to_string())
    }
}

/// Best-effort message for a thrown JS value.
pub(crate) fn js_message(value: &JsValue) -> String {
    if let Some(message) = value.as_string() {
        message
    } else if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        error.message().into()
    } else {
        format!("{value:?}")
    }
}

/// Converts a thrown JS value into a [`BridgeError`], prefixed with what was
/// being attempted.
pub fn js_error(context: &str, err: JsValue) -> BridgeError {
    BridgeError::OperationFailed(format!("{context}: {}", js_message(&err)))
}
