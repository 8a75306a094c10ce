//! WASM bindings for core-runtime
//!
//! Exposes logging setup and the bridge deployment configuration to JavaScript.

use crate::config::{BridgeConfig, EntryPointNames};
use crate::logging::{init_logging, LogLevel, LoggingConfig};
use std::time::Duration;
use wasm_bindgen::prelude::*;

fn to_js_error<E: std::fmt::Display>(err: E) -> JsValue {
    JsValue::from_str(&err.to_string())
}

// =============================================================================
// Logging
// =============================================================================

/// JavaScript-accessible logging configuration
#[wasm_bindgen]
#[derive(Clone)]
pub struct JsLoggingConfig {
    inner: LoggingConfig,
}

#[wasm_bindgen]
impl JsLoggingConfig {
    /// Create a new logging configuration with defaults
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: LoggingConfig::default(),
        }
    }

    /// Set minimum log level (0 = Trace, 1 = Debug, 2 = Info, 3 = Warn, 4 = Error)
    #[wasm_bindgen(js_name = setLevel)]
    pub fn set_level(&mut self, level: u8) {
        self.inner.level = match level {
            0 => LogLevel::Trace,
            1 => LogLevel::Debug,
            3 => LogLevel::Warn,
            4 => LogLevel::Error,
            _ => LogLevel::Info,
        };
    }
}

impl Default for JsLoggingConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Initialize logging system
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging_js(config: JsLoggingConfig) -> Result<(), JsValue> {
    init_logging(config.inner).map_err(to_js_error)
}

// =============================================================================
// Bridge configuration
// =============================================================================

/// JavaScript-accessible bridge deployment configuration.
///
/// ```javascript
/// const config = new JsBridgeConfig();
/// config.setModulePath('/static/wasmfetch.wasm');
/// ```
#[wasm_bindgen]
#[derive(Clone)]
pub struct JsBridgeConfig {
    inner: BridgeConfig,
}

impl JsBridgeConfig {
    /// Validate and return the inner configuration (for other crates to use)
    pub fn into_inner(self) -> crate::Result<BridgeConfig> {
        self.inner.validate()?;
        Ok(self.inner)
    }
}

#[wasm_bindgen]
impl JsBridgeConfig {
    /// Create a configuration for the default deployment
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: BridgeConfig::default(),
        }
    }

    #[wasm_bindgen(js_name = setShimScriptPath)]
    pub fn set_shim_script_path(&mut self, path: String) {
        self.inner.shim_script_path = path;
    }

    #[wasm_bindgen(js_name = setModulePath)]
    pub fn set_module_path(&mut self, path: String) {
        self.inner.module_path = path;
    }

    #[wasm_bindgen(js_name = setPollIntervalMs)]
    pub fn set_poll_interval_ms(&mut self, millis: u32) {
        self.inner.poll_interval = Duration::from_millis(u64::from(millis));
    }

    /// Override the three global entry point names at once
    #[wasm_bindgen(js_name = setEntryPoints)]
    pub fn set_entry_points(
        &mut self,
        process_json: String,
        extract_fields: String,
        make_request: String,
    ) {
        self.inner.entry_points = EntryPointNames {
            process_json,
            extract_fields,
            make_request,
        };
    }
}

impl Default for JsBridgeConfig {
    fn default() -> Self {
        Self::new()
    }
}
