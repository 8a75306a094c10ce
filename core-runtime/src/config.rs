//! # Bridge Configuration Module
//!
//! Deployment constants for the WasmFetch bridge.
//!
//! ## Overview
//!
//! The shim script and module binary live at fixed paths decided when the
//! page is deployed; callers of the bridge operations never choose them. The
//! same holds for the global names the module publishes and the interval at
//! which readiness is sampled. [`BridgeConfig::default`] carries the standard
//! deployment; hosts with a different layout build one with
//! [`BridgeConfig::builder`], which validates every field.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::BridgeConfig;
//! use std::time::Duration;
//!
//! let config = BridgeConfig::builder()
//!     .module_path("/static/wasmfetch.wasm")
//!     .poll_interval(Duration::from_millis(50))
//!     .build()
//!     .expect("valid bridge config");
//! ```

use crate::error::{Error, Result};
use std::time::Duration;

/// Path of the startup shim script injected into the page.
pub const DEFAULT_SHIM_SCRIPT_PATH: &str = "/wasm_exec.js";

/// Path of the precompiled module binary.
pub const DEFAULT_MODULE_PATH: &str = "/wasmfetch.wasm";

/// Interval between readiness samples.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Global name of the JSON-normalization entry point.
pub const DEFAULT_PROCESS_JSON_EXPORT: &str = "goProcessJSON";

/// Global name of the field-extraction entry point.
pub const DEFAULT_EXTRACT_FIELDS_EXPORT: &str = "goExtractFields";

/// Global name of the network-request entry point.
pub const DEFAULT_MAKE_REQUEST_EXPORT: &str = "goMakeRequest";

/// Names under which the running module publishes its entry points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPointNames {
    pub process_json: String,
    pub extract_fields: String,
    pub make_request: String,
}

impl Default for EntryPointNames {
    fn default() -> Self {
        Self {
            process_json: DEFAULT_PROCESS_JSON_EXPORT.to_string(),
            extract_fields: DEFAULT_EXTRACT_FIELDS_EXPORT.to_string(),
            make_request: DEFAULT_MAKE_REQUEST_EXPORT.to_string(),
        }
    }
}

impl EntryPointNames {
    /// All three names, in a fixed order.
    pub fn all(&self) -> [&str; 3] {
        [&self.process_json, &self.extract_fields, &self.make_request]
    }
}

/// Bridge configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Startup shim injected before the module is instantiated.
    pub shim_script_path: String,
    /// Location of the module binary.
    pub module_path: String,
    /// Interval between readiness samples.
    pub poll_interval: Duration,
    /// Global names of the module's entry points.
    pub entry_points: EntryPointNames,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            shim_script_path: DEFAULT_SHIM_SCRIPT_PATH.to_string(),
            module_path: DEFAULT_MODULE_PATH.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            entry_points: EntryPointNames::default(),
        }
    }
}

impl BridgeConfig {
    /// Creates a builder seeded with the default deployment.
    pub fn builder() -> BridgeConfigBuilder {
        BridgeConfigBuilder::default()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for an empty path or entry point name, a
    /// zero poll interval, or two entry points sharing one name.
    pub fn validate(&self) -> Result<()> {
        if self.shim_script_path.trim().is_empty() {
            return Err(Error::Config(
                "Shim script path cannot be empty".to_string(),
            ));
        }

        if self.module_path.trim().is_empty() {
            return Err(Error::Config("Module path cannot be empty".to_string()));
        }

        if self.poll_interval.is_zero() {
            return Err(Error::Config(
                "Poll interval must be greater than zero".to_string(),
            ));
        }

        let names = self.entry_points.all();
        if names.iter().any(|name| name.trim().is_empty()) {
            return Err(Error::Config(
                "Entry point names cannot be empty".to_string(),
            ));
        }
        if names[0] == names[1] || names[0] == names[2] || names[1] == names[2] {
            return Err(Error::Config(format!(
                "Entry point names must be distinct, got {:?}",
                names
            )));
        }

        Ok(())
    }
}

/// Builder for [`BridgeConfig`].
#[derive(Debug, Default)]
pub struct BridgeConfigBuilder {
    config: BridgeConfig,
}

impl BridgeConfigBuilder {
    /// Sets the startup shim path.
    pub fn shim_script_path(mut self, path: impl Into<String>) -> Self {
        self.config.shim_script_path = path.into();
        self
    }

    /// Sets the module binary path.
    pub fn module_path(mut self, path: impl Into<String>) -> Self {
        self.config.module_path = path.into();
        self
    }

    /// Sets the readiness sampling interval.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval = interval;
        self
    }

    /// Sets the global entry point names.
    pub fn entry_points(mut self, names: EntryPointNames) -> Self {
        self.config.entry_points = names;
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// See [`BridgeConfig::validate`].
    pub fn build(self) -> Result<BridgeConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_deployment() {
        let config = BridgeConfig::default();
        assert_eq!(config.shim_script_path, "/wasm_exec.js");
        assert_eq!(config.module_path, "/wasmfetch.wasm");
        assert_eq!(config.poll_interval, Duration::from_millis(100));
        assert_eq!(
            config.entry_points.all(),
            ["goProcessJSON", "goExtractFields", "goMakeRequest"]
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_overrides() {
        let config = BridgeConfig::builder()
            .shim_script_path("/static/wasm_exec.js")
            .module_path("/static/wasmfetch.wasm")
            .poll_interval(Duration::from_millis(25))
            .build()
            .unwrap();

        assert_eq!(config.shim_script_path, "/static/wasm_exec.js");
        assert_eq!(config.module_path, "/static/wasmfetch.wasm");
        assert_eq!(config.poll_interval, Duration::from_millis(25));
    }

    #[test]
    fn test_empty_module_path_rejected() {
        let result = BridgeConfig::builder().module_path("  ").build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let result = BridgeConfig::builder()
            .poll_interval(Duration::ZERO)
            .build();
        let message = result.unwrap_err().to_string();
        assert!(message.contains("Poll interval"));
    }

    #[test]
    fn test_duplicate_entry_points_rejected() {
        let names = EntryPointNames {
            process_json: "goRun".to_string(),
            extract_fields: "goRun".to_string(),
            make_request: "goMakeRequest".to_string(),
        };
        let result = BridgeConfig::builder().entry_points(names).build();
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
