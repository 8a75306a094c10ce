//! # Core Runtime Module
//!
//! Foundational runtime infrastructure shared by the bridge crates:
//! - Logging and tracing setup
//! - Deployment configuration (resource paths, entry point names, poll interval)
//!
//! On `wasm32` the [`wasm`] module exposes both to JavaScript.

pub mod config;
pub mod error;
pub mod logging;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use config::{BridgeConfig, BridgeConfigBuilder, EntryPointNames};
pub use error::{Error, Result};
