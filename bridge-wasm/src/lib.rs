//! WebAssembly Bridge Implementations
//!
//! Browser implementations of the `bridge-traits` seams the WasmFetch bridge
//! boots through, built on `web-sys`, `js-sys` and `wasm-bindgen`.
//!
//! # Platform Support
//!
//! This crate is designed exclusively for the `wasm32-unknown-unknown` target.
//! It will not compile for native targets.
//!
//! # Implementations
//!
//! - `DocumentScriptHost`: `<script>` injection into the page head
//! - `WasmHttpClient`: `fetch`-backed client used to download the module binary
//! - `GoRuntime`: the `Go` class defined by the `wasm_exec.js` shim
//! - `GlobalCapabilityRegistry`: reads the entry points the module sets on the
//!   global object
//!
//! # Examples
//!
//! ```ignore
//! use bridge_wasm::build_browser_components;
//! use core_runtime::config::BridgeConfig;
//!
//! let components = build_browser_components(&BridgeConfig::default())?;
//! ```

#![cfg(target_arch = "wasm32")]
#![warn(missing_docs)]

pub mod bootstrap;
pub mod error;
pub mod http;
pub mod registry;
pub mod runtime;
pub mod script;

// Re-export commonly used types
pub use bootstrap::{build_browser_components, BrowserComponents};
pub use error::{js_error, WasmError};
pub use http::WasmHttpClient;
pub use registry::GlobalCapabilityRegistry;
pub use runtime::GoRuntime;
pub use script::DocumentScriptHost;
