//! # Host Bridge Traits
//!
//! Platform abstraction traits between the bootstrap core and the hosting page.
//!
//! ## Overview
//!
//! The bootstrap state machine in `core-bootstrap` never touches browser APIs
//! directly. Everything it needs from the page (the document, `fetch`, the
//! startup shim, the running module) is reached through the traits below.
//! `bridge-wasm` implements them with `web-sys`; tests implement them with
//! in-memory fakes and `mockall`.
//!
//! ## Traits
//!
//! ### Page & Network
//! - [`ScriptHost`](script::ScriptHost) - Script element lookup and injection
//! - [`HttpClient`](http::HttpClient) - Retrieval of the module binary
//!
//! ### External Module
//! - [`ModuleRuntime`](module::ModuleRuntime) - Shim execution environment
//! - [`ModuleEnvironment`](module::ModuleEnvironment) - Instantiation
//! - [`ModuleInstance`](module::ModuleInstance) - Fire-and-forget start
//! - [`CapabilityRegistry`](module::CapabilityRegistry) - Published entry points
//! - [`JsonProcessor`](module::JsonProcessor), [`FieldExtractor`](module::FieldExtractor),
//!   [`RequestExecutor`](module::RequestExecutor) - The entry points themselves
//!
//! ## Threading
//!
//! All traits use `#[async_trait(?Send)]` and are shared through `Rc`. The
//! bridge lives on one event loop and never crosses threads.
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Implementations
//! convert platform errors into it with actionable messages; errors reported by
//! the module itself use [`BridgeError::Module`](error::BridgeError::Module).

pub mod error;
pub mod http;
pub mod module;
pub mod script;

pub use error::BridgeError;

// Re-export commonly used types
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RequestConfig};
pub use module::{
    module_error_message, CapabilityRegistry, CapabilitySet, FieldExtractor, JsonProcessor,
    ModuleEnvironment, ModuleInstance, ModuleResponse, ModuleRuntime, RequestExecutor,
};
pub use script::ScriptHost;
