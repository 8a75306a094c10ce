//! External Module Abstraction
//!
//! Contract between the bridge and the precompiled module it boots:
//!
//! 1. [`ModuleRuntime`] builds the execution environment the startup shim
//!    provides (for a Go build, `new Go()`).
//! 2. [`ModuleEnvironment::instantiate`] turns the fetched bytes into a
//!    [`ModuleInstance`].
//! 3. [`ModuleInstance::start`] starts it running and hands back the
//!    [`CapabilityRegistry`] the module publishes its entry points into.
//!    Starting does not imply the entry points exist yet.
//! 4. The registry yields a [`CapabilitySet`] once all three entry points are
//!    present. It is never partially populated.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::rc::Rc;

use crate::error::Result;
use crate::http::RequestConfig;

/// Builds the shim's execution environment.
pub trait ModuleRuntime {
    /// # Errors
    ///
    /// Returns error if the shim has not defined its environment constructor.
    fn create_environment(&self) -> Result<Box<dyn ModuleEnvironment>>;
}

/// An execution environment a module binary is instantiated against.
#[async_trait(?Send)]
pub trait ModuleEnvironment {
    /// Compile and instantiate `bytes` against this environment's imports.
    async fn instantiate(&self, bytes: Bytes) -> Result<Box<dyn ModuleInstance>>;
}

/// An instantiated but not yet running module.
pub trait ModuleInstance {
    /// Start execution without waiting for it to finish or publish anything.
    fn start(&self) -> Result<Rc<dyn CapabilityRegistry>>;
}

/// Where a running module publishes its entry points.
pub trait CapabilityRegistry {
    /// Samples the registry. Returns `Some` only when every entry point is
    /// present and callable.
    fn capabilities(&self) -> Option<CapabilitySet>;
}

/// JSON-normalization entry point.
#[async_trait(?Send)]
pub trait JsonProcessor {
    async fn process_json(&self, json: &str) -> Result<Value>;
}

/// Field-extraction entry point.
#[async_trait(?Send)]
pub trait FieldExtractor {
    async fn extract_fields(&self, json: &str, fields: &[String]) -> Result<Value>;
}

/// Network-request entry point.
#[async_trait(?Send)]
pub trait RequestExecutor {
    async fn make_request(&self, url: &str, config: RequestConfig) -> Result<ModuleResponse>;
}

/// The three entry points of a ready module, as one atomic unit.
#[derive(Clone)]
pub struct CapabilitySet {
    pub json: Rc<dyn JsonProcessor>,
    pub fields: Rc<dyn FieldExtractor>,
    pub request: Rc<dyn RequestExecutor>,
}

impl CapabilitySet {
    pub fn new(
        json: Rc<dyn JsonProcessor>,
        fields: Rc<dyn FieldExtractor>,
        request: Rc<dyn RequestExecutor>,
    ) -> Self {
        Self {
            json,
            fields,
            request,
        }
    }
}

impl fmt::Debug for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilitySet")
            .field("json", &"JsonProcessor { ... }")
            .field("fields", &"FieldExtractor { ... }")
            .field("request", &"RequestExecutor { ... }")
            .finish()
    }
}

/// Response produced by the network-request entry point.
///
/// `data` holds the parsed JSON body when the body was JSON, otherwise the
/// raw text as a JSON string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleResponse {
    #[serde(default)]
    pub data: Value,
    pub status: u16,
    #[serde(default)]
    pub headers: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Extracts the message from the module's `{ "error": "<msg>" }` convention.
///
/// Any other value, including objects that carry additional keys next to
/// `error`, is treated as a regular result.
pub fn module_error_message(value: &Value) -> Option<&str> {
    let object = value.as_object()?;
    if object.len() != 1 {
        return None;
    }
    object.get("error")?.as_str()
}
