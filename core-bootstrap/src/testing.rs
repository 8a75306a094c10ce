//! In-memory stand-ins for the page and the external module.
//!
//! Compiled for this crate's tests and, through the `testing` feature, for
//! downstream test suites. Each fake counts the side effects the bootstrap
//! sequence is allowed to perform only once.

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result as BridgeResult},
    CapabilityRegistry, CapabilitySet, FieldExtractor, HttpMethod, JsonProcessor,
    ModuleEnvironment, ModuleInstance, ModuleResponse, ModuleRuntime, RequestConfig,
    RequestExecutor, ScriptHost,
};
use bytes::Bytes;
use serde_json::{json, Map, Value};
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

use crate::registry::LocalRegistry;

/// Minimal valid WebAssembly header, used as a module body in tests.
pub const WASM_MAGIC: &[u8] = b"\0asm\x01\0\0\0";

// =============================================================================
// Page
// =============================================================================

/// A document that records script elements instead of touching a DOM.
#[derive(Default)]
pub struct FakeDocument {
    scripts: RefCell<Vec<String>>,
    failing: RefCell<HashSet<String>>,
    injections: Cell<usize>,
}

impl FakeDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretends the page already carries a script element for `url`.
    pub fn with_existing_script(self, url: &str) -> Self {
        self.scripts.borrow_mut().push(url.to_string());
        self
    }

    /// Makes loading `url` fail once injected, like a 404 on the script tag.
    pub fn failing_on(self, url: &str) -> Self {
        self.failing.borrow_mut().insert(url.to_string());
        self
    }

    pub fn injection_count(&self) -> usize {
        self.injections.get()
    }

    pub fn scripts(&self) -> Vec<String> {
        self.scripts.borrow().clone()
    }
}

#[async_trait(?Send)]
impl ScriptHost for FakeDocument {
    fn has_script(&self, url: &str) -> bool {
        self.scripts.borrow().iter().any(|src| src == url)
    }

    async fn inject_script(&self, url: &str) -> BridgeResult<()> {
        // The element is appended before the load outcome is known.
        self.scripts.borrow_mut().push(url.to_string());
        self.injections.set(self.injections.get() + 1);
        core_async::task::yield_now().await;

        if self.failing.borrow().contains(url) {
            return Err(BridgeError::OperationFailed(format!(
                "script {url} raised an error event"
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Runtime
// =============================================================================

/// Counters shared between a [`FakeRuntime`] and everything it creates.
#[derive(Debug, Default)]
pub struct RuntimeCounters {
    pub environments: Cell<usize>,
    pub instantiations: Cell<usize>,
    pub starts: Cell<usize>,
}

/// Runtime whose module publishes into a [`LocalRegistry`] the test controls.
pub struct FakeRuntime {
    counters: Rc<RuntimeCounters>,
    registry: Rc<LocalRegistry>,
    instantiation_error: Option<String>,
    missing_shim: bool,
}

impl FakeRuntime {
    pub fn new() -> Self {
        Self {
            counters: Rc::new(RuntimeCounters::default()),
            registry: Rc::new(LocalRegistry::new()),
            instantiation_error: None,
            missing_shim: false,
        }
    }

    /// Instantiation rejects with `message`.
    pub fn failing_instantiation(mut self, message: &str) -> Self {
        self.instantiation_error = Some(message.to_string());
        self
    }

    /// The shim never defined its environment constructor.
    pub fn without_shim(mut self) -> Self {
        self.missing_shim = true;
        self
    }

    /// Registry the started module publishes into. Nothing is published
    /// until the test does so.
    pub fn registry(&self) -> Rc<LocalRegistry> {
        Rc::clone(&self.registry)
    }

    pub fn counters(&self) -> Rc<RuntimeCounters> {
        Rc::clone(&self.counters)
    }
}

impl Default for FakeRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleRuntime for FakeRuntime {
    fn create_environment(&self) -> BridgeResult<Box<dyn ModuleEnvironment>> {
        if self.missing_shim {
            return Err(BridgeError::NotAvailable("Go".to_string()));
        }
        self.counters
            .environments
            .set(self.counters.environments.get() + 1);
        Ok(Box::new(FakeEnvironment {
            counters: Rc::clone(&self.counters),
            registry: Rc::clone(&self.registry),
            instantiation_error: self.instantiation_error.clone(),
        }))
    }
}

struct FakeEnvironment {
    counters: Rc<RuntimeCounters>,
    registry: Rc<LocalRegistry>,
    instantiation_error: Option<String>,
}

#[async_trait(?Send)]
impl ModuleEnvironment for FakeEnvironment {
    async fn instantiate(&self, bytes: Bytes) -> BridgeResult<Box<dyn ModuleInstance>> {
        self.counters
            .instantiations
            .set(self.counters.instantiations.get() + 1);
        core_async::task::yield_now().await;

        if let Some(message) = &self.instantiation_error {
            return Err(BridgeError::OperationFailed(message.clone()));
        }
        if !bytes.starts_with(WASM_MAGIC) {
            return Err(BridgeError::OperationFailed(
                "WebAssembly.instantiate(): expected magic word".to_string(),
            ));
        }
        Ok(Box::new(FakeInstance {
            counters: Rc::clone(&self.counters),
            registry: Rc::clone(&self.registry),
        }))
    }
}

struct FakeInstance {
    counters: Rc<RuntimeCounters>,
    registry: Rc<LocalRegistry>,
}

impl ModuleInstance for FakeInstance {
    fn start(&self) -> BridgeResult<Rc<dyn CapabilityRegistry>> {
        self.counters.starts.set(self.counters.starts.get() + 1);
        let registry: Rc<dyn CapabilityRegistry> = self.registry.clone();
        Ok(registry)
    }
}

// =============================================================================
// Module entry points
// =============================================================================

/// Entry points that behave like the reference module and record every call.
#[derive(Default)]
pub struct RecordingModule {
    json_calls: RefCell<Vec<String>>,
    field_calls: RefCell<Vec<(String, Vec<String>)>>,
    request_calls: RefCell<Vec<(String, RequestConfig)>>,
}

impl RecordingModule {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// The module as one capability set.
    pub fn capabilities(module: &Rc<Self>) -> CapabilitySet {
        CapabilitySet::new(module.clone(), module.clone(), module.clone())
    }

    pub fn json_calls(&self) -> Vec<String> {
        self.json_calls.borrow().clone()
    }

    pub fn field_calls(&self) -> Vec<(String, Vec<String>)> {
        self.field_calls.borrow().clone()
    }

    pub fn request_calls(&self) -> Vec<(String, RequestConfig)> {
        self.request_calls.borrow().clone()
    }

    pub fn total_calls(&self) -> usize {
        self.json_calls.borrow().len()
            + self.field_calls.borrow().len()
            + self.request_calls.borrow().len()
    }
}

fn module_error(message: &str) -> BridgeError {
    BridgeError::Module(message.to_string())
}

#[async_trait(?Send)]
impl JsonProcessor for RecordingModule {
    async fn process_json(&self, json: &str) -> BridgeResult<Value> {
        self.json_calls.borrow_mut().push(json.to_string());
        let parsed: Value = serde_json::from_str(json)
            .map_err(|e| module_error(&format!("Failed parse JSON: {e}")))?;
        let normalized = serde_json::to_string(&parsed)
            .map_err(|e| module_error(&format!("Failed stringify JSON: {e}")))?;
        Ok(Value::String(normalized))
    }
}

#[async_trait(?Send)]
impl FieldExtractor for RecordingModule {
    async fn extract_fields(&self, json: &str, fields: &[String]) -> BridgeResult<Value> {
        self.field_calls
            .borrow_mut()
            .push((json.to_string(), fields.to_vec()));
        let data: Map<String, Value> =
            serde_json::from_str(json).map_err(|_| module_error("Failed to parse JSON"))?;
        let picked: Map<String, Value> = fields
            .iter()
            .filter_map(|field| data.get(field).map(|value| (field.clone(), value.clone())))
            .collect();
        let encoded = serde_json::to_string(&picked)
            .map_err(|_| module_error("Failed to stringify JSON"))?;
        Ok(Value::String(encoded))
    }
}

#[async_trait(?Send)]
impl RequestExecutor for RecordingModule {
    async fn make_request(&self, url: &str, config: RequestConfig) -> BridgeResult<ModuleResponse> {
        self.request_calls
            .borrow_mut()
            .push((url.to_string(), config.clone()));
        if url.is_empty() {
            return Err(module_error("URL not set"));
        }
        let method = config.method.unwrap_or(HttpMethod::Get);
        Ok(ModuleResponse {
            data: json!({ "url": url, "method": method.as_str() }),
            status: 200,
            headers: Map::new(),
            error: None,
        })
    }
}
