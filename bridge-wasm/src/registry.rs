//! Entry points published on the global object.
//!
//! A running module announces readiness by assigning three functions to
//! well-known global names. [`GlobalCapabilityRegistry`] samples those names
//! and, once all three hold functions, wraps them as the bridge's entry point
//! traits.
//!
//! Entry points follow one error convention: instead of a result they may
//! return (or, for the request entry point, reject with) an object of the form
//! `{ error: "<message>" }`. That becomes [`BridgeError::Module`].

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result as BridgeResult},
    http::RequestConfig,
    module::{
        module_error_message, CapabilityRegistry, CapabilitySet, FieldExtractor, JsonProcessor,
        ModuleResponse, RequestExecutor,
    },
};
use core_runtime::config::EntryPointNames;
use js_sys::{Array, Function, Promise, Reflect};
use serde::Serialize;
use serde_json::Value;
use std::rc::Rc;
use tracing::trace;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use crate::error::{js_error, WasmError};

/// [`CapabilityRegistry`] over the global object.
pub struct GlobalCapabilityRegistry {
    global: JsValue,
    names: EntryPointNames,
}

impl GlobalCapabilityRegistry {
    /// Samples `names` on the global object.
    pub fn new(names: EntryPointNames) -> Self {
        Self {
            global: js_sys::global().into(),
            names,
        }
    }

    fn lookup(&self, name: &str) -> Option<JsEntryPoint> {
        let value = Reflect::get(&self.global, &JsValue::from_str(name)).ok()?;
        let function = value.dyn_into::<Function>().ok()?;
        Some(JsEntryPoint {
            name: name.to_string(),
            function,
        })
    }
}

impl CapabilityRegistry for GlobalCapabilityRegistry {
    fn capabilities(&self) -> Option<CapabilitySet> {
        let json = self.lookup(&self.names.process_json);
        let fields = self.lookup(&self.names.extract_fields);
        let request = self.lookup(&self.names.make_request);
        trace!(
            process_json = json.is_some(),
            extract_fields = fields.is_some(),
            make_request = request.is_some(),
            "Sampled global entry points"
        );

        match (json, fields, request) {
            (Some(json), Some(fields), Some(request)) => Some(CapabilitySet::new(
                Rc::new(json),
                Rc::new(fields),
                Rc::new(request),
            )),
            _ => None,
        }
    }
}

/// One global function published by the module.
struct JsEntryPoint {
    name: String,
    function: Function,
}

impl JsEntryPoint {
    fn call(&self, args: &[JsValue]) -> BridgeResult<JsValue> {
        let args: Array = args.iter().collect();
        self.function
            .apply(&JsValue::UNDEFINED, &args)
            .map_err(|err| js_error(&self.name, err))
    }

    /// Converts a returned value, applying the `{ error }` convention.
    fn into_result(&self, value: JsValue) -> BridgeResult<Value> {
        let value: Value = serde_wasm_bindgen::from_value(value).map_err(WasmError::from)?;
        match module_error_message(&value) {
            Some(message) => Err(BridgeError::Module(message.to_string())),
            None => Ok(value),
        }
    }

    /// Converts a rejection reason, applying the `{ error }` convention.
    fn rejection(&self, reason: JsValue) -> BridgeError {
        let parsed: Option<Value> = serde_wasm_bindgen::from_value(reason.clone()).ok();
        match parsed.as_ref().and_then(module_error_message) {
            Some(message) => BridgeError::Module(message.to_string()),
            None => js_error(&self.name, reason),
        }
    }
}

#[async_trait(?Send)]
impl JsonProcessor for JsEntryPoint {
    async fn process_json(&self, json: &str) -> BridgeResult<Value> {
        let returned = self.call(&[JsValue::from_str(json)])?;
        self.into_result(returned)
    }
}

#[async_trait(?Send)]
impl FieldExtractor for JsEntryPoint {
    async fn extract_fields(&self, json: &str, fields: &[String]) -> BridgeResult<Value> {
        let fields: Array = fields.iter().map(|f| JsValue::from_str(f)).collect();
        let returned = self.call(&[JsValue::from_str(json), fields.into()])?;
        self.into_result(returned)
    }
}

#[async_trait(?Send)]
impl RequestExecutor for JsEntryPoint {
    async fn make_request(&self, url: &str, config: RequestConfig) -> BridgeResult<ModuleResponse> {
        // Plain objects, not `Map`s, for the header table.
        let serializer = serde_wasm_bindgen::Serializer::json_compatible();
        let config = config.serialize(&serializer).map_err(WasmError::from)?;

        let returned = self.call(&[JsValue::from_str(url), config])?;
        let settled = match returned.dyn_into::<Promise>() {
            Ok(promise) => JsFuture::from(promise)
                .await
                .map_err(|reason| self.rejection(reason))?,
            Err(value) => value,
        };

        let value = self.into_result(settled)?;
        serde_json::from_value(value).map_err(|err| {
            BridgeError::OperationFailed(format!("{}: unexpected response shape: {err}", self.name))
        })
    }
}
