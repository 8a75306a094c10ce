//! WASM bindings for core-service
//!
//! Exposes the bridge to JavaScript as a `WasmFetch` class whose methods
//! return promises, mirroring the Rust facade one to one. The page has one
//! bridge: every `new WasmFetch()` hands back the context the first one
//! started, so the module is fetched and run once per page.
//!
//! ```javascript
//! const wasmfetch = new WasmFetch();
//! const normalized = await wasmfetch.processJSON('{ "a": 1 }');
//! const response = await wasmfetch.get('/api/items', { headers: { Accept: 'application/json' } });
//! ```

use crate::{WasmFetch, WasmFetchComponents};
use bridge_traits::RequestConfig;
use bridge_wasm::{build_browser_components, BrowserComponents};
use core_runtime::config::BridgeConfig;
use core_runtime::wasm::JsBridgeConfig;
use js_sys::Promise;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use tracing::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

thread_local! {
    static PAGE_BRIDGE: RefCell<Option<(BridgeConfig, WasmFetch)>> = const { RefCell::new(None) };
}

/// Returns the page's bridge, starting it with `config` on first use.
fn page_bridge(config: BridgeConfig) -> Result<WasmFetch, JsValue> {
    PAGE_BRIDGE.with(|cell| {
        if let Some((active, bridge)) = cell.borrow().as_ref() {
            if *active != config {
                warn!(
                    requested = ?config,
                    active = ?active,
                    "WasmFetch already started on this page; ignoring new configuration"
                );
            }
            return Ok(bridge.clone());
        }

        let components = build_browser_components(&config).map_err(to_js_error)?;
        let bridge = WasmFetch::start(components.into(), &config).map_err(to_js_error)?;
        *cell.borrow_mut() = Some((config, bridge.clone()));
        Ok(bridge)
    })
}

fn to_js_error<E: std::fmt::Display>(err: E) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(to_js_error)
}

/// Route Rust panics to the browser console
#[wasm_bindgen(js_name = initPanicHook)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

impl From<BrowserComponents> for WasmFetchComponents {
    fn from(components: BrowserComponents) -> Self {
        Self {
            script_host: components.script_host,
            http_client: components.http_client,
            runtime: components.runtime,
        }
    }
}

/// Request options accepted from JavaScript. Any `method` is ignored: `get`
/// always sends `GET`.
#[derive(Debug, Default, Deserialize)]
struct JsRequestOptions {
    #[serde(default)]
    headers: HashMap<String, String>,
    #[serde(default)]
    body: Option<Value>,
}

impl From<JsRequestOptions> for RequestConfig {
    fn from(options: JsRequestOptions) -> Self {
        RequestConfig {
            method: None,
            headers: options.headers,
            body: options.body,
        }
    }
}

/// JavaScript-accessible bridge.
///
/// The first construction starts initialization; every method waits for it.
/// Later constructions share that bridge.
#[wasm_bindgen(js_name = WasmFetch)]
pub struct JsWasmFetch {
    inner: WasmFetch,
}

#[wasm_bindgen(js_class = WasmFetch)]
impl JsWasmFetch {
    /// Get the page's bridge. `config` only takes effect on the first call.
    #[wasm_bindgen(constructor)]
    pub fn new(config: Option<JsBridgeConfig>) -> Result<JsWasmFetch, JsValue> {
        let config = match config {
            Some(config) => config.into_inner().map_err(to_js_error)?,
            None => BridgeConfig::default(),
        };
        Ok(Self {
            inner: page_bridge(config)?,
        })
    }

    /// Resolves once the module is ready; rejects if initialization failed.
    pub fn initialize(&self) -> Promise {
        let bridge = self.inner.clone();
        future_to_promise(async move {
            bridge.initialize().await.map_err(to_js_error)?;
            Ok(JsValue::UNDEFINED)
        })
    }

    /// Normalize a JSON document.
    #[wasm_bindgen(js_name = processJSON)]
    pub fn process_json(&self, json: String) -> Promise {
        let bridge = self.inner.clone();
        future_to_promise(async move {
            let value = bridge.process_json(&json).await.map_err(to_js_error)?;
            to_js(&value)
        })
    }

    /// Keep only `fields` from the top level of a JSON document.
    #[wasm_bindgen(js_name = extractFields)]
    pub fn extract_fields(&self, json: String, fields: Vec<String>) -> Promise {
        let bridge = self.inner.clone();
        future_to_promise(async move {
            let value = bridge
                .extract_fields(&json, &fields)
                .await
                .map_err(to_js_error)?;
            to_js(&value)
        })
    }

    /// Perform a GET request through the module.
    pub fn get(&self, url: String, options: JsValue) -> Promise {
        let bridge = self.inner.clone();
        future_to_promise(async move {
            let options: JsRequestOptions = if options.is_undefined() || options.is_null() {
                JsRequestOptions::default()
            } else {
                serde_wasm_bindgen::from_value(options).map_err(to_js_error)?
            };
            let response = bridge
                .get(&url, &options.into())
                .await
                .map_err(to_js_error)?;
            to_js(&response)
        })
    }
}
