#![cfg(all(target_arch = "wasm32", feature = "wasm"))]
//! The `WasmFetch` JavaScript class against a stand-in Go runtime.
//!
//! The stand-in `Go` class publishes the three entry points from `run`, the
//! way the real module's `main` does. The module binary is the smallest valid
//! WebAssembly module, served from a data URL.

use core_runtime::wasm::JsBridgeConfig;
use core_service::wasm::JsWasmFetch;
use js_sys::{Function, Reflect, JSON};
use serde_json::Value;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

const SHIM: &str = "/js-class-shim.js";
const MODULE: &str = "data:application/wasm;base64,AGFzbQEAAAA=";

fn install_go_stub() {
    let install = Function::new_with_args(
        "shim",
        r#"
        if (globalThis.Go) return;
        globalThis.goRuns = 0;
        const script = document.createElement('script');
        script.setAttribute('src', shim);
        document.head.appendChild(script);
        globalThis.Go = class {
            constructor() { this.importObject = {}; }
            run(instance) {
                globalThis.goRuns += 1;
                globalThis.goProcessJSON = (text) => {
                    try { return JSON.stringify(JSON.parse(text)); }
                    catch (e) { return { error: 'Failed parse JSON: ' + e.message }; }
                };
                globalThis.goExtractFields = (text, fields) => {
                    const data = JSON.parse(text); const out = {};
                    for (const f of fields) { if (f in data) out[f] = data[f]; }
                    return JSON.stringify(out);
                };
                globalThis.goMakeRequest = (url, config) => Promise.resolve({
                    data: { url, method: config.method, headers: config.headers || {} },
                    status: 200,
                    headers: { 'content-type': 'application/json' },
                });
                return new Promise(() => {});
            }
        };
        "#,
    );
    install
        .call1(&JsValue::UNDEFINED, &JsValue::from_str(SHIM))
        .unwrap();
}

fn config(module_path: &str) -> JsBridgeConfig {
    let mut config = JsBridgeConfig::new();
    config.set_shim_script_path(SHIM.to_string());
    config.set_module_path(module_path.to_string());
    config
}

fn page_bridge() -> JsWasmFetch {
    install_go_stub();
    JsWasmFetch::new(Some(config(MODULE))).unwrap()
}

async fn settle(promise: js_sys::Promise) -> Result<JsValue, JsValue> {
    JsFuture::from(promise).await
}

fn go_runs() -> f64 {
    Reflect::get(&js_sys::global(), &JsValue::from_str("goRuns"))
        .unwrap()
        .as_f64()
        .unwrap()
}

#[wasm_bindgen_test]
async fn test_get_sends_get_whatever_method_is_passed() {
    let bridge = page_bridge();
    let options =
        JSON::parse(r#"{ "method": "POST", "headers": { "Accept": "application/json" } }"#)
            .unwrap();

    let response = settle(bridge.get("/x".to_string(), options)).await.unwrap();
    let response: Value = serde_wasm_bindgen::from_value(response).unwrap();

    assert_eq!(response["status"], 200);
    assert_eq!(response["data"]["url"], "/x");
    assert_eq!(response["data"]["method"], "GET");
    assert_eq!(response["data"]["headers"]["Accept"], "application/json");
    assert_eq!(response["headers"]["content-type"], "application/json");
}

#[wasm_bindgen_test]
async fn test_get_without_options() {
    let bridge = page_bridge();

    for options in [JsValue::NULL, JsValue::UNDEFINED] {
        let response = settle(bridge.get("/y".to_string(), options)).await.unwrap();
        let response: Value = serde_wasm_bindgen::from_value(response).unwrap();

        assert_eq!(response["data"]["method"], "GET");
        assert_eq!(response["data"]["url"], "/y");
    }
}

#[wasm_bindgen_test]
async fn test_process_json_resolves_to_string() {
    let bridge = page_bridge();

    let normalized = settle(bridge.process_json(r#"{ "a": 1 }"#.to_string()))
        .await
        .unwrap();
    assert_eq!(normalized.as_string().as_deref(), Some(r#"{"a":1}"#));

    let rejected = settle(bridge.process_json("{".to_string()))
        .await
        .unwrap_err();
    assert!(rejected.as_string().unwrap().contains("Failed parse JSON"));
}

#[wasm_bindgen_test]
async fn test_extract_fields_resolves_to_string() {
    let bridge = page_bridge();

    let extracted = settle(bridge.extract_fields(
        r#"{"a":1,"b":2}"#.to_string(),
        vec!["b".to_string()],
    ))
    .await
    .unwrap();

    assert_eq!(extracted.as_string().as_deref(), Some(r#"{"b":2}"#));
}

#[wasm_bindgen_test]
async fn test_second_construction_shares_the_page_bridge() {
    let first = page_bridge();
    // Would fail to fetch if it started a bridge of its own.
    let second = JsWasmFetch::new(Some(config("/not-served.wasm"))).unwrap();

    settle(second.initialize()).await.unwrap();
    settle(first.initialize()).await.unwrap();

    assert_eq!(go_runs(), 1.0);
}
