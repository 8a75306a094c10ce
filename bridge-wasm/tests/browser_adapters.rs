#![cfg(target_arch = "wasm32")]
//! Browser tests for the page-facing adapters.
//!
//! Entry points are stood in for by plain JS functions assigned to the global
//! object, the same way a running module publishes them.

use bridge_traits::{
    error::BridgeError,
    http::{HttpMethod, RequestConfig},
    module::{CapabilityRegistry, ModuleRuntime},
    script::ScriptHost,
};
use bridge_wasm::{DocumentScriptHost, GlobalCapabilityRegistry, GoRuntime};
use core_runtime::config::EntryPointNames;
use js_sys::{Function, Reflect};
use serde_json::{json, Value};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn names(prefix: &str) -> EntryPointNames {
    EntryPointNames {
        process_json: format!("{prefix}ProcessJSON"),
        extract_fields: format!("{prefix}ExtractFields"),
        make_request: format!("{prefix}MakeRequest"),
    }
}

fn publish(name: &str, args: &str, body: &str) {
    let function = Function::new_with_args(args, body);
    Reflect::set(&js_sys::global(), &JsValue::from_str(name), &function).unwrap();
}

fn publish_all(names: &EntryPointNames) {
    publish(
        &names.process_json,
        "text",
        "try { return JSON.stringify(JSON.parse(text)); } \
         catch (e) { return { error: 'Failed parse JSON: ' + e.message }; }",
    );
    publish(
        &names.extract_fields,
        "text, fields",
        "const data = JSON.parse(text); const out = {}; \
         for (const f of fields) { if (f in data) out[f] = data[f]; } \
         return JSON.stringify(out);",
    );
    publish(
        &names.make_request,
        "url, config",
        "if (!url) { return Promise.reject({ error: 'URL not set' }); } \
         return Promise.resolve({ data: { url, method: config.method, headers: config.headers }, \
         status: 200, headers: {} });",
    );
}

#[wasm_bindgen_test]
async fn test_script_host_detects_existing_script() {
    let document = web_sys::window().unwrap().document().unwrap();
    let script = document.create_element("script").unwrap();
    script.set_attribute("src", "/already-there.js").unwrap();
    document.head().unwrap().append_child(&script).unwrap();

    let host = DocumentScriptHost::new().unwrap();

    assert!(host.has_script("/already-there.js"));
    assert!(!host.has_script("/missing.js"));
}

#[wasm_bindgen_test]
fn test_script_host_matches_urls_with_quotes() {
    let url = r#"/odd"name].js"#;
    let document = web_sys::window().unwrap().document().unwrap();
    let script = document.create_element("script").unwrap();
    script.set_attribute("src", url).unwrap();
    document.head().unwrap().append_child(&script).unwrap();

    let host = DocumentScriptHost::new().unwrap();

    assert!(host.has_script(url));
    assert!(!host.has_script("/odd"));
}

#[wasm_bindgen_test]
async fn test_failed_script_load_is_reported() {
    let host = DocumentScriptHost::new().unwrap();

    let result = host.inject_script("/definitely-not-served.js").await;

    assert!(matches!(result, Err(BridgeError::OperationFailed(_))));
    // The element stays in the page, like a failed tag would.
    assert!(host.has_script("/definitely-not-served.js"));
}

#[wasm_bindgen_test]
fn test_registry_requires_all_entry_points() {
    let names = names("partial");
    publish(&names.process_json, "text", "return text;");
    publish(&names.extract_fields, "text, fields", "return text;");

    let registry = GlobalCapabilityRegistry::new(names.clone());
    assert!(registry.capabilities().is_none());

    Reflect::set(
        &js_sys::global(),
        &JsValue::from_str(&names.make_request),
        &JsValue::from_str("not a function"),
    )
    .unwrap();
    assert!(registry.capabilities().is_none());
}

#[wasm_bindgen_test]
async fn test_registry_wraps_entry_points() {
    let names = names("ready");
    publish_all(&names);
    let registry = GlobalCapabilityRegistry::new(names);

    let capabilities = registry.capabilities().expect("all entry points published");

    let normalized = capabilities.json.process_json(r#"{ "a": 1 }"#).await.unwrap();
    assert_eq!(normalized, Value::String(r#"{"a":1}"#.to_string()));

    let fields = vec!["b".to_string()];
    let extracted = capabilities
        .fields
        .extract_fields(r#"{"a":1,"b":2}"#, &fields)
        .await
        .unwrap();
    assert_eq!(extracted, Value::String(r#"{"b":2}"#.to_string()));
}

#[wasm_bindgen_test]
async fn test_error_object_becomes_module_error() {
    let names = names("failing");
    publish_all(&names);
    let capabilities = GlobalCapabilityRegistry::new(names).capabilities().unwrap();

    let err = capabilities.json.process_json("{").await.unwrap_err();
    assert!(matches!(err, BridgeError::Module(ref m) if m.starts_with("Failed parse JSON")));

    let err = capabilities
        .request
        .make_request("", RequestConfig::new())
        .await
        .unwrap_err();
    assert_eq!(err, BridgeError::Module("URL not set".to_string()));
}

#[wasm_bindgen_test]
async fn test_request_config_reaches_module_as_plain_object() {
    let names = names("request");
    publish_all(&names);
    let capabilities = GlobalCapabilityRegistry::new(names).capabilities().unwrap();

    let config = RequestConfig::new()
        .method(HttpMethod::Get)
        .header("Accept", "application/json");
    let response = capabilities
        .request
        .make_request("/api", config)
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(
        response.data,
        json!({ "url": "/api", "method": "GET", "headers": { "Accept": "application/json" } })
    );
}

#[wasm_bindgen_test]
fn test_runtime_without_shim_is_not_available() {
    // No wasm_exec.js on the test page, so no global Go class.
    let runtime = GoRuntime::new(EntryPointNames::default());

    let result = runtime.create_environment();

    assert!(matches!(result, Err(BridgeError::NotAvailable(_))));
}
