#![cfg(not(target_arch = "wasm32"))]
//! Integration tests for the boot sequence: shim, fetch, instantiate, start.

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result as BridgeResult},
    CapabilityRegistry, HttpClient, HttpMethod, HttpRequest, HttpResponse,
};
use bytes::Bytes;
use core_bootstrap::testing::{FakeDocument, FakeRuntime, RecordingModule, WASM_MAGIC};
use core_bootstrap::{BootstrapError, DependencyLoader, ModuleBootstrapper};
use core_runtime::config::BridgeConfig;
use mockall::mock;
use std::collections::HashMap;
use std::rc::Rc;

mock! {
    pub Http {}

    #[async_trait(?Send)]
    impl HttpClient for Http {
        async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
    }
}

fn wasm_response(status: u16, body: &'static [u8]) -> HttpResponse {
    HttpResponse {
        status,
        headers: HashMap::new(),
        body: Bytes::from_static(body),
    }
}

fn http_serving(status: u16, body: &'static [u8]) -> MockHttp {
    let mut http = MockHttp::new();
    http.expect_execute()
        .times(1)
        .returning(move |request| {
            assert_eq!(request.method, HttpMethod::Get);
            assert_eq!(request.url, "/wasmfetch.wasm");
            Ok(wasm_response(status, body))
        });
    http
}

fn bootstrapper(
    document: Rc<FakeDocument>,
    http: MockHttp,
    runtime: Rc<FakeRuntime>,
) -> ModuleBootstrapper {
    ModuleBootstrapper::new(
        DependencyLoader::new(document),
        Rc::new(http),
        runtime,
        &BridgeConfig::default(),
    )
}

#[tokio::test(flavor = "current_thread")]
async fn test_bootstrap_runs_full_sequence() {
    let document = Rc::new(FakeDocument::new());
    let runtime = Rc::new(FakeRuntime::new());
    let counters = runtime.counters();
    let boot = bootstrapper(document.clone(), http_serving(200, WASM_MAGIC), runtime.clone());

    let handle = boot.bootstrap().await.expect("bootstrap succeeds");

    assert_eq!(document.scripts(), vec!["/wasm_exec.js".to_string()]);
    assert_eq!(counters.environments.get(), 1);
    assert_eq!(counters.instantiations.get(), 1);
    assert_eq!(counters.starts.get(), 1);

    // Started, but nothing published yet: start does not imply readiness.
    let registry = handle.registry();
    assert!(registry.capabilities().is_none());

    runtime
        .registry()
        .publish_all(RecordingModule::capabilities(&RecordingModule::new()));
    assert!(registry.capabilities().is_some());
}

#[tokio::test(flavor = "current_thread")]
async fn test_script_failure_stops_before_fetch() {
    let document = Rc::new(FakeDocument::new().failing_on("/wasm_exec.js"));
    let runtime = Rc::new(FakeRuntime::new());
    let counters = runtime.counters();
    let mut http = MockHttp::new();
    http.expect_execute().times(0);

    let err = bootstrapper(document, http, runtime)
        .bootstrap()
        .await
        .unwrap_err();

    assert!(matches!(err, BootstrapError::ScriptLoad { .. }));
    assert_eq!(counters.environments.get(), 0);
    assert_eq!(counters.instantiations.get(), 0);
}

#[tokio::test(flavor = "current_thread")]
async fn test_transport_failure_is_fetch_error() {
    let mut http = MockHttp::new();
    http.expect_execute()
        .times(1)
        .returning(|_| Err(BridgeError::OperationFailed("network down".to_string())));
    let runtime = Rc::new(FakeRuntime::new());
    let counters = runtime.counters();

    let err = bootstrapper(Rc::new(FakeDocument::new()), http, runtime)
        .bootstrap()
        .await
        .unwrap_err();

    match err {
        BootstrapError::Fetch { path, message } => {
            assert_eq!(path, "/wasmfetch.wasm");
            assert!(message.contains("network down"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(counters.instantiations.get(), 0);
}

#[tokio::test(flavor = "current_thread")]
async fn test_error_status_is_fetch_error() {
    let err = bootstrapper(
        Rc::new(FakeDocument::new()),
        http_serving(404, b"not found"),
        Rc::new(FakeRuntime::new()),
    )
    .bootstrap()
    .await
    .unwrap_err();

    assert_eq!(
        err,
        BootstrapError::Fetch {
            path: "/wasmfetch.wasm".to_string(),
            message: "HTTP status 404".to_string(),
        }
    );
}

#[tokio::test(flavor = "current_thread")]
async fn test_empty_body_is_fetch_error() {
    let err = bootstrapper(
        Rc::new(FakeDocument::new()),
        http_serving(200, b""),
        Rc::new(FakeRuntime::new()),
    )
    .bootstrap()
    .await
    .unwrap_err();

    assert!(matches!(err, BootstrapError::Fetch { .. }));
}

#[tokio::test(flavor = "current_thread")]
async fn test_instantiation_failure() {
    let runtime = Rc::new(FakeRuntime::new().failing_instantiation("LinkError: import missing"));
    let counters = runtime.counters();

    let err = bootstrapper(
        Rc::new(FakeDocument::new()),
        http_serving(200, WASM_MAGIC),
        runtime,
    )
    .bootstrap()
    .await
    .unwrap_err();

    assert!(matches!(err, BootstrapError::Instantiation(ref m) if m.contains("LinkError")));
    assert_eq!(counters.starts.get(), 0);
}

#[tokio::test(flavor = "current_thread")]
async fn test_invalid_binary_is_instantiation_error() {
    let err = bootstrapper(
        Rc::new(FakeDocument::new()),
        http_serving(200, b"<!doctype html>"),
        Rc::new(FakeRuntime::new()),
    )
    .bootstrap()
    .await
    .unwrap_err();

    assert!(matches!(err, BootstrapError::Instantiation(_)));
}

#[tokio::test(flavor = "current_thread")]
async fn test_missing_shim_environment_fails_before_fetch() {
    let mut http = MockHttp::new();
    http.expect_execute().times(0);

    let err = bootstrapper(
        Rc::new(FakeDocument::new()),
        http,
        Rc::new(FakeRuntime::new().without_shim()),
    )
    .bootstrap()
    .await
    .unwrap_err();

    assert!(matches!(err, BootstrapError::Instantiation(_)));
}
