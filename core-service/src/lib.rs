//! WasmFetch bridge facade.
//!
//! [`WasmFetch`] is the object host code talks to. It owns one bridge
//! context: a single initialization (shim script, module binary, readiness
//! wait) whose outcome is memoized and shared by every call. Operations issued
//! before the module is ready suspend on that outcome; operations issued after
//! it resolved go straight to the module's entry points. A failed
//! initialization is final and every call on the context reports it.
//!
//! Platform access is injected through [`WasmFetchComponents`]. Browser hosts
//! enable the `wasm` feature, which builds the components from the
//! `bridge-wasm` adapters and exposes a JavaScript class.
//!
//! ```ignore
//! use core_service::{WasmFetch, WasmFetchComponents};
//! use core_runtime::config::BridgeConfig;
//!
//! let bridge = WasmFetch::start(components, &BridgeConfig::default())?;
//! let normalized = bridge.process_json(r#"{ "a": 1 }"#).await?;
//! ```

pub mod error;
#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
pub mod wasm;

pub use error::{Error, Result};

use bridge_traits::{
    CapabilitySet, HttpClient, HttpMethod, ModuleResponse, ModuleRuntime, RequestConfig,
    ScriptHost,
};
use core_async::sync::CancellationToken;
use core_async::time::Duration;
use core_bootstrap::{
    with_deadline, BootstrapError, DependencyLoader, ExternalModuleHandle, LoaderState,
    ModuleBootstrapper, ReadinessPoller, StateCell,
};
use core_runtime::config::BridgeConfig;
use futures::future::{FutureExt, LocalBoxFuture, Shared};
use serde_json::Value;
use std::cell::{Cell, OnceCell};
use std::rc::Rc;
use tracing::{debug, error, info, instrument};

#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
pub use bridge_wasm::build_browser_components;

type InitOutcome = std::result::Result<CapabilitySet, BootstrapError>;

/// Platform handles a bridge context is built from.
pub struct WasmFetchComponents {
    pub script_host: Rc<dyn ScriptHost>,
    pub http_client: Rc<dyn HttpClient>,
    pub runtime: Rc<dyn ModuleRuntime>,
}

impl WasmFetchComponents {
    pub fn new(
        script_host: Rc<dyn ScriptHost>,
        http_client: Rc<dyn HttpClient>,
        runtime: Rc<dyn ModuleRuntime>,
    ) -> Self {
        Self {
            script_host,
            http_client,
            runtime,
        }
    }
}

struct Inner {
    state: Rc<StateCell>,
    // The running module, kept for the lifetime of the context.
    _module: Rc<OnceCell<ExternalModuleHandle>>,
    // Lazy until first polled; clones observe one resolution.
    init: Shared<LocalBoxFuture<'static, InitOutcome>>,
    driving: Cell<bool>,
}

/// Handle to one bridge context. Clones share the context.
#[derive(Clone)]
pub struct WasmFetch {
    inner: Rc<Inner>,
}

impl WasmFetch {
    /// Creates a context without starting it. The first operation, or
    /// [`initialize`](Self::initialize), starts the initialization.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if `config` does not validate.
    pub fn new(components: WasmFetchComponents, config: &BridgeConfig) -> Result<Self> {
        config.validate()?;
        let state = Rc::new(StateCell::new());
        let module = Rc::new(OnceCell::new());
        let bootstrapper = ModuleBootstrapper::new(
            DependencyLoader::new(components.script_host),
            components.http_client,
            components.runtime,
            config,
        );
        let poller = ReadinessPoller::new(config.poll_interval);
        let init = run_initialization(Rc::clone(&state), Rc::clone(&module), bootstrapper, poller)
            .boxed_local()
            .shared();

        Ok(Self {
            inner: Rc::new(Inner {
                state,
                _module: module,
                init,
                driving: Cell::new(false),
            }),
        })
    }

    /// Creates a context and starts initializing it in the background right
    /// away.
    ///
    /// Must be called from within a local task context (the browser event
    /// loop, or a Tokio `LocalSet`).
    pub fn start(components: WasmFetchComponents, config: &BridgeConfig) -> Result<Self> {
        let bridge = Self::new(components, config)?;
        bridge.drive_in_background();
        Ok(bridge)
    }

    /// Waits for the shared initialization outcome, starting it if needed.
    ///
    /// # Errors
    ///
    /// [`Error::Init`] if initialization failed, now or earlier.
    pub async fn initialize(&self) -> Result<()> {
        self.capabilities().await.map(|_| ())
    }

    /// Like [`initialize`](Self::initialize), but gives up after `deadline`
    /// or when `cancel` fires.
    ///
    /// Giving up only ends this wait. Initialization keeps running in the
    /// background and later calls still observe its outcome.
    ///
    /// # Errors
    ///
    /// [`Error::Readiness`] on timeout or cancellation, [`Error::Init`] if
    /// initialization failed first.
    pub async fn ready_within(&self, deadline: Duration, cancel: &CancellationToken) -> Result<()> {
        self.drive_in_background();
        with_deadline(self.capabilities(), deadline, cancel).await??;
        Ok(())
    }

    /// Normalizes `json` through the module's JSON entry point.
    pub async fn process_json(&self, json: &str) -> Result<Value> {
        let capabilities = self.capabilities().await?;
        Ok(capabilities.json.process_json(json).await?)
    }

    /// Keeps only `fields` from the top level of `json`.
    pub async fn extract_fields(&self, json: &str, fields: &[String]) -> Result<Value> {
        let capabilities = self.capabilities().await?;
        Ok(capabilities.fields.extract_fields(json, fields).await?)
    }

    /// Performs a GET through the module. Whatever method `config` names is
    /// replaced with `GET`; headers and body pass through untouched.
    #[instrument(skip(self, config))]
    pub async fn get(&self, url: &str, config: &RequestConfig) -> Result<ModuleResponse> {
        let capabilities = self.capabilities().await?;
        let config = config.with_forced_method(HttpMethod::Get);
        let response = capabilities.request.make_request(url, config).await?;
        debug!(status = response.status, "Module request completed");
        Ok(response)
    }

    pub(crate) fn state(&self) -> LoaderState {
        self.inner.state.get()
    }

    async fn capabilities(&self) -> Result<CapabilitySet> {
        let state = self.state();
        if !state.is_terminal() {
            debug!(?state, "Waiting for WasmFetch bridge initialization");
        }
        Ok(self.inner.init.clone().await?)
    }

    fn drive_in_background(&self) {
        if self.inner.driving.replace(true) {
            return;
        }
        let init = self.inner.init.clone();
        core_async::spawn_local(async move {
            let _ = init.await;
        });
    }
}

async fn run_initialization(
    state: Rc<StateCell>,
    module: Rc<OnceCell<ExternalModuleHandle>>,
    bootstrapper: ModuleBootstrapper,
    poller: ReadinessPoller,
) -> InitOutcome {
    state.advance(LoaderState::Loading);
    info!("Initializing WasmFetch bridge");

    let outcome = match bootstrapper.bootstrap().await {
        Ok(handle) => {
            let registry = handle.registry();
            let _ = module.set(handle);
            Ok(poller.wait_ready(&*registry).await)
        }
        Err(err) => Err(err),
    };

    match &outcome {
        Ok(_) => {
            state.advance(LoaderState::Ready);
            info!("WasmFetch bridge ready");
        }
        Err(err) => {
            state.advance(LoaderState::Failed);
            error!(error = %err, "WasmFetch bridge initialization failed");
        }
    }
    outcome
}
