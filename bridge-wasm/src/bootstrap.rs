//! Convenience helpers for wiring the browser adapters together.
//!
//! Host shells use [`build_browser_components`] to construct every adapter the
//! bridge boots through without writing repetitive glue code. `core-service`
//! converts the result into its own component bundle.

use std::rc::Rc;

use bridge_traits::{
    error::Result as BridgeResult, http::HttpClient, module::ModuleRuntime, script::ScriptHost,
};
use core_runtime::config::BridgeConfig;
use tracing::debug;

use crate::{http::WasmHttpClient, runtime::GoRuntime, script::DocumentScriptHost};

/// Fully constructed browser adapters ready for injection into the bridge.
pub struct BrowserComponents {
    /// Script injection into `document.head`.
    pub script_host: Rc<dyn ScriptHost>,
    /// HTTP client powered by browser `fetch`.
    pub http_client: Rc<dyn HttpClient>,
    /// Go shim runtime publishing into the global object.
    pub runtime: Rc<dyn ModuleRuntime>,
}

/// Build the browser adapter stack for `config`.
///
/// # Errors
///
/// Returns `BridgeError::NotAvailable` outside a window context (for example
/// in a worker without a document).
pub fn build_browser_components(config: &BridgeConfig) -> BridgeResult<BrowserComponents> {
    let script_host: Rc<dyn ScriptHost> = Rc::new(DocumentScriptHost::new()?);
    let http_client: Rc<dyn HttpClient> = Rc::new(WasmHttpClient::new()?);
    let runtime: Rc<dyn ModuleRuntime> = Rc::new(GoRuntime::new(config.entry_points.clone()));
    debug!(
        shim = %config.shim_script_path,
        module = %config.module_path,
        "Browser components ready"
    );

    Ok(BrowserComponents {
        script_host,
        http_client,
        runtime,
    })
}
