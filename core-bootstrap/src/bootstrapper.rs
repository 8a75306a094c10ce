//! Module Bootstrapper
//!
//! Runs the one-time boot sequence: shim script, execution environment,
//! binary fetch, instantiation, start. It stops as soon as the module is
//! running; waiting for the entry points is the poller's job.

use bridge_traits::{
    CapabilityRegistry, HttpClient, HttpMethod, HttpRequest, ModuleInstance, ModuleRuntime,
};
use bytes::Bytes;
use core_runtime::config::BridgeConfig;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, instrument};

use crate::error::{BootstrapError, Result};
use crate::loader::DependencyLoader;

/// The running module and the registry it publishes into.
pub struct ExternalModuleHandle {
    // Held so the instance lives as long as the bridge context.
    _instance: Box<dyn ModuleInstance>,
    registry: Rc<dyn CapabilityRegistry>,
}

impl ExternalModuleHandle {
    pub fn registry(&self) -> Rc<dyn CapabilityRegistry> {
        Rc::clone(&self.registry)
    }
}

impl fmt::Debug for ExternalModuleHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExternalModuleHandle")
            .field("registry", &"CapabilityRegistry { ... }")
            .finish_non_exhaustive()
    }
}

pub struct ModuleBootstrapper {
    loader: DependencyLoader,
    http: Rc<dyn HttpClient>,
    runtime: Rc<dyn ModuleRuntime>,
    shim_script_path: String,
    module_path: String,
}

impl ModuleBootstrapper {
    pub fn new(
        loader: DependencyLoader,
        http: Rc<dyn HttpClient>,
        runtime: Rc<dyn ModuleRuntime>,
        config: &BridgeConfig,
    ) -> Self {
        Self {
            loader,
            http,
            runtime,
            shim_script_path: config.shim_script_path.clone(),
            module_path: config.module_path.clone(),
        }
    }

    /// Boots the module and starts it running.
    ///
    /// # Errors
    ///
    /// - [`BootstrapError::ScriptLoad`] if the shim script fails to load
    /// - [`BootstrapError::Fetch`] if the binary cannot be retrieved
    /// - [`BootstrapError::Instantiation`] if the environment, instantiation
    ///   or start step fails
    #[instrument(skip(self), fields(module = %self.module_path))]
    pub async fn bootstrap(&self) -> Result<ExternalModuleHandle> {
        self.loader.load_script(&self.shim_script_path).await?;

        let environment = self
            .runtime
            .create_environment()
            .map_err(|err| BootstrapError::Instantiation(err.to_string()))?;

        let bytes = self.fetch_module().await?;
        debug!(bytes = bytes.len(), "Module binary fetched");

        let instance = environment
            .instantiate(bytes)
            .await
            .map_err(|err| BootstrapError::Instantiation(err.to_string()))?;

        // Fire-and-forget: start returns before the module publishes anything.
        let registry = instance
            .start()
            .map_err(|err| BootstrapError::Instantiation(err.to_string()))?;
        debug!("Module started");

        Ok(ExternalModuleHandle {
            _instance: instance,
            registry,
        })
    }

    async fn fetch_module(&self) -> Result<Bytes> {
        let fetch_error = |message: String| BootstrapError::Fetch {
            path: self.module_path.clone(),
            message,
        };

        let response = self
            .http
            .execute(HttpRequest::new(HttpMethod::Get, self.module_path.as_str()))
            .await
            .map_err(|err| fetch_error(err.to_string()))?;

        if !response.is_success() {
            return Err(fetch_error(format!("HTTP status {}", response.status)));
        }
        if response.body.is_empty() {
            return Err(fetch_error("empty response body".to_string()));
        }
        Ok(response.body)
    }
}
