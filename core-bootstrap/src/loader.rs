//! Dependency Loader
//!
//! Injects the startup shim into the page at most once per URL.

use bridge_traits::ScriptHost;
use std::rc::Rc;
use tracing::debug;

use crate::error::{BootstrapError, Result};

pub struct DependencyLoader {
    host: Rc<dyn ScriptHost>,
}

impl DependencyLoader {
    pub fn new(host: Rc<dyn ScriptHost>) -> Self {
        Self { host }
    }

    /// Ensures a script element for `url` exists and has loaded.
    ///
    /// If the page already has an element with this `src`, resolves
    /// immediately without waiting for it or injecting a second one.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::ScriptLoad`] if the injected script fails to load.
    pub async fn load_script(&self, url: &str) -> Result<()> {
        if self.host.has_script(url) {
            debug!(url, "Script already present, skipping injection");
            return Ok(());
        }

        debug!(url, "Injecting script");
        self.host
            .inject_script(url)
            .await
            .map_err(|err| BootstrapError::ScriptLoad {
                url: url.to_string(),
                message: err.to_string(),
            })?;
        debug!(url, "Script loaded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeDocument;

    #[tokio::test(flavor = "current_thread")]
    async fn test_injects_missing_script_once() {
        let document = Rc::new(FakeDocument::new());
        let loader = DependencyLoader::new(document.clone());

        loader.load_script("/wasm_exec.js").await.unwrap();
        loader.load_script("/wasm_exec.js").await.unwrap();

        assert_eq!(document.injection_count(), 1);
        assert_eq!(document.scripts(), vec!["/wasm_exec.js".to_string()]);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_existing_script_is_not_duplicated() {
        let document = Rc::new(FakeDocument::new().with_existing_script("/wasm_exec.js"));
        let loader = DependencyLoader::new(document.clone());

        loader.load_script("/wasm_exec.js").await.unwrap();

        assert_eq!(document.injection_count(), 0);
        assert_eq!(document.scripts().len(), 1);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_distinct_urls_each_injected() {
        let document = Rc::new(FakeDocument::new());
        let loader = DependencyLoader::new(document.clone());

        loader.load_script("/a.js").await.unwrap();
        loader.load_script("/b.js").await.unwrap();

        assert_eq!(document.injection_count(), 2);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_load_failure_is_script_load_error() {
        let document = Rc::new(FakeDocument::new().failing_on("/wasm_exec.js"));
        let loader = DependencyLoader::new(document);

        let err = loader.load_script("/wasm_exec.js").await.unwrap_err();

        match err {
            BootstrapError::ScriptLoad { url, message } => {
                assert_eq!(url, "/wasm_exec.js");
                assert!(message.contains("error event"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
