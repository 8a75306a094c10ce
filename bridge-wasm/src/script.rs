//! `<script>` injection into the page.

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result as BridgeResult},
    script::ScriptHost,
};
use js_sys::Promise;
use tracing::debug;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, HtmlScriptElement};

use crate::error::js_error;

/// Script host backed by the page's `document`.
pub struct DocumentScriptHost {
    document: Document,
}

impl DocumentScriptHost {
    /// Binds to the current window's document.
    pub fn new() -> BridgeResult<Self> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| BridgeError::NotAvailable("document".to_string()))?;
        Ok(Self { document })
    }

    fn create_script(&self, url: &str) -> BridgeResult<HtmlScriptElement> {
        let script = self
            .document
            .create_element("script")
            .map_err(|err| js_error("create script element", err))?
            .dyn_into::<HtmlScriptElement>()
            .map_err(|_| BridgeError::OperationFailed("not a script element".to_string()))?;
        script.set_src(url);
        Ok(script)
    }
}

#[async_trait(?Send)]
impl ScriptHost for DocumentScriptHost {
    fn has_script(&self, url: &str) -> bool {
        // Compared as written in the attribute, not as resolved by `src`.
        let scripts = self.document.scripts();
        (0..scripts.length())
            .filter_map(|index| scripts.item(index))
            .any(|script| script.get_attribute("src").as_deref() == Some(url))
    }

    async fn inject_script(&self, url: &str) -> BridgeResult<()> {
        let script = self.create_script(url)?;

        // Handlers are attached before the element enters the document.
        let loaded = Promise::new(&mut |resolve, reject| {
            script.set_onload(Some(&resolve));
            script.set_onerror(Some(&reject));
        });

        let head = self
            .document
            .head()
            .ok_or_else(|| BridgeError::NotAvailable("document.head".to_string()))?;
        head.append_child(&script)
            .map_err(|err| js_error("append script", err))?;
        debug!(url, "Script element appended");

        let outcome = JsFuture::from(loaded).await;
        script.set_onload(None);
        script.set_onerror(None);

        outcome
            .map(|_| ())
            .map_err(|_| BridgeError::OperationFailed(format!("script {url} failed to load")))
    }
}
