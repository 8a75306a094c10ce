//! Page Script Abstraction
//!
//! The page document as seen by the dependency loader: it can report whether
//! a `<script>` element for a URL is already present and can inject a new one.

use async_trait::async_trait;

use crate::error::Result;

/// Access to the hosting page's script elements.
#[async_trait(?Send)]
pub trait ScriptHost {
    /// Returns `true` if a script element with this exact `src` exists.
    fn has_script(&self, url: &str) -> bool;

    /// Creates and appends a script element for `url`, resolving once the
    /// browser reports it loaded.
    ///
    /// # Errors
    ///
    /// Returns error if the element cannot be created or the script fails to load.
    async fn inject_script(&self, url: &str) -> Result<()>;
}
