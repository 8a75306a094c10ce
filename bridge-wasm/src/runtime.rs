//! Runtime for modules built with Go's `GOOS=js GOARCH=wasm` toolchain.
//!
//! The `wasm_exec.js` shim defines a global `Go` class. An instance of it
//! provides the import object the module is instantiated against, and its
//! `run` method starts the module's `main`. `main` publishes the entry points
//! on the global object and then blocks forever, so the promise `run` returns
//! only settles if the module exits.

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result as BridgeResult},
    module::{CapabilityRegistry, ModuleEnvironment, ModuleInstance, ModuleRuntime},
};
use bytes::Bytes;
use core_runtime::config::EntryPointNames;
use js_sys::{Object, Promise, Reflect, WebAssembly};
use std::rc::Rc;
use tracing::{error, info};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use crate::error::{js_error, js_message};
use crate::registry::GlobalCapabilityRegistry;

const GO_CLASS: &str = "Go";

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = Go)]
    type GoShim;

    #[wasm_bindgen(constructor, js_class = "Go", catch)]
    fn new() -> Result<GoShim, JsValue>;

    #[wasm_bindgen(method, getter, js_name = importObject)]
    fn import_object(this: &GoShim) -> Object;

    #[wasm_bindgen(method)]
    fn run(this: &GoShim, instance: &WebAssembly::Instance) -> Promise;
}

/// [`ModuleRuntime`] over the `Go` class from `wasm_exec.js`.
pub struct GoRuntime {
    entry_points: EntryPointNames,
}

impl GoRuntime {
    /// The started module is expected to publish `entry_points` globally.
    pub fn new(entry_points: EntryPointNames) -> Self {
        Self { entry_points }
    }
}

impl ModuleRuntime for GoRuntime {
    fn create_environment(&self) -> BridgeResult<Box<dyn ModuleEnvironment>> {
        let defined = Reflect::has(&js_sys::global(), &JsValue::from_str(GO_CLASS))
            .map_err(|err| js_error("look up Go", err))?;
        if !defined {
            return Err(BridgeError::NotAvailable(format!(
                "global {GO_CLASS} class (was wasm_exec.js loaded?)"
            )));
        }

        let go = GoShim::new().map_err(|err| js_error("new Go()", err))?;
        Ok(Box::new(GoEnvironment {
            go: Rc::new(go),
            entry_points: self.entry_points.clone(),
        }))
    }
}

struct GoEnvironment {
    go: Rc<GoShim>,
    entry_points: EntryPointNames,
}

#[async_trait(?Send)]
impl ModuleEnvironment for GoEnvironment {
    async fn instantiate(&self, bytes: Bytes) -> BridgeResult<Box<dyn ModuleInstance>> {
        let source = WebAssembly::instantiate_buffer(&bytes, &self.go.import_object());
        let result = JsFuture::from(source)
            .await
            .map_err(|err| js_error("WebAssembly.instantiate", err))?;

        let instance = Reflect::get(&result, &JsValue::from_str("instance"))
            .map_err(|err| js_error("read instance", err))?
            .dyn_into::<WebAssembly::Instance>()
            .map_err(|_| {
                BridgeError::OperationFailed("instantiate did not return an Instance".to_string())
            })?;

        Ok(Box::new(GoInstance {
            go: Rc::clone(&self.go),
            instance,
            entry_points: self.entry_points.clone(),
        }))
    }
}

struct GoInstance {
    go: Rc<GoShim>,
    instance: WebAssembly::Instance,
    entry_points: EntryPointNames,
}

impl ModuleInstance for GoInstance {
    fn start(&self) -> BridgeResult<Rc<dyn CapabilityRegistry>> {
        let exited = JsFuture::from(self.go.run(&self.instance));
        core_async::spawn_local(async move {
            match exited.await {
                Ok(_) => info!("Module exited"),
                Err(err) => error!(error = %js_message(&err), "Module terminated with an error"),
            }
        });

        let registry: Rc<dyn CapabilityRegistry> =
            Rc::new(GlobalCapabilityRegistry::new(self.entry_points.clone()));
        Ok(registry)
    }
}
