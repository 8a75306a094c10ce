//! # Bootstrap Core
//!
//! The pieces that bring the external module from "not on the page" to
//! "entry points callable", leaf-first:
//!
//! - [`loader::DependencyLoader`] injects the startup shim script once.
//! - [`bootstrapper::ModuleBootstrapper`] fetches, instantiates and starts the
//!   module binary, returning an [`ExternalModuleHandle`].
//! - [`poller::ReadinessPoller`] samples the handle's registry until all three
//!   entry points are published.
//!
//! None of these memoize anything. Running the sequence exactly once and
//! sharing its outcome is the facade's responsibility (`core-service`).
//!
//! ## Platform access
//!
//! Everything page-specific comes in through `bridge-traits`. In the browser
//! those are the `bridge-wasm` adapters; in tests they are the fakes from
//! [`testing`] (enabled with the `testing` feature).

pub mod bootstrapper;
pub mod error;
pub mod loader;
pub mod poller;
pub mod registry;
pub mod state;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use bootstrapper::{ExternalModuleHandle, ModuleBootstrapper};
pub use error::{BootstrapError, ReadinessError, Result};
pub use loader::DependencyLoader;
pub use poller::{with_deadline, ReadinessPoller};
pub use registry::LocalRegistry;
pub use state::{LoaderState, StateCell};
