//! Runtime-agnostic async abstraction layer for the WasmFetch bridge.
//!
//! The bridge runs on a single-threaded cooperative scheduler. In the browser
//! that is the page event loop driven through `wasm-bindgen-futures`; natively
//! (tests, tooling) it is a current-thread Tokio runtime with a `LocalSet`.
//! Every crate in the workspace goes through this crate instead of naming
//! Tokio or `gloo-timers` directly.
//!
//! # Modules
//!
//! - `task`: local (non-`Send`) task spawning
//! - `time`: sleep and a monotonic `Instant`
//! - `sync`: `CancellationToken`
//!
//! # Examples
//!
//! ```ignore
//! use core_async::time::{sleep, Duration};
//!
//! async fn example() {
//!     core_async::task::spawn_local(async {
//!         sleep(Duration::from_millis(100)).await;
//!     });
//! }
//! ```

pub mod sync;
pub mod task;
pub mod time;

// WASM-specific implementations
#[cfg(target_arch = "wasm32")]
mod wasm;

pub use task::spawn_local;
pub use time::{sleep, Duration, Instant};
