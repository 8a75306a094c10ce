//! Synchronization primitives.
//!
//! - On native platforms: `tokio_util::sync::CancellationToken`
//! - On WASM: a single-threaded token built on `Rc<RefCell<_>>`
//!
//! Both expose `new`, `cancel`, `is_cancelled`, `child_token` and an awaitable
//! `cancelled()`.
//!
//! # Examples
//!
//! ```ignore
//! use core_async::sync::CancellationToken;
//!
//! async fn example(token: CancellationToken) {
//!     token.cancelled().await;
//! }
//! ```

#[cfg(not(target_arch = "wasm32"))]
pub use tokio_util::sync::CancellationToken;

#[cfg(target_arch = "wasm32")]
pub use crate::wasm::CancellationToken;
