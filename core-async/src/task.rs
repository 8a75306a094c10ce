//! Local task spawning.
//!
//! Futures handled by the bridge hold `Rc` state and browser handles, so they
//! are never `Send`. Both platforms therefore spawn onto the current thread:
//!
//! - Native: `tokio::task::spawn_local`, which must be called from inside a
//!   `tokio::task::LocalSet`.
//! - WASM: `wasm_bindgen_futures::spawn_local` on the page event loop.
//!
//! Spawned tasks are detached. Their output is observed through whatever
//! shared state the future itself writes to.

#[cfg(not(target_arch = "wasm32"))]
pub use tokio::task::yield_now;

/// Spawns a detached `!Send` future on the current thread.
///
/// # Panics
///
/// On native targets this panics when called outside of a `LocalSet`.
#[cfg(not(target_arch = "wasm32"))]
pub fn spawn_local<F>(future: F)
where
    F: std::future::Future<Output = ()> + 'static,
{
    // The handle is dropped on purpose; dropping does not abort the task.
    let _ = tokio::task::spawn_local(future);
}

/// Spawns a detached `!Send` future on the browser event loop.
#[cfg(target_arch = "wasm32")]
pub fn spawn_local<F>(future: F)
where
    F: std::future::Future<Output = ()> + 'static,
{
    wasm_bindgen_futures::spawn_local(future);
}

/// Yields execution back to the event loop once.
#[cfg(target_arch = "wasm32")]
pub async fn yield_now() {
    crate::time::sleep(crate::time::Duration::from_millis(0)).await;
}
