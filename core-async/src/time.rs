//! Time-related abstractions.
//!
//! - On native platforms: `tokio::time` (honours a paused test clock)
//! - On WASM: `gloo-timers` for sleeping, `performance.now()` for `Instant`
//!
//! # Examples
//!
//! ```ignore
//! use core_async::time::{sleep, Duration, Instant};
//!
//! async fn example() {
//!     let start = Instant::now();
//!     sleep(Duration::from_millis(100)).await;
//!     tracing::debug!(elapsed_ms = start.elapsed().as_millis() as u64, "woke up");
//! }
//! ```

pub use std::time::Duration;

// ============================================================================
// Native Implementation (Tokio)
// ============================================================================

#[cfg(not(target_arch = "wasm32"))]
pub use tokio::time::{sleep, Instant};

// ============================================================================
// WASM Implementation
// ============================================================================

/// Sleeps for the specified duration using the browser's `setTimeout`.
#[cfg(target_arch = "wasm32")]
pub async fn sleep(duration: Duration) {
    gloo_timers::future::sleep(duration).await
}

/// A monotonic instant backed by `performance.now()`.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Instant {
    millis: u64,
}

#[cfg(target_arch = "wasm32")]
impl Instant {
    /// Returns the current instant. Falls back to zero when the page has no
    /// `window` or `performance` object (e.g. inside a worker without one).
    pub fn now() -> Self {
        let millis = web_sys::window()
            .and_then(|window| window.performance())
            .map(|performance| performance.now() as u64)
            .unwrap_or_default();
        Self { millis }
    }

    /// Returns the amount of time elapsed since this instant.
    pub fn elapsed(&self) -> Duration {
        Self::now().saturating_duration_since(*self)
    }

    /// Returns the duration since `earlier`, or zero if `earlier` is later.
    pub fn saturating_duration_since(&self, earlier: Instant) -> Duration {
        Duration::from_millis(self.millis.saturating_sub(earlier.millis))
    }
}
