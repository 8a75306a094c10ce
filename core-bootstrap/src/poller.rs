//! Readiness Poller
//!
//! Samples a [`CapabilityRegistry`] until the module has published all three
//! entry points. The default wait is unbounded and cannot fail: a module that
//! never publishes leaves every waiter suspended. [`ReadinessPoller::wait_ready_bounded`]
//! is the opt-in variant with a deadline and a cancellation token.

use bridge_traits::{CapabilityRegistry, CapabilitySet};
use core_async::sync::CancellationToken;
use core_async::time::{sleep, Duration, Instant};
use futures::future::{select, Either};
use futures::pin_mut;
use std::future::Future;
use tracing::{debug, trace, warn};

use crate::error::ReadinessError;

/// Number of unsuccessful samples between two stall warnings.
const STALL_WARNING_EVERY: u64 = 50;

#[derive(Debug, Clone)]
pub struct ReadinessPoller {
    interval: Duration,
}

impl ReadinessPoller {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Waits until `registry` reports a complete capability set.
    ///
    /// Resolves without sleeping if the set is already complete. Otherwise
    /// samples once per interval, forever.
    pub async fn wait_ready(&self, registry: &dyn CapabilityRegistry) -> CapabilitySet {
        if let Some(capabilities) = registry.capabilities() {
            trace!("Entry points already published");
            return capabilities;
        }

        let started = Instant::now();
        let mut samples: u64 = 0;
        loop {
            sleep(self.interval).await;
            samples += 1;

            if let Some(capabilities) = registry.capabilities() {
                debug!(
                    samples,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Entry points published"
                );
                return capabilities;
            }

            if samples % STALL_WARNING_EVERY == 0 {
                warn!(
                    samples,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Module has not published its entry points yet"
                );
            }
        }
    }

    /// Like [`wait_ready`](Self::wait_ready), but gives up after `deadline`
    /// or when `cancel` fires.
    ///
    /// # Errors
    ///
    /// [`ReadinessError::TimedOut`] or [`ReadinessError::Cancelled`].
    pub async fn wait_ready_bounded(
        &self,
        registry: &dyn CapabilityRegistry,
        deadline: Duration,
        cancel: &CancellationToken,
    ) -> Result<CapabilitySet, ReadinessError> {
        with_deadline(self.wait_ready(registry), deadline, cancel).await
    }
}

/// Races `future` against a deadline and a cancellation token.
///
/// A future that is already complete wins over an expired deadline or a
/// cancelled token. Dropping the losing future does not affect anything it
/// was waiting on.
pub async fn with_deadline<F>(
    future: F,
    deadline: Duration,
    cancel: &CancellationToken,
) -> Result<F::Output, ReadinessError>
where
    F: Future,
{
    let expired = sleep(deadline);
    let cancelled = cancel.cancelled();
    pin_mut!(future, expired, cancelled);

    match select(future, select(expired, cancelled)).await {
        Either::Left((output, _)) => Ok(output),
        Either::Right((Either::Left(_), _)) => {
            debug!(deadline_ms = deadline.as_millis() as u64, "Readiness wait timed out");
            Err(ReadinessError::TimedOut(deadline))
        }
        Either::Right((Either::Right(_), _)) => {
            debug!("Readiness wait cancelled");
            Err(ReadinessError::Cancelled)
        }
    }
}
