//! Loader lifecycle state.

use std::cell::Cell;
use tracing::{debug, warn};

/// Lifecycle of one bridge context.
///
/// `Uninitialized → Loading → Ready | Failed`. `Ready` and `Failed` are
/// terminal; there is no reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoaderState {
    #[default]
    Uninitialized,
    Loading,
    Ready,
    Failed,
}

impl LoaderState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, LoaderState::Ready | LoaderState::Failed)
    }

    fn can_advance_to(&self, next: LoaderState) -> bool {
        matches!(
            (self, next),
            (LoaderState::Uninitialized, LoaderState::Loading)
                | (LoaderState::Loading, LoaderState::Ready)
                | (LoaderState::Loading, LoaderState::Failed)
        )
    }
}

/// Single-threaded holder that only lets the state move forward.
#[derive(Debug, Default)]
pub struct StateCell {
    state: Cell<LoaderState>,
}

impl StateCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> LoaderState {
        self.state.get()
    }

    /// Moves to `next` if that is a forward transition. Returns whether the
    /// state changed.
    pub fn advance(&self, next: LoaderState) -> bool {
        let current = self.state.get();
        if !current.can_advance_to(next) {
            warn!(from = ?current, to = ?next, "Rejected backwards loader state transition");
            return false;
        }
        self.state.set(next);
        debug!(from = ?current, to = ?next, "Loader state changed");
        true
    }
}
