//! WASM CancellationToken Implementation
//!
//! A token that signals cancellation to every task awaiting `cancelled()`.
//! Child tokens are cancelled together with their parent.

use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

/// Shared state for the cancellation token
struct TokenState {
    cancelled: bool,
    /// Waker slots, one per pending `cancelled()` future. Finished futures
    /// leave `None` behind for the next one to take.
    waiters: Vec<Option<Waker>>,
    children: Vec<CancellationToken>,
}

impl TokenState {
    fn register(&mut self, waker: Waker) -> usize {
        match self.waiters.iter().position(Option::is_none) {
            Some(index) => {
                self.waiters[index] = Some(waker);
                index
            }
            None => {
                self.waiters.push(Some(waker));
                self.waiters.len() - 1
            }
        }
    }

    fn adopt(&mut self, child: CancellationToken) {
        self.children.retain(|existing| !existing.is_detached());
        self.children.push(child);
    }
}

/// A token that can be used to signal cancellation across tasks.
///
/// # Examples
///
/// ```ignore
/// use core_async::sync::CancellationToken;
///
/// let token = CancellationToken::new();
/// let child = token.child_token();
/// token.cancel();
/// assert!(child.is_cancelled());
/// ```
#[derive(Clone)]
pub struct CancellationToken {
    state: Rc<RefCell<TokenState>>,
}

impl CancellationToken {
    /// Creates a new, uncancelled token.
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(TokenState {
                cancelled: false,
                waiters: Vec::new(),
                children: Vec::new(),
            })),
        }
    }

    /// Cancels the token, its children, and wakes all waiting tasks.
    pub fn cancel(&self) {
        let mut state = self.state.borrow_mut();
        if state.cancelled {
            return;
        }
        state.cancelled = true;

        let waiters = std::mem::take(&mut state.waiters);
        let children = std::mem::take(&mut state.children);
        drop(state); // Drop borrow before waking

        for waker in waiters.into_iter().flatten() {
            waker.wake();
        }
        for child in children {
            child.cancel();
        }
    }

    /// Returns `true` if cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.state.borrow().cancelled
    }

    /// A child nobody else holds, with no children of its own, can no
    /// longer observe a cancel.
    fn is_detached(&self) -> bool {
        let state = self.state.borrow();
        state.cancelled || (Rc::strong_count(&self.state) == 1 && state.children.is_empty())
    }

    /// Waits for the token to be cancelled.
    ///
    /// Returns immediately if the token is already cancelled.
    pub async fn cancelled(&self) {
        CancelledFuture {
            token: self.clone(),
            slot: None,
        }
        .await
    }

    /// Creates a child token that is cancelled when this token is cancelled.
    /// Cancelling the child does not affect the parent.
    pub fn child_token(&self) -> CancellationToken {
        let child = CancellationToken::new();
        let mut state = self.state.borrow_mut();
        if state.cancelled {
            drop(state);
            child.cancel();
        } else {
            state.adopt(child.clone());
        }
        child
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancellationToken")
            .field("is_cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Future returned by `CancellationToken::cancelled()`.
struct CancelledFuture {
    token: CancellationToken,
    slot: Option<usize>,
}

impl Future for CancelledFuture {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let token = self.token.clone();
        let mut state = token.state.borrow_mut();

        if state.cancelled {
            return Poll::Ready(());
        }

        match self.slot {
            Some(index) => match state.waiters.get_mut(index) {
                Some(Some(waker)) if waker.will_wake(cx.waker()) => {}
                Some(entry) => *entry = Some(cx.waker().clone()),
                None => unreachable!("waker slot removed while future pending"),
            },
            None => {
                let index = state.register(cx.waker().clone());
                self.slot = Some(index);
            }
        }

        Poll::Pending
    }
}

impl Drop for CancelledFuture {
    fn drop(&mut self) {
        if let Some(index) = self.slot {
            if let Ok(mut state) = self.token.state.try_borrow_mut() {
                if let Some(entry) = state.waiters.get_mut(index) {
                    *entry = None;
                }
            }
        }
    }
}
