#![forbid(unsafe_code)]

//! Single-resolution completion signals.
//!
//! [`completion`] returns a [`Resolver`] for the producer and a
//! [`CompletionSignal`] for observers. `Resolver::resolve` consumes the
//! resolver, so a signal resolves at most once. Dropping a resolver without
//! resolving it abandons the signal: it stays pending forever, which is how
//! superseded runs end.
//!
//! `CompletionSignal` implements [`Future`], and can also be polled with
//! [`is_resolved`](CompletionSignal::is_resolved) from frame-driven code.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard};
use std::task::{Context, Poll, Waker};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Pending,
    Resolved,
    Abandoned,
}

#[derive(Debug)]
struct State {
    status: Status,
    wakers: Vec<Waker>,
}

type Shared = Arc<Mutex<State>>;

fn lock(shared: &Shared) -> MutexGuard<'_, State> {
    shared.lock().unwrap_or_else(|e| e.into_inner())
}

/// Create a connected resolver/signal pair.
#[must_use]
pub fn completion() -> (Resolver, CompletionSignal) {
    let shared = Arc::new(Mutex::new(State {
        status: Status::Pending,
        wakers: Vec::new(),
    }));
    (
        Resolver {
            shared: Some(Arc::clone(&shared)),
        },
        CompletionSignal { shared },
    )
}

/// Producer side of a completion signal.
pub struct Resolver {
    shared: Option<Shared>,
}

impl Resolver {
    /// Resolve the signal and wake every waiting task.
    pub fn resolve(mut self) {
        if let Some(shared) = self.shared.take() {
            let wakers = {
                let mut state = lock(&shared);
                state.status = Status::Resolved;
                std::mem::take(&mut state.wakers)
            };
            for waker in wakers {
                waker.wake();
            }
        }
    }
}

impl Drop for Resolver {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.take() {
            let mut state = lock(&shared);
            if state.status == Status::Pending {
                state.status = Status::Abandoned;
                state.wakers.clear();
            }
        }
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("armed", &self.shared.is_some())
            .finish()
    }
}

/// Observer side of a completion signal. Cheap to clone.
#[derive(Clone)]
pub struct CompletionSignal {
    shared: Shared,
}

impl CompletionSignal {
    /// A signal that is already resolved.
    #[must_use]
    pub fn resolved() -> Self {
        let (resolver, signal) = completion();
        resolver.resolve();
        signal
    }

    /// Whether the producer resolved the signal.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        lock(&self.shared).status == Status::Resolved
    }

    /// Whether the producer went away without resolving.
    #[must_use]
    pub fn is_abandoned(&self) -> bool {
        lock(&self.shared).status == Status::Abandoned
    }

    /// Neither resolved nor abandoned yet.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        lock(&self.shared).status == Status::Pending
    }
}

impl fmt::Debug for CompletionSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionSignal")
            .field("status", &lock(&self.shared).status)
            .finish()
    }
}

impl Future for CompletionSignal {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let mut state = lock(&self.shared);
        match state.status {
            Status::Resolved => Poll::Ready(()),
            Status::Pending => {
                if !state.wakers.iter().any(|w| w.will_wake(cx.waker())) {
                    state.wakers.push(cx.waker().clone());
                }
                Poll::Pending
            }
            Status::Abandoned => Poll::Pending,
        }
    }
}
