#![forbid(unsafe_code)]

//! Frame-driven runs bound to nodes.
//!
//! A [`RunHandle`] identifies one run of an effect on one node and tracks
//! the frame callback it currently has pending. The [`RunRegistry`] keeps
//! at most one active run per node: registering a new run hands back the
//! one it replaces so the caller can cancel it.
//!
//! Cancelling a run revokes its pending frame, so a superseded run never
//! writes again, even when its callback is already in the batch being
//! dispatched on the current tick.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use glint_core::cancellation::{CancellationSource, CancellationToken};
use glint_core::clock::{FrameCallback, FrameClock, FrameHandle};
use glint_render::NodeId;

/// Identifier of a run, unique within one registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunId(u64);

impl RunId {
    /// Raw id, for logging.
    #[inline]
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run#{}", self.0)
    }
}

struct RunInner {
    id: RunId,
    node: NodeId,
    kind: &'static str,
    pending: Cell<Option<FrameHandle>>,
    cancel: CancellationSource,
    state: RefCell<Option<Rc<dyn Any>>>,
}

/// Shared handle to one run. Clones refer to the same run.
#[derive(Clone)]
pub struct RunHandle {
    inner: Rc<RunInner>,
}

impl fmt::Debug for RunHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunHandle")
            .field("id", &self.inner.id)
            .field("node", &self.inner.node)
            .field("kind", &self.inner.kind)
            .field("pending", &self.inner.pending.get())
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

impl RunHandle {
    fn new(id: RunId, node: NodeId, kind: &'static str) -> Self {
        Self {
            inner: Rc::new(RunInner {
                id,
                node,
                kind,
                pending: Cell::new(None),
                cancel: CancellationSource::new(),
                state: RefCell::new(None),
            }),
        }
    }

    #[must_use]
    pub fn id(&self) -> RunId {
        self.inner.id
    }

    #[must_use]
    pub fn node(&self) -> NodeId {
        self.inner.node
    }

    /// Effect name, for logging and counters.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.inner.kind
    }

    /// The callback this run has scheduled and not yet run.
    #[must_use]
    pub fn pending(&self) -> Option<FrameHandle> {
        self.inner.pending.get()
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancel.is_cancelled()
    }

    /// Token observing this run's cancellation.
    #[must_use]
    pub fn token(&self) -> CancellationToken {
        self.inner.cancel.token()
    }

    /// Request the next frame for this run. Does nothing once cancelled.
    pub fn schedule<H>(
        &self,
        clock: &mut dyn FrameClock<H>,
        callback: FrameCallback<H>,
    ) -> Option<FrameHandle> {
        if self.is_cancelled() {
            return None;
        }
        let handle = clock.request_frame(callback);
        self.inner.pending.set(Some(handle));
        Some(handle)
    }

    /// Request a callback after `delay` for this run. Does nothing once
    /// cancelled.
    pub fn schedule_after<H>(
        &self,
        clock: &mut dyn FrameClock<H>,
        delay: Duration,
        callback: FrameCallback<H>,
    ) -> Option<FrameHandle> {
        if self.is_cancelled() {
            return None;
        }
        let handle = clock.request_timeout(delay, callback);
        self.inner.pending.set(Some(handle));
        Some(handle)
    }

    /// Cancel the run, revoke its pending callback and drop its attached
    /// state. Returns `true` only for the call that actually cancelled it.
    pub fn cancel<H>(&self, clock: &mut dyn FrameClock<H>) -> bool {
        let first = self.inner.cancel.cancel();
        if let Some(handle) = self.inner.pending.take() {
            clock.cancel_frame(handle);
        }
        let state = self.inner.state.borrow_mut().take();
        drop(state);
        first
    }

    /// Attach the effect's run state so other calls can reach it through
    /// the registry. The state must not hold this handle.
    pub fn set_state(&self, state: Rc<dyn Any>) {
        *self.inner.state.borrow_mut() = Some(state);
    }

    /// The attached state, if it is a `T`.
    #[must_use]
    pub fn state<T: Any>(&self) -> Option<Rc<T>> {
        let state = self.inner.state.borrow().clone()?;
        state.downcast::<T>().ok()
    }

    /// Forget the pending callback without revoking it (the run ended on
    /// its own).
    pub fn settle(&self) {
        self.inner.pending.set(None);
    }
}

/// Node to active run map.
#[derive(Debug, Default)]
pub struct RunRegistry {
    next_id: u64,
    runs: HashMap<NodeId, RunHandle>,
}

impl RunRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fresh run of `kind` on `node`. Returns it together with
    /// the run it replaced, which the caller must cancel.
    pub fn begin(&mut self, node: NodeId, kind: &'static str) -> (RunHandle, Option<RunHandle>) {
        self.next_id += 1;
        let run = RunHandle::new(RunId(self.next_id), node, kind);
        let previous = self.runs.insert(node, run.clone());
        (run, previous)
    }

    /// The active run on `node`.
    #[must_use]
    pub fn active(&self, node: NodeId) -> Option<&RunHandle> {
        self.runs.get(&node)
    }

    /// Unregister `run` if it is still the active run on its node.
    pub fn finish(&mut self, run: &RunHandle) -> bool {
        match self.runs.get(&run.node()) {
            Some(active) if active.id() == run.id() => {
                self.runs.remove(&run.node());
                true
            }
            _ => false,
        }
    }

    /// Unregister and return whatever run is active on `node`.
    pub fn take(&mut self, node: NodeId) -> Option<RunHandle> {
        self.runs.remove(&node)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Active runs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &RunHandle> {
        self.runs.values()
    }
}
