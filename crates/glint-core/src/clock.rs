#![forbid(unsafe_code)]

//! Frame clock: per-frame callbacks and delayed timers.
//!
//! [`FrameClock`] is the contract effects schedule against: one callback slot
//! per requested frame, plus one-shot timers measured in clock time. The
//! [`FrameQueue`] implementation is fully deterministic; time only moves when
//! its owner calls [`FrameQueue::advance`].
//!
//! # Dispatch order within one tick
//!
//! 1. Clock time advances by `dt`.
//! 2. Timers whose deadline is `<= now` fire, ordered by deadline, then by
//!    request order.
//! 3. Frame callbacks requested before the tick fire in request order.
//!
//! Anything requested while a batch is dispatching waits for the next tick.
//!
//! # Revocation
//!
//! [`FrameClock::cancel_frame`] removes a pending callback. If the callback
//! was already moved into the batch being dispatched, it is still revoked:
//! the dispatcher must call [`FrameQueue::begin`] before invoking each entry
//! and skip it when that returns `false`.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::time::Duration;

use web_time::Instant;

/// Opaque identifier of a scheduled callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(u64);

impl FrameHandle {
    /// Raw id, for logging.
    #[inline]
    #[must_use]
    pub fn id(self) -> u64 {
        self.0
    }
}

/// A scheduled callback. Receives the context that owns the clock.
pub type FrameCallback<C> = Box<dyn FnOnce(&mut C)>;

/// Per-frame callback scheduler with one-shot timers.
pub trait FrameClock<C> {
    /// Clock time of the current tick.
    fn now(&self) -> Duration;

    /// Number of ticks dispatched so far.
    fn frame(&self) -> u64;

    /// Run `callback` on the next frame tick.
    fn request_frame(&mut self, callback: FrameCallback<C>) -> FrameHandle;

    /// Run `callback` on the first tick at least `delay` after now.
    fn request_timeout(&mut self, delay: Duration, callback: FrameCallback<C>) -> FrameHandle;

    /// Revoke a scheduled callback. Returns `false` if it already ran, was
    /// already revoked, or never existed.
    fn cancel_frame(&mut self, handle: FrameHandle) -> bool;

    /// Callbacks scheduled but not yet run.
    fn pending(&self) -> usize;
}

/// Deterministic [`FrameClock`] driven by explicit time steps.
pub struct FrameQueue<C> {
    now: Duration,
    frame: u64,
    next_id: u64,
    frames: Vec<(FrameHandle, FrameCallback<C>)>,
    timers: BTreeMap<(Duration, FrameHandle), FrameCallback<C>>,
    deadlines: HashMap<FrameHandle, Duration>,
    in_flight: HashSet<FrameHandle>,
}

impl<C> fmt::Debug for FrameQueue<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameQueue")
            .field("now", &self.now)
            .field("frame", &self.frame)
            .field("frames", &self.frames.len())
            .field("timers", &self.timers.len())
            .field("in_flight", &self.in_flight.len())
            .finish()
    }
}

impl<C> Default for FrameQueue<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> FrameQueue<C> {
    /// Empty queue at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            frame: 0,
            next_id: 1,
            frames: Vec::new(),
            timers: BTreeMap::new(),
            deadlines: HashMap::new(),
            in_flight: HashSet::new(),
        }
    }

    fn allocate(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_id);
        self.next_id += 1;
        handle
    }

    /// Advance time by `dt` and take every callback due on this tick.
    ///
    /// The returned entries are marked in flight; check each one with
    /// [`begin`](Self::begin) immediately before invoking it.
    pub fn advance(&mut self, dt: Duration) -> Vec<(FrameHandle, FrameCallback<C>)> {
        self.now = self.now.saturating_add(dt);
        self.frame += 1;

        // Handles never reach u64::MAX, so this splits at "deadline <= now".
        let later = self.timers.split_off(&(self.now, FrameHandle(u64::MAX)));
        let due_timers = std::mem::replace(&mut self.timers, later);

        let mut batch = Vec::with_capacity(due_timers.len() + self.frames.len());
        for ((_, handle), callback) in due_timers {
            self.deadlines.remove(&handle);
            batch.push((handle, callback));
        }
        batch.append(&mut self.frames);

        self.in_flight.extend(batch.iter().map(|(handle, _)| *handle));
        batch
    }

    /// Claim an in-flight entry for execution. Returns `false` if it was
    /// revoked after [`advance`](Self::advance) took it.
    pub fn begin(&mut self, handle: FrameHandle) -> bool {
        self.in_flight.remove(&handle)
    }

    /// Earliest pending timer deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.keys().next().map(|(deadline, _)| *deadline)
    }
}

impl<C> FrameClock<C> for FrameQueue<C> {
    fn now(&self) -> Duration {
        self.now
    }

    fn frame(&self) -> u64 {
        self.frame
    }

    fn request_frame(&mut self, callback: FrameCallback<C>) -> FrameHandle {
        let handle = self.allocate();
        self.frames.push((handle, callback));
        handle
    }

    fn request_timeout(&mut self, delay: Duration, callback: FrameCallback<C>) -> FrameHandle {
        let handle = self.allocate();
        let deadline = self.now.saturating_add(delay);
        self.timers.insert((deadline, handle), callback);
        self.deadlines.insert(handle, deadline);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) -> bool {
        if self.in_flight.remove(&handle) {
            return true;
        }
        if let Some(pos) = self.frames.iter().position(|(h, _)| *h == handle) {
            self.frames.remove(pos);
            return true;
        }
        if let Some(deadline) = self.deadlines.remove(&handle) {
            return self.timers.remove(&(deadline, handle)).is_some();
        }
        false
    }

    fn pending(&self) -> usize {
        self.frames.len() + self.timers.len()
    }
}

/// Measures wall-clock deltas between frames for realtime drivers.
///
/// Deltas are capped so a stalled process does not fast-forward every
/// running effect in one tick.
#[derive(Debug, Clone)]
pub struct FramePacer {
    last: Option<Instant>,
    max_dt: Duration,
}

impl FramePacer {
    /// Default cap on a single delta (two frames at 30 Hz).
    pub const DEFAULT_MAX_DT: Duration = Duration::from_millis(66);

    /// Pacer with the default cap.
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_dt(Self::DEFAULT_MAX_DT)
    }

    /// Pacer with a custom cap.
    #[must_use]
    pub fn with_max_dt(max_dt: Duration) -> Self {
        Self { last: None, max_dt }
    }

    /// Delta since the previous call; zero on the first call.
    pub fn next_dt(&mut self) -> Duration {
        let now = Instant::now();
        let dt = self
            .last
            .map_or(Duration::ZERO, |last| now.saturating_duration_since(last));
        self.last = Some(now);
        dt.min(self.max_dt)
    }
}

impl Default for FramePacer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Log = Vec<&'static str>;

    fn dispatch(queue: &mut FrameQueue<Log>, log: &mut Log, dt: Duration) {
        for (handle, callback) in queue.advance(dt) {
            if queue.begin(handle) {
                callback(log);
            }
        }
    }

    #[test]
    fn frame_callbacks_fire_on_next_tick() {
        let mut queue: FrameQueue<Log> = FrameQueue::new();
        let mut log = Log::new();
        queue.request_frame(Box::new(|log: &mut Log| log.push("a")));
        assert!(log.is_empty());
        dispatch(&mut queue, &mut log, Duration::from_millis(16));
        assert_eq!(log, ["a"]);
        dispatch(&mut queue, &mut log, Duration::from_millis(16));
        assert_eq!(log, ["a"]);
    }

    #[test]
    fn timers_fire_at_deadline_in_order() {
        let mut queue: FrameQueue<Log> = FrameQueue::new();
        let mut log = Log::new();
        queue.request_timeout(Duration::from_millis(40), Box::new(|l: &mut Log| l.push("late")));
        queue.request_timeout(Duration::from_millis(20), Box::new(|l: &mut Log| l.push("early")));
        queue.request_timeout(Duration::from_millis(20), Box::new(|l: &mut Log| l.push("early2")));

        dispatch(&mut queue, &mut log, Duration::from_millis(19));
        assert!(log.is_empty());
        assert_eq!(queue.next_deadline(), Some(Duration::from_millis(20)));

        dispatch(&mut queue, &mut log, Duration::from_millis(1));
        assert_eq!(log, ["early", "early2"]);

        dispatch(&mut queue, &mut log, Duration::from_millis(100));
        assert_eq!(log, ["early", "early2", "late"]);
        assert_eq!(queue.pending(), 0);
    }

    #[test]
    fn timers_fire_before_frames() {
        let mut queue: FrameQueue<Log> = FrameQueue::new();
        let mut log = Log::new();
        queue.request_frame(Box::new(|l: &mut Log| l.push("frame")));
        queue.request_timeout(Duration::ZERO, Box::new(|l: &mut Log| l.push("timer")));
        dispatch(&mut queue, &mut log, Duration::ZERO);
        assert_eq!(log, ["timer", "frame"]);
    }

    #[test]
    fn cancel_pending_frame_and_timer() {
        let mut queue: FrameQueue<Log> = FrameQueue::new();
        let mut log = Log::new();
        let f = queue.request_frame(Box::new(|l: &mut Log| l.push("frame")));
        let t = queue.request_timeout(Duration::from_millis(5), Box::new(|l: &mut Log| l.push("t")));
        assert_eq!(queue.pending(), 2);
        assert!(queue.cancel_frame(f));
        assert!(queue.cancel_frame(t));
        assert!(!queue.cancel_frame(f), "second cancel is a no-op");
        dispatch(&mut queue, &mut log, Duration::from_millis(10));
        assert!(log.is_empty());
        assert_eq!(queue.pending(), 0);
    }

    #[test]
    fn cancel_after_run_returns_false() {
        let mut queue: FrameQueue<Log> = FrameQueue::new();
        let mut log = Log::new();
        let f = queue.request_frame(Box::new(|l: &mut Log| l.push("x")));
        dispatch(&mut queue, &mut log, Duration::ZERO);
        assert!(!queue.cancel_frame(f));
    }

    #[test]
    fn in_flight_entries_can_be_revoked() {
        let mut queue: FrameQueue<Log> = FrameQueue::new();
        let mut log = Log::new();
        let first = queue.request_frame(Box::new(|l: &mut Log| l.push("first")));
        let second = queue.request_frame(Box::new(|l: &mut Log| l.push("second")));

        let batch = queue.advance(Duration::from_millis(16));
        assert_eq!(batch.len(), 2);
        // Simulate the first callback revoking the second mid-dispatch.
        assert!(queue.cancel_frame(second));
        for (handle, callback) in batch {
            if queue.begin(handle) {
                callback(&mut log);
            }
        }
        assert_eq!(log, ["first"]);
        assert!(!queue.cancel_frame(first));
    }

    #[test]
    fn requests_during_dispatch_wait_for_next_tick() {
        let mut queue: FrameQueue<Log> = FrameQueue::new();
        let mut log = Log::new();
        queue.request_frame(Box::new(|l: &mut Log| l.push("one")));
        let batch = queue.advance(Duration::ZERO);
        queue.request_frame(Box::new(|l: &mut Log| l.push("two")));
        for (handle, callback) in batch {
            if queue.begin(handle) {
                callback(&mut log);
            }
        }
        assert_eq!(log, ["one"]);
        dispatch(&mut queue, &mut log, Duration::ZERO);
        assert_eq!(log, ["one", "two"]);
    }

    #[test]
    fn frame_counter_and_time_advance() {
        let mut queue: FrameQueue<Log> = FrameQueue::new();
        let mut log = Log::new();
        dispatch(&mut queue, &mut log, Duration::from_millis(16));
        dispatch(&mut queue, &mut log, Duration::from_millis(16));
        assert_eq!(queue.frame(), 2);
        assert_eq!(queue.now(), Duration::from_millis(32));
    }

    #[test]
    fn pacer_caps_deltas() {
        let mut pacer = FramePacer::with_max_dt(Duration::from_millis(5));
        assert_eq!(pacer.next_dt(), Duration::ZERO);
        std::thread::sleep(Duration::from_millis(10));
        assert_eq!(pacer.next_dt(), Duration::from_millis(5));
    }
}
