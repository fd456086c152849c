#![forbid(unsafe_code)]

//! Interpolation engine: property tweens over surface nodes.
//!
//! A [`TweenRequest`] names a target node, one or more property tracks, a
//! duration and an [`Easing`]. The engine samples every track each time it
//! advances and writes the values to the surface.
//!
//! # Completion
//!
//! The completion callback passed to [`InterpolationEngine::animate`] fires
//! exactly once, on the first advance after the tween
//!
//! - reaches its duration,
//! - is stopped, or
//! - finds its target node gone from the surface.
//!
//! Completions are returned from `advance` rather than invoked, so the host
//! can hand them `&mut` access to itself.

use std::fmt;
use std::time::Duration;

use glint_core::animation::{Animation, Easing, Fade, Keyframes};
use glint_render::{NodeId, Property, Surface};

/// Callback fired when a tween finishes.
pub type TweenCompletion<H> = Box<dyn FnOnce(&mut H)>;

/// Opaque identifier of a running tween.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TweenHandle(u64);

impl TweenHandle {
    /// Raw id, for logging.
    #[inline]
    #[must_use]
    pub fn id(self) -> u64 {
        self.0
    }
}

/// How one property moves over the tween.
#[derive(Debug, Clone, PartialEq)]
pub enum Track {
    /// From the property's value when the tween first advances, to this value.
    To(f32),
    /// Through these values, with the easing applied per segment.
    Keyframes(Keyframes),
}

/// Description of a tween.
#[derive(Debug, Clone, PartialEq)]
pub struct TweenRequest {
    pub target: NodeId,
    pub tracks: Vec<(Property, Track)>,
    pub duration: Duration,
    pub easing: Easing,
}

impl TweenRequest {
    /// Tween of `target` over `duration` with no tracks and linear easing.
    #[must_use]
    pub fn new(target: NodeId, duration: Duration) -> Self {
        Self {
            target,
            tracks: Vec::new(),
            duration,
            easing: Easing::Linear,
        }
    }

    /// Set the easing curve.
    #[must_use]
    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Animate `property` from its current value to `value`.
    #[must_use]
    pub fn to(mut self, property: Property, value: f32) -> Self {
        self.tracks.push((property, Track::To(value)));
        self
    }

    /// Animate `property` through `keyframes`.
    #[must_use]
    pub fn keyframes(mut self, property: Property, keyframes: Keyframes) -> Self {
        self.tracks.push((property, Track::Keyframes(keyframes)));
        self
    }
}

/// Tween scheduler contract.
pub trait InterpolationEngine<H> {
    /// Start a tween. `on_complete` fires exactly once (see module docs).
    fn animate(
        &mut self,
        request: TweenRequest,
        on_complete: Option<TweenCompletion<H>>,
    ) -> TweenHandle;

    /// Stop a tween where it is. Its completion is returned by the next
    /// [`advance`](Self::advance). Returns `false` if it already finished.
    fn stop(&mut self, handle: TweenHandle) -> bool;

    /// Advance every tween by `dt`, write values to `surface`, and return
    /// the completions now due.
    fn advance(&mut self, dt: Duration, surface: &mut dyn Surface) -> Vec<TweenCompletion<H>>;

    /// Tweens still running plus completions waiting to be returned.
    fn active(&self) -> usize;
}

enum Resolved {
    Pending(f32),
    Ready(Keyframes),
}

struct Running<H> {
    handle: TweenHandle,
    target: NodeId,
    tracks: Vec<(Property, Resolved)>,
    fade: Fade,
    easing: Easing,
    on_complete: Option<TweenCompletion<H>>,
}

/// Reference [`InterpolationEngine`].
pub struct Tweens<H> {
    next_id: u64,
    running: Vec<Running<H>>,
    stopped: Vec<TweenCompletion<H>>,
}

impl<H> fmt::Debug for Tweens<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tweens")
            .field("running", &self.running.len())
            .field("stopped", &self.stopped.len())
            .finish()
    }
}

impl<H> Default for Tweens<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> Tweens<H> {
    /// Engine with no tweens.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 1,
            running: Vec::new(),
            stopped: Vec::new(),
        }
    }

    /// Whether `handle` is still running.
    #[must_use]
    pub fn is_running(&self, handle: TweenHandle) -> bool {
        self.running.iter().any(|t| t.handle == handle)
    }
}

impl<H> InterpolationEngine<H> for Tweens<H> {
    fn animate(
        &mut self,
        request: TweenRequest,
        on_complete: Option<TweenCompletion<H>>,
    ) -> TweenHandle {
        let handle = TweenHandle(self.next_id);
        self.next_id += 1;
        tracing::trace!(
            target: "glint.tween",
            tween = handle.0,
            node = %request.target,
            tracks = request.tracks.len(),
            duration_ms = request.duration.as_millis() as u64,
            easing = %request.easing,
            "tween started"
        );
        let tracks = request
            .tracks
            .into_iter()
            .map(|(property, track)| {
                let resolved = match track {
                    Track::To(value) => Resolved::Pending(value),
                    Track::Keyframes(keyframes) => Resolved::Ready(keyframes),
                };
                (property, resolved)
            })
            .collect();
        self.running.push(Running {
            handle,
            target: request.target,
            tracks,
            fade: Fade::new(request.duration),
            easing: request.easing,
            on_complete,
        });
        handle
    }

    fn stop(&mut self, handle: TweenHandle) -> bool {
        let Some(pos) = self.running.iter().position(|t| t.handle == handle) else {
            return false;
        };
        let mut tween = self.running.remove(pos);
        tracing::trace!(target: "glint.tween", tween = handle.0, "tween stopped");
        if let Some(done) = tween.on_complete.take() {
            self.stopped.push(done);
        }
        true
    }

    fn advance(&mut self, dt: Duration, surface: &mut dyn Surface) -> Vec<TweenCompletion<H>> {
        let mut due = std::mem::take(&mut self.stopped);
        self.running.retain_mut(|tween| {
            if !surface.contains(tween.target) {
                tracing::trace!(
                    target: "glint.tween",
                    tween = tween.handle.0,
                    node = %tween.target,
                    "target gone, finishing early"
                );
                due.extend(tween.on_complete.take());
                return false;
            }

            tween.fade.tick(dt);
            let progress = tween.fade.progress();
            for (property, track) in &mut tween.tracks {
                if let Resolved::Pending(to) = *track {
                    let from = surface.property(tween.target, *property).unwrap_or(0.0);
                    *track = Resolved::Ready(Keyframes::between(from, to));
                }
                if let Resolved::Ready(keyframes) = track {
                    let value = keyframes.sample(progress, tween.easing);
                    surface.set_property(tween.target, *property, value);
                }
            }

            if tween.fade.is_complete() {
                due.extend(tween.on_complete.take());
                false
            } else {
                true
            }
        });
        due
    }

    fn active(&self) -> usize {
        self.running.len() + self.stopped.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_render::{MemorySurface, NodeKind};

    type Log = Vec<&'static str>;

    fn finish(engine: &mut Tweens<Log>, surface: &mut MemorySurface, log: &mut Log, dt: Duration) {
        for done in engine.advance(dt, surface) {
            done(log);
        }
    }

    fn node(surface: &mut MemorySurface) -> NodeId {
        let root = surface.root();
        let n = surface.create_node(NodeKind::Particle);
        surface.attach(root, n);
        n
    }

    #[test]
    fn to_track_starts_from_current_value() {
        let mut s = MemorySurface::new();
        let n = node(&mut s);
        s.set_property(n, Property::Left, 10.0);
        let mut engine: Tweens<Log> = Tweens::new();
        engine.animate(
            TweenRequest::new(n, Duration::from_millis(100)).to(Property::Left, 20.0),
            None,
        );
        let mut log = Log::new();
        finish(&mut engine, &mut s, &mut log, Duration::from_millis(50));
        let left = s.property(n, Property::Left).unwrap();
        assert!((left - 15.0).abs() < 1e-4, "left = {left}");
        finish(&mut engine, &mut s, &mut log, Duration::from_millis(50));
        assert_eq!(s.property(n, Property::Left), Some(20.0));
        assert_eq!(engine.active(), 0);
    }

    #[test]
    fn completion_fires_once_at_end() {
        let mut s = MemorySurface::new();
        let n = node(&mut s);
        let mut engine: Tweens<Log> = Tweens::new();
        engine.animate(
            TweenRequest::new(n, Duration::from_millis(30)).to(Property::Opacity, 0.0),
            Some(Box::new(|l: &mut Log| l.push("done"))),
        );
        let mut log = Log::new();
        finish(&mut engine, &mut s, &mut log, Duration::from_millis(16));
        assert!(log.is_empty());
        finish(&mut engine, &mut s, &mut log, Duration::from_millis(16));
        assert_eq!(log, ["done"]);
        finish(&mut engine, &mut s, &mut log, Duration::from_millis(16));
        assert_eq!(log, ["done"]);
    }

    #[test]
    fn keyframes_envelope_peaks_and_returns() {
        let mut s = MemorySurface::new();
        let n = node(&mut s);
        let mut engine: Tweens<Log> = Tweens::new();
        engine.animate(
            TweenRequest::new(n, Duration::from_millis(100))
                .keyframes(Property::Scale, Keyframes::envelope(1.0)),
            None,
        );
        let mut log = Log::new();
        finish(&mut engine, &mut s, &mut log, Duration::from_millis(50));
        assert!((s.property(n, Property::Scale).unwrap() - 1.0).abs() < 1e-5);
        finish(&mut engine, &mut s, &mut log, Duration::from_millis(50));
        assert_eq!(s.property(n, Property::Scale), Some(0.0));
    }

    #[test]
    fn stop_defers_completion_to_next_advance() {
        let mut s = MemorySurface::new();
        let n = node(&mut s);
        let mut engine: Tweens<Log> = Tweens::new();
        let h = engine.animate(
            TweenRequest::new(n, Duration::from_secs(1)).to(Property::Left, 5.0),
            Some(Box::new(|l: &mut Log| l.push("stopped"))),
        );
        assert!(engine.is_running(h));
        assert!(engine.stop(h));
        assert!(!engine.stop(h));
        assert_eq!(engine.active(), 1);
        let mut log = Log::new();
        finish(&mut engine, &mut s, &mut log, Duration::ZERO);
        assert_eq!(log, ["stopped"]);
        assert_eq!(engine.active(), 0);
    }

    #[test]
    fn vanished_target_finishes_early() {
        let mut s = MemorySurface::new();
        let n = node(&mut s);
        let mut engine: Tweens<Log> = Tweens::new();
        engine.animate(
            TweenRequest::new(n, Duration::from_secs(10)).to(Property::Top, 1.0),
            Some(Box::new(|l: &mut Log| l.push("gone"))),
        );
        s.detach(n);
        let mut log = Log::new();
        finish(&mut engine, &mut s, &mut log, Duration::from_millis(1));
        assert_eq!(log, ["gone"]);
    }

    #[test]
    fn easing_is_applied() {
        let mut s = MemorySurface::new();
        let n = node(&mut s);
        let mut engine: Tweens<Log> = Tweens::new();
        engine.animate(
            TweenRequest::new(n, Duration::from_millis(100))
                .easing(Easing::OutQuad)
                .to(Property::TranslateX, 100.0),
            None,
        );
        let mut log = Log::new();
        finish(&mut engine, &mut s, &mut log, Duration::from_millis(50));
        let x = s.property(n, Property::TranslateX).unwrap();
        assert!((x - 75.0).abs() < 1e-3, "outQuad(0.5) = 0.75, got {x}");
    }
}
