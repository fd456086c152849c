#![forbid(unsafe_code)]

//! Animation primitives.
//!
//! Everything here is pull-based: the owner calls [`Animation::tick`] with the
//! elapsed time and reads [`Animation::value`] back. Nothing in this module
//! touches a surface or schedules work on its own.
//!
//! # Invariants
//!
//! 1. `value()` of a [`Fade`] is `easing(elapsed / duration)`, clamped input.
//! 2. `is_complete()` becomes true once elapsed time reaches the duration and
//!    stays true until `reset()`.
//! 3. `overshoot()` reports how far the last tick went past completion, so
//!    sequenced animations can forward the remainder.

mod easing;
mod keyframes;
mod stagger;

use std::time::Duration;

pub use easing::{Easing, EasingParseError};
pub use keyframes::Keyframes;
pub use stagger::{StaggerMode, stagger_offsets};

/// A time-driven animation producing a scalar value.
pub trait Animation {
    /// Advance the animation by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has reached its end.
    fn is_complete(&self) -> bool;

    /// Current output value.
    fn value(&self) -> f32;

    /// Return to the initial state.
    fn reset(&mut self);

    /// Time consumed past completion by the most recent tick.
    fn overshoot(&self) -> Duration {
        Duration::ZERO
    }
}

/// Eased progress from 0.0 to 1.0 over a fixed duration.
#[derive(Debug, Clone, PartialEq)]
pub struct Fade {
    elapsed: Duration,
    duration: Duration,
    easing: Easing,
}

impl Fade {
    /// Linear fade over `duration`. A zero duration is clamped to 1ns.
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            elapsed: Duration::ZERO,
            duration: duration.max(Duration::from_nanos(1)),
            easing: Easing::Linear,
        }
    }

    /// Set the easing curve (builder pattern).
    #[must_use]
    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Linear progress in [0.0, 1.0], before easing.
    #[inline]
    #[must_use]
    pub fn progress(&self) -> f32 {
        let t = self.elapsed.as_secs_f64() / self.duration.as_secs_f64();
        (t as f32).clamp(0.0, 1.0)
    }

    /// Total duration.
    #[inline]
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Time elapsed so far, capped at the duration.
    #[inline]
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed.min(self.duration)
    }
}

impl Animation for Fade {
    fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn value(&self) -> f32 {
        self.easing.apply(self.progress())
    }

    fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    fn overshoot(&self) -> Duration {
        self.elapsed.saturating_sub(self.duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fade_starts_at_zero() {
        let fade = Fade::new(Duration::from_millis(100));
        assert_eq!(fade.value(), 0.0);
        assert!(!fade.is_complete());
    }

    #[test]
    fn fade_reaches_one() {
        let mut fade = Fade::new(Duration::from_millis(100));
        fade.tick(Duration::from_millis(100));
        assert!(fade.is_complete());
        assert_eq!(fade.value(), 1.0);
    }

    #[test]
    fn fade_reports_overshoot() {
        let mut fade = Fade::new(Duration::from_millis(100));
        fade.tick(Duration::from_millis(130));
        assert_eq!(fade.overshoot(), Duration::from_millis(30));
        assert_eq!(fade.elapsed(), Duration::from_millis(100));
    }

    #[test]
    fn zero_duration_completes_on_first_tick() {
        let mut fade = Fade::new(Duration::ZERO);
        assert!(!fade.is_complete());
        fade.tick(Duration::from_nanos(1));
        assert!(fade.is_complete());
    }

    #[test]
    fn eased_fade_differs_from_linear_midway() {
        let mut linear = Fade::new(Duration::from_millis(100));
        let mut eased = Fade::new(Duration::from_millis(100)).easing(Easing::OutQuad);
        linear.tick(Duration::from_millis(50));
        eased.tick(Duration::from_millis(50));
        assert!((linear.value() - 0.5).abs() < 1e-6);
        assert!((eased.value() - 0.75).abs() < 1e-6);
    }

    #[test]
    fn reset_rewinds() {
        let mut fade = Fade::new(Duration::from_millis(10));
        fade.tick(Duration::from_millis(20));
        fade.reset();
        assert!(!fade.is_complete());
        assert_eq!(fade.overshoot(), Duration::ZERO);
    }
}
