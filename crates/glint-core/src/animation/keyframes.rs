//! Multi-keyframe value tracks.
//!
//! A track of `n` values splits progress into `n - 1` equal segments and
//! applies the easing curve inside each segment, so `[0, 1, 0]` with
//! `easeOutQuad` rises quickly, then falls quickly back to zero.

use super::Easing;

/// An ordered list of values sampled by progress.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyframes {
    values: Vec<f32>,
}

impl Keyframes {
    /// Track over `values`. An empty list behaves as `[0.0]`.
    #[must_use]
    pub fn new(values: impl Into<Vec<f32>>) -> Self {
        let mut values = values.into();
        if values.is_empty() {
            values.push(0.0);
        }
        Self { values }
    }

    /// Two-point track.
    #[must_use]
    pub fn between(from: f32, to: f32) -> Self {
        Self::new(vec![from, to])
    }

    /// Rise from zero to `peak` and back: `[0, peak, 0]`.
    #[must_use]
    pub fn envelope(peak: f32) -> Self {
        Self::new(vec![0.0, peak, 0.0])
    }

    /// First value.
    #[must_use]
    pub fn first(&self) -> f32 {
        self.values[0]
    }

    /// Final value.
    #[must_use]
    pub fn last(&self) -> f32 {
        self.values[self.values.len() - 1]
    }

    /// Number of keyframes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false; a track holds at least one value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Keyframe values in order.
    #[must_use]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Value at linear `progress` in [0, 1].
    #[must_use]
    pub fn sample(&self, progress: f32, easing: Easing) -> f32 {
        let segments = self.values.len() - 1;
        if segments == 0 {
            return self.values[0];
        }
        let t = progress.clamp(0.0, 1.0);
        if t >= 1.0 {
            return self.last();
        }
        let pos = t * segments as f32;
        let index = (pos as usize).min(segments - 1);
        let local = easing.apply(pos - index as f32);
        let (a, b) = (self.values[index], self.values[index + 1]);
        a + (b - a) * local
    }
}
