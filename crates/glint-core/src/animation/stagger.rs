//! Stagger offsets for cascaded starts.

use std::time::Duration;

use super::Easing;

/// How start offsets are distributed across a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum StaggerMode {
    /// `index × step`.
    #[default]
    Linear,
    /// Same total span as `Linear`, redistributed through an easing curve.
    Eased(Easing),
}

/// Start offsets for `count` items spaced by `step`.
///
/// Offsets are never negative, even for overshooting curves.
#[must_use]
pub fn stagger_offsets(count: usize, step: Duration, mode: StaggerMode) -> Vec<Duration> {
    match mode {
        StaggerMode::Linear => (0..count)
            .map(|i| step.saturating_mul(u32::try_from(i).unwrap_or(u32::MAX)))
            .collect(),
        StaggerMode::Eased(easing) => {
            if count <= 1 {
                return vec![Duration::ZERO; count];
            }
            let last = count - 1;
            let span = step.saturating_mul(u32::try_from(last).unwrap_or(u32::MAX));
            (0..count)
                .map(|i| {
                    let t = easing.apply(i as f32 / last as f32).max(0.0);
                    span.mul_f32(t)
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_offsets_step_by_index() {
        let offsets = stagger_offsets(4, Duration::from_millis(20), StaggerMode::Linear);
        assert_eq!(
            offsets,
            vec![
                Duration::ZERO,
                Duration::from_millis(20),
                Duration::from_millis(40),
                Duration::from_millis(60)
            ]
        );
    }

    #[test]
    fn empty_batch_has_no_offsets() {
        assert!(stagger_offsets(0, Duration::from_millis(20), StaggerMode::Linear).is_empty());
        assert!(
            stagger_offsets(0, Duration::from_millis(20), StaggerMode::Eased(Easing::OutQuad))
                .is_empty()
        );
    }

    #[test]
    fn eased_offsets_keep_span() {
        let offsets = stagger_offsets(
            5,
            Duration::from_millis(10),
            StaggerMode::Eased(Easing::OutQuad),
        );
        assert_eq!(offsets[0], Duration::ZERO);
        assert!(offsets[4].abs_diff(Duration::from_millis(40)) < Duration::from_micros(10));
        // ease-out front-loads the gaps
        assert!(offsets[1] - offsets[0] > offsets[4] - offsets[3]);
    }
}
