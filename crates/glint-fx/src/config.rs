#![forbid(unsafe_code)]

//! Effect configuration.
//!
//! [`FxConfig`] gathers every tunable of every effect. The defaults are the
//! stock look, so `FxConfig::default()` needs no file at all.
//!
//! # Loading
//!
//! ```toml
//! [scramble]
//! filler = "01"
//! redraw_probability = 0.5
//!
//! [particles]
//! burst_count = 30
//! easing = "easeOutExpo"
//! ```
//!
//! ```rust,ignore
//! let config = FxConfig::from_toml_file("glint.toml")?;
//! let config = FxConfig::from_json_str(json)?;
//! ```
//!
//! Loaders validate after parsing and fail with
//! [`FxConfigError::Validation`] listing every bad field.

#[cfg(feature = "config")]
use std::path::Path;
use std::time::Duration;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use glint_core::animation::{Easing, StaggerMode};
use glint_render::Rgb;

/// Filler glyphs a scrambling character cycles through.
pub const DEFAULT_FILLER: &str = "!<>-_/[]{}—=+*^?#________";

/// Largest accepted scramble start or reveal window, in frames.
pub const MAX_SCRAMBLE_FRAMES: u32 = 100_000;

/// Top-level configuration for all effects.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct FxConfig {
    pub scramble: ScrambleConfig,
    pub particles: ParticleConfig,
    pub cursor: CursorConfig,
    pub toast: ToastConfig,
}

impl FxConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, FxConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validated()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, FxConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, FxConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validated()
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, FxConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Serialize to pretty TOML.
    #[cfg(feature = "config")]
    pub fn to_toml_string(&self) -> Result<String, FxConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    #[cfg(feature = "config")]
    fn validated(self) -> Result<Self, FxConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(FxConfigError::Validation(errors))
        }
    }

    /// Check every field. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let s = &self.scramble;
        if s.filler.is_empty() {
            errors.push("scramble.filler must not be empty".into());
        }
        if !(0.0..=1.0).contains(&s.redraw_probability) {
            errors.push(format!(
                "scramble.redraw_probability must be in [0, 1], got {}",
                s.redraw_probability
            ));
        }

        if s.max_start_frame > MAX_SCRAMBLE_FRAMES || s.max_reveal_frames > MAX_SCRAMBLE_FRAMES {
            errors.push(format!(
                "scramble.max_start_frame and scramble.max_reveal_frames must be <= {MAX_SCRAMBLE_FRAMES}, got {} and {}",
                s.max_start_frame, s.max_reveal_frames
            ));
        }

        let p = &self.particles;
        let mut finite = |name: &str, value: f32| {
            if !value.is_finite() {
                errors.push(format!("{name} must be finite, got {value}"));
            }
        };
        finite("particles.min_speed", p.min_speed);
        finite("particles.max_speed", p.max_speed);
        finite("particles.size", p.size);
        let c = &self.cursor;
        finite("cursor.smoothing", c.smoothing);
        finite("cursor.size", c.size);
        finite("cursor.magnet_scale", c.magnet_scale);
        let t = &self.toast;
        finite("toast.offset_y", t.offset_y);
        finite("toast.start_scale", t.start_scale);

        if p.min_speed < 0.0 || p.min_speed > p.max_speed {
            errors.push(format!(
                "particles speed range must satisfy 0 <= min <= max, got [{}, {})",
                p.min_speed, p.max_speed
            ));
        }
        if p.min_lifetime_ms == 0 || p.min_lifetime_ms > p.max_lifetime_ms {
            errors.push(format!(
                "particles lifetime range must satisfy 0 < min <= max, got [{}, {})",
                p.min_lifetime_ms, p.max_lifetime_ms
            ));
        }
        if p.size <= 0.0 {
            errors.push(format!("particles.size must be > 0, got {}", p.size));
        }
        if p.ambient_interval_ms == 0 {
            errors.push("particles.ambient_interval_ms must be > 0".into());
        }
        if p.max_burst == Some(0) {
            errors.push("particles.max_burst must be > 0 when set".into());
        }
        if p.color > 0x00ff_ffff {
            errors.push(format!("particles.color must be 0xRRGGBB, got {:#x}", p.color));
        }

        if c.smoothing <= 0.0 || c.smoothing > 1.0 {
            errors.push(format!(
                "cursor.smoothing must be in (0, 1], got {}",
                c.smoothing
            ));
        }
        if c.size < 0.0 {
            errors.push(format!("cursor.size must be >= 0, got {}", c.size));
        }

        if t.enter_ms == 0 || t.exit_ms == 0 {
            errors.push("toast.enter_ms and toast.exit_ms must be > 0".into());
        }
        if t.start_scale < 0.0 {
            errors.push(format!(
                "toast.start_scale must be >= 0, got {}",
                t.start_scale
            ));
        }

        errors
    }
}

/// Text scramble parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ScrambleConfig {
    /// Filler glyphs. Default: [`DEFAULT_FILLER`].
    pub filler: String,
    /// Reveal start is drawn from `[0, max_start_frame)`. Default: 40.
    pub max_start_frame: u32,
    /// Reveal length is drawn from `[0, max_reveal_frames)`. Default: 40.
    pub max_reveal_frames: u32,
    /// Chance a revealing position picks a new glyph each frame. Default: 0.28.
    pub redraw_probability: f32,
}

impl Default for ScrambleConfig {
    fn default() -> Self {
        Self {
            filler: DEFAULT_FILLER.to_owned(),
            max_start_frame: 40,
            max_reveal_frames: 40,
            redraw_probability: 0.28,
        }
    }
}

/// Particle parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ParticleConfig {
    /// Speed range `[min, max)` in surface units. Default: 50..150.
    pub min_speed: f32,
    pub max_speed: f32,
    /// Lifetime range `[min, max)` in milliseconds. Default: 500..1500.
    pub min_lifetime_ms: u64,
    pub max_lifetime_ms: u64,
    /// Delay between consecutive spawns of a burst. Default: 20 ms.
    pub stagger_ms: u64,
    /// Redistribute burst spawns over the same span through this curve.
    /// Default: none (evenly spaced).
    pub stagger_easing: Option<Easing>,
    /// Particles per burst when no count is given. Default: 20.
    pub burst_count: usize,
    /// Upper bound on one burst. Default: none.
    pub max_burst: Option<usize>,
    /// Extra time after a particle's lifetime before the fallback timer
    /// removes it. Default: 250 ms.
    pub fallback_grace_ms: u64,
    /// Easing of the trajectory and envelopes. Default: `easeOutQuad`.
    pub easing: Easing,
    /// Footprint (width and height). Default: 4.
    pub size: f32,
    /// `0xRRGGBB`. Default: `0x00f0ff`.
    pub color: u32,
    /// Interval of ambient emission. Default: 500 ms.
    pub ambient_interval_ms: u64,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            min_speed: 50.0,
            max_speed: 150.0,
            min_lifetime_ms: 500,
            max_lifetime_ms: 1500,
            stagger_ms: 20,
            stagger_easing: None,
            burst_count: 20,
            max_burst: None,
            fallback_grace_ms: 250,
            easing: Easing::OutQuad,
            size: 4.0,
            color: 0x00f0ff,
            ambient_interval_ms: 500,
        }
    }
}

impl ParticleConfig {
    #[must_use]
    pub fn stagger(&self) -> Duration {
        Duration::from_millis(self.stagger_ms)
    }

    /// How burst spawns are spread over time.
    #[must_use]
    pub fn stagger_mode(&self) -> StaggerMode {
        self.stagger_easing.map_or(StaggerMode::Linear, StaggerMode::Eased)
    }

    #[must_use]
    pub fn fallback_grace(&self) -> Duration {
        Duration::from_millis(self.fallback_grace_ms)
    }

    #[must_use]
    pub fn ambient_interval(&self) -> Duration {
        Duration::from_millis(self.ambient_interval_ms)
    }

    #[must_use]
    pub fn rgb(&self) -> Rgb {
        Rgb::from_hex(self.color)
    }

    /// `count` after applying `max_burst`.
    #[must_use]
    pub fn cap_burst(&self, count: usize) -> usize {
        self.max_burst.map_or(count, |max| count.min(max))
    }
}

/// Cursor follower parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct CursorConfig {
    /// Fraction of the remaining distance covered each frame. Default: 0.1.
    pub smoothing: f32,
    /// Follower footprint; its center tracks the pointer. Default: 20.
    pub size: f32,
    /// Scale while hovering something interactive. Default: 2.
    pub magnet_scale: f32,
    /// Duration of the scale tween. Default: 300 ms.
    pub magnet_ms: u64,
    /// Default: `easeOutQuad`.
    pub magnet_easing: Easing,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            smoothing: 0.1,
            size: 20.0,
            magnet_scale: 2.0,
            magnet_ms: 300,
            magnet_easing: Easing::OutQuad,
        }
    }
}

/// Toast notification parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ToastConfig {
    /// Default: 600 ms, `easeOutExpo`.
    pub enter_ms: u64,
    pub enter_easing: Easing,
    /// Time fully shown. Default: 2000 ms.
    pub hold_ms: u64,
    /// Default: 500 ms, `easeInQuad`.
    pub exit_ms: u64,
    pub exit_easing: Easing,
    /// Vertical offset while hidden. Default: -30.
    pub offset_y: f32,
    /// Scale while hidden. Default: 0.8.
    pub start_scale: f32,
    /// Slack before the fallback timer removes the toast. Default: 250 ms.
    pub fallback_grace_ms: u64,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            enter_ms: 600,
            enter_easing: Easing::OutExpo,
            hold_ms: 2000,
            exit_ms: 500,
            exit_easing: Easing::InQuad,
            offset_y: -30.0,
            start_scale: 0.8,
            fallback_grace_ms: 250,
        }
    }
}

impl ToastConfig {
    /// Entrance, hold and exit together.
    #[must_use]
    pub fn total(&self) -> Duration {
        Duration::from_millis(
            self.enter_ms
                .saturating_add(self.hold_ms)
                .saturating_add(self.exit_ms),
        )
    }
}

/// Errors from loading an [`FxConfig`].
#[derive(Debug, thiserror::Error)]
pub enum FxConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "config")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[cfg(feature = "config")]
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[cfg(feature = "config")]
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(FxConfig::default().validate().is_empty());
    }

    #[test]
    fn defaults_are_the_stock_look() {
        let c = FxConfig::default();
        assert_eq!(c.scramble.redraw_probability, 0.28);
        assert_eq!(c.scramble.max_start_frame, 40);
        assert_eq!(c.particles.burst_count, 20);
        assert_eq!(c.particles.stagger(), Duration::from_millis(20));
        assert_eq!(c.particles.rgb(), Rgb(0x00, 0xf0, 0xff));
        assert_eq!(c.toast.total(), Duration::from_millis(3100));
    }

    #[test]
    fn validate_reports_every_problem() {
        let mut c = FxConfig::default();
        c.scramble.filler.clear();
        c.scramble.redraw_probability = 1.5;
        c.particles.min_speed = 200.0;
        c.cursor.smoothing = 0.0;
        let errors = c.validate();
        assert_eq!(errors.len(), 4, "{errors:?}");
        assert!(errors.iter().any(|e| e.contains("scramble.filler")));
    }

    #[test]
    fn cap_burst() {
        let mut p = ParticleConfig::default();
        assert_eq!(p.cap_burst(500), 500);
        p.max_burst = Some(64);
        assert_eq!(p.cap_burst(500), 64);
        assert_eq!(p.cap_burst(3), 3);
    }

    #[cfg(feature = "config")]
    #[test]
    fn partial_toml_keeps_defaults() {
        let c = FxConfig::from_toml_str(
            r#"
            [scramble]
            filler = "01"

            [particles]
            burst_count = 30
            easing = "easeOutExpo"
            "#,
        )
        .unwrap();
        assert_eq!(c.scramble.filler, "01");
        assert_eq!(c.scramble.max_start_frame, 40);
        assert_eq!(c.particles.burst_count, 30);
        assert_eq!(c.particles.easing, Easing::OutExpo);
        assert_eq!(c.toast, ToastConfig::default());
    }

    #[cfg(feature = "config")]
    #[test]
    fn json_round_trip_and_validation_error() {
        let c = FxConfig::from_json_str(r#"{"cursor": {"smoothing": 0.25}}"#).unwrap();
        assert_eq!(c.cursor.smoothing, 0.25);

        let err = FxConfig::from_json_str(r#"{"cursor": {"smoothing": 2.0}}"#).unwrap_err();
        assert!(matches!(err, FxConfigError::Validation(ref v) if v.len() == 1));
        assert!(err.to_string().contains("cursor.smoothing"));
    }

    #[cfg(feature = "config")]
    #[test]
    fn unknown_easing_is_a_parse_error() {
        let err = FxConfig::from_toml_str("[particles]\neasing = \"wobbly\"\n").unwrap_err();
        assert!(matches!(err, FxConfigError::Toml(_)));
    }

    #[cfg(feature = "config")]
    #[test]
    fn toml_round_trip() {
        let mut c = FxConfig::default();
        c.particles.max_burst = Some(10);
        c.toast.exit_easing = Easing::OutBack(1.7);
        let text = c.to_toml_string().unwrap();
        assert_eq!(FxConfig::from_toml_str(&text).unwrap(), c);
    }

    #[cfg(feature = "config")]
    #[test]
    fn non_finite_floats_are_rejected() {
        for (section, field, value) in [
            ("particles", "max_speed", "inf"),
            ("particles", "min_speed", "nan"),
            ("particles", "size", "inf"),
            ("cursor", "smoothing", "nan"),
            ("cursor", "size", "-inf"),
            ("cursor", "magnet_scale", "nan"),
            ("toast", "offset_y", "nan"),
            ("toast", "start_scale", "inf"),
        ] {
            let err = FxConfig::from_toml_str(&format!("[{section}]\n{field} = {value}\n"))
                .unwrap_err();
            match err {
                FxConfigError::Validation(errors) => assert!(
                    errors.iter().any(|e| e.contains(&format!("{section}.{field} must be finite"))),
                    "{section}.{field} = {value}: {errors:?}"
                ),
                other => panic!("{section}.{field}: unexpected {other}"),
            }
        }
    }

    #[cfg(feature = "config")]
    #[test]
    fn huge_scramble_windows_are_rejected() {
        let err = FxConfig::from_toml_str(
            "[scramble]\nmax_start_frame = 4294967295\nmax_reveal_frames = 4294967295\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("scramble.max_start_frame"));

        let mut c = FxConfig::default();
        c.scramble.max_reveal_frames = MAX_SCRAMBLE_FRAMES;
        assert!(c.validate().is_empty());
    }

    #[test]
    fn toast_total_saturates() {
        let t = ToastConfig {
            enter_ms: u64::MAX,
            hold_ms: u64::MAX,
            ..ToastConfig::default()
        };
        assert_eq!(t.total(), Duration::from_millis(u64::MAX));
    }

    #[test]
    fn stagger_mode_follows_easing() {
        let mut p = ParticleConfig::default();
        assert_eq!(p.stagger_mode(), StaggerMode::Linear);
        p.stagger_easing = Some(Easing::OutQuad);
        assert_eq!(p.stagger_mode(), StaggerMode::Eased(Easing::OutQuad));
    }
}
