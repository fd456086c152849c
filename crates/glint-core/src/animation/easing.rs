//! Named easing curves.
//!
//! Curves are addressed by the names tween libraries conventionally use
//! (`easeOutQuad`, `easeOutBack(1.7)`, `easeOutElastic(1, .5)`), so effect
//! configuration can stay declarative. Matching is ASCII case-insensitive.
//!
//! Most curves map [0, 1] onto [0, 1]. `InBack`, `OutBack` and `OutElastic`
//! overshoot; callers applying them to bounded quantities must clamp.

use std::f32::consts::TAU;
use std::fmt;
use std::str::FromStr;

/// Default overshoot for the back curves.
const BACK_OVERSHOOT: f32 = 1.70158;

/// An easing curve.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Easing {
    /// `t`.
    #[default]
    Linear,
    /// `t²`
    InQuad,
    /// `1 - (1-t)²`
    OutQuad,
    /// Quadratic S-curve.
    InOutQuad,
    /// `t³`
    InCubic,
    /// `1 - (1-t)³`
    OutCubic,
    /// Cubic S-curve.
    InOutCubic,
    /// `2^(10t - 10)`
    InExpo,
    /// `1 - 2^(-10t)`
    OutExpo,
    /// Exponential S-curve.
    InOutExpo,
    /// Pull back before moving. Parameter is the overshoot.
    InBack(f32),
    /// Overshoot then settle. Parameter is the overshoot.
    OutBack(f32),
    /// Decaying spring past the end value.
    OutElastic {
        /// Peak height, clamped to [1, 10].
        amplitude: f32,
        /// Oscillation period, clamped to [0.1, 2].
        period: f32,
    },
    /// Ball bounce at the end.
    OutBounce,
}

impl Easing {
    /// Map linear progress `t` (clamped to [0, 1]) through the curve.
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => {
                let inv = 1.0 - t;
                1.0 - inv * inv
            }
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    let inv = -2.0 * t + 2.0;
                    1.0 - inv * inv / 2.0
                }
            }
            Self::InCubic => t * t * t,
            Self::OutCubic => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let inv = -2.0 * t + 2.0;
                    1.0 - inv * inv * inv / 2.0
                }
            }
            Self::InExpo => expo_in(t),
            Self::OutExpo => 1.0 - expo_in(1.0 - t),
            Self::InOutExpo => {
                if t < 0.5 {
                    expo_in(2.0 * t) / 2.0
                } else {
                    1.0 - expo_in(-2.0 * t + 2.0) / 2.0
                }
            }
            Self::InBack(s) => back_in(t, s),
            Self::OutBack(s) => 1.0 - back_in(1.0 - t, s),
            Self::OutElastic { amplitude, period } => {
                1.0 - elastic_in(1.0 - t, amplitude, period)
            }
            Self::OutBounce => bounce_out(t),
        }
    }

    /// Whether the curve can leave [0, 1].
    #[must_use]
    pub fn can_overshoot(self) -> bool {
        matches!(
            self,
            Self::InBack(_) | Self::OutBack(_) | Self::OutElastic { .. }
        )
    }
}

fn expo_in(t: f32) -> f32 {
    if t <= 0.0 {
        0.0
    } else {
        2.0_f32.powf(10.0 * t - 10.0)
    }
}

fn back_in(t: f32, s: f32) -> f32 {
    t * t * ((s + 1.0) * t - s)
}

fn elastic_in(t: f32, amplitude: f32, period: f32) -> f32 {
    if t <= 0.0 || t >= 1.0 {
        return t.clamp(0.0, 1.0);
    }
    let a = amplitude.clamp(1.0, 10.0);
    let p = period.clamp(0.1, 2.0);
    let shift = p / TAU * (1.0 / a).asin();
    -a * 2.0_f32.powf(10.0 * (t - 1.0)) * (((t - 1.0) - shift) * TAU / p).sin()
}

fn bounce_out(t: f32) -> f32 {
    let n1 = 7.5625;
    let d1 = 2.75;
    if t < 1.0 / d1 {
        n1 * t * t
    } else if t < 2.0 / d1 {
        let t = t - 1.5 / d1;
        n1 * t * t + 0.75
    } else if t < 2.5 / d1 {
        let t = t - 2.25 / d1;
        n1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / d1;
        n1 * t * t + 0.984375
    }
}

/// Failure to resolve an easing name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EasingParseError {
    /// The curve name is not known.
    #[error("unknown easing curve `{0}`")]
    Unknown(String),
    /// A parameter list was opened but never closed.
    #[error("unterminated parameter list in `{0}`")]
    Unterminated(String),
    /// A parameter did not parse as a finite number.
    #[error("invalid easing parameter `{0}`")]
    BadParam(String),
    /// More parameters than the curve accepts.
    #[error("`{name}` takes at most {max} parameter(s), got {got}")]
    TooManyParams {
        /// Curve name as written.
        name: String,
        /// Accepted parameter count.
        max: usize,
        /// Given parameter count.
        got: usize,
    },
}

impl FromStr for Easing {
    type Err = EasingParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (name, params) = match s.find('(') {
            Some(open) => {
                let rest = &s[open + 1..];
                let close = rest
                    .rfind(')')
                    .ok_or_else(|| EasingParseError::Unterminated(s.to_string()))?;
                (s[..open].trim(), parse_params(&rest[..close])?)
            }
            None => (s, Vec::new()),
        };

        let check = |max: usize| {
            if params.len() > max {
                Err(EasingParseError::TooManyParams {
                    name: name.to_string(),
                    max,
                    got: params.len(),
                })
            } else {
                Ok(())
            }
        };

        let easing = match name.to_ascii_lowercase().as_str() {
            "linear" => Self::Linear,
            "easeinquad" => Self::InQuad,
            "easeoutquad" => Self::OutQuad,
            "easeinoutquad" => Self::InOutQuad,
            "easeincubic" => Self::InCubic,
            "easeoutcubic" => Self::OutCubic,
            "easeinoutcubic" => Self::InOutCubic,
            "easeinexpo" => Self::InExpo,
            "easeoutexpo" => Self::OutExpo,
            "easeinoutexpo" => Self::InOutExpo,
            "easeoutbounce" => Self::OutBounce,
            "easeinback" => {
                check(1)?;
                Self::InBack(params.first().copied().unwrap_or(BACK_OVERSHOOT))
            }
            "easeoutback" => {
                check(1)?;
                Self::OutBack(params.first().copied().unwrap_or(BACK_OVERSHOOT))
            }
            "easeoutelastic" => {
                check(2)?;
                Self::OutElastic {
                    amplitude: params.first().copied().unwrap_or(1.0),
                    period: params.get(1).copied().unwrap_or(0.5),
                }
            }
            _ => return Err(EasingParseError::Unknown(name.to_string())),
        };
        if !matches!(
            easing,
            Self::InBack(_) | Self::OutBack(_) | Self::OutElastic { .. }
        ) {
            check(0)?;
        }
        Ok(easing)
    }
}

fn parse_params(list: &str) -> Result<Vec<f32>, EasingParseError> {
    if list.trim().is_empty() {
        return Ok(Vec::new());
    }
    list.split(',')
        .map(|raw| {
            let raw = raw.trim();
            raw.parse::<f32>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| EasingParseError::BadParam(raw.to_string()))
        })
        .collect()
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => f.write_str("linear"),
            Self::InQuad => f.write_str("easeInQuad"),
            Self::OutQuad => f.write_str("easeOutQuad"),
            Self::InOutQuad => f.write_str("easeInOutQuad"),
            Self::InCubic => f.write_str("easeInCubic"),
            Self::OutCubic => f.write_str("easeOutCubic"),
            Self::InOutCubic => f.write_str("easeInOutCubic"),
            Self::InExpo => f.write_str("easeInExpo"),
            Self::OutExpo => f.write_str("easeOutExpo"),
            Self::InOutExpo => f.write_str("easeInOutExpo"),
            Self::InBack(s) => write!(f, "easeInBack({s})"),
            Self::OutBack(s) => write!(f, "easeOutBack({s})"),
            Self::OutElastic { amplitude, period } => {
                write!(f, "easeOutElastic({amplitude}, {period})")
            }
            Self::OutBounce => f.write_str("easeOutBounce"),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Easing {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Easing {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 14] = [
        Easing::Linear,
        Easing::InQuad,
        Easing::OutQuad,
        Easing::InOutQuad,
        Easing::InCubic,
        Easing::OutCubic,
        Easing::InOutCubic,
        Easing::InExpo,
        Easing::OutExpo,
        Easing::InOutExpo,
        Easing::InBack(BACK_OVERSHOOT),
        Easing::OutBack(1.7),
        Easing::OutElastic {
            amplitude: 1.0,
            period: 0.5,
        },
        Easing::OutBounce,
    ];

    #[test]
    fn endpoints_are_fixed() {
        for easing in ALL {
            assert!(easing.apply(0.0).abs() < 1e-3, "{easing} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-3, "{easing} at 1");
        }
    }

    #[test]
    fn input_is_clamped() {
        assert_eq!(Easing::OutQuad.apply(-3.0), 0.0);
        assert_eq!(Easing::OutQuad.apply(7.0), 1.0);
    }

    #[test]
    fn out_back_overshoots() {
        let peak = (1..100)
            .map(|i| Easing::OutBack(1.7).apply(i as f32 / 100.0))
            .fold(f32::MIN, f32::max);
        assert!(peak > 1.0);
        assert!(Easing::OutBack(1.7).can_overshoot());
        assert!(!Easing::OutQuad.can_overshoot());
    }

    #[test]
    fn parses_conventional_names() {
        assert_eq!("easeOutQuad".parse(), Ok(Easing::OutQuad));
        assert_eq!("EASEINQUAD".parse(), Ok(Easing::InQuad));
        assert_eq!(" linear ".parse(), Ok(Easing::Linear));
        assert_eq!("easeOutExpo".parse(), Ok(Easing::OutExpo));
        assert_eq!("easeOutBack(1.7)".parse(), Ok(Easing::OutBack(1.7)));
        assert_eq!("easeOutBack".parse(), Ok(Easing::OutBack(BACK_OVERSHOOT)));
        assert_eq!(
            "easeOutElastic(1, .5)".parse(),
            Ok(Easing::OutElastic {
                amplitude: 1.0,
                period: 0.5
            })
        );
    }

    #[test]
    fn rejects_bad_names() {
        assert_eq!(
            "easeSideways".parse::<Easing>(),
            Err(EasingParseError::Unknown("easeSideways".into()))
        );
        assert!(matches!(
            "easeOutBack(1.7".parse::<Easing>(),
            Err(EasingParseError::Unterminated(_))
        ));
        assert!(matches!(
            "easeOutBack(abc)".parse::<Easing>(),
            Err(EasingParseError::BadParam(_))
        ));
        assert!(matches!(
            "easeOutQuad(2)".parse::<Easing>(),
            Err(EasingParseError::TooManyParams { max: 0, got: 1, .. })
        ));
    }

    #[test]
    fn display_round_trips() {
        for easing in ALL {
            let name = easing.to_string();
            assert_eq!(name.parse::<Easing>(), Ok(easing), "{name}");
        }
    }
}
