#![forbid(unsafe_code)]

//! Core: animation primitives, the frame clock, and run lifecycle signals.
//!
//! # Role in Glint
//! `glint-core` is the timing layer. It knows nothing about surfaces or
//! effects; it owns the vocabulary every effect is written in.
//!
//! # Primary responsibilities
//! - **Animation**: the [`Animation`](animation::Animation) trait, [`Fade`](animation::Fade),
//!   named easing curves, multi-keyframe tracks, and stagger offsets.
//! - **Frame clock**: the [`FrameClock`](clock::FrameClock) contract and the
//!   deterministic [`FrameQueue`](clock::FrameQueue) that implements it.
//! - **Cancellation**: cloneable tokens observing an explicit source.
//! - **Completion**: a single-resolution [`CompletionSignal`](signal::CompletionSignal).
//!
//! # How it fits in the system
//! `glint-runtime` builds the interpolation engine and the host stage on top
//! of these primitives, and `glint-fx` drives its effects through them.

pub mod animation;
pub mod cancellation;
pub mod clock;
pub mod logging;
pub mod signal;

pub use animation::{Animation, Easing, EasingParseError, Fade, Keyframes, StaggerMode};
pub use cancellation::{CancellationSource, CancellationToken};
pub use clock::{FrameCallback, FrameClock, FrameHandle, FramePacer, FrameQueue};
pub use signal::{CompletionSignal, Resolver, completion};
