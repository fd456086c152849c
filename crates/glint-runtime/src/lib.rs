#![forbid(unsafe_code)]

//! Runtime for Glint effects.
//!
//! # Role in Glint
//! `glint-runtime` owns time. It bundles a surface, a frame clock, an
//! interpolation engine, a seedable random source and the run registry
//! into a host that effects are driven against, and advances all of them
//! one frame tick at a time.
//!
//! # Primary responsibilities
//! - **InterpolationEngine**: the tween contract, with [`Tweens`] as the
//!   reference implementation.
//! - **FxHost**: the capability trait every effect takes.
//! - **RunRegistry**: at most one active run per node.
//! - **Stage**: the concrete host and its `tick` loop.
//! - **EffectCounters**: monotonic lifecycle counters with trace events.
//!
//! # How it fits in the system
//! Effects in `glint-fx` never hold a reference to the host between frames.
//! Every scheduled callback receives `&mut H` when it fires, so effect state
//! lives in the callbacks themselves.

pub mod host;
pub mod metrics;
pub mod run;
pub mod stage;
pub mod tween;

pub use host::FxHost;
pub use metrics::EffectCounters;
pub use run::{RunHandle, RunId, RunRegistry};
pub use stage::{Stage, TickReport};
pub use tween::{InterpolationEngine, Track, TweenCompletion, TweenHandle, TweenRequest, Tweens};
