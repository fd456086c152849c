#![forbid(unsafe_code)]

//! Glint public facade crate.
//!
//! Re-exports the types most programs need from the internal crates and
//! offers a prelude. A typical program builds a [`Stage`], starts effects
//! against it and calls [`Stage::tick`] once per frame:
//!
//! ```
//! use std::time::Duration;
//! use glint::prelude::*;
//!
//! let mut stage = Stage::with_seed(MemorySurface::new(), 7);
//! let root = stage.surface().root();
//! let title = stage.surface().create_node(NodeKind::Text);
//! stage.surface().attach(root, title);
//!
//! let done = ScrambleText::new(ScrambleConfig::default()).set_text(&mut stage, title, "glint");
//! let sparks = EffectEmitter::new(&mut stage, ParticleConfig::default());
//! sparks.burst_default(&mut stage, 10.0, 2.0);
//!
//! stage.run_until_idle(Duration::from_millis(16), 10_000);
//! assert!(done.is_resolved());
//! assert_eq!(stage.surface().text(title), Some("glint"));
//! ```

// --- Core re-exports -------------------------------------------------------

pub use glint_core::{
    Animation, CancellationSource, CancellationToken, CompletionSignal, Easing, EasingParseError,
    Fade, FrameClock, FrameHandle, FramePacer, FrameQueue, Keyframes, Resolver, StaggerMode,
    completion,
};

// --- Render re-exports -----------------------------------------------------

pub use glint_render::{Bounds, Grid, MemorySurface, NodeId, NodeKind, Property, Rgb, Style, Surface};

// --- Runtime re-exports ----------------------------------------------------

pub use glint_runtime::{
    EffectCounters, FxHost, InterpolationEngine, RunHandle, RunId, RunRegistry, Stage, TickReport,
    Track, TweenHandle, TweenRequest, Tweens,
};

// --- Effect re-exports -----------------------------------------------------

pub use glint_fx::{
    AmbientHandle, BurstHandle, CursorConfig, CursorFollower, EffectEmitter, FxConfig,
    FxConfigError, ParticleConfig, ParticleState, ParticleToken, ScrambleConfig, ScramblePlan,
    ScrambleText, ToastConfig, Trajectory, toast,
};

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Bounds, CompletionSignal, CursorConfig, CursorFollower, Easing, EffectEmitter, FxConfig,
        FxHost, MemorySurface, NodeId, NodeKind, ParticleConfig, Property, ScrambleConfig,
        ScrambleText, Stage, Surface, ToastConfig, toast,
    };

    pub use crate::{core, fx, render, runtime};
}

pub use glint_core as core;
pub use glint_fx as fx;
pub use glint_render as render;
pub use glint_runtime as runtime;
