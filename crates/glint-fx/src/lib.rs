#![forbid(unsafe_code)]

//! Glint effects.
//!
//! - [`ScrambleText`]: morph a text node into new text through flickering
//!   filler glyphs.
//! - [`EffectEmitter`]: bursts of self-removing particles, plus ambient
//!   emission inside a rectangle.
//! - [`CursorFollower`]: a node that eases toward the pointer.
//! - [`toast`](toast::toast): a notification that enters, holds, exits and
//!   removes itself.
//!
//! All effects are driven against an [`FxHost`](glint_runtime::FxHost) and
//! never return errors: missing nodes and odd coordinates degrade silently.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use glint_fx::{FxConfig, ScrambleText};
//! use glint_render::{MemorySurface, NodeKind, Surface};
//! use glint_runtime::{FxHost, Stage};
//!
//! let mut stage = Stage::with_seed(MemorySurface::new(), 7);
//! let root = stage.surface().root();
//! let title = stage.surface().create_node(NodeKind::Text);
//! stage.surface().attach(root, title);
//! stage.surface().set_text(title, "hello");
//!
//! let scramble = ScrambleText::new(FxConfig::default().scramble);
//! let done = scramble.set_text(&mut stage, title, "world");
//! stage.run_until_idle(Duration::from_millis(16), 1_000);
//!
//! assert!(done.is_resolved());
//! assert_eq!(stage.surface().text(title), Some("world"));
//! ```

pub mod config;
pub mod emitter;
pub mod follow;
pub mod scramble;
pub mod toast;

pub use config::{
    CursorConfig, FxConfig, FxConfigError, ParticleConfig, ScrambleConfig, ToastConfig,
};
pub use emitter::{
    AmbientHandle, BurstHandle, EffectEmitter, ParticleState, ParticleToken, Trajectory,
};
pub use follow::CursorFollower;
pub use scramble::{Emit, Scramble, ScramblePlan, ScrambleText, Slot};
pub use toast::toast;
