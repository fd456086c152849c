//! Shared fixtures for glint-fx integration tests.

#![allow(dead_code)]

use std::time::Duration;

use glint_render::{MemorySurface, NodeId, NodeKind, Surface};
use glint_runtime::{
    FxHost, InterpolationEngine, Stage, TweenCompletion, TweenHandle, TweenRequest, Tweens,
};

pub const FRAME: Duration = Duration::from_millis(16);

/// An engine that animates normally but never reports completion.
pub struct DropCompletions<H>(pub Tweens<H>);

impl<H> Default for DropCompletions<H> {
    fn default() -> Self {
        Self(Tweens::new())
    }
}

impl<H> InterpolationEngine<H> for DropCompletions<H> {
    fn animate(
        &mut self,
        request: TweenRequest,
        _on_complete: Option<TweenCompletion<H>>,
    ) -> TweenHandle {
        self.0.animate(request, None)
    }

    fn stop(&mut self, handle: TweenHandle) -> bool {
        self.0.stop(handle)
    }

    fn advance(&mut self, dt: Duration, surface: &mut dyn Surface) -> Vec<TweenCompletion<H>> {
        self.0.advance(dt, surface)
    }

    fn active(&self) -> usize {
        self.0.active()
    }
}

pub fn stage(seed: u64) -> Stage {
    Stage::with_seed(MemorySurface::new(), seed)
}

pub fn silent_stage(seed: u64) -> Stage {
    stage(seed).with_engine(DropCompletions::default())
}

pub fn attached(stage: &mut Stage, kind: NodeKind) -> NodeId {
    let root = stage.surface().root();
    let node = stage.surface().create_node(kind);
    stage.surface().attach(root, node);
    node
}
