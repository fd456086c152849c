#![forbid(unsafe_code)]

//! A node that eases toward the pointer.
//!
//! Each frame the follower covers a fixed fraction of the remaining
//! distance to its target and writes `left`/`top` so that the node is
//! centered on its position. It runs until stopped or until its node
//! disappears.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use glint_render::{NodeId, Property};
use glint_runtime::{FxHost, RunHandle, TweenRequest};

use crate::config::CursorConfig;

const KIND: &str = "follow";

#[derive(Debug)]
struct Motion {
    target: Cell<(f32, f32)>,
    position: Cell<(f32, f32)>,
}

/// Handle to a running follower.
#[derive(Debug, Clone)]
pub struct CursorFollower {
    run: RunHandle,
    motion: Rc<Motion>,
    config: Rc<CursorConfig>,
}

impl CursorFollower {
    /// Start following on `node`, from the origin. Replaces any run already
    /// active on `node`.
    pub fn start<H: FxHost>(host: &mut H, node: NodeId, config: CursorConfig) -> Self {
        let run = host.start_run(node, KIND);
        let surface = host.surface();
        surface.set_property(node, Property::Width, config.size);
        surface.set_property(node, Property::Height, config.size);
        let follower = Self {
            run,
            motion: Rc::new(Motion {
                target: Cell::new((0.0, 0.0)),
                position: Cell::new((0.0, 0.0)),
            }),
            config: Rc::new(config),
        };
        follower.schedule(host);
        follower
    }

    /// Where the follower is heading.
    pub fn set_target(&self, x: f32, y: f32) {
        self.motion.target.set((x, y));
    }

    #[must_use]
    pub fn target(&self) -> (f32, f32) {
        self.motion.target.get()
    }

    /// Current (unrounded) position of the node's center.
    #[must_use]
    pub fn position(&self) -> (f32, f32) {
        self.motion.position.get()
    }

    #[must_use]
    pub fn node(&self) -> NodeId {
        self.run.node()
    }

    /// Whether a step is still scheduled.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.run.is_cancelled() && self.run.pending().is_some()
    }

    /// Grow to the magnet scale while `engaged`, shrink back otherwise.
    pub fn magnetize<H: FxHost>(&self, host: &mut H, engaged: bool) {
        let scale = if engaged { self.config.magnet_scale } else { 1.0 };
        host.tweens().animate(
            TweenRequest::new(self.node(), Duration::from_millis(self.config.magnet_ms))
                .easing(self.config.magnet_easing)
                .to(Property::Scale, scale),
            None,
        );
    }

    /// Stop following. Returns `false` if already stopped.
    pub fn stop<H: FxHost>(&self, host: &mut H) -> bool {
        let cancelled = self.run.cancel(host.clock());
        if host.runs().finish(&self.run) && cancelled {
            host.counters().record_run_cancelled(KIND, self.node());
        }
        cancelled
    }

    fn schedule<H: FxHost>(&self, host: &mut H) {
        let this = self.clone();
        self.run
            .schedule(host.clock(), Box::new(move |host: &mut H| this.step(host)));
    }

    fn step<H: FxHost>(self, host: &mut H) {
        let node = self.node();
        if !host.surface().contains(node) {
            tracing::debug!(target: "glint.fx.follow", node = %node, "follower node gone");
            host.finish_run(&self.run, 0);
            return;
        }
        let (tx, ty) = self.motion.target.get();
        let (x, y) = self.motion.position.get();
        let k = self.config.smoothing;
        let (x, y) = (x + (tx - x) * k, y + (ty - y) * k);
        self.motion.position.set((x, y));

        let half = self.config.size / 2.0;
        let surface = host.surface();
        surface.set_property(node, Property::Left, x - half);
        surface.set_property(node, Property::Top, y - half);
        self.schedule(host);
    }
}
