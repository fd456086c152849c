#![forbid(unsafe_code)]

//! The capability trait effects are driven against.

use glint_core::clock::FrameClock;
use glint_render::{NodeId, Surface};
use rand::RngCore;

use crate::metrics::EffectCounters;
use crate::run::{RunHandle, RunRegistry};
use crate::tween::InterpolationEngine;

/// Everything an effect may touch: the surface, the frame clock, the
/// interpolation engine, a random source, the run registry and counters.
///
/// Callbacks scheduled on [`clock`](Self::clock) and completions passed to
/// [`tweens`](Self::tweens) receive `&mut Self` when they fire.
pub trait FxHost: Sized + 'static {
    fn surface(&mut self) -> &mut dyn Surface;
    fn clock(&mut self) -> &mut dyn FrameClock<Self>;
    fn tweens(&mut self) -> &mut dyn InterpolationEngine<Self>;
    fn rng(&mut self) -> &mut dyn RngCore;
    fn runs(&mut self) -> &mut RunRegistry;
    fn counters(&mut self) -> &mut EffectCounters;

    /// Register a new run of `kind` on `node`, cancelling the run it
    /// replaces.
    fn start_run(&mut self, node: NodeId, kind: &'static str) -> RunHandle {
        let (run, previous) = self.runs().begin(node, kind);
        if let Some(previous) = previous {
            previous.cancel(self.clock());
            self.counters().record_run_superseded(previous.kind(), node);
        }
        self.counters().record_run_started(kind, node);
        run
    }

    /// Cancel whatever run is active on `node`.
    fn cancel_run(&mut self, node: NodeId) -> bool {
        let Some(run) = self.runs().take(node) else {
            return false;
        };
        let cancelled = run.cancel(self.clock());
        if cancelled {
            self.counters().record_run_cancelled(run.kind(), node);
        }
        cancelled
    }

    /// Unregister a run that ended on its own after `frames` frames.
    fn finish_run(&mut self, run: &RunHandle, frames: u64) {
        run.settle();
        self.runs().finish(run);
        self.counters().record_run_completed(run.kind(), run.node(), frames);
    }
}
