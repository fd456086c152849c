#![forbid(unsafe_code)]

//! Effect lifecycle counters.
//!
//! Each host keeps its own [`EffectCounters`]. Every `record_*` call bumps a
//! monotonic counter and emits a `debug` event on the `glint.stage` target,
//! so the same information is available to tests (through the counters)
//! and to log pipelines (through `tracing`).

use glint_render::NodeId;

/// Monotonic effect counters for one host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EffectCounters {
    runs_started: u64,
    runs_superseded: u64,
    runs_completed: u64,
    runs_cancelled: u64,
    particles_spawned: u64,
    particles_removed: u64,
    fallback_removals: u64,
}

impl EffectCounters {
    /// Frame-driven runs started.
    #[must_use]
    pub fn runs_started(&self) -> u64 {
        self.runs_started
    }

    /// Runs cancelled because a newer run took over their node.
    #[must_use]
    pub fn runs_superseded(&self) -> u64 {
        self.runs_superseded
    }

    /// Runs that reached their natural end.
    #[must_use]
    pub fn runs_completed(&self) -> u64 {
        self.runs_completed
    }

    /// Runs cancelled explicitly.
    #[must_use]
    pub fn runs_cancelled(&self) -> u64 {
        self.runs_cancelled
    }

    /// Particles created.
    #[must_use]
    pub fn particles_spawned(&self) -> u64 {
        self.particles_spawned
    }

    /// Particles removed, by any path.
    #[must_use]
    pub fn particles_removed(&self) -> u64 {
        self.particles_removed
    }

    /// Particles removed by the fallback timer rather than tween completion.
    #[must_use]
    pub fn fallback_removals(&self) -> u64 {
        self.fallback_removals
    }

    /// Particles spawned but not yet removed.
    #[must_use]
    pub fn particles_live(&self) -> u64 {
        self.particles_spawned - self.particles_removed
    }

    pub fn record_run_started(&mut self, kind: &'static str, node: NodeId) {
        self.runs_started += 1;
        tracing::debug!(target: "glint.stage", kind, node = %node, "run started");
    }

    pub fn record_run_superseded(&mut self, kind: &'static str, node: NodeId) {
        self.runs_superseded += 1;
        tracing::debug!(target: "glint.stage", kind, node = %node, "run superseded");
    }

    pub fn record_run_completed(&mut self, kind: &'static str, node: NodeId, frames: u64) {
        self.runs_completed += 1;
        tracing::debug!(target: "glint.stage", kind, node = %node, frames, "run completed");
    }

    pub fn record_run_cancelled(&mut self, kind: &'static str, node: NodeId) {
        self.runs_cancelled += 1;
        tracing::debug!(target: "glint.stage", kind, node = %node, "run cancelled");
    }

    pub fn record_particle_spawned(&mut self, node: NodeId) {
        self.particles_spawned += 1;
        tracing::trace!(target: "glint.stage", node = %node, "particle spawned");
    }

    /// `fallback` marks removal by the safety timer.
    pub fn record_particle_removed(&mut self, node: NodeId, fallback: bool) {
        self.particles_removed += 1;
        if fallback {
            self.fallback_removals += 1;
            tracing::debug!(target: "glint.stage", node = %node, "particle removed by fallback timer");
        } else {
            tracing::trace!(target: "glint.stage", node = %node, "particle removed");
        }
    }
}
