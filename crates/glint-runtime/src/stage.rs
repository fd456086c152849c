#![forbid(unsafe_code)]

//! The reference host.
//!
//! A [`Stage`] owns a surface, a [`FrameQueue`], an interpolation engine, a
//! [`SmallRng`], the run registry and the counters. Time moves only when the
//! owner calls [`Stage::tick`].
//!
//! # Tick order
//!
//! 1. The clock advances and takes every due timer and frame callback.
//! 2. Each one runs with `&mut Stage`, unless it was revoked meanwhile.
//! 3. Tweens advance by the same `dt` and write the surface.
//! 4. Tween completions run with `&mut Stage`.

use std::fmt;
use std::time::Duration;

use glint_core::clock::{FrameClock, FramePacer, FrameQueue};
use glint_render::{MemorySurface, Surface};
use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};

use crate::host::FxHost;
use crate::metrics::EffectCounters;
use crate::run::RunRegistry;
use crate::tween::{InterpolationEngine, Tweens};

/// What happened during one [`Stage::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// Frame number after the tick.
    pub frame: u64,
    /// Clock time after the tick.
    pub now: Duration,
    /// Timers and frame callbacks that ran.
    pub callbacks: usize,
    /// Tween completions that ran.
    pub completions: usize,
    /// Callbacks still scheduled.
    pub pending: usize,
    /// Tweens still running.
    pub active_tweens: usize,
}

/// Deterministic effect host over a surface `S`.
pub struct Stage<S: Surface = MemorySurface> {
    surface: S,
    clock: FrameQueue<Self>,
    tweens: Box<dyn InterpolationEngine<Self>>,
    rng: SmallRng,
    runs: RunRegistry,
    counters: EffectCounters,
}

impl<S: Surface> fmt::Debug for Stage<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stage")
            .field("clock", &self.clock)
            .field("tweens", &self.tweens.active())
            .field("runs", &self.runs.len())
            .field("counters", &self.counters)
            .finish()
    }
}

impl Default for Stage<MemorySurface> {
    fn default() -> Self {
        Self::new(MemorySurface::new())
    }
}

impl<S: Surface + 'static> Stage<S> {
    /// Stage over `surface`, seeded from the OS.
    #[must_use]
    pub fn new(surface: S) -> Self {
        Self::with_rng(surface, SmallRng::from_os_rng())
    }

    /// Stage over `surface` with a fixed seed, for reproducible runs.
    #[must_use]
    pub fn with_seed(surface: S, seed: u64) -> Self {
        Self::with_rng(surface, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(surface: S, rng: SmallRng) -> Self {
        Self {
            surface,
            clock: FrameQueue::new(),
            tweens: Box::new(Tweens::new()),
            rng,
            runs: RunRegistry::new(),
            counters: EffectCounters::default(),
        }
    }

    /// Replace the interpolation engine.
    #[must_use]
    pub fn with_engine(mut self, engine: impl InterpolationEngine<Self> + 'static) -> Self {
        self.tweens = Box::new(engine);
        self
    }

    /// Advance one frame tick by `dt`.
    pub fn tick(&mut self, dt: Duration) -> TickReport {
        let batch = self.clock.advance(dt);
        let mut callbacks = 0;
        for (handle, callback) in batch {
            if self.clock.begin(handle) {
                callback(self);
                callbacks += 1;
            }
        }

        let due = self.tweens.advance(dt, &mut self.surface);
        let completions = due.len();
        for done in due {
            done(self);
        }

        let report = TickReport {
            frame: self.clock.frame(),
            now: self.clock.now(),
            callbacks,
            completions,
            pending: self.clock.pending(),
            active_tweens: self.tweens.active(),
        };
        tracing::trace!(
            target: "glint.stage",
            frame = report.frame,
            now_ms = report.now.as_millis() as u64,
            callbacks,
            completions,
            pending = report.pending,
            active_tweens = report.active_tweens,
            "tick"
        );
        report
    }

    /// Advance by the wall-clock delta measured by `pacer`.
    pub fn tick_paced(&mut self, pacer: &mut FramePacer) -> TickReport {
        self.tick(pacer.next_dt())
    }

    /// Tick by `dt` until idle. Returns the number of ticks taken, or `None`
    /// if still busy after `max_ticks`.
    pub fn run_until_idle(&mut self, dt: Duration, max_ticks: u64) -> Option<u64> {
        let mut ticks = 0;
        while !self.is_idle() {
            if ticks == max_ticks {
                tracing::debug!(target: "glint.stage", max_ticks, "still busy");
                return None;
            }
            self.tick(dt);
            ticks += 1;
        }
        Some(ticks)
    }

    /// No callbacks scheduled and no tweens running.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.clock.pending() == 0 && self.tweens.active() == 0
    }

    /// Clock time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Ticks so far.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.clock.frame()
    }

    /// Callbacks scheduled and not yet run.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.clock.pending()
    }

    /// Tweens running or awaiting completion.
    #[must_use]
    pub fn active_tweens(&self) -> usize {
        self.tweens.active()
    }

    #[must_use]
    pub fn surface_ref(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    #[must_use]
    pub fn registry(&self) -> &RunRegistry {
        &self.runs
    }

    #[must_use]
    pub fn stats(&self) -> EffectCounters {
        self.counters
    }

    /// Consume the stage, keeping the surface.
    #[must_use]
    pub fn into_surface(self) -> S {
        self.surface
    }
}

impl<S: Surface + 'static> FxHost for Stage<S> {
    fn surface(&mut self) -> &mut dyn Surface {
        &mut self.surface
    }

    fn clock(&mut self) -> &mut dyn FrameClock<Self> {
        &mut self.clock
    }

    fn tweens(&mut self) -> &mut dyn InterpolationEngine<Self> {
        self.tweens.as_mut()
    }

    fn rng(&mut self) -> &mut dyn RngCore {
        &mut self.rng
    }

    fn runs(&mut self) -> &mut RunRegistry {
        &mut self.runs
    }

    fn counters(&mut self) -> &mut EffectCounters {
        &mut self.counters
    }
}
