#![forbid(unsafe_code)]

//! Particle bursts.
//!
//! An [`EffectEmitter`] owns a container node. Each particle is a node in
//! that container, handed to the interpolation engine with a random
//! direction, speed and lifetime, and removed when the tween completes.
//!
//! # Removal
//!
//! Every particle also gets a fallback timer at `lifetime + grace`. Tween
//! completion and the fallback both call [`ParticleToken::remove`], which is
//! idempotent; the completion path also revokes the timer. A particle is
//! therefore removed even when the engine never reports completion.
//!
//! # Bursts
//!
//! [`EffectEmitter::burst`] submits one timer per particle at
//! `index * stagger` and returns them as a [`BurstHandle`], which can revoke
//! the spawns that have not fired yet.

use std::cell::Cell;
use std::f32::consts::TAU;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use glint_core::animation::{Keyframes, stagger_offsets};
use glint_core::clock::FrameHandle;
use glint_render::{Bounds, NodeId, NodeKind, Property};
use glint_runtime::{FxHost, RunHandle, TweenRequest};
use rand::{Rng, RngCore};

use crate::config::ParticleConfig;

/// Lifecycle of a particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleState {
    /// Created, not yet handed to the engine.
    Pending,
    /// Tweening.
    Animating,
    /// Detached from the surface.
    Removed,
}

/// Randomized motion of one particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trajectory {
    pub origin: (f32, f32),
    /// Direction in radians, `[0, 2π)`.
    pub angle: f32,
    pub speed: f32,
    pub lifetime: Duration,
}

impl Trajectory {
    /// Draw a trajectory from `(x, y)`.
    pub fn roll(rng: &mut dyn RngCore, x: f32, y: f32, config: &ParticleConfig) -> Self {
        let angle = rng.random::<f32>() * TAU;
        // f32 rounding can land exactly on TAU.
        let angle = if angle >= TAU { 0.0 } else { angle };
        let speed = if (config.max_speed - config.min_speed).is_finite()
            && config.max_speed > config.min_speed
        {
            rng.random_range(config.min_speed..config.max_speed)
        } else if config.min_speed.is_finite() {
            config.min_speed
        } else {
            0.0
        };
        let lifetime_ms = if config.max_lifetime_ms > config.min_lifetime_ms {
            rng.random_range(config.min_lifetime_ms..config.max_lifetime_ms)
        } else {
            config.min_lifetime_ms
        };
        Self {
            origin: (x, y),
            angle,
            speed,
            lifetime: Duration::from_millis(lifetime_ms),
        }
    }

    /// Offset travelled over the whole lifetime.
    #[must_use]
    pub fn displacement(&self) -> (f32, f32) {
        let (sin, cos) = self.angle.sin_cos();
        (cos * self.speed, sin * self.speed)
    }
}

struct TokenInner {
    node: NodeId,
    trajectory: Trajectory,
    state: Cell<ParticleState>,
    fallback: Cell<Option<FrameHandle>>,
}

/// Shared handle to one particle.
#[derive(Clone)]
pub struct ParticleToken {
    inner: Rc<TokenInner>,
}

impl fmt::Debug for ParticleToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParticleToken")
            .field("node", &self.inner.node)
            .field("state", &self.inner.state.get())
            .field("trajectory", &self.inner.trajectory)
            .finish()
    }
}

impl ParticleToken {
    #[must_use]
    pub fn node(&self) -> NodeId {
        self.inner.node
    }

    #[must_use]
    pub fn trajectory(&self) -> Trajectory {
        self.inner.trajectory
    }

    #[must_use]
    pub fn state(&self) -> ParticleState {
        self.inner.state.get()
    }

    /// Detach the particle. Only the first call has any effect; `fallback`
    /// marks the safety timer as the caller.
    pub fn remove<H: FxHost>(&self, host: &mut H, fallback: bool) -> bool {
        if self.inner.state.replace(ParticleState::Removed) == ParticleState::Removed {
            return false;
        }
        if let Some(timer) = self.inner.fallback.take() {
            if !fallback {
                host.clock().cancel_frame(timer);
            }
        }
        host.surface().detach(self.inner.node);
        host.counters().record_particle_removed(self.inner.node, fallback);
        true
    }
}

/// Timers of one burst.
#[derive(Debug, Clone, Default)]
pub struct BurstHandle {
    spawns: Vec<(Duration, FrameHandle)>,
}

impl BurstHandle {
    /// Number of spawns scheduled.
    #[must_use]
    pub fn len(&self) -> usize {
        self.spawns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spawns.is_empty()
    }

    /// Delay of each spawn from the burst call, in spawn order.
    #[must_use]
    pub fn offsets(&self) -> Vec<Duration> {
        self.spawns.iter().map(|(offset, _)| *offset).collect()
    }

    /// Revoke every spawn that has not fired. Returns how many were revoked.
    pub fn cancel<H: FxHost>(&self, host: &mut H) -> usize {
        let clock = host.clock();
        let revoked = self
            .spawns
            .iter()
            .filter(|(_, handle)| clock.cancel_frame(*handle))
            .count();
        tracing::debug!(target: "glint.fx.emitter", revoked, "burst cancelled");
        revoked
    }
}

/// Repeating emission inside a rectangle, until cancelled.
#[derive(Debug, Clone)]
pub struct AmbientHandle {
    run: RunHandle,
}

impl AmbientHandle {
    #[must_use]
    pub fn run(&self) -> &RunHandle {
        &self.run
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.run.is_cancelled()
    }

    /// Stop emitting. Particles already out finish normally.
    pub fn cancel<H: FxHost>(&self, host: &mut H) -> bool {
        let cancelled = self.run.cancel(host.clock());
        if host.runs().finish(&self.run) && cancelled {
            host.counters().record_run_cancelled(self.run.kind(), self.run.node());
        }
        cancelled
    }
}

/// Spawns self-removing particles into a container node.
#[derive(Clone)]
pub struct EffectEmitter {
    container: NodeId,
    config: Rc<ParticleConfig>,
}

impl fmt::Debug for EffectEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectEmitter")
            .field("container", &self.container)
            .field("config", &self.config)
            .finish()
    }
}

impl EffectEmitter {
    /// Create a container under the surface root and emit into it.
    pub fn new<H: FxHost>(host: &mut H, config: ParticleConfig) -> Self {
        let surface = host.surface();
        let root = surface.root();
        let container = surface.create_node(NodeKind::Container);
        surface.attach(root, container);
        Self::with_container(container, config)
    }

    /// Emit into an existing container.
    #[must_use]
    pub fn with_container(container: NodeId, config: ParticleConfig) -> Self {
        Self {
            container,
            config: Rc::new(config),
        }
    }

    #[must_use]
    pub fn container(&self) -> NodeId {
        self.container
    }

    #[must_use]
    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }

    /// Spawn one particle at `(x, y)`. Coordinates are not checked.
    pub fn create_particle<H: FxHost>(&self, host: &mut H, x: f32, y: f32) -> ParticleToken {
        let config = &*self.config;
        let trajectory = Trajectory::roll(host.rng(), x, y, config);

        let surface = host.surface();
        let node = surface.create_node(NodeKind::Particle);
        surface.set_property(node, Property::Left, x);
        surface.set_property(node, Property::Top, y);
        surface.set_property(node, Property::Width, config.size);
        surface.set_property(node, Property::Height, config.size);
        surface.set_property(node, Property::Opacity, 0.0);
        surface.set_property(node, Property::Scale, 0.0);
        surface.set_color(node, config.rgb());
        surface.attach(self.container, node);
        host.counters().record_particle_spawned(node);

        let token = ParticleToken {
            inner: Rc::new(TokenInner {
                node,
                trajectory,
                state: Cell::new(ParticleState::Pending),
                fallback: Cell::new(None),
            }),
        };

        let (dx, dy) = trajectory.displacement();
        let request = TweenRequest::new(node, trajectory.lifetime)
            .easing(config.easing)
            .to(Property::TranslateX, dx)
            .to(Property::TranslateY, dy)
            .keyframes(Property::Opacity, Keyframes::envelope(1.0))
            .keyframes(Property::Scale, Keyframes::envelope(1.0));
        let on_done = token.clone();
        host.tweens().animate(
            request,
            Some(Box::new(move |host: &mut H| {
                on_done.remove(host, false);
            })),
        );
        token.inner.state.set(ParticleState::Animating);

        let on_timeout = token.clone();
        let timer = host.clock().request_timeout(
            trajectory.lifetime + config.fallback_grace(),
            Box::new(move |host: &mut H| {
                on_timeout.remove(host, true);
            }),
        );
        token.inner.fallback.set(Some(timer));
        token
    }

    /// Spawn `count` particles at `(x, y)`, one every stagger interval,
    /// starting on the next tick.
    pub fn burst<H: FxHost>(&self, host: &mut H, x: f32, y: f32, count: usize) -> BurstHandle {
        let count = self.config.cap_burst(count);
        let offsets = stagger_offsets(count, self.config.stagger(), self.config.stagger_mode());
        let clock = host.clock();
        let spawns = offsets
            .into_iter()
            .map(|offset| {
                let emitter = self.clone();
                let handle = clock.request_timeout(
                    offset,
                    Box::new(move |host: &mut H| {
                        emitter.create_particle(host, x, y);
                    }),
                );
                (offset, handle)
            })
            .collect();
        tracing::debug!(target: "glint.fx.emitter", x, y, count, "burst scheduled");
        BurstHandle { spawns }
    }

    /// [`burst`](Self::burst) with the configured default count.
    pub fn burst_default<H: FxHost>(&self, host: &mut H, x: f32, y: f32) -> BurstHandle {
        self.burst(host, x, y, self.config.burst_count)
    }

    /// Spawn one particle at a random point of `bounds` every `interval`
    /// (the configured interval when `None`), first after one interval.
    ///
    /// One ambient emission per emitter: starting another cancels this one.
    pub fn ambient<H: FxHost>(
        &self,
        host: &mut H,
        bounds: Bounds,
        interval: Option<Duration>,
    ) -> AmbientHandle {
        let interval = interval.unwrap_or_else(|| self.config.ambient_interval());
        let run = host.start_run(self.container, "ambient");
        tracing::debug!(
            target: "glint.fx.emitter",
            run = %run.id(),
            interval_ms = interval.as_millis() as u64,
            "ambient emission started"
        );
        schedule_ambient(host, self.clone(), run.clone(), bounds, interval);
        AmbientHandle { run }
    }
}

fn schedule_ambient<H: FxHost>(
    host: &mut H,
    emitter: EffectEmitter,
    run: RunHandle,
    bounds: Bounds,
    interval: Duration,
) {
    let next = run.clone();
    let token = run.token();
    run.schedule_after(
        host.clock(),
        interval,
        Box::new(move |host: &mut H| {
            if token.is_cancelled() {
                return;
            }
            let rng = host.rng();
            let x = bounds.x + rng.random::<f32>() * bounds.width;
            let y = bounds.y + rng.random::<f32>() * bounds.height;
            emitter.create_particle(host, x, y);
            schedule_ambient(host, emitter, next, bounds, interval);
        }),
    );
}
