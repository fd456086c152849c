//! Sampling statistics of particle trajectories.

use std::f32::consts::{PI, TAU};
use std::time::Duration;

use glint_fx::{ParticleConfig, Trajectory};
use rand::SeedableRng;
use rand::rngs::SmallRng;

const SAMPLES: usize = 10_000;

fn samples(seed: u64, config: &ParticleConfig) -> Vec<Trajectory> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..SAMPLES)
        .map(|_| Trajectory::roll(&mut rng, 0.0, 0.0, config))
        .collect()
}

#[test]
fn angles_cover_the_circle_evenly() {
    let config = ParticleConfig::default();
    let mut bins = [0usize; 8];
    let mut sum = 0.0f64;
    for t in samples(42, &config) {
        assert!((0.0..TAU).contains(&t.angle));
        let bin = ((t.angle / TAU) * 8.0) as usize;
        bins[bin.min(7)] += 1;
        sum += f64::from(t.angle);
    }
    let expected = SAMPLES / 8;
    for (i, count) in bins.iter().enumerate() {
        assert!(count.abs_diff(expected) < 200, "bin {i}: {count}");
    }
    let mean = sum / SAMPLES as f64;
    assert!((mean - f64::from(PI)).abs() < 0.1, "mean angle {mean}");
}

#[test]
fn speed_and_lifetime_are_uniform_in_range() {
    let config = ParticleConfig::default();
    let draws = samples(7, &config);

    let mean_speed = draws.iter().map(|t| f64::from(t.speed)).sum::<f64>() / SAMPLES as f64;
    assert!((mean_speed - 100.0).abs() < 1.5, "mean speed {mean_speed}");
    assert!(draws.iter().all(|t| (50.0..150.0).contains(&t.speed)));

    let mean_life = draws.iter().map(|t| t.lifetime.as_secs_f64()).sum::<f64>() / SAMPLES as f64;
    assert!((mean_life - 1.0).abs() < 0.015, "mean lifetime {mean_life}");
    assert!(draws.iter().all(|t| {
        t.lifetime >= Duration::from_millis(500) && t.lifetime < Duration::from_millis(1500)
    }));
}

#[test]
fn displacement_length_is_speed() {
    let config = ParticleConfig::default();
    for t in samples(3, &config).into_iter().take(500) {
        let (dx, dy) = t.displacement();
        assert!((dx.hypot(dy) - t.speed).abs() < 1e-3);
    }
}

#[test]
fn custom_ranges_are_respected() {
    let config = ParticleConfig {
        min_speed: 10.0,
        max_speed: 20.0,
        min_lifetime_ms: 100,
        max_lifetime_ms: 200,
        ..ParticleConfig::default()
    };
    for t in samples(5, &config) {
        assert!((10.0..20.0).contains(&t.speed));
        assert!(t.lifetime >= Duration::from_millis(100));
        assert!(t.lifetime < Duration::from_millis(200));
    }
}
