//! The facade drives every effect through one stage.

use std::time::Duration;

use glint::prelude::*;
use tracing_test::traced_test;

#[test]
#[traced_test]
fn all_effects_share_one_stage() {
    let mut stage = Stage::with_seed(MemorySurface::new(), 21);
    let root = stage.surface().root();
    let title = stage.surface().create_node(NodeKind::Text);
    let cursor = stage.surface().create_node(NodeKind::Container);
    stage.surface().attach(root, title);
    stage.surface().attach(root, cursor);
    let baseline = stage.surface().node_count();

    let config = FxConfig::default();
    let scrambled = ScrambleText::new(config.scramble.clone()).set_text(&mut stage, title, "hello");
    let emitter = EffectEmitter::new(&mut stage, config.particles.clone());
    emitter.burst_default(&mut stage, 5.0, 5.0);
    let follower = CursorFollower::start(&mut stage, cursor, config.cursor.clone());
    follower.set_target(30.0, 8.0);
    let toasted = toast(&mut stage, root, "saved", &config.toast);

    for _ in 0..300 {
        stage.tick(Duration::from_millis(16));
    }
    assert!(scrambled.is_resolved());
    assert!(toasted.is_resolved());
    assert_eq!(stage.surface().text(title), Some("hello"));
    assert_eq!(stage.stats().particles_live(), 0);

    follower.stop(&mut stage);
    assert!(stage.run_until_idle(Duration::from_millis(16), 1_000).is_some());
    // the emitter's container stays behind
    assert_eq!(stage.surface().node_count(), baseline + 1);

    assert!(logs_contain("burst scheduled"));
    assert!(logs_contain("toast removed"));
}

#[test]
fn grid_shows_the_settled_text() {
    let mut stage = Stage::with_seed(MemorySurface::new(), 5);
    let root = stage.surface().root();
    let title = stage.surface().create_node(NodeKind::Text);
    stage.surface().attach(root, title);
    stage.surface().set_property(title, Property::Left, 2.0);
    stage.surface().set_property(title, Property::Top, 1.0);

    ScrambleText::new(ScrambleConfig::default()).set_text(&mut stage, title, "glint");
    stage.run_until_idle(Duration::from_millis(16), 1_000);

    let grid = glint::Grid::render(stage.surface_ref(), 10, 3);
    assert_eq!(grid.row(1), "  glint");
}
