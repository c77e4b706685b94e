use glam::Vec2;
use medusae::audio::events::AudioCommand;
use medusae::config::{SceneConfig, TrackingConfig};
use medusae::scene::Scene;

const SIZE: Vec2 = Vec2::new(1024.0, 576.0);

/// Rebuilding the scene (the resize path) is idempotent: every rebuild
/// starts from exactly one creature and the configured particle count.
#[test]
fn repeated_reinit_yields_the_same_scene() {
    let scene_cfg = SceneConfig::default();
    let tracking_cfg = TrackingConfig::default();

    let mut cmds = Vec::new();
    let mut scene = Scene::new(SIZE, &scene_cfg, &tracking_cfg, 5);
    assert_eq!(scene.creatures.len(), 1);
    assert_eq!(scene.particles.len(), 120);
    assert!(scene.vines.is_empty());

    // Run it for a while so the rebuild really discards accumulated state.
    for _ in 0..200 {
        scene.step(&[], false, &mut cmds);
    }
    assert!(!scene.vines.is_empty(), "vines accumulate while running");

    scene.teardown(&mut cmds);
    let disposes = cmds
        .iter()
        .filter(|c| matches!(c, AudioCommand::DisposeCreatureVoice { .. }))
        .count();
    assert_eq!(disposes, 1, "teardown releases the lone creature voice");

    let scene = Scene::new(SIZE, &scene_cfg, &tracking_cfg, 5);
    assert_eq!(scene.creatures.len(), 1);
    assert_eq!(scene.particles.len(), 120);
    assert!(scene.vines.is_empty());
    assert_eq!(scene.frame, 0);

    // And once more, straight away.
    let scene = Scene::new(SIZE, &scene_cfg, &tracking_cfg, 5);
    assert_eq!(scene.creatures.len(), 1);
    assert_eq!(scene.particles.len(), 120);
}

/// The particle count comes from configuration, not a hard-coded constant.
#[test]
fn particle_count_is_configurable() {
    let scene_cfg = SceneConfig {
        flow_particles: 40,
        ..SceneConfig::default()
    };
    let scene = Scene::new(SIZE, &scene_cfg, &TrackingConfig::default(), 5);
    assert_eq!(scene.particles.len(), 40);
}

/// Vines accumulate up to the configured cap and expired ones are removed.
#[test]
fn vine_population_is_bounded() {
    let scene_cfg = SceneConfig {
        max_vines: 10,
        vine_spawn_period: 1,
        ..SceneConfig::default()
    };
    let mut scene = Scene::new(SIZE, &scene_cfg, &TrackingConfig::default(), 5);
    let mut cmds = Vec::new();
    for _ in 0..500 {
        scene.step(&[], false, &mut cmds);
        assert!(scene.vines.len() <= 10);
    }
    assert!(!scene.vines.is_empty());
}
