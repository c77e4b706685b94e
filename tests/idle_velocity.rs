use glam::Vec2;
use medusae::audio::events::{AudioCommand, VoiceId};
use medusae::config::{SceneConfig, TrackingConfig};
use medusae::scene::Scene;

/// An idle creature keeps wandering visually, but the activity cue fed to
/// its wind voice must be exactly zero the whole time.
#[test]
fn idle_wander_feeds_zero_velocity_to_audio() {
    let mut scene = Scene::new(
        Vec2::new(1280.0, 720.0),
        &SceneConfig::default(),
        &TrackingConfig::default(),
        13,
    );
    let mut cmds = Vec::new();
    let mut moved = 0.0f32;
    let mut wind_levels = 0usize;

    let mut prev = scene.creatures[0].pos;
    for _ in 0..300 {
        cmds.clear();
        scene.step(&[], true, &mut cmds);

        moved += scene.creatures[0].pos.distance(prev);
        prev = scene.creatures[0].pos;

        for cmd in &cmds {
            if let AudioCommand::SetLevel {
                voice: VoiceId::Wind(_),
                level,
                ..
            } = cmd
            {
                wind_levels += 1;
                assert_eq!(*level, 0.0, "idle drift must not drive the wind voice");
            }
        }
    }

    assert!(wind_levels > 0, "wind parameters are emitted every frame");
    assert!(moved > 1.0, "the idle creature still drifts visually");
}
