use std::collections::HashMap;

use glam::Vec2;
use medusae::audio::events::AudioCommand;
use medusae::config::{SceneConfig, TrackingConfig};
use medusae::scene::Scene;
use medusae::tracking::hand::{HandObservation, LANDMARKS, TIPS};

const SIZE: Vec2 = Vec2::new(1280.0, 720.0);

fn scene() -> Scene {
    Scene::new(SIZE, &SceneConfig::default(), &TrackingConfig::default(), 42)
}

/// A hand observation whose thumb/index tips sit `gap` source pixels apart.
fn hand_with_gap(palm: Vec2, gap: f32) -> HandObservation {
    let mut landmarks = [palm; LANDMARKS];
    landmarks[TIPS[0]] = palm + Vec2::new(-gap / 2.0, 0.0);
    landmarks[TIPS[1]] = palm + Vec2::new(gap / 2.0, 0.0);
    HandObservation::from_landmarks(landmarks)
}

fn dispose_counts(cmds: &[AudioCommand]) -> HashMap<u64, usize> {
    let mut counts = HashMap::new();
    for cmd in cmds {
        if let AudioCommand::DisposeCreatureVoice { id } = cmd {
            *counts.entry(*id).or_insert(0) += 1;
        }
    }
    counts
}

#[test]
fn count_follows_hands_with_floor_of_one() {
    let mut scene = scene();
    let mut cmds = Vec::new();

    assert_eq!(scene.creatures.len(), 1);

    let two_hands = vec![
        hand_with_gap(Vec2::new(100.0, 100.0), 60.0),
        hand_with_gap(Vec2::new(220.0, 140.0), 60.0),
    ];
    scene.step(&two_hands, false, &mut cmds);
    assert_eq!(scene.creatures.len(), 2);

    let one_hand = vec![hand_with_gap(Vec2::new(100.0, 100.0), 60.0)];
    scene.step(&one_hand, false, &mut cmds);
    assert_eq!(scene.creatures.len(), 1);

    scene.step(&[], false, &mut cmds);
    assert_eq!(scene.creatures.len(), 1, "floor of one idle creature");
}

#[test]
fn removed_creatures_dispose_exactly_once() {
    let mut scene = scene();
    let mut cmds = Vec::new();

    let hands: Vec<_> = (0..4)
        .map(|i| hand_with_gap(Vec2::new(40.0 + i as f32 * 60.0, 120.0), 60.0))
        .collect();
    scene.step(&hands, false, &mut cmds);
    assert_eq!(scene.creatures.len(), 4);

    // Shrink in two stages, then tear the scene down entirely.
    scene.step(&hands[..2], false, &mut cmds);
    scene.step(&[], false, &mut cmds);
    scene.teardown(&mut cmds);

    let counts = dispose_counts(&cmds);
    // Four creatures ever existed; each voice released exactly once.
    assert_eq!(counts.len(), 4);
    for (id, n) in counts {
        assert_eq!(n, 1, "voice {id} disposed {n} times");
    }
}

#[test]
fn zero_hands_means_one_idle_creature_and_no_invert() {
    let mut scene = scene();
    let mut cmds = Vec::new();
    for _ in 0..100 {
        let any_fist = scene.step(&[], true, &mut cmds);
        assert!(!any_fist, "idle scene must never invert");
    }
    assert_eq!(scene.creatures.len(), 1);
    assert!(scene.creatures[0].is_idle);
    assert!(!scene.creatures[0].is_fist);
}

#[test]
fn fist_flags_follow_thumb_index_distance() {
    let mut scene = scene();
    let mut cmds = Vec::new();

    let hands = vec![
        hand_with_gap(Vec2::new(100.0, 100.0), 20.0),
        hand_with_gap(Vec2::new(220.0, 140.0), 50.0),
    ];
    let any_fist = scene.step(&hands, false, &mut cmds);
    assert!(scene.creatures[0].is_fist);
    assert!(!scene.creatures[1].is_fist);
    assert!(any_fist, "global signal is the OR of non-idle fists");
}

#[test]
fn fist_boundary_at_threshold_is_open() {
    let mut scene = scene();
    let mut cmds = Vec::new();

    let exactly = vec![hand_with_gap(Vec2::new(160.0, 120.0), 35.0)];
    let any_fist = scene.step(&exactly, false, &mut cmds);
    assert!(!scene.creatures[0].is_fist);
    assert!(!any_fist);

    let just_under = vec![hand_with_gap(Vec2::new(160.0, 120.0), 34.9)];
    let any_fist = scene.step(&just_under, false, &mut cmds);
    assert!(scene.creatures[0].is_fist);
    assert!(any_fist);
}

#[test]
fn creature_follows_its_own_hand_slot() {
    let mut scene = scene();
    let mut cmds = Vec::new();

    let left = Vec2::new(80.0, 60.0);
    let right = Vec2::new(260.0, 200.0);
    let hands = vec![hand_with_gap(left, 60.0), hand_with_gap(right, 60.0)];
    for _ in 0..120 {
        scene.step(&hands, false, &mut cmds);
    }

    // Palms map linearly from 320x240 video space into the canvas; after
    // plenty of easing each creature has converged on its own hand.
    let scale = Vec2::new(SIZE.x / 320.0, SIZE.y / 240.0);
    let expect0 = left * scale;
    let expect1 = right * scale;
    assert!(scene.creatures[0].pos.distance(expect0) < 5.0);
    assert!(scene.creatures[1].pos.distance(expect1) < 5.0);
    assert!(!scene.creatures[0].is_idle);
    assert!(!scene.creatures[1].is_idle);
}
