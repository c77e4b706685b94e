use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;

use crate::scene::field::NoiseField;

const LIFE_START: f32 = 255.0;
const LIFE_DECAY: f32 = 1.5;
const CENTER_PULL: f32 = 0.5;
const NOISE_STEER: f32 = 0.8;
const MAX_SPEED: f32 = 2.0;

/// A growth line spawned at a canvas edge: drifts toward the center with
/// noise-driven wobble, leaves a bounded trail, and fades out over its life.
pub struct EdgeVine {
    pub pos: Vec2,
    vel: Vec2,
    pub history: VecDeque<Vec2>,
    max_len: usize,
    pub life: f32,
}

impl EdgeVine {
    pub fn new<R: Rng + ?Sized>(size: Vec2, rng: &mut R) -> Self {
        let (pos, vel) = match rng.random_range(0..4) {
            0 => (
                Vec2::new(rng.random_range(0.0..size.x), -10.0),
                Vec2::new(0.0, rng.random_range(1.0..3.0)),
            ),
            1 => (
                Vec2::new(size.x + 10.0, rng.random_range(0.0..size.y)),
                Vec2::new(rng.random_range(-3.0..-1.0), 0.0),
            ),
            2 => (
                Vec2::new(rng.random_range(0.0..size.x), size.y + 10.0),
                Vec2::new(0.0, rng.random_range(-3.0..-1.0)),
            ),
            _ => (
                Vec2::new(-10.0, rng.random_range(0.0..size.y)),
                Vec2::new(rng.random_range(1.0..3.0), 0.0),
            ),
        };
        Self {
            pos,
            vel,
            history: VecDeque::new(),
            max_len: rng.random_range(50..150),
            life: LIFE_START,
        }
    }

    pub fn step(&mut self, field: &NoiseField, frame: u64, size: Vec2) {
        self.life -= LIFE_DECAY;
        self.history.push_back(self.pos);
        if self.history.len() > self.max_len {
            self.history.pop_front();
        }

        let center_dir = (size * 0.5 - self.pos).normalize_or_zero() * CENTER_PULL;
        let noise_dir = Vec2::from_angle(field.vine_angle(self.pos, frame)) * NOISE_STEER;
        self.vel = (self.vel + center_dir + noise_dir).clamp_length_max(MAX_SPEED);
        self.pos += self.vel;
    }

    pub fn is_dead(&self) -> bool {
        self.life < 0.0
    }
}
