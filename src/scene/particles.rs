use glam::Vec2;
use rand::Rng;

use crate::scene::field::NoiseField;

/// Repulsion radius around the primary creature.
const REPEL_RADIUS: f32 = 250.0;
/// Repulsion strength at zero distance; falls off linearly to the radius.
const REPEL_STRENGTH: f32 = 3.0;
const FLOW_FORCE: f32 = 0.5;

/// One drifting particle of the ambient "current" layer. Follows the noise
/// flow field, is weakly pushed away from the primary creature, and wraps
/// toroidally at the canvas edges.
pub struct FlowParticle {
    pub pos: Vec2,
    pub prev_pos: Vec2,
    vel: Vec2,
    acc: Vec2,
    max_speed: f32,
}

impl FlowParticle {
    pub fn new<R: Rng + ?Sized>(size: Vec2, rng: &mut R) -> Self {
        let pos = Vec2::new(rng.random_range(0.0..size.x), rng.random_range(0.0..size.y));
        Self {
            pos,
            prev_pos: pos,
            vel: Vec2::ZERO,
            acc: Vec2::ZERO,
            max_speed: rng.random_range(2.0..5.0),
        }
    }

    pub fn step(&mut self, field: &NoiseField, frame: u64, repel: Option<Vec2>, size: Vec2) {
        let angle = field.flow_angle(self.pos, frame);
        self.acc += Vec2::from_angle(angle) * FLOW_FORCE;

        self.prev_pos = self.pos;
        if let Some(target) = repel {
            let away = self.pos - target;
            let d = away.length();
            if d < REPEL_RADIUS {
                let strength = REPEL_STRENGTH * (1.0 - d / REPEL_RADIUS);
                self.acc += away.normalize_or_zero() * strength;
            }
        }

        self.vel = (self.vel + self.acc).clamp_length_max(self.max_speed);
        self.pos += self.vel;
        self.acc = Vec2::ZERO;

        // Toroidal wrap; the trail anchor moves with the jump so no line is
        // drawn across the whole canvas.
        if self.pos.x > size.x {
            self.pos.x = 0.0;
            self.prev_pos.x = 0.0;
        }
        if self.pos.x < 0.0 {
            self.pos.x = size.x;
            self.prev_pos.x = size.x;
        }
        if self.pos.y > size.y {
            self.pos.y = 0.0;
            self.prev_pos.y = 0.0;
        }
        if self.pos.y < 0.0 {
            self.pos.y = size.y;
            self.prev_pos.y = size.y;
        }
    }
}
