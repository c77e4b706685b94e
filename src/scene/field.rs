use glam::Vec2;
use noise::{NoiseFn, Perlin};

/// Shared coherent-noise source for idle wander, particle flow and vine
/// steering. Output is normalized to [0, 1] like the classic creative-coding
/// `noise()` call the animation constants were tuned against.
pub struct NoiseField {
    perlin: Perlin,
}

impl NoiseField {
    pub fn new(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
        }
    }

    pub fn sample01(&self, x: f32, y: f32, z: f32) -> f32 {
        let v = self.perlin.get([x as f64, y as f64, z as f64]) as f32;
        (v * 0.5 + 0.5).clamp(0.0, 1.0)
    }

    /// 1-D slice of the field, for scalar wander offsets.
    pub fn sample01_1d(&self, t: f32) -> f32 {
        self.sample01(t, 0.0, 0.0)
    }

    /// Flow-field heading at `pos`: up to two full turns of curl.
    pub fn flow_angle(&self, pos: Vec2, frame: u64) -> f32 {
        self.sample01(pos.x * 0.003, pos.y * 0.003, frame as f32 * 0.0005)
            * std::f32::consts::TAU
            * 4.0
    }

    /// Vine steering heading at `pos`; coarser and slower than the flow field.
    pub fn vine_angle(&self, pos: Vec2, frame: u64) -> f32 {
        self.sample01(pos.x * 0.01, pos.y * 0.01, frame as f32 * 0.005) * std::f32::consts::TAU
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_stays_in_unit_range() {
        let field = NoiseField::new(7);
        for i in 0..200 {
            let t = i as f32 * 0.37;
            let v = field.sample01(t, t * 0.5, t * 0.1);
            assert!((0.0..=1.0).contains(&v), "v={v}");
        }
    }

    #[test]
    fn same_seed_same_field() {
        let a = NoiseField::new(42);
        let b = NoiseField::new(42);
        assert_eq!(a.sample01(1.5, 2.5, 0.0), b.sample01(1.5, 2.5, 0.0));
    }
}
