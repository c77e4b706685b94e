use glam::Vec2;

pub const SEGMENTS: usize = 20;

/// Lerp factor for the tip chasing its target; small so the chain trails.
const TIP_EASE: f32 = 0.1;
/// Lerp factor for each point relaxing toward its predecessor.
const RELAX_EASE: f32 = 0.4;
/// Minimum spacing between neighboring points; keeps a resting chain from
/// collapsing into a single dot.
const MIN_SPACING: f32 = 3.0;
/// Amplitude of the per-group oscillation added to the tip target.
const WAVE_AMP: f32 = 10.0;

/// A chain of points trailing from a creature core toward a moving target
/// (a fingertip, or an orbit point while idle).
pub struct Tentacle {
    pub group: usize,
    points: Vec<Vec2>,
}

impl Tentacle {
    pub fn new(group: usize, origin: Vec2) -> Self {
        Self {
            group,
            points: vec![origin; SEGMENTS],
        }
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// One relaxation pass: pin the root, ease the tip toward `target` (plus
    /// a group-phased oscillation), then pull every point toward its
    /// predecessor while keeping at least `MIN_SPACING` between them.
    pub fn update(&mut self, root: Vec2, target: Vec2, frame: u64) {
        self.points[0] = root;

        let wave = (frame as f32 * 0.1 + self.group as f32).sin() * WAVE_AMP;
        let last = self.points.len() - 1;
        self.points[last] = self.points[last].lerp(target + Vec2::splat(wave), TIP_EASE);

        for i in 1..self.points.len() {
            let prev = self.points[i - 1];
            let mut curr = self.points[i].lerp(prev, RELAX_EASE);
            let offset = curr - prev;
            if offset.length() < MIN_SPACING {
                let dir = if offset.length_squared() > f32::EPSILON {
                    offset.normalize()
                } else {
                    // Coincident points have no away direction; pick one.
                    Vec2::X
                };
                curr = prev + dir * MIN_SPACING;
            }
            self.points[i] = curr;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn min_gap(t: &Tentacle) -> f32 {
        t.points()
            .windows(2)
            .map(|w| w[0].distance(w[1]))
            .fold(f32::MAX, f32::min)
    }

    #[test]
    fn spacing_never_collapses() {
        let mut t = Tentacle::new(2, Vec2::new(100.0, 100.0));
        let root = Vec2::new(100.0, 100.0);
        for frame in 0..500 {
            let target = Vec2::new(
                100.0 + (frame as f32 * 0.13).sin() * 50.0,
                100.0 + (frame as f32 * 0.07).cos() * 50.0,
            );
            t.update(root, target, frame);
            assert!(min_gap(&t) >= MIN_SPACING - 1e-3, "frame {frame}");
        }
    }

    #[test]
    fn coincident_chain_spreads_out() {
        let p = Vec2::new(50.0, 50.0);
        let mut t = Tentacle::new(0, p);
        t.update(p, p, 0);
        assert!(min_gap(&t) >= MIN_SPACING - 1e-3);
    }

    #[test]
    fn root_is_pinned() {
        let mut t = Tentacle::new(1, Vec2::ZERO);
        let root = Vec2::new(10.0, 20.0);
        t.update(root, Vec2::new(300.0, 300.0), 42);
        assert_eq!(t.points()[0], root);
    }
}
