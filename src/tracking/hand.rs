use glam::Vec2;

/// Number of labeled landmarks in one hand observation.
pub const LANDMARKS: usize = 21;

/// Landmark index of the palm anchor (middle-finger MCP).
pub const PALM: usize = 9;

/// Landmark indices of the five fingertips, thumb first.
pub const TIPS: [usize; 5] = [4, 8, 12, 16, 20];

/// One hand observation as delivered by the pose producer: a fixed list of
/// 21 landmark points in source-frame (video) pixel coordinates. Validated
/// once at this boundary; consumers index it without further checks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandObservation {
    landmarks: [Vec2; LANDMARKS],
}

impl HandObservation {
    pub fn from_landmarks(landmarks: [Vec2; LANDMARKS]) -> Self {
        Self { landmarks }
    }

    /// Accepts a producer-shaped slice; rejects anything that is not exactly
    /// 21 finite points.
    pub fn from_slice(points: &[Vec2]) -> Option<Self> {
        if points.len() != LANDMARKS {
            return None;
        }
        if points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return None;
        }
        let mut landmarks = [Vec2::ZERO; LANDMARKS];
        landmarks.copy_from_slice(points);
        Some(Self { landmarks })
    }

    pub fn palm(&self) -> Vec2 {
        self.landmarks[PALM]
    }

    pub fn tips(&self) -> [Vec2; 5] {
        TIPS.map(|i| self.landmarks[i])
    }

    /// Fist gesture: thumb tip and index tip closer than `threshold` source
    /// pixels. The boundary itself (distance == threshold) is an open hand.
    pub fn is_fist(&self, threshold: f32) -> bool {
        let tips = self.tips();
        tips[0].distance(tips[1]) < threshold
    }
}

/// Map a point from source (video) pixel space into canvas space.
pub fn map_to_canvas(p: Vec2, video_size: Vec2, canvas_size: Vec2) -> Vec2 {
    Vec2::new(
        p.x / video_size.x * canvas_size.x,
        p.y / video_size.y * canvas_size.y,
    )
}
