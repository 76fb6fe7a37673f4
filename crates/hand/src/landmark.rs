use {crate::HandError, std::ops::Index};

/// Number of points in a hand landmark set.
pub const LANDMARK_COUNT: usize = 21;

/// One tracked point. `x` and `y` are normalized to [0, 1] image space,
/// `z` is depth relative to the wrist.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Largest pixel offset `Landmark::to_pixel` reports, far outside any frame.
pub const PIXEL_LIMIT: i32 = 1 << 20;

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Pixel position inside a `width` x `height` frame, clamped to
    /// ±`PIXEL_LIMIT`. A NaN coordinate maps to 0.
    pub fn to_pixel(&self, width: usize, height: usize) -> (i32, i32) {
        let limit = PIXEL_LIMIT as f32;
        (
            (self.x * width as f32).clamp(-limit, limit) as i32,
            (self.y * height as f32).clamp(-limit, limit) as i32,
        )
    }
}

/// Names for the 21 points of the hand topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum HandLandmark {
    Wrist = 0,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexMcp,
    IndexPip,
    IndexDip,
    IndexTip,
    MiddleMcp,
    MiddlePip,
    MiddleDip,
    MiddleTip,
    RingMcp,
    RingPip,
    RingDip,
    RingTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

impl HandLandmark {
    pub const fn index(self) -> usize {
        self as usize
    }
}

use HandLandmark::*;

/// Skeleton edges drawn by the overlay.
pub const HAND_CONNECTIONS: [(HandLandmark, HandLandmark); 21] = [
    (Wrist, ThumbCmc),
    (ThumbCmc, ThumbMcp),
    (ThumbMcp, ThumbIp),
    (ThumbIp, ThumbTip),
    (Wrist, IndexMcp),
    (IndexMcp, IndexPip),
    (IndexPip, IndexDip),
    (IndexDip, IndexTip),
    (IndexMcp, MiddleMcp),
    (MiddleMcp, MiddlePip),
    (MiddlePip, MiddleDip),
    (MiddleDip, MiddleTip),
    (MiddleMcp, RingMcp),
    (RingMcp, RingPip),
    (RingPip, RingDip),
    (RingDip, RingTip),
    (RingMcp, PinkyMcp),
    (Wrist, PinkyMcp),
    (PinkyMcp, PinkyPip),
    (PinkyPip, PinkyDip),
    (PinkyDip, PinkyTip),
];

/// The 21 landmarks of one detected hand, in topology order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandmarkSet {
    points: [Landmark; LANDMARK_COUNT],
}

impl LandmarkSet {
    pub const fn new(points: [Landmark; LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    /// Build from a flat `[x0, y0, z0, x1, ...]` buffer of 63 values.
    pub fn from_flat(values: &[f32]) -> Result<Self, HandError> {
        if values.len() != LANDMARK_COUNT * 3 {
            return Err(HandError::Inference(format!(
                "expected {} landmark values, got {}",
                LANDMARK_COUNT * 3,
                values.len()
            )));
        }
        let mut points = [Landmark::default(); LANDMARK_COUNT];
        for (point, xyz) in points.iter_mut().zip(values.chunks_exact(3)) {
            *point = Landmark::new(xyz[0], xyz[1], xyz[2]);
        }
        Ok(Self { points })
    }

    pub fn get(&self, landmark: HandLandmark) -> Landmark {
        self.points[landmark.index()]
    }

    pub fn wrist(&self) -> Landmark {
        self.get(Wrist)
    }

    pub fn points(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.points
    }

    pub fn points_mut(&mut self) -> &mut [Landmark; LANDMARK_COUNT] {
        &mut self.points
    }

    /// Normalized bounding box as `(min_x, min_y, max_x, max_y)`.
    pub fn bounds(&self) -> (f32, f32, f32, f32) {
        self.points.iter().fold(
            (f32::MAX, f32::MAX, f32::MIN, f32::MIN),
            |(x0, y0, x1, y1), p| (x0.min(p.x), y0.min(p.y), x1.max(p.x), y1.max(p.y)),
        )
    }
}

impl Index<HandLandmark> for LandmarkSet {
    type Output = Landmark;

    fn index(&self, landmark: HandLandmark) -> &Landmark {
        &self.points[landmark.index()]
    }
}

impl Index<usize> for LandmarkSet {
    type Output = Landmark;

    fn index(&self, index: usize) -> &Landmark {
        &self.points[index]
    }
}
