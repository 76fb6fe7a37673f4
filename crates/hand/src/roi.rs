use {
    crate::{HandError, LANDMARK_COUNT, LandmarkSet},
    base::Vec2,
    image::Frame,
};

/// Growth applied to a hand's bounding box when it seeds the next crop.
pub const TRACKING_SCALE: f32 = 2.0;

// smallest crop side in pixels
const MIN_SIDE: f32 = 32.0;

/// A square crop of the frame in pixel coordinates. The square may extend
/// past the frame edges; samples there read as black.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Roi {
    pub x: f32,
    pub y: f32,
    pub side: f32,
}

impl Roi {
    /// The smallest square centered on the frame that covers all of it.
    pub fn full(size: Vec2<usize>) -> Self {
        let (w, h) = (size.x as f32, size.y as f32);
        let side = w.max(h);
        Self {
            x: (w - side) / 2.0,
            y: (h - side) / 2.0,
            side,
        }
    }

    /// A square around a tracked hand, grown by `scale`.
    pub fn around(set: &LandmarkSet, size: Vec2<usize>, scale: f32) -> Self {
        let (w, h) = (size.x as f32, size.y as f32);
        let (x0, y0, x1, y1) = set.bounds();
        let (cx, cy) = ((x0 + x1) / 2.0 * w, (y0 + y1) / 2.0 * h);
        let side = ((x1 - x0) * w).max((y1 - y0) * h) * scale;
        let side = side.max(MIN_SIDE);
        Self {
            x: cx - side / 2.0,
            y: cy - side / 2.0,
            side,
        }
    }

    /// Nearest-neighbour sample of the crop into an `input` x `input` RGB
    /// tensor, HWC, values in [0, 1].
    pub fn sample(&self, frame: &Frame, input: usize) -> Vec<f32> {
        let (w, h) = (frame.width() as i64, frame.height() as i64);
        let step = self.side / input as f32;
        let data = frame.data();
        let mut tensor = vec![0.0f32; input * input * 3];
        for out_y in 0..input {
            let src_y = (self.y + (out_y as f32 + 0.5) * step).floor() as i64;
            if src_y < 0 || src_y >= h {
                continue;
            }
            for out_x in 0..input {
                let src_x = (self.x + (out_x as f32 + 0.5) * step).floor() as i64;
                if src_x < 0 || src_x >= w {
                    continue;
                }
                let src = ((src_y * w + src_x) * 3) as usize;
                let dst = (out_y * input + out_x) * 3;
                for ch in 0..3 {
                    tensor[dst + ch] = data[src + ch] as f32 / 255.0;
                }
            }
        }
        tensor
    }

    /// Map raw model landmarks (input-pixel coordinates, 63 values) back to
    /// normalized frame coordinates.
    pub fn to_frame(
        &self,
        raw: &[f32],
        input: usize,
        size: Vec2<usize>,
    ) -> Result<LandmarkSet, HandError> {
        if raw.len() < LANDMARK_COUNT * 3 {
            return Err(HandError::Inference(format!(
                "expected {} landmark values, got {}",
                LANDMARK_COUNT * 3,
                raw.len()
            )));
        }
        let (w, h) = (size.x as f32, size.y as f32);
        let scale = self.side / input as f32;
        let mut set = LandmarkSet::from_flat(&raw[..LANDMARK_COUNT * 3])?;
        for point in set.points_mut() {
            point.x = (self.x + point.x * scale) / w;
            point.y = (self.y + point.y * scale) / h;
            point.z = point.z * scale / w;
        }
        Ok(set)
    }
}
