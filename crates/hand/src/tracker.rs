use {
    crate::{HandError, LandmarkSet},
    image::Frame,
};

/// Pose-inference collaborator: finds hands in a frame.
pub trait HandTracker {
    /// Landmarks for each detected hand, at most `max_hands` of them.
    fn infer(&mut self, frame: &Frame) -> Result<Vec<LandmarkSet>, HandError>;

    /// Release the inference session.
    fn close(&mut self) {}
}

impl<T: HandTracker + ?Sized> HandTracker for Box<T> {
    fn infer(&mut self, frame: &Frame) -> Result<Vec<LandmarkSet>, HandError> {
        (**self).infer(frame)
    }

    fn close(&mut self) {
        (**self).close()
    }
}

/// Tracker tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerConfig {
    max_hands: usize,
    min_detection_confidence: f32,
    min_tracking_confidence: f32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_hands: 1,
            min_detection_confidence: 0.5,
            min_tracking_confidence: 0.5,
        }
    }
}

impl TrackerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_hands(mut self, max_hands: usize) -> Self {
        self.max_hands = max_hands;
        self
    }

    pub fn with_min_detection_confidence(mut self, confidence: f32) -> Self {
        self.min_detection_confidence = confidence.clamp(0.0, 1.0);
        self
    }

    pub fn with_min_tracking_confidence(mut self, confidence: f32) -> Self {
        self.min_tracking_confidence = confidence.clamp(0.0, 1.0);
        self
    }

    pub fn max_hands(&self) -> usize {
        self.max_hands
    }

    pub fn min_detection_confidence(&self) -> f32 {
        self.min_detection_confidence
    }

    pub fn min_tracking_confidence(&self) -> f32 {
        self.min_tracking_confidence
    }
}

/// A tracker that never sees a hand.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHands;

impl HandTracker for NoHands {
    fn infer(&mut self, _frame: &Frame) -> Result<Vec<LandmarkSet>, HandError> {
        Ok(Vec::new())
    }
}
