use crate::{HandLandmark, LandmarkSet, Verdict};

/// (tip, PIP joint) pairs for index, middle, ring and pinky. The thumb is
/// not considered.
pub const FINGERS: [(HandLandmark, HandLandmark); 4] = [
    (HandLandmark::IndexTip, HandLandmark::IndexPip),
    (HandLandmark::MiddleTip, HandLandmark::MiddlePip),
    (HandLandmark::RingTip, HandLandmark::RingPip),
    (HandLandmark::PinkyTip, HandLandmark::PinkyPip),
];

/// Fingers needed for an OPEN verdict.
pub const OPEN_THRESHOLD: usize = 3;

/// Number of fingers whose tip is above (smaller y than) its PIP joint.
pub fn extended_fingers(set: &LandmarkSet) -> usize {
    FINGERS
        .iter()
        .filter(|(tip, pip)| set[*tip].y < set[*pip].y)
        .count()
}

/// OPEN with at least three extended fingers, CLOSED otherwise, UNKNOWN
/// without a hand.
pub fn classify(set: Option<&LandmarkSet>) -> Verdict {
    match set {
        None => Verdict::Unknown,
        Some(set) if extended_fingers(set) >= OPEN_THRESHOLD => Verdict::Open,
        Some(_) => Verdict::Closed,
    }
}

/// Verdict for a frame with several hands: the last hand wins.
pub fn classify_hands(hands: &[LandmarkSet]) -> Verdict {
    classify(hands.last())
}
