use {
    crate::{HAND_CONNECTIONS, LandmarkSet, Verdict, classify},
    image::{
        Frame,
        draw::{draw_filled_circle, draw_line, draw_text},
    },
};

pub const CONNECTION_COLOR: [u8; 3] = [224, 224, 224];
pub const LANDMARK_COLOR: [u8; 3] = [255, 0, 0];
pub const LABEL_COLOR: [u8; 3] = [0, 255, 0];

/// Label baseline offset above the wrist, in pixels.
pub const LABEL_OFFSET: i32 = 30;
pub const LABEL_SCALE: u32 = 4;

/// Draw the hand skeleton: connections first, then the joints on top.
pub fn draw_hand(frame: &mut Frame, set: &LandmarkSet) {
    let (w, h) = (frame.width(), frame.height());
    for (a, b) in HAND_CONNECTIONS {
        draw_line(frame, set[a].to_pixel(w, h), set[b].to_pixel(w, h), 2, CONNECTION_COLOR);
    }
    for point in set.points() {
        draw_filled_circle(frame, point.to_pixel(w, h), 3, LANDMARK_COLOR);
    }
}

/// Write the verdict 30 px above the wrist.
pub fn draw_label(frame: &mut Frame, set: &LandmarkSet, verdict: Verdict) {
    let (x, y) = set.wrist().to_pixel(frame.width(), frame.height());
    let origin = (x, y.saturating_sub(LABEL_OFFSET));
    draw_text(frame, verdict.as_str(), origin, LABEL_SCALE, LABEL_COLOR);
}

/// Overlay every hand and return the frame's verdict, which is the verdict
/// of the last hand drawn. UNKNOWN when `hands` is empty.
pub fn annotate(frame: &mut Frame, hands: &[LandmarkSet]) -> Verdict {
    let mut verdict = Verdict::Unknown;
    for set in hands {
        draw_hand(frame, set);
        verdict = classify(Some(set));
        draw_label(frame, set, verdict);
    }
    verdict
}
