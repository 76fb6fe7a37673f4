use {
    base::Vec2,
    hand::{
        FINGERS, HAND_CONNECTIONS, LANDMARK_COUNT, Landmark, LandmarkSet, PIXEL_LIMIT, Verdict,
        overlay::{LABEL_COLOR, LANDMARK_COLOR, annotate, draw_hand, draw_label},
    },
    image::Frame,
};

const BLACK: [u8; 3] = [0, 0, 0];

fn hand_at(x: f32, y: f32, open: bool) -> LandmarkSet {
    let mut points = [Landmark::new(x, y, 0.0); LANDMARK_COUNT];
    for (tip, pip) in FINGERS {
        points[pip.index()].y = y - 0.05;
        points[tip.index()].y = if open { y - 0.1 } else { y };
    }
    LandmarkSet::new(points)
}

fn count(frame: &Frame, color: [u8; 3]) -> usize {
    frame
        .data()
        .chunks_exact(3)
        .filter(|p| *p == color)
        .count()
}

#[test]
fn test_connections_cover_every_landmark() {
    let mut seen = [false; LANDMARK_COUNT];
    for (a, b) in HAND_CONNECTIONS {
        seen[a.index()] = true;
        seen[b.index()] = true;
    }
    assert!(seen.iter().all(|s| *s));
}

#[test]
fn test_draw_hand_marks_joints() {
    let mut frame = Frame::filled(Vec2::new(64, 48), BLACK);
    draw_hand(&mut frame, &hand_at(0.5, 0.5, true));
    assert_eq!(frame.pixel(32, 24), Some(LANDMARK_COLOR));
}

#[test]
fn test_label_sits_above_wrist() {
    let mut frame = Frame::filled(Vec2::new(640, 480), BLACK);
    let set = hand_at(0.25, 0.5, true);
    draw_label(&mut frame, &set, Verdict::Open);

    let wrist_y = 240;
    let mut lowest = 0;
    for y in 0..frame.height() {
        for x in 0..frame.width() {
            if frame.pixel(x, y) == Some(LABEL_COLOR) {
                lowest = lowest.max(y);
                assert!(x >= 160);
            }
        }
    }
    assert!(count(&frame, LABEL_COLOR) > 0);
    assert_eq!(lowest, wrist_y - 30);
}

#[test]
fn test_annotate_returns_last_verdict() {
    let mut frame = Frame::filled(Vec2::new(320, 240), BLACK);
    let hands = [hand_at(0.3, 0.6, true), hand_at(0.7, 0.6, false)];
    assert_eq!(annotate(&mut frame, &hands), Verdict::Closed);

    let mut frame = Frame::filled(Vec2::new(320, 240), BLACK);
    let hands = [hand_at(0.7, 0.6, false), hand_at(0.3, 0.6, true)];
    assert_eq!(annotate(&mut frame, &hands), Verdict::Open);
    assert!(count(&frame, LABEL_COLOR) > 0);
}

#[test]
fn test_annotate_without_hands_leaves_frame() {
    let mut frame = Frame::filled(Vec2::new(32, 32), BLACK);
    assert_eq!(annotate(&mut frame, &[]), Verdict::Unknown);
    assert_eq!(count(&frame, BLACK), 32 * 32);
}

#[test]
fn test_annotate_survives_garbage_landmarks() {
    for value in [f32::INFINITY, f32::NEG_INFINITY, f32::NAN, 1e30, -1e30] {
        let mut frame = Frame::filled(Vec2::new(64, 48), BLACK);
        let mut set = hand_at(0.5, 0.5, true);
        for point in set.points_mut() {
            point.x = value;
        }
        annotate(&mut frame, &[set]);

        let mut set = hand_at(0.5, 0.5, false);
        set.points_mut()[0] = Landmark::new(value, value, value);
        annotate(&mut frame, &[set]);
    }
}

#[test]
fn test_to_pixel_is_clamped() {
    assert_eq!(
        Landmark::new(f32::INFINITY, f32::NEG_INFINITY, 0.0).to_pixel(640, 480),
        (PIXEL_LIMIT, -PIXEL_LIMIT)
    );
    assert_eq!(Landmark::new(f32::NAN, 0.5, 0.0).to_pixel(640, 480), (0, 240));
}
