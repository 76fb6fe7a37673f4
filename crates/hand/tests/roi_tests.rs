use {
    base::Vec2,
    hand::{LANDMARK_COUNT, Landmark, LandmarkSet, roi::Roi},
    image::Frame,
};

#[test]
fn test_full_roi_letterboxes() {
    let roi = Roi::full(Vec2::new(640, 480));
    assert_eq!(roi, Roi { x: 0.0, y: -80.0, side: 640.0 });
}

#[test]
fn test_sample_scales_and_pads() {
    let frame = Frame::filled(Vec2::new(4, 2), [255, 0, 0]);
    let roi = Roi::full(frame.size());
    let tensor = roi.sample(&frame, 4);
    assert_eq!(tensor.len(), 4 * 4 * 3);
    // first row is above the frame
    assert!(tensor[..12].iter().all(|v| *v == 0.0));
    // second row lands inside
    assert_eq!(&tensor[12..15], &[1.0, 0.0, 0.0]);
}

#[test]
fn test_to_frame_maps_back() {
    let size = Vec2::new(640, 480);
    let roi = Roi::full(size);
    let mut raw = vec![0.0; LANDMARK_COUNT * 3];
    // wrist at the center of a 224 input
    raw[0] = 112.0;
    raw[1] = 112.0;
    let set = roi.to_frame(&raw, 224, size).unwrap();
    assert!((set.wrist().x - 0.5).abs() < 1e-5);
    assert!((set.wrist().y - 0.5).abs() < 1e-5);
    assert!(roi.to_frame(&raw[..10], 224, size).is_err());
}

#[test]
fn test_around_centers_on_hand() {
    let mut points = [Landmark::new(0.5, 0.5, 0.0); LANDMARK_COUNT];
    points[0] = Landmark::new(0.4, 0.4, 0.0);
    points[1] = Landmark::new(0.6, 0.6, 0.0);
    let set = LandmarkSet::new(points);
    let roi = Roi::around(&set, Vec2::new(100, 100), 2.0);
    assert!((roi.side - 40.0).abs() < 1e-4);
    assert!((roi.x - 30.0).abs() < 1e-4);
    assert!((roi.y - 30.0).abs() < 1e-4);
}
