use base::Vec2;

#[test]
fn test_arithmetic() {
    let a = Vec2::new(3, 4);
    let b = Vec2::new(1, 2);
    assert_eq!(a + b, Vec2::new(4, 6));
    assert_eq!(a - b, Vec2::new(2, 2));
    assert_eq!(a * 2, Vec2::new(6, 8));
}

#[test]
fn test_area_and_display() {
    let size = Vec2::new(640usize, 480usize);
    assert_eq!(size.area(), 307200);
    assert_eq!(size.to_string(), "640x480");
}

#[test]
fn test_default_is_zero() {
    assert_eq!(Vec2::<f32>::default(), Vec2::new(0.0, 0.0));
}
