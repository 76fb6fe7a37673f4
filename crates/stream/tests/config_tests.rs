use {
    base::Vec2,
    image::PayloadEncoding,
    std::time::Duration,
    stream::{
        DEFAULT_STATUS_TOPIC, DEFAULT_VIDEO_TOPIC, StreamConfig, StreamError,
    },
};

fn assert_close(actual: Duration, expected: Duration) {
    let diff = if actual > expected { actual - expected } else { expected - actual };
    assert!(diff < Duration::from_micros(1), "{:?} != {:?}", actual, expected);
}

fn assert_invalid(config: StreamConfig) {
    match config.validate() {
        Err(StreamError::Config(_)) => {}
        other => panic!("expected a config error, got {:?}", other),
    }
}

#[test]
fn test_defaults() {
    let config = StreamConfig::default();
    assert_eq!(config.broker_address(), "127.0.0.1");
    assert_eq!(config.broker_port(), 1883);
    assert_eq!(config.video_topic(), DEFAULT_VIDEO_TOPIC);
    assert_eq!(config.status_topic(), DEFAULT_STATUS_TOPIC);
    assert_eq!(config.frame_size(), Vec2::new(640, 480));
    assert_eq!(config.target_frame_rate(), 20.0);
    assert_eq!(config.payload_encoding(), PayloadEncoding::Base64);
    assert!(config.client_id().starts_with("handcast-"));
    assert!(config.publish_video());
    assert!(config.publish_status());
    assert!(config.validate().is_ok());
}

#[test]
fn test_frame_period() {
    let config = StreamConfig::default().with_target_frame_rate(10.0);
    assert_close(config.frame_period(), Duration::from_millis(100));
}

#[test]
fn test_unusable_rate_falls_back_to_default_period() {
    for rate in [0.0, -5.0, f32::NAN, f32::INFINITY] {
        let config = StreamConfig::default().with_target_frame_rate(rate);
        assert_close(config.frame_period(), Duration::from_millis(50));
    }
}

#[test]
fn test_codec_follows_config() {
    let codec = StreamConfig::default()
        .with_jpeg_quality(70)
        .with_payload_encoding(PayloadEncoding::Binary)
        .codec();
    assert_eq!(codec.quality(), 70);
    assert_eq!(codec.encoding(), PayloadEncoding::Binary);
}

#[test]
fn test_validate_rejects_bad_settings() {
    assert_invalid(StreamConfig::default().with_broker_address(""));
    assert_invalid(StreamConfig::default().with_client_id(""));
    assert_invalid(StreamConfig::default().with_video_topic(""));
    assert_invalid(StreamConfig::default().with_video_topic("webcam/#"));
    assert_invalid(StreamConfig::default().with_status_topic("webcam/+/status"));
    assert_invalid(StreamConfig::default().with_target_frame_rate(0.0));
    assert_invalid(StreamConfig::default().with_target_frame_rate(f32::NAN));
    assert_invalid(StreamConfig::default().with_frame_size(Vec2::new(0, 480)));
    assert_invalid(StreamConfig::default().with_jpeg_quality(0));
    assert_invalid(StreamConfig::default().with_jpeg_quality(101));
}

#[test]
fn test_builder_round_trip() {
    let config = StreamConfig::default()
        .with_broker_address("broker.local")
        .with_broker_port(1884)
        .with_keepalive(Duration::from_secs(15))
        .with_client_id("cam-1")
        .with_video_topic("lab/cam")
        .with_status_topic("lab/hand")
        .with_frame_size(Vec2::new(320, 240));
    assert_eq!(config.broker_address(), "broker.local");
    assert_eq!(config.broker_port(), 1884);
    assert_eq!(config.keepalive(), Duration::from_secs(15));
    assert_eq!(config.client_id(), "cam-1");
    assert_eq!(config.video_topic(), "lab/cam");
    assert_eq!(config.status_topic(), "lab/hand");
    assert_eq!(config.frame_size(), Vec2::new(320, 240));
    assert!(config.validate().is_ok());
}

#[test]
fn test_topics_must_differ() {
    assert_invalid(StreamConfig::default().with_status_topic(DEFAULT_VIDEO_TOPIC));
    assert_invalid(
        StreamConfig::default()
            .with_video_topic("lab/both")
            .with_status_topic("lab/both"),
    );
}

#[test]
fn test_keepalive_range() {
    assert!(StreamConfig::default().with_keepalive(Duration::ZERO).validate().is_ok());
    assert!(
        StreamConfig::default()
            .with_keepalive(Duration::from_millis(250))
            .validate()
            .is_ok()
    );
    assert!(
        StreamConfig::default()
            .with_keepalive(Duration::from_secs(u32::MAX as u64))
            .validate()
            .is_ok()
    );
    assert_invalid(StreamConfig::default().with_keepalive(Duration::from_secs(u32::MAX as u64 + 1)));
    assert_invalid(StreamConfig::default().with_keepalive(Duration::MAX));
}

#[test]
fn test_publish_switches() {
    let config = StreamConfig::default()
        .with_publish_video(false)
        .with_publish_status(false);
    assert!(!config.publish_video());
    assert!(!config.publish_status());
    assert!(config.validate().is_ok());
}
