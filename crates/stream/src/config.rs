use {
    crate::StreamError,
    base::Vec2,
    com::{BusClient, client::keepalive_secs, topic},
    image::{FrameCodec, PayloadEncoding},
    std::time::Duration,
};

pub const DEFAULT_BROKER_ADDRESS: &str = "127.0.0.1";
pub const DEFAULT_BROKER_PORT: u16 = 1883;
pub const DEFAULT_KEEPALIVE: Duration = Duration::from_secs(60);
pub const DEFAULT_VIDEO_TOPIC: &str = "webcam/stream";
pub const DEFAULT_STATUS_TOPIC: &str = "webcam/hand_status";
pub const DEFAULT_FRAME_RATE: f32 = 20.0;
pub const DEFAULT_FRAME_SIZE: Vec2<usize> = Vec2::new(640, 480);

/// Settings shared by the publisher and the subscriber.
#[derive(Clone, Debug, PartialEq)]
pub struct StreamConfig {
    broker_address: String,
    broker_port: u16,
    keepalive: Duration,
    client_id: String,
    video_topic: String,
    status_topic: String,
    target_frame_rate: f32,
    frame_size: Vec2<usize>,
    jpeg_quality: u8,
    payload_encoding: PayloadEncoding,
    publish_video: bool,
    publish_status: bool,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            broker_address: DEFAULT_BROKER_ADDRESS.to_string(),
            broker_port: DEFAULT_BROKER_PORT,
            keepalive: DEFAULT_KEEPALIVE,
            client_id: format!("handcast-{}", std::process::id()),
            video_topic: DEFAULT_VIDEO_TOPIC.to_string(),
            status_topic: DEFAULT_STATUS_TOPIC.to_string(),
            target_frame_rate: DEFAULT_FRAME_RATE,
            frame_size: DEFAULT_FRAME_SIZE,
            jpeg_quality: image::codec::DEFAULT_JPEG_QUALITY,
            payload_encoding: PayloadEncoding::Base64,
            publish_video: true,
            publish_status: true,
        }
    }
}

impl StreamConfig {
    pub fn with_broker_address(mut self, address: impl Into<String>) -> Self {
        self.broker_address = address.into();
        self
    }

    pub fn with_broker_port(mut self, port: u16) -> Self {
        self.broker_port = port;
        self
    }

    /// Ping interval; zero disables keepalive.
    pub fn with_keepalive(mut self, keepalive: Duration) -> Self {
        self.keepalive = keepalive;
        self
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self
    }

    pub fn with_video_topic(mut self, topic: impl Into<String>) -> Self {
        self.video_topic = topic.into();
        self
    }

    pub fn with_status_topic(mut self, topic: impl Into<String>) -> Self {
        self.status_topic = topic.into();
        self
    }

    /// Publish cycles per second.
    pub fn with_target_frame_rate(mut self, frame_rate: f32) -> Self {
        self.target_frame_rate = frame_rate;
        self
    }

    pub fn with_frame_size(mut self, size: Vec2<usize>) -> Self {
        self.frame_size = size;
        self
    }

    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality;
        self
    }

    pub fn with_payload_encoding(mut self, encoding: PayloadEncoding) -> Self {
        self.payload_encoding = encoding;
        self
    }

    /// Whether the publisher sends annotated frames on the video topic.
    pub fn with_publish_video(mut self, enabled: bool) -> Self {
        self.publish_video = enabled;
        self
    }

    /// Whether the publisher sends verdicts on the status topic.
    pub fn with_publish_status(mut self, enabled: bool) -> Self {
        self.publish_status = enabled;
        self
    }

    pub fn broker_address(&self) -> &str {
        &self.broker_address
    }

    pub fn broker_port(&self) -> u16 {
        self.broker_port
    }

    pub fn keepalive(&self) -> Duration {
        self.keepalive
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn video_topic(&self) -> &str {
        &self.video_topic
    }

    pub fn status_topic(&self) -> &str {
        &self.status_topic
    }

    pub fn target_frame_rate(&self) -> f32 {
        self.target_frame_rate
    }

    pub fn frame_size(&self) -> Vec2<usize> {
        self.frame_size
    }

    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality
    }

    pub fn payload_encoding(&self) -> PayloadEncoding {
        self.payload_encoding
    }

    pub fn publish_video(&self) -> bool {
        self.publish_video
    }

    pub fn publish_status(&self) -> bool {
        self.publish_status
    }

    /// Time between publish cycles, falling back to the default rate when
    /// the configured one is unusable.
    pub fn frame_period(&self) -> Duration {
        Duration::try_from_secs_f32(1.0 / self.target_frame_rate)
            .ok()
            .filter(|period| !period.is_zero())
            .unwrap_or_else(|| Duration::from_secs_f32(1.0 / DEFAULT_FRAME_RATE))
    }

    /// The codec both ends must agree on.
    pub fn codec(&self) -> FrameCodec {
        FrameCodec::new(self.jpeg_quality, self.payload_encoding)
    }

    /// Open a bus session with this configuration's broker and identity.
    pub async fn connect(&self) -> Result<BusClient, StreamError> {
        let client = BusClient::connect(
            &self.broker_address,
            self.broker_port,
            &self.client_id,
            self.keepalive,
        )
        .await?;
        Ok(client)
    }

    pub fn validate(&self) -> Result<(), StreamError> {
        if self.broker_address.is_empty() {
            return Err(StreamError::Config("broker address is empty".to_string()));
        }
        if self.client_id.is_empty() {
            return Err(StreamError::Config("client id is empty".to_string()));
        }
        for name in [&self.video_topic, &self.status_topic] {
            topic::validate_topic(name).map_err(StreamError::Config)?;
        }
        if self.video_topic == self.status_topic {
            return Err(StreamError::Config(format!(
                "video and status topics must differ, both are {}",
                self.video_topic
            )));
        }
        keepalive_secs(self.keepalive).map_err(|e| StreamError::Config(e.to_string()))?;
        if !(self.target_frame_rate.is_finite() && self.target_frame_rate > 0.0) {
            return Err(StreamError::Config(format!(
                "frame rate must be positive, got {}",
                self.target_frame_rate
            )));
        }
        if self.frame_size.x == 0 || self.frame_size.y == 0 {
            return Err(StreamError::Config(format!(
                "frame size must be non-zero, got {}",
                self.frame_size
            )));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(StreamError::Config(format!(
                "JPEG quality must be within 1..=100, got {}",
                self.jpeg_quality
            )));
        }
        Ok(())
    }
}
