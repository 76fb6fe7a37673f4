use {
    anyhow::{Context, Result},
    base::{Stop, Vec2, log},
    clap::Parser,
    hand::{HandTracker, NoHands, TrackerConfig},
    image::PayloadEncoding,
    std::{path::PathBuf, time::Duration},
    stream::{FrameSink, NullSink, Publisher, StreamConfig, StreamError},
    video::{ReplayConfig, VideoIn, VideoInConfig},
};

/// Capture webcam frames, mark up detected hands and publish the frames and
/// the OPEN/CLOSED hand status to the broker.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[arg(long, env = "HANDCAST_BROKER", default_value = stream::DEFAULT_BROKER_ADDRESS)]
    broker: String,

    #[arg(long, env = "HANDCAST_PORT", default_value_t = stream::DEFAULT_BROKER_PORT)]
    port: u16,

    /// bus client id (defaults to handcast-<pid>)
    #[arg(long, env = "HANDCAST_CLIENT_ID")]
    client_id: Option<String>,

    /// keepalive interval in seconds, 0 to disable
    #[arg(long, env = "HANDCAST_KEEPALIVE", default_value_t = 60)]
    keepalive: u64,

    #[arg(long, env = "HANDCAST_VIDEO_TOPIC", default_value = stream::DEFAULT_VIDEO_TOPIC)]
    video_topic: String,

    #[arg(long, env = "HANDCAST_STATUS_TOPIC", default_value = stream::DEFAULT_STATUS_TOPIC)]
    status_topic: String,

    /// do not publish frames on the video topic
    #[arg(long)]
    no_video: bool,

    /// do not publish the hand status
    #[arg(long)]
    no_status: bool,

    /// publish cycles per second
    #[arg(long, env = "HANDCAST_FPS", default_value_t = stream::DEFAULT_FRAME_RATE)]
    fps: f32,

    #[arg(long, env = "HANDCAST_WIDTH", default_value_t = 640)]
    width: usize,

    #[arg(long, env = "HANDCAST_HEIGHT", default_value_t = 480)]
    height: usize,

    /// JPEG quality, 1 to 100
    #[arg(long, env = "HANDCAST_QUALITY", default_value_t = image::codec::DEFAULT_JPEG_QUALITY)]
    quality: u8,

    /// payload encoding: base64 or binary
    #[arg(long, env = "HANDCAST_ENCODING", default_value = "base64")]
    encoding: PayloadEncoding,

    /// replay the images in this directory instead of opening a camera
    #[arg(long, env = "HANDCAST_REPLAY")]
    replay: Option<PathBuf>,

    /// restart the replay when it runs out
    #[arg(long, requires = "replay")]
    replay_loop: bool,

    /// camera device node
    #[arg(long, env = "HANDCAST_DEVICE")]
    device: Option<PathBuf>,

    /// hand landmark model (ONNX)
    #[arg(long, env = "HANDCAST_MODEL")]
    model: Option<PathBuf>,

    #[arg(long, default_value_t = 1)]
    max_hands: usize,

    #[arg(long, default_value_t = 0.5)]
    min_detection_confidence: f32,

    #[arg(long, default_value_t = 0.5)]
    min_tracking_confidence: f32,

    /// show the annotated frames in a window
    #[arg(long)]
    preview: bool,

    /// write logs to date-named files in this directory instead of stdout
    #[arg(long, env = "HANDCAST_LOG_DIR")]
    log_dir: Option<PathBuf>,
}

impl Cli {
    fn stream_config(&self) -> StreamConfig {
        let config = StreamConfig::default()
            .with_broker_address(&self.broker)
            .with_broker_port(self.port)
            .with_keepalive(Duration::from_secs(self.keepalive))
            .with_video_topic(&self.video_topic)
            .with_status_topic(&self.status_topic)
            .with_publish_video(!self.no_video)
            .with_publish_status(!self.no_status)
            .with_target_frame_rate(self.fps)
            .with_frame_size(Vec2::new(self.width, self.height))
            .with_jpeg_quality(self.quality)
            .with_payload_encoding(self.encoding);
        match &self.client_id {
            Some(id) => config.with_client_id(id),
            None => config,
        }
    }

    fn video_config(&self) -> Result<VideoInConfig> {
        if let Some(dir) = &self.replay {
            return Ok(VideoInConfig::Replay(
                ReplayConfig::new(dir)
                    .with_frame_rate(self.fps)
                    .with_looping(self.replay_loop),
            ));
        }
        camera_config(self)
    }

    fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig::new()
            .with_max_hands(self.max_hands)
            .with_min_detection_confidence(self.min_detection_confidence)
            .with_min_tracking_confidence(self.min_tracking_confidence)
    }
}

#[cfg(feature = "v4l2")]
fn camera_config(cli: &Cli) -> Result<VideoInConfig> {
    Ok(VideoInConfig::V4l2(video::V4l2Config {
        path: cli.device.clone(),
        size: Some(Vec2::new(cli.width, cli.height)),
        format: None,
        frame_rate: Some(cli.fps),
    }))
}

#[cfg(not(feature = "v4l2"))]
fn camera_config(cli: &Cli) -> Result<VideoInConfig> {
    match &cli.device {
        Some(device) => anyhow::bail!(
            "built without camera support, cannot open {}; pass --replay <dir>",
            device.display()
        ),
        None => anyhow::bail!("built without camera support; pass --replay <dir>"),
    }
}

#[cfg(feature = "onnx")]
fn open_tracker(cli: &Cli) -> Result<Box<dyn HandTracker>> {
    match &cli.model {
        Some(model) => {
            let tracker = hand::OnnxHandTracker::open(model, cli.tracker_config())
                .with_context(|| format!("loading {}", model.display()))?;
            Ok(Box::new(tracker))
        }
        None => {
            log::warn!("no --model given, hands will not be detected");
            Ok(Box::new(NoHands))
        }
    }
}

#[cfg(not(feature = "onnx"))]
fn open_tracker(cli: &Cli) -> Result<Box<dyn HandTracker>> {
    if cli.model.is_some() {
        anyhow::bail!("built without the onnx feature; --model is unavailable");
    }
    log::debug!("tracker settings {:?} unused", cli.tracker_config());
    log::warn!("hand tracking disabled, hands will not be detected");
    Ok(Box::new(NoHands))
}

#[cfg(feature = "window")]
fn open_preview(cli: &Cli) -> Result<Box<dyn FrameSink>> {
    if cli.preview {
        let window = stream::WindowSink::open("hand-publisher", cli.width, cli.height)?;
        return Ok(Box::new(window));
    }
    Ok(Box::new(NullSink))
}

#[cfg(not(feature = "window"))]
fn open_preview(cli: &Cli) -> Result<Box<dyn FrameSink>> {
    if cli.preview {
        anyhow::bail!("built without the window feature; --preview is unavailable");
    }
    Ok(Box::new(NullSink))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    match &cli.log_dir {
        Some(dir) => base::init_file_logger(dir)?,
        None => base::init_stdout_logger(),
    }

    let config = cli.stream_config();
    config.validate()?;

    let capture = match VideoIn::open(cli.video_config()?).await {
        Ok(capture) => capture,
        Err(e) => {
            log::error!("capture unavailable: {}", e);
            return Err(StreamError::CaptureUnavailable(e).into());
        }
    };
    log::info!("capture open at {}", capture.size());
    let tracker = open_tracker(&cli)?;
    let sink = open_preview(&cli)?;
    let transport = config.connect().await.with_context(|| {
        format!(
            "connecting to {}:{}",
            config.broker_address(),
            config.broker_port()
        )
    })?;

    let stop = Stop::new();
    tokio::spawn({
        let stop = stop.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                log::info!("interrupted");
                stop.raise();
            }
        }
    });

    let report = Publisher::new(capture, tracker, transport, config)
        .with_sink(sink)
        .with_stop(stop)
        .run()
        .await?;
    log::info!(
        "published {} frames and {} statuses",
        report.frames_published,
        report.statuses_published
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_switches() {
        let config = Cli::try_parse_from(["hand-publisher"]).unwrap().stream_config();
        assert!(config.publish_video());
        assert!(config.publish_status());

        let config = Cli::try_parse_from(["hand-publisher", "--no-video"])
            .unwrap()
            .stream_config();
        assert!(!config.publish_video());
        assert!(config.publish_status());

        let config = Cli::try_parse_from(["hand-publisher", "--no-status"])
            .unwrap()
            .stream_config();
        assert!(config.publish_video());
        assert!(!config.publish_status());
    }
}
