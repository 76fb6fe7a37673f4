use {
    anyhow::{Context, Result},
    base::{Stop, log},
    clap::Parser,
    image::PayloadEncoding,
    std::{path::PathBuf, time::Duration},
    stream::{FrameSink, NullSink, StreamConfig, Subscriber},
};

/// Receive the hand-gesture stream and display it.
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

    /// also follow and log the hand status topic
    #[arg(long)]
    status: bool,

    /// payload encoding: base64 or binary
    #[arg(long, env = "HANDCAST_ENCODING", default_value = "base64")]
    encoding: PayloadEncoding,

    /// initial window size
    #[arg(long, default_value_t = 640)]
    width: usize,

    #[arg(long, default_value_t = 480)]
    height: usize,

    /// decode frames without opening a window
    #[arg(long)]
    headless: bool,

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
            .with_payload_encoding(self.encoding);
        match &self.client_id {
            Some(id) => config.with_client_id(id),
            None => config,
        }
    }
}

#[cfg(feature = "window")]
fn open_sink(cli: &Cli) -> Result<Box<dyn FrameSink>> {
    if cli.headless {
        return Ok(Box::new(NullSink));
    }
    let window = stream::WindowSink::open("hand-subscriber", cli.width, cli.height)?;
    Ok(Box::new(window))
}

#[cfg(not(feature = "window"))]
fn open_sink(cli: &Cli) -> Result<Box<dyn FrameSink>> {
    if !cli.headless {
        log::warn!(
            "built without the window feature, running headless instead of {}x{}",
            cli.width,
            cli.height
        );
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

    let sink = open_sink(&cli)?;
    let mut client = config.connect().await.with_context(|| {
        format!(
            "connecting to {}:{}",
            config.broker_address(),
            config.broker_port()
        )
    })?;
    client.subscribe(config.video_topic()).await?;
    if cli.status {
        client.subscribe(config.status_topic()).await?;
    }

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

    let mut subscriber = Subscriber::new(&config).with_sink(sink).with_stop(stop);
    if cli.status {
        subscriber = subscriber.with_status_topic(config.status_topic());
    }
    let report = subscriber.run(&mut client).await;
    log::info!(
        "showed {} frames, dropped {} ({:?})",
        report.frames_shown,
        report.frames_dropped,
        report.exit
    );

    if cli.status {
        client.unsubscribe(config.status_topic()).await.ok();
    }
    client.unsubscribe(config.video_topic()).await.ok();
    if let Err(e) = client.disconnect().await {
        log::warn!("disconnect failed: {}", e);
    }
    Ok(())
}
