use {
    crate::{
        VideoError,
        videoin::{DeviceInfo, VideoInDevice},
    },
    base::log,
    image::Frame,
    std::{
        path::PathBuf,
        time::{Duration, Instant},
    },
};

const EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

/// Plays a directory of still images as a camera.
#[derive(Debug, Clone)]
pub struct ReplayConfig {
    pub dir: PathBuf,
    /// Pace frames at this rate; `None` delivers them as fast as they are read.
    pub frame_rate: Option<f32>,
    /// Start over after the last image instead of ending the stream.
    pub looping: bool,
}

impl ReplayConfig {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            frame_rate: None,
            looping: false,
        }
    }

    pub fn with_frame_rate(mut self, frame_rate: f32) -> Self {
        self.frame_rate = Some(frame_rate);
        self
    }

    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }
}

pub(crate) struct Replay {
    config: ReplayConfig,
    files: Vec<PathBuf>,
    index: usize,
    last: Option<Instant>,
}

impl Replay {
    pub fn new(config: ReplayConfig) -> Self {
        Self {
            config,
            files: Vec::new(),
            index: 0,
            last: None,
        }
    }

    fn pace(&mut self) {
        if let Some(frame_rate) = self.config.frame_rate.filter(|r| *r > 0.0) {
            let period = Duration::from_secs_f32(1.0 / frame_rate);
            if let Some(last) = self.last {
                let elapsed = last.elapsed();
                if elapsed < period {
                    std::thread::sleep(period - elapsed);
                }
            }
        }
        self.last = Some(Instant::now());
    }
}

fn is_image(path: &std::path::Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

impl VideoInDevice for Replay {
    fn open(&mut self) -> Result<DeviceInfo, VideoError> {
        let entries = std::fs::read_dir(&self.config.dir).map_err(|e| {
            VideoError::Device(format!("{}: {e}", self.config.dir.display()))
        })?;
        let mut files = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.is_file() && is_image(&path) {
                files.push(path);
            }
        }
        files.sort();
        let Some(first) = files.first() else {
            return Err(VideoError::Device(format!(
                "{}: no images to replay",
                self.config.dir.display()
            )));
        };

        // the first image defines the reported size
        let size = image::load_frame(first)?.size();
        log::info!(
            "replay: {} images from {}",
            files.len(),
            self.config.dir.display()
        );
        self.files = files;
        self.index = 0;
        self.last = None;
        Ok(DeviceInfo {
            size,
            frame_rate: self.config.frame_rate,
        })
    }

    fn close(&mut self) {
        self.files.clear();
    }

    fn blocking_capture(&mut self) -> Result<Option<Frame>, VideoError> {
        if self.index >= self.files.len() {
            if !self.config.looping || self.files.is_empty() {
                return Ok(None);
            }
            self.index = 0;
        }
        self.pace();
        let frame = image::load_frame(&self.files[self.index])?;
        self.index += 1;
        Ok(Some(frame))
    }
}
