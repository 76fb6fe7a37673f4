use {
    crate::*,
    base::{Vec2, log},
    image::Frame,
    std::sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    tokio::{
        sync::{mpsc, oneshot},
        task::spawn_blocking,
    },
};

// capacity of the video input channel
const CHANNEL_CAPACITY: usize = 4;

#[derive(Debug, Clone)]
pub enum VideoInConfig {
    #[cfg(feature = "v4l2")]
    V4l2(v4l2::V4l2Config),
    Replay(replay::ReplayConfig),
}

/// Negotiated parameters of an open device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceInfo {
    pub size: Vec2<usize>,
    pub frame_rate: Option<f32>,
}

pub(crate) trait VideoInDevice: Send {
    fn open(&mut self) -> Result<DeviceInfo, VideoError>; // open the device, return what was actually set
    fn close(&mut self); // close the device, if open
    fn blocking_capture(&mut self) -> Result<Option<Frame>, VideoError>; // capture a frame, None at end of stream
}

/// Capture running on a blocking worker thread.
///
/// The worker owns the only sender, so the channel closes when the device
/// runs out of frames or fails.
pub struct VideoIn {
    receiver: mpsc::Receiver<Result<Frame, VideoError>>,
    cancel: Arc<AtomicBool>,
    info: DeviceInfo,
    closed: bool,
}

impl VideoIn {
    fn create_device(config: VideoInConfig) -> Box<dyn VideoInDevice> {
        match config {
            #[cfg(feature = "v4l2")]
            VideoInConfig::V4l2(config) => Box::new(v4l2::V4l2::new(config)),
            VideoInConfig::Replay(config) => Box::new(replay::Replay::new(config)),
        }
    }

    /// Open the device on its worker thread and wait for the result.
    pub async fn open(config: VideoInConfig) -> Result<Self, VideoError> {
        let mut device = Self::create_device(config);
        let (sender, receiver) = mpsc::channel::<Result<Frame, VideoError>>(CHANNEL_CAPACITY);
        let cancel = Arc::new(AtomicBool::new(false));

        // device.open() runs on the same OS thread as blocking_capture()
        let (init_tx, init_rx) = oneshot::channel::<Result<DeviceInfo, VideoError>>();

        spawn_blocking({
            let cancel = Arc::clone(&cancel);
            move || {
                match device.open() {
                    Ok(info) => {
                        let _ = init_tx.send(Ok(info));
                    }
                    Err(e) => {
                        let _ = init_tx.send(Err(e));
                        return;
                    }
                }

                log::info!("video worker: starting capture loop");
                while !cancel.load(Ordering::Relaxed) {
                    let item = match device.blocking_capture() {
                        Ok(Some(frame)) => Ok(frame),
                        Ok(None) => {
                            log::info!("video worker: end of stream");
                            break;
                        }
                        Err(e) => {
                            log::error!("video worker: capture failed: {}", e);
                            Err(e)
                        }
                    };
                    let failed = item.is_err();
                    if sender.blocking_send(item).is_err() {
                        log::debug!("video worker: receiver closed");
                        break;
                    }
                    if failed {
                        break;
                    }
                }
                device.close();
            }
        });

        let info = init_rx
            .await
            .map_err(|_| VideoError::Device("worker thread died during init".to_string()))??;

        Ok(Self {
            receiver,
            cancel,
            info,
            closed: false,
        })
    }

    pub fn size(&self) -> Vec2<usize> {
        self.info.size
    }

    pub fn frame_rate(&self) -> Option<f32> {
        self.info.frame_rate
    }
}

impl Capture for VideoIn {
    async fn next_frame(&mut self) -> Result<Option<Frame>, VideoError> {
        if self.closed {
            return Ok(None);
        }
        match self.receiver.recv().await {
            Some(Ok(frame)) => Ok(Some(frame)),
            Some(Err(e)) => Err(e),
            None => Ok(None),
        }
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.cancel.store(true, Ordering::Relaxed);
            // unblocks a worker parked in blocking_send
            self.receiver.close();
        }
    }
}

impl Drop for VideoIn {
    fn drop(&mut self) {
        self.close();
    }
}

pub mod replay;

#[cfg(feature = "v4l2")]
pub mod v4l2;
