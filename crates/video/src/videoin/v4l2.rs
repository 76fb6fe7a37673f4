use {
    crate::{
        VideoError,
        videoin::{DeviceInfo, VideoInDevice},
    },
    base::{Vec2, log},
    image::Frame,
    std::path::PathBuf,
    v4l::{
        Device, Format, FourCC, buffer::Type, io::mmap::Stream as MmapStream,
        io::traits::CaptureStream, video::Capture as _,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoFormat {
    Yuyv,
    Jpeg,
}

#[derive(Debug, Clone, Default)]
pub struct V4l2Config {
    pub path: Option<PathBuf>,
    pub size: Option<Vec2<usize>>,
    pub format: Option<VideoFormat>,
    pub frame_rate: Option<f32>,
}

pub(crate) struct V4l2 {
    config: V4l2Config,
    stream: Option<MmapStream<'static>>,
    size: Vec2<usize>,
    format: VideoFormat,
}

impl V4l2 {
    pub fn new(config: V4l2Config) -> Self {
        Self {
            config,
            stream: None,
            size: Vec2::new(0, 0),
            format: VideoFormat::Yuyv,
        }
    }
}

impl VideoInDevice for V4l2 {
    fn open(&mut self) -> Result<DeviceInfo, VideoError> {
        // close stream
        self.stream.take();

        // create device from path or default
        let device = match &self.config.path {
            Some(path) => Device::with_path(path)?,
            None => Device::new(0)?,
        };
        let device_format = device.format()?;

        // build size
        let desired_size = match self.config.size {
            Some(size) => size,
            None => Vec2::new(device_format.width as usize, device_format.height as usize),
        };

        // build pixel format
        let desired_fourcc = match self.config.format {
            Some(VideoFormat::Yuyv) => FourCC::new(b"YUYV"),
            Some(VideoFormat::Jpeg) => FourCC::new(b"MJPG"),
            None => device_format.fourcc,
        };

        // set the format and get the actual format back
        let actual_format = device.set_format(&Format::new(
            desired_size.x as u32,
            desired_size.y as u32,
            desired_fourcc,
        ))?;

        self.size = Vec2::new(actual_format.width as usize, actual_format.height as usize);
        self.format = match &actual_format.fourcc.repr {
            b"YUYV" => VideoFormat::Yuyv,
            b"MJPG" => VideoFormat::Jpeg,
            _ => {
                return Err(VideoError::Device(format!(
                    "unsupported pixel format: {}",
                    actual_format.fourcc
                )));
            }
        };

        // set the frame rate if asked, and read back what the driver chose
        let params = match self.config.frame_rate {
            Some(frame_rate) => device.set_params(
                &v4l::video::capture::Parameters::with_fps(frame_rate.round() as u32),
            )?,
            None => device.params()?,
        };
        let frame_rate = if params.interval.numerator == 0 {
            None
        } else {
            Some(params.interval.denominator as f32 / params.interval.numerator as f32)
        };

        self.stream = Some(
            MmapStream::with_buffers(&device, Type::VideoCapture, 4u32)
                .map_err(|e| VideoError::Stream(e.to_string()))?,
        );

        log::info!(
            "v4l2: opened {} at {} ({:?}, {:?} fps)",
            self.config
                .path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "device 0".to_string()),
            self.size,
            self.format,
            frame_rate
        );

        Ok(DeviceInfo {
            size: self.size,
            frame_rate,
        })
    }

    fn close(&mut self) {
        self.stream.take();
    }

    fn blocking_capture(&mut self) -> Result<Option<Frame>, VideoError> {
        let Some(stream) = self.stream.as_mut() else {
            return Err(VideoError::Stream("no stream".to_string()));
        };
        let (data, _metadata) =
            CaptureStream::next(stream).map_err(|e| VideoError::Stream(e.to_string()))?;
        let frame = match self.format {
            VideoFormat::Yuyv => image::yuyv_to_frame(self.size, data)?,
            VideoFormat::Jpeg => image::decode_image(data)?,
        };
        Ok(Some(frame))
    }
}
