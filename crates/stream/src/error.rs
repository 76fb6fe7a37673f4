use {com::ComError, std::fmt, video::VideoError};

#[derive(Debug)]
pub enum StreamError {
    CaptureUnavailable(VideoError),
    Transport(ComError),
    Config(String),
    Sink(String),
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::CaptureUnavailable(err) => write!(f, "capture unavailable: {err}"),
            StreamError::Transport(err) => write!(f, "transport error: {err}"),
            StreamError::Config(msg) => write!(f, "invalid configuration: {msg}"),
            StreamError::Sink(msg) => write!(f, "sink error: {msg}"),
        }
    }
}

impl std::error::Error for StreamError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StreamError::CaptureUnavailable(err) => Some(err),
            StreamError::Transport(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ComError> for StreamError {
    fn from(err: ComError) -> Self {
        StreamError::Transport(err)
    }
}

impl From<VideoError> for StreamError {
    fn from(err: VideoError) -> Self {
        StreamError::CaptureUnavailable(err)
    }
}
