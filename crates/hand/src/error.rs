use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandError {
    Model(String),
    Inference(String),
}

impl fmt::Display for HandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandError::Model(msg) => write!(f, "model error: {msg}"),
            HandError::Inference(msg) => write!(f, "inference error: {msg}"),
        }
    }
}

impl std::error::Error for HandError {}

#[cfg(feature = "onnx")]
impl From<ort::Error> for HandError {
    fn from(err: ort::Error) -> Self {
        HandError::Inference(err.to_string())
    }
}
