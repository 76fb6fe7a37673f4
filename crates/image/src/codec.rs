use {
    crate::{Frame, ImageError, frame_to_jpeg, jpeg_to_frame},
    base64::{Engine, engine::general_purpose::STANDARD},
    std::{fmt, str::FromStr},
};

/// Default JPEG quality for published frames.
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// How JPEG bytes are wrapped for transport.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PayloadEncoding {
    /// Standard-alphabet, padded base64 text.
    #[default]
    Base64,
    /// Raw JPEG bytes.
    Binary,
}

impl fmt::Display for PayloadEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadEncoding::Base64 => write!(f, "base64"),
            PayloadEncoding::Binary => write!(f, "binary"),
        }
    }
}

impl FromStr for PayloadEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "base64" => Ok(PayloadEncoding::Base64),
            "binary" | "raw" => Ok(PayloadEncoding::Binary),
            other => Err(format!("unknown payload encoding: {other}")),
        }
    }
}

/// Turns frames into transport payloads and back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameCodec {
    quality: u8,
    encoding: PayloadEncoding,
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self {
            quality: DEFAULT_JPEG_QUALITY,
            encoding: PayloadEncoding::Base64,
        }
    }
}

impl FrameCodec {
    pub fn new(quality: u8, encoding: PayloadEncoding) -> Self {
        Self {
            quality: quality.clamp(1, 100),
            encoding,
        }
    }

    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality.clamp(1, 100);
        self
    }

    pub fn with_encoding(mut self, encoding: PayloadEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    pub fn encoding(&self) -> PayloadEncoding {
        self.encoding
    }

    /// Compress `frame` and wrap it for transport.
    pub fn encode(&self, frame: &Frame) -> Result<Vec<u8>, ImageError> {
        let jpeg = frame_to_jpeg(frame, self.quality)?;
        Ok(match self.encoding {
            PayloadEncoding::Base64 => STANDARD.encode(&jpeg).into_bytes(),
            PayloadEncoding::Binary => jpeg,
        })
    }

    /// Unwrap and decompress a payload. Every malformed input maps to
    /// `ImageError::Decode`.
    pub fn decode(&self, payload: &[u8]) -> Result<Frame, ImageError> {
        match self.encoding {
            PayloadEncoding::Base64 => {
                let jpeg = STANDARD.decode(payload.trim_ascii())?;
                jpeg_to_frame(&jpeg)
            }
            PayloadEncoding::Binary => jpeg_to_frame(payload),
        }
    }
}
