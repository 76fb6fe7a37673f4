use {
    crate::{Frame, ImageError},
    crates_image::{ExtendedColorType, ImageEncoder, codecs::jpeg::JpegEncoder},
    std::path::Path,
};

const SOI: [u8; 2] = [0xFF, 0xD8];
const EOI: [u8; 2] = [0xFF, 0xD9];

/// Compress a frame to baseline JPEG. `quality` is clamped to 1..=100.
pub fn frame_to_jpeg(frame: &Frame, quality: u8) -> Result<Vec<u8>, ImageError> {
    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100));
    encoder
        .write_image(
            frame.data(),
            frame.width() as u32,
            frame.height() as u32,
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| ImageError::Encode(format!("JPEG encoding failed: {e}")))?;
    Ok(buffer)
}

/// Decode JPEG bytes into an RGB frame.
///
/// The buffer must start with the SOI marker and end with the EOI marker;
/// a truncated stream is rejected before it reaches the decoder.
pub fn jpeg_to_frame(bytes: &[u8]) -> Result<Frame, ImageError> {
    if bytes.len() < 4 || bytes[..2] != SOI {
        return Err(ImageError::Decode("missing JPEG start marker".to_string()));
    }
    if bytes[bytes.len() - 2..] != EOI {
        return Err(ImageError::Decode("missing JPEG end marker".to_string()));
    }
    let decoded = crates_image::load_from_memory_with_format(bytes, crates_image::ImageFormat::Jpeg)
        .map_err(|e| ImageError::Decode(format!("failed to decode JPEG: {e}")))?;
    Ok(Frame::from(decoded.to_rgb8()))
}

/// Load any supported image file (JPEG, PNG, BMP) as an RGB frame.
pub fn load_frame(path: impl AsRef<Path>) -> Result<Frame, ImageError> {
    let path = path.as_ref();
    let decoded = crates_image::open(path)
        .map_err(|e| ImageError::Decode(format!("{}: {e}", path.display())))?;
    Ok(Frame::from(decoded.to_rgb8()))
}

/// Decode an in-memory image of any supported format as an RGB frame.
///
/// Unlike [`jpeg_to_frame`] this does not insist on a complete JPEG stream,
/// which suits camera MJPG buffers that carry trailing padding.
pub fn decode_image(bytes: &[u8]) -> Result<Frame, ImageError> {
    let decoded = crates_image::load_from_memory(bytes)?;
    Ok(Frame::from(decoded.to_rgb8()))
}
