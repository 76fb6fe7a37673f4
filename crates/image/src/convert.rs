use {
    crate::{Frame, ImageError},
    base::Vec2,
};

/// Convert a packed YUYV (4:2:2) buffer into an RGB frame.
pub fn yuyv_to_frame(size: Vec2<usize>, data: &[u8]) -> Result<Frame, ImageError> {
    let expected = size.area() * 2;
    if data.len() < expected {
        return Err(ImageError::Size {
            expected,
            got: data.len(),
        });
    }
    let mut rgb = Vec::with_capacity(size.area() * 3);
    for chunk in data[..expected].chunks_exact(4) {
        let (r0, g0, b0) = yuv_to_rgb(chunk[0], chunk[1], chunk[3]);
        let (r1, g1, b1) = yuv_to_rgb(chunk[2], chunk[1], chunk[3]);
        rgb.extend_from_slice(&[r0, g0, b0, r1, g1, b1]);
    }
    Frame::new(size, rgb)
}

/// BT.601 integer YUV to RGB.
pub fn yuv_to_rgb(y: u8, u: u8, v: u8) -> (u8, u8, u8) {
    let y = y as i32;
    let u = u as i32 - 128;
    let v = v as i32 - 128;
    let r = (y + ((359 * v) >> 8)).clamp(0, 255) as u8;
    let g = (y - ((88 * u + 183 * v) >> 8)).clamp(0, 255) as u8;
    let b = (y + ((454 * u) >> 8)).clamp(0, 255) as u8;
    (r, g, b)
}

fn pack_u32(r: u8, g: u8, b: u8) -> u32 {
    0xFF00_0000 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}

/// Pack a frame into 0xAARRGGBB words for window buffers.
pub fn frame_to_u32(frame: &Frame) -> Vec<u32> {
    frame
        .data()
        .chunks_exact(3)
        .map(|c| pack_u32(c[0], c[1], c[2]))
        .collect()
}
