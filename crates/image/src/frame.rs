use {
    crate::ImageError,
    base::Vec2,
    crates_image::{RgbImage, imageops},
};

/// Number of color channels in a frame.
pub const CHANNELS: usize = 3;

/// An 8-bit RGB image, HWC layout (`data.len() == width * height * 3`).
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    size: Vec2<usize>,
    data: Vec<u8>,
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("size", &self.size)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl Frame {
    /// Wrap an RGB buffer, checking its length against `size`.
    pub fn new(size: Vec2<usize>, data: Vec<u8>) -> Result<Self, ImageError> {
        let expected = size.area() * CHANNELS;
        if data.len() != expected {
            return Err(ImageError::Size {
                expected,
                got: data.len(),
            });
        }
        Ok(Self { size, data })
    }

    /// A frame filled with a single color.
    pub fn filled(size: Vec2<usize>, color: [u8; 3]) -> Self {
        let data = color
            .iter()
            .copied()
            .cycle()
            .take(size.area() * CHANNELS)
            .collect();
        Self { size, data }
    }

    pub fn size(&self) -> Vec2<usize> {
        self.size
    }

    pub fn width(&self) -> usize {
        self.size.x
    }

    pub fn height(&self) -> usize {
        self.size.y
    }

    pub fn channels(&self) -> usize {
        CHANNELS
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Color at (x, y), or `None` outside the frame.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x >= self.size.x || y >= self.size.y {
            return None;
        }
        let idx = (y * self.size.x + x) * CHANNELS;
        Some([self.data[idx], self.data[idx + 1], self.data[idx + 2]])
    }

    /// Set the color at (x, y); writes outside the frame are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: [u8; 3]) {
        if x < 0 || y < 0 || x as usize >= self.size.x || y as usize >= self.size.y {
            return;
        }
        let idx = (y as usize * self.size.x + x as usize) * CHANNELS;
        self.data[idx..idx + CHANNELS].copy_from_slice(&color);
    }

    /// Mirror the frame around its vertical axis.
    pub fn mirrored(&self) -> Frame {
        if self.size.area() == 0 {
            return self.clone();
        }
        let row = self.size.x * CHANNELS;
        let mut data = Vec::with_capacity(self.data.len());
        for line in self.data.chunks_exact(row) {
            for pixel in line.chunks_exact(CHANNELS).rev() {
                data.extend_from_slice(pixel);
            }
        }
        Frame {
            size: self.size,
            data,
        }
    }

    /// Resample to `size` with a triangle filter. Same-size input is cloned.
    pub fn resized(&self, size: Vec2<usize>) -> Frame {
        if size == self.size {
            return self.clone();
        }
        if self.size.area() == 0 || size.area() == 0 {
            return Frame::filled(size, [0, 0, 0]);
        }
        let image = self.to_rgb_image();
        let resized = imageops::resize(
            &image,
            size.x as u32,
            size.y as u32,
            imageops::FilterType::Triangle,
        );
        Frame::from(resized)
    }

    pub(crate) fn to_rgb_image(&self) -> RgbImage {
        // length was validated at construction
        RgbImage::from_raw(self.size.x as u32, self.size.y as u32, self.data.clone())
            .unwrap_or_else(|| RgbImage::new(self.size.x as u32, self.size.y as u32))
    }
}

impl From<RgbImage> for Frame {
    fn from(image: RgbImage) -> Self {
        let (width, height) = image.dimensions();
        Frame {
            size: Vec2::new(width as usize, height as usize),
            data: image.into_raw(),
        }
    }
}
