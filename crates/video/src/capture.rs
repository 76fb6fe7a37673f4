use {crate::VideoError, image::Frame};

/// A source of frames.
#[allow(async_fn_in_trait)]
pub trait Capture {
    /// Wait for the next frame. `Ok(None)` means the source is exhausted.
    async fn next_frame(&mut self) -> Result<Option<Frame>, VideoError>;

    /// Release the device. Later calls to `next_frame` return `Ok(None)`.
    fn close(&mut self);
}
