use {crate::StreamError, image::Frame};

/// Presentation collaborator for decoded or annotated frames.
pub trait FrameSink {
    fn show(&mut self, frame: &Frame) -> Result<(), StreamError>;

    /// Whether the viewer asked to stop.
    fn exit_requested(&self) -> bool {
        false
    }

    /// Service the sink between frames, e.g. pump window events.
    fn poll(&mut self) {}
}

impl<T: FrameSink + ?Sized> FrameSink for Box<T> {
    fn show(&mut self, frame: &Frame) -> Result<(), StreamError> {
        (**self).show(frame)
    }

    fn exit_requested(&self) -> bool {
        (**self).exit_requested()
    }

    fn poll(&mut self) {
        (**self).poll()
    }
}

/// Headless sink that discards frames.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl FrameSink for NullSink {
    fn show(&mut self, _frame: &Frame) -> Result<(), StreamError> {
        Ok(())
    }
}
