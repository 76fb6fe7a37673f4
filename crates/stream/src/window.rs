use {
    crate::{FrameSink, StreamError},
    image::{Frame, frame_to_u32},
    minifb::{Key, Window, WindowOptions},
};

/// Preview window. Escape, `q` or closing the window requests exit.
pub struct WindowSink {
    window: Window,
}

impl WindowSink {
    pub fn open(title: &str, width: usize, height: usize) -> Result<Self, StreamError> {
        let mut window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| StreamError::Sink(e.to_string()))?;
        window.set_target_fps(0);
        Ok(Self { window })
    }
}

impl FrameSink for WindowSink {
    fn show(&mut self, frame: &Frame) -> Result<(), StreamError> {
        let buffer = frame_to_u32(frame);
        self.window
            .update_with_buffer(&buffer, frame.width(), frame.height())
            .map_err(|e| StreamError::Sink(e.to_string()))
    }

    fn exit_requested(&self) -> bool {
        !self.window.is_open()
            || self.window.is_key_down(Key::Escape)
            || self.window.is_key_down(Key::Q)
    }

    fn poll(&mut self) {
        self.window.update();
    }
}
