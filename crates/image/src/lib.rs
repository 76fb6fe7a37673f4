//! Frames and frame payloads for the hand-gesture stream.
//!
//! A [`Frame`] is an 8-bit RGB image in HWC layout. This crate normalizes
//! frame geometry, draws overlays onto frames, converts camera pixel formats,
//! and turns frames into transport payloads and back through [`FrameCodec`].

pub mod codec;
pub mod convert;
pub mod draw;
pub mod error;
mod font;
pub mod frame;
pub mod jpeg;

pub use codec::{FrameCodec, PayloadEncoding};
pub use convert::*;
pub use error::ImageError;
pub use frame::Frame;
pub use jpeg::*;
