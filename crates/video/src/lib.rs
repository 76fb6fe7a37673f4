//! Frame capture for the publisher.
//!
//! Devices run on a dedicated blocking worker thread and feed frames through
//! a bounded channel; the async side pulls them with [`Capture::next_frame`].

mod capture;
pub use capture::*;

pub mod error;
pub use error::VideoError;

pub mod videoin;
pub use videoin::{VideoIn, VideoInConfig, replay::ReplayConfig};

#[cfg(feature = "v4l2")]
pub use videoin::v4l2::{V4l2Config, VideoFormat};
