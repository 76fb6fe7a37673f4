//! The hand-gesture frame stream.
//!
//! [`Publisher`] captures, annotates, encodes and publishes frames along with
//! the open/closed verdict. [`Subscriber`] decodes received frames and hands
//! them to a [`FrameSink`].

mod cadence;
pub use cadence::*;

mod config;
pub use config::*;

mod error;
pub use error::*;

mod publisher;
pub use publisher::*;

mod sink;
pub use sink::*;

mod subscriber;
pub use subscriber::*;

#[cfg(feature = "window")]
mod window;
#[cfg(feature = "window")]
pub use window::*;
