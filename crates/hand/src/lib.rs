//! Hand landmarks and the open/closed gesture verdict.
//!
//! A [`HandTracker`] turns a frame into zero or more [`LandmarkSet`]s,
//! [`classify`] reduces one set to a [`Verdict`], and the [`overlay`]
//! functions burn the skeleton and the verdict label into the frame.

mod classify;
pub use classify::*;

pub mod error;
pub use error::HandError;

mod landmark;
pub use landmark::*;

pub mod overlay;

pub mod roi;

mod tracker;
pub use tracker::*;

mod verdict;
pub use verdict::*;

#[cfg(feature = "onnx")]
pub mod onnx;

#[cfg(feature = "onnx")]
pub use onnx::OnnxHandTracker;
