//! # concord_explain
//!
//! Saliency map generation for the image classifier's decisions.
//!
//! This crate provides:
//! - [`grad_cam`] - gradient-weighted class activation mapping over captured
//!   activation/gradient tensors
//! - [`SaliencyMap`] - the resulting single-channel map with resize and
//!   normalization
//! - [`render_heatmap`]/[`render_overlay`]/[`save_overlay`] - colormapped
//!   heatmap, its blend over the source image, and the written artifact
//!
//! Generation can fail when the capture is missing or malformed; callers
//! treat that as non-fatal and proceed without a saliency artifact.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

mod cam;
mod error;
mod render;

pub use cam::{grad_cam, SaliencyMap};
pub use error::{ExplainError, Result};
pub use render::{render_heatmap, render_overlay, save_overlay, Colormap, SaliencyConfig};
