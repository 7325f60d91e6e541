//! Error types for saliency generation.

use thiserror::Error;

/// Result type alias using [`ExplainError`].
pub type Result<T> = std::result::Result<T, ExplainError>;

/// Errors that can occur while generating a saliency artifact.
#[derive(Error, Debug)]
pub enum ExplainError {
    /// The activation/gradient capture was missing or empty.
    #[error("Saliency unavailable: {0}")]
    Unavailable(String),

    /// Activation and gradient tensors disagree on shape.
    #[error("Shape mismatch: activations {activations:?}, gradients {gradients:?}")]
    ShapeMismatch {
        /// Activation tensor shape (C, H, W).
        activations: [usize; 3],
        /// Gradient tensor shape (C, H, W).
        gradients: [usize; 3],
    },

    /// Image encode/decode error.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
