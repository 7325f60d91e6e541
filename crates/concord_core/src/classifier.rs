//! Interface boundary to the external image classifier.
//!
//! The CNN itself (weights, forward/backward pass) lives outside this
//! workspace. The pipeline talks to it through [`XrayClassifier`], and
//! activation/gradient capture is an explicit return value of a single call
//! rather than shared hook state, so the critical section around the
//! forward+backward pass sits at the call boundary.

use image::DynamicImage;
use ndarray::Array3;
use thiserror::Error;

use crate::label::ImageLabel;

/// Result type alias using [`ClassifierError`].
pub type Result<T> = std::result::Result<T, ClassifierError>;

/// Errors from the classifier collaborator.
#[derive(Error, Debug)]
pub enum ClassifierError {
    /// Model weights are missing or unloadable. Fatal at startup.
    #[error("Classifier unavailable: {0}")]
    Unavailable(String),

    /// The forward pass failed.
    #[error("Inference failed: {0}")]
    Inference(String),

    /// Activation/gradient capture failed for this pass. Non-fatal; the
    /// request proceeds without a saliency artifact.
    #[error("Gradient capture failed: {0}")]
    CaptureFailed(String),
}

/// The classifier's top-1 verdict.
#[derive(Debug, Clone)]
pub struct Classification {
    /// Predicted label.
    pub label: ImageLabel,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
    /// Index of the predicted class, used to seed the backward pass.
    pub class_index: usize,
}

/// Per-class probabilities for the binary normal/pneumonia model.
#[derive(Debug, Clone, Copy)]
pub struct ClassProbabilities {
    /// Probability of the normal class in `[0, 1]`.
    pub normal: f64,
    /// Probability of the pneumonia class in `[0, 1]`.
    pub pneumonia: f64,
}

/// Activations and gradients captured at the last convolutional stage.
///
/// Both tensors have shape `(C, H, W)` and come from one forward pass plus
/// one backward pass seeded from the requested class's score.
#[derive(Debug, Clone)]
pub struct FeatureCapture {
    /// Activations of the last convolutional stage.
    pub activations: Array3<f32>,
    /// Gradients of the class score w.r.t. those activations.
    pub gradients: Array3<f32>,
}

/// Interface to the external chest X-ray classifier.
///
/// Implementations load their weights once at startup (failing with
/// [`ClassifierError::Unavailable`]) and are treated as immutable for the
/// process lifetime. `classify` and `detailed_probabilities` are forward-only
/// and safe to call concurrently; `capture_gradients` runs a forward+backward
/// pass and must not run concurrently on a shared instance - the pipeline
/// serializes those calls.
pub trait XrayClassifier: Send + Sync {
    /// Classify an image, returning the top-1 verdict.
    fn classify(&self, image: &DynamicImage) -> Result<Classification>;

    /// Per-class probabilities for the image.
    fn detailed_probabilities(&self, image: &DynamicImage) -> Result<ClassProbabilities>;

    /// Run one forward + one backward pass seeded from `class_index` and
    /// return the captured activations and gradients.
    fn capture_gradients(&self, image: &DynamicImage, class_index: usize)
        -> Result<FeatureCapture>;
}
