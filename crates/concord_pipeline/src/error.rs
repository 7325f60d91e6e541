//! Error types for case analysis.

use thiserror::Error;

use concord_core::ClassifierError;
use concord_explain::ExplainError;

/// Result type alias using [`PipelineError`].
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that can occur while analyzing a case.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The request carried an unreadable image or an empty report. No
    /// partial agreement result is computed.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The classifier collaborator failed.
    #[error("Classifier error: {0}")]
    Classifier(#[from] ClassifierError),

    /// Saliency generation failed. Non-fatal at the request level; the
    /// pipeline degrades the response instead of surfacing this.
    #[error("Saliency error: {0}")]
    Saliency(#[from] ExplainError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
