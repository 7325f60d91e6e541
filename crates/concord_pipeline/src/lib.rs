//! # concord_pipeline
//!
//! Drives one case through the full agreement pipeline: classifier inference
//! -> text extraction -> saliency generation -> agreement computation ->
//! response assembly.
//!
//! This crate provides:
//! - [`AnalysisPipeline`] - the per-request orchestrator over an
//!   [`XrayClassifier`](concord_core::XrayClassifier) implementation
//! - [`CaseAnalysis`] - the assembled response record
//! - [`assemble_image_finding`] - probabilities -> structured image verdict
//!
//! Each request is an independent, stateless unit of work. The one shared
//! critical section is the classifier's forward+backward pass for gradient
//! capture, which the pipeline serializes.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

mod case;
mod error;
mod pipeline;

pub use case::{assemble_image_finding, CaseAnalysis};
pub use error::{PipelineError, Result};
pub use pipeline::{AnalysisPipeline, PipelineConfig};
