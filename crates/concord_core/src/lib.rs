//! # concord_core
//!
//! Core types and traits for the concord diagnostic agreement pipeline.
//!
//! This crate provides:
//! - Diagnosis labels and severity scales shared by the image and text paths
//! - [`ImageFinding`] and [`TextFinding`], the structured verdicts of the two
//!   modalities
//! - [`XrayClassifier`], the interface boundary to the external CNN
//!   collaborator, with explicit activation/gradient capture
//! - Error types and common utilities

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

mod classifier;
mod finding;
mod label;

pub use classifier::{
    ClassProbabilities, Classification, ClassifierError, FeatureCapture, Result, XrayClassifier,
};
pub use finding::{
    ImageDetail, ImageFinding, ImageSpecificFinding, ReportDetail, ReportFinding, TextFinding,
};
pub use label::{FindingSeverity, ImageLabel, ReportQuality, ReportSeverity, TextLabel};

/// Round a value to one decimal place.
///
/// Confidences and scores are reported as percentages with one decimal,
/// matching the response wire format.
#[must_use]
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
