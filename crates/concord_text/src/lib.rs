//! # concord_text
//!
//! Rule engine that maps a free-text radiology report to a structured
//! diagnosis with confidence, severity, and report-quality assessment.
//!
//! This crate provides:
//! - [`diagnose`] - the full structured verdict for a report
//! - [`detailed_findings`] - phrase-group findings, locations, measurements
//! - [`extract_impression`] - the report's impression/conclusion section
//! - The fixed term vocabularies in [`vocab`]
//!
//! All functions are pure: identical input text always yields identical
//! output, with no randomness or external state.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

mod engine;
pub mod vocab;

pub use engine::{
    assess_report_quality, detailed_findings, detect_severity, diagnose, extract_impression,
};
