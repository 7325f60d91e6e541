//! Structured verdicts produced by the image and text paths.
//!
//! Both findings share the label + confidence contract consumed by the
//! agreement engine. Each instance is owned by the request that produced it
//! and is immutable once assembled.

use serde::{Deserialize, Serialize};

use crate::label::{FindingSeverity, ImageLabel, ReportQuality, ReportSeverity, TextLabel};

/// One specific finding derived from the classifier's class probabilities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageSpecificFinding {
    /// Human-readable description of the finding.
    pub finding: String,
    /// Confidence as a percentage, one decimal place.
    pub confidence: f64,
    /// Severity tier.
    pub severity: FindingSeverity,
}

/// Per-class probabilities and derived findings for one image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageDetail {
    /// Probability of the normal class, as a percentage.
    pub normal_probability: f64,
    /// Probability of the pneumonia class, as a percentage.
    pub pneumonia_probability: f64,
    /// Findings derived from the probabilities.
    pub specific_findings: Vec<ImageSpecificFinding>,
}

/// The image classifier's structured verdict for one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageFinding {
    /// Predicted label.
    pub prediction: ImageLabel,
    /// Confidence as a percentage in `[0, 100]`, one decimal place.
    pub confidence: f64,
    /// Detailed probability breakdown.
    pub detailed_findings: ImageDetail,
}

/// One specific finding extracted from the report text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportFinding {
    /// Human-readable description of the finding.
    pub finding: String,
    /// Where the finding came from (always the doctor's report).
    pub source: String,
    /// Severity qualifier from the severity vocabulary.
    pub severity: ReportSeverity,
}

/// Detailed findings extracted from the report text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportDetail {
    /// Specific findings, in phrase-group order.
    pub specific_findings: Vec<ReportFinding>,
    /// Anatomical location terms present in the text, in vocabulary order.
    pub locations_mentioned: Vec<String>,
    /// Whether the text contains a measurement (a number followed by mm/cm).
    pub has_measurements: bool,
    /// Word count of the report.
    pub report_length: usize,
    /// Completeness tier by word count.
    pub technical_quality: ReportQuality,
}

/// The text rule engine's structured verdict for one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextFinding {
    /// Diagnosis derived from the term counts.
    pub text_diagnosis: TextLabel,
    /// Confidence as a percentage in `[0, 100]`, one decimal place.
    pub confidence: f64,
    /// Number of distinct abnormal vocabulary terms present.
    pub abnormal_terms_found: usize,
    /// Number of distinct normal vocabulary terms present.
    pub normal_terms_found: usize,
    /// Detailed findings extracted from the text.
    pub detailed_findings: ReportDetail,
}
