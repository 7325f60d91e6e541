//! Diagnosis labels and severity scales.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Verdict emitted by the image classifier.
///
/// The abnormal class carries the domain term the classifier was trained on,
/// not a generic "abnormal" label. Agreement checks compare labels exactly as
/// emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageLabel {
    /// No abnormality detected.
    #[serde(rename = "NORMAL")]
    Normal,
    /// Pneumonia-consistent pattern detected.
    #[serde(rename = "PNEUMONIA")]
    Pneumonia,
}

impl ImageLabel {
    /// The wire form of the label.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Pneumonia => "PNEUMONIA",
        }
    }
}

impl fmt::Display for ImageLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verdict derived from the free-text radiology report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TextLabel {
    /// The report reads as normal.
    Normal,
    /// The report mentions abnormal findings.
    Abnormal,
    /// The report matched neither vocabulary.
    Uncertain,
}

impl TextLabel {
    /// The wire form of the label.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Abnormal => "ABNORMAL",
            Self::Uncertain => "UNCERTAIN",
        }
    }
}

impl fmt::Display for TextLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity attached to an image-derived finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingSeverity {
    /// Low severity.
    Low,
    /// Moderate severity.
    Moderate,
    /// High severity.
    High,
}

/// Severity qualifier extracted from report text via the fixed severity
/// vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportSeverity {
    /// A mild-group term was present.
    Mild,
    /// A moderate-group term was present.
    Moderate,
    /// A severe-group term was present.
    Severe,
    /// No severity term matched.
    Unspecified,
    /// Severity does not apply (normal finding).
    None,
}

/// Completeness tier of a radiology report, by word count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportQuality {
    /// Fewer than 10 words.
    Minimal,
    /// Fewer than 30 words.
    Brief,
    /// Fewer than 80 words.
    Standard,
    /// 80 words or more.
    Detailed,
}
