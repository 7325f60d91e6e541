//! Discrepancy analysis between the two modalities.

use serde::{Deserialize, Serialize};

use concord_core::{ImageFinding, TextFinding};

/// Class of a detected discrepancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscrepancyKind {
    /// Image and text diagnoses carry different labels.
    DiagnosisMismatch,
}

/// Severity of a detected discrepancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscrepancySeverity {
    /// Requires immediate review.
    Critical,
}

/// One specific disagreement between the image and text diagnoses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Discrepancy {
    /// Discrepancy class.
    #[serde(rename = "type")]
    pub kind: DiscrepancyKind,
    /// Severity.
    pub severity: DiscrepancySeverity,
    /// Human-readable description.
    pub description: String,
    /// The image classifier's label, verbatim.
    pub ai_finding: String,
    /// The text engine's label, verbatim.
    pub doctor_finding: String,
}

/// Structured list of discrepancies for one case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscrepancyReport {
    /// Number of discrepancies; always equals `items.len()`.
    pub count: usize,
    /// The discrepancies found.
    pub items: Vec<Discrepancy>,
    /// One-line summary.
    pub summary: String,
}

impl DiscrepancyReport {
    /// Build a report from a list of discrepancies, keeping `count` and
    /// `summary` in sync with the list.
    #[must_use]
    pub fn from_items(items: Vec<Discrepancy>) -> Self {
        let summary = if items.is_empty() {
            "No discrepancies"
        } else {
            "Critical diagnostic disagreement"
        };
        Self {
            count: items.len(),
            items,
            summary: summary.to_string(),
        }
    }
}

/// Compare the two verdicts and list their specific disagreements.
///
/// Currently a single discrepancy class exists - a label mismatch between
/// the image and text diagnoses. The raw report text is accepted so further
/// classes (e.g. confidence divergence without a label mismatch) can be
/// added without changing the signature or output schema.
#[must_use]
pub fn analyze_discrepancies(
    image: &ImageFinding,
    text: &TextFinding,
    _report: &str,
) -> DiscrepancyReport {
    let mut items = Vec::new();

    if image.prediction.as_str() != text.text_diagnosis.as_str() {
        items.push(Discrepancy {
            kind: DiscrepancyKind::DiagnosisMismatch,
            severity: DiscrepancySeverity::Critical,
            description: "Image and report disagree".to_string(),
            ai_finding: image.prediction.as_str().to_string(),
            doctor_finding: text.text_diagnosis.as_str().to_string(),
        });
    }

    DiscrepancyReport::from_items(items)
}
