//! Response assembly for one analyzed case.

use serde::{Deserialize, Serialize};

use concord_agreement::{AgreementResult, DiscrepancyReport};
use concord_core::{
    round1, ClassProbabilities, Classification, FindingSeverity, ImageDetail, ImageFinding,
    ImageSpecificFinding, TextFinding,
};

/// The assembled response for one case.
///
/// The agreement verdict's fields sit at the top level of the serialized
/// record, merged with the per-modality analyses and artifact references.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseAnalysis {
    /// Fused agreement verdict, flattened into the top level.
    #[serde(flatten)]
    pub agreement: AgreementResult,
    /// When the case was analyzed, `%Y%m%d_%H%M%S`.
    pub timestamp: String,
    /// The image classifier's structured verdict.
    pub image_analysis: ImageFinding,
    /// The text engine's structured verdict.
    pub text_analysis: TextFinding,
    /// Specific disagreements between the two.
    pub discrepancies: DiscrepancyReport,
    /// File name of the saliency overlay artifact, if one was generated.
    pub gradcam_image: Option<String>,
    /// File name of the stored source image.
    pub original_image: String,
}

/// Assemble the structured image verdict from the classifier's outputs.
///
/// Probabilities come in as fractions in `[0, 1]` and are reported as
/// percentages with one decimal. A pneumonia probability above 0.5 yields an
/// opacity/consolidation finding (severity `high` above 0.75, else
/// `moderate`); otherwise the finding is clear lung fields at severity `low`.
#[must_use]
pub fn assemble_image_finding(
    classification: &Classification,
    probabilities: &ClassProbabilities,
) -> ImageFinding {
    let normal = probabilities.normal;
    let pneumonia = probabilities.pneumonia;

    let finding = if pneumonia > 0.5 {
        ImageSpecificFinding {
            finding: "Opacity / consolidation pattern".to_string(),
            confidence: round1(pneumonia * 100.0),
            severity: if pneumonia > 0.75 {
                FindingSeverity::High
            } else {
                FindingSeverity::Moderate
            },
        }
    } else {
        ImageSpecificFinding {
            finding: "Clear lung fields".to_string(),
            confidence: round1(normal * 100.0),
            severity: FindingSeverity::Low,
        }
    };

    ImageFinding {
        prediction: classification.label,
        confidence: round1(classification.confidence * 100.0),
        detailed_findings: ImageDetail {
            normal_probability: round1(normal * 100.0),
            pneumonia_probability: round1(pneumonia * 100.0),
            specific_findings: vec![finding],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use concord_core::ImageLabel;

    fn classification(label: ImageLabel, confidence: f64) -> Classification {
        Classification {
            label,
            confidence,
            class_index: match label {
                ImageLabel::Normal => 0,
                ImageLabel::Pneumonia => 1,
            },
        }
    }

    #[test]
    fn test_high_pneumonia_probability() {
        let finding = assemble_image_finding(
            &classification(ImageLabel::Pneumonia, 0.923),
            &ClassProbabilities {
                normal: 0.077,
                pneumonia: 0.923,
            },
        );

        assert_eq!(finding.prediction, ImageLabel::Pneumonia);
        assert_eq!(finding.confidence, 92.3);
        assert_eq!(finding.detailed_findings.pneumonia_probability, 92.3);
        assert_eq!(finding.detailed_findings.normal_probability, 7.7);

        let specific = &finding.detailed_findings.specific_findings[0];
        assert_eq!(specific.finding, "Opacity / consolidation pattern");
        assert_eq!(specific.severity, FindingSeverity::High);
    }

    #[test]
    fn test_borderline_pneumonia_is_moderate() {
        let finding = assemble_image_finding(
            &classification(ImageLabel::Pneumonia, 0.6),
            &ClassProbabilities {
                normal: 0.4,
                pneumonia: 0.6,
            },
        );

        let specific = &finding.detailed_findings.specific_findings[0];
        assert_eq!(specific.severity, FindingSeverity::Moderate);
        assert_eq!(specific.confidence, 60.0);
    }

    #[test]
    fn test_normal_probability_dominates() {
        let finding = assemble_image_finding(
            &classification(ImageLabel::Normal, 0.8),
            &ClassProbabilities {
                normal: 0.8,
                pneumonia: 0.2,
            },
        );

        let specific = &finding.detailed_findings.specific_findings[0];
        assert_eq!(specific.finding, "Clear lung fields");
        assert_eq!(specific.severity, FindingSeverity::Low);
        assert_eq!(specific.confidence, 80.0);
    }
}
