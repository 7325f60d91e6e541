//! Agreement verdict computation.

use serde::{Deserialize, Serialize};

use concord_core::{round1, ImageFinding, TextFinding};

/// Whether the two modalities agree on the diagnosis label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AgreementStatus {
    /// Labels match.
    Agreement,
    /// Labels differ.
    Disagreement,
}

/// Risk tier derived from the agreement status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    /// Diagnoses align; no escalation needed.
    Low,
    /// Diagnoses conflict; immediate review.
    Critical,
}

/// Presentation class of the alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    /// Agreement.
    Success,
    /// Disagreement.
    Critical,
}

/// Recommended follow-up for the case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    /// Summary message.
    pub message: String,
    /// Ordered next steps.
    pub next_steps: Vec<String>,
}

/// The fused verdict for one case.
///
/// Invariant: `status == Agreement` iff `risk_level == Low` iff `alert == false`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgreementResult {
    /// Agreement status.
    pub status: AgreementStatus,
    /// Risk tier.
    pub risk_level: RiskLevel,
    /// Closeness of the two confidences, percentage with one decimal.
    pub agreement_score: f64,
    /// Whether the case needs attention.
    pub alert: bool,
    /// Alert message.
    pub alert_message: String,
    /// Alert presentation class.
    pub alert_type: AlertType,
    /// Recommended follow-up.
    pub recommendation: Recommendation,
}

/// Symmetric closeness of two confidence percentages.
///
/// `round((1 - |a/100 - b/100|) * 100, 1)` - depends only on the absolute
/// difference, never on which modality produced which value, and is
/// independent of whether the labels match.
#[must_use]
pub fn agreement_score(image_confidence: f64, text_confidence: f64) -> f64 {
    let diff = (image_confidence / 100.0 - text_confidence / 100.0).abs();
    round1((1.0 - diff) * 100.0)
}

/// Fuse the two verdicts into an [`AgreementResult`].
///
/// Labels are compared exactly as emitted by each modality, so the image
/// classifier's domain term (`PNEUMONIA`) never equals the text engine's
/// generic `ABNORMAL` - an abnormal/abnormal pair is still a mismatch of
/// vocabulary and is flagged for review.
#[must_use]
pub fn check_agreement(image: &ImageFinding, text: &TextFinding) -> AgreementResult {
    let score = agreement_score(image.confidence, text.confidence);

    let labels_match = image.prediction.as_str() == text.text_diagnosis.as_str();

    let (status, risk_level, alert_message, alert_type) = if labels_match {
        (
            AgreementStatus::Agreement,
            RiskLevel::Low,
            "AI and doctor diagnosis align",
            AlertType::Success,
        )
    } else {
        (
            AgreementStatus::Disagreement,
            RiskLevel::Critical,
            "Diagnosis mismatch detected",
            AlertType::Critical,
        )
    };

    AgreementResult {
        status,
        risk_level,
        agreement_score: score,
        alert: risk_level != RiskLevel::Low,
        alert_message: alert_message.to_string(),
        alert_type,
        recommendation: recommendation_for(status),
    }
}

fn recommendation_for(status: AgreementStatus) -> Recommendation {
    match status {
        AgreementStatus::Agreement => Recommendation {
            message: "Diagnosis confirmed".to_string(),
            next_steps: vec!["Proceed with treatment".to_string()],
        },
        AgreementStatus::Disagreement => Recommendation {
            message: "Immediate review required".to_string(),
            next_steps: vec![
                "Second radiologist opinion".to_string(),
                "Review original imaging".to_string(),
            ],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use concord_core::{
        ImageDetail, ImageLabel, ReportDetail, ReportQuality, TextLabel,
    };

    fn image_finding(label: ImageLabel, confidence: f64) -> ImageFinding {
        let pneumonia = match label {
            ImageLabel::Pneumonia => confidence,
            ImageLabel::Normal => 100.0 - confidence,
        };
        ImageFinding {
            prediction: label,
            confidence,
            detailed_findings: ImageDetail {
                normal_probability: 100.0 - pneumonia,
                pneumonia_probability: pneumonia,
                specific_findings: vec![],
            },
        }
    }

    fn text_finding(label: TextLabel, confidence: f64) -> TextFinding {
        TextFinding {
            text_diagnosis: label,
            confidence,
            abnormal_terms_found: 0,
            normal_terms_found: 0,
            detailed_findings: ReportDetail {
                specific_findings: vec![],
                locations_mentioned: vec![],
                has_measurements: false,
                report_length: 0,
                technical_quality: ReportQuality::Minimal,
            },
        }
    }

    #[test]
    fn test_score_is_symmetric() {
        for (a, b) in [(92.3, 85.0), (0.0, 100.0), (50.0, 50.0), (70.1, 69.9)] {
            assert_eq!(agreement_score(a, b), agreement_score(b, a));
        }
    }

    #[test]
    fn test_score_depends_only_on_difference() {
        assert_eq!(agreement_score(92.3, 85.0), 92.7);
        assert_eq!(agreement_score(88.0, 90.0), 98.0);
        assert_eq!(agreement_score(100.0, 0.0), 0.0);
        assert_eq!(agreement_score(64.2, 64.2), 100.0);
    }

    #[test]
    fn test_disagreement_verdict() {
        let image = image_finding(ImageLabel::Pneumonia, 92.3);
        let text = text_finding(TextLabel::Normal, 85.0);

        let result = check_agreement(&image, &text);
        assert_eq!(result.status, AgreementStatus::Disagreement);
        assert_eq!(result.risk_level, RiskLevel::Critical);
        assert_eq!(result.agreement_score, 92.7);
        assert!(result.alert);
        assert_eq!(result.alert_message, "Diagnosis mismatch detected");
        assert_eq!(result.alert_type, AlertType::Critical);
        assert_eq!(result.recommendation.message, "Immediate review required");
        assert_eq!(
            result.recommendation.next_steps,
            vec!["Second radiologist opinion", "Review original imaging"]
        );
    }

    #[test]
    fn test_agreement_verdict() {
        let image = image_finding(ImageLabel::Normal, 88.0);
        let text = text_finding(TextLabel::Normal, 90.0);

        let result = check_agreement(&image, &text);
        assert_eq!(result.status, AgreementStatus::Agreement);
        assert_eq!(result.risk_level, RiskLevel::Low);
        assert_eq!(result.agreement_score, 98.0);
        assert!(!result.alert);
        assert_eq!(result.alert_message, "AI and doctor diagnosis align");
        assert_eq!(result.alert_type, AlertType::Success);
        assert_eq!(result.recommendation.next_steps, vec!["Proceed with treatment"]);
    }

    #[test]
    fn test_abnormal_vocabularies_never_align() {
        // PNEUMONIA vs ABNORMAL: both abnormal, different vocabularies.
        let image = image_finding(ImageLabel::Pneumonia, 90.0);
        let text = text_finding(TextLabel::Abnormal, 90.0);

        let result = check_agreement(&image, &text);
        assert_eq!(result.status, AgreementStatus::Disagreement);
        // The score ignores the labels entirely.
        assert_eq!(result.agreement_score, 100.0);
    }

    #[test]
    fn test_status_risk_alert_invariant() {
        let cases = [
            (ImageLabel::Normal, TextLabel::Normal),
            (ImageLabel::Normal, TextLabel::Abnormal),
            (ImageLabel::Normal, TextLabel::Uncertain),
            (ImageLabel::Pneumonia, TextLabel::Normal),
            (ImageLabel::Pneumonia, TextLabel::Abnormal),
            (ImageLabel::Pneumonia, TextLabel::Uncertain),
        ];

        for (img, txt) in cases {
            let result = check_agreement(&image_finding(img, 80.0), &text_finding(txt, 75.0));
            let agreed = result.status == AgreementStatus::Agreement;
            assert_eq!(agreed, result.risk_level == RiskLevel::Low);
            assert_eq!(agreed, !result.alert);
        }
    }

    #[test]
    fn test_wire_format() {
        let result = check_agreement(
            &image_finding(ImageLabel::Pneumonia, 92.3),
            &text_finding(TextLabel::Normal, 85.0),
        );

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "DISAGREEMENT");
        assert_eq!(json["risk_level"], "CRITICAL");
        assert_eq!(json["alert_type"], "critical");
        assert_eq!(json["agreement_score"], 92.7);
    }
}
