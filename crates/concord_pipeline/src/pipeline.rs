//! Per-request orchestration.

use std::path::{Path, PathBuf};

use chrono::Local;
use image::DynamicImage;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use concord_agreement::{analyze_discrepancies, check_agreement};
use concord_core::XrayClassifier;
use concord_explain::{grad_cam, render_overlay, save_overlay, SaliencyConfig};
use concord_text::diagnose;

use crate::case::{assemble_image_finding, CaseAnalysis};
use crate::error::{PipelineError, Result};

/// Configuration for the analysis pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Saliency rendering parameters.
    pub saliency: SaliencyConfig,
}

impl PipelineConfig {
    /// Set the saliency rendering parameters.
    #[must_use]
    pub fn with_saliency(mut self, saliency: SaliencyConfig) -> Self {
        self.saliency = saliency;
        self
    }
}

/// Drives one case (image + report) through the full pipeline.
///
/// The classifier instance is shared across requests; forward-only inference
/// runs unserialized, while the forward+backward pass for gradient capture
/// is guarded by a lock so at most one pass runs at a time.
pub struct AnalysisPipeline<C> {
    classifier: C,
    config: PipelineConfig,
    pass_lock: Mutex<()>,
}

impl<C: XrayClassifier> AnalysisPipeline<C> {
    /// Create a pipeline over a classifier instance.
    pub fn new(classifier: C, config: PipelineConfig) -> Self {
        Self {
            classifier,
            config,
            pass_lock: Mutex::new(()),
        }
    }

    /// Analyze one case.
    ///
    /// The image at `image_path` must already be stored by the caller; the
    /// saliency overlay is written beside it as `<stem>_gradcam.jpg`.
    ///
    /// An empty report or an unreadable image fails the request with
    /// [`PipelineError::InvalidInput`]. A saliency failure does not fail the
    /// request: the response simply carries no `gradcam_image`.
    pub fn analyze(&self, image_path: &Path, report: &str) -> Result<CaseAnalysis> {
        if report.trim().is_empty() {
            return Err(PipelineError::InvalidInput(
                "report text is empty".to_string(),
            ));
        }

        let image = image::open(image_path).map_err(|e| {
            PipelineError::InvalidInput(format!(
                "unreadable image {}: {e}",
                image_path.display()
            ))
        })?;

        let classification = self.classifier.classify(&image)?;
        let probabilities = self.classifier.detailed_probabilities(&image)?;
        let image_result = assemble_image_finding(&classification, &probabilities);
        debug!(
            label = %image_result.prediction,
            confidence = image_result.confidence,
            "image classified"
        );

        let text_result = diagnose(report);
        debug!(
            label = %text_result.text_diagnosis,
            confidence = text_result.confidence,
            "report diagnosed"
        );

        let agreement = check_agreement(&image_result, &text_result);
        let discrepancies = analyze_discrepancies(&image_result, &text_result, report);

        let gradcam_image =
            match self.generate_saliency(&image, image_path, classification.class_index) {
                Ok(path) => path.file_name().map(|n| n.to_string_lossy().into_owned()),
                Err(e) => {
                    warn!("saliency generation failed, continuing without overlay: {e}");
                    None
                }
            };

        let original_image = image_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(CaseAnalysis {
            agreement,
            timestamp: Local::now().format("%Y%m%d_%H%M%S").to_string(),
            image_analysis: image_result,
            text_analysis: text_result,
            discrepancies,
            gradcam_image,
            original_image,
        })
    }

    /// Capture gradients, compute the CAM, and write the overlay artifact.
    ///
    /// The capture call is the one mandatory critical section: it runs a
    /// forward+backward pass through the shared classifier, so passes are
    /// serialized across requests.
    fn generate_saliency(
        &self,
        image: &DynamicImage,
        image_path: &Path,
        class_index: usize,
    ) -> Result<PathBuf> {
        let capture = {
            let _pass = self.pass_lock.lock();
            self.classifier.capture_gradients(image, class_index)?
        };

        let map = grad_cam(&capture.activations, &capture.gradients)?;
        let overlay = render_overlay(&map, image, &self.config.saliency);
        let path = save_overlay(&overlay, image_path)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use concord_agreement::AgreementStatus;
    use concord_core::{
        ClassProbabilities, Classification, ClassifierError, FeatureCapture, ImageLabel, TextLabel,
    };
    use image::RgbImage;
    use ndarray::Array3;

    struct MockClassifier {
        label: ImageLabel,
        confidence: f64,
        fail_capture: bool,
    }

    impl XrayClassifier for MockClassifier {
        fn classify(&self, _image: &DynamicImage) -> concord_core::Result<Classification> {
            Ok(Classification {
                label: self.label,
                confidence: self.confidence,
                class_index: match self.label {
                    ImageLabel::Normal => 0,
                    ImageLabel::Pneumonia => 1,
                },
            })
        }

        fn detailed_probabilities(
            &self,
            _image: &DynamicImage,
        ) -> concord_core::Result<ClassProbabilities> {
            let pneumonia = match self.label {
                ImageLabel::Pneumonia => self.confidence,
                ImageLabel::Normal => 1.0 - self.confidence,
            };
            Ok(ClassProbabilities {
                normal: 1.0 - pneumonia,
                pneumonia,
            })
        }

        fn capture_gradients(
            &self,
            _image: &DynamicImage,
            _class_index: usize,
        ) -> concord_core::Result<FeatureCapture> {
            if self.fail_capture {
                return Err(ClassifierError::CaptureFailed(
                    "hooks returned nothing".to_string(),
                ));
            }
            Ok(FeatureCapture {
                activations: Array3::ones((4, 7, 7)),
                gradients: Array3::ones((4, 7, 7)),
            })
        }
    }

    fn write_test_image(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join("concord_pipeline_tests");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        RgbImage::new(16, 16).save(&path).unwrap();
        path
    }

    fn pipeline(fail_capture: bool) -> AnalysisPipeline<MockClassifier> {
        AnalysisPipeline::new(
            MockClassifier {
                label: ImageLabel::Pneumonia,
                confidence: 0.923,
                fail_capture,
            },
            PipelineConfig::default(),
        )
    }

    #[test]
    fn test_analyze_full_case() {
        let image_path = write_test_image("full_case.png");
        let report = "No acute cardiopulmonary abnormality. Clear lungs.";

        let analysis = pipeline(false).analyze(&image_path, report).unwrap();

        assert_eq!(analysis.image_analysis.prediction, ImageLabel::Pneumonia);
        assert_eq!(analysis.text_analysis.text_diagnosis, TextLabel::Normal);
        assert_eq!(analysis.agreement.status, AgreementStatus::Disagreement);
        assert_eq!(analysis.agreement.agreement_score, 92.7);
        assert_eq!(analysis.discrepancies.count, 1);
        assert_eq!(
            analysis.gradcam_image.as_deref(),
            Some("full_case_gradcam.jpg")
        );
        assert_eq!(analysis.original_image, "full_case.png");
        assert_eq!(analysis.timestamp.len(), "20250101_120000".len());
    }

    #[test]
    fn test_empty_report_is_rejected() {
        let image_path = write_test_image("empty_report.png");

        let err = pipeline(false).analyze(&image_path, "   ").unwrap_err();
        assert!(matches!(err, PipelineError::InvalidInput(_)));
    }

    #[test]
    fn test_unreadable_image_is_rejected() {
        let path = std::env::temp_dir().join("concord_pipeline_tests_missing.png");

        let err = pipeline(false).analyze(&path, "Clear lungs.").unwrap_err();
        assert!(matches!(err, PipelineError::InvalidInput(_)));
    }

    #[test]
    fn test_capture_failure_degrades_response() {
        let image_path = write_test_image("degraded.png");
        let report = "Right lower lobe pneumonia.";

        let analysis = pipeline(true).analyze(&image_path, report).unwrap();

        // Saliency is missing but the rest of the response is intact.
        assert!(analysis.gradcam_image.is_none());
        assert_eq!(analysis.discrepancies.count, 1);
        assert_eq!(analysis.agreement.status, AgreementStatus::Disagreement);
    }

    #[test]
    fn test_response_wire_shape() {
        let image_path = write_test_image("wire_shape.png");

        let analysis = pipeline(false)
            .analyze(&image_path, "Clear lungs, no acute findings.")
            .unwrap();
        let json = serde_json::to_value(&analysis).unwrap();

        // Agreement fields are flattened to the top level.
        assert_eq!(json["status"], "DISAGREEMENT");
        assert_eq!(json["risk_level"], "CRITICAL");
        assert!(json["recommendation"]["next_steps"].is_array());
        assert_eq!(json["image_analysis"]["prediction"], "PNEUMONIA");
        assert_eq!(json["text_analysis"]["text_diagnosis"], "NORMAL");
        assert_eq!(json["discrepancies"]["count"], 1);
    }
}
