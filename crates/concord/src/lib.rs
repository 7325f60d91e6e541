//! # concord
//!
//! Doctor-AI diagnostic agreement for chest X-ray cases.
//!
//! concord compares an image classifier's verdict on a chest X-ray against a
//! free-text radiology report, producing an agreement score, a discrepancy
//! list, a risk verdict, and a Grad-CAM saliency overlay of the classifier's
//! decision:
//!
//! - **Text analysis**: a deterministic rule engine over fixed vocabularies
//! - **Saliency**: gradient-weighted class activation mapping and overlay
//!   rendering
//! - **Agreement**: confidence-closeness scoring and label-mismatch
//!   discrepancies
//! - **Pipeline**: per-case orchestration over a pluggable classifier
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use concord::prelude::*;
//!
//! // The CNN lives behind the XrayClassifier trait.
//! let pipeline = AnalysisPipeline::new(classifier, PipelineConfig::default());
//!
//! let analysis = pipeline.analyze(
//!     Path::new("temp/20240101_120000_case.png"),
//!     "No acute cardiopulmonary abnormality. Clear lungs.",
//! )?;
//!
//! println!("{}", serde_json::to_string_pretty(&analysis)?);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

// Re-export all crates
pub use concord_agreement as agreement;
pub use concord_core as core;
pub use concord_explain as explain;
pub use concord_pipeline as pipeline;
pub use concord_text as text;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use concord::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use concord_core::{
        ClassProbabilities, Classification, ClassifierError, FeatureCapture, ImageFinding,
        ImageLabel, TextFinding, TextLabel, XrayClassifier,
    };

    // Text engine
    pub use concord_text::{detailed_findings, diagnose, extract_impression};

    // Saliency
    pub use concord_explain::{
        grad_cam, render_heatmap, render_overlay, save_overlay, Colormap, SaliencyConfig,
        SaliencyMap,
    };

    // Agreement
    pub use concord_agreement::{
        agreement_score, analyze_discrepancies, check_agreement, AgreementResult, AgreementStatus,
        DiscrepancyReport, RiskLevel,
    };

    // Pipeline
    pub use concord_pipeline::{
        assemble_image_finding, AnalysisPipeline, CaseAnalysis, PipelineConfig, PipelineError,
    };
}
