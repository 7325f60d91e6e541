//! Fixed term vocabularies for report analysis.
//!
//! All matching against these vocabularies is unanchored substring search
//! over the case-folded report. That means a term can match inside a longer
//! word ("normal" inside "abnormality", "small" inside "smaller"); this is
//! the shipped behavior and callers rely on it.

use concord_core::ReportSeverity;

/// Phrases indicating a normal study.
pub const NORMAL_TERMS: &[&str] = &[
    "no acute",
    "normal",
    "clear lungs",
    "clear lung fields",
    "no evidence",
    "within normal limits",
    "unremarkable",
    "no focal",
    "no infiltrate",
    "no consolidation",
    "no pneumonia",
    "negative",
];

/// Terms indicating abnormal findings.
pub const ABNORMAL_TERMS: &[&str] = &[
    "pneumonia",
    "opacity",
    "consolidation",
    "infiltrate",
    "infection",
    "abnormal",
    "effusion",
    "pleural",
    "atelectasis",
    "nodule",
    "mass",
    "lesion",
    "congestion",
    "edema",
    "cardiomegaly",
];

/// Severity qualifier groups, checked in order; the first group with any
/// term present wins.
pub const SEVERITY_TERMS: &[(ReportSeverity, &[&str])] = &[
    (ReportSeverity::Mild, &["mild", "minimal", "slight", "small"]),
    (ReportSeverity::Moderate, &["moderate", "moderate-sized", "some"]),
    (
        ReportSeverity::Severe,
        &["severe", "large", "extensive", "significant", "marked"],
    ),
];

/// Anatomical location terms.
pub const LOCATION_TERMS: &[&str] = &[
    "right",
    "left",
    "bilateral",
    "upper",
    "lower",
    "middle",
    "base",
    "apex",
    "lobe",
    "lung field",
];
