//! Report diagnosis extraction.

use once_cell::sync::Lazy;
use regex::Regex;

use concord_core::{
    round1, ReportDetail, ReportFinding, ReportQuality, ReportSeverity, TextFinding, TextLabel,
};

use crate::vocab::{ABNORMAL_TERMS, LOCATION_TERMS, NORMAL_TERMS, SEVERITY_TERMS};

/// A number immediately followed by a mm/cm unit, e.g. "3 mm" or "12cm".
static MEASUREMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+\s*(mm|cm)").expect("measurement pattern is valid"));

/// Impression/conclusion section heading, value up to the next newline or
/// period.
static IMPRESSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(impression|conclusion|findings):\s*([^\n.]+)").expect("impression pattern is valid"));

/// Explicit diagnosis statement.
static DIAGNOSIS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(diagnosis|diagnosed with):\s*([^\n.]+)").expect("diagnosis pattern is valid"));

/// Diagnose a free-text radiology report.
///
/// Counts the normal and abnormal vocabulary terms present in the case-folded
/// text (substring presence, one count per term) and applies the decision
/// rule:
///
/// - more abnormal than normal terms -> `ABNORMAL`,
///   confidence `min(0.60 + 0.10*n, 0.95)`
/// - any normal term -> `NORMAL`, confidence `min(0.70 + 0.05*n, 0.95)`
/// - otherwise -> `UNCERTAIN`, confidence `0.50`
///
/// Confidence is reported as a percentage with one decimal place. An empty
/// or whitespace-only report matches no terms and comes back `UNCERTAIN`.
#[must_use]
pub fn diagnose(report: &str) -> TextFinding {
    let text = report.to_lowercase();

    let abnormal_count = ABNORMAL_TERMS.iter().filter(|term| text.contains(*term)).count();
    let normal_count = NORMAL_TERMS.iter().filter(|term| text.contains(*term)).count();

    let (diagnosis, confidence) = if abnormal_count > normal_count {
        (
            TextLabel::Abnormal,
            (0.60 + 0.10 * abnormal_count as f64).min(0.95),
        )
    } else if normal_count > 0 {
        (
            TextLabel::Normal,
            (0.70 + 0.05 * normal_count as f64).min(0.95),
        )
    } else {
        (TextLabel::Uncertain, 0.50)
    };

    TextFinding {
        text_diagnosis: diagnosis,
        confidence: round1(confidence * 100.0),
        abnormal_terms_found: abnormal_count,
        normal_terms_found: normal_count,
        detailed_findings: detailed_findings(report),
    }
}

/// Extract detailed findings from a radiology report.
///
/// Tests the presence of specific phrase groups independently of the overall
/// diagnosis, attaches a severity qualifier to each abnormal finding,
/// collects the anatomical location terms present, flags measurements, and
/// grades the report's completeness by word count.
#[must_use]
pub fn detailed_findings(report: &str) -> ReportDetail {
    let text = report.to_lowercase();
    let mut findings = Vec::new();

    if ["pneumonia", "infection"].iter().any(|t| text.contains(t)) {
        findings.push(ReportFinding {
            finding: "Pneumonia/Infection mentioned".to_string(),
            source: "doctor_report".to_string(),
            severity: detect_severity(&text),
        });
    }

    if ["opacity", "consolidation"].iter().any(|t| text.contains(t)) {
        findings.push(ReportFinding {
            finding: "Opacity or consolidation noted".to_string(),
            source: "doctor_report".to_string(),
            severity: detect_severity(&text),
        });
    }

    if ["effusion", "pleural"].iter().any(|t| text.contains(t)) {
        findings.push(ReportFinding {
            finding: "Pleural effusion".to_string(),
            source: "doctor_report".to_string(),
            severity: detect_severity(&text),
        });
    }

    if NORMAL_TERMS.iter().any(|t| text.contains(t)) {
        findings.push(ReportFinding {
            finding: "Normal findings noted".to_string(),
            source: "doctor_report".to_string(),
            severity: ReportSeverity::None,
        });
    }

    let locations: Vec<String> = LOCATION_TERMS
        .iter()
        .filter(|loc| text.contains(*loc))
        .map(|loc| (*loc).to_string())
        .collect();

    ReportDetail {
        specific_findings: findings,
        locations_mentioned: locations,
        has_measurements: MEASUREMENT_RE.is_match(&text),
        report_length: report.split_whitespace().count(),
        technical_quality: assess_report_quality(report),
    }
}

/// Detect a severity qualifier in case-folded report text.
///
/// The severity groups are checked in order (mild, moderate, severe); the
/// first group with any term present wins. No match yields
/// [`ReportSeverity::Unspecified`].
#[must_use]
pub fn detect_severity(text: &str) -> ReportSeverity {
    for (severity, terms) in SEVERITY_TERMS {
        if terms.iter().any(|t| text.contains(t)) {
            return *severity;
        }
    }
    ReportSeverity::Unspecified
}

/// Grade a report's completeness by word count.
#[must_use]
pub fn assess_report_quality(report: &str) -> ReportQuality {
    let word_count = report.split_whitespace().count();

    if word_count < 10 {
        ReportQuality::Minimal
    } else if word_count < 30 {
        ReportQuality::Brief
    } else if word_count < 80 {
        ReportQuality::Standard
    } else {
        ReportQuality::Detailed
    }
}

/// Extract the stated diagnosis from common report patterns.
///
/// Looks for an `impression:`/`conclusion:`/`findings:` section first, then
/// an explicit `diagnosis:`/`diagnosed with:` statement, and returns the
/// trimmed text up to the next newline or period.
#[must_use]
pub fn extract_impression(report: &str) -> Option<String> {
    let text = report.to_lowercase();

    if let Some(caps) = IMPRESSION_RE.captures(&text) {
        return Some(caps[2].trim().to_string());
    }

    if let Some(caps) = DIAGNOSIS_RE.captures(&text) {
        return Some(caps[2].trim().to_string());
    }

    None
}
