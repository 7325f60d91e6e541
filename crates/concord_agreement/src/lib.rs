//! # concord_agreement
//!
//! Fuses the image classifier's verdict and the text engine's verdict into a
//! single risk assessment.
//!
//! This crate provides:
//! - [`agreement_score`] - symmetric closeness of the two confidences
//! - [`check_agreement`] - status, risk tier, alert, and recommendation
//! - [`analyze_discrepancies`] - structured list of specific disagreements

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

mod discrepancy;
mod verdict;

pub use discrepancy::{
    analyze_discrepancies, Discrepancy, DiscrepancyKind, DiscrepancyReport, DiscrepancySeverity,
};
pub use verdict::{
    agreement_score, check_agreement, AgreementResult, AgreementStatus, AlertType, Recommendation,
    RiskLevel,
};
