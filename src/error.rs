//! Error taxonomy for pricing decisions

use thiserror::Error;

/// Reasons a pricing decision can be refused.
///
/// Every variant is raised before the decision history is touched, so a
/// failed call never leaves a partial entry behind.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    /// Unsupported country or an inconsistent pricing configuration
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Applicant fields failed validation
    #[error("invalid applicant: {0}")]
    InvalidApplicant(String),

    /// The default-probability estimator failed or returned a value outside [0, 1]
    #[error("default probability estimation failed: {0}")]
    Estimation(String),
}

pub type PricingResult<T> = Result<T, PricingError>;
