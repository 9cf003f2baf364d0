//! Credit Pricing - rule-based interest-rate pricing for consumer credit
//!
//! This library provides:
//! - Applicant records for the USA (FICO) and India (CIBIL) markets
//! - A pluggable default-probability estimator with a reference heuristic
//! - Risk, market and profit rate adjustments blended into a clamped final rate
//! - Expected-profit estimates and ordered, explainable reasoning
//! - An in-memory decision history with aggregate statistics

pub mod applicant;
pub mod error;
pub mod estimator;
pub mod pricing;

// Re-export commonly used types
pub use applicant::{ApplicantRecord, Country};
pub use error::{PricingError, PricingResult};
pub use estimator::{DefaultEstimator, FeatureSet, HeuristicEstimator};
pub use pricing::{AggregateStats, PricingConfig, PricingEngine, RateDecision, Reason};
