//! Default-probability estimation
//!
//! The pricing engine treats the default model as an injected capability.
//! [`HeuristicEstimator`] is the built-in reference model; a trained
//! classifier can replace it by implementing [`DefaultEstimator`], or by
//! passing a closure with the same signature.

use crate::applicant::{ApplicantRecord, Country};
use serde::{Deserialize, Serialize};

/// Inputs handed to a default-probability estimator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSet {
    pub country: Country,
    pub credit_score: u32,

    /// Credit score scaled to [0, 1] within the country's range
    pub normalized_score: f64,

    pub debt_to_income: f64,
    pub loan_to_income: f64,
    pub employment_years: f64,
}

impl FeatureSet {
    /// Build features for a validated applicant
    pub fn from_applicant(applicant: &ApplicantRecord, normalized_score: f64) -> Self {
        Self {
            country: applicant.country,
            credit_score: applicant.credit_score,
            normalized_score,
            debt_to_income: applicant.debt_to_income(),
            loan_to_income: applicant.loan_to_income(),
            employment_years: applicant.employment_years,
        }
    }
}

/// Capability: estimate the probability that an applicant defaults
pub trait DefaultEstimator: Send + Sync {
    /// Probability of default in [0, 1]
    fn estimate_default_probability(&self, features: &FeatureSet) -> Result<f64, String>;

    /// Model name recorded on each decision
    fn name(&self) -> &str {
        "custom"
    }
}

impl<F> DefaultEstimator for F
where
    F: Fn(&FeatureSet) -> Result<f64, String> + Send + Sync,
{
    fn estimate_default_probability(&self, features: &FeatureSet) -> Result<f64, String> {
        self(features)
    }
}

/// Reference heuristic used until a trained model is plugged in.
///
/// `p = score_weight * (1 - n) + dti_weight * DTI + lti_weight * min(LTI, 1)`,
/// plus a surcharge for applicants with under a year at their employer,
/// capped at `max_probability`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeuristicEstimator {
    pub score_weight: f64,
    pub dti_weight: f64,
    pub lti_weight: f64,
    pub short_tenure_surcharge: f64,
    pub max_probability: f64,
}

impl Default for HeuristicEstimator {
    fn default() -> Self {
        Self {
            score_weight: 0.25,
            dti_weight: 0.10,
            lti_weight: 0.05,
            short_tenure_surcharge: 0.02,
            max_probability: 0.99,
        }
    }
}

impl DefaultEstimator for HeuristicEstimator {
    fn estimate_default_probability(&self, features: &FeatureSet) -> Result<f64, String> {
        if !features.normalized_score.is_finite()
            || !features.debt_to_income.is_finite()
            || !features.loan_to_income.is_finite()
        {
            return Err(format!("non-finite features: {:?}", features));
        }

        let mut p = self.score_weight * (1.0 - features.normalized_score)
            + self.dti_weight * features.debt_to_income
            + self.lti_weight * features.loan_to_income.min(1.0);

        if features.employment_years < 1.0 {
            p += self.short_tenure_surcharge;
        }

        Ok(p.clamp(0.0, self.max_probability))
    }

    fn name(&self) -> &str {
        "heuristic"
    }
}
