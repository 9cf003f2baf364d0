//! Pricing configuration: per-country profiles, blend weights and rate bounds
//!
//! Country-specific constants live in a lookup keyed by [`Country`] so the
//! pricing formula stays identical across markets and only the data varies.

use crate::applicant::Country;
use crate::error::{PricingError, PricingResult};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Market constants for one country
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryProfile {
    /// Base annual rate before adjustments
    pub base_rate: f64,

    /// Lowest valid bureau score
    pub min_score: u32,

    /// Highest valid bureau score
    pub max_score: u32,

    /// Score at or above which the excellent market tier applies
    pub excellent_score: u32,

    /// Score at or above which the good market tier applies
    pub good_score: u32,

    /// Scores below this are called out as below average in the reasoning
    pub below_average_score: u32,

    /// Loan amount at or above which the large-loan discount applies
    pub large_loan: f64,

    /// Loan amount at or above which the medium-loan discount applies
    pub medium_loan: f64,
}

impl CountryProfile {
    /// USA: FICO 300-850, 12% base, USD loan-size tiers
    pub fn usa() -> Self {
        Self {
            base_rate: 0.12,
            min_score: 300,
            max_score: 850,
            excellent_score: 750,
            good_score: 700,
            below_average_score: 650,
            large_loan: 20_000.0,
            medium_loan: 10_000.0,
        }
    }

    /// India: CIBIL 300-900, 18% base, INR loan-size tiers
    pub fn india() -> Self {
        Self {
            base_rate: 0.18,
            min_score: 300,
            max_score: 900,
            excellent_score: 800,
            good_score: 750,
            below_average_score: 700,
            large_loan: 1_500_000.0,
            medium_loan: 750_000.0,
        }
    }

    /// Scale a score into [0, 1] within the valid range.
    ///
    /// Scores outside the range are rejected rather than clamped.
    pub fn normalize_score(&self, score: u32) -> PricingResult<f64> {
        if score < self.min_score || score > self.max_score {
            return Err(PricingError::InvalidApplicant(format!(
                "credit score {} outside valid range {}-{}",
                score, self.min_score, self.max_score
            )));
        }
        Ok(f64::from(score - self.min_score) / f64::from(self.max_score - self.min_score))
    }

    fn validate(&self, country: Country) -> PricingResult<()> {
        let fail = |msg: String| Err(PricingError::Configuration(format!("{}: {}", country, msg)));

        if !self.base_rate.is_finite() {
            return fail(format!("base rate must be finite, got {}", self.base_rate));
        }
        if self.min_score >= self.max_score {
            return fail(format!("empty score range {}-{}", self.min_score, self.max_score));
        }
        if self.good_score > self.excellent_score {
            return fail(format!(
                "good tier ({}) above excellent tier ({})",
                self.good_score, self.excellent_score
            ));
        }
        if !(self.medium_loan.is_finite() && self.large_loan.is_finite()) || self.medium_loan > self.large_loan {
            return fail(format!(
                "medium loan tier ({}) above large loan tier ({})",
                self.medium_loan, self.large_loan
            ));
        }
        Ok(())
    }
}

/// Weights applied when combining adjustments into the final rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjustmentWeights {
    pub risk: f64,
    pub market: f64,
    pub profit: f64,
}

impl Default for AdjustmentWeights {
    fn default() -> Self {
        Self {
            risk: 0.6,
            market: 0.3,
            profit: 0.1,
        }
    }
}

/// Weights of the three signals inside the risk score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskWeights {
    pub credit_score: f64,
    pub debt_to_income: f64,
    pub loan_to_income: f64,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            credit_score: 0.5,
            debt_to_income: 0.3,
            loan_to_income: 0.2,
        }
    }
}

/// Full pricing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Per-country market constants
    pub countries: BTreeMap<Country, CountryProfile>,

    pub weights: AdjustmentWeights,
    pub risk_weights: RiskWeights,

    /// Most favourable risk adjustment (lowest rate)
    pub min_risk_adjustment: f64,

    /// Least favourable risk adjustment
    pub max_risk_adjustment: f64,

    /// Final rate floor
    pub min_rate: f64,

    /// Final rate ceiling
    pub max_rate: f64,

    /// Fraction of principal lost on default (0.4 = 60% recovery)
    pub loss_given_default: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        let mut countries = BTreeMap::new();
        countries.insert(Country::Usa, CountryProfile::usa());
        countries.insert(Country::India, CountryProfile::india());

        Self {
            countries,
            weights: AdjustmentWeights::default(),
            risk_weights: RiskWeights::default(),
            min_risk_adjustment: -0.03,
            max_risk_adjustment: 0.08,
            min_rate: 0.08,
            max_rate: 0.36,
            loss_given_default: 0.4,
        }
    }
}

impl PricingConfig {
    /// Look up the market profile for a country
    pub fn profile(&self, country: Country) -> PricingResult<&CountryProfile> {
        self.countries.get(&country).ok_or_else(|| {
            PricingError::Configuration(format!("no pricing profile configured for {}", country))
        })
    }

    /// Check bounds, weights and every country profile
    pub fn validate(&self) -> PricingResult<()> {
        let weights = [
            self.weights.risk,
            self.weights.market,
            self.weights.profit,
            self.risk_weights.credit_score,
            self.risk_weights.debt_to_income,
            self.risk_weights.loan_to_income,
        ];
        if weights.iter().any(|w| !w.is_finite()) {
            return Err(PricingError::Configuration("weights must be finite".to_string()));
        }
        if !(self.min_risk_adjustment <= self.max_risk_adjustment) {
            return Err(PricingError::Configuration(format!(
                "risk adjustment bounds inverted: [{}, {}]",
                self.min_risk_adjustment, self.max_risk_adjustment
            )));
        }
        if !(self.min_rate <= self.max_rate) {
            return Err(PricingError::Configuration(format!(
                "rate bounds inverted: [{}, {}]",
                self.min_rate, self.max_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.loss_given_default) {
            return Err(PricingError::Configuration(format!(
                "loss given default must be in [0, 1], got {}",
                self.loss_given_default
            )));
        }
        for (country, profile) in &self.countries {
            profile.validate(*country)?;
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let config: PricingConfig = serde_json::from_str(json).context("parsing pricing config")?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading pricing config {}", path.display()))?;
        Self::from_json_str(&json).with_context(|| format!("loading {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_default_profiles() {
        let config = PricingConfig::default();
        assert!(config.validate().is_ok());

        let usa = config.profile(Country::Usa).unwrap();
        assert_eq!(usa.base_rate, 0.12);
        assert_eq!((usa.min_score, usa.max_score), (300, 850));

        let india = config.profile(Country::India).unwrap();
        assert_eq!(india.base_rate, 0.18);
        assert_eq!((india.min_score, india.max_score), (300, 900));
    }

    #[test]
    fn test_normalize_score() {
        let usa = CountryProfile::usa();
        assert_eq!(usa.normalize_score(300).unwrap(), 0.0);
        assert_eq!(usa.normalize_score(850).unwrap(), 1.0);
        assert_abs_diff_eq!(usa.normalize_score(575).unwrap(), 0.5, epsilon = 1e-12);

        assert!(matches!(usa.normalize_score(851), Err(PricingError::InvalidApplicant(_))));
        assert!(matches!(usa.normalize_score(299), Err(PricingError::InvalidApplicant(_))));

        // CIBIL allows scores FICO does not
        assert!(CountryProfile::india().normalize_score(880).is_ok());
    }

    #[test]
    fn test_missing_profile() {
        let mut config = PricingConfig::default();
        config.countries.remove(&Country::India);
        assert!(matches!(config.profile(Country::India), Err(PricingError::Configuration(_))));
    }

    #[test]
    fn test_validate_rejects_bad_config() {
        let mut config = PricingConfig::default();
        config.min_rate = 0.5;
        assert!(matches!(config.validate(), Err(PricingError::Configuration(_))));

        let mut config = PricingConfig::default();
        config.loss_given_default = 1.5;
        assert!(config.validate().is_err());

        let mut config = PricingConfig::default();
        config.weights.risk = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = PricingConfig::default();
        config.countries.get_mut(&Country::Usa).unwrap().good_score = 800;
        assert!(config.validate().is_err());

        let mut config = PricingConfig::default();
        config.countries.get_mut(&Country::India).unwrap().max_score = 300;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_partial_override() {
        let config = PricingConfig::from_json_str(r#"{ "loss_given_default": 1.0, "weights": { "risk": 0.5 } }"#)
            .expect("valid config");
        assert_eq!(config.loss_given_default, 1.0);
        assert_eq!(config.weights.risk, 0.5);
        assert_eq!(config.weights.market, 0.3);
        assert_eq!(config.countries.len(), 2);
        assert_eq!(config.max_rate, 0.36);
    }

    #[test]
    fn test_json_country_profiles_round_trip() {
        let json = serde_json::to_string(&PricingConfig::default()).unwrap();
        assert!(json.contains("\"USA\""));
        assert!(json.contains("\"India\""));
        let parsed = PricingConfig::from_json_str(&json).unwrap();
        assert_eq!(parsed.countries.len(), 2);
        assert_abs_diff_eq!(parsed.profile(Country::Usa).unwrap().base_rate, 0.12, epsilon = 1e-12);
        assert_eq!(parsed.profile(Country::India).unwrap().excellent_score, 800);
    }

    #[test]
    fn test_json_invalid_config_is_configuration_error() {
        let err = PricingConfig::from_json_str(r#"{ "min_rate": 0.4, "max_rate": 0.1 }"#).unwrap_err();
        let pricing = err.downcast_ref::<PricingError>().expect("pricing error");
        assert!(matches!(pricing, PricingError::Configuration(_)));
    }
}
