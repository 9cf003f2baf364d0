//! Applicant data structures for pricing requests

use crate::error::{PricingError, PricingResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lending market the applicant applies in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Country {
    /// United States, scored on FICO (300-850), priced in USD
    #[serde(rename = "USA")]
    Usa,
    /// India, scored on CIBIL (300-900), priced in INR
    India,
}

impl Country {
    pub const ALL: [Country; 2] = [Country::Usa, Country::India];

    /// Name of the credit bureau score used in this market
    pub fn score_scale(&self) -> &'static str {
        match self {
            Country::Usa => "FICO",
            Country::India => "CIBIL",
        }
    }

    /// Currency symbol for display
    pub fn currency_symbol(&self) -> &'static str {
        match self {
            Country::Usa => "$",
            Country::India => "₹",
        }
    }

    /// Short prefix used when generating applicant ids
    pub fn id_prefix(&self) -> &'static str {
        match self {
            Country::Usa => "USA",
            Country::India => "IND",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Country::Usa => "USA",
            Country::India => "India",
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Country {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USA" | "US" => Ok(Country::Usa),
            "INDIA" | "IND" | "IN" => Ok(Country::India),
            _ => Err(PricingError::Configuration(format!(
                "unsupported country: {}",
                s.trim()
            ))),
        }
    }
}

/// A single credit application to be priced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantRecord {
    /// Caller-supplied identifier, if any
    #[serde(default)]
    pub id: Option<String>,

    pub country: Country,

    /// Bureau score on the country's scale (FICO or CIBIL)
    pub credit_score: u32,

    /// Annual income in the country's currency
    pub income: f64,

    /// Requested principal, same currency as income
    pub loan_amount: f64,

    /// Outstanding debt obligations
    pub existing_debt: f64,

    /// Years at current employer
    pub employment_years: f64,
}

impl ApplicantRecord {
    pub fn new(
        country: Country,
        credit_score: u32,
        income: f64,
        loan_amount: f64,
        existing_debt: f64,
        employment_years: f64,
    ) -> Self {
        Self {
            id: None,
            country,
            credit_score,
            income,
            loan_amount,
            existing_debt,
            employment_years,
        }
    }

    /// Attach an identifier
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// existing_debt / income
    pub fn debt_to_income(&self) -> f64 {
        self.existing_debt / self.income
    }

    /// loan_amount / income
    pub fn loan_to_income(&self) -> f64 {
        self.loan_amount / self.income
    }

    /// Check the monetary and tenure fields.
    ///
    /// Score range depends on the country profile and is checked by the
    /// pricing configuration, not here.
    pub fn validate(&self) -> PricingResult<()> {
        if !self.income.is_finite() || self.income <= 0.0 {
            return Err(PricingError::InvalidApplicant(format!(
                "income must be positive, got {}",
                self.income
            )));
        }
        if !self.loan_amount.is_finite() || self.loan_amount <= 0.0 {
            return Err(PricingError::InvalidApplicant(format!(
                "loan amount must be positive, got {}",
                self.loan_amount
            )));
        }
        if !self.existing_debt.is_finite() || self.existing_debt < 0.0 {
            return Err(PricingError::InvalidApplicant(format!(
                "existing debt must be non-negative, got {}",
                self.existing_debt
            )));
        }
        if !self.employment_years.is_finite() || self.employment_years < 0.0 {
            return Err(PricingError::InvalidApplicant(format!(
                "employment years must be non-negative, got {}",
                self.employment_years
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn applicant() -> ApplicantRecord {
        ApplicantRecord::new(Country::Usa, 720, 85_000.0, 15_000.0, 12_000.0, 5.0)
    }

    #[test]
    fn test_country_parsing() {
        assert_eq!("USA".parse::<Country>().unwrap(), Country::Usa);
        assert_eq!("us".parse::<Country>().unwrap(), Country::Usa);
        assert_eq!("India".parse::<Country>().unwrap(), Country::India);
        assert_eq!(" ind ".parse::<Country>().unwrap(), Country::India);

        let err = "Canada".parse::<Country>().unwrap_err();
        assert!(matches!(err, PricingError::Configuration(_)));
    }

    #[test]
    fn test_country_serde_names() {
        assert_eq!(serde_json::to_string(&Country::Usa).unwrap(), "\"USA\"");
        assert_eq!(serde_json::to_string(&Country::India).unwrap(), "\"India\"");
    }

    #[test]
    fn test_ratios() {
        let a = applicant();
        assert!((a.debt_to_income() - 12_000.0 / 85_000.0).abs() < 1e-12);
        assert!((a.loan_to_income() - 15_000.0 / 85_000.0).abs() < 1e-12);
    }

    #[test]
    fn test_validate() {
        assert!(applicant().validate().is_ok());

        let mut a = applicant();
        a.income = 0.0;
        assert!(matches!(a.validate(), Err(PricingError::InvalidApplicant(_))));

        let mut a = applicant();
        a.loan_amount = -1.0;
        assert!(matches!(a.validate(), Err(PricingError::InvalidApplicant(_))));

        let mut a = applicant();
        a.existing_debt = f64::NAN;
        assert!(matches!(a.validate(), Err(PricingError::InvalidApplicant(_))));

        let mut a = applicant();
        a.employment_years = -0.5;
        assert!(matches!(a.validate(), Err(PricingError::InvalidApplicant(_))));

        // Zero debt and zero tenure are allowed
        let mut a = applicant();
        a.existing_debt = 0.0;
        a.employment_years = 0.0;
        assert!(a.validate().is_ok());
    }
}
