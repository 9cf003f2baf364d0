//! Rate decision output structures

use crate::applicant::Country;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stage of the pricing formula a reason belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReasonStage {
    Risk,
    Market,
    Profit,
}

/// A signal that materially influenced a decision.
///
/// Variants and their display text are stable; callers can match on the
/// variant or use [`Reason::code`] instead of parsing prose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum Reason {
    /// Risk adjustment well below zero
    LowRiskProfile,
    /// Risk adjustment near the top of its range
    HighRiskProfile,
    StandardRisk,
    BelowAverageScore { scale: String, threshold: u32 },
    HighDebtToIncome { ratio: f64 },
    HighLoanToIncome { ratio: f64 },
    ExcellentCredit { scale: String, threshold: u32 },
    GoodCredit { scale: String, threshold: u32 },
    LargeLoanDiscount,
    MediumLoanDiscount,
}

impl Reason {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            Reason::LowRiskProfile => "low_risk_profile",
            Reason::HighRiskProfile => "high_risk_profile",
            Reason::StandardRisk => "standard_risk",
            Reason::BelowAverageScore { .. } => "below_average_score",
            Reason::HighDebtToIncome { .. } => "high_debt_to_income",
            Reason::HighLoanToIncome { .. } => "high_loan_to_income",
            Reason::ExcellentCredit { .. } => "excellent_credit",
            Reason::GoodCredit { .. } => "good_credit",
            Reason::LargeLoanDiscount => "large_loan_discount",
            Reason::MediumLoanDiscount => "medium_loan_discount",
        }
    }

    pub fn stage(&self) -> ReasonStage {
        match self {
            Reason::LowRiskProfile
            | Reason::HighRiskProfile
            | Reason::StandardRisk
            | Reason::BelowAverageScore { .. }
            | Reason::HighDebtToIncome { .. }
            | Reason::HighLoanToIncome { .. } => ReasonStage::Risk,
            Reason::ExcellentCredit { .. } | Reason::GoodCredit { .. } => ReasonStage::Market,
            Reason::LargeLoanDiscount | Reason::MediumLoanDiscount => ReasonStage::Profit,
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::LowRiskProfile => write!(f, "Excellent credit profile - reduced risk premium"),
            Reason::HighRiskProfile => write!(f, "Higher risk profile - increased rate for protection"),
            Reason::StandardRisk => write!(f, "Standard risk assessment"),
            Reason::BelowAverageScore { scale, threshold } => {
                write!(f, "Below-average {} score (under {})", scale, threshold)
            }
            Reason::HighDebtToIncome { ratio } => {
                write!(f, "High debt-to-income ratio ({:.0}%)", ratio * 100.0)
            }
            Reason::HighLoanToIncome { ratio } => {
                write!(f, "Large loan relative to income ({:.0}% of income)", ratio * 100.0)
            }
            Reason::ExcellentCredit { scale, threshold } => write!(
                f,
                "Excellent {} score ({}+) - competitive rate to win quality applicant",
                scale, threshold
            ),
            Reason::GoodCredit { scale, threshold } => {
                write!(f, "Good {} score ({}+) - competitive rate", scale, threshold)
            }
            Reason::LargeLoanDiscount => write!(f, "Volume discount for larger loan amount"),
            Reason::MediumLoanDiscount => write!(f, "Partial volume discount for mid-size loan amount"),
        }
    }
}

/// Complete pricing decision for one applicant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateDecision {
    pub applicant_id: Option<String>,
    pub country: Country,
    pub credit_score: u32,
    pub loan_amount: f64,
    pub decided_at: DateTime<Utc>,

    /// Name of the default-probability model used
    pub estimator: String,

    // Rate components
    pub base_rate: f64,
    pub risk_adjustment: f64,
    pub market_adjustment: f64,
    pub profit_adjustment: f64,

    /// Weighted sum of adjustments before the floor/ceiling is applied
    pub total_adjustment: f64,
    pub final_rate: f64,

    // Financial metrics
    pub default_probability: f64,
    pub expected_profit: f64,

    /// Signals in the order they were applied (risk, market, profit)
    pub reasoning: Vec<Reason>,
}

impl RateDecision {
    /// Reasoning rendered as display strings
    pub fn reasoning_text(&self) -> Vec<String> {
        self.reasoning.iter().map(|r| r.to_string()).collect()
    }

    /// True if any reason carries the given code
    pub fn has_reason(&self, code: &str) -> bool {
        self.reasoning.iter().any(|r| r.code() == code)
    }

    /// True when the floor or ceiling changed the blended rate
    pub fn was_clamped(&self) -> bool {
        (self.base_rate + self.total_adjustment - self.final_rate).abs() > 1e-12
    }
}

/// Aggregate statistics over a set of decisions.
///
/// All averages are 0 when there are no decisions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub total_decisions: usize,
    pub avg_risk_adjustment: f64,
    pub avg_total_adjustment: f64,
    pub avg_final_rate: f64,
    pub total_expected_profit: f64,
    pub avg_default_probability: f64,
}

impl AggregateStats {
    pub fn from_decisions<'a, I>(decisions: I) -> Self
    where
        I: IntoIterator<Item = &'a RateDecision>,
    {
        let mut stats = AggregateStats::default();
        let mut sum_risk = 0.0;
        let mut sum_total = 0.0;
        let mut sum_rate = 0.0;
        let mut sum_pd = 0.0;

        for d in decisions {
            stats.total_decisions += 1;
            sum_risk += d.risk_adjustment;
            sum_total += d.total_adjustment;
            sum_rate += d.final_rate;
            sum_pd += d.default_probability;
            stats.total_expected_profit += d.expected_profit;
        }

        if stats.total_decisions > 0 {
            let n = stats.total_decisions as f64;
            stats.avg_risk_adjustment = sum_risk / n;
            stats.avg_total_adjustment = sum_total / n;
            stats.avg_final_rate = sum_rate / n;
            stats.avg_default_probability = sum_pd / n;
        }

        stats
    }
}
