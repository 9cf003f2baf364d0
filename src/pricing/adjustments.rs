//! Rate adjustment components
//!
//! Each function here is a pure contribution to the final rate:
//! - Risk: weighted blend of credit score, debt-to-income and loan-to-income
//! - Market: step function on credit score tier
//! - Profit: step function on loan size
//!
//! The engine combines them as
//! `base + risk * w_risk + market * w_market + profit * w_profit`,
//! then clamps to the configured floor and ceiling.

use super::config::{CountryProfile, PricingConfig, RiskWeights};

/// DTI at which the debt component saturates
pub const DTI_SATURATION: f64 = 1.25;

/// LTI at which the loan component saturates
pub const LTI_SATURATION: f64 = 1.0;

/// Market adjustment for the excellent credit tier
pub const EXCELLENT_TIER_ADJUSTMENT: f64 = -0.02;

/// Market adjustment for the good credit tier
pub const GOOD_TIER_ADJUSTMENT: f64 = -0.01;

/// Profit adjustment for large loans
pub const LARGE_LOAN_ADJUSTMENT: f64 = -0.005;

/// Profit adjustment for medium loans
pub const MEDIUM_LOAN_ADJUSTMENT: f64 = -0.0025;

/// Debt component of the risk score, in [0, 1].
///
/// Quadratic in DTI so it climbs slowly for modest debt and steeply as DTI
/// approaches and passes 1.0, saturating at [`DTI_SATURATION`].
pub fn debt_component(debt_to_income: f64) -> f64 {
    (debt_to_income.max(0.0) / DTI_SATURATION).min(1.0).powi(2)
}

/// Loan component of the risk score, in [0, 1]
pub fn loan_component(loan_to_income: f64) -> f64 {
    (loan_to_income.max(0.0) / LTI_SATURATION).min(1.0)
}

/// Risk score: 0 = lowest risk, 1 = highest (with weights summing to 1)
pub fn risk_score(normalized_score: f64, debt_to_income: f64, loan_to_income: f64, weights: &RiskWeights) -> f64 {
    (1.0 - normalized_score) * weights.credit_score
        + debt_component(debt_to_income) * weights.debt_to_income
        + loan_component(loan_to_income) * weights.loan_to_income
}

/// Map the risk score linearly onto the configured adjustment range
pub fn risk_adjustment(normalized_score: f64, debt_to_income: f64, loan_to_income: f64, config: &PricingConfig) -> f64 {
    let score = risk_score(normalized_score, debt_to_income, loan_to_income, &config.risk_weights);
    let span = config.max_risk_adjustment - config.min_risk_adjustment;

    (config.min_risk_adjustment + score * span).clamp(config.min_risk_adjustment, config.max_risk_adjustment)
}

/// Competitive tier derived from credit score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketTier {
    Excellent,
    Good,
    Standard,
}

impl MarketTier {
    /// First matching tier wins; tiers never stack
    pub fn for_score(score: u32, profile: &CountryProfile) -> Self {
        if score >= profile.excellent_score {
            MarketTier::Excellent
        } else if score >= profile.good_score {
            MarketTier::Good
        } else {
            MarketTier::Standard
        }
    }

    pub fn adjustment(&self) -> f64 {
        match self {
            MarketTier::Excellent => EXCELLENT_TIER_ADJUSTMENT,
            MarketTier::Good => GOOD_TIER_ADJUSTMENT,
            MarketTier::Standard => 0.0,
        }
    }
}

/// Loan-size tier used for the volume discount
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanSizeTier {
    Large,
    Medium,
    Small,
}

impl LoanSizeTier {
    pub fn for_amount(loan_amount: f64, profile: &CountryProfile) -> Self {
        if loan_amount >= profile.large_loan {
            LoanSizeTier::Large
        } else if loan_amount >= profile.medium_loan {
            LoanSizeTier::Medium
        } else {
            LoanSizeTier::Small
        }
    }

    pub fn adjustment(&self) -> f64 {
        match self {
            LoanSizeTier::Large => LARGE_LOAN_ADJUSTMENT,
            LoanSizeTier::Medium => MEDIUM_LOAN_ADJUSTMENT,
            LoanSizeTier::Small => 0.0,
        }
    }
}

/// Weighted sum of the three adjustments
pub fn total_adjustment(risk: f64, market: f64, profit: f64, config: &PricingConfig) -> f64 {
    risk * config.weights.risk + market * config.weights.market + profit * config.weights.profit
}

/// Apply the floor and ceiling. Always the last step.
pub fn clamp_rate(rate: f64, config: &PricingConfig) -> f64 {
    rate.clamp(config.min_rate, config.max_rate)
}

/// Expected annual profit over the repay/default outcomes:
/// `L * r * (1 - p) - L * LGD * p`
pub fn expected_profit(loan_amount: f64, rate: f64, default_probability: f64, loss_given_default: f64) -> f64 {
    let interest_income = loan_amount * rate;
    let loss_if_default = loan_amount * loss_given_default;

    interest_income * (1.0 - default_probability) - loss_if_default * default_probability
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_debt_component_is_convex() {
        assert_eq!(debt_component(0.0), 0.0);
        assert_abs_diff_eq!(debt_component(0.625), 0.25, epsilon = 1e-12);
        assert_eq!(debt_component(1.25), 1.0);
        assert_eq!(debt_component(3.0), 1.0);

        // Each 0.25 step in DTI adds more than the previous one
        let step_low = debt_component(0.5) - debt_component(0.25);
        let step_high = debt_component(1.0) - debt_component(0.75);
        assert!(step_high > step_low);
    }

    #[test]
    fn test_risk_adjustment_bounds() {
        let config = PricingConfig::default();

        // Best possible applicant sits at the bottom of the range
        assert_abs_diff_eq!(risk_adjustment(1.0, 0.0, 0.0, &config), -0.03, epsilon = 1e-12);

        // Worst possible applicant sits at the top
        assert_abs_diff_eq!(risk_adjustment(0.0, 5.0, 5.0, &config), 0.08, epsilon = 1e-12);

        // Midpoint: score 0.5 * 0.5 + 0 + 0.2 * 0.5 = 0.35
        assert_abs_diff_eq!(risk_adjustment(0.5, 0.0, 0.5, &config), -0.03 + 0.35 * 0.11, epsilon = 1e-12);
    }

    #[test]
    fn test_risk_adjustment_clamped_with_heavy_weights() {
        let mut config = PricingConfig::default();
        config.risk_weights.credit_score = 3.0;
        assert_eq!(risk_adjustment(0.0, 0.0, 0.0, &config), 0.08);

        config.risk_weights.credit_score = -3.0;
        assert_eq!(risk_adjustment(0.0, 0.0, 0.0, &config), -0.03);
    }

    #[test]
    fn test_risk_adjustment_non_increasing_in_score() {
        let config = PricingConfig::default();
        let mut previous = f64::INFINITY;
        for step in 0..=100 {
            let n = step as f64 / 100.0;
            let adj = risk_adjustment(n, 0.4, 0.3, &config);
            assert!(adj <= previous);
            previous = adj;
        }
    }

    #[test]
    fn test_market_tiers() {
        let usa = CountryProfile::usa();
        assert_eq!(MarketTier::for_score(850, &usa), MarketTier::Excellent);
        assert_eq!(MarketTier::for_score(750, &usa), MarketTier::Excellent);
        assert_eq!(MarketTier::for_score(749, &usa), MarketTier::Good);
        assert_eq!(MarketTier::for_score(700, &usa), MarketTier::Good);
        assert_eq!(MarketTier::for_score(699, &usa), MarketTier::Standard);

        let india = CountryProfile::india();
        assert_eq!(MarketTier::for_score(780, &india), MarketTier::Good);
        assert_eq!(MarketTier::for_score(800, &india), MarketTier::Excellent);
        assert_eq!(MarketTier::for_score(700, &india), MarketTier::Standard);

        assert_eq!(MarketTier::Excellent.adjustment(), -0.02);
        assert_eq!(MarketTier::Good.adjustment(), -0.01);
        assert_eq!(MarketTier::Standard.adjustment(), 0.0);
    }

    #[test]
    fn test_loan_size_tiers() {
        let usa = CountryProfile::usa();
        assert_eq!(LoanSizeTier::for_amount(25_000.0, &usa), LoanSizeTier::Large);
        assert_eq!(LoanSizeTier::for_amount(20_000.0, &usa), LoanSizeTier::Large);
        assert_eq!(LoanSizeTier::for_amount(15_000.0, &usa), LoanSizeTier::Medium);
        assert_eq!(LoanSizeTier::for_amount(9_999.0, &usa), LoanSizeTier::Small);

        let india = CountryProfile::india();
        assert_eq!(LoanSizeTier::for_amount(300_000.0, &india), LoanSizeTier::Small);
        assert_eq!(LoanSizeTier::for_amount(800_000.0, &india), LoanSizeTier::Medium);
        assert_eq!(LoanSizeTier::for_amount(2_000_000.0, &india), LoanSizeTier::Large);

        assert_eq!(LoanSizeTier::Large.adjustment(), -0.005);
        assert_eq!(LoanSizeTier::Medium.adjustment(), -0.0025);
        assert_eq!(LoanSizeTier::Small.adjustment(), 0.0);
    }

    #[test]
    fn test_total_and_clamp() {
        let config = PricingConfig::default();
        let total = total_adjustment(0.05, -0.02, -0.005, &config);
        assert_abs_diff_eq!(total, 0.03 - 0.006 - 0.0005, epsilon = 1e-12);

        assert_eq!(clamp_rate(0.05, &config), 0.08);
        assert_eq!(clamp_rate(0.50, &config), 0.36);
        assert_eq!(clamp_rate(0.15, &config), 0.15);
    }

    #[test]
    fn test_expected_profit() {
        // No default risk: pure interest income
        assert_abs_diff_eq!(expected_profit(10_000.0, 0.12, 0.0, 0.4), 1_200.0, epsilon = 1e-9);

        // 10% default, 40% LGD: 1200 * 0.9 - 4000 * 0.1
        assert_abs_diff_eq!(expected_profit(10_000.0, 0.12, 0.1, 0.4), 680.0, epsilon = 1e-9);

        // Full principal loss
        assert_abs_diff_eq!(expected_profit(10_000.0, 0.12, 0.1, 1.0), 80.0, epsilon = 1e-9);
    }
}
