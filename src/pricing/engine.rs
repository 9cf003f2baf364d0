//! Pricing decision engine

use super::adjustments::{self, LoanSizeTier, MarketTier};
use super::config::{CountryProfile, PricingConfig};
use super::decision::{AggregateStats, RateDecision, Reason};
use super::history::{DecisionHistory, HistoryEntry};
use crate::applicant::{ApplicantRecord, Country};
use crate::error::{PricingError, PricingResult};
use crate::estimator::{DefaultEstimator, FeatureSet, HeuristicEstimator};
use chrono::Utc;
use rayon::prelude::*;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Risk adjustment below which the profile is called low risk
const LOW_RISK_THRESHOLD: f64 = -0.01;

/// Risk adjustment above which the profile is called high risk
const HIGH_RISK_THRESHOLD: f64 = 0.05;

/// DTI at or above which the debt load is called out
const HIGH_DTI_THRESHOLD: f64 = 0.40;

/// LTI at or above which the loan size is called out
const HIGH_LTI_THRESHOLD: f64 = 0.50;

/// Turns applicant records into rate decisions and keeps a history of them.
///
/// The engine is `Send + Sync`. History appends are serialized behind a
/// write lock so statistics never observe a partially recorded decision.
pub struct PricingEngine {
    config: PricingConfig,
    estimator: Box<dyn DefaultEstimator>,
    history: RwLock<DecisionHistory>,
}

impl PricingEngine {
    /// Create an engine with the reference heuristic estimator
    pub fn new(config: PricingConfig) -> PricingResult<Self> {
        Self::with_estimator(config, HeuristicEstimator::default())
    }

    /// Create an engine with a custom default-probability estimator
    pub fn with_estimator<E>(config: PricingConfig, estimator: E) -> PricingResult<Self>
    where
        E: DefaultEstimator + 'static,
    {
        config.validate()?;
        Ok(Self {
            config,
            estimator: Box::new(estimator),
            history: RwLock::new(DecisionHistory::new()),
        })
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    pub fn estimator_name(&self) -> &str {
        self.estimator.name()
    }

    /// Price an applicant without recording the decision
    pub fn quote(&self, applicant: &ApplicantRecord) -> PricingResult<RateDecision> {
        applicant.validate()?;
        let profile = self.config.profile(applicant.country)?;
        let normalized_score = profile.normalize_score(applicant.credit_score)?;

        let features = FeatureSet::from_applicant(applicant, normalized_score);
        let default_probability = self.estimate(&features)?;

        let base_rate = profile.base_rate;
        let risk_adjustment = adjustments::risk_adjustment(
            normalized_score,
            features.debt_to_income,
            features.loan_to_income,
            &self.config,
        );
        let market_tier = MarketTier::for_score(applicant.credit_score, profile);
        let loan_tier = LoanSizeTier::for_amount(applicant.loan_amount, profile);
        let market_adjustment = market_tier.adjustment();
        let profit_adjustment = loan_tier.adjustment();

        log::debug!(
            "{} score={} dti={:.4} lti={:.4}: risk={:+.4} market={:+.4} profit={:+.4}",
            applicant.country,
            applicant.credit_score,
            features.debt_to_income,
            features.loan_to_income,
            risk_adjustment,
            market_adjustment,
            profit_adjustment,
        );

        let total_adjustment =
            adjustments::total_adjustment(risk_adjustment, market_adjustment, profit_adjustment, &self.config);
        let final_rate = adjustments::clamp_rate(base_rate + total_adjustment, &self.config);

        let expected_profit = adjustments::expected_profit(
            applicant.loan_amount,
            final_rate,
            default_probability,
            self.config.loss_given_default,
        );

        let reasoning = build_reasoning(applicant, profile, &features, risk_adjustment, market_tier, loan_tier);

        Ok(RateDecision {
            applicant_id: applicant.id.clone(),
            country: applicant.country,
            credit_score: applicant.credit_score,
            loan_amount: applicant.loan_amount,
            decided_at: Utc::now(),
            estimator: self.estimator.name().to_string(),
            base_rate,
            risk_adjustment,
            market_adjustment,
            profit_adjustment,
            total_adjustment,
            final_rate,
            default_probability,
            expected_profit,
            reasoning,
        })
    }

    /// Price an applicant and append the decision to the history.
    ///
    /// Nothing is recorded when pricing fails.
    pub fn calculate_rate(&self, applicant: &ApplicantRecord) -> PricingResult<RateDecision> {
        let mut decision = self.quote(applicant).map_err(|e| {
            log::warn!("rejected {} applicant: {}", applicant.country, e);
            e
        })?;

        let mut history = self.write_history();
        assign_id(&mut decision, history.len());
        history.push(applicant.clone(), decision.clone());

        log::info!(
            "{} priced at {:.2}% (pd {:.1}%, expected profit {:.2})",
            decision.applicant_id.as_deref().unwrap_or("-"),
            decision.final_rate * 100.0,
            decision.default_probability * 100.0,
            decision.expected_profit,
        );

        Ok(decision)
    }

    /// Price a batch in parallel, then record successes in input order.
    ///
    /// Results line up with `applicants`; failures are returned in place and
    /// not recorded.
    pub fn calculate_batch(&self, applicants: &[ApplicantRecord]) -> Vec<PricingResult<RateDecision>> {
        let mut results: Vec<PricingResult<RateDecision>> =
            applicants.par_iter().map(|applicant| self.quote(applicant)).collect();

        let mut history = self.write_history();
        for (applicant, result) in applicants.iter().zip(results.iter_mut()) {
            match result {
                Ok(decision) => {
                    assign_id(decision, history.len());
                    history.push(applicant.clone(), decision.clone());
                }
                Err(e) => log::warn!("rejected {} applicant: {}", applicant.country, e),
            }
        }

        log::info!(
            "batch of {} priced, {} recorded",
            applicants.len(),
            results.iter().filter(|r| r.is_ok()).count()
        );

        results
    }

    /// Statistics over the full decision history
    pub fn get_statistics(&self) -> AggregateStats {
        self.read_history().statistics()
    }

    /// Statistics over the most recent `window` decisions
    pub fn recent_statistics(&self, window: usize) -> AggregateStats {
        self.read_history().recent_statistics(window)
    }

    /// Statistics for one country
    pub fn statistics_for(&self, country: Country) -> AggregateStats {
        self.read_history().statistics_for(country)
    }

    pub fn history_len(&self) -> usize {
        self.read_history().len()
    }

    /// Snapshot of the recorded decisions
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.read_history().entries().to_vec()
    }

    fn estimate(&self, features: &FeatureSet) -> PricingResult<f64> {
        let p = self
            .estimator
            .estimate_default_probability(features)
            .map_err(|e| PricingError::Estimation(format!("{}: {}", self.estimator.name(), e)))?;

        if !(0.0..=1.0).contains(&p) {
            return Err(PricingError::Estimation(format!(
                "{} returned probability {} outside [0, 1]",
                self.estimator.name(),
                p
            )));
        }
        Ok(p)
    }

    // A push is a single Vec append, so a poisoned lock still holds whole entries
    fn read_history(&self) -> RwLockReadGuard<'_, DecisionHistory> {
        self.history.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_history(&self) -> RwLockWriteGuard<'_, DecisionHistory> {
        self.history.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for PricingEngine {
    fn default() -> Self {
        Self {
            config: PricingConfig::default(),
            estimator: Box::new(HeuristicEstimator::default()),
            history: RwLock::new(DecisionHistory::new()),
        }
    }
}

impl std::fmt::Debug for PricingEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PricingEngine")
            .field("config", &self.config)
            .field("estimator", &self.estimator.name())
            .field("decisions", &self.history_len())
            .finish()
    }
}

/// Give anonymous applicants a sequential id like `USA_3`
fn assign_id(decision: &mut RateDecision, recorded: usize) {
    if decision.applicant_id.is_none() {
        decision.applicant_id = Some(format!("{}_{}", decision.country.id_prefix(), recorded + 1));
    }
}

/// Explanation in formula order: risk signals, then market, then profit
fn build_reasoning(
    applicant: &ApplicantRecord,
    profile: &CountryProfile,
    features: &FeatureSet,
    risk_adjustment: f64,
    market_tier: MarketTier,
    loan_tier: LoanSizeTier,
) -> Vec<Reason> {
    let scale = applicant.country.score_scale().to_string();
    let mut reasons = Vec::new();

    if risk_adjustment < LOW_RISK_THRESHOLD {
        reasons.push(Reason::LowRiskProfile);
    } else if risk_adjustment > HIGH_RISK_THRESHOLD {
        reasons.push(Reason::HighRiskProfile);
    } else {
        reasons.push(Reason::StandardRisk);
    }

    if applicant.credit_score < profile.below_average_score {
        reasons.push(Reason::BelowAverageScore {
            scale: scale.clone(),
            threshold: profile.below_average_score,
        });
    }
    if features.debt_to_income >= HIGH_DTI_THRESHOLD {
        reasons.push(Reason::HighDebtToIncome { ratio: features.debt_to_income });
    }
    if features.loan_to_income >= HIGH_LTI_THRESHOLD {
        reasons.push(Reason::HighLoanToIncome { ratio: features.loan_to_income });
    }

    match market_tier {
        MarketTier::Excellent => reasons.push(Reason::ExcellentCredit {
            scale,
            threshold: profile.excellent_score,
        }),
        MarketTier::Good => reasons.push(Reason::GoodCredit {
            scale,
            threshold: profile.good_score,
        }),
        MarketTier::Standard => {}
    }

    match loan_tier {
        LoanSizeTier::Large => reasons.push(Reason::LargeLoanDiscount),
        LoanSizeTier::Medium => reasons.push(Reason::MediumLoanDiscount),
        LoanSizeTier::Small => {}
    }

    reasons
}
