//! Append-only decision history

use super::decision::{AggregateStats, RateDecision};
use crate::applicant::{ApplicantRecord, Country};
use serde::{Deserialize, Serialize};

/// One recorded pricing decision together with the applicant that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub applicant: ApplicantRecord,
    pub decision: RateDecision,
}

/// Ordered log of past decisions.
///
/// Entries are only ever appended; nothing is edited or removed for the
/// lifetime of the owning engine.
#[derive(Debug, Clone, Default)]
pub struct DecisionHistory {
    entries: Vec<HistoryEntry>,
}

impl DecisionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, applicant: ApplicantRecord, decision: RateDecision) {
        self.entries.push(HistoryEntry { applicant, decision });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Statistics over every recorded decision
    pub fn statistics(&self) -> AggregateStats {
        AggregateStats::from_decisions(self.entries.iter().map(|e| &e.decision))
    }

    /// Statistics over the most recent `window` decisions
    pub fn recent_statistics(&self, window: usize) -> AggregateStats {
        let start = self.entries.len().saturating_sub(window);
        AggregateStats::from_decisions(self.entries[start..].iter().map(|e| &e.decision))
    }

    /// Statistics restricted to one country
    pub fn statistics_for(&self, country: Country) -> AggregateStats {
        AggregateStats::from_decisions(
            self.entries
                .iter()
                .filter(|e| e.applicant.country == country)
                .map(|e| &e.decision),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::decision::Reason;
    use approx::assert_abs_diff_eq;
    use chrono::Utc;

    fn entry(country: Country, final_rate: f64) -> (ApplicantRecord, RateDecision) {
        let applicant = ApplicantRecord::new(country, 700, 50_000.0, 10_000.0, 0.0, 2.0);
        let decision = RateDecision {
            applicant_id: None,
            country,
            credit_score: 700,
            loan_amount: 10_000.0,
            decided_at: Utc::now(),
            estimator: "test".to_string(),
            base_rate: 0.12,
            risk_adjustment: 0.0,
            market_adjustment: 0.0,
            profit_adjustment: 0.0,
            total_adjustment: 0.0,
            final_rate,
            default_probability: 0.1,
            expected_profit: 100.0,
            reasoning: vec![Reason::StandardRisk],
        };
        (applicant, decision)
    }

    #[test]
    fn test_history_append_order() {
        let mut history = DecisionHistory::new();
        assert!(history.is_empty());

        for rate in [0.10, 0.11, 0.12] {
            let (a, d) = entry(Country::Usa, rate);
            history.push(a, d);
        }

        assert_eq!(history.len(), 3);
        let rates: Vec<f64> = history.entries().iter().map(|e| e.decision.final_rate).collect();
        assert_eq!(rates, vec![0.10, 0.11, 0.12]);
    }

    #[test]
    fn test_recent_and_country_statistics() {
        let mut history = DecisionHistory::new();
        for (country, rate) in [
            (Country::Usa, 0.10),
            (Country::India, 0.20),
            (Country::Usa, 0.12),
            (Country::India, 0.22),
        ] {
            let (a, d) = entry(country, rate);
            history.push(a, d);
        }

        let all = history.statistics();
        assert_eq!(all.total_decisions, 4);
        assert_abs_diff_eq!(all.avg_final_rate, 0.16, epsilon = 1e-12);
        assert_abs_diff_eq!(all.total_expected_profit, 400.0, epsilon = 1e-9);

        let recent = history.recent_statistics(2);
        assert_eq!(recent.total_decisions, 2);
        assert_abs_diff_eq!(recent.avg_final_rate, 0.17, epsilon = 1e-12);

        // Window larger than history covers everything
        assert_eq!(history.recent_statistics(100).total_decisions, 4);

        let india = history.statistics_for(Country::India);
        assert_eq!(india.total_decisions, 2);
        assert_abs_diff_eq!(india.avg_final_rate, 0.21, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_history_statistics() {
        let history = DecisionHistory::new();
        assert_eq!(history.statistics(), AggregateStats::default());
        assert_eq!(history.recent_statistics(10).total_decisions, 0);
        assert_eq!(history.statistics_for(Country::Usa).avg_final_rate, 0.0);
    }
}
