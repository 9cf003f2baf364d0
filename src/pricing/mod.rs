//! Interest-rate pricing: configuration, adjustment components and the decision engine

pub mod adjustments;
mod config;
mod decision;
mod engine;
mod history;

pub use config::{AdjustmentWeights, CountryProfile, PricingConfig, RiskWeights};
pub use decision::{AggregateStats, RateDecision, Reason, ReasonStage};
pub use engine::PricingEngine;
pub use history::{DecisionHistory, HistoryEntry};
