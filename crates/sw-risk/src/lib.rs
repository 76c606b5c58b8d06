//! Peg risk scoring for Stablewatch.
//!
//! Provides:
//! - Risk assessment of a seven-day peg series (delta, score, volatility)
//! - A provider-backed estimator that produces a fresh series per call
//! - The catalogue of hypothetical de-peg scenarios

pub mod metrics;
pub mod scenarios;

pub use metrics::{PegRiskEstimator, RiskAssessment, RiskMetricsCalculator, ScoringPolicy};
pub use scenarios::{Scenario, RISK_DELTA_MAX, RISK_DELTA_MIN};
