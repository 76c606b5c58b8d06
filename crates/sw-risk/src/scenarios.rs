//! Hypothetical de-peg scenarios and their expected effect on the risk score.

use serde::{Deserialize, Serialize};

use sw_types::{ScenarioError, SwResult};

/// Lowest accepted risk score change for a custom scenario.
pub const RISK_DELTA_MIN: i32 = -50;
/// Highest accepted risk score change for a custom scenario.
pub const RISK_DELTA_MAX: i32 = 50;

/// An event, its expected market impact and the score change it implies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub event: String,
    pub expected_impact: String,
    /// Score points gained (positive) or lost (negative).
    pub risk_delta: i32,
}

impl Scenario {
    /// Build a user-defined scenario.
    pub fn custom(event: &str, expected_impact: &str, risk_delta: i32) -> SwResult<Self> {
        let event = event.trim();
        if event.is_empty() {
            return Err(ScenarioError::EmptyEvent.into());
        }
        if !(RISK_DELTA_MIN..=RISK_DELTA_MAX).contains(&risk_delta) {
            return Err(ScenarioError::DeltaOutOfRange {
                delta: risk_delta,
                min: RISK_DELTA_MIN,
                max: RISK_DELTA_MAX,
            }
            .into());
        }

        Ok(Self {
            event: event.to_string(),
            expected_impact: expected_impact.trim().to_string(),
            risk_delta,
        })
    }

    /// The built-in catalogue.
    pub fn presets() -> Vec<Scenario> {
        [
            ("USDT fails audit", "Peg drops to $0.95", -25),
            ("USDC blacklisted in 2 countries", "Peg drops to $0.985", -10),
            ("DAI adds more ETH collateral", "Peg stable, confidence up", 5),
            ("Binance delists FRAX", "Peg volatility rises", -15),
            ("TUSD depegs 5%", "High sell-off risk", -30),
        ]
        .into_iter()
        .map(|(event, impact, delta)| Scenario {
            event: event.to_string(),
            expected_impact: impact.to_string(),
            risk_delta: delta,
        })
        .collect()
    }

    /// Find a preset by its exact event name.
    pub fn lookup(event: &str) -> SwResult<Scenario> {
        Self::presets()
            .into_iter()
            .find(|s| s.event == event)
            .ok_or_else(|| {
                ScenarioError::NotFound {
                    event: event.to_string(),
                }
                .into()
            })
    }

    /// Signed score change, e.g. `+5 pts` or `-25 pts`.
    pub fn risk_delta_label(&self) -> String {
        format!("{:+} pts", self.risk_delta)
    }
}
