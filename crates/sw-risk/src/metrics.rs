//! Peg risk metrics.
//!
//! [`RiskMetricsCalculator`] turns a [`PegSeries`] into a [`RiskAssessment`];
//! [`PegRiskEstimator`] pairs it with a data provider so a caller only has to
//! name the instrument.

use chrono::{Local, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use sw_data::PegDataProvider;
use sw_types::{validation_error, DataError, PegSeries, SafetyLabel, Stablecoin, SwResult};

/// Decimal places kept on the last-price deviation.
const DELTA_DP: u32 = 4;
/// Decimal places kept on the score.
const SCORE_DP: u32 = 1;
/// Decimal places kept on the high-low range.
const VOLATILITY_DP: u32 = 5;

/// How a deviation from the peg is converted into a score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    /// Reference price the last observation is compared against.
    pub peg: Decimal,
    /// Points lost per unit of absolute deviation (1000 = 1 point per 0.1%).
    pub score_scale: Decimal,
    /// Score of a perfectly pegged instrument.
    pub max_score: Decimal,
    /// Keep the score inside `[0, max_score]`.
    pub clamp_score: bool,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            peg: Decimal::ONE,
            score_scale: Decimal::from(1000),
            max_score: Decimal::from(100),
            clamp_score: true,
        }
    }
}

impl ScoringPolicy {
    pub fn validate(&self) -> SwResult<()> {
        if self.peg <= Decimal::ZERO {
            return Err(validation_error!("peg must be positive, got {}", self.peg));
        }
        if self.score_scale <= Decimal::ZERO {
            return Err(validation_error!("score scale must be positive, got {}", self.score_scale));
        }
        if self.max_score <= Decimal::ZERO {
            return Err(validation_error!("max score must be positive, got {}", self.max_score));
        }
        Ok(())
    }
}

/// Risk view of one instrument derived from a single peg series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub coin: Stablecoin,
    pub safety_label: SafetyLabel,
    pub series: PegSeries,
    /// Last price minus peg, 4 decimal places (signed).
    pub delta: Decimal,
    /// `max_score - |delta| * score_scale`, 1 decimal place.
    pub score: Decimal,
    /// Highest minus lowest price over the window, 5 decimal places.
    pub volatility: Decimal,
}

/// Stateless calculator for peg risk metrics.
pub struct RiskMetricsCalculator;

impl RiskMetricsCalculator {
    pub fn compute(series: PegSeries, policy: &ScoringPolicy) -> RiskAssessment {
        let delta = Self::delta(series.last_price(), policy.peg);
        let score = Self::score(delta, policy);
        let volatility = Self::volatility(&series);

        RiskAssessment {
            coin: series.coin,
            safety_label: series.coin.safety_label(),
            series,
            delta,
            score,
            volatility,
        }
    }

    fn delta(last_price: Decimal, peg: Decimal) -> Decimal {
        let mut delta =
            (last_price - peg).round_dp_with_strategy(DELTA_DP, RoundingStrategy::MidpointAwayFromZero);
        delta.rescale(DELTA_DP);
        delta
    }

    fn score(delta: Decimal, policy: &ScoringPolicy) -> Decimal {
        let raw = policy.max_score - (delta * policy.score_scale).abs();
        let bounded = if policy.clamp_score {
            raw.max(Decimal::ZERO).min(policy.max_score)
        } else {
            raw
        };

        let mut score = bounded.round_dp_with_strategy(SCORE_DP, RoundingStrategy::MidpointAwayFromZero);
        score.rescale(SCORE_DP);
        score
    }

    fn volatility(series: &PegSeries) -> Decimal {
        series
            .price_range()
            .round_dp_with_strategy(VOLATILITY_DP, RoundingStrategy::MidpointAwayFromZero)
    }
}

/// Produces a fresh assessment on every call.
///
/// Owns its data provider, so injecting a seeded or fixed provider makes the
/// output reproducible.
#[derive(Debug)]
pub struct PegRiskEstimator {
    provider: Box<dyn PegDataProvider>,
    policy: ScoringPolicy,
}

impl PegRiskEstimator {
    pub fn new(provider: Box<dyn PegDataProvider>, policy: ScoringPolicy) -> SwResult<Self> {
        policy.validate()?;
        Ok(Self { provider, policy })
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Assess `coin` over the seven days ending today (local calendar).
    pub fn assess(&mut self, coin: Stablecoin) -> SwResult<RiskAssessment> {
        self.assess_on(coin, Local::now().date_naive())
    }

    /// Assess `coin` over the seven days ending on `today`.
    pub fn assess_on(&mut self, coin: Stablecoin, today: NaiveDate) -> SwResult<RiskAssessment> {
        if !self.provider.supports_instrument(coin) {
            warn!("Provider {} has no data for {}", self.provider.name(), coin);
            return Err(DataError::UnsupportedInstrument {
                symbol: coin.to_string(),
                provider: self.provider.name().to_string(),
            }
            .into());
        }

        let series = self.provider.fetch_series(coin, today)?;
        let assessment = RiskMetricsCalculator::compute(series, &self.policy);

        debug!(
            "Assessed {}: score {} delta {} volatility {}",
            coin, assessment.score, assessment.delta, assessment.volatility
        );
        Ok(assessment)
    }
}
