//! Dashboard view building.
//!
//! Everything a renderer needs for one page view is computed here from an
//! explicit [`DashboardRequest`]; nothing is cached between requests.

use chrono::{DateTime, Local, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use sw_risk::{PegRiskEstimator, RiskAssessment, Scenario};
use sw_types::{SafetyLabel, Stablecoin, SwResult};

const CHART_DATE_FORMAT: &str = "%m/%d/%y";
const UPDATED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Request-scoped state for a single dashboard view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardRequest {
    pub coin: Stablecoin,
    /// Wall-clock time of the request; its calendar date ends the peg window.
    pub now: DateTime<Local>,
}

impl DashboardRequest {
    pub fn new(coin: Stablecoin, now: DateTime<Local>) -> Self {
        Self { coin, now }
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }
}

/// One plotted observation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub label: String,
    pub date: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

/// Line chart of the peg window with the reference line at the peg.
///
/// Plotted values go out as JSON numbers so chart clients can use them as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PegChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub peg_line: Decimal,
    pub points: Vec<ChartPoint>,
}

/// Fully formatted dashboard for one instrument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub coin: Stablecoin,
    pub heading: String,
    pub status: String,
    pub score_text: String,
    pub delta_text: String,
    pub volatility_text: String,
    pub chart: PegChart,
    pub last_updated: String,
    pub assessment: RiskAssessment,
}

/// Instrument picker entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinSummary {
    pub coin: Stablecoin,
    pub safety_label: SafetyLabel,
    pub status: String,
}

impl From<Stablecoin> for CoinSummary {
    fn from(coin: Stablecoin) -> Self {
        Self {
            coin,
            safety_label: coin.safety_label(),
            status: status_text(coin.safety_label()),
        }
    }
}

/// Row of the hypothetical scenario table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioRow {
    pub event: String,
    pub expected_impact: String,
    pub risk_delta: String,
}

impl From<&Scenario> for ScenarioRow {
    fn from(scenario: &Scenario) -> Self {
        Self {
            event: scenario.event.clone(),
            expected_impact: scenario.expected_impact.clone(),
            risk_delta: scenario.risk_delta_label(),
        }
    }
}

/// Run a fresh assessment for the request and format it.
pub fn render_dashboard(request: &DashboardRequest, estimator: &mut PegRiskEstimator) -> SwResult<DashboardView> {
    let assessment = estimator.assess_on(request.coin, request.today())?;
    Ok(format_view(assessment, estimator.policy().peg, request.now))
}

pub fn format_view(assessment: RiskAssessment, peg: Decimal, now: DateTime<Local>) -> DashboardView {
    let coin = assessment.coin;
    let status = status_text(assessment.safety_label);

    let points = assessment
        .series
        .points()
        .iter()
        .map(|p| ChartPoint {
            label: p.date.format(CHART_DATE_FORMAT).to_string(),
            date: p.date,
            price: p.price,
        })
        .collect();

    DashboardView {
        coin,
        heading: format!("{} — {}", coin, status),
        score_text: format!("{}/100", assessment.score),
        delta_text: signed(assessment.delta),
        volatility_text: assessment.volatility.normalize().to_string(),
        chart: PegChart {
            title: format!("{} 7-Day Peg Trend", coin),
            x_label: "Date".to_string(),
            y_label: "USD Price".to_string(),
            peg_line: peg,
            points,
        },
        last_updated: now.format(UPDATED_FORMAT).to_string(),
        status,
        assessment,
    }
}

pub fn coin_summaries() -> Vec<CoinSummary> {
    Stablecoin::all().into_iter().map(CoinSummary::from).collect()
}

pub fn scenario_rows() -> Vec<ScenarioRow> {
    Scenario::presets().iter().map(ScenarioRow::from).collect()
}

fn status_text(label: SafetyLabel) -> String {
    format!("{} {}", label.badge(), label)
}

fn signed(value: Decimal) -> String {
    if value < Decimal::ZERO {
        format!("-{}", value.abs())
    } else {
        format!("+{}", value.abs())
    }
}
