use sw_data::SimulatedPegProvider;
use sw_risk::{PegRiskEstimator, Scenario, ScoringPolicy};
use sw_types::Stablecoin;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Stablewatch peg risk example");

    let provider = SimulatedPegProvider::with_seed(7);
    let mut estimator = PegRiskEstimator::new(Box::new(provider), ScoringPolicy::default())?;

    for coin in Stablecoin::all() {
        let assessment = estimator.assess(coin)?;
        println!(
            "{} ({}): score {}/100, delta {}, volatility {}",
            coin, assessment.safety_label, assessment.score, assessment.delta, assessment.volatility
        );
        for point in assessment.series.points() {
            println!("  {} {}", point.date, point.price.round_dp(6));
        }
    }

    println!("Scenarios:");
    for scenario in Scenario::presets() {
        println!("  {} -> {} ({})", scenario.event, scenario.expected_impact, scenario.risk_delta_label());
    }

    Ok(())
}
