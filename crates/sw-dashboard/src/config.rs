use serde::{Deserialize, Serialize};

use sw_data::SimulatedPegProvider;
use sw_risk::{PegRiskEstimator, ScoringPolicy};
use sw_types::{config_error, SwResult};

pub const ADDR_VAR: &str = "STABLEWATCH_ADDR";
pub const SEED_VAR: &str = "STABLEWATCH_SEED";
pub const CLAMP_VAR: &str = "STABLEWATCH_CLAMP_SCORE";

/// Configuration for the dashboard service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Listen address.
    pub addr: String,
    /// When set, every request is simulated from this seed.
    pub seed: Option<u64>,
    /// Keep scores inside `[0, 100]`.
    pub clamp_score: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:8082".to_string(),
            seed: None,
            clamp_score: true,
        }
    }
}

impl ServiceConfig {
    /// Read overrides from the process environment.
    pub fn from_env() -> SwResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> SwResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(addr) = lookup(ADDR_VAR) {
            config.addr = parse_addr(&addr)?;
        }

        if let Some(seed) = lookup(SEED_VAR) {
            let seed = seed
                .trim()
                .parse::<u64>()
                .map_err(|e| config_error!("{} must be an unsigned integer: {}", SEED_VAR, e))?;
            config.seed = Some(seed);
        }

        if let Some(clamp) = lookup(CLAMP_VAR) {
            config.clamp_score = match clamp.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                other => return Err(config_error!("{} must be true or false, got {:?}", CLAMP_VAR, other)),
            };
        }

        Ok(config)
    }

    pub fn scoring_policy(&self) -> ScoringPolicy {
        ScoringPolicy {
            clamp_score: self.clamp_score,
            ..ScoringPolicy::default()
        }
    }

    /// A new estimator for a single request.
    pub fn estimator(&self) -> SwResult<PegRiskEstimator> {
        let provider = match self.seed {
            Some(seed) => SimulatedPegProvider::with_seed(seed),
            None => SimulatedPegProvider::new(),
        };
        PegRiskEstimator::new(Box::new(provider), self.scoring_policy())
    }
}

/// Accept any `host:port` the listener can resolve (`localhost:8082`,
/// `0.0.0.0:8082`, `[::1]:8082`); resolution itself happens at bind time.
fn parse_addr(raw: &str) -> SwResult<String> {
    let addr = raw.trim();
    let valid = addr
        .rsplit_once(':')
        .map_or(false, |(host, port)| !host.is_empty() && port.parse::<u16>().is_ok());
    if !valid {
        return Err(config_error!("{} must be host:port, got {:?}", ADDR_VAR, raw));
    }
    Ok(addr.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use sw_types::SwError;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_overrides() {
        let config = ServiceConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, ServiceConfig::default());
        assert!(config.scoring_policy().clamp_score);
    }

    #[test]
    fn overrides_are_applied() {
        let config = ServiceConfig::from_lookup(lookup_from(&[
            (ADDR_VAR, "127.0.0.1:9000"),
            (SEED_VAR, "42"),
            (CLAMP_VAR, "false"),
        ]))
        .unwrap();
        assert_eq!(config.addr, "127.0.0.1:9000");
        assert_eq!(config.seed, Some(42));
        assert!(!config.scoring_policy().clamp_score);
    }

    #[test]
    fn bad_seed_is_config_error() {
        let err = ServiceConfig::from_lookup(lookup_from(&[(SEED_VAR, "-3")])).unwrap_err();
        assert!(matches!(err, SwError::Config(_)));
        assert!(err.to_string().contains(SEED_VAR));
    }

    #[test]
    fn bad_addr_is_config_error() {
        let err = ServiceConfig::from_lookup(lookup_from(&[(ADDR_VAR, "localhost")])).unwrap_err();
        assert!(matches!(err, SwError::Config(_)));
    }

    #[test]
    fn hostname_addr_is_accepted() {
        let config = ServiceConfig::from_lookup(lookup_from(&[(ADDR_VAR, "localhost:8082")])).unwrap();
        assert_eq!(config.addr, "localhost:8082");
        let config = ServiceConfig::from_lookup(lookup_from(&[(ADDR_VAR, "[::1]:9000")])).unwrap();
        assert_eq!(config.addr, "[::1]:9000");
    }

    #[test]
    fn addr_without_valid_port_is_rejected() {
        assert!(ServiceConfig::from_lookup(lookup_from(&[(ADDR_VAR, "localhost:http")])).is_err());
        assert!(ServiceConfig::from_lookup(lookup_from(&[(ADDR_VAR, ":8082")])).is_err());
    }

    #[test]
    fn bad_clamp_flag_is_config_error() {
        let err = ServiceConfig::from_lookup(lookup_from(&[(CLAMP_VAR, "maybe")])).unwrap_err();
        assert!(err.to_string().contains("maybe"));
    }

    #[test]
    fn seeded_config_builds_reproducible_estimators() {
        let config = ServiceConfig {
            seed: Some(8),
            ..ServiceConfig::default()
        };
        let today = chrono::NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let a = config.estimator().unwrap().assess_on(sw_types::Stablecoin::Usdc, today).unwrap();
        let b = config.estimator().unwrap().assess_on(sw_types::Stablecoin::Usdc, today).unwrap();
        assert_eq!(a, b);
    }
}
