use chrono::NaiveDate;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sw_types::{validation_error, DataError, PegSeries, Stablecoin, SwResult, PEG_WINDOW_DAYS};

/// Grid size for uniform draws inside the band (1e-9 of the band width).
const SAMPLE_STEPS: i64 = 1_000_000_000;
const SAMPLE_SCALE: u32 = 9;

/// Trait for peg data providers (simulated, fixed fixtures, ...)
pub trait PegDataProvider: Send + Sync + std::fmt::Debug {
    /// Check if this provider can produce a series for the given instrument
    fn supports_instrument(&self, coin: Stablecoin) -> bool;

    /// Produce the daily series ending on `end_date` (inclusive)
    fn fetch_series(&mut self, coin: Stablecoin, end_date: NaiveDate) -> SwResult<PegSeries>;

    /// Get provider name
    fn name(&self) -> &str;

    /// Get provider configuration
    fn config(&self) -> serde_json::Value;
}

/// Symmetric band around the peg that simulated prices are drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PegBand {
    pub peg: Decimal,
    pub half_width: Decimal,
}

impl Default for PegBand {
    fn default() -> Self {
        Self {
            peg: Decimal::ONE,
            half_width: Decimal::new(5, 3), // 0.005
        }
    }
}

impl PegBand {
    pub fn lower(&self) -> Decimal {
        self.peg - self.half_width
    }

    pub fn upper(&self) -> Decimal {
        self.peg + self.half_width
    }

    pub fn contains(&self, price: Decimal) -> bool {
        price >= self.lower() && price <= self.upper()
    }

    pub fn validate(&self) -> SwResult<()> {
        if self.peg <= Decimal::ZERO {
            return Err(validation_error!("peg must be positive, got {}", self.peg));
        }
        if self.half_width <= Decimal::ZERO || self.half_width >= self.peg {
            return Err(validation_error!(
                "band half-width must be in (0, {}), got {}",
                self.peg,
                self.half_width
            ));
        }
        Ok(())
    }
}

/// Simulated peg provider: every day is an independent uniform draw from the band.
///
/// Backed by ChaCha8 so a seed reproduces the exact same series.
#[derive(Debug)]
pub struct SimulatedPegProvider {
    pub name: String,
    band: PegBand,
    seed: Option<u64>,
    rng: ChaCha8Rng,
}

impl SimulatedPegProvider {
    /// Unseeded provider using OS entropy
    pub fn new() -> Self {
        Self {
            name: "Simulated Peg Provider".to_string(),
            band: PegBand::default(),
            seed: None,
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Deterministic provider for reproducible output
    pub fn with_seed(seed: u64) -> Self {
        Self {
            name: "Simulated Peg Provider".to_string(),
            band: PegBand::default(),
            seed: Some(seed),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn with_band(mut self, band: PegBand) -> SwResult<Self> {
        band.validate()?;
        self.band = band;
        Ok(self)
    }

    pub fn band(&self) -> PegBand {
        self.band
    }

    fn sample_price(&mut self) -> Decimal {
        let steps = self.rng.gen_range(0..=SAMPLE_STEPS);
        let fraction = Decimal::new(steps, SAMPLE_SCALE);
        self.band.lower() + (self.band.upper() - self.band.lower()) * fraction
    }
}

impl Default for SimulatedPegProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl PegDataProvider for SimulatedPegProvider {
    fn supports_instrument(&self, _coin: Stablecoin) -> bool {
        true
    }

    fn fetch_series(&mut self, coin: Stablecoin, end_date: NaiveDate) -> SwResult<PegSeries> {
        let prices: Vec<Decimal> = (0..PEG_WINDOW_DAYS).map(|_| self.sample_price()).collect();

        tracing::debug!("Simulated {} peg prices for {} ending {}", prices.len(), coin, end_date);
        PegSeries::from_prices(coin, end_date, prices)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn config(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "simulated",
            "peg": self.band.peg,
            "half_width": self.band.half_width,
            "seed": self.seed,
        })
    }
}

/// Replays a fixed list of prices, for tests and reproducing a known chart
#[derive(Debug, Clone)]
pub struct FixedSampleProvider {
    pub name: String,
    prices: Vec<Decimal>,
    coins: Option<Vec<Stablecoin>>,
}

impl FixedSampleProvider {
    pub fn new(prices: Vec<Decimal>) -> SwResult<Self> {
        if prices.len() != PEG_WINDOW_DAYS {
            return Err(DataError::InsufficientData {
                message: format!("fixed provider needs {} prices, got {}", PEG_WINDOW_DAYS, prices.len()),
            }
            .into());
        }

        Ok(Self {
            name: "Fixed Sample Provider".to_string(),
            prices,
            coins: None,
        })
    }

    /// Restrict the provider to a subset of instruments
    pub fn only_for(mut self, coins: &[Stablecoin]) -> Self {
        self.coins = Some(coins.to_vec());
        self
    }
}

impl PegDataProvider for FixedSampleProvider {
    fn supports_instrument(&self, coin: Stablecoin) -> bool {
        self.coins.as_ref().map_or(true, |coins| coins.contains(&coin))
    }

    fn fetch_series(&mut self, coin: Stablecoin, end_date: NaiveDate) -> SwResult<PegSeries> {
        if !self.supports_instrument(coin) {
            return Err(DataError::UnsupportedInstrument {
                symbol: coin.to_string(),
                provider: self.name.clone(),
            }
            .into());
        }

        PegSeries::from_prices(coin, end_date, self.prices.clone())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn config(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "fixed",
            "prices": self.prices,
            "instruments": self.coins,
        })
    }
}
