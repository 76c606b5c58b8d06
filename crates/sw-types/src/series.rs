use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{DataError, SwError, SwResult};
use crate::market::Stablecoin;

/// Number of daily observations in a peg series (today inclusive)
pub const PEG_WINDOW_DAYS: usize = 7;

/// A single daily price observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: Decimal,
}

impl PricePoint {
    pub fn new(date: NaiveDate, price: Decimal) -> Self {
        Self { date, price }
    }
}

/// Seven consecutive daily prices ending on a given date.
///
/// Construction validates the shape, so a `PegSeries` in hand always has
/// exactly [`PEG_WINDOW_DAYS`] points in ascending, gap-free date order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPegSeries")]
pub struct PegSeries {
    pub coin: Stablecoin,
    points: Vec<PricePoint>,
}

/// Unchecked wire shape; deserialized series go through [`PegSeries::new`].
#[derive(Deserialize)]
struct RawPegSeries {
    coin: Stablecoin,
    points: Vec<PricePoint>,
}

impl TryFrom<RawPegSeries> for PegSeries {
    type Error = SwError;

    fn try_from(raw: RawPegSeries) -> Result<Self, Self::Error> {
        PegSeries::new(raw.coin, raw.points)
    }
}

impl PegSeries {
    /// Validate and wrap a list of points.
    pub fn new(coin: Stablecoin, points: Vec<PricePoint>) -> SwResult<Self> {
        if points.len() != PEG_WINDOW_DAYS {
            return Err(DataError::InvalidSeries {
                message: format!(
                    "expected {} points for {}, got {}",
                    PEG_WINDOW_DAYS,
                    coin,
                    points.len()
                ),
            }
            .into());
        }

        for pair in points.windows(2) {
            if pair[1].date != pair[0].date + Duration::days(1) {
                return Err(DataError::InvalidSeries {
                    message: format!(
                        "dates must be consecutive: {} followed by {}",
                        pair[0].date, pair[1].date
                    ),
                }
                .into());
            }
        }

        Ok(Self { coin, points })
    }

    /// Pair prices with the calendar days ending on `end` (inclusive).
    pub fn from_prices(coin: Stablecoin, end: NaiveDate, prices: Vec<Decimal>) -> SwResult<Self> {
        if prices.len() != PEG_WINDOW_DAYS {
            return Err(DataError::InsufficientData {
                message: format!(
                    "expected {} prices for {}, got {}",
                    PEG_WINDOW_DAYS,
                    coin,
                    prices.len()
                ),
            }
            .into());
        }

        let points = window_dates(end)
            .into_iter()
            .zip(prices)
            .map(|(date, price)| PricePoint::new(date, price))
            .collect();

        Self::new(coin, points)
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn prices(&self) -> impl Iterator<Item = Decimal> + '_ {
        self.points.iter().map(|p| p.price)
    }

    pub fn start_date(&self) -> NaiveDate {
        self.points[0].date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.points[PEG_WINDOW_DAYS - 1].date
    }

    /// Most recent price
    pub fn last_price(&self) -> Decimal {
        self.points[PEG_WINDOW_DAYS - 1].price
    }

    pub fn max_price(&self) -> Decimal {
        self.prices().max().unwrap_or_default()
    }

    pub fn min_price(&self) -> Decimal {
        self.prices().min().unwrap_or_default()
    }

    /// High minus low over the window; never negative.
    pub fn price_range(&self) -> Decimal {
        self.max_price() - self.min_price()
    }
}

/// The [`PEG_WINDOW_DAYS`] calendar dates ending on `end`, oldest first.
pub fn window_dates(end: NaiveDate) -> Vec<NaiveDate> {
    (0..PEG_WINDOW_DAYS)
        .rev()
        .map(|back| end - Duration::days(back as i64))
        .collect()
}
