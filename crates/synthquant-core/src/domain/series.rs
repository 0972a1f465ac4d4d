use serde::{Deserialize, Serialize};

use crate::domain::{Symbol, UtcDateTime};

/// One sampled observation in a price series.
///
/// `price` is `None` when the observation falls inside a suppression window,
/// e.g. the pre-listing stretch introduced by an IPO event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub ts: UtcDateTime,
    pub price: Option<f64>,
}

impl PricePoint {
    pub fn new(ts: UtcDateTime, price: f64) -> Self {
        Self {
            ts,
            price: Some(price),
        }
    }

    pub fn suppressed(ts: UtcDateTime) -> Self {
        Self { ts, price: None }
    }
}

/// A full generated series for one asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetSeries {
    pub symbol: Symbol,
    pub points: Vec<PricePoint>,
}

impl AssetSeries {
    pub fn new(symbol: Symbol, points: Vec<PricePoint>) -> Self {
        Self { symbol, points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Prices in order, skipping suppressed observations.
    pub fn observed_prices(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().filter_map(|point| point.price)
    }
}
