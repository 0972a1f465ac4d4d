//! Geometric Brownian motion path generation.
//!
//! Calibration statistics come in as daily figures. Before simulation they
//! are rescaled to the sampling cadence: drift divides by steps-per-day,
//! volatility divides by its square root. A one-day horizon at `1h` then
//! produces 24 steps whose compounded distribution matches one daily step.

use synthquant_core::{AssetSeries, Frequency, PricePoint, Symbol, UtcDateTime};

use crate::error::EngineError;
use crate::rng::PathRng;

/// Drift applied when an explicit asset gives only a start price.
pub const DEFAULT_DRIFT: f64 = 0.0001;
/// Volatility applied when an explicit asset gives only a start price.
pub const DEFAULT_VOLATILITY: f64 = 0.02;

/// Validated per-asset generation parameters, in daily units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GbmParams {
    start_price: f64,
    mu_daily: f64,
    sigma_daily: f64,
}

impl GbmParams {
    pub fn new(start_price: f64, mu_daily: f64, sigma_daily: f64) -> Result<Self, EngineError> {
        if !start_price.is_finite() || start_price <= 0.0 {
            return Err(EngineError::NonPositiveStartPrice { value: start_price });
        }
        if !mu_daily.is_finite() {
            return Err(EngineError::NonFiniteDrift { value: mu_daily });
        }
        if !sigma_daily.is_finite() || sigma_daily < 0.0 {
            return Err(EngineError::InvalidVolatility { value: sigma_daily });
        }
        Ok(Self {
            start_price,
            mu_daily,
            sigma_daily,
        })
    }

    /// Defaults used when only a start price is supplied.
    pub fn with_defaults(start_price: f64) -> Result<Self, EngineError> {
        Self::new(start_price, DEFAULT_DRIFT, DEFAULT_VOLATILITY)
    }

    pub const fn start_price(&self) -> f64 {
        self.start_price
    }

    pub const fn mu_daily(&self) -> f64 {
        self.mu_daily
    }

    pub const fn sigma_daily(&self) -> f64 {
        self.sigma_daily
    }
}

/// Number of simulation steps for a horizon at a cadence. Never zero.
pub fn step_count(frequency: Frequency, horizon_days: u32) -> usize {
    (frequency.steps_per_day() as usize * horizon_days as usize).max(1)
}

/// Generate a full series of `steps + 1` points, the first at `anchor` with
/// the start price.
pub fn generate_series(
    symbol: &Symbol,
    params: &GbmParams,
    frequency: Frequency,
    horizon_days: u32,
    anchor: UtcDateTime,
    rng: &mut PathRng,
) -> Result<AssetSeries, EngineError> {
    if horizon_days == 0 {
        return Err(EngineError::NonPositiveHorizon {
            value: i64::from(horizon_days),
        });
    }

    let steps = step_count(frequency, horizon_days);
    let prices = simulate_prices(params, frequency, steps, rng);

    let step_duration = frequency.step_duration();
    let points = prices
        .into_iter()
        .enumerate()
        .map(|(index, price)| PricePoint::new(anchor.plus(step_duration * index as i32), price))
        .collect();

    Ok(AssetSeries::new(symbol.clone(), points))
}

/// Log-space GBM recurrence at per-step units.
fn simulate_prices(
    params: &GbmParams,
    frequency: Frequency,
    steps: usize,
    rng: &mut PathRng,
) -> Vec<f64> {
    let steps_per_day = f64::from(frequency.steps_per_day());
    let mu_step = params.mu_daily / steps_per_day;
    let sigma_step = params.sigma_daily / steps_per_day.sqrt();
    let drift_term = mu_step - 0.5 * sigma_step * sigma_step;

    let mut prices = Vec::with_capacity(steps + 1);
    let mut price = params.start_price;
    prices.push(price);

    for _ in 0..steps {
        let shock = rng.standard_normal();
        price *= (drift_term + sigma_step * shock).exp();
        prices.push(price);
    }

    prices
}
