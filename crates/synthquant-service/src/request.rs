//! Wire-level request and response shapes.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use synthquant_core::{Frequency, Profile, Region, Symbol, UtcDateTime};
use synthquant_engine::{EventSpec, GbmParams};

use crate::error::ServiceError;

/// Longest horizon the service will generate, in days.
pub const MAX_HORIZON_DAYS: u32 = 365;
/// Most assets allowed in one dataset.
pub const MAX_ASSETS_PER_DATASET: usize = 20;

/// One asset in a creation request.
///
/// The wire shape is positional: a spec with `start_price` is explicit, a
/// spec with `region` asks for calibration against real market data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AssetSpec {
    Explicit {
        symbol: String,
        start_price: f64,
    },
    Calibrated {
        symbol: String,
        region: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        volatility_multiplier: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        drift_multiplier: Option<f64>,
    },
}

impl AssetSpec {
    pub fn symbol_str(&self) -> &str {
        match self {
            AssetSpec::Explicit { symbol, .. } | AssetSpec::Calibrated { symbol, .. } => symbol,
        }
    }

    /// Parse and validate the pieces that need no external data.
    pub fn validate(&self) -> Result<Symbol, ServiceError> {
        let symbol = Symbol::parse(self.symbol_str())?;
        match self {
            AssetSpec::Explicit { start_price, .. } => {
                if !start_price.is_finite() || *start_price <= 0.0 {
                    return Err(ServiceError::InvalidParameter(format!(
                        "start_price for '{symbol}' must be positive, got {start_price}"
                    )));
                }
            }
            AssetSpec::Calibrated {
                region,
                volatility_multiplier,
                drift_multiplier,
                ..
            } => {
                let _: Region = region.parse()?;
                for (name, value) in [
                    ("volatility_multiplier", volatility_multiplier),
                    ("drift_multiplier", drift_multiplier),
                ] {
                    if let Some(value) = value {
                        if !value.is_finite() || *value <= 0.0 {
                            return Err(ServiceError::InvalidParameter(format!(
                                "{name} for '{symbol}' must be positive, got {value}"
                            )));
                        }
                    }
                }
            }
        }
        Ok(symbol)
    }
}

/// An asset reduced to concrete generation parameters.
///
/// The path generator never learns whether its inputs came from explicit
/// values or from calibration.
#[derive(Debug, Clone)]
pub struct ResolvedAsset {
    pub symbol: Symbol,
    pub params: GbmParams,
}

/// Dataset creation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateDatasetRequest {
    pub project: String,
    pub assets: Vec<AssetSpec>,
    pub frequency: Frequency,
    pub horizon_days: u32,
    pub seed: u64,
    #[serde(default)]
    pub events: Vec<EventSpec>,
}

impl CreateDatasetRequest {
    /// Validate everything that needs no external data. Returns parsed
    /// symbols in request order.
    pub fn validate(&self) -> Result<Vec<Symbol>, ServiceError> {
        if self.project.trim().is_empty() {
            return Err(ServiceError::InvalidParameter(
                "project must not be empty".to_owned(),
            ));
        }
        if self.assets.is_empty() {
            return Err(ServiceError::InvalidParameter(
                "at least one asset is required".to_owned(),
            ));
        }
        if self.assets.len() > MAX_ASSETS_PER_DATASET {
            return Err(ServiceError::InvalidParameter(format!(
                "at most {MAX_ASSETS_PER_DATASET} assets per dataset, got {}",
                self.assets.len()
            )));
        }
        if self.horizon_days == 0 || self.horizon_days > MAX_HORIZON_DAYS {
            return Err(ServiceError::InvalidParameter(format!(
                "horizon_days must be between 1 and {MAX_HORIZON_DAYS}, got {}",
                self.horizon_days
            )));
        }

        let mut symbols = Vec::with_capacity(self.assets.len());
        let mut seen = HashSet::with_capacity(self.assets.len());
        for asset in &self.assets {
            let symbol = asset.validate()?;
            if !seen.insert(symbol.as_str().to_owned()) {
                return Err(ServiceError::InvalidParameter(format!(
                    "duplicate symbol '{symbol}' in request"
                )));
            }
            symbols.push(symbol);
        }

        for event in &self.events {
            event.validate().map_err(ServiceError::from)?;
        }

        Ok(symbols)
    }
}

/// Profile request as received from the boundary layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRequest {
    pub symbol: String,
    pub region: String,
}

/// Profile response with annualized figures included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub symbol: Symbol,
    pub region: Region,
    pub mu: f64,
    pub sigma: f64,
    pub last_price: f64,
    pub data_points: usize,
    pub fetched_at: UtcDateTime,
    pub annualized_return: f64,
    pub annualized_volatility: f64,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        Self {
            symbol: profile.symbol,
            region: profile.region,
            mu: profile.mu_daily,
            sigma: profile.sigma_daily,
            last_price: profile.last_price,
            data_points: profile.sample_size,
            fetched_at: profile.as_of,
            annualized_return: profile.mu_annual,
            annualized_volatility: profile.sigma_annual,
        }
    }
}

/// Preview of one asset: the first rows of its generated series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetPreview {
    pub symbol: Symbol,
    pub timestamps: Vec<String>,
    /// `null` entries mark IPO-suppressed points.
    pub prices: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetPreview {
    pub assets: Vec<AssetPreview>,
}

/// Response to a successful creation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateDatasetResponse {
    pub dataset_id: String,
    pub status: String,
    pub realism_score: f64,
    pub preview: DatasetPreview,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_request() -> CreateDatasetRequest {
        CreateDatasetRequest {
            project: String::from("demo"),
            assets: vec![AssetSpec::Explicit {
                symbol: String::from("AAPL"),
                start_price: 100.0,
            }],
            frequency: Frequency::OneDay,
            horizon_days: 30,
            seed: 42,
            events: Vec::new(),
        }
    }

    #[test]
    fn asset_spec_wire_shape_is_positional() {
        let explicit: AssetSpec =
            serde_json::from_str(r#"{"symbol": "AAPL", "start_price": 150.0}"#).unwrap();
        assert!(matches!(explicit, AssetSpec::Explicit { .. }));

        let calibrated: AssetSpec = serde_json::from_str(
            r#"{"symbol": "RELIANCE", "region": "IN", "volatility_multiplier": 1.2}"#,
        )
        .unwrap();
        assert!(matches!(calibrated, AssetSpec::Calibrated { .. }));
    }

    #[test]
    fn valid_request_passes() {
        assert!(base_request().validate().is_ok());
    }

    #[test]
    fn zero_horizon_is_rejected() {
        let mut request = base_request();
        request.horizon_days = 0;
        let err = request.validate().expect_err("must fail");
        assert_eq!(err.code(), "invalid_parameter");
    }

    #[test]
    fn negative_start_price_is_rejected() {
        let mut request = base_request();
        request.assets = vec![AssetSpec::Explicit {
            symbol: String::from("AAPL"),
            start_price: -5.0,
        }];
        let err = request.validate().expect_err("must fail");
        assert_eq!(err.code(), "invalid_parameter");
    }

    #[test]
    fn duplicate_symbols_are_rejected() {
        let mut request = base_request();
        request.assets = vec![
            AssetSpec::Explicit {
                symbol: String::from("AAPL"),
                start_price: 100.0,
            },
            // Same symbol after normalization, different spelling on the wire.
            AssetSpec::Calibrated {
                symbol: String::from("aapl"),
                region: String::from("US"),
                volatility_multiplier: None,
                drift_multiplier: None,
            },
        ];
        let err = request.validate().expect_err("must fail");
        assert_eq!(err.code(), "invalid_parameter");
    }

    #[test]
    fn unknown_region_is_rejected() {
        let mut request = base_request();
        request.assets = vec![AssetSpec::Calibrated {
            symbol: String::from("SAP"),
            region: String::from("EU"),
            volatility_multiplier: None,
            drift_multiplier: None,
        }];
        let err = request.validate().expect_err("must fail");
        assert_eq!(err.code(), "unsupported_region");
    }

    #[test]
    fn zero_multiplier_is_rejected() {
        let mut request = base_request();
        request.assets = vec![AssetSpec::Calibrated {
            symbol: String::from("AAPL"),
            region: String::from("US"),
            volatility_multiplier: Some(0.0),
            drift_multiplier: None,
        }];
        let err = request.validate().expect_err("must fail");
        assert_eq!(err.code(), "invalid_parameter");
    }

    #[test]
    fn bad_event_magnitude_is_rejected() {
        let mut request = base_request();
        request.events = vec![EventSpec::Crash {
            trigger_step: 5,
            magnitude: 2.0,
            duration: 5,
        }];
        let err = request.validate().expect_err("must fail");
        assert_eq!(err.code(), "invalid_parameter");
    }
}
