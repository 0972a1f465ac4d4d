//! Dataset generation pipeline.
//!
//! `DatasetService` ties the pieces together: validate the request, resolve
//! every asset to concrete generation parameters (profiling real data where
//! calibration is requested), generate and shock each path, score the
//! result, and register it. Profiling runs before any shared lock is taken;
//! a slow upstream fetch never blocks registry readers.

use std::sync::Arc;

use synthquant_core::{AssetSeries, MarketProfiler, Region, Symbol, UtcDateTime};
use synthquant_engine::{
    apply_events, generate_series, realism_score, GbmParams, PathRng,
};

use crate::error::ServiceError;
use crate::registry::{Dataset, DatasetRegistry, DatasetSummary};
use crate::request::{
    AssetPreview, AssetSpec, CreateDatasetRequest, CreateDatasetResponse, DatasetPreview,
    ProfileRequest, ProfileResponse, ResolvedAsset,
};

/// Rows of each series included in a preview.
pub const PREVIEW_ROWS: usize = 10;

/// Application service behind the dataset and profile endpoints.
pub struct DatasetService {
    registry: Arc<DatasetRegistry>,
    profiler: Arc<MarketProfiler>,
}

impl DatasetService {
    pub fn new(registry: Arc<DatasetRegistry>, profiler: Arc<MarketProfiler>) -> Self {
        Self { registry, profiler }
    }

    pub fn registry(&self) -> &Arc<DatasetRegistry> {
        &self.registry
    }

    /// Generate, score, and register one dataset.
    ///
    /// Validation and calibration happen before any state is touched, so a
    /// failure at any point leaves the registry unchanged.
    pub async fn create_dataset(
        &self,
        request: CreateDatasetRequest,
    ) -> Result<CreateDatasetResponse, ServiceError> {
        let symbols = request.validate()?;
        let resolved = self.resolve_assets(&request.assets, &symbols).await?;

        let anchor = UtcDateTime::now().floor_to_minute();
        let mut series_list = Vec::with_capacity(resolved.len());
        for (index, asset) in resolved.iter().enumerate() {
            let mut rng = PathRng::for_asset(request.seed, &asset.symbol, index);
            let raw = generate_series(
                &asset.symbol,
                &asset.params,
                request.frequency,
                request.horizon_days,
                anchor,
                &mut rng,
            )?;
            series_list.push(apply_events(&raw, &request.events));
        }

        let pooled: Vec<f64> = series_list
            .iter()
            .flat_map(AssetSeries::observed_prices)
            .collect();
        let score = realism_score(&pooled);

        let total_rows = series_list.first().map(AssetSeries::len).unwrap_or(0);
        let preview = DatasetPreview {
            assets: series_list.iter().map(preview_of).collect(),
        };

        let dataset = Dataset {
            dataset_id: String::new(),
            project: request.project.clone(),
            created_at: UtcDateTime::now(),
            frequency: request.frequency,
            horizon_days: request.horizon_days,
            seed: request.seed,
            series: series_list,
            events: request.events.clone(),
            realism_score: score,
            total_rows,
        };
        let dataset_id = self.registry.create(dataset).await;

        tracing::info!(
            dataset_id = %dataset_id,
            project = %request.project,
            assets = resolved.len(),
            frequency = %request.frequency,
            horizon_days = request.horizon_days,
            realism_score = score,
            "dataset created"
        );

        Ok(CreateDatasetResponse {
            dataset_id,
            status: String::from("ready"),
            realism_score: score,
            preview,
        })
    }

    /// Profile one symbol against real market data.
    pub async fn profile(&self, request: ProfileRequest) -> Result<ProfileResponse, ServiceError> {
        let symbol = Symbol::parse(&request.symbol)?;
        let region: Region = request.region.parse()?;
        let profile = self.profiler.profile(&symbol, region).await?;
        Ok(profile.into())
    }

    pub async fn get_dataset(&self, id: &str) -> Result<Arc<Dataset>, ServiceError> {
        self.registry
            .get(id)
            .await
            .ok_or_else(|| ServiceError::NotFound(id.to_owned()))
    }

    pub async fn list_datasets(&self) -> Vec<DatasetSummary> {
        self.registry.list().await
    }

    /// Preview rows of an already-registered dataset.
    pub async fn dataset_preview(&self, id: &str) -> Result<DatasetPreview, ServiceError> {
        let dataset = self.get_dataset(id).await?;
        Ok(DatasetPreview {
            assets: dataset.series.iter().map(preview_of).collect(),
        })
    }

    /// Resolve every asset to a `(start_price, mu, sigma)` triple. The path
    /// generator never learns which branch produced its inputs.
    async fn resolve_assets(
        &self,
        assets: &[AssetSpec],
        symbols: &[Symbol],
    ) -> Result<Vec<ResolvedAsset>, ServiceError> {
        let mut resolved = Vec::with_capacity(assets.len());
        for (spec, symbol) in assets.iter().zip(symbols) {
            let params = match spec {
                AssetSpec::Explicit { start_price, .. } => GbmParams::with_defaults(*start_price)?,
                AssetSpec::Calibrated {
                    region,
                    volatility_multiplier,
                    drift_multiplier,
                    ..
                } => {
                    let region: Region = region.parse()?;
                    let profile = self.profiler.profile(symbol, region).await?;
                    GbmParams::new(
                        profile.last_price,
                        profile.mu_daily * drift_multiplier.unwrap_or(1.0),
                        profile.sigma_daily * volatility_multiplier.unwrap_or(1.0),
                    )?
                }
            };
            resolved.push(ResolvedAsset {
                symbol: symbol.clone(),
                params,
            });
        }
        Ok(resolved)
    }
}

fn preview_of(series: &AssetSeries) -> AssetPreview {
    let head = &series.points[..series.len().min(PREVIEW_ROWS)];
    AssetPreview {
        symbol: series.symbol.clone(),
        timestamps: head.iter().map(|point| point.ts.format_rfc3339()).collect(),
        prices: head.iter().map(|point| point.price.map(round4)).collect(),
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use synthquant_core::{FixtureHistorySource, Frequency};
    use synthquant_engine::EventSpec;

    fn service_with_fixture() -> (DatasetService, Arc<FixtureHistorySource>) {
        let source = Arc::new(FixtureHistorySource::new());
        let profiler = Arc::new(MarketProfiler::new(source.clone()));
        let registry = Arc::new(DatasetRegistry::new());
        (DatasetService::new(registry, profiler), source)
    }

    fn explicit_request(seed: u64) -> CreateDatasetRequest {
        CreateDatasetRequest {
            project: String::from("demo"),
            assets: vec![
                AssetSpec::Explicit {
                    symbol: String::from("AAPL"),
                    start_price: 150.0,
                },
                AssetSpec::Explicit {
                    symbol: String::from("MSFT"),
                    start_price: 300.0,
                },
            ],
            frequency: Frequency::OneDay,
            horizon_days: 30,
            seed,
            events: Vec::new(),
        }
    }

    #[tokio::test]
    async fn creates_and_registers_a_dataset() {
        let (service, _) = service_with_fixture();
        let response = service.create_dataset(explicit_request(42)).await.expect("creates");

        assert_eq!(response.status, "ready");
        assert_eq!(response.preview.assets.len(), 2);
        assert_eq!(response.preview.assets[0].prices.len(), PREVIEW_ROWS);

        let stored = service.get_dataset(&response.dataset_id).await.expect("stored");
        assert_eq!(stored.total_rows, 31);
        assert_eq!(stored.series.len(), 2);
    }

    #[tokio::test]
    async fn same_seed_reproduces_the_same_paths() {
        let (service, _) = service_with_fixture();
        let first = service.create_dataset(explicit_request(7)).await.expect("creates");
        let second = service.create_dataset(explicit_request(7)).await.expect("creates");

        let a = service.get_dataset(&first.dataset_id).await.unwrap();
        let b = service.get_dataset(&second.dataset_id).await.unwrap();

        let a_prices: Vec<Option<f64>> = a.series[0].points.iter().map(|p| p.price).collect();
        let b_prices: Vec<Option<f64>> = b.series[0].points.iter().map(|p| p.price).collect();
        assert_eq!(a_prices, b_prices);
    }

    #[tokio::test]
    async fn calibrated_asset_uses_profiled_last_price() {
        let (service, source) = service_with_fixture();
        let symbol = Symbol::parse("RELIANCE").unwrap();
        source.insert_linear(&symbol, Region::In, 2800.0, 60);

        let request = CreateDatasetRequest {
            project: String::from("calibrated"),
            assets: vec![AssetSpec::Calibrated {
                symbol: String::from("RELIANCE"),
                region: String::from("IN"),
                volatility_multiplier: None,
                drift_multiplier: None,
            }],
            frequency: Frequency::OneDay,
            horizon_days: 5,
            seed: 1,
            events: Vec::new(),
        };

        let response = service.create_dataset(request).await.expect("creates");
        let dataset = service.get_dataset(&response.dataset_id).await.unwrap();
        let expected_start = 2800.0 + 59.0 * 0.25;
        assert_eq!(dataset.series[0].points[0].price, Some(expected_start));
    }

    #[tokio::test]
    async fn missing_calibration_data_registers_nothing() {
        let (service, _) = service_with_fixture();
        let request = CreateDatasetRequest {
            project: String::from("broken"),
            assets: vec![AssetSpec::Calibrated {
                symbol: String::from("GHOST"),
                region: String::from("US"),
                volatility_multiplier: None,
                drift_multiplier: None,
            }],
            frequency: Frequency::OneDay,
            horizon_days: 5,
            seed: 1,
            events: Vec::new(),
        };

        let err = service.create_dataset(request).await.expect_err("must fail");
        assert_eq!(err.code(), "data_unavailable");
        assert!(service.registry().is_empty().await);
    }

    #[tokio::test]
    async fn ipo_event_nulls_preview_prices() {
        let (service, _) = service_with_fixture();
        let mut request = explicit_request(5);
        request.events = vec![EventSpec::Ipo { trigger_step: 4 }];

        let response = service.create_dataset(request).await.expect("creates");
        let prices = &response.preview.assets[0].prices;
        assert!(prices[..4].iter().all(Option::is_none));
        assert!(prices[4..].iter().all(Option::is_some));
    }

    #[tokio::test]
    async fn unknown_dataset_is_not_found() {
        let (service, _) = service_with_fixture();
        let err = service.get_dataset("ds-nope").await.expect_err("must fail");
        assert_eq!(err.code(), "not_found");
    }
}
