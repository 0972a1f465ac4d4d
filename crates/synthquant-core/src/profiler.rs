//! Market profiler: turns real daily closes into drift/volatility estimates.
//!
//! The profiler fetches roughly a year of daily closes through a
//! [`HistorySource`], computes log-return statistics, and caches the result
//! per symbol and region so repeated calibration of the same asset does not
//! hammer the upstream provider.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::domain::{Region, Symbol, UtcDateTime};
use crate::source::{HistoryRequest, HistorySource, PriceHistory, SourceError};

/// Trading-day convention used to annualize daily statistics.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Statistical profile of one symbol in one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub symbol: Symbol,
    pub region: Region,
    /// Mean of daily log returns.
    pub mu_daily: f64,
    /// Sample standard deviation of daily log returns.
    pub sigma_daily: f64,
    pub mu_annual: f64,
    pub sigma_annual: f64,
    pub last_price: f64,
    /// Number of closes the statistics were computed from.
    pub sample_size: usize,
    pub as_of: UtcDateTime,
}

/// Profiler tuning knobs.
#[derive(Debug, Clone)]
pub struct ProfilerConfig {
    pub lookback_days: u32,
    pub cache_ttl: Duration,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            lookback_days: 365,
            cache_ttl: Duration::from_secs(3600),
        }
    }
}

#[derive(Clone)]
struct CachedProfile {
    profile: Profile,
    stored_at: Instant,
}

/// Snapshot of the profile cache, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Entries currently held, fresh or stale.
    pub entries: usize,
    /// Entries still inside their TTL.
    pub fresh: usize,
}

/// Caching profiler over an arbitrary history source.
pub struct MarketProfiler {
    source: Arc<dyn HistorySource>,
    config: ProfilerConfig,
    cache: RwLock<HashMap<(String, Region), CachedProfile>>,
}

impl MarketProfiler {
    pub fn new(source: Arc<dyn HistorySource>) -> Self {
        Self::with_config(source, ProfilerConfig::default())
    }

    pub fn with_config(source: Arc<dyn HistorySource>, config: ProfilerConfig) -> Self {
        Self {
            source,
            config,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Profile a symbol, serving from cache while the entry is fresh.
    pub async fn profile(&self, symbol: &Symbol, region: Region) -> Result<Profile, SourceError> {
        let key = (symbol.as_str().to_owned(), region);

        {
            let cache = self.cache.read().await;
            if let Some(entry) = cache.get(&key) {
                if entry.stored_at.elapsed() < self.config.cache_ttl {
                    tracing::debug!(symbol = %symbol, region = %region, "profile cache hit");
                    return Ok(entry.profile.clone());
                }
            }
        }

        let request = HistoryRequest::new(symbol.clone(), region, self.config.lookback_days)?;
        let history = self.source.daily_history(request).await?;
        let profile = profile_from_history(&history)?;

        tracing::info!(
            symbol = %symbol,
            region = %region,
            source = self.source.id(),
            sample_size = profile.sample_size,
            "profiled symbol from upstream history"
        );

        let mut cache = self.cache.write().await;
        cache.insert(
            key,
            CachedProfile {
                profile: profile.clone(),
                stored_at: Instant::now(),
            },
        );

        Ok(profile)
    }

    /// Drop every cached profile, forcing fresh fetches.
    pub async fn invalidate(&self) {
        self.cache.write().await.clear();
    }

    /// Count cached profiles and how many are still fresh.
    pub async fn cache_stats(&self) -> CacheStats {
        let cache = self.cache.read().await;
        let fresh = cache
            .values()
            .filter(|entry| entry.stored_at.elapsed() < self.config.cache_ttl)
            .count();
        CacheStats {
            entries: cache.len(),
            fresh,
        }
    }
}

/// Compute log-return statistics for an already-fetched history.
pub fn profile_from_history(history: &PriceHistory) -> Result<Profile, SourceError> {
    let closes: Vec<f64> = history.closes().collect();
    if closes.len() < 2 {
        return Err(SourceError::no_data(&history.symbol, history.region));
    }

    let returns: Vec<f64> = closes
        .windows(2)
        .map(|pair| (pair[1] / pair[0]).ln())
        .collect();

    let n = returns.len() as f64;
    let mu_daily = returns.iter().sum::<f64>() / n;

    // Sample variance; a single return has no spread to measure.
    let sigma_daily = if returns.len() < 2 {
        0.0
    } else {
        let variance = returns
            .iter()
            .map(|r| (r - mu_daily).powi(2))
            .sum::<f64>()
            / (n - 1.0);
        variance.sqrt()
    };

    let last_price = history
        .last_close()
        .ok_or_else(|| SourceError::no_data(&history.symbol, history.region))?;

    Ok(Profile {
        symbol: history.symbol.clone(),
        region: history.region,
        mu_daily,
        sigma_daily,
        mu_annual: mu_daily * TRADING_DAYS_PER_YEAR,
        sigma_annual: sigma_daily * TRADING_DAYS_PER_YEAR.sqrt(),
        last_price,
        sample_size: closes.len(),
        as_of: UtcDateTime::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::FixtureHistorySource;
    use crate::source::{HistoryPoint, SourceErrorKind};
    use time::Duration as TimeDuration;

    fn history(symbol: &str, closes: &[f64]) -> PriceHistory {
        let symbol = Symbol::parse(symbol).expect("valid symbol");
        let end = UtcDateTime::now();
        let points = closes
            .iter()
            .enumerate()
            .map(|(day, close)| HistoryPoint {
                ts: end.minus(TimeDuration::days((closes.len() - day) as i64)),
                close: *close,
            })
            .collect();
        PriceHistory {
            symbol,
            region: Region::Us,
            points,
        }
    }

    #[test]
    fn constant_growth_has_zero_volatility() {
        // Each close is 1% above the previous, so every log return is equal.
        let profile = profile_from_history(&history("AAPL", &[100.0, 101.0, 102.01, 103.0301]))
            .expect("profiles");

        assert!((profile.mu_daily - 0.01_f64.ln_1p()).abs() < 1e-12);
        assert!(profile.sigma_daily.abs() < 1e-12);
        assert_eq!(profile.sample_size, 4);
        assert!((profile.last_price - 103.0301).abs() < 1e-9);
    }

    #[test]
    fn two_closes_are_enough_for_a_profile() {
        // The smallest valid history: one return, zero spread.
        let profile = profile_from_history(&history("AAPL", &[100.0, 110.0])).expect("profiles");

        assert!((profile.mu_daily - 1.1_f64.ln()).abs() < 1e-12);
        assert_eq!(profile.sigma_daily, 0.0);
        assert_eq!(profile.sample_size, 2);
        assert!((profile.last_price - 110.0).abs() < 1e-12);
    }

    #[test]
    fn annualization_uses_trading_day_convention() {
        let profile =
            profile_from_history(&history("MSFT", &[100.0, 102.0, 99.0, 101.0])).expect("profiles");

        assert!((profile.mu_annual - profile.mu_daily * 252.0).abs() < 1e-12);
        assert!((profile.sigma_annual - profile.sigma_daily * 252.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn single_close_is_rejected() {
        let err = profile_from_history(&history("AAPL", &[100.0])).expect_err("must fail");
        assert_eq!(err.kind(), SourceErrorKind::NoData);
    }

    #[tokio::test]
    async fn second_profile_call_is_served_from_cache() {
        let source = Arc::new(FixtureHistorySource::new());
        let symbol = Symbol::parse("AAPL").unwrap();
        source.insert_linear(&symbol, Region::Us, 100.0, 40);

        let profiler = MarketProfiler::new(source.clone());
        let first = profiler.profile(&symbol, Region::Us).await.expect("profiles");

        // Replace the fixture; the cached entry should still win.
        source.insert_linear(&symbol, Region::Us, 500.0, 40);
        let second = profiler.profile(&symbol, Region::Us).await.expect("profiles");

        assert_eq!(first.last_price, second.last_price);
    }

    #[tokio::test]
    async fn cache_stats_track_entries_and_invalidation() {
        let source = Arc::new(FixtureHistorySource::new());
        let aapl = Symbol::parse("AAPL").unwrap();
        let msft = Symbol::parse("MSFT").unwrap();
        source.insert_linear(&aapl, Region::Us, 100.0, 40);
        source.insert_linear(&msft, Region::Us, 300.0, 40);

        let profiler = MarketProfiler::new(source);
        assert_eq!(profiler.cache_stats().await, CacheStats { entries: 0, fresh: 0 });

        profiler.profile(&aapl, Region::Us).await.expect("profiles");
        profiler.profile(&msft, Region::Us).await.expect("profiles");
        assert_eq!(profiler.cache_stats().await, CacheStats { entries: 2, fresh: 2 });

        profiler.invalidate().await;
        assert_eq!(profiler.cache_stats().await, CacheStats { entries: 0, fresh: 0 });
    }

    #[tokio::test]
    async fn invalidate_forces_a_fresh_fetch() {
        let source = Arc::new(FixtureHistorySource::new());
        let symbol = Symbol::parse("AAPL").unwrap();
        source.insert_linear(&symbol, Region::Us, 100.0, 40);

        let profiler = MarketProfiler::new(source.clone());
        let first = profiler.profile(&symbol, Region::Us).await.expect("profiles");

        source.insert_linear(&symbol, Region::Us, 500.0, 40);
        profiler.invalidate().await;
        let second = profiler.profile(&symbol, Region::Us).await.expect("profiles");

        assert_ne!(first.last_price, second.last_price);
    }
}
