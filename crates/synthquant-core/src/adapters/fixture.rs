use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

use time::Duration;

use crate::domain::{Region, Symbol, UtcDateTime};
use crate::source::{
    HistoryPoint, HistoryRequest, HistorySource, PriceHistory, SourceError,
};

/// In-memory history source for deterministic offline tests.
///
/// Fixtures are keyed by symbol and region, so a symbol can be present in one
/// region and missing in another.
#[derive(Default)]
pub struct FixtureHistorySource {
    histories: Mutex<HashMap<(String, Region), Vec<HistoryPoint>>>,
}

impl FixtureHistorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, symbol: &Symbol, region: Region, points: Vec<HistoryPoint>) {
        self.histories
            .lock()
            .expect("fixture store should not be poisoned")
            .insert((symbol.as_str().to_owned(), region), points);
    }

    /// Seed a flat daily-close ladder ending today, useful when a test only
    /// needs a plausible history rather than specific returns.
    pub fn insert_linear(&self, symbol: &Symbol, region: Region, start_close: f64, days: u32) {
        let end = UtcDateTime::now();
        let points = (0..days)
            .map(|day| HistoryPoint {
                ts: end.minus(Duration::days(i64::from(days - day))),
                close: start_close + f64::from(day) * 0.25,
            })
            .collect();
        self.insert(symbol, region, points);
    }
}

impl HistorySource for FixtureHistorySource {
    fn id(&self) -> &'static str {
        "fixture"
    }

    fn daily_history<'a>(
        &'a self,
        req: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<PriceHistory, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let histories = self
                .histories
                .lock()
                .expect("fixture store should not be poisoned");

            let points = histories
                .get(&(req.symbol.as_str().to_owned(), req.region))
                .cloned()
                .ok_or_else(|| SourceError::no_data(&req.symbol, req.region))?;

            if points.len() < 2 {
                return Err(SourceError::no_data(&req.symbol, req.region));
            }

            Ok(PriceHistory {
                symbol: req.symbol.clone(),
                region: req.region,
                points,
            })
        })
    }
}
