use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;

use crate::domain::UtcDateTime;
use crate::http_client::{HttpClient, HttpRequest};
use crate::source::{
    HistoryPoint, HistoryRequest, HistorySource, PriceHistory, SourceError,
};
use crate::throttling::UpstreamThrottle;

/// History source backed by the unofficial Yahoo chart endpoint.
///
/// Chart data needs no cookie or crumb, only a browser-like referer header.
/// Calls go through an [`UpstreamThrottle`] so fan-out across symbols stays
/// inside the provider's tolerance.
#[derive(Clone)]
pub struct YahooHistorySource {
    http_client: Arc<dyn HttpClient>,
    throttle: UpstreamThrottle,
}

impl YahooHistorySource {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            throttle: UpstreamThrottle::chart_default(),
        }
    }

    pub fn with_throttle(http_client: Arc<dyn HttpClient>, throttle: UpstreamThrottle) -> Self {
        Self {
            http_client,
            throttle,
        }
    }

    fn chart_url(req: &HistoryRequest) -> String {
        let provider_symbol = req.region.provider_symbol(&req.symbol);
        format!(
            "https://query1.finance.yahoo.com/v8/finance/chart/{}?range={}&interval=1d",
            urlencoding::encode(&provider_symbol),
            range_for_lookback(req.lookback_days),
        )
    }

    fn parse_chart(req: &HistoryRequest, body: &str) -> Result<PriceHistory, SourceError> {
        let chart_response: ChartResponse = serde_json::from_str(body)
            .map_err(|e| SourceError::internal(format!("failed to parse chart response: {e}")))?;

        if let Some(error) = chart_response.chart.error {
            return Err(SourceError::unavailable(format!(
                "chart endpoint error: {}",
                error.description.unwrap_or(error.code)
            )));
        }

        let result = chart_response
            .chart
            .result
            .and_then(|mut results| {
                if results.is_empty() {
                    None
                } else {
                    Some(results.remove(0))
                }
            })
            .ok_or_else(|| SourceError::no_data(&req.symbol, req.region))?;

        let timestamps = result.timestamp.unwrap_or_default();
        let closes = result
            .indicators
            .quote
            .into_iter()
            .next()
            .map(|quote| quote.close)
            .unwrap_or_default();

        let mut points = Vec::with_capacity(timestamps.len());
        for (ts_value, close) in timestamps.into_iter().zip(closes) {
            let Some(close) = close.filter(|value| value.is_finite() && *value > 0.0) else {
                continue;
            };
            let ts = UtcDateTime::from_unix_timestamp(ts_value)
                .map_err(|e| SourceError::internal(format!("invalid chart timestamp: {e}")))?;
            points.push(HistoryPoint { ts, close });
        }
        points.sort_by_key(|point| point.ts);

        if points.len() < 2 {
            return Err(SourceError::no_data(&req.symbol, req.region));
        }

        Ok(PriceHistory {
            symbol: req.symbol.clone(),
            region: req.region,
            points,
        })
    }
}

impl HistorySource for YahooHistorySource {
    fn id(&self) -> &'static str {
        "yahoo_chart"
    }

    fn daily_history<'a>(
        &'a self,
        req: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<PriceHistory, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            if let Err(wait) = self.throttle.acquire() {
                tracing::debug!(wait_ms = wait.as_millis() as u64, "chart budget exhausted");
                tokio::time::sleep(wait).await;
            }

            let request = HttpRequest::get(Self::chart_url(&req))
                .with_header("referer", "https://finance.yahoo.com/")
                .with_timeout_ms(10_000);

            let response = self.http_client.execute(request).await.map_err(|e| {
                SourceError::unavailable(format!("chart transport error: {}", e.message()))
            })?;

            if response.status == 404 {
                return Err(SourceError::no_data(&req.symbol, req.region));
            }
            if !response.is_success() {
                return Err(SourceError::unavailable(format!(
                    "chart endpoint returned status {}",
                    response.status
                )));
            }

            Self::parse_chart(&req, &response.body)
        })
    }
}

fn range_for_lookback(lookback_days: u32) -> &'static str {
    match lookback_days {
        0..=30 => "1mo",
        31..=90 => "3mo",
        91..=180 => "6mo",
        181..=365 => "1y",
        _ => "2y",
    }
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartData,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Deserialize)]
struct ChartQuote {
    close: Vec<Option<f64>>,
}
