mod datasets;
mod generate;
mod profile;

use std::sync::Arc;

use serde_json::Value;

use synthquant_core::{
    FixtureHistorySource, HistorySource, MarketProfiler, Region, ReqwestHttpClient, Symbol,
    YahooHistorySource,
};
use synthquant_service::{DatasetRegistry, DatasetService};

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub async fn run(cli: &Cli) -> Result<Value, CliError> {
    let service = build_service(cli.offline)?;

    match &cli.command {
        Command::Profile(args) => profile::run(args, &service).await,
        Command::Generate(args) => generate::run(args, &service).await,
        Command::Datasets(args) => datasets::run(args, &service).await,
    }
}

fn build_service(offline: bool) -> Result<DatasetService, CliError> {
    let source: Arc<dyn HistorySource> = if offline {
        Arc::new(seeded_fixture()?)
    } else {
        Arc::new(YahooHistorySource::new(Arc::new(ReqwestHttpClient::new())))
    };

    Ok(DatasetService::new(
        Arc::new(DatasetRegistry::new()),
        Arc::new(MarketProfiler::new(source)),
    ))
}

/// Offline source preloaded with a few well-known symbols, so `--offline`
/// runs work without any network access.
fn seeded_fixture() -> Result<FixtureHistorySource, CliError> {
    let fixture = FixtureHistorySource::new();
    for (raw, region, start_close) in [
        ("AAPL", Region::Us, 180.0),
        ("MSFT", Region::Us, 410.0),
        ("RELIANCE", Region::In, 2850.0),
        ("TCS", Region::In, 3900.0),
    ] {
        let symbol = Symbol::parse(raw)?;
        fixture.insert_linear(&symbol, region, start_close, 250);
    }
    Ok(fixture)
}
