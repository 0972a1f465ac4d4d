use serde_json::Value;

use synthquant_core::Frequency;
use synthquant_engine::EventSpec;
use synthquant_service::{AssetSpec, CreateDatasetRequest, DatasetService};

use crate::cli::GenerateArgs;
use crate::error::CliError;

pub async fn run(args: &GenerateArgs, service: &DatasetService) -> Result<Value, CliError> {
    let frequency: Frequency = args.frequency.parse().map_err(CliError::Validation)?;

    let assets = args
        .assets
        .iter()
        .map(|raw| parse_asset(raw))
        .collect::<Result<Vec<_>, _>>()?;

    let events = args
        .events
        .iter()
        .map(|raw| serde_json::from_str::<EventSpec>(raw))
        .collect::<Result<Vec<_>, _>>()?;

    let request = CreateDatasetRequest {
        project: args.project.clone(),
        assets,
        frequency,
        horizon_days: args.horizon_days,
        seed: args.seed,
        events,
    };

    let response = service.create_dataset(request).await?;

    if args.full {
        let dataset = service.get_dataset(&response.dataset_id).await?;
        return Ok(serde_json::to_value(dataset.as_ref())?);
    }
    Ok(serde_json::to_value(response)?)
}

/// Parse one `--asset` value.
///
/// `SYMBOL=PRICE` is explicit; `SYMBOL@REGION[:VOL_MULT[:DRIFT_MULT]]` asks
/// for calibration.
fn parse_asset(raw: &str) -> Result<AssetSpec, CliError> {
    if let Some((symbol, price)) = raw.split_once('=') {
        let start_price: f64 = price.parse().map_err(|_| {
            CliError::Command(format!("invalid start price '{price}' in asset '{raw}'"))
        })?;
        return Ok(AssetSpec::Explicit {
            symbol: symbol.to_owned(),
            start_price,
        });
    }

    if let Some((symbol, rest)) = raw.split_once('@') {
        let mut parts = rest.splitn(3, ':');
        let region = parts
            .next()
            .filter(|region| !region.is_empty())
            .ok_or_else(|| CliError::Command(format!("missing region in asset '{raw}'")))?;

        let mut multiplier = |name: &str| -> Result<Option<f64>, CliError> {
            parts
                .next()
                .map(|value| {
                    value.parse().map_err(|_| {
                        CliError::Command(format!("invalid {name} '{value}' in asset '{raw}'"))
                    })
                })
                .transpose()
        };
        let volatility_multiplier = multiplier("volatility multiplier")?;
        let drift_multiplier = multiplier("drift multiplier")?;

        return Ok(AssetSpec::Calibrated {
            symbol: symbol.to_owned(),
            region: region.to_owned(),
            volatility_multiplier,
            drift_multiplier,
        });
    }

    Err(CliError::Command(format!(
        "asset '{raw}' must be SYMBOL=PRICE or SYMBOL@REGION[:VOL_MULT[:DRIFT_MULT]]"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_explicit_asset() {
        let spec = parse_asset("AAPL=150.5").expect("parses");
        assert_eq!(
            spec,
            AssetSpec::Explicit {
                symbol: String::from("AAPL"),
                start_price: 150.5
            }
        );
    }

    #[test]
    fn parses_calibrated_asset_with_multipliers() {
        let spec = parse_asset("RELIANCE@IN:1.5:0.8").expect("parses");
        assert_eq!(
            spec,
            AssetSpec::Calibrated {
                symbol: String::from("RELIANCE"),
                region: String::from("IN"),
                volatility_multiplier: Some(1.5),
                drift_multiplier: Some(0.8),
            }
        );
    }

    #[test]
    fn rejects_bare_symbol() {
        assert!(parse_asset("AAPL").is_err());
    }
}
