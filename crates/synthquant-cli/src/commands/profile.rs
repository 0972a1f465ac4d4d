use serde_json::Value;

use synthquant_service::{DatasetService, ProfileRequest};

use crate::cli::ProfileArgs;
use crate::error::CliError;

pub async fn run(args: &ProfileArgs, service: &DatasetService) -> Result<Value, CliError> {
    let response = service
        .profile(ProfileRequest {
            symbol: args.symbol.clone(),
            region: args.region.clone(),
        })
        .await?;

    Ok(serde_json::to_value(response)?)
}
