use serde_json::Value;

use synthquant_service::DatasetService;

use crate::cli::{DatasetsArgs, DatasetsCommand};
use crate::error::CliError;

pub async fn run(args: &DatasetsArgs, service: &DatasetService) -> Result<Value, CliError> {
    match &args.command {
        DatasetsCommand::List => {
            let summaries = service.list_datasets().await;
            Ok(serde_json::to_value(summaries)?)
        }
        DatasetsCommand::Show { id } => {
            let dataset = service.get_dataset(id).await?;
            Ok(serde_json::to_value(dataset.as_ref())?)
        }
    }
}
