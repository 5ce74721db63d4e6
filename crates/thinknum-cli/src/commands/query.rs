use std::fs;
use std::path::Path;

use serde_json::Value;
use thinknum_core::{Client, PageRequest, QueryBuilder, QueryDefinition};
use tracing::info;

use crate::cli::QueryArgs;
use crate::error::CliError;

pub async fn run(client: &Client, args: &QueryArgs) -> Result<Value, CliError> {
    let builder = build_query(args)?;
    let pagination = page_request(args);

    info!(dataset = %args.dataset.trim(), "running query");
    let table = client
        .query(&args.dataset, builder.model(), pagination)
        .await?;
    Ok(serde_json::to_value(table)?)
}

fn build_query(args: &QueryArgs) -> Result<QueryBuilder, CliError> {
    let mut builder = match &args.file {
        Some(path) => QueryBuilder::from_definition(load_definition(path)?)?,
        None => QueryBuilder::new(),
    };
    for ticker in &args.tickers {
        builder.add_ticker(ticker)?;
    }
    Ok(builder)
}

fn load_definition(path: &Path) -> Result<QueryDefinition, CliError> {
    let contents = fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|error| {
        CliError::Command(format!(
            "invalid query definition in {}: {error}",
            path.display()
        ))
    })
}

fn page_request(args: &QueryArgs) -> Option<PageRequest> {
    if args.start.is_none() && args.limit.is_none() {
        return None;
    }
    Some(PageRequest {
        start: args.start,
        limit: args.limit,
    })
}
