use serde_json::{json, Value};
use thinknum_core::{Client, DateRange};

use crate::cli::{DatasetsArgs, MetadataArgs, StockArgs, TickersArgs};
use crate::error::CliError;

pub async fn datasets(client: &Client, args: &DatasetsArgs) -> Result<Value, CliError> {
    let datasets = match &args.ticker {
        Some(ticker) => client.ticker_datasets(ticker).await?,
        None => client.datasets().await?,
    };
    Ok(json!({ "datasets": datasets }))
}

pub async fn metadata(client: &Client, args: &MetadataArgs) -> Result<Value, CliError> {
    let metadata = client.dataset_metadata(&args.dataset).await?;
    Ok(serde_json::to_value(metadata)?)
}

pub async fn tickers(client: &Client, args: &TickersArgs) -> Result<Value, CliError> {
    let companies = client
        .search_tickers(&args.query, args.dataset.as_deref())
        .await?;
    Ok(json!({ "query": args.query.trim(), "results": companies }))
}

pub async fn stock(client: &Client, args: &StockArgs) -> Result<Value, CliError> {
    let range = match (&args.start_date, &args.end_date) {
        (Some(start), Some(end)) => Some(DateRange::new(start, end)?),
        (None, None) => None,
        _ => {
            return Err(CliError::Command(String::from(
                "--start-date and --end-date must be given together",
            )))
        }
    };

    let prices = client.stock_price(&args.ticker, range.as_ref()).await?;
    Ok(json!({ "ticker": args.ticker.trim(), "count": prices.len(), "results": prices }))
}
