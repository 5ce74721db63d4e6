mod catalog;
mod query;

use std::time::Duration;

use serde_json::Value;
use thinknum_core::{Client, ClientConfig};
use tracing::debug;

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub async fn run(cli: &Cli) -> Result<Value, CliError> {
    let client = Client::new(configure(ClientConfig::from_env()?, cli));
    debug!(base_url = %client.config().base_url, "client configured");

    match &cli.command {
        Command::Datasets(args) => catalog::datasets(&client, args).await,
        Command::Metadata(args) => catalog::metadata(&client, args).await,
        Command::Tickers(args) => catalog::tickers(&client, args).await,
        Command::Stock(args) => catalog::stock(&client, args).await,
        Command::Query(args) => query::run(&client, args).await,
    }
}

/// Applies command-line overrides on top of the environment.
fn configure(mut config: ClientConfig, cli: &Cli) -> ClientConfig {
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url.clone());
    }
    if let Some(secs) = cli.timeout_secs {
        config = config.with_query_timeout(Duration::from_secs(secs));
    }
    if let Some(ms) = cli.poll_interval_ms {
        config = config.with_poll_interval(Duration::from_millis(ms));
    }
    config
}
