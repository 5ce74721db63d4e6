//! CLI argument definitions for the `thinknum` binary.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `datasets` | List datasets, optionally for one ticker |
//! | `metadata` | Show dataset metadata |
//! | `tickers` | Search companies by name or ticker |
//! | `stock` | Daily stock prices for a ticker |
//! | `query` | Build and execute a dataset query |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `-v, --verbose` | off | Debug logging on stderr |
//! | `--base-url` | env / `https://data.thinknum.com` | API base URL |
//! | `--timeout-secs` | env / `180` | Overall query budget |
//! | `--poll-interval-ms` | env / `1000` | Wait between readiness probes |
//!
//! Credentials come from `THINKNUM_CLIENT_ID` and `THINKNUM_CLIENT_SECRET`.
//!
//! # Examples
//!
//! ```bash
//! thinknum datasets --ticker nasdaq:aapl
//! thinknum tickers apple --dataset job_listings
//! thinknum stock nasdaq:aapl --start-date 2021-01-01 --end-date 2021-03-31
//! thinknum query job_listings --file query.json --ticker nasdaq:aapl --limit 50 --pretty
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "thinknum",
    author,
    version,
    about = "Query Thinknum alternative datasets from the command line"
)]
pub struct Cli {
    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Enable debug logging on stderr. `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Override the API base URL.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Overall budget for a query job, in seconds.
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Wait between job readiness probes, in milliseconds.
    #[arg(long, global = true)]
    pub poll_interval_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List datasets visible to the configured credentials.
    ///
    ///   thinknum datasets
    ///   thinknum datasets --ticker nasdaq:aapl
    Datasets(DatasetsArgs),

    /// Show fields, functions and presets of one dataset.
    Metadata(MetadataArgs),

    /// Search companies by name or ticker.
    Tickers(TickersArgs),

    /// Daily stock prices for a ticker.
    Stock(StockArgs),

    /// Build a query and run it to completion.
    ///
    /// The query definition is read from a JSON file shaped like the
    /// request body (`tickers`, `filters`, `groups`, `aggregations`,
    /// `functions`, `sorts`). `--ticker` flags are appended after it.
    ///
    ///   thinknum query job_listings --ticker nasdaq:aapl
    ///   thinknum query store --file query.json --start 101 --limit 100
    Query(QueryArgs),
}

#[derive(Debug, Args)]
pub struct DatasetsArgs {
    /// Only datasets covering this ticker.
    #[arg(long)]
    pub ticker: Option<String>,
}

#[derive(Debug, Args)]
pub struct MetadataArgs {
    /// Dataset id (e.g. `job_listings`).
    pub dataset: String,
}

#[derive(Debug, Args)]
pub struct TickersArgs {
    /// Company name or ticker fragment.
    pub query: String,

    /// Restrict the search to one dataset.
    #[arg(long)]
    pub dataset: Option<String>,
}

#[derive(Debug, Args)]
pub struct StockArgs {
    /// Ticker symbol (e.g. `nasdaq:aapl`).
    pub ticker: String,

    /// First day of the range, `YYYY-MM-DD`.
    #[arg(long, requires = "end_date")]
    pub start_date: Option<String>,

    /// Last day of the range, `YYYY-MM-DD`.
    #[arg(long, requires = "start_date")]
    pub end_date: Option<String>,
}

#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Dataset id to query.
    pub dataset: String,

    /// JSON query definition.
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Ticker to add to the query. Repeatable.
    #[arg(long = "ticker")]
    pub tickers: Vec<String>,

    /// 1-based index of the first row to return.
    #[arg(long)]
    pub start: Option<u64>,

    /// Maximum number of rows to return.
    #[arg(long)]
    pub limit: Option<u64>,
}
