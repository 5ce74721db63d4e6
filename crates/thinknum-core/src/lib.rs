//! # Thinknum Core
//!
//! Client library for the Thinknum dataset API: a typed query builder and an
//! executor for the asynchronous submit / poll / fetch query protocol.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`catalog`] | Dataset listing, metadata, ticker search, stock prices |
//! | [`client`] | [`Client`] facade |
//! | [`config`] | Credentials and environment configuration |
//! | [`endpoints`] | URL layout of the API |
//! | [`error`] | Error taxonomy |
//! | [`http_client`] | HTTP client abstraction |
//! | [`job`] | Query job lifecycle and pagination |
//! | [`query`] | Query model and builder |
//! | [`response`] | Response payloads |
//! | [`transport`] | Authenticated request layer |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use thinknum_core::{Client, Filter, FilterOperator, QueryBuilder};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::from_env()?;
//!
//!     let mut builder = QueryBuilder::new();
//!     builder
//!         .add_ticker("nasdaq:aapl")?
//!         .add_filter(Filter::simple("title", FilterOperator::Contains, ["engineer"]))?;
//!
//!     let table = client.query("job_listings", builder.model(), None).await?;
//!     println!("{} of {} rows", table.count, table.total);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  QueryBuilder   │──▶ QueryModel (JSON)
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │  JobExecutor    │────▶│ Transport        │
//! │ submit/poll/get │     │ (token, headers) │
//! └─────────────────┘     └────────┬─────────┘
//!                                  ▼
//!                         ┌──────────────────┐
//!                         │ HttpClient       │
//!                         │ (reqwest/mock)   │
//!                         └──────────────────┘
//! ```

pub mod catalog;
pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod http_client;
pub mod job;
pub mod query;
pub mod response;
pub mod transport;

pub use catalog::DateRange;
pub use client::Client;
pub use config::{ClientConfig, Credentials};
pub use endpoints::Endpoints;
pub use error::{ClientError, ErrorKind};
pub use http_client::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, ReqwestHttpClient,
};
pub use job::{
    CancellationFlag, JobExecutor, JobState, PageRequest, Pagination, PollSettings, QueryJob,
};
pub use query::{
    Aggregation, AggregationFunction, ComplexFilter, Filter, FilterMatch, FilterOperator,
    FilterValue, Group, GroupPartition, QueryBuilder, QueryDefinition, QueryFunction, QueryModel,
    SimpleFilter, Sort, SortOrder,
};
pub use response::{
    Company, CompanyEntity, CreateQueryResponse, Dataset, DatasetField, DatasetFieldType,
    DatasetMetadata, FunctionInfo, QueryFormat, StockPrice, TableResult,
};
pub use transport::Transport;
