//! Catalog endpoints: dataset listing, metadata, ticker search and stock
//! prices. These are stateless request/response calls.

use serde::Serialize;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::Date;
use tracing::debug;

use crate::client::Client;
use crate::endpoints::query_string;
use crate::error::ClientError;
use crate::http_client::HttpRequest;
use crate::response::{
    Company, Dataset, DatasetList, DatasetMetadata, StockPrice, StockPriceResponse,
    TickersResponse,
};

/// Inclusive `YYYY-MM-DD` date range for stock price lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start_date: String,
    end_date: String,
}

impl DateRange {
    pub fn new(start_date: &str, end_date: &str) -> Result<Self, ClientError> {
        let start_date = start_date.trim();
        let end_date = end_date.trim();
        if start_date.is_empty() || end_date.is_empty() {
            return Err(ClientError::invalid_argument(
                "both startDate and endDate are required when specifying range",
            ));
        }

        if parse_day(start_date).is_none() {
            return Err(ClientError::invalid_argument(
                "invalid startDate format, please use YYYY-MM-DD",
            ));
        }
        if parse_day(end_date).is_none() {
            return Err(ClientError::invalid_argument(
                "invalid endDate format, please use YYYY-MM-DD",
            ));
        }

        Ok(Self {
            start_date: start_date.to_owned(),
            end_date: end_date.to_owned(),
        })
    }

    pub fn start_date(&self) -> &str {
        &self.start_date
    }

    pub fn end_date(&self) -> &str {
        &self.end_date
    }
}

const DAY_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

fn parse_day(value: &str) -> Option<Date> {
    Date::parse(value, DAY_FORMAT).ok()
}

fn required(value: &str, what: &str) -> Result<String, ClientError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ClientError::invalid_argument(format!(
            "missing or invalid {what}"
        )));
    }
    Ok(value.to_owned())
}

impl Client {
    /// Lists every dataset visible to the credentials.
    pub async fn datasets(&self) -> Result<Vec<Dataset>, ClientError> {
        let url = self.transport().endpoints().datasets();
        let list: DatasetList = self.transport().call_json(HttpRequest::get(url)).await?;
        Ok(list.datasets)
    }

    /// Lists datasets that cover `ticker`.
    pub async fn ticker_datasets(&self, ticker: &str) -> Result<Vec<Dataset>, ClientError> {
        let ticker = required(ticker, "ticker")?;
        let url = format!(
            "{}{}",
            self.transport().endpoints().datasets(),
            query_string([("ticker", ticker)])
        );
        let list: DatasetList = self.transport().call_json(HttpRequest::get(url)).await?;
        Ok(list.datasets)
    }

    pub async fn dataset_metadata(&self, dataset_id: &str) -> Result<DatasetMetadata, ClientError> {
        let dataset_id = required(dataset_id, "datasetId")?;
        let url = self.transport().endpoints().dataset_metadata(&dataset_id);
        self.transport().call_json(HttpRequest::get(url)).await
    }

    /// Searches companies by name or ticker, optionally within one dataset.
    pub async fn search_tickers(
        &self,
        query: &str,
        dataset_id: Option<&str>,
    ) -> Result<Vec<Company>, ClientError> {
        let query = required(query, "query")?;
        let endpoints = self.transport().endpoints();
        let base = match dataset_id {
            Some(dataset_id) => endpoints.dataset_tickers(&required(dataset_id, "datasetId")?),
            None => endpoints.tickers(),
        };
        let url = format!("{base}{}", query_string([("query", query.clone())]));

        let mut response: TickersResponse =
            self.transport().call_json(HttpRequest::get(url)).await?;
        let matches = response.queries.remove(&query).unwrap_or_default();
        debug!(query = %query, matches = matches.len(), "ticker search finished");
        Ok(matches)
    }

    /// Daily stock prices for `ticker`, optionally limited to `range`.
    pub async fn stock_price(
        &self,
        ticker: &str,
        range: Option<&DateRange>,
    ) -> Result<Vec<StockPrice>, ClientError> {
        let ticker = required(ticker, "ticker")?;
        let body = match range {
            Some(range) => serde_json::to_string(range)?,
            None => String::from("{}"),
        };

        let url = self.transport().endpoints().stock(&ticker);
        let response: StockPriceResponse = self
            .transport()
            .call_json(HttpRequest::post(url).with_json_body(body))
            .await?;
        debug!(ticker = %ticker, points = response.count, "stock prices received");
        Ok(response.results)
    }
}
