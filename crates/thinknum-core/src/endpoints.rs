//! URL layout of the dataset API.

pub const DEFAULT_BASE_URL: &str = "https://data.thinknum.com";

/// Resolves API routes against a base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl Endpoints {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_owned(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn authorize(&self) -> String {
        format!("{}/api/authorize", self.base_url)
    }

    pub fn datasets(&self) -> String {
        format!("{}/datasets/", self.base_url)
    }

    pub fn dataset_metadata(&self, dataset_id: &str) -> String {
        format!("{}/datasets/{dataset_id}", self.base_url)
    }

    pub fn dataset_tickers(&self, dataset_id: &str) -> String {
        format!("{}/datasets/{dataset_id}/tickers/", self.base_url)
    }

    pub fn tickers(&self) -> String {
        format!("{}/tickers/", self.base_url)
    }

    pub fn stock(&self, ticker: &str) -> String {
        format!("{}/companies/stock/{ticker}", self.base_url)
    }

    pub fn query(&self, dataset_id: &str) -> String {
        format!("{}/datasets/{dataset_id}/query/", self.base_url)
    }

    pub fn query_by_id(&self, dataset_id: &str, query_id: &str) -> String {
        format!("{}/datasets/{dataset_id}/query/{query_id}", self.base_url)
    }
}

/// Renders `?key=value&...` with each value percent-encoded.
pub fn query_string<'a>(params: impl IntoIterator<Item = (&'a str, String)>) -> String {
    let encoded = params
        .into_iter()
        .map(|(key, value)| format!("{key}={}", urlencoding::encode(&value)))
        .collect::<Vec<_>>();

    if encoded.is_empty() {
        String::new()
    } else {
        format!("?{}", encoded.join("&"))
    }
}
