//! Client configuration.
//!
//! Values come from the environment with builder-style overrides on top:
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `THINKNUM_CLIENT_ID` | required | API client id |
//! | `THINKNUM_CLIENT_SECRET` | required | API client secret |
//! | `THINKNUM_BASE_URL` | `https://data.thinknum.com` | API root |
//! | `THINKNUM_QUERY_TIMEOUT_SECS` | `180` | Overall budget for one query job |
//! | `THINKNUM_POLL_INTERVAL_MS` | `1000` | Wait between readiness probes |
//! | `THINKNUM_REQUEST_TIMEOUT_MS` | `30000` | Per-request HTTP timeout |

use std::fmt::{Debug, Formatter};
use std::time::Duration;

use crate::endpoints::DEFAULT_BASE_URL;
use crate::error::ClientError;

pub const API_VERSION: &str = "20151130";
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(180);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub const ENV_CLIENT_ID: &str = "THINKNUM_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "THINKNUM_CLIENT_SECRET";
pub const ENV_BASE_URL: &str = "THINKNUM_BASE_URL";
pub const ENV_QUERY_TIMEOUT_SECS: &str = "THINKNUM_QUERY_TIMEOUT_SECS";
pub const ENV_POLL_INTERVAL_MS: &str = "THINKNUM_POLL_INTERVAL_MS";
pub const ENV_REQUEST_TIMEOUT_MS: &str = "THINKNUM_REQUEST_TIMEOUT_MS";

/// API credentials. The secret never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    client_id: String,
    client_secret: String,
}

impl Credentials {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self, ClientError> {
        let client_id = client_id.into();
        let client_secret = client_secret.into();

        if client_id.trim().is_empty() {
            return Err(ClientError::invalid_argument("invalid clientId"));
        }
        if client_secret.trim().is_empty() {
            return Err(ClientError::invalid_argument("invalid clientSecret"));
        }

        Ok(Self {
            client_id,
            client_secret,
        })
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub(crate) fn client_secret(&self) -> &str {
        &self.client_secret
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Everything a [`Client`](crate::Client) needs to reach the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub credentials: Credentials,
    pub base_url: String,
    pub api_version: String,
    pub user_agent: String,
    pub request_timeout: Duration,
    pub query_timeout: Duration,
    pub poll_interval: Duration,
}

impl ClientConfig {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            base_url: String::from(DEFAULT_BASE_URL),
            api_version: String::from(API_VERSION),
            user_agent: format!("thinknum-rust/{}", env!("CARGO_PKG_VERSION")),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Reads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let client_id = lookup(ENV_CLIENT_ID).unwrap_or_default();
        let client_secret = lookup(ENV_CLIENT_SECRET).unwrap_or_default();
        let mut config = Self::new(Credentials::new(client_id, client_secret)?);

        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|value| !value.trim().is_empty()) {
            config.base_url = base_url;
        }
        if let Some(secs) = parse_number(&lookup, ENV_QUERY_TIMEOUT_SECS)? {
            config.query_timeout = Duration::from_secs(secs);
        }
        if let Some(ms) = parse_number(&lookup, ENV_POLL_INTERVAL_MS)? {
            config.poll_interval = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_number(&lookup, ENV_REQUEST_TIMEOUT_MS)? {
            config.request_timeout = Duration::from_millis(ms);
        }

        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

fn parse_number<F>(lookup: &F, name: &str) -> Result<Option<u64>, ClientError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw.trim().parse::<u64>().map(Some).map_err(|_| {
            ClientError::invalid_argument(format!("{name} must be a non-negative integer: '{raw}'"))
        }),
    }
}
