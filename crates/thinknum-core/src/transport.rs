//! Authenticated request layer.
//!
//! [`Transport`] wraps an [`HttpClient`] with the API's authentication
//! scheme. The bearer token is acquired lazily on the first call and reused
//! for the lifetime of the transport. Acquisition is single-flight: the token
//! slot stays locked while the authorize request is in flight, so concurrent
//! first callers wait for one authentication instead of racing.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::{ClientConfig, Credentials};
use crate::endpoints::Endpoints;
use crate::error::ClientError;
use crate::http_client::{HttpClient, HttpRequest, HttpResponse};

pub const JSON_MEDIA_TYPE: &str = "application/json";

#[derive(Debug, Deserialize)]
struct AuthorizeResponse {
    #[serde(default)]
    auth_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

pub struct Transport {
    http_client: Arc<dyn HttpClient>,
    endpoints: Endpoints,
    credentials: Credentials,
    api_version: String,
    user_agent: String,
    request_timeout_ms: u64,
    token: Mutex<Option<String>>,
}

impl Transport {
    pub fn new(config: &ClientConfig, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            endpoints: Endpoints::new(config.base_url.clone()),
            credentials: config.credentials.clone(),
            api_version: config.api_version.clone(),
            user_agent: config.user_agent.clone(),
            request_timeout_ms: u64::try_from(config.request_timeout.as_millis())
                .unwrap_or(u64::MAX),
            token: Mutex::new(None),
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Executes an authenticated request and returns the response whatever
    /// its status. Callers decide which statuses count as success.
    pub async fn call(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        let token = self.token().await?;
        let request = request
            .with_default_header("accept", JSON_MEDIA_TYPE)
            .with_default_header("authorization", format!("token {token}"))
            .with_default_header("x-api-version", self.api_version.clone())
            .with_default_header("user-agent", self.user_agent.clone())
            .with_timeout_ms(self.request_timeout_ms);

        debug!(method = %request.method, url = %request.url, "sending request");
        let response = self.http_client.execute(request).await?;
        debug!(status = response.status, "received response");
        Ok(response)
    }

    /// Executes a request, requires a 2xx status and decodes the JSON body.
    pub async fn call_json<T>(&self, request: HttpRequest) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        let response = self.call(request).await?;
        if !response.is_success() {
            return Err(ClientError::Api {
                status: response.status,
                message: error_message(&response),
            });
        }

        serde_json::from_str(&response.body).map_err(ClientError::from)
    }

    /// Drops the cached token; the next call authenticates again.
    pub async fn invalidate_token(&self) {
        *self.token.lock().await = None;
    }

    pub async fn has_token(&self) -> bool {
        self.token.lock().await.is_some()
    }

    async fn token(&self) -> Result<String, ClientError> {
        let mut slot = self.token.lock().await;
        if let Some(token) = slot.as_ref() {
            return Ok(token.clone());
        }

        let token = self.authenticate().await?;
        *slot = Some(token.clone());
        Ok(token)
    }

    async fn authenticate(&self) -> Result<String, ClientError> {
        info!(client_id = %self.credentials.client_id(), "authenticating");

        let request = HttpRequest::post(self.endpoints.authorize())
            .with_header("user-agent", self.user_agent.clone())
            .with_form([
                ("version", self.api_version.as_str()),
                ("client_id", self.credentials.client_id()),
                ("client_secret", self.credentials.client_secret()),
            ])
            .with_timeout_ms(self.request_timeout_ms);

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|error| ClientError::authentication_failed(error.message()))?;

        if !response.is_success() {
            warn!(status = response.status, "authorize request rejected");
            return Err(ClientError::authentication_failed(error_message(&response)));
        }

        let body: AuthorizeResponse = serde_json::from_str(&response.body).map_err(|error| {
            ClientError::authentication_failed(format!("unreadable authorize response: {error}"))
        })?;

        match body.auth_token {
            Some(token) if !token.is_empty() => {
                info!("auth token received");
                Ok(token)
            }
            _ => Err(ClientError::authentication_failed(
                "invalid or missing auth_token",
            )),
        }
    }
}

/// Best human-readable message for a failed response: the JSON `message`
/// field, then the raw body text, then the status reason phrase. Never empty.
pub fn error_message(response: &HttpResponse) -> String {
    if let Ok(ErrorBody {
        message: Some(message),
    }) = serde_json::from_str::<ErrorBody>(&response.body)
    {
        if !message.trim().is_empty() {
            return message;
        }
    }

    let text = response.body.trim();
    if !text.is_empty() {
        return text.to_owned();
    }

    response
        .reason_phrase()
        .map(str::to_owned)
        .unwrap_or_else(|| format!("HTTP status {}", response.status))
}
