use std::time::Duration;

use thiserror::Error;

use crate::http_client::HttpError;

/// Client-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    InvalidFilterComposition,
    AuthenticationFailed,
    JobSubmissionFailed,
    JobStatusCheckFailed,
    QueryTimeout,
    Cancelled,
    Api,
    Transport,
    Decode,
}

/// Every failure surfaced by the client. All variants are terminal; nothing
/// here is retried automatically.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid filter composition: {0}")]
    InvalidFilterComposition(String),

    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("query submission failed: {message}")]
    JobSubmissionFailed { status: u16, message: String },

    #[error("query status check failed with status {status}: {message}")]
    JobStatusCheckFailed { status: u16, message: String },

    #[error("timeout {}s exceeded after {}s", .budget.as_secs(), .elapsed.as_secs())]
    QueryTimeout { budget: Duration, elapsed: Duration },

    #[error("query {job_id} was cancelled")]
    Cancelled { job_id: String },

    #[error("api returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ClientError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn invalid_filter_composition(message: impl Into<String>) -> Self {
        Self::InvalidFilterComposition(message.into())
    }

    pub fn authentication_failed(message: impl Into<String>) -> Self {
        Self::AuthenticationFailed(message.into())
    }

    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::InvalidFilterComposition(_) => ErrorKind::InvalidFilterComposition,
            Self::AuthenticationFailed(_) => ErrorKind::AuthenticationFailed,
            Self::JobSubmissionFailed { .. } => ErrorKind::JobSubmissionFailed,
            Self::JobStatusCheckFailed { .. } => ErrorKind::JobStatusCheckFailed,
            Self::QueryTimeout { .. } => ErrorKind::QueryTimeout,
            Self::Cancelled { .. } => ErrorKind::Cancelled,
            Self::Api { .. } => ErrorKind::Api,
            Self::Transport(_) => ErrorKind::Transport,
            Self::Decode(_) => ErrorKind::Decode,
        }
    }

    /// Stable machine-readable identifier for the error kind.
    pub const fn code(&self) -> &'static str {
        match self.kind() {
            ErrorKind::InvalidArgument => "client.invalid_argument",
            ErrorKind::InvalidFilterComposition => "query.invalid_filter_composition",
            ErrorKind::AuthenticationFailed => "auth.failed",
            ErrorKind::JobSubmissionFailed => "job.submission_failed",
            ErrorKind::JobStatusCheckFailed => "job.status_check_failed",
            ErrorKind::QueryTimeout => "job.timeout",
            ErrorKind::Cancelled => "job.cancelled",
            ErrorKind::Api => "api.status",
            ErrorKind::Transport => "transport.failed",
            ErrorKind::Decode => "transport.decode",
        }
    }

    /// Whether the failure was detected locally, before any network call.
    pub const fn is_local(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::InvalidArgument | ErrorKind::InvalidFilterComposition
        )
    }
}

impl From<HttpError> for ClientError {
    fn from(error: HttpError) -> Self {
        Self::Transport(error.message().to_owned())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(error: serde_json::Error) -> Self {
        Self::Decode(error.to_string())
    }
}
