//! # Query Jobs
//!
//! The backend computes query results asynchronously. Executing a query is a
//! three-step protocol:
//!
//! 1. **Submit**: `POST /datasets/{id}/query/` with the materialized query.
//!    The backend answers `201 Created` with a job id.
//! 2. **Poll**: `HEAD` the job's result URL. `202 Accepted` means still
//!    running, `200 OK` means ready. Probes repeat at a fixed interval until
//!    the overall deadline runs out.
//! 3. **Fetch**: `GET` the same URL, with the same pagination query string,
//!    to download the table.
//!
//! ```text
//! created ──▶ running ──▶ ready
//!    │           │
//!    ▼           ├──▶ timed-out
//!  failed        └──▶ cancelled
//! ```
//!
//! The deadline is measured from the moment [`JobExecutor::submit`] is
//! called, so a slow submission counts against the budget.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::config::{ClientConfig, DEFAULT_POLL_INTERVAL, DEFAULT_QUERY_TIMEOUT};
use crate::endpoints::query_string;
use crate::error::ClientError;
use crate::http_client::HttpRequest;
use crate::query::QueryModel;
use crate::response::{CreateQueryResponse, QueryFormat, TableResult};
use crate::transport::{error_message, Transport};

pub const DEFAULT_PAGE_START: u64 = 1;
pub const DEFAULT_PAGE_LIMIT: u64 = 100_000;

const STATUS_OK: u16 = 200;
const STATUS_CREATED: u16 = 201;
const STATUS_ACCEPTED: u16 = 202;

/// Window of result rows to return. `start` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    start: u64,
    limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            start: DEFAULT_PAGE_START,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl Pagination {
    pub fn new(start: u64, limit: u64) -> Result<Self, ClientError> {
        if start < 1 {
            return Err(ClientError::invalid_argument(
                "pagination start needs to be >= 1",
            ));
        }
        if limit < 1 {
            return Err(ClientError::invalid_argument(
                "pagination limit needs to be >= 1",
            ));
        }
        Ok(Self { start, limit })
    }

    /// Applies the fields present in `request` over the defaults.
    pub fn resolve(request: Option<PageRequest>) -> Result<Self, ClientError> {
        let defaults = Self::default();
        match request {
            None => Ok(defaults),
            Some(request) => Self::new(
                request.start.unwrap_or(defaults.start),
                request.limit.unwrap_or(defaults.limit),
            ),
        }
    }

    pub const fn start(&self) -> u64 {
        self.start
    }

    pub const fn limit(&self) -> u64 {
        self.limit
    }

    /// `?start=<n>&limit=<n>`, shared verbatim by probe and fetch.
    pub fn query_string(&self) -> String {
        query_string([
            ("start", self.start.to_string()),
            ("limit", self.limit.to_string()),
        ])
    }
}

/// Caller-supplied pagination; absent fields keep their defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub start: Option<u64>,
    pub limit: Option<u64>,
}

impl PageRequest {
    pub const fn new(start: u64, limit: u64) -> Self {
        Self {
            start: Some(start),
            limit: Some(limit),
        }
    }

    pub const fn with_start(mut self, start: u64) -> Self {
        self.start = Some(start);
        self
    }

    pub const fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Created,
    Running,
    Ready,
    Failed,
    TimedOut,
    Cancelled,
}

impl JobState {
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Ready | Self::Failed | Self::TimedOut | Self::Cancelled
        )
    }
}

/// Handle to a submitted query job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryJob {
    id: String,
    dataset_id: String,
    pagination: Pagination,
    result_url: String,
    state: JobState,
    started_at: Instant,
}

impl QueryJob {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn dataset_id(&self) -> &str {
        &self.dataset_id
    }

    pub const fn pagination(&self) -> Pagination {
        self.pagination
    }

    /// Result URL including the pagination query string.
    pub fn result_url(&self) -> &str {
        &self.result_url
    }

    pub const fn state(&self) -> JobState {
        self.state
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

/// Timing for the readiness poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Overall budget, measured from submission.
    pub timeout: Duration,
    /// Constant wait between probes.
    pub interval: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_QUERY_TIMEOUT,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl From<&ClientConfig> for PollSettings {
    fn from(config: &ClientConfig) -> Self {
        Self {
            timeout: config.query_timeout,
            interval: config.poll_interval,
        }
    }
}

/// Cooperative cancellation for a running query. Clones share one flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Drives query jobs through submit, poll and fetch.
#[derive(Clone)]
pub struct JobExecutor {
    transport: Arc<Transport>,
    settings: PollSettings,
}

impl JobExecutor {
    pub fn new(transport: Arc<Transport>, settings: PollSettings) -> Self {
        Self {
            transport,
            settings,
        }
    }

    pub const fn settings(&self) -> PollSettings {
        self.settings
    }

    /// Submits `model`, waits for the job and returns the requested page.
    pub async fn execute(
        &self,
        dataset_id: &str,
        model: &QueryModel,
        pagination: Option<PageRequest>,
    ) -> Result<TableResult, ClientError> {
        self.run(dataset_id, model, pagination, None).await
    }

    /// Same as [`execute`](Self::execute), but gives up with
    /// [`ClientError::Cancelled`] once `cancel` is set.
    pub async fn execute_with_cancel(
        &self,
        dataset_id: &str,
        model: &QueryModel,
        pagination: Option<PageRequest>,
        cancel: &CancellationFlag,
    ) -> Result<TableResult, ClientError> {
        self.run(dataset_id, model, pagination, Some(cancel)).await
    }

    async fn run(
        &self,
        dataset_id: &str,
        model: &QueryModel,
        pagination: Option<PageRequest>,
        cancel: Option<&CancellationFlag>,
    ) -> Result<TableResult, ClientError> {
        let span = info_span!(
            "query_job",
            execution = %Uuid::new_v4(),
            dataset = %dataset_id.trim()
        );

        async move {
            let mut job = self.submit(dataset_id, model, pagination).await?;
            self.wait_until_ready(&mut job, cancel).await?;
            self.fetch(&job).await
        }
        .instrument(span)
        .await
    }

    /// Validates arguments and creates the job. No request is sent when the
    /// dataset id or pagination is invalid.
    pub async fn submit(
        &self,
        dataset_id: &str,
        model: &QueryModel,
        pagination: Option<PageRequest>,
    ) -> Result<QueryJob, ClientError> {
        let started_at = Instant::now();

        let dataset_id = dataset_id.trim();
        if dataset_id.is_empty() {
            return Err(ClientError::invalid_argument("missing or invalid datasetId"));
        }
        let pagination = Pagination::resolve(pagination)?;

        let endpoints = self.transport.endpoints();
        let request =
            HttpRequest::post(endpoints.query(dataset_id)).with_json_body(model.to_json()?);
        let response = self.transport.call(request).await?;
        let status = response.status;

        if status != STATUS_CREATED {
            warn!(status, "query submission rejected");
            return Err(ClientError::JobSubmissionFailed {
                status,
                message: error_message(&response),
            });
        }

        let created: CreateQueryResponse =
            serde_json::from_str(&response.body).map_err(|error| {
                ClientError::JobSubmissionFailed {
                    status,
                    message: format!("unreadable create response: {error}"),
                }
            })?;

        let id = match created {
            CreateQueryResponse { id: Some(id), .. } if !id.trim().is_empty() => id,
            CreateQueryResponse { message, .. } => {
                return Err(ClientError::JobSubmissionFailed {
                    status,
                    message: message
                        .filter(|message| !message.trim().is_empty())
                        .unwrap_or_else(|| String::from("response did not include a query id")),
                })
            }
        };

        info!(job_id = %id, "query created");
        let result_url = format!(
            "{}{}",
            endpoints.query_by_id(dataset_id, &id),
            pagination.query_string()
        );

        Ok(QueryJob {
            id,
            dataset_id: dataset_id.to_owned(),
            pagination,
            result_url,
            state: JobState::Created,
            started_at,
        })
    }

    /// Probes the job until it is ready, fails, times out or is cancelled.
    pub async fn wait_until_ready(
        &self,
        job: &mut QueryJob,
        cancel: Option<&CancellationFlag>,
    ) -> Result<(), ClientError> {
        if job.state == JobState::Ready {
            return Ok(());
        }
        if job.state.is_terminal() {
            return Err(ClientError::invalid_argument(format!(
                "query {} already finished as {:?}",
                job.id, job.state
            )));
        }

        job.state = JobState::Running;
        loop {
            if cancel.is_some_and(CancellationFlag::is_cancelled) {
                job.state = JobState::Cancelled;
                info!(job_id = %job.id, "query cancelled");
                return Err(ClientError::Cancelled {
                    job_id: job.id.clone(),
                });
            }

            let probe = HttpRequest::head(job.result_url.clone())
                .with_header("accept", QueryFormat::Table.media_type());
            let response = match self.transport.call(probe).await {
                Ok(response) => response,
                Err(error) => {
                    job.state = JobState::Failed;
                    return Err(error);
                }
            };

            match response.status {
                STATUS_OK => {
                    job.state = JobState::Ready;
                    info!(job_id = %job.id, elapsed_ms = job.elapsed().as_millis() as u64, "query ready");
                    return Ok(());
                }
                STATUS_ACCEPTED => {
                    let elapsed = job.elapsed();
                    if elapsed > self.settings.timeout {
                        job.state = JobState::TimedOut;
                        warn!(
                            job_id = %job.id,
                            budget_secs = self.settings.timeout.as_secs(),
                            "query timed out"
                        );
                        return Err(ClientError::QueryTimeout {
                            budget: self.settings.timeout,
                            elapsed,
                        });
                    }

                    debug!(job_id = %job.id, elapsed_ms = elapsed.as_millis() as u64, "query running");
                    tokio::time::sleep(self.settings.interval).await;
                }
                status => {
                    job.state = JobState::Failed;
                    warn!(job_id = %job.id, status, "query status check failed");
                    return Err(ClientError::JobStatusCheckFailed {
                        status,
                        message: error_message(&response),
                    });
                }
            }
        }
    }

    /// Downloads the result table of a ready job.
    pub async fn fetch(&self, job: &QueryJob) -> Result<TableResult, ClientError> {
        if job.state != JobState::Ready {
            return Err(ClientError::invalid_argument(format!(
                "query {} is not ready (state {:?})",
                job.id, job.state
            )));
        }

        info!(job_id = %job.id, "fetching query result");
        let request = HttpRequest::get(job.result_url.clone())
            .with_header("accept", QueryFormat::Table.media_type());
        self.transport.call_json(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults_cover_first_hundred_thousand_rows() {
        let pagination = Pagination::resolve(None).expect("defaults are valid");
        assert_eq!(pagination.start(), 1);
        assert_eq!(pagination.limit(), 100_000);
        assert_eq!(pagination.query_string(), "?start=1&limit=100000");
    }

    #[test]
    fn pagination_overrides_only_present_fields() {
        let pagination =
            Pagination::resolve(Some(PageRequest::default().with_start(3))).expect("valid");
        assert_eq!(pagination, Pagination::new(3, 100_000).expect("valid"));

        let pagination =
            Pagination::resolve(Some(PageRequest::default().with_limit(10))).expect("valid");
        assert_eq!(pagination.query_string(), "?start=1&limit=10");
    }

    #[test]
    fn pagination_rejects_zero_start_or_limit() {
        let error = Pagination::resolve(Some(PageRequest::new(0, 10))).expect_err("start 0");
        assert_eq!(error, ClientError::invalid_argument("pagination start needs to be >= 1"));

        let error = Pagination::resolve(Some(PageRequest::new(1, 0))).expect_err("limit 0");
        assert_eq!(error, ClientError::invalid_argument("pagination limit needs to be >= 1"));
    }

    #[test]
    fn terminal_states() {
        assert!(!JobState::Created.is_terminal());
        assert!(!JobState::Running.is_terminal());
        assert!(JobState::Ready.is_terminal());
        assert!(JobState::TimedOut.is_terminal());
        assert!(JobState::Cancelled.is_terminal());
    }

    #[test]
    fn cancellation_flag_is_shared_between_clones() {
        let flag = CancellationFlag::new();
        let observer = flag.clone();
        assert!(!observer.is_cancelled());
        flag.cancel();
        assert!(observer.is_cancelled());
    }
}
