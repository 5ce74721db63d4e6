use std::sync::Arc;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::http_client::{HttpClient, ReqwestHttpClient};
use crate::job::{CancellationFlag, JobExecutor, PageRequest, PollSettings};
use crate::query::QueryModel;
use crate::response::TableResult;
use crate::transport::Transport;

/// Entry point to the dataset API.
///
/// One client owns one authenticated [`Transport`]; clones share it, so the
/// token is fetched once per client no matter how many tasks use it.
#[derive(Clone)]
pub struct Client {
    config: ClientConfig,
    transport: Arc<Transport>,
}

impl Client {
    /// Client backed by reqwest.
    pub fn new(config: ClientConfig) -> Self {
        let http_client = Arc::new(ReqwestHttpClient::new(&config.user_agent));
        Self::with_http_client(config, http_client)
    }

    /// Client configured from `THINKNUM_*` environment variables.
    pub fn from_env() -> Result<Self, ClientError> {
        ClientConfig::from_env().map(Self::new)
    }

    pub fn with_http_client(config: ClientConfig, http_client: Arc<dyn HttpClient>) -> Self {
        let transport = Arc::new(Transport::new(&config, http_client));
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &Arc<Transport> {
        &self.transport
    }

    /// Job executor sharing this client's transport and poll settings.
    pub fn executor(&self) -> JobExecutor {
        JobExecutor::new(Arc::clone(&self.transport), PollSettings::from(&self.config))
    }

    /// Runs `query` against `dataset_id` and returns one page of results.
    pub async fn query(
        &self,
        dataset_id: &str,
        query: &QueryModel,
        pagination: Option<PageRequest>,
    ) -> Result<TableResult, ClientError> {
        self.executor().execute(dataset_id, query, pagination).await
    }

    pub async fn query_with_cancel(
        &self,
        dataset_id: &str,
        query: &QueryModel,
        pagination: Option<PageRequest>,
        cancel: &CancellationFlag,
    ) -> Result<TableResult, ClientError> {
        self.executor()
            .execute_with_cancel(dataset_id, query, pagination, cancel)
            .await
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
