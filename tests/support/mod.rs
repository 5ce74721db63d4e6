//! Scripted in-memory backend shared by the behavior suites.
//!
//! Routes by method and URL: `POST /api/authorize` answers with the scripted
//! authorize response, `POST .../query/` with the submit response, `HEAD`
//! pops the next probe status, and every other request is looked up in the
//! route table (falling back to the fetch body for query result URLs).

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use thinknum_core::{
    Client, ClientConfig, Credentials, HttpClient, HttpError, HttpMethod, HttpRequest,
    HttpResponse,
};

pub const BASE_URL: &str = "http://api.test";

pub const TABLE_BODY: &str = r#"{
    "id": "q-1",
    "state": "complete",
    "total": 2,
    "count": 2,
    "start": 1,
    "fields": [
        {"id": "title", "display_name": "Title", "type": "string"},
        {"id": "as_of_date", "display_name": "As Of", "type": "date", "format": "date"}
    ],
    "rows": [["Engineer", "2021-06-01"], ["Designer", "2021-06-02"]]
}"#;

pub struct ScriptedHttpClient {
    authorize: HttpResponse,
    authorize_delay: Duration,
    submit: HttpResponse,
    probes: Mutex<VecDeque<u16>>,
    probe_fallback: u16,
    fetch: HttpResponse,
    routes: HashMap<(HttpMethod, String), HttpResponse>,
    transport_failure: Option<String>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl Default for ScriptedHttpClient {
    fn default() -> Self {
        Self {
            authorize: HttpResponse::ok_json(r#"{"auth_token":"tok-1"}"#),
            authorize_delay: Duration::ZERO,
            submit: HttpResponse::new(201, r#"{"id":"q-1","state":"running"}"#),
            probes: Mutex::new(VecDeque::new()),
            probe_fallback: 200,
            fetch: HttpResponse::ok_json(TABLE_BODY),
            routes: HashMap::new(),
            transport_failure: None,
            requests: Mutex::new(Vec::new()),
        }
    }
}

impl ScriptedHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_authorize(mut self, response: HttpResponse) -> Self {
        self.authorize = response;
        self
    }

    pub fn with_authorize_delay(mut self, delay: Duration) -> Self {
        self.authorize_delay = delay;
        self
    }

    pub fn with_submit(mut self, response: HttpResponse) -> Self {
        self.submit = response;
        self
    }

    /// Statuses returned by successive probes; `fallback` once exhausted.
    pub fn with_probes(mut self, statuses: &[u16], fallback: u16) -> Self {
        self.probes = Mutex::new(statuses.iter().copied().collect());
        self.probe_fallback = fallback;
        self
    }

    pub fn with_fetch(mut self, response: HttpResponse) -> Self {
        self.fetch = response;
        self
    }

    /// Scripts the response for `method` on `path` (relative to [`BASE_URL`]).
    pub fn with_route(mut self, method: HttpMethod, path: &str, response: HttpResponse) -> Self {
        self.routes
            .insert((method, format!("{BASE_URL}{path}")), response);
        self
    }

    /// Fails every non-authorize request at the transport level.
    pub fn with_transport_failure(mut self, message: &str) -> Self {
        self.transport_failure = Some(message.to_owned());
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .expect("request log should not be poisoned")
            .clone()
    }

    pub fn requests_with(&self, method: HttpMethod) -> Vec<HttpRequest> {
        self.requests()
            .into_iter()
            .filter(|request| request.method == method)
            .collect()
    }

    pub fn authorize_count(&self) -> usize {
        self.requests()
            .iter()
            .filter(|request| request.url.ends_with("/api/authorize"))
            .count()
    }

    fn respond(&self, request: &HttpRequest) -> (Duration, Result<HttpResponse, HttpError>) {
        if request.url.ends_with("/api/authorize") {
            return (self.authorize_delay, Ok(self.authorize.clone()));
        }
        if let Some(message) = &self.transport_failure {
            return (Duration::ZERO, Err(HttpError::new(message.clone())));
        }
        if let Some(response) = self.routes.get(&(request.method, request.url.clone())) {
            return (Duration::ZERO, Ok(response.clone()));
        }

        let response = match request.method {
            HttpMethod::Post if request.url.ends_with("/query/") => self.submit.clone(),
            HttpMethod::Head => {
                let status = self
                    .probes
                    .lock()
                    .expect("probe script should not be poisoned")
                    .pop_front()
                    .unwrap_or(self.probe_fallback);
                HttpResponse::new(status, "")
            }
            HttpMethod::Get if request.url.contains("/query/") => self.fetch.clone(),
            _ => HttpResponse::new(404, r#"{"message":"no scripted route"}"#),
        };
        (Duration::ZERO, Ok(response))
    }
}

impl HttpClient for ScriptedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        let (delay, outcome) = self.respond(&request);
        self.requests
            .lock()
            .expect("request log should not be poisoned")
            .push(request);

        Box::pin(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            outcome
        })
    }
}

pub fn config() -> ClientConfig {
    let credentials = Credentials::new("client-id", "client-secret").expect("valid credentials");
    ClientConfig::new(credentials)
        .with_base_url(BASE_URL)
        .with_poll_interval(Duration::from_secs(1))
        .with_query_timeout(Duration::from_secs(180))
}

pub fn client(http: &Arc<ScriptedHttpClient>) -> Client {
    client_with(config(), http)
}

pub fn client_with(config: ClientConfig, http: &Arc<ScriptedHttpClient>) -> Client {
    Client::with_http_client(config, Arc::clone(http) as Arc<dyn HttpClient>)
}
