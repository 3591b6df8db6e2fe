//! Named asynchronous fetches with exactly-once completion callbacks.

use std::{fmt, io::ErrorKind, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{header::ACCEPT, Client};
use shared::protocol::{HttpMethod, RequestName, RequestRegistry, RequestSpec};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Success,
    Error,
    Timeout,
}

impl FetchStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            FetchStatus::Success => "success",
            FetchStatus::Error => "error",
            FetchStatus::Timeout => "timeout",
        }
    }
}

impl fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result/status pair handed to a request's completion callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: FetchStatus,
    pub http_status: Option<u16>,
    pub body: String,
}

impl FetchResponse {
    pub fn success(body: impl Into<String>) -> Self {
        Self {
            status: FetchStatus::Success,
            http_status: Some(200),
            body: body.into(),
        }
    }

    pub fn failure(status: FetchStatus, http_status: Option<u16>) -> Self {
        Self {
            status,
            http_status,
            body: String::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == FetchStatus::Success
    }
}

#[async_trait]
pub trait RequestDispatcher: Send + Sync {
    async fn fetch(&self, spec: &RequestSpec, path_suffix: Option<&str>) -> FetchResponse;
}

pub type Completion = Box<dyn FnOnce(FetchResponse) + Send + 'static>;

/// Resolves request names against the registry and hands them to a
/// [`RequestDispatcher`].
#[derive(Clone)]
pub struct Dispatcher {
    registry: RequestRegistry,
    backend: Arc<dyn RequestDispatcher>,
}

impl Dispatcher {
    pub fn new(registry: RequestRegistry, backend: Arc<dyn RequestDispatcher>) -> Self {
        Self { registry, backend }
    }

    pub fn build_request(
        &self,
        name: RequestName,
        on_complete: impl FnOnce(FetchResponse) + Send + 'static,
    ) -> Request {
        Request {
            spec: self.registry.spec(name),
            backend: Arc::clone(&self.backend),
            on_complete: Box::new(on_complete),
        }
    }
}

pub struct Request {
    spec: RequestSpec,
    backend: Arc<dyn RequestDispatcher>,
    on_complete: Completion,
}

impl Request {
    pub fn name(&self) -> RequestName {
        self.spec.name
    }

    /// Fire-and-forget. The completion runs once on the runtime after the
    /// fetch resolves; there is no way to cancel it.
    pub fn send(self, path_suffix: Option<String>) {
        let Request {
            spec,
            backend,
            on_complete,
        } = self;
        debug!(request = %spec.name, endpoint = %spec.endpoint, "dispatch: request sent");
        tokio::spawn(async move {
            let response = backend.fetch(&spec, path_suffix.as_deref()).await;
            debug!(
                request = %spec.name,
                status = %response.status,
                http_status = response.http_status,
                "dispatch: request completed"
            );
            on_complete(response);
        });
    }
}

/// Fetches tab templates from disk and game calls over HTTP.
pub struct HttpDispatcher {
    http: Client,
}

impl HttpDispatcher {
    pub fn new(request_timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(request_timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { http })
    }

    async fn fetch_remote(&self, spec: &RequestSpec, url: &str) -> FetchResponse {
        let request = match spec.method {
            HttpMethod::Get => self.http.get(url),
            HttpMethod::Post => self.http.post(url),
        }
        .header(ACCEPT, spec.content_type.accept());
        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                warn!(request = %spec.name, %url, "dispatch: remote fetch failed: {err}");
                let status = if err.is_timeout() {
                    FetchStatus::Timeout
                } else {
                    FetchStatus::Error
                };
                return FetchResponse::failure(status, err.status().map(|s| s.as_u16()));
            }
        };

        let http_status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => {
                warn!(request = %spec.name, %url, "dispatch: failed to read body: {err}");
                return FetchResponse::failure(FetchStatus::Error, Some(http_status.as_u16()));
            }
        };

        FetchResponse {
            status: if http_status.is_success() {
                FetchStatus::Success
            } else {
                FetchStatus::Error
            },
            http_status: Some(http_status.as_u16()),
            body,
        }
    }

    async fn fetch_local(&self, spec: &RequestSpec, path: &str) -> FetchResponse {
        match tokio::fs::read_to_string(path).await {
            Ok(body) => FetchResponse::success(body),
            Err(err) => {
                warn!(request = %spec.name, %path, "dispatch: template read failed: {err}");
                let http_status = match err.kind() {
                    ErrorKind::NotFound => 404,
                    ErrorKind::PermissionDenied => 403,
                    _ => 500,
                };
                FetchResponse::failure(FetchStatus::Error, Some(http_status))
            }
        }
    }
}

#[async_trait]
impl RequestDispatcher for HttpDispatcher {
    async fn fetch(&self, spec: &RequestSpec, path_suffix: Option<&str>) -> FetchResponse {
        let target = spec.endpoint_with_suffix(path_suffix);
        if spec.is_remote() {
            self.fetch_remote(spec, &target).await
        } else {
            self.fetch_local(spec, &target).await
        }
    }
}

#[cfg(test)]
#[path = "tests/dispatcher_tests.rs"]
mod tests;
