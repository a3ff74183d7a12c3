use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use shared::{
    error::ServiceErrorBody,
    protocol::{
        AdviceRequest, AdviceResponse, BuildRequest, BuildResponse, ADVICE_PATH, BUILD_PATH,
    },
};
use tracing::debug;
use url::Url;

use crate::{error::WorkflowError, AdviceService, BuildService};

#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub base_url: Url,
    pub advice_path: String,
    pub build_path: String,
    /// Left unset the HTTP client waits as long as the connection allows.
    pub request_timeout: Option<Duration>,
}

impl TransportConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            advice_path: ADVICE_PATH.to_string(),
            build_path: BUILD_PATH.to_string(),
            request_timeout: None,
        }
    }
}

/// Advice and build services reached over HTTP with JSON bodies.
pub struct HttpPortfolioClient {
    http: Client,
    config: TransportConfig,
}

impl HttpPortfolioClient {
    pub fn new(config: TransportConfig) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            config,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.config.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, WorkflowError>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let url = self.endpoint(path);
        let res = self.http.post(&url).json(body).send().await?;
        let status = res.status();
        let bytes = res.bytes().await?;
        debug!(%url, status = status.as_u16(), len = bytes.len(), "received response");

        if !status.is_success() {
            let detail = serde_json::from_slice::<ServiceErrorBody>(&bytes)
                .ok()
                .and_then(|body| body.summary());
            return Err(WorkflowError::ServiceFailure {
                status: status.as_u16(),
                detail,
            });
        }

        serde_json::from_slice(&bytes).map_err(|err| WorkflowError::MalformedResponse(err.to_string()))
    }
}

#[async_trait]
impl AdviceService for HttpPortfolioClient {
    async fn request_advice(&self, request: &AdviceRequest) -> Result<AdviceResponse, WorkflowError> {
        self.post_json(&self.config.advice_path, request).await
    }
}

#[async_trait]
impl BuildService for HttpPortfolioClient {
    async fn request_build(&self, request: &BuildRequest) -> Result<BuildResponse, WorkflowError> {
        let response: BuildResponse = self.post_json(&self.config.build_path, request).await?;
        if response.site_url.trim().is_empty() {
            return Err(WorkflowError::MalformedResponse(
                "site_url is empty".to_string(),
            ));
        }
        Ok(response)
    }
}

/// Resolves a possibly relative `site_url` against the backend base URL.
/// Values that are already absolute, or that cannot be joined, pass through.
pub fn resolve_site_location(base: Option<&Url>, site_url: &str) -> String {
    if Url::parse(site_url).is_ok() {
        return site_url.to_string();
    }
    base.and_then(|base| base.join(site_url).ok())
        .map(String::from)
        .unwrap_or_else(|| site_url.to_string())
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
