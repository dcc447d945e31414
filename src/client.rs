//! HTTP transport and round-trip timing

#[cfg(test)]
mod integration_tests;

use crate::{
    error::{AppError, Result},
    models::RequestSpec,
};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{header::CONTENT_TYPE, redirect::Policy, Client};
use std::time::{Duration, Instant};

/// Transport abstraction for timing a single round trip
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one request built from `request` and return the elapsed time
    /// from just before sending until the response headers arrived.
    ///
    /// The response body is drained and discarded before returning.
    async fn round_trip(&self, request: &RequestSpec) -> Result<Duration>;
}

/// reqwest-backed transport sharing one connection pool across all requests
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Create a transport whose connect and overall deadlines are both `timeout`.
    ///
    /// Each round trip is exactly one exchange with the target: redirects
    /// are returned as-is and no proxy is consulted.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .redirect(Policy::none())
            .no_proxy()
            .user_agent(format!("{}/{}", crate::PKG_NAME, crate::VERSION))
            .build()
            .map_err(|e| AppError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, timeout })
    }

    /// Per-request deadline this transport was built with
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn build_request(&self, request: &RequestSpec) -> Result<reqwest::RequestBuilder> {
        let url = url::Url::parse(&request.url)
            .map_err(|e| AppError::parse(format!("Invalid URL '{}': {}", request.url, e)))?;

        let mut builder = self.client.request(request.http_method()?, url);

        if let Some((body, body_type)) = request.payload() {
            builder = builder
                .header(CONTENT_TYPE, body_type)
                .body(body.to_string());
        }

        Ok(builder)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn round_trip(&self, request: &RequestSpec) -> Result<Duration> {
        let builder = self.build_request(request)?;

        let start = Instant::now();
        let response = builder.send().await?;
        let elapsed = start.elapsed();

        // Status is not inspected: any completed exchange counts as a sample.
        let mut body = response.bytes_stream();
        while let Some(chunk) = body.next().await {
            chunk?;
        }

        Ok(elapsed)
    }
}
