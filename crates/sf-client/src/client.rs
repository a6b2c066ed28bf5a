//! reqwest-backed transport.

use std::collections::HashMap;

use tracing::{debug, info, instrument};

use crate::config::ClientConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::request::{RequestBody, RequestMethod, RequestOptions};
use crate::response::Response;
use crate::transport::Transport;

/// HTTP transport backed by a pooled `reqwest::Client`.
///
/// Sends each request exactly once and returns whatever the server answered.
/// It performs no authentication, retry or status interpretation.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    inner: reqwest::Client,
    config: ClientConfig,
}

impl ReqwestTransport {
    /// Create a new transport with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .user_agent(&config.user_agent)
            .gzip(config.accept_compressed)
            .deflate(config.accept_compressed);

        let inner = builder
            .build()
            .map_err(|e| Error::with_source(ErrorKind::Config(e.to_string()), e))?;

        Ok(Self { inner, config })
    }

    /// Create a new transport with default configuration.
    pub fn default_client() -> Result<Self> {
        Self::new(ClientConfig::default())
    }

    /// Get the transport configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[instrument(skip(self, options), fields(method = %method, url = %url))]
    async fn execute(
        &self,
        method: RequestMethod,
        url: &str,
        options: &RequestOptions,
    ) -> Result<Response> {
        let mut url = url::Url::parse(url)?;
        if !options.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&options.query);
        }

        let mut req = self.inner.request(method.to_reqwest(), url);

        for (name, value) in &options.headers {
            req = req.header(name.as_str(), value.as_str());
        }

        if let Some(ref body) = options.body {
            req = match body {
                RequestBody::Json(value) => req.json(value),
                RequestBody::Text(text) => req.body(text.clone()),
                RequestBody::Bytes(bytes) => req.body(bytes.clone()),
                RequestBody::Form(data) => {
                    let encoded = serde_urlencoded::to_string(data).map_err(|e| {
                        Error::with_source(ErrorKind::Other(e.to_string()), e)
                    })?;
                    req.body(encoded)
                }
            };
        }

        if self.config.enable_tracing {
            debug!("Sending request");
        }

        let response = req.send().await?;
        let status = response.status().as_u16();

        if self.config.enable_tracing {
            let content_length = response.content_length();
            if response.status().is_success() {
                debug!(status, content_length, "Response received");
            } else {
                info!(status, content_length, "Non-success response");
            }
        }

        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        let body = response.bytes().await?;

        Ok(Response::new(status, headers, body))
    }
}

impl Transport for ReqwestTransport {
    async fn send(
        &self,
        method: RequestMethod,
        url: &str,
        options: &RequestOptions,
    ) -> Result<Response> {
        self.execute(method, url, options).await
    }
}
