//! Authenticated Salesforce REST client.
//!
//! [`SalesforceRestClient`] wraps a [`Transport`] and an [`OAuthProvider`].
//! Every request carries the currently held bearer token. A 401 answer
//! triggers a backoff delay, a token refresh and a resend, up to
//! `max_retry_requests` sends in total.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, instrument, warn};

use restforce_auth::{AccessToken, NoopNotifier, OAuthProvider, TokenRefreshNotifier};
use restforce_client::{RequestMethod, RequestOptions, Response, RetryConfig, Transport};

use crate::config::RestforceConfig;
use crate::error::{Error, ErrorKind, Result};

/// Salesforce REST client that refreshes its OAuth token on 401.
///
/// # Example
///
/// ```rust,ignore
/// use restforce_auth::{AccessToken, OAuthClient, OAuthConfig};
/// use restforce_client::{ReqwestTransport, RequestMethod, RequestOptions};
/// use restforce_rest::SalesforceRestClient;
///
/// let token = AccessToken::new(access, "https://na1.salesforce.com", refresh, "005...");
/// let client = SalesforceRestClient::builder(
///     ReqwestTransport::default_client()?,
///     OAuthClient::new(OAuthConfig::new("consumer_key")),
///     token,
/// )
/// .api_version("v62.0")
/// .build()?;
///
/// let response = client
///     .request(RequestMethod::Get, "limits", RequestOptions::new())
///     .await?;
/// ```
///
/// Clones share the held token, so a refresh performed through one clone is
/// seen by all of them.
#[derive(Clone)]
pub struct SalesforceRestClient<T, P> {
    transport: T,
    provider: P,
    notifier: Arc<dyn TokenRefreshNotifier>,
    access_token: Arc<RwLock<AccessToken>>,
    refresh_guard: Arc<Mutex<()>>,
    config: RestforceConfig,
}

impl<T, P> std::fmt::Debug for SalesforceRestClient<T, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SalesforceRestClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<T: Transport, P: OAuthProvider> SalesforceRestClient<T, P> {
    /// Start building a client around a transport, a token provider and the
    /// initial session.
    pub fn builder(
        transport: T,
        provider: P,
        access_token: AccessToken,
    ) -> SalesforceRestClientBuilder<T, P> {
        SalesforceRestClientBuilder {
            transport,
            provider,
            access_token,
            notifier: Arc::new(NoopNotifier),
            config: RestforceConfig::default(),
        }
    }

    /// Identity URL of the authenticated user.
    pub fn resource_owner_url(&self) -> &str {
        &self.config.resource_owner_url
    }

    /// API version used in relative URLs.
    pub fn api_version(&self) -> &str {
        &self.config.api_version
    }

    /// Maximum number of sends per request.
    pub fn max_retry_requests(&self) -> u32 {
        self.config.max_retry_requests
    }

    /// Snapshot of the currently held token.
    pub async fn access_token(&self) -> AccessToken {
        self.access_token.read().await.clone()
    }

    /// Send an authenticated request.
    ///
    /// `path` is either an absolute `http://`/`https://` URL or a path
    /// relative to `/services/data/<api_version>/` on the token's instance.
    /// The bearer header is set from the held token on every attempt, so a
    /// resend after refresh targets the refreshed instance URL with the
    /// refreshed token.
    ///
    /// Any non-401 response is returned as is, including other error
    /// statuses. Transport and refresh failures end the loop immediately.
    #[instrument(skip(self, options))]
    pub async fn request(
        &self,
        method: RequestMethod,
        path: &str,
        options: RequestOptions,
    ) -> Result<Response> {
        let max_attempts = self.config.max_retry_requests;
        let mut token = self.access_token().await;
        let mut attempt: u32 = 0;

        loop {
            let url = self.construct_url(path, &token);
            let merged = Self::merge_options(&options, &token);

            debug!(attempt, url = %url, "Sending request");
            let response = self.transport.send(method, &url, &merged).await?;

            if !response.is_unauthorized() {
                debug!(attempt, status = response.status(), "Request authorized");
                return Ok(response);
            }

            if attempt + 1 >= max_attempts {
                error!(max_attempts, "Access token rejected on every attempt");
                return Err(Error::new(ErrorKind::RetryLimitExceeded { max_attempts }));
            }

            let delay = self.config.retry.delay(attempt);
            warn!(
                attempt,
                max_attempts,
                delay_ms = delay.as_millis() as u64,
                "Access token rejected, refreshing"
            );
            tokio::time::sleep(delay).await;

            token = self.refresh_access_token(&token).await?;
            attempt += 1;
        }
    }

    /// Build the URL for one attempt.
    ///
    /// Relative paths are appended verbatim, no slashes are trimmed.
    pub fn construct_url(&self, path: &str, token: &AccessToken) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        format!(
            "{}/services/data/{}/{}",
            token.instance_url(),
            self.config.api_version,
            path
        )
    }

    /// Copy `options` with the bearer header for `token`.
    ///
    /// A caller-supplied `Authorization` header, in any casing, is replaced.
    pub fn merge_options(options: &RequestOptions, token: &AccessToken) -> RequestOptions {
        let mut merged = options.clone();
        merged.remove_header("Authorization");
        merged
            .headers
            .insert("Authorization".to_string(), token.bearer_header());
        merged
    }

    /// Replace `stale` with a fresh token and notify.
    ///
    /// Serialized by the refresh guard. If another request already swapped
    /// the held token while this one waited, that token is reused.
    async fn refresh_access_token(&self, stale: &AccessToken) -> Result<AccessToken> {
        let _guard = self.refresh_guard.lock().await;

        {
            let held = self.access_token.read().await;
            if *held != *stale {
                debug!("Token already refreshed by a concurrent request");
                return Ok(held.clone());
            }
        }

        let refreshed = self
            .provider
            .exchange_refresh_token(stale.refresh_token())
            .await?;

        *self.access_token.write().await = refreshed.clone();
        info!(instance_url = %refreshed.instance_url(), "Access token refreshed");

        self.notifier.on_token_refreshed(&refreshed);
        Ok(refreshed)
    }
}

/// Builder for [`SalesforceRestClient`].
pub struct SalesforceRestClientBuilder<T, P> {
    transport: T,
    provider: P,
    access_token: AccessToken,
    notifier: Arc<dyn TokenRefreshNotifier>,
    config: RestforceConfig,
}

impl<T: Transport, P: OAuthProvider> SalesforceRestClientBuilder<T, P> {
    /// Set the identity URL of the authenticated user.
    pub fn resource_owner_url(mut self, url: impl Into<String>) -> Self {
        self.config.resource_owner_url = url.into();
        self
    }

    /// Set the API version, e.g. `"v62.0"`.
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.config.api_version = version.into();
        self
    }

    /// Set the maximum number of sends per request, the first one included.
    pub fn max_retry_requests(mut self, max: u32) -> Self {
        self.config.max_retry_requests = max;
        self
    }

    /// Set the backoff applied before each refresh.
    pub fn retry_config(mut self, retry: RetryConfig) -> Self {
        self.config.retry = retry;
        self
    }

    /// Receive every refreshed token.
    pub fn notifier(mut self, notifier: impl TokenRefreshNotifier + 'static) -> Self {
        self.notifier = Arc::new(notifier);
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: RestforceConfig) -> Self {
        self.config = config;
        self
    }

    /// Validate the configuration and build the client.
    pub fn build(self) -> Result<SalesforceRestClient<T, P>> {
        if self.config.max_retry_requests == 0 {
            return Err(Error::new(ErrorKind::Config(
                "max_retry_requests must be at least 1".to_string(),
            )));
        }
        if self.config.api_version.is_empty() {
            return Err(Error::new(ErrorKind::Config(
                "api_version must not be empty".to_string(),
            )));
        }

        Ok(SalesforceRestClient {
            transport: self.transport,
            provider: self.provider,
            notifier: self.notifier,
            access_token: Arc::new(RwLock::new(self.access_token)),
            refresh_guard: Arc::new(Mutex::new(())),
            config: self.config,
        })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! In-memory transport and provider doubles with call recording.

    use std::collections::VecDeque;
    use std::sync::Mutex;

    use restforce_auth::{AccessToken, OAuthProvider};
    use restforce_client::{RequestMethod, RequestOptions, Response, Transport};

    /// A recorded transport call.
    #[derive(Debug, Clone)]
    pub struct SentRequest {
        pub method: RequestMethod,
        pub url: String,
        pub options: RequestOptions,
    }

    /// Answers sends from a script; once the script runs out, every send
    /// gets the fallback status.
    pub struct ScriptedTransport {
        script: Mutex<VecDeque<restforce_client::Result<Response>>>,
        fallback: u16,
        sent: Mutex<Vec<SentRequest>>,
    }

    impl ScriptedTransport {
        pub fn new(script: Vec<restforce_client::Result<Response>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                fallback: 401,
                sent: Mutex::new(Vec::new()),
            }
        }

        pub fn statuses(statuses: &[u16]) -> Self {
            Self::new(
                statuses
                    .iter()
                    .map(|s| Ok(Response::from_status(*s, "{}")))
                    .collect(),
            )
        }

        pub fn always_unauthorized() -> Self {
            Self::new(Vec::new())
        }

        pub fn responding(status: u16, body: &str) -> Self {
            Self::new(vec![Ok(Response::from_status(status, body.to_string()))])
        }

        pub fn sent(&self) -> Vec<SentRequest> {
            self.sent.lock().unwrap().clone()
        }

        pub fn send_count(&self) -> usize {
            self.sent.lock().unwrap().len()
        }
    }

    impl Transport for ScriptedTransport {
        async fn send(
            &self,
            method: RequestMethod,
            url: &str,
            options: &RequestOptions,
        ) -> restforce_client::Result<Response> {
            self.sent.lock().unwrap().push(SentRequest {
                method,
                url: url.to_string(),
                options: options.clone(),
            });

            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Response::from_status(self.fallback, "")))
        }
    }

    /// Issues `token-1`, `token-2`, ... on instances `https://instance<n>.example.com`.
    #[derive(Default)]
    pub struct CountingProvider {
        exchanged: Mutex<Vec<String>>,
        exchanged_at: Mutex<Vec<tokio::time::Instant>>,
        fail_with: Option<String>,
    }

    impl CountingProvider {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing(error: &str) -> Self {
            Self {
                fail_with: Some(error.to_string()),
                ..Self::default()
            }
        }

        pub fn refresh_count(&self) -> usize {
            self.exchanged.lock().unwrap().len()
        }

        pub fn exchanged(&self) -> Vec<String> {
            self.exchanged.lock().unwrap().clone()
        }

        pub fn exchanged_at(&self) -> Vec<tokio::time::Instant> {
            self.exchanged_at.lock().unwrap().clone()
        }
    }

    impl OAuthProvider for CountingProvider {
        async fn exchange_refresh_token(
            &self,
            refresh_token: &str,
        ) -> restforce_auth::Result<AccessToken> {
            self.exchanged_at
                .lock()
                .unwrap()
                .push(tokio::time::Instant::now());
            let n = {
                let mut exchanged = self.exchanged.lock().unwrap();
                exchanged.push(refresh_token.to_string());
                exchanged.len()
            };

            if let Some(error) = &self.fail_with {
                return Err(restforce_auth::Error::new(restforce_auth::ErrorKind::OAuth {
                    error: error.clone(),
                    description: "refresh rejected".to_string(),
                }));
            }

            Ok(AccessToken::new(
                format!("token-{n}"),
                format!("https://instance{n}.example.com"),
                format!("refresh-{n}"),
                "005xx000001Sv6A",
            ))
        }
    }

    pub fn initial_token() -> AccessToken {
        AccessToken::new("token-0", "myInstanceUrl", "refresh-0", "005xx000001Sv6A")
    }
}
