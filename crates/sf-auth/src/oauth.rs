//! OAuth 2.0 refresh token exchange.
//!
//! The REST client only ever needs one grant: trading the refresh token it
//! holds for a fresh access token after the API answers 401. That contract is
//! [`OAuthProvider`]; [`OAuthClient`] implements it against the Salesforce
//! token endpoint.

use std::future::Future;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{Error, ErrorKind, Result};
use crate::token::AccessToken;
use crate::PRODUCTION_LOGIN_URL;

/// Exchanges a refresh token for a new access token.
///
/// Failures (revoked refresh token, network errors) are returned as-is; the
/// caller decides whether they are fatal.
pub trait OAuthProvider: Send + Sync {
    /// Perform a `refresh_token` grant.
    fn exchange_refresh_token(
        &self,
        refresh_token: &str,
    ) -> impl Future<Output = Result<AccessToken>> + Send;
}

impl<P: OAuthProvider> OAuthProvider for Arc<P> {
    fn exchange_refresh_token(
        &self,
        refresh_token: &str,
    ) -> impl Future<Output = Result<AccessToken>> + Send {
        (**self).exchange_refresh_token(refresh_token)
    }
}

/// OAuth 2.0 configuration for a connected app.
///
/// Sensitive fields like `consumer_secret` are redacted in Debug output
/// to prevent accidental exposure in logs.
#[derive(Clone)]
pub struct OAuthConfig {
    /// Consumer key (client_id).
    pub consumer_key: String,
    /// Consumer secret (client_secret). Optional for some flows.
    consumer_secret: Option<String>,
    /// Login URL hosting the token endpoint.
    pub login_url: String,
}

impl std::fmt::Debug for OAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthConfig")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"[REDACTED]")
            .field("login_url", &self.login_url)
            .finish()
    }
}

impl OAuthConfig {
    /// Create a new OAuth config against the production login URL.
    pub fn new(consumer_key: impl Into<String>) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: None,
            login_url: PRODUCTION_LOGIN_URL.to_string(),
        }
    }

    /// Set the consumer secret.
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.consumer_secret = Some(secret.into());
        self
    }

    /// Set the login URL (e.g. the sandbox login URL or a My Domain).
    pub fn with_login_url(mut self, login_url: impl Into<String>) -> Self {
        self.login_url = login_url.into().trim_end_matches('/').to_string();
        self
    }

    pub(crate) fn consumer_secret(&self) -> Option<&str> {
        self.consumer_secret.as_deref()
    }

    fn token_url(&self) -> String {
        format!("{}/services/oauth2/token", self.login_url)
    }
}

/// OAuth client for the Salesforce token endpoint.
#[derive(Clone)]
pub struct OAuthClient {
    config: OAuthConfig,
    http_client: reqwest::Client,
}

impl std::fmt::Debug for OAuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl OAuthClient {
    /// Create a new OAuth client.
    pub fn new(config: OAuthConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    /// Create a new OAuth client reusing an existing reqwest client.
    pub fn with_http_client(config: OAuthConfig, http_client: reqwest::Client) -> Self {
        Self {
            config,
            http_client,
        }
    }

    /// Get the OAuth config.
    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }

    /// Refresh an access token using a refresh token.
    ///
    /// The refresh_token parameter is not logged to prevent credential exposure.
    #[instrument(skip(self, refresh_token), fields(login_url = %self.config.login_url))]
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenResponse> {
        let mut params = vec![
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", self.config.consumer_key.as_str()),
        ];

        if let Some(secret) = self.config.consumer_secret() {
            params.push(("client_secret", secret));
        }

        let body = serde_urlencoded::to_string(params)?;

        let response = self
            .http_client
            .post(self.config.token_url())
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await?;

        self.handle_token_response(response).await
    }

    /// Handle a token response, checking for errors.
    async fn handle_token_response(&self, response: reqwest::Response) -> Result<TokenResponse> {
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.bytes().await?;
            let error = serde_json::from_slice::<OAuthErrorResponse>(&body).unwrap_or_else(|_| {
                OAuthErrorResponse {
                    error: format!("http_{}", status),
                    error_description: "Token endpoint returned an unexpected response"
                        .to_string(),
                }
            });
            return Err(Error::new(ErrorKind::OAuth {
                error: error.error,
                description: error.error_description,
            }));
        }

        let body = response.bytes().await?;
        let token: TokenResponse = serde_json::from_slice(&body)?;
        Ok(token)
    }
}

impl OAuthProvider for OAuthClient {
    async fn exchange_refresh_token(&self, refresh_token: &str) -> Result<AccessToken> {
        let response = self.refresh_token(refresh_token).await?;
        response.into_access_token(refresh_token)
    }
}

/// Token response from OAuth.
///
/// Sensitive fields like `access_token` and `refresh_token` are redacted
/// in Debug output to prevent accidental exposure in logs.
#[derive(Clone, Deserialize, Serialize)]
pub struct TokenResponse {
    /// Access token.
    pub access_token: String,
    /// Refresh token. Salesforce omits it from refresh grant responses.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Instance URL.
    pub instance_url: String,
    /// Identity URL, ending in `/<org id>/<user id>`.
    #[serde(default)]
    pub id: Option<String>,
    /// Token type (usually "Bearer").
    #[serde(default)]
    pub token_type: Option<String>,
    /// Scopes granted.
    #[serde(default)]
    pub scope: Option<String>,
    /// Signature for verification.
    #[serde(default)]
    pub signature: Option<String>,
    /// Issued at timestamp.
    #[serde(default)]
    pub issued_at: Option<String>,
}

impl std::fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"[REDACTED]")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("instance_url", &self.instance_url)
            .field("id", &self.id)
            .field("token_type", &self.token_type)
            .field("scope", &self.scope)
            .field("signature", &self.signature.as_ref().map(|_| "[REDACTED]"))
            .field("issued_at", &self.issued_at)
            .finish()
    }
}

impl TokenResponse {
    /// Convert to an [`AccessToken`].
    ///
    /// `previous_refresh_token` is kept when the response carries no refresh
    /// token of its own.
    pub fn into_access_token(self, previous_refresh_token: &str) -> Result<AccessToken> {
        if self.instance_url.is_empty() {
            return Err(Error::new(ErrorKind::TokenInvalid(
                "token response has no instance_url".to_string(),
            )));
        }

        let resource_owner_id = self
            .id
            .as_deref()
            .and_then(resource_owner_id_from_identity_url)
            .unwrap_or_default();

        let refresh_token = self
            .refresh_token
            .unwrap_or_else(|| previous_refresh_token.to_string());

        Ok(AccessToken::new(
            self.access_token,
            self.instance_url,
            refresh_token,
            resource_owner_id,
        ))
    }
}

/// Extract the user id from an identity URL such as
/// `https://login.salesforce.com/id/00Dxx0000001gEF/005xx000001Sv6A`.
fn resource_owner_id_from_identity_url(id: &str) -> Option<String> {
    let parsed = url::Url::parse(id).ok()?;
    parsed
        .path_segments()?
        .filter(|segment| !segment.is_empty())
        .next_back()
        .map(str::to_string)
}

/// OAuth error response.
#[derive(Debug, Deserialize)]
struct OAuthErrorResponse {
    error: String,
    #[serde(default)]
    error_description: String,
}
