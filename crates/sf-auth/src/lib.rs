//! # restforce-auth
//!
//! OAuth 2.0 token handling for the Salesforce REST client.
//!
//! ## Security
//!
//! - Tokens and secrets are redacted in Debug output
//! - Tracing spans skip credential parameters
//! - Error messages never carry token values
//!
//! ## Contents
//!
//! - [`AccessToken`] - immutable snapshot of the current session
//! - [`OAuthProvider`] - exchanges a refresh token for a new [`AccessToken`]
//! - [`OAuthClient`] - Salesforce `refresh_token` grant over HTTP
//! - [`TokenRefreshNotifier`] - callback invoked with every refreshed token
//! - [`FileTokenStorage`] - on-disk persistence, usable as a notifier
//!
//! ## Example
//!
//! ```rust,ignore
//! use restforce_auth::{OAuthClient, OAuthConfig, OAuthProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), restforce_auth::Error> {
//!     let provider = OAuthClient::new(
//!         OAuthConfig::new("consumer_key").with_secret("consumer_secret"),
//!     );
//!
//!     let token = provider.exchange_refresh_token("5Aep861...").await?;
//!     println!("new session on {}", token.instance_url());
//!     Ok(())
//! }
//! ```

mod error;
mod notifier;
mod oauth;
mod storage;
mod token;

pub use error::{Error, ErrorKind, Result};
pub use notifier::{NoopNotifier, TokenRefreshNotifier};
pub use oauth::{OAuthClient, OAuthConfig, OAuthProvider, TokenResponse};
pub use storage::{default_token_dir, FileTokenStorage, StorageNotifier, TokenStorage};
pub use token::AccessToken;

/// Default Salesforce login URL for production.
pub const PRODUCTION_LOGIN_URL: &str = "https://login.salesforce.com";

/// Default Salesforce login URL for sandbox.
pub const SANDBOX_LOGIN_URL: &str = "https://test.salesforce.com";
