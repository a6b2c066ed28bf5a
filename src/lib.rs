//! # restforce
//!
//! A Salesforce REST API client for Rust that keeps working when the OAuth
//! access token expires.
//!
//! Every request carries the current bearer token. When Salesforce answers
//! 401, the client waits, exchanges the refresh token for a new access token,
//! and resends, up to a configured number of attempts.
//!
//! ## Security
//!
//! - Tokens and secrets are redacted in Debug output
//! - Tracing spans skip credential parameters
//! - Error messages sanitize anything that looks like a session id
//!
//! ## Crates
//!
//! - **restforce-client** - HTTP transport, request options, buffered responses, backoff
//! - **restforce-auth** - Access tokens, OAuth refresh grant, refresh notifiers, token storage
//! - **restforce-rest** - Authenticated retrying client and resource helpers
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use restforce::{AccessToken, OAuthClient, OAuthConfig, ReqwestTransport};
//! use restforce::{RestforceClient, SalesforceRestClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let token = AccessToken::new(
//!         "access_token",
//!         "https://myorg.my.salesforce.com",
//!         "refresh_token",
//!         "005xx000001Sv6A",
//!     );
//!
//!     let client = SalesforceRestClient::builder(
//!         ReqwestTransport::default_client()?,
//!         OAuthClient::new(OAuthConfig::new("consumer_key").with_secret("consumer_secret")),
//!         token,
//!     )
//!     .build()?;
//!
//!     let restforce = RestforceClient::new(client);
//!     let accounts = restforce
//!         .query::<serde_json::Value>("SELECT Id, Name FROM Account LIMIT 10")
//!         .await?;
//!
//!     for account in accounts.records {
//!         println!("{}", account["Name"]);
//!     }
//!
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(feature = "auth")]
pub use restforce_auth as auth;
#[cfg(feature = "client")]
pub use restforce_client as client;
#[cfg(feature = "rest")]
pub use restforce_rest as rest;

#[cfg(feature = "auth")]
pub use restforce_auth::{
    AccessToken, FileTokenStorage, NoopNotifier, OAuthClient, OAuthConfig, OAuthProvider,
    TokenRefreshNotifier, TokenStorage,
};
#[cfg(feature = "client")]
pub use restforce_client::{
    ClientConfig, RequestMethod, RequestOptions, ReqwestTransport, Response, RetryConfig,
    Transport,
};
#[cfg(feature = "rest")]
pub use restforce_rest::{RestforceClient, RestforceConfig, SalesforceRestClient};
