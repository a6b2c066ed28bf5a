//! # restforce-rest
//!
//! Salesforce REST client with bearer token injection and transparent token
//! refresh.
//!
//! ## Features
//!
//! - **Authenticated requests** - Every request carries `Authorization: Bearer <token>`
//! - **Refresh on 401** - Expired tokens are refreshed and the request is resent
//! - **Bounded retry** - At most `max_retry_requests` sends per request, with backoff
//! - **Refresh notifications** - Persist new tokens through a notifier
//! - **Resource helpers** - Limits, query, describe and record CRUD
//!
//! ## Example
//!
//! ```rust,ignore
//! use restforce_auth::{AccessToken, OAuthClient, OAuthConfig};
//! use restforce_client::ReqwestTransport;
//! use restforce_rest::{RestforceClient, SalesforceRestClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let token = AccessToken::new(
//!         "access_token_here",
//!         "https://myorg.my.salesforce.com",
//!         "refresh_token_here",
//!         "005xx000001Sv6A",
//!     );
//!
//!     let client = SalesforceRestClient::builder(
//!         ReqwestTransport::default_client()?,
//!         OAuthClient::new(OAuthConfig::new("consumer_key")),
//!         token,
//!     )
//!     .max_retry_requests(3)
//!     .build()?;
//!
//!     let restforce = RestforceClient::new(client);
//!     let accounts = restforce
//!         .query::<serde_json::Value>("SELECT Id, Name FROM Account LIMIT 10")
//!         .await?;
//!     println!("{} accounts", accounts.total_size);
//!
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod describe;
mod error;
mod query;
mod restforce;

pub use client::{SalesforceRestClient, SalesforceRestClientBuilder};
pub use config::{RestforceConfig, DEFAULT_API_VERSION, DEFAULT_MAX_RETRY_REQUESTS};
pub use describe::{DescribeSObjectResult, FieldDescribe, PicklistValue};
pub use error::{Error, ErrorKind, Result};
pub use query::{CreateResult, QueryResult, SalesforceError};
pub use restforce::RestforceClient;
