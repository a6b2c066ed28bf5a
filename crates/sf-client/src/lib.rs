//! # restforce-client
//!
//! HTTP transport infrastructure for the Salesforce REST API.
//!
//! This crate provides the plain, unauthenticated layer that the retrying
//! client in `restforce-rest` sits on top of:
//! - The [`Transport`] trait: send a method/URL/options triple, get a response
//! - [`ReqwestTransport`]: the default reqwest-backed implementation
//! - Structured [`RequestOptions`] (headers, query, body)
//! - Buffered [`Response`] values with Salesforce-specific helpers
//! - Backoff configuration shared by the retry loop
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    RestforceClient                          │
//! │  (limits, query, find, describe, create, update, destroy)   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  SalesforceRestClient                       │
//! │  - Holds the access token                                   │
//! │  - Injects bearer auth, refreshes on 401, retries           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Transport (this crate)                      │
//! │  - Raw HTTP send, no auth or 401 handling                   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use restforce_client::{ClientConfig, RequestMethod, RequestOptions, ReqwestTransport, Transport};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), restforce_client::Error> {
//!     let transport = ReqwestTransport::new(ClientConfig::default())?;
//!
//!     let options = RequestOptions::new().header("Authorization", "Bearer 00D...");
//!     let response = transport
//!         .send(
//!             RequestMethod::Get,
//!             "https://na1.salesforce.com/services/data/v62.0/limits",
//!             &options,
//!         )
//!         .await?;
//!
//!     println!("{}", response.status());
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
mod request;
mod response;
mod retry;
pub mod security;
mod transport;

pub use client::ReqwestTransport;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{Error, ErrorKind, Result};
pub use request::{RequestBody, RequestMethod, RequestOptions};
pub use response::{Response, SalesforceErrorDetail};
pub use retry::{BackoffStrategy, RetryConfig};
pub use transport::Transport;

/// User-Agent string for the client
pub const USER_AGENT: &str = concat!("restforce/", env!("CARGO_PKG_VERSION"));
