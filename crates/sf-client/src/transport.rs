//! The transport seam between the authenticating client and the network.

use std::future::Future;
use std::sync::Arc;

use crate::error::Result;
use crate::request::{RequestMethod, RequestOptions};
use crate::response::Response;

/// Sends a single HTTP request and returns the buffered response.
///
/// Implementations must return every response the server produced, including
/// 4xx/5xx statuses, as `Ok`. In particular a 401 is not an error at this
/// layer: detecting it and refreshing the token is the caller's job. `Err` is
/// reserved for failures where no response was obtained (connection refused,
/// timeout, malformed URL, unreadable body).
pub trait Transport: Send + Sync {
    /// Send `method url` with the given options.
    fn send(
        &self,
        method: RequestMethod,
        url: &str,
        options: &RequestOptions,
    ) -> impl Future<Output = Result<Response>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn send(
        &self,
        method: RequestMethod,
        url: &str,
        options: &RequestOptions,
    ) -> impl Future<Output = Result<Response>> + Send {
        (**self).send(method, url, options)
    }
}
