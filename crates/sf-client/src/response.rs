//! Buffered HTTP responses with Salesforce-specific extensions.

use std::collections::HashMap;

use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::error::{Error, ErrorKind, Result};

/// A fully-read HTTP response.
///
/// The body is buffered by the transport so that a response can be inspected
/// (status, headers, body) as many times as needed. Header names are stored
/// lowercased for case-insensitive lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    status: u16,
    headers: HashMap<String, String>,
    body: Bytes,
}

impl Response {
    /// Create a response from its parts.
    pub fn new(status: u16, headers: HashMap<String, String>, body: impl Into<Bytes>) -> Self {
        let headers = headers
            .into_iter()
            .map(|(k, v)| (k.to_lowercase(), v))
            .collect();

        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Create a response with no headers.
    pub fn from_status(status: u16, body: impl Into<Bytes>) -> Self {
        Self::new(status, HashMap::new(), body)
    }

    /// Get the HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Returns true if the response status is successful (2xx).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns true if the server rejected the bearer token (HTTP 401).
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// Get a header value.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(|s| s.as_str())
    }

    /// Get the Content-Type header.
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Get the raw response body.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Get the response body as text.
    pub fn text(&self) -> Result<String> {
        String::from_utf8(self.body.to_vec()).map_err(|e| {
            Error::with_source(
                ErrorKind::Other("Failed to decode response as UTF-8".to_string()),
                e,
            )
        })
    }

    /// Deserialize the response body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(Into::into)
    }

    /// Parse a Salesforce error body (array or single-object format).
    ///
    /// Falls back to the sanitized raw body when the body is not a
    /// recognizable Salesforce error.
    pub fn salesforce_error(&self) -> SalesforceErrorDetail {
        let body = String::from_utf8_lossy(&self.body);

        let parsed = serde_json::from_str::<Vec<SalesforceErrorResponse>>(&body)
            .ok()
            .and_then(|errors| errors.into_iter().next())
            .or_else(|| serde_json::from_str::<SalesforceErrorResponse>(&body).ok());

        match parsed {
            Some(err) => SalesforceErrorDetail {
                error_code: err.error_code,
                message: sanitize_error_message(&err.message),
                fields: err.fields.unwrap_or_default(),
            },
            None => SalesforceErrorDetail {
                error_code: format!("HTTP_{}", self.status),
                message: sanitize_error_message(&body),
                fields: Vec::new(),
            },
        }
    }
}

/// First error reported by a failed Salesforce call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesforceErrorDetail {
    pub error_code: String,
    pub message: String,
    pub fields: Vec<String>,
}

/// Sanitize an error message to prevent exposing sensitive data.
///
/// This function:
/// - Truncates messages longer than 500 characters
/// - Removes potential tokens (anything that looks like an access token)
/// - Removes potential session IDs
fn sanitize_error_message(message: &str) -> String {
    const MAX_LENGTH: usize = 500;

    let mut sanitized = message.to_string();

    // Salesforce tokens start with the 15+ char org id followed by "!"
    let token_pattern = regex_lite::Regex::new(r"00[A-Za-z0-9]{13,}[!][A-Za-z0-9_.]+").unwrap();
    sanitized = token_pattern
        .replace_all(&sanitized, "[REDACTED_TOKEN]")
        .to_string();

    let session_pattern = regex_lite::Regex::new(r"sid=[A-Za-z0-9]{20,}").unwrap();
    sanitized = session_pattern
        .replace_all(&sanitized, "sid=[REDACTED]")
        .to_string();

    if sanitized.len() > MAX_LENGTH {
        let mut cut = MAX_LENGTH;
        while !sanitized.is_char_boundary(cut) {
            cut -= 1;
        }
        sanitized.truncate(cut);
        sanitized.push_str("...[truncated]");
    }

    sanitized
}

/// Salesforce API error response format.
#[derive(Debug, serde::Deserialize)]
struct SalesforceErrorResponse {
    #[serde(alias = "errorCode")]
    error_code: String,
    message: String,
    fields: Option<Vec<String>>,
}
