//! The access token snapshot held by the REST client.

use serde::{Deserialize, Serialize};

/// An immutable OAuth session: bearer token, instance URL, refresh token and
/// resource owner id.
///
/// A refresh never mutates an `AccessToken`; it produces a new one that
/// supersedes the old value wholesale.
///
/// `token` and `refresh_token` are redacted in Debug output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    token: String,
    instance_url: String,
    refresh_token: String,
    resource_owner_id: String,
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"[REDACTED]")
            .field("instance_url", &self.instance_url)
            .field("refresh_token", &"[REDACTED]")
            .field("resource_owner_id", &self.resource_owner_id)
            .finish()
    }
}

impl AccessToken {
    /// Create a new token snapshot.
    pub fn new(
        token: impl Into<String>,
        instance_url: impl Into<String>,
        refresh_token: impl Into<String>,
        resource_owner_id: impl Into<String>,
    ) -> Self {
        Self {
            token: token.into(),
            instance_url: instance_url.into(),
            refresh_token: refresh_token.into(),
            resource_owner_id: resource_owner_id.into(),
        }
    }

    /// The bearer token sent in the `Authorization` header.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The Salesforce instance this session belongs to.
    pub fn instance_url(&self) -> &str {
        &self.instance_url
    }

    /// The long-lived credential used to obtain the next access token.
    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }

    /// Id of the authenticated user.
    pub fn resource_owner_id(&self) -> &str {
        &self.resource_owner_id
    }

    /// The `Authorization` header value for this token.
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.token)
    }
}
