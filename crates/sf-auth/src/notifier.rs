//! Refresh notification callbacks.

use crate::token::AccessToken;

/// Receives every newly issued token after a successful refresh.
///
/// Called synchronously by the REST client after the held token has been
/// replaced and before the failed request is retried. Typical
/// implementations persist the token so that the next process can start
/// with a valid session.
pub trait TokenRefreshNotifier: Send + Sync {
    /// Handle a freshly refreshed token.
    fn on_token_refreshed(&self, token: &AccessToken);
}

/// Notifier that ignores refreshes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl TokenRefreshNotifier for NoopNotifier {
    fn on_token_refreshed(&self, _token: &AccessToken) {}
}

impl<F> TokenRefreshNotifier for F
where
    F: Fn(&AccessToken) + Send + Sync,
{
    fn on_token_refreshed(&self, token: &AccessToken) {
        self(token)
    }
}
