//! The authenticated-channel boundary.
//!
//! This backend assumes credentials are resolved by the surrounding
//! environment; it neither manages nor validates them. A [`TokenProvider`]
//! hands over a ready-to-use bearer token, however the caller obtained it
//! (metadata server, service-account exchange, a vaulted secret).

use async_trait::async_trait;

use crate::service::RemoteError;

/// Source of bearer tokens for the remote key service.
///
/// Implementations own refresh and caching; the backend asks for a token per
/// request and once at construction to establish the channel.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Return a currently-valid bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Auth`] when no token can be produced.
    async fn bearer_token(&self) -> Result<String, RemoteError>;
}

/// A fixed, externally-resolved bearer token.
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    /// Wrap an already-resolved token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn bearer_token(&self) -> Result<String, RemoteError> {
        if self.token.is_empty() {
            return Err(RemoteError::Auth("empty bearer token".into()));
        }
        Ok(self.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_provider_hands_back_its_token() {
        let provider = StaticTokenProvider::new("ya29.test");
        assert_eq!(provider.bearer_token().await.unwrap(), "ya29.test");
    }

    #[tokio::test]
    async fn empty_token_is_an_auth_error() {
        let provider = StaticTokenProvider::new("");
        assert!(matches!(
            provider.bearer_token().await.unwrap_err(),
            RemoteError::Auth(_)
        ));
    }
}
