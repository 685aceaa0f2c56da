//! The remote key service surface and its REST implementation.
//!
//! [`KmsService`] has one method per remote endpoint, with payloads already
//! base64-encoded the way the wire format wants them. Keeping the trait this
//! narrow lets tests drive the backend with a mock while
//! [`HttpKmsService`] does the real round-trips.

use std::sync::Arc;

use async_trait::async_trait;
use cryptor::CryptorError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::auth::TokenProvider;

/// Errors crossing the remote channel. Converted into
/// [`CryptorError::Remote`] at the contract boundary so callers see the
/// original failure unchanged.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The HTTP round-trip itself failed (DNS, connect, TLS, body read).
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("service returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message from the service's error body, or the canonical reason.
        message: String,
    },

    /// No bearer token could be produced for the request.
    #[error("authentication token unavailable: {0}")]
    Auth(String),

    /// A response payload field was not valid base64.
    #[error("response payload not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),
}

impl From<RemoteError> for CryptorError {
    fn from(err: RemoteError) -> Self {
        CryptorError::Remote(Box::new(err))
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct EncryptRequest<'a> {
    /// Base64-encoded plaintext.
    plaintext: &'a str,
}

#[derive(Debug, Deserialize)]
struct EncryptResponse {
    /// Opaque ciphertext token minted by the service.
    ciphertext: String,
}

#[derive(Debug, Serialize)]
struct DecryptRequest<'a> {
    /// Ciphertext token, base64-encoded.
    ciphertext: &'a str,
}

#[derive(Debug, Deserialize)]
struct DecryptResponse {
    /// Base64-encoded recovered plaintext.
    plaintext: String,
}

#[derive(Debug, Serialize)]
struct AsymmetricSignRequest<'a> {
    digest: DigestBody<'a>,
}

#[derive(Debug, Serialize)]
struct DigestBody<'a> {
    /// Base64-encoded SHA-256 digest of the message being signed.
    sha256: &'a str,
}

#[derive(Debug, Deserialize)]
struct AsymmetricSignResponse {
    /// Base64-encoded DER signature.
    signature: String,
}

/// Public key material returned by the service for one key version.
#[derive(Debug, Clone, Deserialize)]
pub struct PublicKeyMaterial {
    /// PEM-encoded public key block.
    pub pem: String,
    /// Service-side algorithm label, when present.
    #[serde(default)]
    pub algorithm: Option<String>,
}

/// Error body shape used by the service on non-2xx answers.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: ErrorStatus,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorStatus {
    #[serde(default)]
    message: String,
}

// ---------------------------------------------------------------------------
// Service trait
// ---------------------------------------------------------------------------

/// One method per remote endpoint. All `*_b64` parameters and returned
/// payload fields are base64 text, exactly as they travel on the wire.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KmsService: Send + Sync {
    /// `{key_path}:encrypt`: returns the opaque ciphertext token.
    async fn encrypt(&self, key_path: &str, plaintext_b64: &str) -> Result<String, RemoteError>;

    /// `{key_path}:decrypt`: returns the base64-encoded plaintext.
    async fn decrypt(&self, key_path: &str, ciphertext_b64: &str) -> Result<String, RemoteError>;

    /// `{key_version_path}:asymmetricSign`: signs a locally-computed digest,
    /// returns the base64-encoded DER signature.
    async fn asymmetric_sign(
        &self,
        key_version_path: &str,
        digest_b64: &str,
    ) -> Result<String, RemoteError>;

    /// `GET {key_version_path}/publicKey`: fetches the PEM public key block.
    async fn get_public_key(
        &self,
        key_version_path: &str,
    ) -> Result<PublicKeyMaterial, RemoteError>;
}

// ---------------------------------------------------------------------------
// REST implementation
// ---------------------------------------------------------------------------

/// [`KmsService`] over HTTPS/JSON.
///
/// Holds no per-call mutable state; concurrent calls on one instance are
/// safe. Deadlines and cancellation belong to the caller: configure them on
/// the channel by building the backend with a custom service if needed.
pub struct HttpKmsService {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
}

impl std::fmt::Debug for HttpKmsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpKmsService")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpKmsService {
    /// Production endpoint of the remote key service.
    pub const DEFAULT_BASE_URL: &'static str = "https://cloudkms.googleapis.com/v1";

    /// Establish the authenticated channel against the production endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`CryptorError::ChannelUnavailable`] if the HTTP client cannot
    /// be built or no initial bearer token can be resolved. This is a
    /// construction failure: no service handle is produced.
    pub async fn connect(tokens: Arc<dyn TokenProvider>) -> Result<Self, CryptorError> {
        Self::connect_to(Self::DEFAULT_BASE_URL, tokens).await
    }

    /// Establish the authenticated channel against a specific base URL.
    ///
    /// # Errors
    ///
    /// Same as [`HttpKmsService::connect`].
    pub async fn connect_to(
        base_url: impl Into<String>,
        tokens: Arc<dyn TokenProvider>,
    ) -> Result<Self, CryptorError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("cryptor-cloudkms/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CryptorError::ChannelUnavailable(Box::new(e)))?;

        // Resolve a token once up front: a channel that cannot authenticate
        // is a bootstrap failure, not a per-call error.
        tokens
            .bearer_token()
            .await
            .map_err(|e| CryptorError::ChannelUnavailable(Box::new(e)))?;

        let base_url = base_url.into();
        debug!(base_url = %base_url, "remote key service channel established");
        Ok(Self {
            http,
            base_url,
            tokens,
        })
    }

    async fn post_json<B, R>(&self, url: &str, body: &B) -> Result<R, RemoteError>
    where
        B: Serialize + Sync,
        R: serde::de::DeserializeOwned,
    {
        let token = self.tokens.bearer_token().await?;
        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    async fn get_json<R>(&self, url: &str) -> Result<R, RemoteError>
    where
        R: serde::de::DeserializeOwned,
    {
        let token = self.tokens.bearer_token().await?;
        let response = self.http.get(url).bearer_auth(token).send().await?;
        Self::handle_response(response).await
    }

    async fn handle_response<R>(response: reqwest::Response) -> Result<R, RemoteError>
    where
        R: serde::de::DeserializeOwned,
    {
        let status = response.status();
        if !status.is_success() {
            // Prefer the message from the structured error body.
            let message = match response.json::<ErrorBody>().await {
                Ok(body) if !body.error.message.is_empty() => body.error.message,
                _ => status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string(),
            };
            return Err(RemoteError::Status {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json::<R>().await?)
    }
}

#[async_trait]
impl KmsService for HttpKmsService {
    async fn encrypt(&self, key_path: &str, plaintext_b64: &str) -> Result<String, RemoteError> {
        debug!(key = %key_path, "remote encrypt");
        let url = format!("{}/{}:encrypt", self.base_url, key_path);
        let response: EncryptResponse = self
            .post_json(
                &url,
                &EncryptRequest {
                    plaintext: plaintext_b64,
                },
            )
            .await?;
        Ok(response.ciphertext)
    }

    async fn decrypt(&self, key_path: &str, ciphertext_b64: &str) -> Result<String, RemoteError> {
        debug!(key = %key_path, "remote decrypt");
        let url = format!("{}/{}:decrypt", self.base_url, key_path);
        let response: DecryptResponse = self
            .post_json(
                &url,
                &DecryptRequest {
                    ciphertext: ciphertext_b64,
                },
            )
            .await?;
        Ok(response.plaintext)
    }

    async fn asymmetric_sign(
        &self,
        key_version_path: &str,
        digest_b64: &str,
    ) -> Result<String, RemoteError> {
        debug!(key = %key_version_path, "remote asymmetric sign");
        let url = format!("{}/{}:asymmetricSign", self.base_url, key_version_path);
        let response: AsymmetricSignResponse = self
            .post_json(
                &url,
                &AsymmetricSignRequest {
                    digest: DigestBody { sha256: digest_b64 },
                },
            )
            .await?;
        Ok(response.signature)
    }

    async fn get_public_key(
        &self,
        key_version_path: &str,
    ) -> Result<PublicKeyMaterial, RemoteError> {
        debug!(key = %key_version_path, "remote public key fetch");
        let url = format!("{}/{}/publicKey", self.base_url, key_version_path);
        self.get_json(&url).await
    }
}
