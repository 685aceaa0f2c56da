//! The remote [`Cryptor`]/[`Signer`] backend.

use std::sync::Arc;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use cryptor::{Cryptor, CryptorError, Signer};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::auth::TokenProvider;
use crate::config::KmsConfig;
use crate::resource::KeyPath;
use crate::service::{HttpKmsService, KmsService, RemoteError};
use crate::verify::verify_ec_signature;

/// Backend that delegates encrypt/decrypt and signature operations to a
/// remote key-management service.
///
/// The key material never exists in this process: the "key" is the
/// [`KeyPath`] resource identifier, fixed at construction. Every operation is
/// one network round-trip (plus a public-key fetch inside
/// [`Signer::verify`]); errors from the service surface verbatim, and retry
/// policy stays with the caller.
pub struct CloudKms {
    keys: KeyPath,
    service: Arc<dyn KmsService>,
}

impl std::fmt::Debug for CloudKms {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudKms").field("keys", &self.keys).finish_non_exhaustive()
    }
}

impl CloudKms {
    /// Establish the authenticated channel and build the backend.
    ///
    /// # Errors
    ///
    /// Returns [`CryptorError::Config`] for invalid identifiers and
    /// [`CryptorError::ChannelUnavailable`] if the channel cannot be
    /// established. Both are construction failures: no backend is produced.
    pub async fn connect(
        config: KmsConfig,
        tokens: Arc<dyn TokenProvider>,
    ) -> Result<Self, CryptorError> {
        config.validate()?;
        let service = HttpKmsService::connect(tokens).await?;
        Ok(Self::with_service(config, Arc::new(service)))
    }

    /// Build the backend over an already-established service handle.
    ///
    /// This is the seam for custom transports (endpoint overrides, injected
    /// deadlines) and for tests.
    pub fn with_service(config: KmsConfig, service: Arc<dyn KmsService>) -> Self {
        let keys = KeyPath::from_config(&config);
        debug!(key = %keys, "remote backend constructed");
        Self { keys, service }
    }

    /// The resource identifier this backend addresses.
    pub fn key_path(&self) -> &KeyPath {
        &self.keys
    }
}

#[async_trait]
impl Cryptor for CloudKms {
    /// Base64-encode the plaintext, submit it to the encryption key, and
    /// return the service's ciphertext token as-is.
    async fn encrypt(&self, plaintext: &[u8]) -> Result<String, CryptorError> {
        let token = self
            .service
            .encrypt(&self.keys.encryption_key(), &STANDARD.encode(plaintext))
            .await?;
        Ok(token)
    }

    /// Submit the ciphertext token and decode the recovered plaintext.
    async fn decrypt(&self, envelope: &[u8]) -> Result<Vec<u8>, CryptorError> {
        let plaintext_b64 = self
            .service
            .decrypt(&self.keys.encryption_key(), &STANDARD.encode(envelope))
            .await?;
        STANDARD
            .decode(plaintext_b64)
            .map_err(|e| RemoteError::Encoding(e).into())
    }
}

#[async_trait]
impl Signer for CloudKms {
    /// Digest the message locally and submit only the digest: the raw
    /// message never leaves the caller's trust boundary.
    async fn sign(&self, message: &[u8]) -> Result<Vec<u8>, CryptorError> {
        let digest = Sha256::digest(message);
        let signature_b64 = self
            .service
            .asymmetric_sign(
                &self.keys.signing_key_version(),
                &STANDARD.encode(digest.as_slice()),
            )
            .await?;
        STANDARD
            .decode(signature_b64)
            .map_err(|e| RemoteError::Encoding(e).into())
    }

    /// Fetch the public key for the signing key version and run the curve
    /// check locally.
    ///
    /// The key is fetched on every call, trading a round-trip for freshness
    /// against key rotation; callers that need low latency should cache the
    /// fetched key externally.
    async fn verify(&self, signature: &[u8], message: &[u8]) -> Result<(), CryptorError> {
        let material = self
            .service
            .get_public_key(&self.keys.signing_key_version())
            .await?;
        verify_ec_signature(&material.pem, signature, message)
    }
}
