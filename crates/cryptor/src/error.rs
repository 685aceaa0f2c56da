//! Error taxonomy shared by every backend.
//!
//! Callers must be able to tell "tampered or wrong key" apart from "transient
//! remote failure", so integrity errors are distinct variants and are never
//! folded into the generic [`CryptorError::Remote`] case.

use thiserror::Error;

/// Boxed error used to surface remote transport/service failures verbatim.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure modes of [`Cryptor`](crate::Cryptor) and [`Signer`](crate::Signer)
/// backends.
///
/// Construction-time variants (`InvalidKeyLength`, `Config`,
/// `ChannelUnavailable`) mean no backend instance was produced; per-call
/// variants are returned by the operation that hit them.
#[derive(Debug, Error)]
pub enum CryptorError {
    /// The symmetric key is not 16, 24, or 32 bytes.
    #[error("invalid key length: {0} bytes (expected 16, 24, or 32)")]
    InvalidKeyLength(usize),

    /// The AEAD construction could not be built from a length-valid key.
    /// Should not occur after the length check, but is handled rather than
    /// assumed away.
    #[error("unable to initialise the underlying cipher")]
    CipherInit,

    /// A backend configuration value is missing or invalid.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The authenticated channel to the remote key service could not be
    /// established at construction time.
    #[error("remote key service channel unavailable: {0}")]
    ChannelUnavailable(#[source] BoxError),

    /// The envelope is shorter than one nonce, so it cannot even be split
    /// into its parts.
    #[error("envelope too short: {len} bytes, need at least {min}")]
    EnvelopeTooShort {
        /// Length of the rejected envelope.
        len: usize,
        /// Minimum acceptable length (one nonce).
        min: usize,
    },

    /// The authentication tag did not verify: the envelope was tampered with
    /// or the key is wrong.
    #[error("envelope authentication failed: data tampered with or wrong key")]
    AuthenticationFailed,

    /// A remote transport or service error, surfaced unchanged. Retry policy
    /// belongs to the caller.
    #[error("remote key service call failed: {0}")]
    Remote(#[source] BoxError),

    /// The remote service returned public key material this library cannot
    /// verify against (not an elliptic-curve key). The verify path never
    /// falls back to a weaker check.
    #[error("unsupported public key type: {0}")]
    UnsupportedKeyType(String),

    /// The public key material did not parse as a PEM-encoded
    /// SubjectPublicKeyInfo structure.
    #[error("malformed public key material: {0}")]
    MalformedPublicKey(String),

    /// The signature bytes did not parse as a DER-encoded `(r, s)` pair.
    #[error("malformed signature: not a DER-encoded (r, s) pair")]
    MalformedSignature,

    /// The elliptic-curve signature check did not pass.
    #[error("signature verification failed")]
    VerificationFailed,
}

impl CryptorError {
    /// Wrap an arbitrary remote failure for verbatim surfacing.
    pub fn remote<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        CryptorError::Remote(Box::new(err))
    }

    /// Returns `true` for integrity failures (tampered envelope, bad
    /// signature, wrong key) as opposed to configuration or transport
    /// problems.
    pub fn is_integrity(&self) -> bool {
        matches!(
            self,
            CryptorError::EnvelopeTooShort { .. }
                | CryptorError::AuthenticationFailed
                | CryptorError::MalformedSignature
                | CryptorError::VerificationFailed
        )
    }
}
