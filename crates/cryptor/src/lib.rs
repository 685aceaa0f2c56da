//! Capability contract for reversible data protection.
//!
//! A [`Cryptor`] turns plaintext bytes into a self-contained text envelope and
//! back. Two kinds of backend implement it:
//!
//! - a local symmetric AEAD cipher (`cryptor-aesgcm`), where the envelope
//!   carries everything needed for decryption except the key, and
//! - a remote key-management-service client (`cryptor-cloudkms`), where the
//!   envelope is an opaque token minted by the service.
//!
//! Backends holding asymmetric key material additionally implement [`Signer`].
//! Callers depend only on the traits here, so backends can be swapped without
//! code changes. No backend depends on another; both depend on this crate.

pub mod error;
pub mod key;

pub use error::{BoxError, CryptorError};
pub use key::{generate_key, KeySize};

use async_trait::async_trait;

/// Reversible data protection: produce a text envelope from plaintext and
/// recover the plaintext from an envelope.
///
/// Implementations are safe for concurrent use from multiple tasks: the only
/// shared state is immutable configuration fixed at construction.
#[async_trait]
pub trait Cryptor: Send + Sync {
    /// Encrypt `plaintext` into a text envelope.
    ///
    /// Each call is independent: the symmetric backend draws a fresh nonce
    /// from the OS CSPRNG, the remote backend performs one network round-trip.
    ///
    /// # Errors
    ///
    /// Returns [`CryptorError::Remote`] for remote transport or service
    /// failures (surfaced verbatim, never retried here) and
    /// [`CryptorError::CipherInit`] if the underlying cipher cannot be built.
    async fn encrypt(&self, plaintext: &[u8]) -> Result<String, CryptorError>;

    /// Decrypt an envelope back to the original plaintext.
    ///
    /// Must fail (never silently return garbage) if the envelope is
    /// malformed, truncated, or fails its authentication check.
    ///
    /// # Errors
    ///
    /// Returns [`CryptorError::EnvelopeTooShort`] for truncated input,
    /// [`CryptorError::AuthenticationFailed`] when the authentication tag does
    /// not verify (tampering or wrong key), and [`CryptorError::Remote`] for
    /// remote failures.
    async fn decrypt(&self, envelope: &[u8]) -> Result<Vec<u8>, CryptorError>;
}

/// Extended capability for backends with asymmetric key material.
///
/// The message itself never leaves the caller's trust boundary: only its
/// fixed-length digest is submitted for signing, which bounds what a
/// compromised remote channel can learn.
#[async_trait]
pub trait Signer: Cryptor {
    /// Produce a signature over `message`.
    ///
    /// A 256-bit digest of `message` is computed locally and submitted to the
    /// signing key; the returned bytes are a DER-encoded `(r, s)` pair.
    ///
    /// # Errors
    ///
    /// Returns [`CryptorError::Remote`] if the signing round-trip fails.
    async fn sign(&self, message: &[u8]) -> Result<Vec<u8>, CryptorError>;

    /// Check that `signature` is valid for `message` under this backend's key.
    ///
    /// # Errors
    ///
    /// Returns [`CryptorError::UnsupportedKeyType`] if the key material is not
    /// an elliptic-curve key, [`CryptorError::MalformedSignature`] if the
    /// signature bytes do not parse as a DER `(r, s)` pair, and
    /// [`CryptorError::VerificationFailed`] if the signature check itself does
    /// not pass.
    async fn verify(&self, signature: &[u8], message: &[u8]) -> Result<(), CryptorError>;
}
