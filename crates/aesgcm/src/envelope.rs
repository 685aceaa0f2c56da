//! The self-contained encrypted envelope and its text encoding.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use cryptor::CryptorError;

/// Byte length of an AES-GCM nonce (12 bytes = 96 bits).
pub const NONCE_LEN: usize = 12;

/// Byte length of the GCM authentication tag appended to the ciphertext.
pub const TAG_LEN: usize = 16;

/// A decoded envelope: the per-call nonce plus the sealed ciphertext+tag.
///
/// The string representation is `base64(nonce || ciphertext || tag)` using
/// the standard alphabet with padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Envelope {
    /// Raw nonce bytes, generated fresh per encryption.
    pub nonce: [u8; NONCE_LEN],
    /// Raw ciphertext + authentication tag bytes.
    pub sealed: Vec<u8>,
}

impl Envelope {
    /// Encode this envelope to its canonical transport string.
    pub fn encode(&self) -> String {
        let mut raw = Vec::with_capacity(NONCE_LEN + self.sealed.len());
        raw.extend_from_slice(&self.nonce);
        raw.extend_from_slice(&self.sealed);
        STANDARD.encode(raw)
    }

    /// Parse an envelope from its transport form.
    ///
    /// Accepts either the base64 text produced by [`Envelope::encode`] or the
    /// already-decoded raw concatenation; input that is not valid base64 is
    /// treated as raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CryptorError::EnvelopeTooShort`] if fewer than [`NONCE_LEN`]
    /// bytes remain after decoding, since the nonce cannot be split off.
    pub fn decode(input: &[u8]) -> Result<Self, CryptorError> {
        let raw = match STANDARD.decode(input) {
            Ok(decoded) => decoded,
            Err(_) => input.to_vec(),
        };
        if raw.len() < NONCE_LEN {
            return Err(CryptorError::EnvelopeTooShort {
                len: raw.len(),
                min: NONCE_LEN,
            });
        }
        let (nonce_bytes, sealed) = raw.split_at(NONCE_LEN);
        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(nonce_bytes);
        Ok(Self {
            nonce,
            sealed: sealed.to_vec(),
        })
    }
}
