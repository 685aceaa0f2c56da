//! AES-GCM encryption and decryption behind the [`Cryptor`] contract.
//!
//! The key length picks the cipher strength: 16, 24, or 32 bytes select
//! AES-128, AES-192, or AES-256. A fresh random 96-bit nonce is drawn from
//! the OS CSPRNG on every encryption, so encrypting the same plaintext twice
//! under the same key always yields different envelopes. That property is a
//! hard security requirement of GCM, not an implementation detail: nonce
//! reuse under one key breaks both confidentiality and authentication.

use aes_gcm::{
    aead::{consts::U12, Aead, KeyInit, OsRng},
    Aes128Gcm, Aes256Gcm, AesGcm, Nonce,
};
use async_trait::async_trait;
use cryptor::{Cryptor, CryptorError, KeySize};
use tracing::debug;

use crate::envelope::{Envelope, NONCE_LEN};

/// AES-192-GCM is not aliased by the `aes-gcm` crate; spell it out.
type Aes192Gcm = AesGcm<aes_gcm::aes::Aes192, U12>;

/// The three cipher strengths, selected by key length at construction.
enum GcmCipher {
    Aes128(Box<Aes128Gcm>),
    Aes192(Box<Aes192Gcm>),
    Aes256(Box<Aes256Gcm>),
}

impl GcmCipher {
    fn seal(&self, nonce: &[u8; NONCE_LEN], plaintext: &[u8]) -> Result<Vec<u8>, CryptorError> {
        let nonce = Nonce::<U12>::from_slice(nonce);
        let sealed = match self {
            GcmCipher::Aes128(c) => c.encrypt(nonce, plaintext),
            GcmCipher::Aes192(c) => c.encrypt(nonce, plaintext),
            GcmCipher::Aes256(c) => c.encrypt(nonce, plaintext),
        };
        // Unreachable with a length-valid key and nonce, handled anyway.
        sealed.map_err(|_| CryptorError::CipherInit)
    }

    fn open(&self, nonce: &[u8; NONCE_LEN], sealed: &[u8]) -> Result<Vec<u8>, CryptorError> {
        let nonce = Nonce::<U12>::from_slice(nonce);
        let opened = match self {
            GcmCipher::Aes128(c) => c.decrypt(nonce, sealed),
            GcmCipher::Aes192(c) => c.decrypt(nonce, sealed),
            GcmCipher::Aes256(c) => c.decrypt(nonce, sealed),
        };
        opened.map_err(|_| CryptorError::AuthenticationFailed)
    }
}

/// Symmetric [`Cryptor`] backend over AES-GCM.
///
/// The key is consumed and validated once at construction; afterwards the
/// instance holds only the expanded cipher state, which is read-only shared
/// data. Safe for unlimited concurrent invocation.
pub struct AesGcmCryptor {
    cipher: GcmCipher,
}

impl std::fmt::Debug for AesGcmCryptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AesGcmCryptor").finish_non_exhaustive()
    }
}

impl AesGcmCryptor {
    /// Build a backend from a raw key.
    ///
    /// # Errors
    ///
    /// Returns [`CryptorError::InvalidKeyLength`] unless the key is exactly
    /// 16, 24, or 32 bytes, and [`CryptorError::CipherInit`] if the AEAD
    /// construction cannot be built from a length-valid key.
    pub fn new(key: &[u8]) -> Result<Self, CryptorError> {
        let size =
            KeySize::for_len(key.len()).ok_or(CryptorError::InvalidKeyLength(key.len()))?;
        let cipher = match size {
            KeySize::Aes128 => Aes128Gcm::new_from_slice(key)
                .map(|c| GcmCipher::Aes128(Box::new(c)))
                .map_err(|_| CryptorError::CipherInit)?,
            KeySize::Aes192 => Aes192Gcm::new_from_slice(key)
                .map(|c| GcmCipher::Aes192(Box::new(c)))
                .map_err(|_| CryptorError::CipherInit)?,
            KeySize::Aes256 => Aes256Gcm::new_from_slice(key)
                .map(|c| GcmCipher::Aes256(Box::new(c)))
                .map_err(|_| CryptorError::CipherInit)?,
        };
        debug!(key_bits = size.len() * 8, "aes-gcm backend constructed");
        Ok(Self { cipher })
    }
}

#[async_trait]
impl Cryptor for AesGcmCryptor {
    /// Seal `plaintext` under a fresh random nonce and return the base64
    /// envelope `nonce || ciphertext || tag`.
    async fn encrypt(&self, plaintext: &[u8]) -> Result<String, CryptorError> {
        use aes_gcm::aead::rand_core::RngCore;
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);

        let sealed = self.cipher.seal(&nonce, plaintext)?;
        Ok(Envelope { nonce, sealed }.encode())
    }

    /// Split the envelope into nonce and sealed bytes, then open it.
    async fn decrypt(&self, envelope: &[u8]) -> Result<Vec<u8>, CryptorError> {
        let envelope = Envelope::decode(envelope)?;
        self.cipher.open(&envelope.nonce, &envelope.sealed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use cryptor::generate_key;

    const PLAINTEXT: &[u8] = b"hello world";

    #[tokio::test]
    async fn round_trip_for_every_key_length() {
        for size in [KeySize::Aes128, KeySize::Aes192, KeySize::Aes256] {
            let key = generate_key(size);
            let backend = AesGcmCryptor::new(&key).unwrap();
            let envelope = backend.encrypt(PLAINTEXT).await.unwrap();
            let plain = backend.decrypt(envelope.as_bytes()).await.unwrap();
            assert_eq!(plain, PLAINTEXT, "key {} bytes", key.len());
        }
    }

    #[tokio::test]
    async fn zero_key_hello_world_round_trip() {
        let backend = AesGcmCryptor::new(&[0u8; 32]).unwrap();
        let envelope = backend.encrypt(b"hello world").await.unwrap();
        let plain = backend.decrypt(envelope.as_bytes()).await.unwrap();
        assert_eq!(plain, b"hello world");
    }

    #[test]
    fn twenty_byte_key_produces_no_backend() {
        let err = AesGcmCryptor::new(&[0u8; 20]).unwrap_err();
        assert!(matches!(err, CryptorError::InvalidKeyLength(20)));
    }

    #[test]
    fn other_invalid_lengths_rejected() {
        for len in [0usize, 1, 15, 17, 31, 33, 64] {
            let key = vec![0u8; len];
            assert!(
                matches!(
                    AesGcmCryptor::new(&key),
                    Err(CryptorError::InvalidKeyLength(_))
                ),
                "length {len} must be rejected"
            );
        }
    }

    #[tokio::test]
    async fn same_plaintext_twice_yields_different_envelopes() {
        let backend = AesGcmCryptor::new(&generate_key(KeySize::Aes256)).unwrap();
        let first = backend.encrypt(PLAINTEXT).await.unwrap();
        let second = backend.encrypt(PLAINTEXT).await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn sub_nonce_envelope_is_too_short() {
        let backend = AesGcmCryptor::new(&generate_key(KeySize::Aes128)).unwrap();
        let err = backend.decrypt(&[1, 2, 3, 4, 5]).await.unwrap_err();
        assert!(matches!(err, CryptorError::EnvelopeTooShort { .. }));
    }

    #[tokio::test]
    async fn flipped_trailing_byte_fails_authentication() {
        let backend = AesGcmCryptor::new(&generate_key(KeySize::Aes256)).unwrap();
        let envelope = backend.encrypt(PLAINTEXT).await.unwrap();

        // Flip the last byte of the raw envelope (inside the tag region).
        let mut raw = STANDARD.decode(&envelope).unwrap();
        let last = raw.len() - 1;
        raw[last] ^= 0xFF;

        let err = backend.decrypt(&raw).await.unwrap_err();
        assert!(matches!(err, CryptorError::AuthenticationFailed));
    }

    #[tokio::test]
    async fn wrong_key_fails_authentication() {
        let enc = AesGcmCryptor::new(&generate_key(KeySize::Aes256)).unwrap();
        let dec = AesGcmCryptor::new(&generate_key(KeySize::Aes256)).unwrap();
        let envelope = enc.encrypt(b"secret").await.unwrap();
        let err = dec.decrypt(envelope.as_bytes()).await.unwrap_err();
        assert!(matches!(err, CryptorError::AuthenticationFailed));
    }

    #[tokio::test]
    async fn decrypt_accepts_pre_decoded_envelopes() {
        let backend = AesGcmCryptor::new(&generate_key(KeySize::Aes192)).unwrap();
        let envelope = backend.encrypt(PLAINTEXT).await.unwrap();
        let raw = STANDARD.decode(&envelope).unwrap();
        assert_eq!(backend.decrypt(&raw).await.unwrap(), PLAINTEXT);
    }

    #[tokio::test]
    async fn empty_plaintext_round_trips() {
        let backend = AesGcmCryptor::new(&generate_key(KeySize::Aes256)).unwrap();
        let envelope = backend.encrypt(b"").await.unwrap();
        assert_eq!(backend.decrypt(envelope.as_bytes()).await.unwrap(), b"");
    }
}
