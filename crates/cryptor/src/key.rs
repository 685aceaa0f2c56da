//! Symmetric key sizes and fresh-key generation.

use rand::RngCore;

/// The three key lengths accepted by the AEAD backend, selecting
/// AES-128, AES-192, or AES-256.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySize {
    /// 16-byte key, AES-128.
    Aes128,
    /// 24-byte key, AES-192.
    Aes192,
    /// 32-byte key, AES-256.
    Aes256,
}

impl KeySize {
    /// Key length in bytes.
    pub const fn len(self) -> usize {
        match self {
            KeySize::Aes128 => 16,
            KeySize::Aes192 => 24,
            KeySize::Aes256 => 32,
        }
    }

    /// Map a byte length back to its key size. Returns `None` for any length
    /// other than 16, 24, or 32.
    pub const fn for_len(len: usize) -> Option<Self> {
        match len {
            16 => Some(KeySize::Aes128),
            24 => Some(KeySize::Aes192),
            32 => Some(KeySize::Aes256),
            _ => None,
        }
    }
}

/// Generate a fresh random key of the given size from the OS CSPRNG.
pub fn generate_key(size: KeySize) -> Vec<u8> {
    let mut key = vec![0u8; size.len()];
    rand::rngs::OsRng.fill_bytes(&mut key);
    key
}
