//! Symmetric AES-GCM backend for the [`cryptor`] contract.
//!
//! This crate is intentionally free of network and configuration
//! dependencies. It is pure local CPU work: each call allocates its own nonce
//! and buffers, so one instance may be shared across any number of tasks.
//!
//! # Envelope wire format
//!
//! ```text
//! base64( nonce[12] || ciphertext || tag[16] )
//! ```
//!
//! The envelope is self-contained: any consumer holding the same key and
//! using the same AEAD construction can decrypt it. No associated data is
//! used.

pub mod cipher;
mod envelope;

pub use cipher::AesGcmCryptor;
pub use envelope::{NONCE_LEN, TAG_LEN};
