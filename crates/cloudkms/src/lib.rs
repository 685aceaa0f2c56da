//! Remote key-management-service backend for the [`cryptor`] contract.
//!
//! Key material stays inside the remote service; this crate holds only a
//! hierarchical resource path and an authenticated channel. On top of
//! encrypt/decrypt it implements the extended [`cryptor::Signer`]
//! capability: messages are digested locally (SHA-256) and only the digest
//! travels to the asymmetric-sign endpoint, and signatures are verified
//! in-process against the fetched public key (ECDSA P-256, DER-encoded
//! `(r, s)` pairs).
//!
//! Credential resolution is out of scope: the backend takes a
//! [`TokenProvider`] and trusts whatever bearer token it produces.

pub mod auth;
pub mod config;
pub mod resource;
pub mod service;

mod client;
mod verify;

pub use auth::{StaticTokenProvider, TokenProvider};
pub use client::CloudKms;
pub use config::KmsConfig;
pub use resource::KeyPath;
pub use service::{HttpKmsService, KmsService, PublicKeyMaterial, RemoteError};
