//! Configuration loading and validation for the remote KMS backend.
//!
//! The four key identifiers are read from `KMS_*` environment variables.
//! Loading returns a typed error so the caller decides how to recover; the
//! backend never terminates the process.

use cryptor::CryptorError;
use serde::Deserialize;

/// Validated identifiers addressing one remote crypto key.
///
/// All four fields are required and immutable once the backend is
/// constructed.
#[derive(Debug, Clone, Deserialize)]
pub struct KmsConfig {
    /// Project identifier. Env: `KMS_PROJECT`.
    pub project: String,

    /// Location identifier (e.g. `"global"`). Env: `KMS_LOCATION`.
    pub location: String,

    /// Key ring identifier. Env: `KMS_KEY_RING`.
    pub key_ring: String,

    /// Crypto key identifier; the signing key id is derived from it.
    /// Env: `KMS_CRYPTO_KEY`.
    pub crypto_key: String,
}

impl KmsConfig {
    /// Load and validate configuration from `KMS_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`CryptorError::Config`] if any variable is absent, cannot be
    /// deserialised, or is empty.
    pub fn from_env() -> Result<Self, CryptorError> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::with_prefix("KMS"))
            .build()
            .map_err(|e| CryptorError::Config(e.to_string()))?;

        let c: KmsConfig = cfg
            .try_deserialize()
            .map_err(|e| CryptorError::Config(e.to_string()))?;

        c.validate()?;
        Ok(c)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    pub fn validate(&self) -> Result<(), CryptorError> {
        ensure_non_empty(&self.project, "KMS_PROJECT")?;
        ensure_non_empty(&self.location, "KMS_LOCATION")?;
        ensure_non_empty(&self.key_ring, "KMS_KEY_RING")?;
        ensure_non_empty(&self.crypto_key, "KMS_CRYPTO_KEY")?;
        Ok(())
    }
}

fn ensure_non_empty(value: &str, name: &str) -> Result<(), CryptorError> {
    if value.trim().is_empty() {
        return Err(CryptorError::Config(format!(
            "{name} is required and must not be empty"
        )));
    }
    Ok(())
}
