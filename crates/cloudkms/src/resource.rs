//! Hierarchical resource paths addressing remote keys.

use std::fmt;

use crate::config::KmsConfig;

/// Suffix appended to the encryption key id to derive the signing key id.
const SIGNING_KEY_SUFFIX: &str = "_sign";

/// Key version addressed by signing operations. Rotation policy is an
/// external concern, so the version is pinned.
const SIGNING_KEY_VERSION: &str = "1";

/// Immutable resource identifier for one remote crypto key and its derived
/// signing key.
///
/// Fixed at backend construction; rendered on demand into the path strings
/// the remote service expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPath {
    project: String,
    location: String,
    key_ring: String,
    crypto_key: String,
}

impl KeyPath {
    /// Build the resource identifier from validated configuration.
    pub fn from_config(cfg: &KmsConfig) -> Self {
        Self {
            project: cfg.project.clone(),
            location: cfg.location.clone(),
            key_ring: cfg.key_ring.clone(),
            crypto_key: cfg.crypto_key.clone(),
        }
    }

    /// Path of the encryption key:
    /// `projects/{p}/locations/{l}/keyRings/{r}/cryptoKeys/{k}`.
    pub fn encryption_key(&self) -> String {
        format!(
            "projects/{}/locations/{}/keyRings/{}/cryptoKeys/{}",
            self.project, self.location, self.key_ring, self.crypto_key
        )
    }

    /// Path of the derived signing key version: the encryption key id
    /// suffixed with `_sign`, addressed down to a key-version segment.
    pub fn signing_key_version(&self) -> String {
        format!(
            "projects/{}/locations/{}/keyRings/{}/cryptoKeys/{}{}/cryptoKeyVersions/{}",
            self.project,
            self.location,
            self.key_ring,
            self.crypto_key,
            SIGNING_KEY_SUFFIX,
            SIGNING_KEY_VERSION
        )
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encryption_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path() -> KeyPath {
        KeyPath::from_config(&KmsConfig {
            project: "acme-prod".into(),
            location: "global".into(),
            key_ring: "app-secrets".into(),
            crypto_key: "payments".into(),
        })
    }

    #[test]
    fn encryption_key_path_format() {
        assert_eq!(
            path().encryption_key(),
            "projects/acme-prod/locations/global/keyRings/app-secrets/cryptoKeys/payments"
        );
    }

    #[test]
    fn signing_key_derives_suffix_and_version() {
        assert_eq!(
            path().signing_key_version(),
            "projects/acme-prod/locations/global/keyRings/app-secrets/cryptoKeys/payments_sign/cryptoKeyVersions/1"
        );
    }

    #[test]
    fn display_renders_the_encryption_key() {
        assert_eq!(path().to_string(), path().encryption_key());
    }
}
