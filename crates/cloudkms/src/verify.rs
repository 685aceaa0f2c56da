//! Local elliptic-curve signature verification.
//!
//! The remote service hands back a PEM public-key block; everything after
//! that fetch happens in-process: SPKI parsing, the algorithm check, DER
//! `(r, s)` decoding, digesting, and the curve math.

use cryptor::CryptorError;
use p256::ecdsa::signature::hazmat::PrehashVerifier;
use p256::ecdsa::{Signature, VerifyingKey};
use p256::pkcs8::der::{Decode, Document};
use p256::pkcs8::spki::{DecodePublicKey, ObjectIdentifier, SubjectPublicKeyInfoRef};
use sha2::{Digest, Sha256};

/// id-ecPublicKey, the only key algorithm the verify path accepts.
const ID_EC_PUBLIC_KEY: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");

/// Check a DER-encoded `(r, s)` signature over `message` against a
/// PEM-encoded public key.
///
/// The algorithm identifier is checked before any signature parsing: a
/// non-elliptic-curve key must fail fast, never fall through to a weaker
/// check.
///
/// # Errors
///
/// - [`CryptorError::MalformedPublicKey`] if the PEM or SPKI structure does
///   not parse.
/// - [`CryptorError::UnsupportedKeyType`] if the key algorithm is not
///   id-ecPublicKey.
/// - [`CryptorError::MalformedSignature`] if `signature` is not a DER
///   `(r, s)` pair.
/// - [`CryptorError::VerificationFailed`] if the curve check does not pass.
pub(crate) fn verify_ec_signature(
    pem: &str,
    signature: &[u8],
    message: &[u8],
) -> Result<(), CryptorError> {
    let (_label, doc) =
        Document::from_pem(pem).map_err(|e| CryptorError::MalformedPublicKey(e.to_string()))?;
    let spki = SubjectPublicKeyInfoRef::from_der(doc.as_bytes())
        .map_err(|e| CryptorError::MalformedPublicKey(e.to_string()))?;

    if spki.algorithm.oid != ID_EC_PUBLIC_KEY {
        return Err(CryptorError::UnsupportedKeyType(
            spki.algorithm.oid.to_string(),
        ));
    }

    let key = VerifyingKey::from_public_key_der(doc.as_bytes())
        .map_err(|e| CryptorError::MalformedPublicKey(e.to_string()))?;

    let signature =
        Signature::from_der(signature).map_err(|_| CryptorError::MalformedSignature)?;

    let digest = Sha256::digest(message);
    key.verify_prehash(digest.as_slice(), &signature)
        .map_err(|_| CryptorError::VerificationFailed)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use p256::ecdsa::signature::hazmat::PrehashSigner;
    use p256::ecdsa::SigningKey;
    use p256::pkcs8::spki::EncodePublicKey;
    use p256::pkcs8::LineEnding;

    /// Deterministic P-256 key pair for tests; the scalar is a valid
    /// non-zero field element.
    pub(crate) fn test_signing_key() -> SigningKey {
        SigningKey::from_slice(&[0x01; 32]).unwrap()
    }

    pub(crate) fn test_public_key_pem(key: &SigningKey) -> String {
        key.verifying_key()
            .to_public_key_pem(LineEnding::LF)
            .unwrap()
    }

    pub(crate) fn sign_der(key: &SigningKey, message: &[u8]) -> Vec<u8> {
        let digest = Sha256::digest(message);
        let signature: Signature = key.sign_prehash(digest.as_slice()).unwrap();
        signature.to_der().as_bytes().to_vec()
    }

    /// A syntactically valid SPKI block for a key type the verify path must
    /// refuse (Ed25519, OID 1.3.101.112).
    pub(crate) fn ed25519_public_key_pem() -> String {
        let mut der = vec![
            0x30, 0x2a, // SEQUENCE, 42 bytes
            0x30, 0x05, 0x06, 0x03, 0x2b, 0x65, 0x70, // AlgorithmIdentifier: id-Ed25519
            0x03, 0x21, 0x00, // BIT STRING, 33 bytes, 0 unused bits
        ];
        der.extend_from_slice(&[0u8; 32]);
        format!(
            "-----BEGIN PUBLIC KEY-----\n{}\n-----END PUBLIC KEY-----\n",
            STANDARD.encode(&der)
        )
    }

    #[test]
    fn valid_signature_verifies() {
        let key = test_signing_key();
        let pem = test_public_key_pem(&key);
        let message = b"attest this";
        let signature = sign_der(&key, message);
        assert!(verify_ec_signature(&pem, &signature, message).is_ok());
    }

    #[test]
    fn flipped_signature_byte_fails_verification() {
        let key = test_signing_key();
        let pem = test_public_key_pem(&key);
        let message = b"attest this";
        let mut signature = sign_der(&key, message);

        // Flip a value byte at the tail; the DER framing stays intact, so
        // this must surface as a failed check, not a parse error.
        let last = signature.len() - 1;
        signature[last] ^= 0x01;

        assert!(matches!(
            verify_ec_signature(&pem, &signature, message),
            Err(CryptorError::VerificationFailed)
        ));
    }

    #[test]
    fn different_message_fails_verification() {
        let key = test_signing_key();
        let pem = test_public_key_pem(&key);
        let signature = sign_der(&key, b"signed message");
        assert!(matches!(
            verify_ec_signature(&pem, &signature, b"other message"),
            Err(CryptorError::VerificationFailed)
        ));
    }

    #[test]
    fn non_ec_key_is_unsupported_before_any_signature_math() {
        let key = test_signing_key();
        let signature = sign_der(&key, b"msg");
        let err = verify_ec_signature(&ed25519_public_key_pem(), &signature, b"msg").unwrap_err();
        match err {
            CryptorError::UnsupportedKeyType(oid) => assert_eq!(oid, "1.3.101.112"),
            other => panic!("expected UnsupportedKeyType, got {other:?}"),
        }

        // Garbage signature bytes with a non-EC key: the key check must win.
        let err =
            verify_ec_signature(&ed25519_public_key_pem(), b"not-a-signature", b"msg").unwrap_err();
        assert!(matches!(err, CryptorError::UnsupportedKeyType(_)));
    }

    #[test]
    fn garbage_signature_is_malformed() {
        let key = test_signing_key();
        let pem = test_public_key_pem(&key);
        assert!(matches!(
            verify_ec_signature(&pem, b"not-a-der-signature", b"msg"),
            Err(CryptorError::MalformedSignature)
        ));
    }

    #[test]
    fn garbage_pem_is_malformed_public_key() {
        assert!(matches!(
            verify_ec_signature("not a pem block", b"sig", b"msg"),
            Err(CryptorError::MalformedPublicKey(_))
        ));
    }
}
