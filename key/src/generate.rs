//! Key pair generation for provisioning.
//!
//! These helpers mint fresh key material in the JWK interchange format. Only
//! the EC P-256 output feeds the token pipeline; RSA and symmetric keys are
//! produced for callers that provision other systems from the same place.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use p256::ecdsa::SigningKey;
use rand::rngs::OsRng;
use rand::RngCore;
use rsa::traits::{PrivateKeyParts, PublicKeyParts};
use rsa::RsaPrivateKey;
use uuid::Uuid;
use zeroize::Zeroize;

use crate::error::{KeyError, KeyResult};
use crate::jwk::Jwk;

const RSA_KEY_BITS: usize = 2048;
const AES_KEY_BYTES: usize = 32;
const AES_256_CBC_ALG: &str = "aes-256-cbc";

/// A freshly generated asymmetric key pair in JWK form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JwkKeyPair {
    /// Private half, including the public members.
    pub private_key: Jwk,
    /// Public half only.
    pub public_key: Jwk,
}

/// Generate a fresh EC key pair on the P-256 curve.
///
/// # Errors
/// Returns `KeyError` if the generated point is malformed, which indicates a
/// broken entropy source.
pub fn generate_ec_p256() -> KeyResult<JwkKeyPair> {
    let secret_key = p256::SecretKey::random(&mut OsRng);
    let signing_key = SigningKey::from(&secret_key);
    let point = signing_key.verifying_key().to_encoded_point(false);
    let x = point
        .x()
        .ok_or_else(|| KeyError::key_generation("generated point has no x coordinate"))?;
    let y = point
        .y()
        .ok_or_else(|| KeyError::key_generation("generated point has no y coordinate"))?;

    let x_b64 = URL_SAFE_NO_PAD.encode(x.as_slice());
    let y_b64 = URL_SAFE_NO_PAD.encode(y.as_slice());
    let d_b64 = URL_SAFE_NO_PAD.encode(secret_key.to_bytes().as_slice());

    tracing::debug!("generated EC P-256 key pair");
    Ok(JwkKeyPair {
        private_key: Jwk::ec_private(&x_b64, &y_b64, &d_b64),
        public_key: Jwk::ec_public(&x_b64, &y_b64),
    })
}

/// Generate a fresh RSA-2048 key pair.
///
/// Provisioning only: the token pipeline does not consume RSA keys.
///
/// # Errors
/// Returns `KeyError` if prime generation fails.
pub fn generate_rsa_2048() -> KeyResult<JwkKeyPair> {
    let private_key = RsaPrivateKey::new(&mut OsRng, RSA_KEY_BITS)
        .map_err(|e| KeyError::key_generation(&e.to_string()))?;
    let public_key = private_key.to_public_key();

    let n = URL_SAFE_NO_PAD.encode(public_key.n().to_bytes_be());
    let e = URL_SAFE_NO_PAD.encode(public_key.e().to_bytes_be());
    let d = URL_SAFE_NO_PAD.encode(private_key.d().to_bytes_be());

    tracing::debug!("generated RSA-2048 key pair");
    Ok(JwkKeyPair {
        private_key: Jwk::rsa_private(&n, &e, &d),
        public_key: Jwk::rsa_public(&n, &e),
    })
}

/// Generate a 256-bit symmetric key with a fresh key id and algorithm tag.
#[must_use]
pub fn generate_aes_256() -> Jwk {
    let mut key = [0u8; AES_KEY_BYTES];
    OsRng.fill_bytes(&mut key);
    let k = URL_SAFE_NO_PAD.encode(key.as_slice());
    key.zeroize();

    Jwk::symmetric(&k, &Uuid::new_v4().to_string(), AES_256_CBC_ALG)
}

#[cfg(test)]
mod tests {
    use super::*;
    use p256::ecdsa::signature::{Signer, Verifier};
    use p256::ecdsa::Signature;

    #[test]
    fn generated_ec_pair_signs_and_verifies() {
        let pair = generate_ec_p256().unwrap();
        let signing_key = crate::to_signing_handle(&pair.private_key).unwrap();
        let verifying_key = crate::to_verification_handle(&pair.public_key).unwrap();

        let message = b"attest this";
        let signature: Signature = signing_key.sign(message);
        verifying_key.verify(message, &signature).unwrap();
    }

    #[test]
    fn generated_ec_pairs_are_distinct() {
        let a = generate_ec_p256().unwrap();
        let b = generate_ec_p256().unwrap();
        assert_ne!(a.private_key.d, b.private_key.d);
        assert_ne!(a.public_key.x, b.public_key.x);
    }

    #[test]
    fn ec_private_jwk_carries_public_members() {
        let pair = generate_ec_p256().unwrap();
        assert_eq!(pair.private_key.x, pair.public_key.x);
        assert_eq!(pair.private_key.y, pair.public_key.y);
        assert!(pair.private_key.is_private());
        assert!(!pair.public_key.is_private());
    }

    #[test]
    fn symmetric_key_has_id_and_algorithm_tag() {
        let jwk = generate_aes_256();
        assert_eq!(jwk.kty, "oct");
        assert_eq!(jwk.alg.as_deref(), Some("aes-256-cbc"));
        assert!(jwk.kid.is_some());

        let raw = URL_SAFE_NO_PAD.decode(jwk.k.as_deref().unwrap()).unwrap();
        assert_eq!(raw.len(), 32);
    }

    #[test]
    #[ignore = "RSA prime generation is slow in debug builds"]
    fn generated_rsa_pair_shares_modulus() {
        let pair = generate_rsa_2048().unwrap();
        assert_eq!(pair.private_key.n, pair.public_key.n);
        assert_eq!(pair.private_key.e, pair.public_key.e);
        assert!(pair.private_key.d.is_some());
    }
}
