//! JWK interchange format and conversion to ECDSA key handles.
//!
//! The pipeline signs and verifies with ECDSA over P-256 only, so handle
//! conversion accepts exactly that key shape. RSA and symmetric members exist
//! on [`Jwk`] because provisioning produces them, but they never reach the
//! signing path.

use std::fmt;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use p256::ecdsa::{SigningKey, VerifyingKey};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{KeyError, KeyResult};

pub(crate) const EC_KEY_TYPE: &str = "EC";
pub(crate) const RSA_KEY_TYPE: &str = "RSA";
pub(crate) const OCT_KEY_TYPE: &str = "oct";
pub(crate) const P256_CURVE: &str = "P-256";

/// A JSON Web Key, restricted to the key shapes this workspace produces:
/// EC P-256 pairs, RSA-2048 pairs and 256-bit symmetric keys.
///
/// Private members (`d`, `k`) are wiped from memory when the key is dropped.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct Jwk {
    /// Key type: `"EC"`, `"RSA"` or `"oct"`.
    pub kty: String,
    /// EC curve name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crv: Option<String>,
    /// EC x coordinate, base64url.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<String>,
    /// EC y coordinate, base64url.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,
    /// Private scalar (EC) or private exponent (RSA), base64url.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub d: Option<String>,
    /// RSA modulus, base64url.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<String>,
    /// RSA public exponent, base64url.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub e: Option<String>,
    /// Symmetric key bytes, base64url.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub k: Option<String>,
    /// Key id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    /// Algorithm tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
}

impl Jwk {
    fn empty(kty: &str) -> Self {
        Self {
            kty: kty.to_string(),
            crv: None,
            x: None,
            y: None,
            d: None,
            n: None,
            e: None,
            k: None,
            kid: None,
            alg: None,
        }
    }

    /// Build a public EC P-256 key from base64url affine coordinates.
    #[must_use]
    pub fn ec_public(x: &str, y: &str) -> Self {
        let mut jwk = Self::empty(EC_KEY_TYPE);
        jwk.crv = Some(P256_CURVE.to_string());
        jwk.x = Some(x.to_string());
        jwk.y = Some(y.to_string());
        jwk
    }

    /// Build a private EC P-256 key from base64url coordinates and scalar.
    #[must_use]
    pub fn ec_private(x: &str, y: &str, d: &str) -> Self {
        let mut jwk = Self::ec_public(x, y);
        jwk.d = Some(d.to_string());
        jwk
    }

    /// Build a public RSA key from base64url modulus and exponent.
    #[must_use]
    pub fn rsa_public(n: &str, e: &str) -> Self {
        let mut jwk = Self::empty(RSA_KEY_TYPE);
        jwk.n = Some(n.to_string());
        jwk.e = Some(e.to_string());
        jwk
    }

    /// Build a private RSA key from base64url modulus and exponents.
    #[must_use]
    pub fn rsa_private(n: &str, e: &str, d: &str) -> Self {
        let mut jwk = Self::rsa_public(n, e);
        jwk.d = Some(d.to_string());
        jwk
    }

    /// Build a symmetric key from base64url key bytes.
    #[must_use]
    pub fn symmetric(k: &str, kid: &str, alg: &str) -> Self {
        let mut jwk = Self::empty(OCT_KEY_TYPE);
        jwk.k = Some(k.to_string());
        jwk.kid = Some(kid.to_string());
        jwk.alg = Some(alg.to_string());
        jwk
    }

    /// Whether this key carries private material.
    #[must_use]
    pub fn is_private(&self) -> bool {
        self.d.is_some() || self.k.is_some()
    }
}

// Private members never appear in debug output.
impl fmt::Debug for Jwk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Jwk")
            .field("kty", &self.kty)
            .field("crv", &self.crv)
            .field("x", &self.x)
            .field("y", &self.y)
            .field("d", &self.d.as_ref().map(|_| "<redacted>"))
            .field("n", &self.n)
            .field("e", &self.e)
            .field("k", &self.k.as_ref().map(|_| "<redacted>"))
            .field("kid", &self.kid)
            .field("alg", &self.alg)
            .finish()
    }
}

/// Convert private key material into an ECDSA signing handle.
///
/// # Errors
/// Returns `KeyError` if the key is not a private EC P-256 key or its members
/// do not decode to a valid scalar.
pub fn to_signing_handle(jwk: &Jwk) -> KeyResult<SigningKey> {
    Ok(SigningKey::from(&p256_secret_key(jwk)?))
}

/// Convert public key material into an ECDSA verification handle.
///
/// # Errors
/// Returns `KeyError` if the key is not an EC P-256 key or its coordinates do
/// not form a valid curve point.
pub fn to_verification_handle(jwk: &Jwk) -> KeyResult<VerifyingKey> {
    let sec1 = sec1_point_bytes(jwk)?;
    VerifyingKey::from_sec1_bytes(&sec1)
        .map_err(|_| KeyError::invalid_key("x and y do not form a valid P-256 point"))
}

pub(crate) fn p256_secret_key(jwk: &Jwk) -> KeyResult<p256::SecretKey> {
    require_p256(jwk)?;
    let d = jwk
        .d
        .as_deref()
        .ok_or_else(|| KeyError::invalid_key("private EC key is missing the d member"))?;
    let scalar = decode_member(d, "d")?;
    if scalar.len() != 32 {
        return Err(KeyError::invalid_key("d must decode to 32 bytes for P-256"));
    }
    p256::SecretKey::from_slice(&scalar)
        .map_err(|_| KeyError::invalid_key("d is not a valid P-256 scalar"))
}

/// Uncompressed SEC1 point: `0x04 || x || y`.
pub(crate) fn sec1_point_bytes(jwk: &Jwk) -> KeyResult<Vec<u8>> {
    require_p256(jwk)?;
    let x = jwk
        .x
        .as_deref()
        .ok_or_else(|| KeyError::invalid_key("EC key is missing the x member"))?;
    let y = jwk
        .y
        .as_deref()
        .ok_or_else(|| KeyError::invalid_key("EC key is missing the y member"))?;
    let x = decode_member(x, "x")?;
    let y = decode_member(y, "y")?;
    if x.len() != 32 || y.len() != 32 {
        return Err(KeyError::invalid_key(
            "x and y must decode to 32 bytes each for P-256",
        ));
    }
    let mut sec1 = Vec::with_capacity(65);
    sec1.push(0x04);
    sec1.extend_from_slice(&x);
    sec1.extend_from_slice(&y);
    Ok(sec1)
}

fn require_p256(jwk: &Jwk) -> KeyResult<()> {
    if jwk.kty != EC_KEY_TYPE {
        return Err(KeyError::unsupported_key_type(&jwk.kty));
    }
    match jwk.crv.as_deref() {
        Some(P256_CURVE) => Ok(()),
        Some(other) => Err(KeyError::unsupported_key_type(&format!("EC curve {other}"))),
        None => Err(KeyError::invalid_key("EC key is missing the crv member")),
    }
}

fn decode_member(value: &str, member: &str) -> KeyResult<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(value)
        .map_err(|_| KeyError::invalid_key(&format!("{member} member is not valid base64url")))
}
