//! Token type definitions: header, payload, claim values and call results.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

const TOKEN_TYPE: &str = "JWT";
const TOKEN_ALGORITHM: &str = "ES256";

/// Token header.
///
/// Every token this pipeline signs carries the same fixed header. Fields are
/// optional because the verifier also decodes headers from untrusted input,
/// where either may be absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenHeader {
    /// Token type, `"JWT"` on signed tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,
    /// Signing algorithm, `"ES256"` on signed tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
}

impl TokenHeader {
    /// The header applied to every signed token.
    #[must_use]
    pub fn es256() -> Self {
        Self {
            typ: Some(TOKEN_TYPE.to_string()),
            alg: Some(TOKEN_ALGORITHM.to_string()),
        }
    }
}

/// Token payload: registered claims plus caller data.
///
/// Registered fields are optional because the verifier decodes payloads from
/// untrusted input; the time check enforces the presence of `iat` and `exp`
/// separately. Caller-supplied public claims land in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenPayload {
    /// Issuer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    /// Unique token id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    /// Issued-at (unix seconds).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Expiry (unix seconds).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    /// Service name of the signing client.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    /// Public claims.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// A scalar public-claim value: string, number or boolean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClaimValue {
    /// String claim.
    String(String),
    /// Numeric claim.
    Number(serde_json::Number),
    /// Boolean claim.
    Bool(bool),
}

/// Caller-supplied public claims keyed by claim name.
pub type PublicClaims = HashMap<String, ClaimValue>;

impl From<&str> for ClaimValue {
    fn from(value: &str) -> Self {
        ClaimValue::String(value.to_string())
    }
}

impl From<String> for ClaimValue {
    fn from(value: String) -> Self {
        ClaimValue::String(value)
    }
}

impl From<i64> for ClaimValue {
    fn from(value: i64) -> Self {
        ClaimValue::Number(value.into())
    }
}

impl From<u64> for ClaimValue {
    fn from(value: u64) -> Self {
        ClaimValue::Number(value.into())
    }
}

impl From<i32> for ClaimValue {
    fn from(value: i32) -> Self {
        ClaimValue::Number(value.into())
    }
}

impl From<bool> for ClaimValue {
    fn from(value: bool) -> Self {
        ClaimValue::Bool(value)
    }
}

impl From<ClaimValue> for Value {
    fn from(value: ClaimValue) -> Self {
        match value {
            ClaimValue::String(s) => Value::String(s),
            ClaimValue::Number(n) => Value::Number(n),
            ClaimValue::Bool(b) => Value::Bool(b),
        }
    }
}

/// Result of a signing call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedToken {
    /// The compact token: `header.payload.signature`, base64url encoded.
    pub token: String,
    /// Expiry of the token (unix seconds), equal to the payload `exp`.
    pub expires: i64,
}

/// Result of a successful verification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifiedToken {
    /// Decoded header.
    pub header: TokenHeader,
    /// Decoded payload, registered and public claims merged.
    pub payload: TokenPayload,
    /// The raw base64url signature segment.
    pub signature: String,
}
