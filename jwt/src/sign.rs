//! Token signing: claim assembly, canonical serialization and ES256
//! signature creation.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::Utc;
use p256::ecdsa::{signature::Signer, Signature};
use serde_json::Value;
use uuid::Uuid;

use crate::error::{JwtError, JwtResult};
use crate::types::{PublicClaims, SignedToken, TokenHeader};
use signet_key::{to_signing_handle, Jwk};

pub(crate) fn create_token(
    claims: &PublicClaims,
    private_key: &Jwk,
    expires_in: u32,
    issuer: &str,
    service_name: &str,
) -> JwtResult<SignedToken> {
    let iat = Utc::now().timestamp();
    let exp = iat + i64::from(expires_in);
    let jti = Uuid::new_v4().to_string();

    let header = TokenHeader::es256();
    let payload = build_payload(claims, issuer, service_name, &jti, iat, exp);
    let string_to_sign = string_to_sign(&header, &payload)?;

    let signing_key = to_signing_handle(private_key)?;
    let signature: Signature = signing_key.sign(string_to_sign.as_bytes());
    let der = signature.to_der();
    let signature_b64 = URL_SAFE_NO_PAD.encode(der.as_bytes());

    let mut token = String::with_capacity(string_to_sign.len() + 1 + signature_b64.len());
    token.push_str(&string_to_sign);
    token.push('.');
    token.push_str(&signature_b64);

    tracing::debug!(%jti, expires = exp, "signed token");
    Ok(SignedToken {
        token,
        expires: exp,
    })
}

/// Merge caller claims with the registered claim set. Registered claims are
/// inserted last and win any name collision.
fn build_payload(
    claims: &PublicClaims,
    issuer: &str,
    service_name: &str,
    jti: &str,
    iat: i64,
    exp: i64,
) -> Value {
    let mut payload = serde_json::Map::new();
    for (name, value) in claims {
        payload.insert(name.clone(), value.clone().into());
    }
    payload.insert(
        "service".to_string(),
        Value::String(service_name.to_string()),
    );
    payload.insert("iss".to_string(), Value::String(issuer.to_string()));
    payload.insert("jti".to_string(), Value::String(jti.to_string()));
    payload.insert("iat".to_string(), Value::Number(iat.into()));
    payload.insert("exp".to_string(), Value::Number(exp.into()));
    Value::Object(payload)
}

/// Serialize header and payload to canonical JSON and join the base64url
/// segments with a dot. These exact bytes are what gets signed.
fn string_to_sign(header: &TokenHeader, payload: &Value) -> JwtResult<String> {
    let header_json =
        serde_json::to_vec(header).map_err(|e| JwtError::serialization(&e.to_string()))?;
    let payload_json =
        serde_json::to_vec(payload).map_err(|e| JwtError::serialization(&e.to_string()))?;

    let header_b64 = URL_SAFE_NO_PAD.encode(&header_json);
    let payload_b64 = URL_SAFE_NO_PAD.encode(&payload_json);

    let mut out = String::with_capacity(header_b64.len() + 1 + payload_b64.len());
    out.push_str(&header_b64);
    out.push('.');
    out.push_str(&payload_b64);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ClaimValue;
    use std::collections::HashMap;

    #[test]
    fn header_segment_is_fixed() {
        let header = TokenHeader::es256();
        let payload = build_payload(&HashMap::new(), "iss", "svc", "id", 0, 1);
        let string_to_sign = string_to_sign(&header, &payload).unwrap();
        let header_b64 = string_to_sign.split('.').next().unwrap();
        assert_eq!(
            header_b64,
            URL_SAFE_NO_PAD.encode(br#"{"typ":"JWT","alg":"ES256"}"#)
        );
    }

    #[test]
    fn registered_claims_win_collisions() {
        let mut claims = HashMap::new();
        claims.insert("iss".to_string(), ClaimValue::from("spoofed"));
        claims.insert("exp".to_string(), ClaimValue::from(i64::MAX));
        claims.insert("role".to_string(), ClaimValue::from("admin"));

        let payload = build_payload(&claims, "real-issuer", "svc", "id", 100, 200);
        assert_eq!(payload["iss"], "real-issuer");
        assert_eq!(payload["exp"], 200);
        assert_eq!(payload["iat"], 100);
        assert_eq!(payload["role"], "admin");
        assert_eq!(payload["service"], "svc");
    }

    #[test]
    fn payload_always_carries_registered_set() {
        let payload = build_payload(&HashMap::new(), "iss", "svc", "token-id", 10, 20);
        let object = payload.as_object().unwrap();
        for claim in ["iss", "jti", "iat", "exp", "service"] {
            assert!(object.contains_key(claim), "missing {claim}");
        }
        assert_eq!(payload["jti"], "token-id");
    }
}
