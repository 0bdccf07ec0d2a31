//! Token verification: decode, signature check, time check.
//!
//! The stages run in that order and each aborts with its own error kind.
//! Structural validation rejects garbage before any cryptography runs, but
//! the signature is always checked against the original encoded segments:
//! re-serializing the decoded JSON can produce different bytes than the ones
//! that were signed.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::Utc;
use p256::ecdsa::{signature::Verifier, Signature};

use crate::error::{JwtError, JwtResult};
use crate::types::{TokenHeader, TokenPayload, VerifiedToken};
use signet_key::{to_verification_handle, Jwk};

pub(crate) fn verify_token(token: &str, public_key: &Jwk) -> JwtResult<VerifiedToken> {
    let decoded = decode_token(token)?;
    check_signature(&decoded, public_key)?;
    check_time(&decoded.payload, Utc::now().timestamp())?;

    tracing::debug!(jti = ?decoded.payload.jti, "verified token");
    Ok(VerifiedToken {
        header: decoded.header,
        payload: decoded.payload,
        signature: decoded.signature,
    })
}

#[derive(Debug)]
pub(crate) struct DecodedToken {
    pub header: TokenHeader,
    pub payload: TokenPayload,
    /// Raw third segment, still base64url.
    pub signature: String,
    /// The original first two segments rejoined with a dot.
    pub string_to_sign: String,
}

pub(crate) fn decode_token(token: &str) -> JwtResult<DecodedToken> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(JwtError::malformed(
            "token must have exactly three dot-separated segments",
        ));
    }
    let (header_b64, payload_b64, signature) = (segments[0], segments[1], segments[2]);

    let header_json = URL_SAFE_NO_PAD
        .decode(header_b64)
        .map_err(|_| JwtError::malformed("header segment is not valid base64url"))?;
    let header: TokenHeader = serde_json::from_slice(&header_json)
        .map_err(|_| JwtError::malformed("header segment is not valid JSON"))?;

    let payload_json = URL_SAFE_NO_PAD
        .decode(payload_b64)
        .map_err(|_| JwtError::malformed("payload segment is not valid base64url"))?;
    let payload: TokenPayload = serde_json::from_slice(&payload_json)
        .map_err(|_| JwtError::malformed("payload segment is not valid JSON"))?;

    let mut string_to_sign = String::with_capacity(header_b64.len() + 1 + payload_b64.len());
    string_to_sign.push_str(header_b64);
    string_to_sign.push('.');
    string_to_sign.push_str(payload_b64);

    Ok(DecodedToken {
        header,
        payload,
        signature: signature.to_string(),
        string_to_sign,
    })
}

pub(crate) fn check_signature(decoded: &DecodedToken, public_key: &Jwk) -> JwtResult<()> {
    if decoded.signature.is_empty() {
        return Err(JwtError::InvalidSignature);
    }

    let verifying_key = to_verification_handle(public_key)?;
    let signature_bytes = URL_SAFE_NO_PAD
        .decode(&decoded.signature)
        .map_err(|_| JwtError::InvalidSignature)?;
    let signature = Signature::from_der(&signature_bytes).map_err(|_| JwtError::InvalidSignature)?;

    verifying_key
        .verify(decoded.string_to_sign.as_bytes(), &signature)
        .map_err(|_| JwtError::InvalidSignature)
}

pub(crate) fn check_time(payload: &TokenPayload, now: i64) -> JwtResult<()> {
    let iat = payload
        .iat
        .ok_or_else(|| JwtError::malformed("payload is missing the iat claim"))?;
    let exp = payload
        .exp
        .ok_or_else(|| JwtError::malformed("payload is missing the exp claim"))?;

    if now > exp {
        return Err(JwtError::TokenExpired);
    }
    if now < iat {
        return Err(JwtError::TokenNotYetValid);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(iat: i64, exp: i64) -> TokenPayload {
        TokenPayload {
            iat: Some(iat),
            exp: Some(exp),
            ..TokenPayload::default()
        }
    }

    #[test]
    fn time_window_boundaries_are_inclusive() {
        // Valid on the whole closed interval [iat, exp].
        assert!(check_time(&payload(100, 200), 100).is_ok());
        assert!(check_time(&payload(100, 200), 150).is_ok());
        assert!(check_time(&payload(100, 200), 200).is_ok());
    }

    #[test]
    fn expired_past_the_boundary() {
        let err = check_time(&payload(100, 200), 201).unwrap_err();
        assert!(matches!(err, JwtError::TokenExpired));
    }

    #[test]
    fn not_yet_valid_before_issued_at() {
        let err = check_time(&payload(100, 200), 99).unwrap_err();
        assert!(matches!(err, JwtError::TokenNotYetValid));
    }

    #[test]
    fn missing_time_claims_are_malformed() {
        let mut missing_iat = payload(0, 200);
        missing_iat.iat = None;
        assert!(matches!(
            check_time(&missing_iat, 150).unwrap_err(),
            JwtError::MalformedToken(_)
        ));

        let mut missing_exp = payload(100, 0);
        missing_exp.exp = None;
        assert!(matches!(
            check_time(&missing_exp, 150).unwrap_err(),
            JwtError::MalformedToken(_)
        ));
    }

    #[test]
    fn decode_requires_three_segments() {
        for token in ["a.b", "a.b.c.d", "abc", "..."] {
            assert!(matches!(
                decode_token(token).unwrap_err(),
                JwtError::MalformedToken(_)
            ));
        }
    }

    #[test]
    fn decode_rejects_invalid_base64url() {
        assert!(matches!(
            decode_token("!!!.???.sig").unwrap_err(),
            JwtError::MalformedToken(_)
        ));
    }

    #[test]
    fn decode_rejects_non_json_segments() {
        let header = URL_SAFE_NO_PAD.encode(b"not json");
        let payload = URL_SAFE_NO_PAD.encode(b"{}");
        let token = format!("{header}.{payload}.sig");
        assert!(matches!(
            decode_token(&token).unwrap_err(),
            JwtError::MalformedToken(_)
        ));
    }

    #[test]
    fn decode_preserves_original_segments() {
        // Non-canonical JSON (extra whitespace) must survive decoding as-is in
        // the string-to-sign.
        let header_b64 = URL_SAFE_NO_PAD.encode(br#"{ "typ": "JWT", "alg": "ES256" }"#);
        let payload_b64 = URL_SAFE_NO_PAD.encode(br#"{ "iat": 1, "exp": 2 }"#);
        let token = format!("{header_b64}.{payload_b64}.sig");

        let decoded = decode_token(&token).unwrap();
        assert_eq!(decoded.string_to_sign, format!("{header_b64}.{payload_b64}"));
        assert_eq!(decoded.signature, "sig");
        assert_eq!(decoded.payload.iat, Some(1));
        assert_eq!(decoded.header.typ.as_deref(), Some("JWT"));
    }

    #[test]
    fn empty_signature_segment_is_rejected() {
        let header_b64 = URL_SAFE_NO_PAD.encode(br#"{"typ":"JWT","alg":"ES256"}"#);
        let payload_b64 = URL_SAFE_NO_PAD.encode(br#"{"iat":1,"exp":2}"#);
        let token = format!("{header_b64}.{payload_b64}.");

        let decoded = decode_token(&token).unwrap();
        let pair = signet_key::generate_ec_p256().unwrap();
        assert!(matches!(
            check_signature(&decoded, &pair.public_key).unwrap_err(),
            JwtError::InvalidSignature
        ));
    }
}
