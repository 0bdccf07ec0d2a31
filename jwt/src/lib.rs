//! Compact signed authentication tokens over ES256.
//!
//! A [`TokenClient`] is bound at construction to exactly one of two modes:
//! sign mode mints `header.payload.signature` compact tokens from a private
//! EC P-256 key, verify mode checks a received token's signature and validity
//! window against the matching public key. Key material travels as JWKs via
//! the `signet_key` crate.
//!
//! ```
//! use signet_jwt::{ClaimValue, ClientConfig, PublicClaims, TokenClient};
//! use signet_key::generate_ec_p256;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pair = generate_ec_p256()?;
//!
//! let signer = TokenClient::new(
//!     ClientConfig::sign()
//!         .private_key(pair.private_key)
//!         .issuer("svc-a")
//!         .expires_in(3600),
//! )?;
//! let verifier = TokenClient::new(ClientConfig::verify().public_key(pair.public_key))?;
//!
//! let mut claims = PublicClaims::new();
//! claims.insert("role".to_string(), ClaimValue::from("admin"));
//!
//! let signed = signer.sign(&claims)?;
//! let verified = verifier.verify(&signed.token)?;
//! assert_eq!(verified.payload.iss.as_deref(), Some("svc-a"));
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
mod sign;
mod types;
mod verify;

pub use client::TokenClient;
pub use config::{
    ClientConfig, ClientMode, ClientOptions, Credentials, IdentityProvider, Mode, SystemIdentity,
    DEFAULT_EXPIRES_IN,
};
pub use error::{JwtError, JwtResult};
pub use types::{
    ClaimValue, PublicClaims, SignedToken, TokenHeader, TokenPayload, VerifiedToken,
};

// Key material type, re-exported so callers can configure a client without
// naming the key crate.
pub use signet_key::Jwk;
