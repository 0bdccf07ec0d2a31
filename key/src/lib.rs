//! Key material for the signet token pipeline.
//!
//! This crate owns the JWK interchange type and everything that touches raw
//! key bytes: converting a [`Jwk`] into ECDSA signing/verification handles,
//! generating fresh key pairs for provisioning, and exporting keys as PEM.
//! The token pipeline in `signet_jwt` only ever sees handles produced here.

mod error;
mod generate;
mod jwk;
mod pem;

pub use error::{KeyError, KeyResult};
pub use generate::{generate_aes_256, generate_ec_p256, generate_rsa_2048, JwkKeyPair};
pub use jwk::{to_signing_handle, to_verification_handle, Jwk};
pub use pem::{private_key_to_pem, public_key_to_pem};
