//! The token client: one resolved mode, two operations.

use crate::config::{ClientConfig, ClientMode, IdentityProvider, Mode, SystemIdentity};
use crate::error::{JwtError, JwtResult};
use crate::types::{PublicClaims, SignedToken, VerifiedToken};
use crate::{sign, verify};

/// A client permanently bound to either the sign or the verify half of the
/// pipeline.
///
/// The mode is resolved once at construction and never changes. The client
/// holds no other state, so a single instance can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct TokenClient {
    mode: ClientMode,
}

impl TokenClient {
    /// Build a client, deriving configuration defaults from the process
    /// identity.
    ///
    /// # Errors
    /// Returns `JwtError::InvalidConfig` if the configuration does not
    /// resolve to exactly one complete mode.
    pub fn new(config: ClientConfig) -> JwtResult<Self> {
        Self::with_identity(config, &SystemIdentity)
    }

    /// Build a client with an explicit identity source for defaults.
    ///
    /// # Errors
    /// Returns `JwtError::InvalidConfig` if the configuration does not
    /// resolve to exactly one complete mode.
    pub fn with_identity(config: ClientConfig, identity: &dyn IdentityProvider) -> JwtResult<Self> {
        Ok(Self {
            mode: ClientMode::resolve(config, identity)?,
        })
    }

    /// The mode this client is bound to.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode.mode()
    }

    /// Mint a compact token carrying `claims` plus the registered claim set.
    ///
    /// # Errors
    /// Returns `JwtError::ModeMismatch` on a verify-bound client, or an error
    /// from key handling or serialization.
    pub fn sign(&self, claims: &PublicClaims) -> JwtResult<SignedToken> {
        let ClientMode::Sign {
            private_key,
            expires_in,
            issuer,
            service_name,
        } = &self.mode
        else {
            return Err(JwtError::ModeMismatch {
                expected: Mode::Sign,
            });
        };
        sign::create_token(claims, private_key, *expires_in, issuer, service_name)
    }

    /// Check a compact token's signature and validity window.
    ///
    /// # Errors
    /// Returns `JwtError::InvalidInput` for an empty token,
    /// `JwtError::ModeMismatch` on a sign-bound client, or the failing
    /// stage's error kind.
    pub fn verify(&self, token: &str) -> JwtResult<VerifiedToken> {
        if token.is_empty() {
            return Err(JwtError::InvalidInput);
        }
        let ClientMode::Verify { public_key } = &self.mode else {
            return Err(JwtError::ModeMismatch {
                expected: Mode::Verify,
            });
        };
        verify::verify_token(token, public_key)
    }
}
