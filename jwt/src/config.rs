//! Client configuration and mode resolution.
//!
//! A loosely-typed [`ClientConfig`] is narrowed into exactly one [`ClientMode`]
//! variant at client construction. Every later operation pattern-matches the
//! resolved mode instead of re-checking optional fields.

use std::fmt;

use signet_key::Jwk;

use crate::error::{JwtError, JwtResult};

/// Default token lifetime in seconds when none is configured.
pub const DEFAULT_EXPIRES_IN: u32 = 3600;

const SERVICE_NAME_SUFFIX: &str = "-service";

/// Which half of the pipeline a client is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// The client mints tokens.
    Sign,
    /// The client checks tokens.
    Verify,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Sign => write!(f, "sign"),
            Mode::Verify => write!(f, "verify"),
        }
    }
}

/// Key material supplied at construction.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    /// Private key for sign mode.
    pub private_key: Option<Jwk>,
    /// Public key for verify mode.
    pub public_key: Option<Jwk>,
}

/// Optional sign-mode settings.
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    /// Token lifetime in seconds.
    pub expires_in: Option<u32>,
    /// Issuer claim value.
    pub issuer: Option<String>,
    /// Service claim value.
    pub service_name: Option<String>,
}

/// Loosely-typed client configuration, resolved once at construction.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Requested mode.
    pub mode: Option<Mode>,
    /// Key material.
    pub credentials: Credentials,
    /// Sign-mode options.
    pub options: ClientOptions,
}

impl ClientConfig {
    /// Start a sign-mode configuration.
    #[must_use]
    pub fn sign() -> Self {
        Self {
            mode: Some(Mode::Sign),
            ..Self::default()
        }
    }

    /// Start a verify-mode configuration.
    #[must_use]
    pub fn verify() -> Self {
        Self {
            mode: Some(Mode::Verify),
            ..Self::default()
        }
    }

    /// Set the private key.
    #[must_use]
    pub fn private_key(mut self, key: Jwk) -> Self {
        self.credentials.private_key = Some(key);
        self
    }

    /// Set the public key.
    #[must_use]
    pub fn public_key(mut self, key: Jwk) -> Self {
        self.credentials.public_key = Some(key);
        self
    }

    /// Set the token lifetime in seconds.
    #[must_use]
    pub fn expires_in(mut self, seconds: u32) -> Self {
        self.options.expires_in = Some(seconds);
        self
    }

    /// Set the issuer claim.
    #[must_use]
    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.options.issuer = Some(issuer.into());
        self
    }

    /// Set the service claim.
    #[must_use]
    pub fn service_name(mut self, service_name: impl Into<String>) -> Self {
        self.options.service_name = Some(service_name.into());
        self
    }
}

/// Source of the process identity used for configuration defaults.
///
/// Injected so resolution is deterministic under test instead of depending on
/// the execution environment.
pub trait IdentityProvider {
    /// Host identity, used as the default issuer.
    fn host(&self) -> String;
    /// User identity, used to derive the default service name.
    fn user(&self) -> String;
}

/// Identity read from the running process.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemIdentity;

impl IdentityProvider for SystemIdentity {
    fn host(&self) -> String {
        hostname::get()
            .ok()
            .and_then(|h| h.into_string().ok())
            .unwrap_or_else(|| "localhost".to_string())
    }

    fn user(&self) -> String {
        std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .unwrap_or_else(|_| "unknown".to_string())
    }
}

/// A resolved client mode. Exactly one variant, fixed for the client's
/// lifetime.
#[derive(Debug, Clone)]
pub enum ClientMode {
    /// Token minting with a private key and expiry policy.
    Sign {
        /// Private EC P-256 key material.
        private_key: Jwk,
        /// Token lifetime in seconds, always non-zero.
        expires_in: u32,
        /// Issuer claim applied to every token.
        issuer: String,
        /// Service claim applied to every token.
        service_name: String,
    },
    /// Token checking with a public key.
    Verify {
        /// Public EC P-256 key material.
        public_key: Jwk,
    },
}

impl ClientMode {
    /// Narrow a loose configuration into one mode, failing closed on
    /// incomplete input.
    ///
    /// # Errors
    /// Returns `JwtError::InvalidConfig` if the mode is missing, the mode's
    /// required key material is absent, or the expiry lifetime is zero.
    pub fn resolve(config: ClientConfig, identity: &dyn IdentityProvider) -> JwtResult<Self> {
        let ClientConfig {
            mode,
            credentials,
            options,
        } = config;

        let mode = mode.ok_or_else(|| {
            JwtError::invalid_config("mode must be set to \"sign\" or \"verify\"")
        })?;

        match mode {
            Mode::Sign => {
                let private_key = credentials
                    .private_key
                    .ok_or_else(|| JwtError::invalid_config("sign mode requires a private key"))?;
                let expires_in = options.expires_in.unwrap_or(DEFAULT_EXPIRES_IN);
                if expires_in == 0 {
                    return Err(JwtError::invalid_config(
                        "expires_in must be greater than zero",
                    ));
                }
                let issuer = options.issuer.unwrap_or_else(|| identity.host());
                let service_name = options
                    .service_name
                    .unwrap_or_else(|| format!("{}{SERVICE_NAME_SUFFIX}", identity.user()));
                Ok(ClientMode::Sign {
                    private_key,
                    expires_in,
                    issuer,
                    service_name,
                })
            }
            Mode::Verify => {
                let public_key = credentials
                    .public_key
                    .ok_or_else(|| JwtError::invalid_config("verify mode requires a public key"))?;
                Ok(ClientMode::Verify { public_key })
            }
        }
    }

    /// The mode tag of this resolved configuration.
    #[must_use]
    pub fn mode(&self) -> Mode {
        match self {
            ClientMode::Sign { .. } => Mode::Sign,
            ClientMode::Verify { .. } => Mode::Verify,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signet_key::generate_ec_p256;

    struct FixedIdentity;

    impl IdentityProvider for FixedIdentity {
        fn host(&self) -> String {
            "test-host".to_string()
        }

        fn user(&self) -> String {
            "test-user".to_string()
        }
    }

    #[test]
    fn resolve_rejects_missing_mode() {
        let err = ClientMode::resolve(ClientConfig::default(), &FixedIdentity).unwrap_err();
        assert!(matches!(err, JwtError::InvalidConfig(_)));
    }

    #[test]
    fn resolve_rejects_sign_without_private_key() {
        let err = ClientMode::resolve(ClientConfig::sign(), &FixedIdentity).unwrap_err();
        assert!(matches!(err, JwtError::InvalidConfig(_)));
    }

    #[test]
    fn resolve_rejects_verify_without_public_key() {
        let err = ClientMode::resolve(ClientConfig::verify(), &FixedIdentity).unwrap_err();
        assert!(matches!(err, JwtError::InvalidConfig(_)));
    }

    #[test]
    fn resolve_rejects_zero_expiry() {
        let pair = generate_ec_p256().unwrap();
        let config = ClientConfig::sign()
            .private_key(pair.private_key)
            .expires_in(0);
        let err = ClientMode::resolve(config, &FixedIdentity).unwrap_err();
        assert!(matches!(err, JwtError::InvalidConfig(_)));
    }

    #[test]
    fn resolve_applies_sign_defaults_from_identity() {
        let pair = generate_ec_p256().unwrap();
        let config = ClientConfig::sign().private_key(pair.private_key);
        let mode = ClientMode::resolve(config, &FixedIdentity).unwrap();

        let ClientMode::Sign {
            expires_in,
            issuer,
            service_name,
            ..
        } = mode
        else {
            panic!("expected sign mode");
        };
        assert_eq!(expires_in, DEFAULT_EXPIRES_IN);
        assert_eq!(issuer, "test-host");
        assert_eq!(service_name, "test-user-service");
    }

    #[test]
    fn resolve_prefers_supplied_options() {
        let pair = generate_ec_p256().unwrap();
        let config = ClientConfig::sign()
            .private_key(pair.private_key)
            .expires_in(60)
            .issuer("svc-a")
            .service_name("payments");
        let mode = ClientMode::resolve(config, &FixedIdentity).unwrap();

        let ClientMode::Sign {
            expires_in,
            issuer,
            service_name,
            ..
        } = mode
        else {
            panic!("expected sign mode");
        };
        assert_eq!(expires_in, 60);
        assert_eq!(issuer, "svc-a");
        assert_eq!(service_name, "payments");
    }

    #[test]
    fn verify_mode_ignores_sign_options() {
        let pair = generate_ec_p256().unwrap();
        let config = ClientConfig::verify()
            .public_key(pair.public_key)
            .expires_in(0);
        let mode = ClientMode::resolve(config, &FixedIdentity).unwrap();
        assert_eq!(mode.mode(), Mode::Verify);
    }
}
