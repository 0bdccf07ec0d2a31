//! Error handling for key material operations.

use thiserror::Error;

/// Key operation result type.
pub type KeyResult<T> = Result<T, KeyError>;

/// Key-specific errors.
#[derive(Debug, Error)]
pub enum KeyError {
    /// Key material is structurally invalid or missing required members.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Key type or curve is not supported by this pipeline.
    #[error("unsupported key type: {0}")]
    UnsupportedKeyType(String),

    /// Key generation failed.
    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    /// PEM encoding failed.
    #[error("PEM encoding failed: {0}")]
    PemEncoding(String),
}

impl KeyError {
    /// Create an invalid key error.
    #[inline]
    #[must_use]
    pub fn invalid_key(msg: &str) -> Self {
        KeyError::InvalidKey(msg.to_string())
    }

    /// Create an unsupported key type error.
    #[inline]
    #[must_use]
    pub fn unsupported_key_type(msg: &str) -> Self {
        KeyError::UnsupportedKeyType(msg.to_string())
    }

    /// Create a key generation error.
    #[inline]
    #[must_use]
    pub fn key_generation(msg: &str) -> Self {
        KeyError::KeyGeneration(msg.to_string())
    }

    /// Create a PEM encoding error.
    #[inline]
    #[must_use]
    pub fn pem_encoding(msg: &str) -> Self {
        KeyError::PemEncoding(msg.to_string())
    }
}
