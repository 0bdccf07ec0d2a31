//! Token pipeline error types.

use thiserror::Error;

use crate::config::Mode;
use signet_key::KeyError;

/// Token operation result type.
pub type JwtResult<T> = Result<T, JwtError>;

/// Token pipeline errors.
///
/// Configuration problems (`InvalidConfig`, `ModeMismatch`) are programmer
/// errors; the remaining kinds describe adversarial or expired input. Nothing
/// here is retryable.
#[derive(Debug, Error)]
pub enum JwtError {
    /// Client construction rejected the supplied configuration.
    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),

    /// An operation was called on a client bound to the other mode.
    #[error("client is not in {expected} mode")]
    ModeMismatch {
        /// The mode the operation requires.
        expected: Mode,
    },

    /// The token argument was empty.
    #[error("token input is empty")]
    InvalidInput,

    /// Wrong segment count, undecodable base64url, unparseable JSON, or a
    /// missing required claim.
    #[error("malformed token: {0}")]
    MalformedToken(String),

    /// Signature segment missing, undecodable, or failed verification.
    #[error("invalid token signature")]
    InvalidSignature,

    /// The token's expiry lies in the past.
    #[error("token has expired")]
    TokenExpired,

    /// The token's issued-at lies in the future.
    #[error("token is not yet valid")]
    TokenNotYetValid,

    /// Key material could not be converted into a usable handle.
    #[error("invalid key: {0}")]
    InvalidKey(#[from] KeyError),

    /// Header or payload serialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl JwtError {
    /// Create an invalid configuration error.
    #[inline]
    #[must_use]
    pub fn invalid_config(msg: &str) -> Self {
        JwtError::InvalidConfig(msg.to_string())
    }

    /// Create a malformed token error.
    #[inline]
    #[must_use]
    pub fn malformed(msg: &str) -> Self {
        JwtError::MalformedToken(msg.to_string())
    }

    /// Create a serialization error.
    #[inline]
    #[must_use]
    pub fn serialization(msg: &str) -> Self {
        JwtError::Serialization(msg.to_string())
    }
}
