//! Error types for token issuance and verification

use signet_keystore::KeyStoreError;
use thiserror::Error;

/// Authentication errors
#[derive(Debug, Error)]
pub enum AuthError {
    /// Permission is not one of read, write, or admin
    #[error("invalid permission")]
    InvalidPermission,

    /// Scope has no resource class
    #[error("scope requires a resource class")]
    MissingClass,

    /// Resource class contains a forbidden character
    #[error("class {0:?} contains invalid characters")]
    InvalidClass(String),

    /// Resource identifier contains a forbidden character
    #[error("resource {0:?} contains invalid characters")]
    InvalidResource(String),

    /// Scope string does not match the `permission:class[:resource]` grammar
    #[error("invalid scope")]
    InvalidScope,

    /// Authorization header holds no bearer token
    #[error("missing bearer token")]
    MissingToken,

    /// Token header carries no usable key ID
    #[error("token signed with unknown key")]
    UnknownSigningKey,

    /// The key store could not mint a signing key
    #[error("failed to create signing key")]
    KeyUnavailable(#[source] KeyStoreError),

    /// The key store could not resolve a signing key
    #[error(transparent)]
    KeyStore(#[from] KeyStoreError),

    /// Token expiry is in the past
    #[error("token is expired")]
    TokenExpired,

    /// Token not-before is in the future
    #[error("token is not valid yet")]
    TokenNotYetValid,

    /// Token signature does not match the resolved key
    #[error("token signature is invalid")]
    InvalidSignature,

    /// Token was signed with an algorithm other than the supported one
    #[error("token signed with unexpected algorithm")]
    InvalidAlgorithm,

    /// Token is malformed or otherwise failed to decode
    #[error("invalid token")]
    Token(#[source] jsonwebtoken::errors::Error),
}

/// Result type for authentication operations
pub type Result<T> = std::result::Result<T, AuthError>;
