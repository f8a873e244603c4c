//! Error types for key storage backends

use thiserror::Error;

/// Key storage errors
#[derive(Debug, Error)]
pub enum KeyStoreError {
    /// No key exists for the requested ID
    #[error("key not found")]
    KeyNotFound,

    /// A key already exists for the chosen ID
    #[error("key collision")]
    KeyCollision,

    /// The backend holds a value for this ID that is not key material
    #[error("stored value for key {0:?} is not byte data")]
    InvalidKeyData(String),

    /// The random source failed to produce bytes
    #[error("random source failure")]
    Rng(#[from] rand::Error),

    /// Filesystem error while reading or writing key files
    #[error("key file I/O failed")]
    Io(#[from] std::io::Error),

    /// Remote secret store request failed
    #[error("secret store request failed")]
    Transport(#[from] reqwest::Error),
}

/// Result type for key storage operations
pub type Result<T> = std::result::Result<T, KeyStoreError>;
