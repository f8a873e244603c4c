//! # Signet Keystore
//!
//! Pluggable storage for token-signing keys, addressed by stable key IDs.
//!
//! ## Backends
//!
//! - [`MemoryKeyStore`] - process-local map, useful for tests and single-node
//!   deployments
//! - [`DirectoryKeyStore`] - refreshable snapshot of a directory of key files
//! - [`VaultKeyStore`] - adapter over a remote secret store
//! - [`CachedKeyStore`] - TTL read cache layered over any other backend
//!
//! Every backend implements the [`KeyStore`] capability. Implementations are
//! expected to produce stable keys: a given key ID must always resolve to the
//! same key value or an error, even across processes. Rotation means minting
//! a new ID, never reassigning an existing one; previously issued tokens stay
//! verifiable for as long as their key ID remains resolvable.

pub mod cache;
pub mod directory;
pub mod error;
pub mod memory;
pub mod random;
pub mod vault;

pub use cache::CachedKeyStore;
pub use directory::DirectoryKeyStore;
pub use error::{KeyStoreError, Result};
pub use memory::MemoryKeyStore;
pub use random::{random_hex, KEY_ID_LENGTH, KEY_LENGTH};
pub use vault::{SecretStore, VaultClient, VaultKeyStore};

use std::sync::Arc;

/// Capability to mint and retrieve signing keys by ID.
///
/// Implementations must uphold the stability contract: once an ID has been
/// assigned, every successful `key_from_id` call for that ID returns the same
/// key value, in this process or any other.
pub trait KeyStore: Send + Sync {
    /// Mint a new signing key, returning its ID and key material.
    fn new_key(&self) -> Result<(String, Vec<u8>)>;

    /// Look up the key bound to `id`.
    ///
    /// Fails with [`KeyStoreError::KeyNotFound`] if no such key exists.
    fn key_from_id(&self, id: &str) -> Result<Vec<u8>>;
}

impl<K: KeyStore + ?Sized> KeyStore for &K {
    fn new_key(&self) -> Result<(String, Vec<u8>)> {
        (**self).new_key()
    }

    fn key_from_id(&self, id: &str) -> Result<Vec<u8>> {
        (**self).key_from_id(id)
    }
}

impl<K: KeyStore + ?Sized> KeyStore for Arc<K> {
    fn new_key(&self) -> Result<(String, Vec<u8>)> {
        (**self).new_key()
    }

    fn key_from_id(&self, id: &str) -> Result<Vec<u8>> {
        (**self).key_from_id(id)
    }
}

impl<K: KeyStore + ?Sized> KeyStore for Box<K> {
    fn new_key(&self) -> Result<(String, Vec<u8>)> {
        (**self).new_key()
    }

    fn key_from_id(&self, id: &str) -> Result<Vec<u8>> {
        (**self).key_from_id(id)
    }
}
