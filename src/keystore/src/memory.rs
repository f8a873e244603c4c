//! In-memory key storage

use std::collections::HashMap;

use parking_lot::{Mutex, RwLock};
use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::{KeyStoreError, Result};
use crate::random::{random_hex, KEY_ID_LENGTH, KEY_LENGTH};
use crate::KeyStore;

/// Process-local key store with no persistence and no expiry.
///
/// Generic over the random source so tests can inject a deterministic one.
pub struct MemoryKeyStore<R = OsRng> {
    keys: RwLock<HashMap<String, Vec<u8>>>,
    rng: Mutex<R>,
}

impl MemoryKeyStore<OsRng> {
    /// Create a new in-memory key store drawing from the OS random source.
    pub fn new() -> Self {
        Self::with_rng(OsRng)
    }
}

impl Default for MemoryKeyStore<OsRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore> MemoryKeyStore<R> {
    /// Create an in-memory key store with an injected random source.
    pub fn with_rng(rng: R) -> Self {
        Self {
            keys: RwLock::new(HashMap::new()),
            rng: Mutex::new(rng),
        }
    }

    /// Store a key under a caller-chosen ID.
    ///
    /// Fails with [`KeyStoreError::KeyCollision`] if the ID is already bound;
    /// existing keys are never overwritten.
    pub fn write_key(&self, id: impl Into<String>, key: impl Into<Vec<u8>>) -> Result<()> {
        let id = id.into();
        let mut keys = self.keys.write();
        if keys.contains_key(&id) {
            return Err(KeyStoreError::KeyCollision);
        }
        keys.insert(id, key.into());
        Ok(())
    }
}

impl<R: RngCore + Send> KeyStore for MemoryKeyStore<R> {
    fn new_key(&self) -> Result<(String, Vec<u8>)> {
        let (mut id, key) = {
            let mut rng = self.rng.lock();
            let id = random_hex(&mut *rng, KEY_ID_LENGTH)?;
            let key = random_hex(&mut *rng, KEY_LENGTH)?.into_bytes();
            (id, key)
        };

        let mut keys = self.keys.write();
        if keys.contains_key(&id) {
            id = random_hex(&mut *self.rng.lock(), KEY_ID_LENGTH)?;
            if keys.contains_key(&id) {
                return Err(KeyStoreError::KeyCollision);
            }
        }
        keys.insert(id.clone(), key.clone());
        Ok((id, key))
    }

    fn key_from_id(&self, id: &str) -> Result<Vec<u8>> {
        self.keys
            .read()
            .get(id)
            .cloned()
            .ok_or(KeyStoreError::KeyNotFound)
    }
}
