//! Directory-backed key storage
//!
//! Each regular file in the directory is one key: the filename is the key ID
//! and the whitespace-trimmed file contents are the key bytes. Hidden files
//! and subdirectories are ignored.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use parking_lot::{Mutex, RwLock};
use rand::rngs::OsRng;
use rand::RngCore;
use tracing::debug;

use crate::error::{KeyStoreError, Result};
use crate::random::{random_hex, KEY_ID_LENGTH, KEY_LENGTH};
use crate::KeyStore;

/// Key store backed by a snapshot of a directory.
///
/// Lookups read the in-memory snapshot; [`update`](Self::update) re-lists the
/// directory and swaps the snapshot in atomically, so readers never observe a
/// partially-built one.
pub struct DirectoryKeyStore<R = OsRng> {
    path: PathBuf,
    keys: RwLock<HashMap<String, Vec<u8>>>,
    rng: Mutex<R>,
}

impl DirectoryKeyStore<OsRng> {
    /// Create a key store from a directory, loading the initial snapshot.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        Self::with_rng(path, OsRng)
    }
}

impl<R: RngCore> DirectoryKeyStore<R> {
    /// Create a directory key store with an injected random source.
    pub fn with_rng(path: impl Into<PathBuf>, rng: R) -> Result<Self> {
        let ks = Self {
            path: path.into(),
            keys: RwLock::new(HashMap::new()),
            rng: Mutex::new(rng),
        };
        ks.update()?;
        Ok(ks)
    }

    /// Refresh the snapshot from disk.
    ///
    /// IDs already present in the snapshot are carried over without re-reading
    /// their files; keys are immutable once assigned an ID, so the cached
    /// value stays authoritative. The replacement snapshot is built entirely
    /// before the write lock is taken.
    pub fn update(&self) -> Result<()> {
        let current = self.keys.read().clone();

        let mut keys = HashMap::new();
        for entry in fs::read_dir(&self.path)? {
            let entry = entry?;

            let id = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(_) => continue,
            };
            if id.starts_with('.') || entry.file_type()?.is_dir() {
                continue;
            }

            if let Some(key) = current.get(&id) {
                keys.insert(id, key.clone());
                continue;
            }

            let contents = fs::read(entry.path())?;
            keys.insert(id, contents.trim_ascii().to_vec());
        }

        debug!(path = %self.path.display(), count = keys.len(), "loaded key directory snapshot");
        *self.keys.write() = keys;
        Ok(())
    }
}

impl<R: RngCore + Send> KeyStore for DirectoryKeyStore<R> {
    fn new_key(&self) -> Result<(String, Vec<u8>)> {
        let (mut id, key) = {
            let mut rng = self.rng.lock();
            let id = random_hex(&mut *rng, KEY_ID_LENGTH)?;
            let key = random_hex(&mut *rng, KEY_LENGTH)?.into_bytes();
            (id, key)
        };

        if self.keys.read().contains_key(&id) || self.path.join(&id).exists() {
            id = random_hex(&mut *self.rng.lock(), KEY_ID_LENGTH)?;
            if self.keys.read().contains_key(&id) || self.path.join(&id).exists() {
                return Err(KeyStoreError::KeyCollision);
            }
        }

        // Persist before exposing the ID so other processes can resolve it.
        fs::write(self.path.join(&id), &key)?;
        self.keys.write().insert(id.clone(), key.clone());
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

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_initial_snapshot() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("abc1"), "one").unwrap();
        fs::write(dir.path().join("abc2"), "two\n").unwrap();

        let ks = DirectoryKeyStore::new(dir.path()).unwrap();
        assert_eq!(ks.key_from_id("abc1").unwrap(), b"one");
        // Contents are whitespace-trimmed.
        assert_eq!(ks.key_from_id("abc2").unwrap(), b"two");
    }

    #[test]
    fn test_hidden_files_and_subdirectories_skipped() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".hidden"), "nope").unwrap();
        fs::create_dir(dir.path().join("subdir")).unwrap();
        fs::write(dir.path().join("real"), "key").unwrap();

        let ks = DirectoryKeyStore::new(dir.path()).unwrap();
        assert!(ks.key_from_id(".hidden").is_err());
        assert!(ks.key_from_id("subdir").is_err());
        assert_eq!(ks.key_from_id("real").unwrap(), b"key");
    }

    #[test]
    fn test_update_picks_up_added_file() {
        let dir = tempdir().unwrap();
        let ks = DirectoryKeyStore::new(dir.path()).unwrap();
        assert!(matches!(
            ks.key_from_id("late"),
            Err(KeyStoreError::KeyNotFound)
        ));

        fs::write(dir.path().join("late"), "arrival").unwrap();
        ks.update().unwrap();
        assert_eq!(ks.key_from_id("late").unwrap(), b"arrival");
    }

    #[test]
    fn test_update_drops_removed_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("gone"), "soon").unwrap();

        let ks = DirectoryKeyStore::new(dir.path()).unwrap();
        assert!(ks.key_from_id("gone").is_ok());

        fs::remove_file(dir.path().join("gone")).unwrap();
        ks.update().unwrap();
        assert!(matches!(
            ks.key_from_id("gone"),
            Err(KeyStoreError::KeyNotFound)
        ));
    }

    #[test]
    fn test_update_does_not_reread_existing_ids() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("stable"), "original").unwrap();

        let ks = DirectoryKeyStore::new(dir.path()).unwrap();

        // Rewriting the file violates the stability contract; the snapshot
        // keeps the value it already loaded.
        fs::write(dir.path().join("stable"), "changed").unwrap();
        ks.update().unwrap();
        assert_eq!(ks.key_from_id("stable").unwrap(), b"original");
    }

    #[test]
    fn test_new_key_persists_to_disk() {
        let dir = tempdir().unwrap();
        let ks = DirectoryKeyStore::new(dir.path()).unwrap();

        let (id, key) = ks.new_key().unwrap();
        assert_eq!(ks.key_from_id(&id).unwrap(), key);

        // A fresh store over the same directory resolves the same ID.
        let other = DirectoryKeyStore::new(dir.path()).unwrap();
        assert_eq!(other.key_from_id(&id).unwrap(), key);
    }
}
