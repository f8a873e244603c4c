//! Remote secret-store key storage
//!
//! [`VaultKeyStore`] adapts a flat `ID -> value` secret map held in a remote
//! store to the [`KeyStore`] capability. The transport lives behind the
//! [`SecretStore`] trait; [`VaultClient`] is the production implementation,
//! a thin blocking client for the Vault KV API. Each read or write call is
//! the remote system's unit of consistency; no transaction spans them.

use std::collections::HashMap;
use std::time::Duration;

use parking_lot::Mutex;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{KeyStoreError, Result};
use crate::random::{random_hex, KEY_ID_LENGTH, KEY_LENGTH};
use crate::KeyStore;

/// Access to a remote map of secrets at a path.
///
/// The interface boundary for the secret-store transport: implementations
/// own connection handling, auth, and any retry policy of their own.
pub trait SecretStore: Send + Sync {
    /// Read the full secret map at `path`. A path with no secrets yet reads
    /// as an empty map.
    fn read(&self, path: &str) -> Result<HashMap<String, Value>>;

    /// Replace the secret map at `path`.
    fn write(&self, path: &str, data: &HashMap<String, Value>) -> Result<()>;
}

/// Blocking client for the Vault KV (v1) HTTP API.
pub struct VaultClient {
    address: String,
    token: String,
    http: reqwest::blocking::Client,
}

/// Vault KV response envelope.
#[derive(Debug, Deserialize)]
struct SecretEnvelope {
    #[serde(default)]
    data: HashMap<String, Value>,
}

impl VaultClient {
    /// Create a client for the Vault instance at `address`, authenticating
    /// with `token`.
    pub fn new(address: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            address: address.into(),
            token: token.into(),
            http,
        })
    }

    /// Create a client from `VAULT_ADDR` and `VAULT_TOKEN`.
    ///
    /// Returns `Ok(None)` when either variable is unset.
    pub fn from_env() -> Result<Option<Self>> {
        match (std::env::var("VAULT_ADDR"), std::env::var("VAULT_TOKEN")) {
            (Ok(address), Ok(token)) => Ok(Some(Self::new(address, token)?)),
            _ => {
                debug!("vault not configured (VAULT_ADDR or VAULT_TOKEN unset)");
                Ok(None)
            }
        }
    }

    fn secret_url(&self, path: &str) -> String {
        format!(
            "{}/v1/{}",
            self.address.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl SecretStore for VaultClient {
    fn read(&self, path: &str) -> Result<HashMap<String, Value>> {
        let response = self
            .http
            .get(self.secret_url(path))
            .header("X-Vault-Token", &self.token)
            .send()?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(HashMap::new());
        }

        let envelope: SecretEnvelope = response.error_for_status()?.json()?;
        Ok(envelope.data)
    }

    fn write(&self, path: &str, data: &HashMap<String, Value>) -> Result<()> {
        self.http
            .post(self.secret_url(path))
            .header("X-Vault-Token", &self.token)
            .json(data)
            .send()?
            .error_for_status()?;
        Ok(())
    }
}

/// Key store persisting keys in a remote secret map.
pub struct VaultKeyStore<S = VaultClient, R = OsRng> {
    store: S,
    secret_path: String,
    rng: Mutex<R>,
}

impl VaultKeyStore<VaultClient, OsRng> {
    /// Create a key store backed by the Vault instance at `address`.
    ///
    /// A token is required to authenticate. Keys live in the secret map at
    /// `secret_path`, e.g. `secret/signing-keys`.
    pub fn new(
        address: impl Into<String>,
        token: impl Into<String>,
        secret_path: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self::with_store(
            VaultClient::new(address, token)?,
            secret_path,
            OsRng,
        ))
    }
}

impl<S: SecretStore, R: RngCore> VaultKeyStore<S, R> {
    /// Create a key store over any secret-store transport and random source.
    pub fn with_store(store: S, secret_path: impl Into<String>, rng: R) -> Self {
        Self {
            store,
            secret_path: secret_path.into(),
            rng: Mutex::new(rng),
        }
    }
}

impl<S: SecretStore, R: RngCore + Send> KeyStore for VaultKeyStore<S, R> {
    fn new_key(&self) -> Result<(String, Vec<u8>)> {
        let (mut id, key) = {
            let mut rng = self.rng.lock();
            let id = random_hex(&mut *rng, KEY_ID_LENGTH)?;
            let key = random_hex(&mut *rng, KEY_LENGTH)?;
            (id, key)
        };

        let mut data = self.store.read(&self.secret_path)?;
        if data.contains_key(&id) {
            debug!(id = %id, "key ID collision, generating a fresh ID");
            id = random_hex(&mut *self.rng.lock(), KEY_ID_LENGTH)?;
            if data.contains_key(&id) {
                return Err(KeyStoreError::KeyCollision);
            }
        }

        data.insert(id.clone(), Value::String(key.clone()));
        self.store.write(&self.secret_path, &data)?;

        Ok((id, key.into_bytes()))
    }

    fn key_from_id(&self, id: &str) -> Result<Vec<u8>> {
        let data = self.store.read(&self.secret_path)?;
        match data.get(id) {
            None => Err(KeyStoreError::KeyNotFound),
            Some(Value::String(key)) => Ok(key.clone().into_bytes()),
            Some(_) => Err(KeyStoreError::InvalidKeyData(id.to_string())),
        }
    }
}
