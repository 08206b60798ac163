//! Credential persistence
//!
//! The account name is stored as-is; the API key is sealed before it
//! touches disk. Both live in the settings table under fixed keys.

use crate::encryption::SecretSealer;
use crate::sqlite::{delete_setting, get_setting, set_setting, Database};
use gamelayer_core::{Credentials, Error, Result};
use std::future::Future;
use std::sync::Mutex;
use tracing::{debug, warn};

pub const ACCOUNT_NAME_KEY: &str = "accountName";
pub const API_KEY_KEY: &str = "apiKey";

/// Where the session's credentials come from and go to
pub trait CredentialStore: Send + Sync {
    /// Stored credentials, `None` when nothing was ever saved.
    /// A half-filled pair comes back with the missing field empty.
    fn load(&self) -> impl Future<Output = Result<Option<Credentials>>> + Send;

    /// Overwrite both fields
    fn save(&self, credentials: &Credentials) -> impl Future<Output = Result<()>> + Send;

    fn clear(&self) -> impl Future<Output = Result<()>> + Send;
}

/// Credentials kept in the SQLite settings table
pub struct SqliteCredentialStore {
    db: Database,
    sealer: SecretSealer,
}

impl SqliteCredentialStore {
    pub fn new(db: Database, sealer: SecretSealer) -> Self {
        Self { db, sealer }
    }

    /// Store whose API key is sealed with the machine-bound key
    pub fn machine_bound(db: Database) -> Result<Self> {
        Ok(Self::new(db, SecretSealer::machine_bound()?))
    }

    fn open_api_key(&self, stored: &str) -> String {
        match self.sealer.open(stored) {
            Ok(key) => key,
            Err(e) => {
                // Sealed elsewhere or corrupted: the user has to enter it again
                warn!("Stored API key could not be opened: {}", e);
                String::new()
            }
        }
    }
}

impl CredentialStore for SqliteCredentialStore {
    async fn load(&self) -> Result<Option<Credentials>> {
        let pool = self.db.pool();
        let account = get_setting(pool, ACCOUNT_NAME_KEY).await?;
        let sealed_key = get_setting(pool, API_KEY_KEY).await?;

        if account.is_none() && sealed_key.is_none() {
            debug!("No stored credentials");
            return Ok(None);
        }

        let api_key = sealed_key
            .as_deref()
            .map(|v| self.open_api_key(v))
            .unwrap_or_default();
        Ok(Some(Credentials::new(account.unwrap_or_default(), api_key)))
    }

    /// Both rows are written in one transaction; a failure keeps the old pair
    async fn save(&self, credentials: &Credentials) -> Result<()> {
        let sealed = self.sealer.seal(&credentials.api_key)?;

        let mut tx = self.db.pool().begin().await.map_err(db_error)?;
        set_setting(&mut *tx, ACCOUNT_NAME_KEY, &credentials.account_name).await?;
        set_setting(&mut *tx, API_KEY_KEY, &sealed).await?;
        tx.commit().await.map_err(db_error)?;

        debug!("Saved credentials for account {}", credentials.account_name);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let mut tx = self.db.pool().begin().await.map_err(db_error)?;
        delete_setting(&mut *tx, ACCOUNT_NAME_KEY).await?;
        delete_setting(&mut *tx, API_KEY_KEY).await?;
        tx.commit().await.map_err(db_error)?;
        Ok(())
    }
}

fn db_error(e: sqlx::Error) -> Error {
    Error::DatabaseError(e.to_string())
}

/// Process-local store for tests and throwaway sessions
#[derive(Default)]
pub struct MemoryCredentialStore {
    inner: Mutex<Option<Credentials>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credentials(credentials: Credentials) -> Self {
        Self {
            inner: Mutex::new(Some(credentials)),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    async fn load(&self) -> Result<Option<Credentials>> {
        Ok(self.inner.lock().ok().and_then(|c| c.clone()))
    }

    async fn save(&self, credentials: &Credentials) -> Result<()> {
        if let Ok(mut slot) = self.inner.lock() {
            *slot = Some(credentials.clone());
        }
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        if let Ok(mut slot) = self.inner.lock() {
            *slot = None;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sealer() -> SecretSealer {
        SecretSealer::new(&[42u8; 32]).unwrap()
    }

    #[tokio::test]
    async fn test_credentials_survive_reload() {
        let db = Database::connect_in_memory().await.unwrap();
        let store = SqliteCredentialStore::new(db.clone(), sealer());
        assert!(store.load().await.unwrap().is_none());

        store
            .save(&Credentials::new("acme", "secret-key"))
            .await
            .unwrap();

        // the raw row never holds the plain key
        let raw = get_setting(db.pool(), API_KEY_KEY).await.unwrap().unwrap();
        assert!(!raw.contains("secret-key"));

        let reloaded = SqliteCredentialStore::new(db, sealer());
        let creds = reloaded.load().await.unwrap().unwrap();
        assert_eq!(creds.account_name, "acme");
        assert_eq!(creds.api_key, "secret-key");
    }

    #[tokio::test]
    async fn test_failed_save_keeps_previous_pair() {
        let db = Database::connect_in_memory().await.unwrap();
        let store = SqliteCredentialStore::new(db.clone(), sealer());
        store.save(&Credentials::new("acme", "old-key")).await.unwrap();

        // make the second row of the next save fail
        for event in ["INSERT", "UPDATE"] {
            sqlx::query(&format!(
                "CREATE TRIGGER refuse_key_{event} BEFORE {event} ON settings \
                 WHEN NEW.key = 'apiKey' BEGIN SELECT RAISE(ABORT, 'disk full'); END"
            ))
            .execute(db.pool())
            .await
            .unwrap();
        }

        let result = store.save(&Credentials::new("globex", "new-key")).await;
        assert!(matches!(result, Err(Error::DatabaseError(_))));

        let creds = store.load().await.unwrap().unwrap();
        assert_eq!(creds.account_name, "acme");
        assert_eq!(creds.api_key, "old-key");
    }

    #[tokio::test]
    async fn test_unreadable_key_comes_back_empty() {
        let db = Database::connect_in_memory().await.unwrap();
        SqliteCredentialStore::new(db.clone(), sealer())
            .save(&Credentials::new("acme", "secret-key"))
            .await
            .unwrap();

        let other = SqliteCredentialStore::new(db, SecretSealer::new(&[1u8; 32]).unwrap());
        let creds = other.load().await.unwrap().unwrap();
        assert_eq!(creds.account_name, "acme");
        assert!(creds.api_key.is_empty());
        assert!(!creds.is_complete());
    }

    #[tokio::test]
    async fn test_clear_removes_both_keys() {
        let db = Database::connect_in_memory().await.unwrap();
        let store = SqliteCredentialStore::new(db, sealer());
        store.save(&Credentials::new("acme", "k")).await.unwrap();
        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryCredentialStore::new();
        store.save(&Credentials::new("acme", "k")).await.unwrap();
        assert_eq!(store.load().await.unwrap().unwrap().account_name, "acme");
        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }
}
