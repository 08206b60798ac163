//! GameLayer Persistence - settings database, credential store and caches

pub mod cache;
pub mod credentials;
pub mod encryption;
pub mod sqlite;

pub use cache::PlayerDirectoryCache;
pub use credentials::{CredentialStore, MemoryCredentialStore, SqliteCredentialStore};
pub use encryption::SecretSealer;
pub use sqlite::Database;
