//! Key/value settings storage

use gamelayer_core::{Error, Result};
use sqlx::{Executor, Sqlite, SqlitePool};

/// Read a setting, `None` when the key was never written
pub async fn get_setting(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    let row: Option<(String,)> = sqlx::query_as("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await
        .map_err(|e| Error::DatabaseError(e.to_string()))?;

    Ok(row.map(|(value,)| value))
}

/// Insert or overwrite a setting; runs on a pool or inside a transaction
pub async fn set_setting<'e, E>(executor: E, key: &str, value: &str) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO settings (key, value, updated_at)
        VALUES (?, ?, CURRENT_TIMESTAMP)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(key)
    .bind(value)
    .execute(executor)
    .await
    .map_err(|e| Error::DatabaseError(e.to_string()))?;

    Ok(())
}

/// Remove a setting; returns whether it existed
pub async fn delete_setting<'e, E>(executor: E, key: &str) -> Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM settings WHERE key = ?")
        .bind(key)
        .execute(executor)
        .await
        .map_err(|e| Error::DatabaseError(e.to_string()))?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::Database;

    #[tokio::test]
    async fn test_settings_roundtrip() {
        let db = Database::connect_in_memory().await.unwrap();
        let pool = db.pool();

        assert_eq!(get_setting(pool, "accountName").await.unwrap(), None);

        set_setting(pool, "accountName", "acme").await.unwrap();
        set_setting(pool, "accountName", "globex").await.unwrap();
        assert_eq!(
            get_setting(pool, "accountName").await.unwrap().as_deref(),
            Some("globex")
        );

        assert!(delete_setting(pool, "accountName").await.unwrap());
        assert!(!delete_setting(pool, "accountName").await.unwrap());
        assert_eq!(get_setting(pool, "accountName").await.unwrap(), None);
    }
}
