use anyhow::Result;

use super::schema::Database;
use super::types::StoredPreference;

impl Database {
    // ========================================================================
    // User Preferences Operations
    // ========================================================================

    /// Get a single preference value by key.
    ///
    /// Keys use dotted convention: `nexus.theme`, `nexus.favorites`, etc.
    ///
    /// # Returns
    ///
    /// The preference value if the key exists, or `None` if not set.
    pub async fn get_preference(&self, key: &str) -> Result<Option<String>> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT value FROM user_preferences WHERE key = ?")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|(value,)| value))
    }

    /// Set a preference value (UPSERT).
    ///
    /// Inserts the key-value pair if it doesn't exist, or updates the value and
    /// timestamp if the key already exists.
    pub async fn set_preference(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO user_preferences (key, value, updated_at)
            VALUES (?, ?, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
        "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get all preferences matching a key prefix, ordered by key.
    ///
    /// `_` and `%` in the prefix are escaped so `nexus.` only matches keys that
    /// literally start with `nexus.`.
    pub async fn get_preferences_by_prefix(&self, prefix: &str) -> Result<Vec<StoredPreference>> {
        let pattern = format!("{}%", escape_like(prefix));
        let rows = sqlx::query_as::<_, StoredPreference>(
            "SELECT key, value, updated_at FROM user_preferences WHERE key LIKE ? ESCAPE '\\' ORDER BY key",
        )
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Delete all preferences matching a key prefix.
    ///
    /// Returns the number of rows removed.
    pub async fn delete_preferences_by_prefix(&self, prefix: &str) -> Result<u64> {
        let pattern = format!("{}%", escape_like(prefix));
        let result = sqlx::query("DELETE FROM user_preferences WHERE key LIKE ? ESCAPE '\\'")
            .bind(&pattern)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

fn escape_like(prefix: &str) -> String {
    let mut out = String::with_capacity(prefix.len());
    for c in prefix.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
