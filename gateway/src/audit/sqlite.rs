//! SQLite監査ログストア
//!
//! 設定されたテーブル名ごとに`(pk, sk)`を主キーとするテーブルを作成し、
//! put-item相当（同一キーは上書き）で書き込む。

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::collections::HashSet;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tracing::info;

use super::store::AuditLogStore;
use super::types::AuditEvent;
use crate::common::error::{StoreError, StoreResult};

/// Audit store backed by SQLite
#[derive(Debug, Clone)]
pub struct SqliteAuditLogStore {
    pool: SqlitePool,
    ready_tables: Arc<Mutex<HashSet<String>>>,
}

impl SqliteAuditLogStore {
    /// Wraps an existing pool
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            ready_tables: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Opens (creating if missing) the database at `database_url`
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;

        // WALモード設定
        sqlx::query("PRAGMA journal_mode=WAL").execute(&pool).await?;

        info!("Audit log database opened: {}", database_url);
        Ok(Self::new(pool))
    }

    /// Underlying pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn is_ready(&self, table: &str) -> bool {
        self.ready_tables
            .lock()
            .map(|tables| tables.contains(table))
            .unwrap_or(false)
    }

    fn mark_ready(&self, table: &str) {
        if let Ok(mut tables) = self.ready_tables.lock() {
            tables.insert(table.to_string());
        }
    }

    async fn ensure_table(&self, table: &str) -> StoreResult<()> {
        if self.is_ready(table) {
            return Ok(());
        }
        sqlx::query(&format!(
            "CREATE TABLE IF NOT EXISTS \"{table}\" (
                pk TEXT NOT NULL,
                sk TEXT NOT NULL,
                action TEXT NOT NULL,
                user_id TEXT NOT NULL,
                user_email TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                target TEXT NOT NULL,
                details TEXT,
                PRIMARY KEY (pk, sk)
            )"
        ))
        .execute(&self.pool)
        .await?;
        self.mark_ready(table);
        Ok(())
    }
}

/// Table names are interpolated into SQL, so only `[A-Za-z0-9_-]` is allowed.
pub fn validate_table_name(table: &str) -> StoreResult<()> {
    let valid = !table.is_empty()
        && table.len() <= 128
        && table
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StoreError::Database(format!(
            "invalid audit table name: {table:?}"
        )))
    }
}

#[async_trait]
impl AuditLogStore for SqliteAuditLogStore {
    async fn put_item(&self, table: &str, item: &AuditEvent) -> StoreResult<()> {
        validate_table_name(table)?;
        self.ensure_table(table).await?;

        let details = item
            .details
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| StoreError::Database(format!("failed to encode details: {e}")))?;

        sqlx::query(&format!(
            "INSERT OR REPLACE INTO \"{table}\"
                (pk, sk, action, user_id, user_email, timestamp, target, details)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)"
        ))
        .bind(&item.pk)
        .bind(&item.sk)
        .bind(item.action.as_str())
        .bind(&item.user_id)
        .bind(&item.user_email)
        .bind(&item.timestamp)
        .bind(&item.target)
        .bind(details)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
