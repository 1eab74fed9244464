//! 監査ログストアのtraitとインメモリ実装

use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};

use super::types::AuditEvent;
use crate::common::error::{StoreError, StoreResult};

/// Append-only log store keyed by `(pk, sk)`. Nothing here reads it back.
#[async_trait]
pub trait AuditLogStore: Send + Sync {
    /// Writes one item into `table`
    async fn put_item(&self, table: &str, item: &AuditEvent) -> StoreResult<()>;
}

#[derive(Debug, Default)]
struct Inner {
    items: Vec<(String, AuditEvent)>,
    fail: bool,
    put_calls: usize,
}

/// In-process audit store; clones share state
#[derive(Debug, Clone, Default)]
pub struct MemoryAuditLogStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryAuditLogStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose every `put_item` fails
    pub fn failing() -> Self {
        let store = Self::default();
        store.lock().fail = true;
        store
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Items written so far, with their table
    pub fn items(&self) -> Vec<(String, AuditEvent)> {
        self.lock().items.clone()
    }

    /// Number of `put_item` calls, failed ones included
    pub fn put_calls(&self) -> usize {
        self.lock().put_calls
    }
}

#[async_trait]
impl AuditLogStore for MemoryAuditLogStore {
    async fn put_item(&self, table: &str, item: &AuditEvent) -> StoreResult<()> {
        let mut inner = self.lock();
        inner.put_calls += 1;
        if inner.fail {
            return Err(StoreError::Database(format!(
                "table {table} is unavailable"
            )));
        }
        inner.items.push((table.to_string(), item.clone()));
        Ok(())
    }
}
