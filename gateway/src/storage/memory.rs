//! インメモリオブジェクトストア
//!
//! 呼び出し回数の記録とキー単位の失敗注入ができる。

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use super::ObjectStore;
use crate::common::error::{StoreError, StoreResult};

/// Stored object with its metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Raw bytes as written
    pub body: Vec<u8>,
    /// `Content-Type` given on write
    pub content_type: String,
    /// `Cache-Control` given on write
    pub cache_control: String,
}

#[derive(Debug, Default)]
struct Inner {
    objects: HashMap<(String, String), StoredObject>,
    failing_keys: HashSet<String>,
    fail_all: bool,
    put_calls: usize,
    delete_calls: usize,
}

/// In-process object store; clones share state
#[derive(Debug, Clone, Default)]
pub struct MemoryObjectStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryObjectStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // ロックが汚染されていても中身はそのまま使える
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Makes every call touching `key` fail
    pub fn fail_key(&self, key: impl Into<String>) {
        self.lock().failing_keys.insert(key.into());
    }

    /// Makes every call fail
    pub fn fail_all(&self) {
        self.lock().fail_all = true;
    }

    /// Object stored under `bucket`/`key`
    pub fn get(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.lock()
            .objects
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    /// Seeds an object without counting a call
    pub fn insert(&self, bucket: &str, key: &str, body: impl Into<Vec<u8>>) {
        self.lock().objects.insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                body: body.into(),
                content_type: "application/json".to_string(),
                cache_control: String::new(),
            },
        );
    }

    /// Number of stored objects
    pub fn len(&self) -> usize {
        self.lock().objects.len()
    }

    /// True when nothing is stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of `put_object` calls so far
    pub fn put_calls(&self) -> usize {
        self.lock().put_calls
    }

    /// Number of `delete_object` calls so far
    pub fn delete_calls(&self) -> usize {
        self.lock().delete_calls
    }

    fn check_failure(inner: &Inner, key: &str) -> StoreResult<()> {
        if inner.fail_all || inner.failing_keys.contains(key) {
            return Err(StoreError::Rejected {
                status: 500,
                message: format!("injected failure for {key}"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
        cache_control: &str,
    ) -> StoreResult<()> {
        let mut inner = self.lock();
        inner.put_calls += 1;
        Self::check_failure(&inner, key)?;
        inner.objects.insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                body,
                content_type: content_type.to_string(),
                cache_control: cache_control.to_string(),
            },
        );
        Ok(())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> StoreResult<()> {
        let mut inner = self.lock();
        inner.delete_calls += 1;
        Self::check_failure(&inner, key)?;
        inner.objects.remove(&(bucket.to_string(), key.to_string()));
        Ok(())
    }
}
