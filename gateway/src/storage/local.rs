//! ローカルファイルシステム上のオブジェクトストア
//!
//! `<root>/<bucket>/<key>` にファイルとして保存する。

use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

use super::ObjectStore;
use crate::common::error::{StoreError, StoreResult};

/// Directory-backed object store
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    /// Stores objects below `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps `bucket`/`key` onto a path below the root.
    ///
    /// Rejects anything that could escape the bucket directory.
    pub fn object_path(&self, bucket: &str, key: &str) -> StoreResult<PathBuf> {
        if bucket.is_empty() || bucket.contains(['/', '\\']) || bucket == "." || bucket == ".." {
            return Err(StoreError::InvalidKey(format!("bucket {bucket:?}")));
        }
        if key.is_empty() || key.ends_with('/') {
            return Err(StoreError::InvalidKey(key.to_string()));
        }

        let mut path = self.root.join(bucket);
        for segment in key.split('/') {
            let mut components = Path::new(segment).components();
            match (components.next(), components.next()) {
                (Some(Component::Normal(part)), None) if !segment.contains('\\') => {
                    path.push(part);
                }
                _ => return Err(StoreError::InvalidKey(key.to_string())),
            }
        }
        Ok(path)
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
        cache_control: &str,
    ) -> StoreResult<()> {
        let path = self.object_path(bucket, key)?;
        let parent = path
            .parent()
            .ok_or_else(|| StoreError::InvalidKey(key.to_string()))?;
        tokio::fs::create_dir_all(parent).await?;

        // 同じディレクトリに一時ファイルを書いてからrenameで置き換える
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| StoreError::InvalidKey(key.to_string()))?;
        let tmp_path = parent.join(format!(".{}.{}.tmp", file_name, uuid::Uuid::new_v4().simple()));

        if let Err(e) = tokio::fs::write(&tmp_path, &body).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(e.into());
        }
        if let Err(e) = tokio::fs::rename(&tmp_path, &path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(e.into());
        }

        debug!(
            path = %path.display(),
            bytes = body.len(),
            content_type,
            cache_control,
            "Stored object on local filesystem"
        );
        Ok(())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> StoreResult<()> {
        let path = self.object_path(bucket, key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            // 存在しないオブジェクトの削除は成功扱い
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
