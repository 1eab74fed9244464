//! オブジェクトストア
//!
//! カタログドキュメントをキー付きBlobとして保存する外部ストアの抽象化。
//! ゲートウェイはこのtraitのみに依存し、実装は起動時に一度だけ選択する。

use async_trait::async_trait;

use crate::common::error::StoreResult;

/// ローカルディレクトリ実装
pub mod local;

/// HTTP (PUT/DELETE) 実装
pub mod http;

/// インメモリ実装（テスト・開発用）
pub mod memory;

pub use http::HttpObjectStore;
pub use local::LocalObjectStore;
pub use memory::MemoryObjectStore;

/// Cache-Control applied to every catalog write; readers must always see the
/// latest version.
pub const CACHE_CONTROL_NO_CACHE: &str = "no-cache";

/// Keyed blob store
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Writes `body` under `bucket`/`key`, replacing any previous object
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
        cache_control: &str,
    ) -> StoreResult<()>;

    /// Removes `bucket`/`key`
    async fn delete_object(&self, bucket: &str, key: &str) -> StoreResult<()>;
}
