//! 監査ログシステム
//!
//! カタログの変更操作ごとに1件の監査イベントを追記専用ストアへ記録する。
//! 記録はベストエフォートで、失敗しても変更操作の結果は変わらない。

/// 監査イベントの型定義
pub mod types;

/// ログストアのtraitとインメモリ実装
pub mod store;

/// SQLiteログストア
pub mod sqlite;

/// ベストエフォートロガー
pub mod logger;

pub use logger::AuditLogger;
pub use sqlite::SqliteAuditLogStore;
pub use store::{AuditLogStore, MemoryAuditLogStore};
pub use types::AuditEvent;
