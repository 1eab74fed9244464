//! ベストエフォートの監査ロガー
//!
//! ログストアへの書き込み失敗は警告ログを出して破棄する。
//! 呼び出し側の結果が監査ログの成否に左右されることはない。

use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use super::store::AuditLogStore;
use super::types::{random_suffix, AuditEvent};
use crate::common::types::ActionLabel;

/// Records one audit event per mutation, never failing the caller
#[derive(Clone)]
pub struct AuditLogger {
    destination: Option<(Arc<dyn AuditLogStore>, String)>,
}

impl std::fmt::Debug for AuditLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditLogger")
            .field("table", &self.table())
            .finish()
    }
}

impl AuditLogger {
    /// Logger writing into `table` of `store`
    pub fn new(store: Arc<dyn AuditLogStore>, table: impl Into<String>) -> Self {
        Self {
            destination: Some((store, table.into())),
        }
    }

    /// Logger that records nothing
    pub fn disabled() -> Self {
        Self { destination: None }
    }

    /// Builds from an optional table name; no table disables auditing
    pub fn from_parts(store: Option<Arc<dyn AuditLogStore>>, table: Option<String>) -> Self {
        match (store, table) {
            (Some(store), Some(table)) if !table.trim().is_empty() => Self::new(store, table),
            _ => Self::disabled(),
        }
    }

    /// Configured table, if auditing is enabled
    pub fn table(&self) -> Option<&str> {
        self.destination.as_ref().map(|(_, table)| table.as_str())
    }

    /// True when a destination is configured
    pub fn is_enabled(&self) -> bool {
        self.destination.is_some()
    }

    /// Writes one audit event. Every failure is logged and dropped.
    pub async fn record(
        &self,
        action: ActionLabel,
        user_id: &str,
        user_email: &str,
        target: &str,
        details: Option<Value>,
    ) {
        let Some((store, table)) = &self.destination else {
            return;
        };

        let event = AuditEvent::new(
            Utc::now(),
            &random_suffix(),
            action,
            user_id,
            user_email,
            target,
            details,
        );

        match store.put_item(table, &event).await {
            Ok(()) => debug!(
                action = %event.action,
                target = %event.target,
                sk = %event.sk,
                "Audit log written"
            ),
            Err(e) => warn!("audit log failed: {}", e),
        }
    }
}
