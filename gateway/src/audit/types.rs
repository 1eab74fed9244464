//! 監査ログの型定義

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::common::types::ActionLabel;

/// userId recorded when the caller supplied none
pub const ANONYMOUS_USER: &str = "anonymous";

/// 監査イベント（ログストアが所有し、本システムは書き込みのみ行う）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// パーティションキー `DATE#<yyyy-mm-dd>`
    pub pk: String,
    /// ソートキー `<timestamp>#<8桁hex>`
    pub sk: String,
    /// アクションラベル
    pub action: ActionLabel,
    /// 操作ユーザーID（空なら`anonymous`）
    #[serde(rename = "userId")]
    pub user_id: String,
    /// 操作ユーザーのメール（空文字列可）
    #[serde(rename = "userEmail")]
    pub user_email: String,
    /// ミリ秒精度UTCタイムスタンプ
    pub timestamp: String,
    /// 対象キー
    pub target: String,
    /// 追加情報
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl AuditEvent {
    /// Builds the event for a mutation observed at `now`.
    ///
    /// `suffix` makes the sort key unique among events sharing a millisecond.
    pub fn new(
        now: DateTime<Utc>,
        suffix: &str,
        action: ActionLabel,
        user_id: &str,
        user_email: &str,
        target: &str,
        details: Option<Value>,
    ) -> Self {
        let timestamp = format_timestamp(now);
        let user_id = match user_id.trim() {
            "" => ANONYMOUS_USER.to_string(),
            trimmed => trimmed.to_string(),
        };
        Self {
            pk: format!("DATE#{}", now.format("%Y-%m-%d")),
            sk: format!("{timestamp}#{suffix}"),
            action,
            user_id,
            user_email: user_email.trim().to_string(),
            timestamp,
            target: target.to_string(),
            // 空のdetailsは記録しない
            details: details.filter(|d| !is_empty_value(d)),
        }
    }
}

/// `YYYY-MM-DDTHH:MM:SS.mmmZ`
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Eight lower-case hex characters from a random UUID
pub fn random_suffix() -> String {
    let mut id = uuid::Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}
