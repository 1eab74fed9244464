//! リクエスト正規化
//!
//! 呼び出しエンベロープ（ヘッダーの大文字小文字不定、base64ボディの可能性あり）を
//! 検証済みの内部リクエストに変換する。

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::common::error::{GatewayError, GatewayResult};
use crate::common::protocol::InvocationEnvelope;

/// `contentType` used when the request does not name one
pub const DEFAULT_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Header carrying the caller's user id
pub const USER_SUB_HEADER: &str = "x-user-sub";
/// Header carrying the caller's e-mail
pub const USER_EMAIL_HEADER: &str = "x-user-email";
/// Header carrying the browser origin
pub const ORIGIN_HEADER: &str = "origin";

/// Request headers with lower-cased names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestHeaders(HashMap<String, String>);

impl RequestHeaders {
    /// Lower-cases every header name. When two names collide after
    /// lower-casing, the non-empty value wins.
    pub fn from_raw(raw: &HashMap<String, String>) -> Self {
        let mut headers: HashMap<String, String> = HashMap::with_capacity(raw.len());
        for (name, value) in raw {
            let name = name.to_ascii_lowercase();
            match headers.get(&name) {
                Some(existing) if !existing.is_empty() => {}
                _ => {
                    headers.insert(name, value.clone());
                }
            }
        }
        Self(headers)
    }

    /// Looks up a header by name, case-insensitively
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// Non-empty `Origin` header
    pub fn origin(&self) -> Option<&str> {
        self.get(ORIGIN_HEADER).filter(|v| !v.is_empty())
    }

    /// Caller identity as supplied by the upstream layer
    pub fn identity(&self) -> CallerIdentity {
        CallerIdentity {
            user_id: self.get(USER_SUB_HEADER).unwrap_or_default().to_string(),
            user_email: self.get(USER_EMAIL_HEADER).unwrap_or_default().to_string(),
        }
    }
}

/// 呼び出し元の識別情報（上流で検証済みとして信頼する）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallerIdentity {
    /// `X-User-Sub`（空の場合あり）
    pub user_id: String,
    /// `X-User-Email`（空の場合あり）
    pub user_email: String,
}

/// 書き込みリクエスト
#[derive(Debug, Clone, PartialEq)]
pub struct WriteRequest {
    /// 書き込み先キー
    pub key: String,
    /// 保存するドキュメント（内容は検証しない）
    pub body: Value,
    /// オブジェクトのContent-Type
    pub content_type: String,
}

impl WriteRequest {
    /// Extracts `key`, `body` and `contentType` from a parsed payload.
    ///
    /// `body` may be any JSON value except `null`; an empty object, array or
    /// string is a valid document.
    pub fn from_payload(payload: &Map<String, Value>) -> GatewayResult<Self> {
        let key = payload
            .get("key")
            .and_then(Value::as_str)
            .filter(|k| !k.is_empty());
        let body = payload.get("body").filter(|b| !b.is_null());

        let (Some(key), Some(body)) = (key, body) else {
            return Err(GatewayError::Input("key and body are required".to_string()));
        };

        let content_type = payload
            .get("contentType")
            .and_then(Value::as_str)
            .filter(|ct| !ct.is_empty())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();

        Ok(Self {
            key: key.to_string(),
            body: body.clone(),
            content_type,
        })
    }
}

/// 削除リクエスト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRequest {
    /// 重複を除いた削除対象キー（入力順）
    pub keys: Vec<String>,
}

impl DeleteRequest {
    /// Normalizes `keys` (or a single `key`) into a de-duplicated list of
    /// trimmed, non-empty keys.
    pub fn from_payload(payload: &Map<String, Value>) -> GatewayResult<Self> {
        let candidates: Vec<Value> = match payload.get("keys") {
            Some(Value::Array(items)) => items.clone(),
            Some(Value::Null) | None => match payload.get("key") {
                Some(key) if is_truthy(key) => vec![key.clone()],
                _ => Vec::new(),
            },
            Some(_) => Vec::new(),
        };

        let mut keys: Vec<String> = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let text = match candidate {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                _ => continue,
            };
            let text = text.trim();
            if text.is_empty() || keys.iter().any(|k| k == text) {
                continue;
            }
            keys.push(text.to_string());
        }

        if keys.is_empty() {
            return Err(GatewayError::Input("key or keys required".to_string()));
        }
        Ok(Self { keys })
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// True for a CORS preflight; no body parsing happens for these.
pub fn is_preflight(envelope: &InvocationEnvelope) -> bool {
    envelope.method.eq_ignore_ascii_case("OPTIONS")
}

/// Decodes (base64 if flagged) and parses the envelope body.
///
/// An absent or empty body parses as `{}`. Anything that is not a JSON
/// object is an input error.
pub fn parse_body(envelope: &InvocationEnvelope) -> GatewayResult<Map<String, Value>> {
    let raw = envelope.body.as_deref().unwrap_or_default();

    let text = if envelope.is_base64_encoded {
        let bytes = STANDARD
            .decode(raw.trim())
            .map_err(|e| GatewayError::InvalidJson(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| GatewayError::InvalidJson(e.to_string()))?
    } else {
        raw.to_string()
    };

    if text.trim().is_empty() {
        return Ok(Map::new());
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(GatewayError::Input(
            "request body must be a JSON object".to_string(),
        )),
        Err(e) => Err(GatewayError::InvalidJson(e.to_string())),
    }
}
