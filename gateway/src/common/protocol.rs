//! 呼び出しエンベロープとレスポンスの通信プロトコル定義

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// `Content-Type` of every JSON response
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// HTTP-shaped invocation delivered by the transport.
///
/// Deserializes from a function-URL style event: the method is taken from
/// `requestContext.http.method`, falling back to `httpMethod`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawInvocationEvent")]
pub struct InvocationEnvelope {
    /// HTTPメソッド（大文字）
    pub method: String,
    /// リクエストヘッダー（キーの大文字小文字は不定）
    pub headers: HashMap<String, String>,
    /// リクエストボディ（base64の場合あり）
    pub body: Option<String>,
    /// ボディがbase64エンコードされているか
    pub is_base64_encoded: bool,
}

impl InvocationEnvelope {
    /// Envelope with the given method and a plain-text body
    pub fn new(method: impl Into<String>, body: Option<String>) -> Self {
        Self {
            method: method.into().to_ascii_uppercase(),
            headers: HashMap::new(),
            body,
            is_base64_encoded: false,
        }
    }

    /// Adds a header, keeping the caller's casing
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawInvocationEvent {
    #[serde(default)]
    request_context: Option<RawRequestContext>,
    #[serde(default)]
    http_method: Option<String>,
    #[serde(default)]
    headers: Option<HashMap<String, String>>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    is_base64_encoded: bool,
}

#[derive(Debug, Default, Deserialize)]
struct RawRequestContext {
    #[serde(default)]
    http: Option<RawHttpContext>,
}

#[derive(Debug, Default, Deserialize)]
struct RawHttpContext {
    #[serde(default)]
    method: Option<String>,
}

impl From<RawInvocationEvent> for InvocationEnvelope {
    fn from(raw: RawInvocationEvent) -> Self {
        let method = raw
            .request_context
            .and_then(|ctx| ctx.http)
            .and_then(|http| http.method)
            .or(raw.http_method)
            .unwrap_or_default()
            .to_ascii_uppercase();
        Self {
            method,
            headers: raw.headers.unwrap_or_default(),
            body: raw.body,
            is_base64_encoded: raw.is_base64_encoded,
        }
    }
}

/// Response handed back to the transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayResponse {
    /// HTTPステータスコード
    pub status_code: u16,
    /// レスポンスヘッダー
    pub headers: BTreeMap<String, String>,
    /// JSONテキスト（preflightでは空文字列）
    pub body: String,
}

impl GatewayResponse {
    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Parses the body as JSON (`Value::Null` for an empty body)
    pub fn json(&self) -> serde_json::Value {
        if self.body.is_empty() {
            return serde_json::Value::Null;
        }
        serde_json::from_str(&self.body).unwrap_or(serde_json::Value::Null)
    }
}

/// 書き込み成功レスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteResponse {
    /// 常にtrue
    pub ok: bool,
    /// 書き込んだキー
    pub key: String,
    /// 書き込み先バケット
    pub bucket: String,
}

/// 一括削除の結果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {
    /// `errors`が空のときtrue
    pub ok: bool,
    /// 削除できたキー（試行順）
    pub deleted: Vec<String>,
    /// 削除に失敗したキー
    pub errors: Vec<KeyError>,
}

impl DeleteResponse {
    /// Builds the response, deriving `ok` from `errors`
    pub fn new(deleted: Vec<String>, errors: Vec<KeyError>) -> Self {
        Self {
            ok: errors.is_empty(),
            deleted,
            errors,
        }
    }
}

/// キー単位の削除失敗
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyError {
    /// 対象キー
    pub key: String,
    /// ストアのエラーメッセージ
    pub error: String,
}

/// エラーレスポンス本文
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// エラーメッセージ
    pub error: String,
}
