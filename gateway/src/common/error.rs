//! エラー型定義
//!
//! 統一エラー型（thiserror使用）
//!
//! `GatewayError`はHTTPステータスと外部向けメッセージを持ち、
//! レスポンスJSONの`error`フィールドにそのまま使われる。

use axum::http::StatusCode;
use thiserror::Error;

use crate::common::types::NAMESPACE_PREFIX;

/// Object store / audit log store error type
#[derive(Debug, Error)]
pub enum StoreError {
    /// Object does not exist
    #[error("object not found: {0}")]
    NotFound(String),

    /// Key cannot be mapped onto the backend
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Filesystem error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client error
    #[error("http error: {0}")]
    Http(String),

    /// Database error
    #[error("database error: {0}")]
    Database(String),

    /// Backend answered with a failure status
    #[error("store rejected request ({status}): {message}")]
    Rejected {
        /// HTTP status returned by the backend
        status: u16,
        /// Response text returned by the backend
        message: String,
    },
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Http(err.to_string())
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}

/// gateway error type
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Object store destination is not configured
    #[error("{0} is not set")]
    Configuration(String),

    /// Request body could not be decoded or parsed
    #[error("invalid json: {0}")]
    InvalidJson(String),

    /// Required input is missing or has the wrong shape
    #[error("{0}")]
    Input(String),

    /// Key outside the catalog namespace
    #[error("key must start with {prefix}")]
    NamespaceViolation {
        /// Offending key
        key: String,
        /// Required prefix
        prefix: &'static str,
    },

    /// HTTP method not accepted by the mutation endpoints
    #[error("method not allowed")]
    MethodNotAllowed(String),

    /// Underlying store call failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Transport-level failure (body unreadable, response not representable)
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Namespace violation for the given key
    pub fn namespace(key: impl Into<String>) -> Self {
        Self::NamespaceViolation {
            key: key.into(),
            prefix: NAMESPACE_PREFIX,
        }
    }

    /// Returns the message placed in the `error` field of the response body.
    ///
    /// Store failures surface the underlying store message; the offending key
    /// of a namespace violation is only logged.
    pub fn external_message(&self) -> String {
        match self {
            Self::Internal(_) => "internal error".to_string(),
            _ => self.to_string(),
        }
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidJson(_) => StatusCode::BAD_REQUEST,
            Self::Input(_) => StatusCode::BAD_REQUEST,
            Self::NamespaceViolation { .. } => StatusCode::FORBIDDEN,
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Result type alias (gateway)
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Result type alias (stores)
pub type StoreResult<T> = Result<T, StoreError>;
