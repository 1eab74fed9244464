//! Configuration management via environment variables
//!
//! Settings are read once per process. New `CATALOG_GATEWAY_*` names are
//! preferred; the legacy names used by the deployed functions are still
//! accepted with a deprecation warning.

use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Get an environment variable with fallback to a deprecated name
///
/// Blank values count as unset, so an empty `BUCKET_NAME=` behaves the same
/// as a missing one.
///
/// # Arguments
/// * `new_name` - The new environment variable name (preferred)
/// * `old_name` - The deprecated environment variable name (fallback)
///
/// # Returns
/// * `Some(value)` - The environment variable value
/// * `None` - Neither variable is set
///
/// # Example
/// ```
/// use catalog_gateway::config::get_env_with_fallback;
///
/// let bucket = get_env_with_fallback("CATALOG_GATEWAY_BUCKET_NAME", "BUCKET_NAME");
/// ```
pub fn get_env_with_fallback(new_name: &str, old_name: &str) -> Option<String> {
    if let Some(val) = non_blank_var(new_name) {
        return Some(val);
    }
    if let Some(val) = non_blank_var(old_name) {
        if old_name != new_name {
            tracing::warn!(
                "Environment variable '{}' is deprecated, use '{}' instead",
                old_name,
                new_name
            );
        }
        return Some(val);
    }
    None
}

/// Get an environment variable with fallback and default value
pub fn get_env_with_fallback_or(new_name: &str, old_name: &str, default: &str) -> String {
    get_env_with_fallback(new_name, old_name).unwrap_or_else(|| default.to_string())
}

/// Get an environment variable with fallback, parsing to a specific type
///
/// Falls back to `default` when neither is set or parsing fails.
pub fn get_env_with_fallback_parse<T: FromStr>(new_name: &str, old_name: &str, default: T) -> T {
    get_env_with_fallback(new_name, old_name)
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn non_blank_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// 設定エラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// 不明なストアバックエンド
    #[error("unknown store backend {0:?} (expected local, http or memory)")]
    UnknownBackend(String),
    /// httpバックエンドでURL未設定
    #[error("CATALOG_GATEWAY_STORE_URL is required for the http store backend")]
    MissingStoreUrl,
}

/// Object-store implementation selected at startup
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StoreBackend {
    /// Files under a local directory
    #[default]
    Local,
    /// Remote store reached with HTTP PUT/DELETE
    Http,
    /// In-process map (lost on exit)
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" | "fs" => Ok(Self::Local),
            "http" | "https" => Ok(Self::Http),
            "memory" | "mem" => Ok(Self::Memory),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

/// Process-wide gateway settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// 書き込み先バケット（未設定なら全リクエストが500）
    pub bucket: Option<String>,
    /// 監査テーブル（未設定なら監査ログ無効）
    pub audit_table: Option<String>,
    /// CORSポリシー文字列（`*` またはカンマ区切りのオリジン）
    pub cors_origins: String,
    /// オブジェクトストアの種類
    pub store_backend: StoreBackend,
    /// localバックエンドのルートディレクトリ
    pub store_dir: PathBuf,
    /// httpバックエンドのベースURL
    pub store_url: Option<String>,
    /// 監査ログDBのURL
    pub audit_database_url: String,
    /// 待ち受けアドレス
    pub host: String,
    /// 待ち受けポート
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bucket: None,
            audit_table: None,
            cors_origins: "*".to_string(),
            store_backend: StoreBackend::Local,
            store_dir: PathBuf::from("./data"),
            store_url: None,
            audit_database_url: "sqlite://audit.db".to_string(),
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let store_backend = match get_env_with_fallback(
            "CATALOG_GATEWAY_STORE_BACKEND",
            "CATALOG_GATEWAY_STORE_BACKEND",
        ) {
            Some(raw) => raw.parse()?,
            None => defaults.store_backend,
        };
        let store_url = get_env_with_fallback("CATALOG_GATEWAY_STORE_URL", "CATALOG_GATEWAY_STORE_URL");
        if store_backend == StoreBackend::Http && store_url.is_none() {
            return Err(ConfigError::MissingStoreUrl);
        }

        Ok(Self {
            bucket: get_env_with_fallback("CATALOG_GATEWAY_BUCKET_NAME", "BUCKET_NAME")
                .map(|v| v.trim().to_string()),
            audit_table: get_env_with_fallback("CATALOG_GATEWAY_AUDIT_TABLE_NAME", "AUDIT_TABLE_NAME")
                .map(|v| v.trim().to_string()),
            cors_origins: get_env_with_fallback_or(
                "CATALOG_GATEWAY_CORS_ORIGINS",
                "CORS_ORIGINS",
                &defaults.cors_origins,
            ),
            store_backend,
            store_dir: get_env_with_fallback("CATALOG_GATEWAY_STORE_DIR", "CATALOG_GATEWAY_STORE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.store_dir),
            store_url,
            audit_database_url: get_env_with_fallback_or(
                "CATALOG_GATEWAY_AUDIT_DATABASE_URL",
                "CATALOG_GATEWAY_AUDIT_DATABASE_URL",
                &defaults.audit_database_url,
            ),
            host: get_env_with_fallback_or("CATALOG_GATEWAY_HOST", "CATALOG_GATEWAY_HOST", &defaults.host),
            port: get_env_with_fallback_parse("CATALOG_GATEWAY_PORT", "CATALOG_GATEWAY_PORT", defaults.port),
        })
    }

    /// `host:port` for the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
