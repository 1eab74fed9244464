//! ログ初期化
//!
//! `CATALOG_GATEWAY_LOG_LEVEL`（なければ`RUST_LOG`、既定`info`）でフィルタし、
//! `CATALOG_GATEWAY_LOG_DIR`が設定されていれば日次ローテーションのファイルにも出力する。

use std::path::PathBuf;
use std::sync::Mutex;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Log file name prefix inside the log directory
pub const LOG_FILE_PREFIX: &str = "catalog-gateway.log";

const DEFAULT_FILTER: &str = "info";

// ファイル出力のフラッシュ用ガード（プロセス終了まで保持）
static FILE_GUARD: Mutex<Option<WorkerGuard>> = Mutex::new(None);

/// Filter directive from the environment
pub fn filter_directive() -> String {
    ["CATALOG_GATEWAY_LOG_LEVEL", "RUST_LOG"]
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

/// Log directory, if file output is enabled
pub fn log_dir() -> Option<PathBuf> {
    std::env::var("CATALOG_GATEWAY_LOG_DIR")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
}

/// Installs the global subscriber. Fails if one is already installed.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let directive = filter_directive();
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let file_layer = match log_dir() {
        Some(dir) => {
            std::fs::create_dir_all(&dir)?;
            let appender = tracing_appender::rolling::daily(&dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            if let Ok(mut slot) = FILE_GUARD.lock() {
                *slot = Some(guard);
            }
            Some(fmt::layer().with_writer(writer).with_ansi(false))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        // 標準出力は`invoke`の結果用に空けておく
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()?;

    Ok(())
}
