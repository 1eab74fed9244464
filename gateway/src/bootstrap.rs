//! サーバー初期化ロジック
//!
//! 設定からオブジェクトストア・監査ログストア・ゲートウェイを組み立てる。

use anyhow::Context;
use std::sync::Arc;
use tracing::{info, warn};

use crate::audit::sqlite::validate_table_name;
use crate::audit::{AuditLogStore, AuditLogger, SqliteAuditLogStore};
use crate::config::{ConfigError, GatewayConfig, StoreBackend};
use crate::cors::CorsPolicy;
use crate::dispatcher::MutationDispatcher;
use crate::gateway::CatalogGateway;
use crate::shutdown::ShutdownController;
use crate::storage::{HttpObjectStore, LocalObjectStore, MemoryObjectStore, ObjectStore};
use crate::AppState;

/// Builds the object store selected by `config`
pub fn build_object_store(config: &GatewayConfig) -> anyhow::Result<Arc<dyn ObjectStore>> {
    let store: Arc<dyn ObjectStore> = match config.store_backend {
        StoreBackend::Local => {
            info!("Object store: local directory {}", config.store_dir.display());
            Arc::new(LocalObjectStore::new(config.store_dir.clone()))
        }
        StoreBackend::Http => {
            let url = config
                .store_url
                .as_deref()
                .ok_or(ConfigError::MissingStoreUrl)?;
            info!("Object store: http {}", url);
            Arc::new(HttpObjectStore::new(url)?)
        }
        StoreBackend::Memory => {
            warn!("Object store: in-memory (objects are lost on exit)");
            Arc::new(MemoryObjectStore::new())
        }
    };
    Ok(store)
}

/// Builds the audit logger; auditing is disabled when no table is configured
pub async fn build_audit_logger(config: &GatewayConfig) -> anyhow::Result<AuditLogger> {
    let Some(table) = config.audit_table.as_deref() else {
        info!("Audit logging disabled (AUDIT_TABLE_NAME is not set)");
        return Ok(AuditLogger::disabled());
    };
    validate_table_name(table)?;

    let store = SqliteAuditLogStore::connect(&config.audit_database_url)
        .await
        .with_context(|| format!("failed to open audit database {}", config.audit_database_url))?;
    let store: Arc<dyn AuditLogStore> = Arc::new(store);
    info!("Audit logging to table {}", table);
    Ok(AuditLogger::new(store, table))
}

/// Builds the gateway from `config`.
///
/// A missing bucket is not a startup error: the gateway starts and answers
/// every mutation with 500 until it is configured.
pub async fn build_gateway(config: &GatewayConfig) -> anyhow::Result<CatalogGateway> {
    let cors = CorsPolicy::parse(&config.cors_origins);

    let dispatcher = match config.bucket.as_deref() {
        Some(bucket) => {
            let store = build_object_store(config)?;
            let audit = build_audit_logger(config).await?;
            Some(MutationDispatcher::new(store, bucket, audit))
        }
        None => {
            warn!("BUCKET_NAME is not set; every mutation request will fail");
            None
        }
    };

    Ok(CatalogGateway::new(cors, dispatcher))
}

/// サーバー初期化を実行する
pub async fn initialize(config: &GatewayConfig) -> anyhow::Result<AppState> {
    info!("Catalog Gateway v{}", env!("CARGO_PKG_VERSION"));
    let gateway = build_gateway(config).await?;
    Ok(AppState {
        gateway: Arc::new(gateway),
        shutdown: ShutdownController::default(),
    })
}
