//! CLI module for catalog-gateway
//!
//! Provides the HTTP server and a one-shot invocation runner.

/// invoke サブコマンド（イベント1件の実行）
pub mod invoke;
/// serve サブコマンド（HTTPサーバー起動）
pub mod serve;

use clap::{Parser, Subcommand};

/// Catalog Gateway - write/delete gateway for the public catalog
#[derive(Parser, Debug)]
#[command(name = "catalog-gateway")]
#[command(version, about, long_about = None)]
#[command(after_help = r#"ENVIRONMENT VARIABLES:
    CATALOG_GATEWAY_BUCKET_NAME         Destination bucket (legacy: BUCKET_NAME)
    CATALOG_GATEWAY_AUDIT_TABLE_NAME    Audit table, auditing disabled if unset (legacy: AUDIT_TABLE_NAME)
    CATALOG_GATEWAY_CORS_ORIGINS        "*" or comma-separated origins (legacy: CORS_ORIGINS)
    CATALOG_GATEWAY_STORE_BACKEND       local | http | memory (default: local)
    CATALOG_GATEWAY_STORE_DIR           Root directory of the local store (default: ./data)
    CATALOG_GATEWAY_STORE_URL           Base URL of the http store
    CATALOG_GATEWAY_AUDIT_DATABASE_URL  Audit database (default: sqlite://audit.db)
    CATALOG_GATEWAY_HOST                Bind address (default: 0.0.0.0)
    CATALOG_GATEWAY_PORT                Listen port (default: 8080)
    CATALOG_GATEWAY_LOG_LEVEL           Log level (default: info)
    CATALOG_GATEWAY_LOG_DIR             Also write daily-rotated log files here
"#)]
pub struct Cli {
    /// Subcommand to execute (default: serve)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(serve::ServeArgs),
    /// Run one invocation event through the gateway and print the response
    Invoke(invoke::InvokeArgs),
}
