//! serve サブコマンド
//!
//! HTTPサーバーを起動します。

use clap::Args;

use crate::config::GatewayConfig;
use crate::{bootstrap, server};

/// serve サブコマンドの引数
#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Listen port (overrides CATALOG_GATEWAY_PORT)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Bind address (overrides CATALOG_GATEWAY_HOST)
    #[arg(short = 'H', long)]
    pub host: Option<String>,
}

impl ServeArgs {
    /// Applies command-line overrides on top of the environment
    pub fn apply(&self, mut config: GatewayConfig) -> GatewayConfig {
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        config
    }
}

/// Runs the server until Ctrl+C / SIGTERM
pub async fn execute(args: &ServeArgs) -> anyhow::Result<()> {
    let config = args.apply(GatewayConfig::from_env()?);
    let state = bootstrap::initialize(&config).await?;
    server::run(state, &config.bind_addr()).await?;
    Ok(())
}
