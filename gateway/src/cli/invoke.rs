//! invoke サブコマンド
//!
//! 関数URL形式のイベントJSONを1件読み込み、ゲートウェイに通してレスポンスを出力する。

use anyhow::Context;
use clap::Args;
use std::io::Read;
use std::path::PathBuf;

use crate::bootstrap;
use crate::common::protocol::{GatewayResponse, InvocationEnvelope};
use crate::common::types::MutationKind;
use crate::config::GatewayConfig;
use crate::gateway::CatalogGateway;

/// invoke サブコマンドの引数
#[derive(Args, Debug, Clone)]
pub struct InvokeArgs {
    /// Operation: write or delete
    pub kind: MutationKind,

    /// Event JSON file (reads stdin when omitted)
    #[arg(short, long)]
    pub event: Option<PathBuf>,
}

/// Runs one event through `gateway`
pub async fn run_event(
    gateway: &CatalogGateway,
    kind: MutationKind,
    raw_event: &str,
) -> anyhow::Result<GatewayResponse> {
    let envelope: InvocationEnvelope =
        serde_json::from_str(raw_event).context("event is not a valid invocation event")?;
    Ok(gateway.handle(kind, &envelope).await)
}

/// Reads the event, runs it and prints the response JSON to stdout
pub async fn execute(args: &InvokeArgs) -> anyhow::Result<()> {
    let raw_event = match &args.event {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read event file {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read event from stdin")?;
            buf
        }
    };

    let config = GatewayConfig::from_env()?;
    let gateway = bootstrap::build_gateway(&config).await?;
    let response = run_event(&gateway, args.kind, &raw_event).await?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
