//! Catalog Gateway
//!
//! 公開カタログ（`catalog/v1/`配下のJSONドキュメント）への書き込み・削除を
//! 受け付けるゲートウェイ。CORS処理、名前空間の検証、一括削除の結果集約、
//! ベストエフォートの監査ログ記録を行う。

#![warn(missing_docs)]

/// 共通型定義（エラー、ワイヤ形式、ドメイン型）
pub mod common;

/// リクエスト正規化
pub mod normalizer;

/// CORSヘッダー解決
pub mod cors;

/// キー分類（監査アクションラベル）
pub mod classifier;

/// 監査ログシステム
pub mod audit;

/// オブジェクトストア
pub mod storage;

/// 変更操作ディスパッチャ
pub mod dispatcher;

/// 呼び出し処理パイプライン
pub mod gateway;

/// REST APIハンドラー
pub mod api;

/// axumサーバー起動
pub mod server;

/// サーバー初期化
pub mod bootstrap;

/// Shutdown controller
pub mod shutdown;

/// CLIインターフェース
pub mod cli;

/// 設定管理（環境変数ヘルパー）
pub mod config;

/// ロギング初期化ユーティリティ
pub mod logging;

/// アプリケーション状態
#[derive(Clone)]
pub struct AppState {
    /// カタログゲートウェイ（設定は起動後不変）
    pub gateway: std::sync::Arc<gateway::CatalogGateway>,
    /// Cooperative shutdown controller
    pub shutdown: shutdown::ShutdownController,
}

impl AppState {
    /// State around an already-built gateway
    pub fn new(gateway: gateway::CatalogGateway) -> Self {
        Self {
            gateway: std::sync::Arc::new(gateway),
            shutdown: shutdown::ShutdownController::default(),
        }
    }
}
