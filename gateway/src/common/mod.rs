//! 共通型・エラー・プロトコル定義

/// エラー型
pub mod error;

/// 呼び出しエンベロープとレスポンス
pub mod protocol;

/// キー名前空間とアクションラベル
pub mod types;
