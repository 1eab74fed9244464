//! 共通型定義
//!
//! カタログキーの名前空間、操作種別、監査用アクションラベル

use serde::{Deserialize, Serialize};

/// Prefix every mutable catalog key must start with.
pub const NAMESPACE_PREFIX: &str = "catalog/v1/";

/// Returns true when `key` lies inside the catalog namespace.
pub fn is_in_namespace(key: &str) -> bool {
    key.starts_with(NAMESPACE_PREFIX)
}

/// 変更操作の種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MutationKind {
    /// ドキュメントの書き込み
    Write,
    /// ドキュメントの削除
    Delete,
}

impl MutationKind {
    /// Lower-case name, as used in routes and the CLI
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Write => "write",
            Self::Delete => "delete",
        }
    }
}

impl std::fmt::Display for MutationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MutationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "write" => Ok(Self::Write),
            "delete" => Ok(Self::Delete),
            other => Err(format!("unknown mutation kind: {other}")),
        }
    }
}

/// 監査ログ用アクションラベル（キーの形だけから決まる）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionLabel {
    /// projects.json の更新
    ProjectsListUpdate,
    /// projects/<id>/index.json の保存
    ProjectSave,
    /// projects/<id>/index.json の削除
    ProjectDelete,
    /// areas.json の更新
    AreasUpdate,
    /// areas/<id>/index.json の更新
    AreaUpdate,
    /// areas/<id>/index.json の削除
    AreaDelete,
    /// 書き込みの汎用ラベル
    CatalogSave,
    /// 削除の汎用ラベル
    CatalogDelete,
}

impl ActionLabel {
    /// Generic label for an operation whose key matches no specific shape
    pub fn generic(kind: MutationKind) -> Self {
        match kind {
            MutationKind::Write => Self::CatalogSave,
            MutationKind::Delete => Self::CatalogDelete,
        }
    }

    /// ラベル文字列
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProjectsListUpdate => "projects_list_update",
            Self::ProjectSave => "project_save",
            Self::ProjectDelete => "project_delete",
            Self::AreasUpdate => "areas_update",
            Self::AreaUpdate => "area_update",
            Self::AreaDelete => "area_delete",
            Self::CatalogSave => "catalog_save",
            Self::CatalogDelete => "catalog_delete",
        }
    }
}

impl std::fmt::Display for ActionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
