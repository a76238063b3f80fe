//! 解析結果の型定義
//!
//! CLIとWeb(WASM)で共有される型:
//! - SelectedFile: 選択された画像のメタデータ
//! - AnalysisResult: `/api/process-image` の応答
//! - Intensity: 文字列または数値で返る重症度ラベル

use serde::{Deserialize, Serialize};
use std::fmt;

/// 健康判定に使う接尾辞（大文字小文字を区別しない）
pub const HEALTHY_SUFFIX: &str = "healthy";

/// 選択された画像ファイル
///
/// 本体のバイト列はフロントエンド側（CLIは `ImageUpload`、ブラウザは `File`）が保持する。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedFile {
    pub file_name: String,
    pub mime_type: String,
    pub size: u64,
}

impl SelectedFile {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, size: u64) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            size,
        }
    }
}

/// 重症度ラベル（サーバーによって文字列か数値）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Intensity {
    Level(f64),
    Label(String),
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intensity::Level(value) => f.write_str(&crate::view::format_number(*value)),
            Intensity::Label(label) => f.write_str(label),
        }
    }
}

/// 病害解析結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub predicted_class: String,

    /// 病変面積の割合 (0-100)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage_affected: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity_score: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity_severity: Option<Intensity>,

    #[serde(default)]
    pub treatment_recommendations: Vec<String>,

    /// 病変部をマスクした画像のURL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub masked_image_url: Option<String>,
}

impl AnalysisResult {
    /// 予測クラスが "healthy" で終わるか
    pub fn is_healthy(&self) -> bool {
        self.predicted_class.to_lowercase().ends_with(HEALTHY_SUFFIX)
    }

    /// 空文字は未設定扱い
    pub fn masked_image_url(&self) -> Option<&str> {
        self.masked_image_url.as_deref().filter(|url| !url.is_empty())
    }
}
