use chrono::{Local, SecondsFormat};
use plant_disease_common::AnalysisResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

/// 解析記録（JSON出力用）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub file_name: String,

    #[serde(default)]
    pub file_path: String,

    /// 解析日時（RFC 3339）
    pub analyzed_at: String,

    /// キャッシュから取得したか
    #[serde(default)]
    pub cached: bool,

    pub result: AnalysisResult,
}

impl AnalysisRecord {
    pub fn new(path: &Path, result: AnalysisResult, cached: bool) -> Self {
        Self {
            file_name: path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
            file_path: path.display().to_string(),
            analyzed_at: Local::now().to_rfc3339_opts(SecondsFormat::Secs, false),
            cached,
            result,
        }
    }
}

/// 解析記録をJSONで保存
pub fn save_records(path: &Path, records: &[AnalysisRecord]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(records)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn load_records(path: &Path) -> Result<Vec<AnalysisRecord>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
