use crate::error::{DetectorError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// エンドポイントを上書きする環境変数
pub const ENDPOINT_ENV: &str = "PLANT_DISEASE_ENDPOINT";

const DEFAULT_ENDPOINT: &str = "http://localhost:3000";
const DEFAULT_TIMEOUT_SECONDS: u64 = 120;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// 解析サーバーのベースURL
    pub endpoint: String,
    /// 0 はタイムアウトなし
    pub timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| DetectorError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home
            .join(".config")
            .join("plant-disease-detector")
            .join("config.json"))
    }

    /// 使用するエンドポイント
    ///
    /// 優先順位: 引数 > 環境変数 > 設定ファイル
    pub fn resolve_endpoint(&self, override_endpoint: Option<&str>) -> String {
        if let Some(endpoint) = override_endpoint.filter(|e| !e.trim().is_empty()) {
            return endpoint.trim().to_string();
        }
        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV) {
            if !endpoint.trim().is_empty() {
                return endpoint.trim().to_string();
            }
        }
        self.endpoint.clone()
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_seconds > 0).then(|| Duration::from_secs(self.timeout_seconds))
    }

    pub fn set_endpoint(&mut self, endpoint: String) -> Result<()> {
        let parsed = url::Url::parse(endpoint.trim())
            .map_err(|e| DetectorError::Config(format!("URLが不正です: {} ({})", endpoint, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(DetectorError::Config(format!(
                "http/https のURLを指定してください: {}",
                endpoint
            )));
        }
        self.endpoint = endpoint.trim().to_string();
        Ok(())
    }
}
