//! `/api/process-image` のHTTPクライアント

use super::ImageProcessor;
use crate::config::Config;
use crate::error::{DetectorError, Result};
use crate::upload::ImageUpload;
use async_trait::async_trait;
use plant_disease_common::{endpoint_url, parse_analysis_response, AnalysisResult, IMAGE_FIELD};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// エラー応答本文をログに残す最大文字数
const MAX_ERROR_BODY_CHARS: usize = 500;

pub struct HttpProcessor {
    client: Client,
    base_url: String,
    endpoint: String,
}

impl HttpProcessor {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: base_url.trim().to_string(),
            endpoint: endpoint_url(base_url),
        })
    }

    pub fn from_config(config: &Config, endpoint_override: Option<&str>) -> Result<Self> {
        Self::new(&config.resolve_endpoint(endpoint_override), config.timeout())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// 処理済み画像をダウンロード
    pub async fn fetch_masked_image(&self, masked_url: &str) -> Result<Vec<u8>> {
        let url = resolve_masked_url(&self.base_url, masked_url)?;
        debug!(%url, "処理済み画像を取得");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DetectorError::ApiStatus {
                status: status.as_u16(),
                body: truncate(&body),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl ImageProcessor for HttpProcessor {
    async fn process_image(&self, image: &ImageUpload) -> Result<AnalysisResult> {
        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.mime_type)
            .map_err(|e| DetectorError::ApiCall(format!("MIMEタイプが不正です: {}", e)))?;
        let form = Form::new().part(IMAGE_FIELD, part);

        debug!(
            endpoint = %self.endpoint,
            file = %image.file_name,
            bytes = image.bytes.len(),
            "画像を送信"
        );

        let response = self.client.post(&self.endpoint).multipart(form).send().await?;
        let status = response.status();
        let body = response.text().await?;

        debug!(status = status.as_u16(), body_len = body.len(), "応答を受信");

        if !status.is_success() {
            return Err(DetectorError::ApiStatus {
                status: status.as_u16(),
                body: truncate(&body),
            });
        }

        Ok(parse_analysis_response(&body)?)
    }
}

/// 処理済み画像のURLを解決
///
/// 相対パスはベースURLを基準にする。絶対URLはそのまま。
pub fn resolve_masked_url(base_url: &str, masked_url: &str) -> Result<Url> {
    if let Ok(url) = Url::parse(masked_url) {
        return Ok(url);
    }

    let base = Url::parse(base_url)
        .map_err(|e| DetectorError::Config(format!("ベースURLが不正です: {} ({})", base_url, e)))?;
    base.join(masked_url)
        .map_err(|e| DetectorError::ApiCall(format!("画像URLが不正です: {} ({})", masked_url, e)))
}

fn truncate(body: &str) -> String {
    body.chars().take(MAX_ERROR_BODY_CHARS).collect()
}
