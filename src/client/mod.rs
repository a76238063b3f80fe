//! 解析サーバーとの通信

mod http;

pub use http::{resolve_masked_url, HttpProcessor};

use crate::error::Result;
use crate::upload::ImageUpload;
use async_trait::async_trait;
use plant_disease_common::AnalysisResult;

/// 画像を解析して結果を返す処理系
///
/// 実体は `POST /api/process-image`。テストではモックに差し替える。
#[async_trait]
pub trait ImageProcessor: Send + Sync {
    async fn process_image(&self, image: &ImageUpload) -> Result<AnalysisResult>;
}
