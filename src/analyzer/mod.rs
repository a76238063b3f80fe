pub mod cache;
mod types;

pub use cache::{compute_hash, CacheFile};
pub use types::{load_records, save_records, AnalysisRecord};

use crate::client::ImageProcessor;
use crate::error::{DetectorError, Result};
use crate::scanner::ImageInfo;
use crate::session::Session;
use crate::upload::ImageUpload;
use plant_disease_common::Outcome;
use std::path::Path;
use tracing::debug;

/// 1枚解析
///
/// キャッシュがあればヒット時に送信をスキップし、解析成功時に書き込む。
pub async fn analyze_image<P: ImageProcessor>(
    session: &mut Session<P>,
    path: &Path,
    mut cache: Option<&mut CacheFile>,
) -> Result<AnalysisRecord> {
    let upload = ImageUpload::from_path(path)?;
    let hash = compute_hash(&upload.bytes);
    let file_size = upload.bytes.len() as u64;
    session.select(upload);

    if let Some(cached) = cache.as_deref().and_then(|c| c.get(&hash)) {
        debug!(file = %path.display(), %hash, "キャッシュヒット");
        return Ok(AnalysisRecord::new(path, cached.clone(), true));
    }

    session.submit().await?;

    let state = session.state();
    if state.last_outcome() != Some(Outcome::Success) {
        let message = state.last_error().unwrap_or("不明なエラー").to_string();
        return Err(DetectorError::ApiCall(message));
    }
    let result = state
        .result()
        .cloned()
        .ok_or_else(|| DetectorError::ApiCall("解析結果がありません".into()))?;

    let record = AnalysisRecord::new(path, result, false);
    if let Some(cache) = cache.as_deref_mut() {
        cache.insert(hash, record.file_name.clone(), file_size, record.result.clone());
    }

    Ok(record)
}

/// 複数画像の解析結果
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub records: Vec<AnalysisRecord>,
    /// (ファイル名, エラーメッセージ)
    pub failures: Vec<(String, String)>,
}

/// 画像を順番に解析
///
/// 1枚の失敗で止めず、失敗として記録して続行する。
pub async fn analyze_images<P, F>(
    session: &mut Session<P>,
    images: &[ImageInfo],
    mut cache: Option<&mut CacheFile>,
    on_progress: F,
) -> BatchSummary
where
    P: ImageProcessor,
    F: Fn(usize, &ImageInfo),
{
    let mut summary = BatchSummary::default();

    for (index, image) in images.iter().enumerate() {
        on_progress(index, image);
        match analyze_image(session, &image.path, cache.as_deref_mut()).await {
            Ok(record) => summary.records.push(record),
            Err(e) => summary.failures.push((image.file_name.clone(), e.to_string())),
        }
    }

    summary
}
