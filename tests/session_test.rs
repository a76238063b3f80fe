//! セッション（選択・プレビュー・送信）のテスト
//!
//! 解析サーバーはモックに差し替えて検証

use async_trait::async_trait;
use plant_disease_common::{
    AnalysisResult, Completion, Intensity, Outcome, Phase, SubmitRejected, SUBMIT_LABEL,
};
use plant_disease_detector::analyzer::{self, CacheFile};
use plant_disease_detector::client::ImageProcessor;
use plant_disease_detector::error::{DetectorError, Result};
use plant_disease_detector::scanner;
use plant_disease_detector::session::Session;
use plant_disease_detector::upload::ImageUpload;
use std::collections::VecDeque;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tempfile::tempdir;

/// 登録した応答を順に返すモック
#[derive(Default)]
struct MockProcessor {
    responses: Mutex<VecDeque<Result<AnalysisResult>>>,
    calls: AtomicUsize,
}

impl MockProcessor {
    fn with(responses: Vec<Result<AnalysisResult>>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageProcessor for MockProcessor {
    async fn process_image(&self, _image: &ImageUpload) -> Result<AnalysisResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(DetectorError::ApiCall("応答が登録されていません".into())))
    }
}

fn png_bytes() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(8, 6, image::Rgb([30, 140, 50]));
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, image::ImageFormat::Png).expect("PNGエンコード失敗");
    buffer.into_inner()
}

fn leaf_upload() -> ImageUpload {
    ImageUpload::from_bytes("leaf.png", png_bytes())
}

fn healthy() -> AnalysisResult {
    AnalysisResult {
        predicted_class: "Healthy".to_string(),
        treatment_recommendations: vec!["None".to_string()],
        ..Default::default()
    }
}

fn leaf_blight() -> AnalysisResult {
    AnalysisResult {
        predicted_class: "Leaf Blight".to_string(),
        percentage_affected: Some(42.5),
        severity_score: Some(7.0),
        intensity_severity: Some(Intensity::Label("High".to_string())),
        treatment_recommendations: vec![
            "Apply fungicide".to_string(),
            "Remove affected leaves".to_string(),
        ],
        masked_image_url: None,
    }
}

/// 有効な画像を選ぶとプレビューが得られる
#[test]
fn test_select_valid_image_yields_preview() {
    let mut session = Session::new(MockProcessor::default());
    let preview = session.select(leaf_upload()).cloned().expect("プレビューがない");

    assert!(!preview.data_url.is_empty());
    assert_eq!((preview.width, preview.height), (8, 6));
    assert_eq!(session.state().preview(), Some(preview.data_url.as_str()));
    assert_eq!(session.state().phase(), Phase::Ready);
}

/// デコードできない画像はプレビューなしで送信可能
#[tokio::test]
async fn test_broken_image_has_no_preview_but_submits() {
    let mut session = Session::new(MockProcessor::with(vec![Ok(healthy())]));
    assert!(session.select(ImageUpload::from_bytes("leaf.jpg", b"garbage".to_vec())).is_none());
    assert!(session.state().preview().is_none());
    assert!(session.state().can_submit());

    session.submit().await.expect("送信失敗");
    assert_eq!(session.state().last_outcome(), Some(Outcome::Success));
}

/// ファイル未選択では送信できない
#[tokio::test]
async fn test_submit_without_file_is_rejected() {
    let mut session = Session::new(MockProcessor::default());
    assert!(!session.state().can_submit());

    let err = session.submit().await.unwrap_err();
    assert!(matches!(err, DetectorError::SubmitRejected(SubmitRejected::NoFileSelected)));
    assert_eq!(session.processor().calls(), 0);
}

/// 健康な結果では重症度欄を表示しない
#[tokio::test]
async fn test_healthy_result_view() {
    let mut session = Session::new(MockProcessor::with(vec![Ok(healthy())]));
    session.select(leaf_upload());
    session.submit().await.expect("送信失敗");

    let view = session.result_view().expect("結果がない");
    assert_eq!(view.predicted_class, "Healthy");
    assert!(view.severity.is_none());
    assert_eq!(view.treatments, vec!["None".to_string()]);
}

/// 病害ありの結果では4項目を表示
#[tokio::test]
async fn test_diseased_result_view() {
    let mut session = Session::new(MockProcessor::with(vec![Ok(leaf_blight())]));
    session.select(leaf_upload());
    session.submit().await.expect("送信失敗");

    let view = session.result_view().expect("結果がない");
    let severity = view.severity.expect("重症度がない");
    assert_eq!(severity.affected_area, "42.50%");
    assert_eq!(severity.severity_score, "7");
    assert_eq!(severity.intensity, "High");
    assert_eq!(view.treatments.len(), 2);
    assert!(view.processed_image_url.is_none());
}

/// 処理済み画像URLがあれば表示
#[tokio::test]
async fn test_masked_image_url() {
    let mut masked = leaf_blight();
    masked.masked_image_url = Some("/masked/leaf.png".to_string());

    let mut session = Session::new(MockProcessor::with(vec![Ok(masked)]));
    session.select(leaf_upload());
    session.submit().await.expect("送信失敗");

    let view = session.result_view().expect("結果がない");
    assert_eq!(view.processed_image_url.as_deref(), Some("/masked/leaf.png"));
}

/// 通信失敗時は前回の結果を残し、ローディングを解除する
#[tokio::test]
async fn test_network_failure_keeps_previous_result() {
    let mut session = Session::new(MockProcessor::with(vec![
        Ok(leaf_blight()),
        Err(DetectorError::ApiCall("connection refused".into())),
    ]));
    session.select(leaf_upload());

    session.submit().await.expect("送信失敗");
    let before = session.result_view();

    let completion = session.submit().await.expect("送信失敗");
    assert_eq!(completion, Completion::Applied);
    assert!(!session.state().is_loading());
    assert_eq!(session.state().submit_label(), SUBMIT_LABEL);
    assert_eq!(session.result_view(), before);
    assert_eq!(session.state().last_outcome(), Some(Outcome::Failure));
    assert!(session
        .state()
        .last_error()
        .is_some_and(|e| e.contains("connection refused")));
}

/// 同じ画像を2回送っても同じ結果になる
#[tokio::test]
async fn test_resubmit_is_idempotent() {
    let mut session = Session::new(MockProcessor::with(vec![Ok(leaf_blight()), Ok(leaf_blight())]));
    session.select(leaf_upload());

    session.submit().await.expect("送信失敗");
    let first = session.result_view();
    session.submit().await.expect("送信失敗");
    let second = session.result_view();

    assert!(first.is_some());
    assert_eq!(first, second);
    assert_eq!(session.processor().calls(), 2);
}

/// キャッシュヒット時は送信しない
#[tokio::test]
async fn test_analyze_image_uses_cache() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("leaf.png");
    std::fs::write(&path, png_bytes()).unwrap();

    let mut session = Session::new(MockProcessor::with(vec![Ok(leaf_blight())]));
    let mut cache = CacheFile::load(dir.path());

    let first = analyzer::analyze_image(&mut session, &path, Some(&mut cache))
        .await
        .expect("解析失敗");
    assert!(!first.cached);
    assert_eq!(cache.len(), 1);

    let second = analyzer::analyze_image(&mut session, &path, Some(&mut cache))
        .await
        .expect("解析失敗");
    assert!(second.cached);
    assert_eq!(second.result, first.result);
    assert_eq!(session.processor().calls(), 1);
}

/// 失敗した画像があっても続行する
#[tokio::test]
async fn test_analyze_images_continues_after_failure() {
    let dir = tempdir().expect("Failed to create temp dir");
    for name in ["a.png", "b.png", "c.png"] {
        std::fs::write(dir.path().join(name), png_bytes()).unwrap();
    }
    let images = scanner::scan_folder(dir.path(), false).unwrap();

    let mut session = Session::new(MockProcessor::with(vec![
        Ok(healthy()),
        Err(DetectorError::ApiStatus { status: 502, body: "bad gateway".into() }),
        Ok(leaf_blight()),
    ]));
    let progress = Mutex::new(Vec::new());

    let summary = analyzer::analyze_images(&mut session, &images, None, |index, image| {
        progress.lock().unwrap().push((index, image.file_name.clone()));
    })
    .await;

    assert_eq!(summary.records.len(), 2);
    assert_eq!(summary.records[0].file_name, "a.png");
    assert_eq!(summary.records[1].file_name, "c.png");
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].0, "b.png");
    assert!(summary.failures[0].1.contains("502"));
    assert_eq!(progress.lock().unwrap().len(), 3);
}
