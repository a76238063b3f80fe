//! エラーケーステスト

use plant_disease_common::SubmitRejected;
use plant_disease_detector::analyzer::{load_records, save_records, AnalysisRecord};
use plant_disease_detector::error::DetectorError;
use plant_disease_detector::scanner;
use plant_disease_detector::upload::ImageUpload;
use std::path::Path;
use tempfile::tempdir;

/// 存在しないフォルダをスキャンした場合
#[test]
fn test_scan_nonexistent_folder() {
    let result = scanner::scan_folder(Path::new("/nonexistent/path/12345"), false);
    assert!(matches!(result, Err(DetectorError::FolderNotFound(_))));
}

/// 画像のないフォルダをスキャンした場合
#[test]
fn test_scan_folder_no_images() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("notes.txt"), "hello").unwrap();
    std::fs::write(dir.path().join("data.json"), "{}").unwrap();

    let result = scanner::scan_folder(dir.path(), true).unwrap();
    assert!(result.is_empty());
}

/// 存在しない画像を読み込んだ場合
#[test]
fn test_missing_image() {
    let result = ImageUpload::from_path(Path::new("/nonexistent/leaf.jpg"));
    assert!(matches!(result, Err(DetectorError::FileNotFound(_))));
}

/// DetectorErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        DetectorError::Config("テスト設定エラー".to_string()),
        DetectorError::FileNotFound("leaf.jpg".to_string()),
        DetectorError::FolderNotFound("/path/to/folder".to_string()),
        DetectorError::ImageLoad("壊れた画像".to_string()),
        DetectorError::NoImagesFound("フォルダ".to_string()),
        DetectorError::ApiCall("API呼び出し失敗".to_string()),
        DetectorError::ApiStatus { status: 503, body: "busy".to_string() },
        DetectorError::Interactive("中断".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

#[test]
fn test_api_status_message() {
    let err = DetectorError::ApiStatus { status: 503, body: "busy".to_string() };
    let display = format!("{}", err);
    assert!(display.contains("503"));
    assert!(display.contains("busy"));
}

/// 送信拒否からの変換
#[test]
fn test_submit_rejected_conversion() {
    let err: DetectorError = SubmitRejected::AlreadySubmitting.into();
    assert!(matches!(err, DetectorError::SubmitRejected(SubmitRejected::AlreadySubmitting)));
    assert!(format!("{}", err).contains("解析中"));
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: DetectorError = io_err.into();

    assert!(matches!(err, DetectorError::Io(_)));
    assert!(format!("{}", err).contains("IO"));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: DetectorError = json_err.into();

    assert!(matches!(err, DetectorError::JsonParse(_)));
}

/// common::Errorは透過的に表示される
#[test]
fn test_common_error_transparent() {
    let common_err = plant_disease_common::Error::InvalidResponse("predictedClass がありません".to_string());
    let err: DetectorError = common_err.into();

    assert!(matches!(err, DetectorError::Common(_)));
    assert_eq!(format!("{}", err), "Invalid response: predictedClass がありません");
}

/// 解析記録の保存と読み込み
#[test]
fn test_records_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let output = dir.path().join("out").join("results.json");

    let record = AnalysisRecord::new(
        Path::new("photos/leaf.jpg"),
        plant_disease_common::AnalysisResult {
            predicted_class: "Healthy".to_string(),
            ..Default::default()
        },
        false,
    );
    save_records(&output, std::slice::from_ref(&record)).expect("保存失敗");

    let content = std::fs::read_to_string(&output).unwrap();
    assert!(content.contains("\"fileName\": \"leaf.jpg\""));
    assert!(content.contains("\"analyzedAt\""));
    assert!(content.contains("\"predictedClass\": \"Healthy\""));

    let loaded = load_records(&output).expect("読み込み失敗");
    assert_eq!(loaded, vec![record]);
}

/// 記録ファイルが壊れている場合
#[test]
fn test_load_records_invalid() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("results.json");
    std::fs::write(&path, "not json").unwrap();

    assert!(matches!(load_records(&path), Err(DetectorError::JsonParse(_))));
}
