use plant_disease_common::SubmitRejected;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DetectorError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("画像が見つかりません: {0}")]
    NoImagesFound(String),

    #[error("API呼び出しエラー: {0}")]
    ApiCall(String),

    #[error("APIがエラーを返しました (HTTP {status}): {body}")]
    ApiStatus { status: u16, body: String },

    #[error("HTTPエラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("対話入力エラー: {0}")]
    Interactive(String),

    #[error("送信できません: {0}")]
    SubmitRejected(#[from] SubmitRejected),

    #[error(transparent)]
    Common(#[from] plant_disease_common::Error),
}

pub type Result<T> = std::result::Result<T, DetectorError>;
