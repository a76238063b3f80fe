//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    /// サーバーの応答が契約を満たしていない
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_invalid_response() {
        let error = Error::InvalidResponse("predictedClass がありません".to_string());
        assert_eq!(
            format!("{}", error),
            "Invalid response: predictedClass がありません"
        );
    }

    #[test]
    fn test_error_debug() {
        let error = Error::InvalidResponse("テスト".to_string());
        let debug = format!("{:?}", error);
        assert!(debug.contains("InvalidResponse"));
        assert!(debug.contains("テスト"));
    }
}
