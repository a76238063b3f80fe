//! プレビュー用 Data URL ユーティリティ

use base64::{engine::general_purpose::STANDARD, Engine as _};

/// 拡張子 → MIMEタイプ
const MIME_TYPES: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("bmp", "image/bmp"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
];

/// MIMEタイプが不明な場合の値
pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// バイト列を Data URL に変換
///
/// # Arguments
/// * `mime_type` - 例: "image/jpeg"
/// * `bytes` - ファイル内容
///
/// # Returns
/// "data:image/jpeg;base64,/9j/4AAQ..." 形式の文字列
pub fn encode_data_url(mime_type: &str, bytes: &[u8]) -> String {
    let mime_type = if mime_type.is_empty() {
        FALLBACK_MIME_TYPE
    } else {
        mime_type
    };
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}

/// ファイル名の拡張子からMIMEタイプを推定
pub fn guess_mime_type(file_name: &str) -> Option<&'static str> {
    let (_, ext) = file_name.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    MIME_TYPES
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, mime)| *mime)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_data_url() {
        let url = encode_data_url("image/png", b"\x89PNG");
        assert_eq!(url, "data:image/png;base64,iVBORw==");
    }

    #[test]
    fn test_encode_data_url_is_never_empty() {
        let url = encode_data_url("", b"");
        assert_eq!(url, "data:application/octet-stream;base64,");
        assert!(!url.is_empty());
    }

    #[test]
    fn test_guess_mime_type() {
        assert_eq!(guess_mime_type("leaf.JPG"), Some("image/jpeg"));
        assert_eq!(guess_mime_type("scan.tiff"), Some("image/tiff"));
        assert_eq!(guess_mime_type("archive.tar.png"), Some("image/png"));
        assert_eq!(guess_mime_type("notes.txt"), None);
        assert_eq!(guess_mime_type("README"), None);
    }
}
