//! 画像ファイルの読み込みとプレビュー生成

use crate::error::{DetectorError, Result};
use image::ImageReader;
use plant_disease_common::{encode_data_url, guess_mime_type, SelectedFile, FALLBACK_MIME_TYPE};
use std::io::Cursor;
use std::path::Path;

/// 送信する画像
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// プレビュー情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub data_url: String,
    pub width: u32,
    pub height: u32,
}

impl ImageUpload {
    /// ファイルから読み込む
    ///
    /// 形式の検証はしない。MIMEタイプは内容から判定し、判定できなければ拡張子から推定する。
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(DetectorError::FileNotFound(path.display().to_string()));
        }

        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        Ok(Self::from_bytes(file_name, bytes))
    }

    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime_type = image::guess_format(&bytes)
            .map(|format| format.to_mime_type().to_string())
            .ok()
            .or_else(|| guess_mime_type(&file_name).map(str::to_string))
            .unwrap_or_else(|| FALLBACK_MIME_TYPE.to_string());

        Self {
            file_name,
            mime_type,
            bytes,
        }
    }

    pub fn meta(&self) -> SelectedFile {
        SelectedFile::new(&self.file_name, &self.mime_type, self.bytes.len() as u64)
    }

    /// プレビューを生成
    ///
    /// 画像としてデコードできない場合はエラー（呼び出し側でプレビューなしとして扱う）
    pub fn preview(&self) -> Result<Preview> {
        let (width, height) = ImageReader::new(Cursor::new(&self.bytes))
            .with_guessed_format()?
            .into_dimensions()
            .map_err(|e| DetectorError::ImageLoad(format!("{}: {}", self.file_name, e)))?;

        Ok(Preview {
            data_url: encode_data_url(&self.mime_type, &self.bytes),
            width,
            height,
        })
    }
}

/// バイト数を読みやすい単位で表示
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;

    let bytes_f = bytes as f64;
    if bytes_f >= MB {
        format!("{:.1} MB", bytes_f / MB)
    } else if bytes_f >= KB {
        format!("{:.1} KB", bytes_f / KB)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};
    use tempfile::tempdir;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, image::Rgb([40, 160, 60]));
        let mut buffer = Cursor::new(Vec::new());
        img.write_to(&mut buffer, ImageFormat::Png).expect("PNGエンコード失敗");
        buffer.into_inner()
    }

    #[test]
    fn test_mime_from_content() {
        // 拡張子が違っていても内容で判定
        let upload = ImageUpload::from_bytes("leaf.jpg", png_bytes(2, 2));
        assert_eq!(upload.mime_type, "image/png");
    }

    #[test]
    fn test_mime_from_extension_fallback() {
        let upload = ImageUpload::from_bytes("leaf.webp", b"not really an image".to_vec());
        assert_eq!(upload.mime_type, "image/webp");

        let upload = ImageUpload::from_bytes("leaf", b"???".to_vec());
        assert_eq!(upload.mime_type, FALLBACK_MIME_TYPE);
    }

    #[test]
    fn test_unknown_type_matches_data_url_fallback() {
        let upload = ImageUpload::from_bytes("notes.txt", b"plain text".to_vec());
        assert_eq!(upload.mime_type, "application/octet-stream");
        assert!(encode_data_url("", b"x").starts_with(&format!("data:{};", upload.mime_type)));
    }

    #[test]
    fn test_preview_of_valid_image() {
        let upload = ImageUpload::from_bytes("leaf.png", png_bytes(4, 3));
        let preview = upload.preview().expect("プレビュー生成失敗");
        assert_eq!((preview.width, preview.height), (4, 3));
        assert!(preview.data_url.starts_with("data:image/png;base64,"));
        assert!(preview.data_url.len() > "data:image/png;base64,".len());
    }

    #[test]
    fn test_preview_of_broken_image() {
        let upload = ImageUpload::from_bytes("broken.png", b"garbage".to_vec());
        assert!(upload.preview().is_err());
    }

    #[test]
    fn test_from_path() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("leaf.png");
        std::fs::write(&path, png_bytes(1, 1)).unwrap();

        let upload = ImageUpload::from_path(&path).expect("読み込み失敗");
        assert_eq!(upload.file_name, "leaf.png");
        let meta = upload.meta();
        assert_eq!(meta.size, upload.bytes.len() as u64);
        assert_eq!(meta.mime_type, "image/png");
    }

    #[test]
    fn test_from_path_missing() {
        let result = ImageUpload::from_path(Path::new("/nonexistent/leaf.jpg"));
        assert!(matches!(result, Err(DetectorError::FileNotFound(_))));
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }
}
