//! `/api/process-image` のHTTP契約

/// 解析エンドポイントのパス
pub const PROCESS_IMAGE_PATH: &str = "/api/process-image";

/// multipart の画像フィールド名
pub const IMAGE_FIELD: &str = "image";

/// ベースURLから解析エンドポイントのURLを組み立てる
///
/// 末尾の `/` は取り除く。すでにエンドポイントを指している場合はそのまま返す。
///
/// # Examples
/// ```
/// use plant_disease_common::endpoint_url;
///
/// assert_eq!(endpoint_url("http://localhost:3000/"), "http://localhost:3000/api/process-image");
/// ```
pub fn endpoint_url(base: &str) -> String {
    let base = base.trim().trim_end_matches('/');
    if base.ends_with(PROCESS_IMAGE_PATH) {
        return base.to_string();
    }
    format!("{}{}", base, PROCESS_IMAGE_PATH)
}
