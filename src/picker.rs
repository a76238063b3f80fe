//! 対話式の画像選択

use crate::error::{DetectorError, Result};
use crate::scanner::{self, ImageInfo};
use crate::upload::format_size;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Select;
use std::path::{Path, PathBuf};

/// 選択肢の表示ラベル
pub fn item_label(folder: &Path, image: &ImageInfo) -> String {
    let relative = image.path.strip_prefix(folder).unwrap_or(&image.path);
    format!("{} ({})", relative.display(), format_size(image.size))
}

/// フォルダ内の画像から1枚を選ぶ
///
/// キャンセル時は `None`
pub fn pick_image(folder: &Path, recursive: bool) -> Result<Option<PathBuf>> {
    let images = scanner::scan_folder(folder, recursive)?;
    if images.is_empty() {
        return Err(DetectorError::NoImagesFound(folder.display().to_string()));
    }

    let items: Vec<String> = images.iter().map(|img| item_label(folder, img)).collect();

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("解析する画像を選択してください")
        .items(&items)
        .default(0)
        .interact_opt()
        .map_err(|e| DetectorError::Interactive(e.to_string()))?;

    Ok(selection.map(|index| images[index].path.clone()))
}
