//! 画像選択とプレビュー

use js_sys::Promise;
use leptos::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Event, File, FileReader, HtmlInputElement};

#[component]
pub fn UploadArea<F>(
    preview: Signal<Option<String>>,
    on_file_selected: F,
) -> impl IntoView
where
    F: Fn(File) + 'static,
{
    let on_change = move |ev: Event| {
        let input: HtmlInputElement = event_target(&ev);
        if let Some(file) = input.files().and_then(|files| files.get(0)) {
            on_file_selected(file);
        }
    };

    view! {
        <div class="upload-area">
            <label for="picture">"Plant Image"</label>
            <input id="picture" type="file" accept="image/*" on:change=on_change />
        </div>
        {move || {
            preview
                .get()
                .map(|src| {
                    view! {
                        <div class="preview">
                            <img src=src alt="Preview" width="300" height="300" class="rounded" />
                        </div>
                    }
                })
        }}
    }
}

/// ファイルを Data URL として読み込む
///
/// 読み込みを開始できない・失敗した・結果が空の場合は `None`
pub async fn read_as_data_url(file: &File) -> Option<String> {
    let reader = FileReader::new().ok()?;

    let loaded = Promise::new(&mut |resolve, reject| {
        reader.set_onload(Some(&resolve));
        reader.set_onerror(Some(&reject));
        reader.set_onabort(Some(&reject));
    });

    if let Err(e) = reader.read_as_data_url(file) {
        gloo::console::warn!("プレビューを読み込めません:", e);
        return None;
    }

    if let Err(e) = JsFuture::from(loaded).await {
        gloo::console::warn!("プレビューの読み込みに失敗しました:", e);
        return None;
    }

    reader
        .result()
        .ok()
        .and_then(|result| result.as_string())
        .filter(|url| !url.is_empty())
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use js_sys::{Array, Uint8Array};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn file_from_bytes(bytes: &[u8], name: &str) -> File {
        let parts = Array::of1(&Uint8Array::from(bytes));
        File::new_with_u8_array_sequence(&parts, name).expect("File生成失敗")
    }

    #[wasm_bindgen_test]
    async fn wasm_read_as_data_url_yields_non_empty_url() {
        let file = file_from_bytes(b"\x89PNG\r\n\x1a\n", "leaf.png");
        let url = read_as_data_url(&file).await.expect("Data URL が取得できません");
        assert!(url.starts_with("data:"));
        assert!(url.contains(";base64,"));
    }
}
