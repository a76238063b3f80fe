//! `/api/process-image` 呼び出し（fetch + FormData）

use plant_disease_common::{parse_analysis_response, AnalysisResult, IMAGE_FIELD, PROCESS_IMAGE_PATH};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, FormData, Request, RequestInit, Response};

/// 画像を送信して解析結果を受け取る
///
/// 通信エラー・HTTPエラー・応答の形式違反はすべて文字列のエラーとして返す
pub async fn process_image(file: &File) -> Result<AnalysisResult, String> {
    let form = FormData::new().map_err(js_error)?;
    form.append_with_blob_and_filename(IMAGE_FIELD, file, &file.name())
        .map_err(js_error)?;

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_body(&form);

    let request = Request::new_with_str_and_init(PROCESS_IMAGE_PATH, &opts).map_err(js_error)?;

    let window = web_sys::window().ok_or_else(|| "window が取得できません".to_string())?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(js_error)?;
    let resp: Response = resp_value.dyn_into().map_err(js_error)?;

    let text = JsFuture::from(resp.text().map_err(js_error)?)
        .await
        .map_err(js_error)?;
    let body = text
        .as_string()
        .ok_or_else(|| "応答本文を読み取れません".to_string())?;

    if !resp.ok() {
        return Err(format!("API error: {} {}", resp.status(), body));
    }

    parse_analysis_response(&body).map_err(|e| e.to_string())
}

fn js_error(value: JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}
