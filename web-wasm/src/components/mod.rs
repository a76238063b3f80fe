pub mod analyze_button;
pub mod header;
pub mod results_panel;
pub mod upload_area;

#[cfg(all(target_arch = "wasm32", test))]
pub(crate) mod test_support {
    use wasm_bindgen::JsCast;
    use web_sys::HtmlElement;

    /// body に空の div を追加して返す（コンポーネントのマウント先）
    pub fn container() -> HtmlElement {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .expect("document が取得できません");
        let element = document
            .create_element("div")
            .expect("div生成失敗")
            .unchecked_into::<HtmlElement>();
        document
            .body()
            .expect("body がありません")
            .append_child(&element)
            .expect("append失敗");
        element
    }
}
