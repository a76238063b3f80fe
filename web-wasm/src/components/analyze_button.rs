//! 解析ボタン

use leptos::prelude::*;

#[component]
pub fn AnalyzeButton(
    can_submit: Signal<bool>,
    label: Signal<&'static str>,
) -> impl IntoView {
    view! {
        <button
            type="submit"
            class="btn btn-primary"
            disabled=move || !can_submit.get()
        >
            {move || label.get()}
        </button>
    }
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use crate::components::test_support::container;
    use leptos::mount::mount_to;
    use plant_disease_common::{DetectorState, SelectedFile, SUBMIT_LABEL, SUBMIT_LABEL_LOADING};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn mount_button(state: DetectorState) -> web_sys::Element {
        let parent = container();
        let state = RwSignal::new(state);
        let handle = mount_to(parent.clone(), move || {
            let can_submit = Signal::derive(move || state.with(|s| s.can_submit()));
            let label = Signal::derive(move || state.with(|s| s.submit_label()));
            view! { <AnalyzeButton can_submit=can_submit label=label /> }
        });
        handle.forget();
        parent
            .query_selector("button")
            .ok()
            .flatten()
            .expect("button が描画されていません")
    }

    #[wasm_bindgen_test]
    fn wasm_button_disabled_without_file() {
        let button = mount_button(DetectorState::new());
        assert!(button.has_attribute("disabled"));
        assert_eq!(button.text_content().as_deref(), Some(SUBMIT_LABEL));
    }

    #[wasm_bindgen_test]
    fn wasm_button_enabled_after_selection() {
        let mut state = DetectorState::new();
        state.select_file(SelectedFile::new("leaf.jpg", "image/jpeg", 10));
        let button = mount_button(state);
        assert!(!button.has_attribute("disabled"));
        assert_eq!(button.text_content().as_deref(), Some(SUBMIT_LABEL));
    }

    #[wasm_bindgen_test]
    fn wasm_button_shows_processing_while_submitting() {
        let mut state = DetectorState::new();
        state.select_file(SelectedFile::new("leaf.jpg", "image/jpeg", 10));
        state.begin_submit().expect("送信開始失敗");
        let button = mount_button(state);
        assert!(button.has_attribute("disabled"));
        assert_eq!(button.text_content().as_deref(), Some(SUBMIT_LABEL_LOADING));
    }
}
