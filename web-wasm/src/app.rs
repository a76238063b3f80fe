//! メインアプリケーションコンポーネント

use leptos::prelude::*;
use leptos::task::spawn_local;
use plant_disease_common::{DetectorState, SelectedFile};
use web_sys::File;

use crate::api::process_image::process_image;
use crate::components::{
    analyze_button::AnalyzeButton,
    header::Header,
    results_panel::ResultsPanel,
    upload_area::{read_as_data_url, UploadArea},
};

/// メインアプリケーションコンポーネント
///
/// 状態は `DetectorState` にまとめ、選択中の `File` だけをローカルに保持する
#[component]
pub fn App() -> impl IntoView {
    let state = RwSignal::new(DetectorState::new());
    let selected_file = StoredValue::new_local(None::<File>);

    // ファイル選択ハンドラ
    let on_file_selected = move |file: File| {
        let meta = SelectedFile::new(file.name(), file.type_(), file.size() as u64);
        let Some(ticket) = state.try_update(|s| s.select_file(meta)) else {
            return;
        };
        selected_file.set_value(Some(file.clone()));

        spawn_local(async move {
            let data_url = read_as_data_url(&file).await;
            state.update(|s| {
                match data_url {
                    Some(data_url) => s.complete_preview(ticket, data_url),
                    None => s.fail_preview(ticket),
                };
            });
        });
    };

    // 解析ハンドラ
    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();

        let Some(file) = selected_file.get_value() else {
            return;
        };
        let Some(Ok(ticket)) = state.try_update(|s| s.begin_submit()) else {
            return;
        };

        spawn_local(async move {
            let outcome = process_image(&file).await;
            if let Err(e) = &outcome {
                gloo::console::error!("Error processing image:", e.clone());
            }
            state.update(|s| {
                s.complete_submit(ticket, outcome);
            });
        });
    };

    let preview = Signal::derive(move || state.with(|s| s.preview().map(str::to_string)));
    let can_submit = Signal::derive(move || state.with(|s| s.can_submit()));
    let label = Signal::derive(move || state.with(|s| s.submit_label()));
    let results = Signal::derive(move || state.with(|s| s.result_view()));
    let error = Signal::derive(move || state.with(|s| s.last_error().map(str::to_string)));

    view! {
        <div class="container">
            <Header />

            <form class="upload-form" on:submit=on_submit>
                <UploadArea preview=preview on_file_selected=on_file_selected />
                <AnalyzeButton can_submit=can_submit label=label />
            </form>

            <ResultsPanel results=results error=error />
        </div>
    }
}
