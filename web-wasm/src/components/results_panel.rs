//! 解析結果の表示

use leptos::prelude::*;
use plant_disease_common::view::{
    LABEL_AFFECTED_AREA, LABEL_INTENSITY, LABEL_PREDICTED_CLASS, LABEL_PROCESSED_IMAGE,
    LABEL_RESULTS, LABEL_SEVERITY_SCORE, LABEL_TREATMENTS,
};
use plant_disease_common::ResultView;

#[component]
pub fn ResultsPanel(
    results: Signal<Option<ResultView>>,
    error: Signal<Option<String>>,
) -> impl IntoView {
    view! {
        {move || {
            error
                .get()
                .map(|message| {
                    view! { <p class="error">"Error: " {message}</p> }
                })
        }}
        {move || results.get().map(|result| view! { <ResultCard result=result /> })}
    }
}

#[component]
fn ResultCard(result: ResultView) -> impl IntoView {
    let ResultView {
        predicted_class,
        severity,
        treatments,
        processed_image_url,
    } = result;

    view! {
        <div class="results">
            <h3>{LABEL_RESULTS}</h3>
            <p>
                <strong>{LABEL_PREDICTED_CLASS} ":"</strong>
                " "
                {predicted_class}
            </p>
            {severity
                .map(|severity| {
                    view! {
                        <p>
                            <strong>{LABEL_AFFECTED_AREA} ":"</strong>
                            " "
                            {severity.affected_area}
                        </p>
                        <p>
                            <strong>{LABEL_SEVERITY_SCORE} ":"</strong>
                            " "
                            {severity.severity_score}
                        </p>
                        <p>
                            <strong>{LABEL_INTENSITY} ":"</strong>
                            " "
                            {severity.intensity}
                        </p>
                    }
                })}
            <h4>{LABEL_TREATMENTS}</h4>
            <ul class="treatments">
                {treatments
                    .into_iter()
                    .map(|treatment| view! { <li>{treatment}</li> })
                    .collect_view()}
            </ul>
            {processed_image_url
                .map(|url| {
                    view! {
                        <div class="processed">
                            <h4>{LABEL_PROCESSED_IMAGE}</h4>
                            <img src=url alt="Processed" width="300" height="300" class="rounded" />
                        </div>
                    }
                })}
        </div>
    }
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use crate::components::test_support::container;
    use leptos::mount::mount_to;
    use plant_disease_common::{AnalysisResult, Intensity};
    use wasm_bindgen_test::*;
    use web_sys::HtmlElement;

    wasm_bindgen_test_configure!(run_in_browser);

    fn mount_panel(result: Option<AnalysisResult>, error: Option<&str>) -> HtmlElement {
        let parent = container();
        let view_model = result.as_ref().map(ResultView::from);
        let error = error.map(str::to_string);
        let handle = mount_to(parent.clone(), move || {
            let results = Signal::derive(move || view_model.clone());
            let error = Signal::derive(move || error.clone());
            view! { <ResultsPanel results=results error=error /> }
        });
        handle.forget();
        parent
    }

    fn text_of(element: &HtmlElement) -> String {
        element.text_content().unwrap_or_default()
    }

    #[wasm_bindgen_test]
    fn wasm_diseased_result_shows_severity_and_treatments() {
        let parent = mount_panel(
            Some(AnalysisResult {
                predicted_class: "Leaf Blight".to_string(),
                percentage_affected: Some(12.125),
                severity_score: Some(7.0),
                intensity_severity: Some(Intensity::Label("High".to_string())),
                treatment_recommendations: vec![
                    "Apply fungicide".to_string(),
                    "Remove affected leaves".to_string(),
                ],
                masked_image_url: Some("/masks/leaf.png".to_string()),
            }),
            None,
        );

        let text = text_of(&parent);
        assert!(text.contains("Leaf Blight"));
        assert!(text.contains(LABEL_AFFECTED_AREA));
        assert!(text.contains("12.13%"));
        assert!(text.contains("High"));

        let items = parent.query_selector_all(".treatments li").expect("セレクタ不正");
        assert_eq!(items.length(), 2);

        let img = parent
            .query_selector(".processed img")
            .ok()
            .flatten()
            .expect("処理済み画像がありません");
        assert_eq!(img.get_attribute("src").as_deref(), Some("/masks/leaf.png"));
        assert!(parent.query_selector(".error").ok().flatten().is_none());
    }

    #[wasm_bindgen_test]
    fn wasm_healthy_result_hides_severity() {
        let parent = mount_panel(
            Some(AnalysisResult {
                predicted_class: "Healthy".to_string(),
                treatment_recommendations: vec!["None".to_string()],
                ..Default::default()
            }),
            None,
        );

        let text = text_of(&parent);
        assert!(text.contains("Healthy"));
        assert!(text.contains(LABEL_TREATMENTS));
        assert!(!text.contains(LABEL_AFFECTED_AREA));
        assert!(!text.contains(LABEL_SEVERITY_SCORE));
        assert!(parent.query_selector(".processed").ok().flatten().is_none());
    }

    #[wasm_bindgen_test]
    fn wasm_error_without_result() {
        let parent = mount_panel(None, Some("API error: 500"));

        let error = parent
            .query_selector(".error")
            .ok()
            .flatten()
            .expect("エラー表示がありません");
        assert_eq!(error.text_content().as_deref(), Some("Error: API error: 500"));
        assert!(parent.query_selector(".results").ok().flatten().is_none());
    }
}
