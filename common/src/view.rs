//! 解析結果の表示モデル
//!
//! Web・CLIともにこのモデルから描画する。表示ルール:
//! - 予測クラスと対処法リストは常に表示
//! - 病変面積・重症度スコア・重症度は "healthy" で終わらない場合のみ
//! - 処理済み画像はURLがある場合のみ

use crate::types::AnalysisResult;

pub const LABEL_RESULTS: &str = "Results:";
pub const LABEL_PREDICTED_CLASS: &str = "Predicted Class";
pub const LABEL_AFFECTED_AREA: &str = "Affected Area";
pub const LABEL_SEVERITY_SCORE: &str = "Severity Score";
pub const LABEL_INTENSITY: &str = "Intensity Severity";
pub const LABEL_TREATMENTS: &str = "Treatment Recommendations:";
pub const LABEL_PROCESSED_IMAGE: &str = "Processed Image:";

/// 値が欠けているときの表示
pub const NOT_AVAILABLE: &str = "N/A";

/// 病害ありのときだけ表示する項目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeverityView {
    pub affected_area: String,
    pub severity_score: String,
    pub intensity: String,
}

/// 描画用に整形済みの解析結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub predicted_class: String,
    pub severity: Option<SeverityView>,
    pub treatments: Vec<String>,
    pub processed_image_url: Option<String>,
}

impl ResultView {
    pub fn from_result(result: &AnalysisResult) -> Self {
        let severity = (!result.is_healthy()).then(|| SeverityView {
            affected_area: result
                .percentage_affected
                .map(format_percentage)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            severity_score: result
                .severity_score
                .map(format_number)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            intensity: result
                .intensity_severity
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        });

        Self {
            predicted_class: result.predicted_class.clone(),
            severity,
            treatments: result.treatment_recommendations.clone(),
            processed_image_url: result.masked_image_url().map(str::to_string),
        }
    }
}

impl From<&AnalysisResult> for ResultView {
    fn from(result: &AnalysisResult) -> Self {
        Self::from_result(result)
    }
}

/// 割合を小数点以下2桁で表示（42.5 → "42.50%"）
///
/// ちょうど中間の値は0から遠い側へ丸める（12.125 → "12.13%"）
pub fn format_percentage(value: f64) -> String {
    format!("{:.2}%", round_half_up_cents(value))
}

/// 小数第3位がちょうど5の値を切り上げる
///
/// 2進数で正確に表せる中間値は奇数/8 の形だけなので、8倍して奇数整数かどうかで判定する。
/// それ以外の値は `{:.2}` の正確な丸めに任せる。
fn round_half_up_cents(value: f64) -> f64 {
    let eighths = value * 8.0;
    let is_tie = eighths.is_finite() && eighths.fract() == 0.0 && eighths % 2.0 != 0.0;
    if is_tie {
        (value * 100.0).round() / 100.0
    } else {
        value
    }
}

/// 数値を表示用に整形
///
/// 整数値は小数点なし（7.0 → "7"）、それ以外は最短表記（7.25 → "7.25"）
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// テキスト形式で描画（CLI出力用）
pub fn render_text(view: &ResultView) -> String {
    let mut lines = vec![
        LABEL_RESULTS.to_string(),
        format!("{}: {}", LABEL_PREDICTED_CLASS, view.predicted_class),
    ];

    if let Some(severity) = &view.severity {
        lines.push(format!("{}: {}", LABEL_AFFECTED_AREA, severity.affected_area));
        lines.push(format!("{}: {}", LABEL_SEVERITY_SCORE, severity.severity_score));
        lines.push(format!("{}: {}", LABEL_INTENSITY, severity.intensity));
    }

    lines.push(LABEL_TREATMENTS.to_string());
    for treatment in &view.treatments {
        lines.push(format!("  - {}", treatment));
    }

    if let Some(url) = &view.processed_image_url {
        lines.push(format!("{} {}", LABEL_PROCESSED_IMAGE, url));
    }

    lines.join("\n")
}
