//! APIレスポンスパーサー
//!
//! `/api/process-image` の応答本文を検証して `AnalysisResult` に変換する。
//! 描画時に欠損フィールドで落ちないよう、受信時点で形を確認する。

use crate::error::{Error, Result};
use crate::types::{AnalysisResult, HEALTHY_SUFFIX};
use serde_json::{Map, Value};

/// 応答本文をパースして検証
///
/// 検証内容:
/// 1. 本文がJSONオブジェクトであること
/// 2. `predictedClass` が空でない文字列であること
/// 3. 病害あり（"healthy"で終わらない）の場合、
///    `percentageAffected`(0-100)・`severityScore`・`intensitySeverity` があること
/// 4. `treatmentRecommendations` は省略・null なら空リスト、あれば文字列配列
/// 5. 健康な場合、表示しない重症度フィールドの型違いは欠損扱い
///
/// # Examples
/// ```
/// use plant_disease_common::parse_analysis_response;
///
/// let body = r#"{"predictedClass": "Healthy", "treatmentRecommendations": ["None"]}"#;
/// let result = parse_analysis_response(body).unwrap();
/// assert!(result.is_healthy());
/// ```
pub fn parse_analysis_response(body: &str) -> Result<AnalysisResult> {
    let value: Value = serde_json::from_str(body.trim())
        .map_err(|e| Error::InvalidResponse(format!("JSONではありません: {}", e)))?;

    let Value::Object(mut map) = value else {
        return Err(Error::InvalidResponse("JSONオブジェクトではありません".into()));
    };

    let predicted_class = match map.get("predictedClass") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        Some(Value::String(_)) => {
            return Err(Error::InvalidResponse("predictedClass が空です".into()))
        }
        Some(_) => {
            return Err(Error::InvalidResponse("predictedClass が文字列ではありません".into()))
        }
        None => return Err(Error::InvalidResponse("predictedClass がありません".into())),
    };

    normalize_treatments(&mut map)?;

    if predicted_class.to_lowercase().ends_with(HEALTHY_SUFFIX) {
        drop_mistyped_severity_fields(&mut map);
    } else {
        validate_severity_fields(&map)?;
    }

    serde_json::from_value(Value::Object(map))
        .map_err(|e| Error::InvalidResponse(format!("フィールドの型が不正です: {}", e)))
}

/// `treatmentRecommendations` の null・欠損を空配列に揃える
fn normalize_treatments(map: &mut Map<String, Value>) -> Result<()> {
    match map.get("treatmentRecommendations") {
        None | Some(Value::Null) => {
            map.insert("treatmentRecommendations".into(), Value::Array(Vec::new()));
            Ok(())
        }
        Some(Value::Array(items)) if items.iter().all(Value::is_string) => Ok(()),
        Some(_) => Err(Error::InvalidResponse(
            "treatmentRecommendations が文字列配列ではありません".into(),
        )),
    }
}

fn drop_mistyped_severity_fields(map: &mut Map<String, Value>) {
    for key in ["percentageAffected", "severityScore"] {
        if map.get(key).is_some_and(|v| !v.is_number()) {
            map.remove(key);
        }
    }
    if map
        .get("intensitySeverity")
        .is_some_and(|v| !(v.is_string() || v.is_number()))
    {
        map.remove("intensitySeverity");
    }
}

fn validate_severity_fields(map: &Map<String, Value>) -> Result<()> {
    let percentage = require_number(map, "percentageAffected")?;
    if !(0.0..=100.0).contains(&percentage) {
        return Err(Error::InvalidResponse(format!(
            "percentageAffected が範囲外です: {}",
            percentage
        )));
    }

    require_number(map, "severityScore")?;

    match map.get("intensitySeverity") {
        Some(Value::String(_)) => Ok(()),
        Some(Value::Number(n)) if n.as_f64().is_some_and(f64::is_finite) => Ok(()),
        Some(Value::Null) | None => {
            Err(Error::InvalidResponse("intensitySeverity がありません".into()))
        }
        Some(_) => Err(Error::InvalidResponse(
            "intensitySeverity は文字列か数値である必要があります".into(),
        )),
    }
}

fn require_number(map: &Map<String, Value>, key: &str) -> Result<f64> {
    match map.get(key) {
        Some(Value::Number(n)) => n
            .as_f64()
            .filter(|v| v.is_finite())
            .ok_or_else(|| Error::InvalidResponse(format!("{} が有限の数値ではありません", key))),
        Some(Value::Null) | None => Err(Error::InvalidResponse(format!("{} がありません", key))),
        Some(_) => Err(Error::InvalidResponse(format!("{} が数値ではありません", key))),
    }
}
