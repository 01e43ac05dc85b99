//! Lookup and coercion over raw stage payloads.
//!
//! Stage endpoints have shipped several response shapes for the same
//! quantity over time: a bare number, a numeric string, or an object carrying
//! the number under `value`. Everything here accepts all of them.

use std::borrow::Cow;

use af_core::LifeStage;
use serde_json::{Map, Value};

/// Resolve a dotted alias path (`oxygen.effluent`) against a payload object.
///
/// A literal key containing dots wins over path traversal.
pub fn lookup<'a>(root: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    if let Some(v) = root.get(path) {
        return Some(v);
    }
    let mut segments = path.split('.');
    let first = segments.next()?;
    let mut current = root.get(first)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Coerce a JSON value to a finite number.
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        Value::Object(map) => map.get("value").and_then(coerce_number),
        _ => None,
    }
}

/// Coerce a JSON value to non-empty text.
pub fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Object(map) => map
            .get("value")
            .or_else(|| map.get("name"))
            .and_then(coerce_text),
        _ => None,
    }
}

/// Expand `{ls}` and `{n}` placeholders of a per-life-stage alias or key.
pub fn expand(template: &str, life: Option<LifeStage>) -> Cow<'_, str> {
    match life {
        Some(ls) if template.contains('{') => Cow::Owned(
            template
                .replace("{ls}", ls.as_str())
                .replace("{n}", &ls.number().to_string()),
        ),
        _ => Cow::Borrowed(template),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn lookup_walks_nested_objects() {
        let root = obj(json!({"oxygen": {"effluent": {"value": 6.0}}}));
        let v = lookup(&root, "oxygen.effluent").unwrap();
        assert_eq!(coerce_number(v), Some(6.0));
    }

    #[test]
    fn literal_dotted_key_wins() {
        let root = obj(json!({"a.b": 1.0, "a": {"b": 2.0}}));
        assert_eq!(lookup(&root, "a.b").and_then(coerce_number), Some(1.0));
    }

    #[test]
    fn coerce_accepts_number_string_and_value_object() {
        assert_eq!(coerce_number(&json!(8.5)), Some(8.5));
        assert_eq!(coerce_number(&json!(" 8.5 ")), Some(8.5));
        assert_eq!(coerce_number(&json!({"value": {"value": 8.5}})), Some(8.5));
        assert_eq!(coerce_number(&json!(null)), None);
        assert_eq!(coerce_number(&json!("NaN")), None);
        assert_eq!(coerce_number(&json!("n/a")), None);
        assert_eq!(coerce_number(&json!([1.0])), None);
    }

    #[test]
    fn expand_substitutes_life_stage() {
        assert_eq!(
            expand("stage{n}_{ls}_flow", Some(LifeStage::Fingerling)),
            "stage2_fingerling_flow"
        );
        assert_eq!(expand("total_flow", Some(LifeStage::Juvenile)), "total_flow");
    }
}
