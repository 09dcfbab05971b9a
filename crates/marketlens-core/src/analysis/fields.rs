//! Label/value projection of loosely-typed JSON objects.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::format::{display_value, title_case};

/// One rendered label/value pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub key: String,
    pub label: String,
    pub value: FieldValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Text(String),
    /// A boolean rendered as a word (`yes`/`no`, `guaranteed`/`failed`)
    Flag { value: bool, label: String },
    List(Vec<String>),
    Nested(Fields),
}

/// Ordered label/value pairs. Empty values are dropped on construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Fields(pub Vec<Field>);

impl Fields {
    /// Projects an object, skipping keys in `exclude`.
    pub fn from_map(map: &Map<String, Value>, exclude: &[&str]) -> Self {
        let fields = map
            .iter()
            .filter(|(key, _)| !exclude.contains(&key.as_str()))
            .filter_map(|(key, value)| {
                field_value(key, value).map(|value| Field {
                    key: key.clone(),
                    label: title_case(key),
                    value,
                })
            })
            .collect();
        Self(fields)
    }

    /// `None` unless `value` is an object with at least one renderable entry.
    pub fn from_value(value: Option<&Value>) -> Option<Self> {
        let fields = Self::from_map(value?.as_object()?, &[]);
        (!fields.is_empty()).then_some(fields)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.0.iter()
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.iter().find(|f| f.key == key).map(|f| &f.value)
    }
}

fn field_value(key: &str, value: &Value) -> Option<FieldValue> {
    match value {
        Value::Bool(b) => Some(FieldValue::Flag {
            value: *b,
            label: boolean_label(key, *b).to_string(),
        }),
        Value::Array(items) => {
            let items = string_list(items);
            (!items.is_empty()).then_some(FieldValue::List(items))
        }
        Value::Object(map) => {
            let nested = Fields::from_map(map, &[]);
            (!nested.is_empty()).then_some(FieldValue::Nested(nested))
        }
        other => display_value(other).map(FieldValue::Text),
    }
}

/// Word shown for a boolean flag.
///
/// Quality guarantees read as `guaranteed`/`failed`; everything else as `yes`/`no`.
pub fn boolean_label(key: &str, value: bool) -> &'static str {
    const GUARANTEE_HINTS: [&str; 5] = ["guarantee", "certified", "assured", "passed", "free"];
    let is_guarantee = GUARANTEE_HINTS.iter().any(|hint| key.contains(hint));
    match (is_guarantee, value) {
        (true, true) => "guaranteed",
        (true, false) => "failed",
        (false, true) => "yes",
        (false, false) => "no",
    }
}

/// Renders each list element as text; objects become `label: value` summaries.
pub fn string_list(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| match item {
            Value::Object(map) => {
                let parts: Vec<String> = map
                    .iter()
                    .filter_map(|(k, v)| display_value(v).map(|v| format!("{}: {v}", title_case(k))))
                    .collect();
                (!parts.is_empty()).then(|| parts.join(" | "))
            }
            other => display_value(other),
        })
        .collect()
}

/// First string found under any of `keys`.
pub fn first_text(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| map.get(*key))
        .find_map(display_value)
}

/// First number found under any of `keys`; numeric strings are accepted.
pub fn first_number(map: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter().filter_map(|key| map.get(*key)).find_map(|v| match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').parse().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_rejects_non_objects() {
        assert!(Fields::from_value(None).is_none());
        assert!(Fields::from_value(Some(&Value::Null)).is_none());
        assert!(Fields::from_value(Some(&json!(["a"]))).is_none());
        assert!(Fields::from_value(Some(&json!({"empty": ""}))).is_none());
    }

    #[test]
    fn test_projection_keeps_order_and_labels() {
        let value = json!({"faixa_etaria": "25-35", "renda_media": 5000, "interesses": ["a", "b"]});
        let fields = Fields::from_value(Some(&value)).unwrap();
        let labels: Vec<&str> = fields.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(labels, vec!["Faixa Etaria", "Renda Media", "Interesses"]);
        assert_eq!(
            fields.get("interesses"),
            Some(&FieldValue::List(vec!["a".into(), "b".into()]))
        );
    }

    #[test]
    fn test_boolean_labels() {
        assert_eq!(boolean_label("simulation_free_guarantee", true), "guaranteed");
        assert_eq!(boolean_label("validation_passed", false), "failed");
        assert_eq!(boolean_label("local_only", true), "yes");
        assert_eq!(boolean_label("local_only", false), "no");
    }

    #[test]
    fn test_first_number_accepts_strings() {
        let map = json!({"score": "87.5%"}).as_object().unwrap().clone();
        assert_eq!(first_number(&map, &["quality", "score"]), Some(87.5));
    }
}
