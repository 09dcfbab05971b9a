//! Form controls, client-side validation and payload serialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::FieldError;
use crate::session::SessionId;

/// Name of the field holding the market segment.
pub const SEGMENT_FIELD: &str = "segment";

/// Fields that are sent as JSON numbers rather than strings.
pub const NUMERIC_FIELDS: [&str; 3] = ["price", "revenue_goal", "marketing_budget"];

/// Generic placeholder terms rejected as a segment in strict mode.
pub const GENERIC_SEGMENT_TERMS: [&str; 6] =
    ["test", "example", "sample", "teste", "exemplo", "amostra"];

const MIN_SEGMENT_LEN: usize = 3;

/// How strict the segment checks are.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Required fields and minimum segment length only
    Basic,
    /// Additionally rejects generic placeholder segments
    #[default]
    Strict,
}

/// One input element of the analysis form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormControl {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub required: bool,
}

impl FormControl {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            required: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    fn trimmed(&self) -> &str {
        self.value.trim()
    }
}

/// The full set of controls in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormInput {
    pub controls: Vec<FormControl>,
}

impl FormInput {
    pub fn new(controls: Vec<FormControl>) -> Self {
        Self { controls }
    }

    /// Builder-style push.
    pub fn with(mut self, control: FormControl) -> Self {
        self.controls.push(control);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FormControl> {
        self.controls.iter().find(|c| c.name == name)
    }

    /// Checks every control and returns all problems at once.
    ///
    /// An empty vector means the form may be submitted.
    pub fn validate(&self, mode: ValidationMode) -> Vec<FieldError> {
        let mut errors = Vec::new();

        for control in &self.controls {
            let value = control.trimmed();

            if value.is_empty() {
                if control.required {
                    errors.push(FieldError::new(
                        &control.name,
                        format!("{} is required", crate::format::title_case(&control.name)),
                    ));
                }
                continue;
            }

            if control.name == SEGMENT_FIELD {
                if let Some(message) = check_segment(value, mode) {
                    errors.push(FieldError::new(&control.name, message));
                }
            }

            if is_numeric_field(&control.name) && parse_number(value).is_none() {
                errors.push(FieldError::new(
                    &control.name,
                    format!(
                        "{} must be a number",
                        crate::format::title_case(&control.name)
                    ),
                ));
            }
        }

        errors
    }

    /// Serializes non-blank controls into the analysis request body.
    ///
    /// Blank controls are omitted entirely. Numeric fields that fail to parse
    /// fall back to their string form; callers are expected to validate first.
    pub fn to_payload(&self, session_id: &SessionId, now: DateTime<Utc>) -> FormPayload {
        let mut fields = Map::new();

        for control in &self.controls {
            let value = control.trimmed();
            if value.is_empty() {
                continue;
            }

            let json = if is_numeric_field(&control.name) {
                parse_number(value)
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or_else(|| Value::String(value.to_string()))
            } else {
                Value::String(value.to_string())
            };
            fields.insert(control.name.clone(), json);
        }

        fields.insert(
            "session_id".to_string(),
            Value::String(session_id.as_str().to_string()),
        );
        fields.insert("timestamp".to_string(), Value::String(now.to_rfc3339()));
        fields.insert(
            "analysis_mode".to_string(),
            Value::String("ultra_detailed".to_string()),
        );
        fields.insert("strict_quality".to_string(), Value::Bool(true));

        FormPayload(fields)
    }
}

/// Serialized analysis request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormPayload(pub Map<String, Value>);

impl FormPayload {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }
}

fn check_segment(value: &str, mode: ValidationMode) -> Option<String> {
    if value.chars().count() < MIN_SEGMENT_LEN {
        return Some(format!(
            "Segment must have at least {MIN_SEGMENT_LEN} characters"
        ));
    }

    if mode == ValidationMode::Strict {
        let lower = value.to_lowercase();
        if let Some(term) = GENERIC_SEGMENT_TERMS
            .iter()
            .find(|term| lower.contains(*term))
        {
            return Some(format!(
                "Segment \"{value}\" looks like a placeholder (\"{term}\"); describe a real market"
            ));
        }
    }

    None
}

fn is_numeric_field(name: &str) -> bool {
    NUMERIC_FIELDS.contains(&name)
}

fn parse_number(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_form() -> FormInput {
        FormInput::default()
            .with(FormControl::new("segment", "Online fitness coaching").required())
            .with(FormControl::new("product", "Strength program"))
            .with(FormControl::new("price", "1234.5"))
            .with(FormControl::new("revenue_goal", " 50000 "))
            .with(FormControl::new("competitors", "   "))
    }

    #[test]
    fn test_valid_form_has_no_errors() {
        assert!(sample_form().validate(ValidationMode::Strict).is_empty());
    }

    #[test]
    fn test_every_blank_required_field_is_reported() {
        let form = FormInput::default()
            .with(FormControl::new("segment", "").required())
            .with(FormControl::new("product", "  ").required())
            .with(FormControl::new("audience", ""));

        let errors = form.validate(ValidationMode::Strict);
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["segment", "product"]);
        assert_eq!(errors[0].message, "Segment is required");
    }

    #[test]
    fn test_short_segment_is_rejected() {
        let form = FormInput::default().with(FormControl::new("segment", "ab").required());
        let errors = form.validate(ValidationMode::Basic);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "segment");
        assert!(errors[0].message.contains("at least 3"));
    }

    #[test]
    fn test_generic_segment_rejected_only_in_strict_mode() {
        for value in ["test", "Sample market", "exemplo de nicho", "TESTE"] {
            let form = FormInput::default().with(FormControl::new("segment", value));
            let errors = form.validate(ValidationMode::Strict);
            assert_eq!(errors.len(), 1, "expected rejection for {value}");
            assert_eq!(errors[0].field, "segment");

            assert!(form.validate(ValidationMode::Basic).is_empty());
        }
    }

    #[test]
    fn test_non_numeric_price_is_rejected() {
        let form = FormInput::default().with(FormControl::new("price", "cheap"));
        let errors = form.validate(ValidationMode::Strict);
        assert_eq!(errors[0].field, "price");
        assert_eq!(errors[0].message, "Price must be a number");
    }

    #[test]
    fn test_payload_coerces_numbers_and_omits_blanks() {
        let session = SessionId::from_raw("session_1_abc");
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let payload = sample_form().to_payload(&session, now);

        assert_eq!(payload.get("price"), Some(&serde_json::json!(1234.5)));
        assert!(payload.get("price").unwrap().is_number());
        assert_eq!(payload.get("revenue_goal"), Some(&serde_json::json!(50000.0)));
        assert_eq!(
            payload.get("product"),
            Some(&Value::String("Strength program".into()))
        );
        assert!(!payload.contains("competitors"));
        assert_eq!(
            payload.get("session_id"),
            Some(&Value::String("session_1_abc".into()))
        );
        assert_eq!(
            payload.get("timestamp"),
            Some(&Value::String("2024-05-01T12:00:00+00:00".into()))
        );
        assert_eq!(payload.get("strict_quality"), Some(&Value::Bool(true)));
    }
}
