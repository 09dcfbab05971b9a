//! Insights come in two shapes: plain strings or scored records.
//!
//! The shape is decided once, from the first element, when the payload is
//! received. Renderers match on [`Insight`] and never sniff JSON again.

use serde::Serialize;
use serde_json::{Map, Value};

use super::fields::{first_number, first_text, string_list};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Insight {
    Plain { text: String },
    Enriched(EnrichedInsight),
}

impl Insight {
    pub fn text(&self) -> &str {
        match self {
            Insight::Plain { text } => text,
            Insight::Enriched(insight) => &insight.text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedInsight {
    pub text: String,
    /// 0 to 10
    pub priority: f64,
    pub category: Option<String>,
    pub actionability: Option<f64>,
    pub estimated_impact: Option<String>,
    pub implementation: Vec<String>,
}

impl EnrichedInsight {
    pub fn tier(&self) -> PriorityTier {
        PriorityTier::from_priority(self.priority)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityTier {
    High,
    Medium,
    Low,
}

impl PriorityTier {
    pub fn from_priority(priority: f64) -> Self {
        if priority >= 8.0 {
            PriorityTier::High
        } else if priority >= 6.0 {
            PriorityTier::Medium
        } else {
            PriorityTier::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PriorityTier::High => "high",
            PriorityTier::Medium => "medium",
            PriorityTier::Low => "low",
        }
    }
}

const TEXT_KEYS: [&str; 4] = ["insight", "texto", "text", "descricao"];
const PRIORITY_KEYS: [&str; 2] = ["prioridade", "priority"];

/// Projects the raw insights list. Non-lists and empty lists yield an empty vector.
pub fn parse_insights(value: Option<&Value>) -> Vec<Insight> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };

    let enriched = items
        .first()
        .and_then(Value::as_object)
        .is_some_and(|first| PRIORITY_KEYS.iter().any(|k| first.contains_key(*k)));

    items
        .iter()
        .filter_map(|item| {
            if enriched {
                item.as_object().and_then(parse_enriched).map(Insight::Enriched)
            } else {
                plain_text(item).map(|text| Insight::Plain { text })
            }
        })
        .collect()
}

fn plain_text(item: &Value) -> Option<String> {
    match item {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Object(map) => first_text(map, &TEXT_KEYS),
        _ => None,
    }
}

fn parse_enriched(map: &Map<String, Value>) -> Option<EnrichedInsight> {
    let text = first_text(map, &TEXT_KEYS)?;
    let implementation = match map
        .get("implementacao")
        .or_else(|| map.get("implementation"))
    {
        Some(Value::Array(steps)) => string_list(steps),
        Some(Value::String(step)) if !step.trim().is_empty() => vec![step.trim().to_string()],
        _ => Vec::new(),
    };

    Some(EnrichedInsight {
        text,
        priority: first_number(map, &PRIORITY_KEYS)
            .unwrap_or(0.0)
            .clamp(0.0, 10.0),
        category: first_text(map, &["categoria", "category"]),
        actionability: first_number(map, &["acionabilidade", "actionability"]),
        estimated_impact: first_text(map, &["impacto_estimado", "estimated_impact"]),
        implementation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_strings() {
        let insights = parse_insights(Some(&json!(["A", "  ", "B"])));
        assert_eq!(
            insights,
            vec![
                Insight::Plain { text: "A".into() },
                Insight::Plain { text: "B".into() }
            ]
        );
    }

    #[test]
    fn test_enriched_records() {
        let value = json!([
            {"insight": "Raise prices", "prioridade": 9, "categoria": "pricing",
             "acionabilidade": 8.5, "implementacao": ["Test", "Roll out"]},
            {"insight": "Niche down", "prioridade": 7},
            {"insight": "Blog more", "prioridade": 3}
        ]);
        let insights = parse_insights(Some(&value));
        assert_eq!(insights.len(), 3);

        let tiers: Vec<PriorityTier> = insights
            .iter()
            .map(|i| match i {
                Insight::Enriched(e) => e.tier(),
                Insight::Plain { .. } => panic!("expected enriched"),
            })
            .collect();
        assert_eq!(
            tiers,
            vec![PriorityTier::High, PriorityTier::Medium, PriorityTier::Low]
        );

        let Insight::Enriched(first) = &insights[0] else {
            panic!("expected enriched");
        };
        assert_eq!(first.category.as_deref(), Some("pricing"));
        assert_eq!(first.actionability, Some(8.5));
        assert_eq!(first.implementation, vec!["Test", "Roll out"]);
    }

    #[test]
    fn test_tier_thresholds() {
        assert_eq!(PriorityTier::from_priority(8.0), PriorityTier::High);
        assert_eq!(PriorityTier::from_priority(7.9), PriorityTier::Medium);
        assert_eq!(PriorityTier::from_priority(6.0), PriorityTier::Medium);
        assert_eq!(PriorityTier::from_priority(5.9), PriorityTier::Low);
    }

    #[test]
    fn test_objects_without_priority_are_plain() {
        let insights = parse_insights(Some(&json!([{"insight": "Just text"}])));
        assert_eq!(insights, vec![Insight::Plain { text: "Just text".into() }]);
    }

    #[test]
    fn test_non_lists_are_empty() {
        assert!(parse_insights(None).is_empty());
        assert!(parse_insights(Some(&json!("A"))).is_empty());
        assert!(parse_insights(Some(&json!({"a": 1}))).is_empty());
        assert!(parse_insights(Some(&json!([]))).is_empty());
    }
}
