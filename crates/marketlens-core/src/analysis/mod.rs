//! Typed projection of the analysis result document.
//!
//! The backend returns a large JSON document in which no section is
//! guaranteed. [`AnalysisDocument::from_value`] walks it once and keeps only
//! sections that can actually be rendered; the raw value is retained for the
//! JSON and PDF exports.

pub mod fields;
pub mod insight;

use serde::Serialize;
use serde_json::{Map, Value};

pub use fields::{Field, FieldValue, Fields, boolean_label};
pub use insight::{EnrichedInsight, Insight, PriorityTier};

use fields::{first_number, first_text, string_list};

/// Keys of the advanced components shown in the "innovative" panel.
pub const INNOVATIVE_COMPONENT_KEYS: [&str; 4] = [
    "provas_visuais_inovadoras",
    "sistema_anti_objecao_avancado",
    "pre_pitch_revolucionario",
    "predicoes_futuro_completas",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisDocument {
    #[serde(skip)]
    pub raw: Value,
    pub avatar: Option<AvatarProfile>,
    pub positioning: Option<Fields>,
    pub insights: Vec<Insight>,
    pub metrics: Option<PerformanceMetrics>,
    pub drivers: Vec<MentalDriver>,
    pub metadata: Option<AnalysisMetadata>,
    pub innovative: Vec<InnovativeComponent>,
}

impl AnalysisDocument {
    pub fn from_value(raw: Value) -> Self {
        let empty = Map::new();
        let root = raw.as_object().unwrap_or(&empty);

        let avatar = root
            .get("avatar_ultra_detalhado")
            .and_then(Value::as_object)
            .and_then(AvatarProfile::from_map);
        let positioning = Fields::from_value(root.get("escopo"));
        let insights = insight::parse_insights(root.get("insights_exclusivos"));
        let metrics = root
            .get("metricas_performance_detalhadas")
            .and_then(Value::as_object)
            .and_then(PerformanceMetrics::from_map);
        let drivers = parse_drivers(root.get("drivers_mentais_customizados"));
        let metadata = root
            .get("metadata")
            .and_then(Value::as_object)
            .and_then(AnalysisMetadata::from_map);
        let innovative = INNOVATIVE_COMPONENT_KEYS
            .iter()
            .filter_map(|key| InnovativeComponent::from_value(key, root.get(*key)))
            .collect();

        Self {
            avatar,
            positioning,
            insights,
            metrics,
            drivers,
            metadata,
            innovative,
            raw,
        }
    }

    /// True when nothing in the document can be rendered.
    pub fn is_empty(&self) -> bool {
        self.avatar.is_none()
            && self.positioning.is_none()
            && self.insights.is_empty()
            && self.metrics.is_none()
            && self.drivers.is_empty()
            && self.metadata.is_none()
            && self.innovative.is_empty()
    }
}

// ============================================================================
// Avatar
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvatarProfile {
    pub demographic: Option<Fields>,
    pub psychographic: Option<Fields>,
    pub pains: Vec<String>,
    pub desires: Vec<String>,
}

impl AvatarProfile {
    fn from_map(map: &Map<String, Value>) -> Option<Self> {
        let profile = Self {
            demographic: Fields::from_value(map.get("perfil_demografico")),
            psychographic: Fields::from_value(map.get("perfil_psicografico")),
            pains: list_at(map, "dores_viscerais"),
            desires: list_at(map, "desejos_secretos"),
        };

        let has_content = profile.demographic.is_some()
            || profile.psychographic.is_some()
            || !profile.pains.is_empty()
            || !profile.desires.is_empty();
        has_content.then_some(profile)
    }
}

fn list_at(map: &Map<String, Value>, key: &str) -> Vec<String> {
    map.get(key)
        .and_then(Value::as_array)
        .map(|items| string_list(items))
        .unwrap_or_default()
}

// ============================================================================
// Metrics
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceMetrics {
    pub kpis: Vec<Kpi>,
    pub scenarios: Vec<FinancialScenario>,
    pub expected_roi: Option<String>,
}

impl PerformanceMetrics {
    fn from_map(map: &Map<String, Value>) -> Option<Self> {
        let kpis = map
            .get("kpis_principais")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Kpi::from_value).collect())
            .unwrap_or_default();

        let scenarios = map
            .get("projecoes_financeiras")
            .and_then(Value::as_object)
            .map(|projections| {
                ScenarioKind::ALL
                    .iter()
                    .filter_map(|kind| {
                        Fields::from_value(projections.get(kind.key())).map(|fields| {
                            FinancialScenario {
                                kind: *kind,
                                fields,
                            }
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        let metrics = Self {
            kpis,
            scenarios,
            expected_roi: first_text(map, &["roi_esperado"]),
        };
        let has_content = !metrics.kpis.is_empty()
            || !metrics.scenarios.is_empty()
            || metrics.expected_roi.is_some();
        has_content.then_some(metrics)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpi {
    pub name: String,
    pub details: Fields,
}

impl Kpi {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(name) if !name.trim().is_empty() => Some(Self {
                name: name.trim().to_string(),
                details: Fields::default(),
            }),
            Value::Object(map) => Some(Self {
                name: first_text(map, &["metrica", "metric", "nome", "name"])?,
                details: Fields::from_map(map, &["metrica", "metric", "nome", "name"]),
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    Conservative,
    Realistic,
    Optimistic,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 3] = [
        ScenarioKind::Conservative,
        ScenarioKind::Realistic,
        ScenarioKind::Optimistic,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ScenarioKind::Conservative => "cenario_conservador",
            ScenarioKind::Realistic => "cenario_realista",
            ScenarioKind::Optimistic => "cenario_otimista",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ScenarioKind::Conservative => "Conservative",
            ScenarioKind::Realistic => "Realistic",
            ScenarioKind::Optimistic => "Optimistic",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialScenario {
    pub kind: ScenarioKind,
    pub fields: Fields,
}

// ============================================================================
// Mental drivers
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MentalDriver {
    pub name: String,
    pub details: Fields,
}

const DRIVER_NAME_KEYS: [&str; 3] = ["nome", "name", "driver"];

/// Drivers arrive either as a bare list or wrapped in `{"drivers_customizados": [...]}`.
fn parse_drivers(value: Option<&Value>) -> Vec<MentalDriver> {
    let items = match value {
        Some(Value::Array(items)) => items,
        Some(Value::Object(map)) => match map.get("drivers_customizados") {
            Some(Value::Array(items)) => items,
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };

    items
        .iter()
        .filter_map(|item| match item {
            Value::Object(map) => Some(MentalDriver {
                name: first_text(map, &DRIVER_NAME_KEYS)?,
                details: Fields::from_map(map, &DRIVER_NAME_KEYS),
            }),
            Value::String(name) if !name.trim().is_empty() => Some(MentalDriver {
                name: name.trim().to_string(),
                details: Fields::default(),
            }),
            _ => None,
        })
        .collect()
}

// ============================================================================
// Metadata
// ============================================================================

const SUCCEEDED_KEYS: [&str; 2] = ["successful_components", "componentes_sucesso"];
const FAILED_KEYS: [&str; 2] = ["failed_components", "componentes_falharam"];
const SIMULATION_FREE_KEYS: [&str; 3] = [
    "simulation_free",
    "simulation_free_guarantee",
    "simulation_free_certified",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisMetadata {
    pub quality_score: Option<f64>,
    pub simulation_free: Option<bool>,
    pub succeeded_components: Vec<String>,
    pub failed_components: Vec<String>,
    pub fields: Fields,
}

impl AnalysisMetadata {
    fn from_map(map: &Map<String, Value>) -> Option<Self> {
        let component_list = |keys: &[&str]| {
            keys.iter()
                .filter_map(|key| map.get(*key).and_then(Value::as_array))
                .map(|items| string_list(items))
                .next()
                .unwrap_or_default()
        };

        let excluded: Vec<&str> = SUCCEEDED_KEYS
            .iter()
            .chain(FAILED_KEYS.iter())
            .copied()
            .collect();

        let metadata = Self {
            quality_score: first_number(map, &["quality_score"]),
            simulation_free: SIMULATION_FREE_KEYS
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_bool)),
            succeeded_components: component_list(&SUCCEEDED_KEYS[..]),
            failed_components: component_list(&FAILED_KEYS[..]),
            fields: Fields::from_map(map, &excluded),
        };

        let has_content = !metadata.fields.is_empty()
            || !metadata.succeeded_components.is_empty()
            || !metadata.failed_components.is_empty();
        has_content.then_some(metadata)
    }
}

// ============================================================================
// Innovative components
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InnovativeComponent {
    pub key: String,
    pub title: String,
    pub fields: Fields,
}

impl InnovativeComponent {
    fn from_value(key: &str, value: Option<&Value>) -> Option<Self> {
        let fields = match value? {
            Value::Array(items) => {
                let items = string_list(items);
                if items.is_empty() {
                    return None;
                }
                Fields(vec![Field {
                    key: key.to_string(),
                    label: "Items".to_string(),
                    value: FieldValue::List(items),
                }])
            }
            other => Fields::from_value(Some(other))?,
        };
        Some(Self {
            key: key.to_string(),
            title: crate::format::title_case(key),
            fields,
        })
    }
}
