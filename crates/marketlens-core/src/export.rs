//! Export eligibility and export file naming.

use chrono::NaiveDate;

use crate::analysis::AnalysisDocument;
use crate::format::date_stamp;
use crate::session::SessionId;

/// Minimum quality score for a PDF export.
pub const MIN_PDF_QUALITY_SCORE: f64 = 60.0;

/// Why a document can or cannot be exported as PDF.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PdfEligibility {
    Eligible,
    MissingQualityScore,
    LowQuality(f64),
    NotSimulationFree,
}

impl PdfEligibility {
    pub fn evaluate(document: &AnalysisDocument) -> Self {
        let Some(metadata) = document.metadata.as_ref() else {
            return Self::MissingQualityScore;
        };
        Self::from_parts(metadata.quality_score, metadata.simulation_free)
    }

    pub fn from_parts(quality_score: Option<f64>, simulation_free: Option<bool>) -> Self {
        match quality_score {
            None => Self::MissingQualityScore,
            Some(score) if score < MIN_PDF_QUALITY_SCORE => Self::LowQuality(score),
            Some(_) if simulation_free != Some(true) => Self::NotSimulationFree,
            Some(_) => Self::Eligible,
        }
    }

    pub fn is_eligible(self) -> bool {
        matches!(self, Self::Eligible)
    }

    pub fn reason(self) -> String {
        match self {
            Self::Eligible => "eligible".to_string(),
            Self::MissingQualityScore => "the analysis has no quality score".to_string(),
            Self::LowQuality(score) => format!(
                "quality score {score:.0} is below the minimum of {MIN_PDF_QUALITY_SCORE:.0}"
            ),
            Self::NotSimulationFree => {
                "the analysis is not certified free of simulated content".to_string()
            }
        }
    }
}

/// `analise_mercado_{YYYY-MM-DD}.pdf`
pub fn pdf_filename(date: NaiveDate) -> String {
    format!("analise_mercado_{}.pdf", date_stamp(date))
}

/// `analise_{session_id}_{YYYY-MM-DD}.json`
pub fn json_filename(session_id: &SessionId, date: NaiveDate) -> String {
    format!("analise_{}_{}.json", session_id, date_stamp(date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(score: serde_json::Value, simulation_free: bool) -> AnalysisDocument {
        AnalysisDocument::from_value(json!({
            "metadata": {"quality_score": score, "simulation_free": simulation_free}
        }))
    }

    #[test]
    fn test_pdf_gating() {
        assert_eq!(
            PdfEligibility::evaluate(&doc(json!(59), true)),
            PdfEligibility::LowQuality(59.0)
        );
        assert!(PdfEligibility::evaluate(&doc(json!(60), true)).is_eligible());
        assert_eq!(
            PdfEligibility::evaluate(&doc(json!(90), false)),
            PdfEligibility::NotSimulationFree
        );
    }

    #[test]
    fn test_missing_metadata_is_not_eligible() {
        let empty = AnalysisDocument::from_value(json!({"insights_exclusivos": ["A"]}));
        assert_eq!(
            PdfEligibility::evaluate(&empty),
            PdfEligibility::MissingQualityScore
        );
        assert_eq!(
            PdfEligibility::from_parts(Some(80.0), None),
            PdfEligibility::NotSimulationFree
        );
    }

    #[test]
    fn test_filenames() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(pdf_filename(date), "analise_mercado_2024-01-31.pdf");
        assert_eq!(
            json_filename(&SessionId::from_raw("session_1_ab"), date),
            "analise_session_1_ab_2024-01-31.json"
        );
    }
}
