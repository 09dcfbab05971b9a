//! The backend contract, as seen from the front-end.

use async_trait::async_trait;
use marketlens_core::form::FormPayload;
use marketlens_core::progress::ProgressState;
use marketlens_core::report::{ReportDescriptor, ReportType};
use marketlens_core::upload::UploadResponse;
use marketlens_core::{Result, SessionId};
use serde_json::Value;

/// Generic banner text when the server gave no usable message.
pub const GENERIC_FAILURE_MESSAGE: &str = "Analysis failed. Please try again.";

/// How a finished `/api/analyze` call should be presented.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalyzeOutcome {
    /// Full result document
    Complete(Value),
    /// The run failed but the server preserved a renderable subset
    Partial { message: String, data: Value },
    /// Hard failure, nothing to render
    Failed { status: u16, message: String },
}

/// Every endpoint the front-end consumes.
#[async_trait]
pub trait AnalysisApi: Send + Sync {
    /// POST `/api/analyze`. Transport failures are `Err`; HTTP failures are
    /// classified into [`AnalyzeOutcome`].
    async fn analyze(&self, payload: &FormPayload) -> Result<AnalyzeOutcome>;

    /// POST `/api/start_tracking`
    async fn start_tracking(&self, session_id: &SessionId) -> Result<()>;

    /// GET `/api/get_progress/:session_id`
    async fn get_progress(&self, session_id: &SessionId) -> Result<Option<ProgressState>>;

    /// GET `/api/list_consolidated_reports/:session_id`
    async fn list_reports(&self, session_id: &SessionId) -> Result<Vec<ReportDescriptor>>;

    /// GET `/api/download_consolidated_report/:type/:session_id`
    async fn download_report(
        &self,
        report_type: &ReportType,
        session_id: &SessionId,
    ) -> Result<Vec<u8>>;

    /// POST `/api/generate_pdf`
    async fn generate_pdf(&self, analysis: &Value) -> Result<Vec<u8>>;

    /// GET `/api/health`
    async fn health(&self) -> Result<Value>;

    /// GET `/api/app_status`
    async fn app_status(&self) -> Result<Value>;

    /// POST `/api/upload_attachment` (multipart)
    async fn upload_attachment(
        &self,
        session_id: &SessionId,
        filename: &str,
        mime_type: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadResponse>;

    /// Absolute URL of a consolidated report, used to open it in a viewer.
    fn report_url(&self, report_type: &ReportType, session_id: &SessionId) -> String;
}

/// Classifies an `/api/analyze` response.
///
/// A non-success body carrying `dados_preservados: true` or a `dados_parciais`
/// block is a soft failure: the preserved data (`relatorio_parcial`,
/// `dados_parciais`, or the body itself) is rendered with a warning.
pub fn classify_analyze_response(status: u16, body: &str) -> AnalyzeOutcome {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let is_success = (200..300).contains(&status);

    let Some(json) = parsed else {
        return AnalyzeOutcome::Failed {
            status,
            message: if is_success {
                "The server returned an unreadable analysis document".to_string()
            } else {
                non_empty(body).unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string())
            },
        };
    };

    let has_error = json.get("error").is_some();
    if is_success && !has_error {
        return AnalyzeOutcome::Complete(json);
    }

    let message = server_message(&json).unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string());

    let preserved = json.get("dados_preservados").and_then(Value::as_bool) == Some(true);
    let partial = json
        .get("relatorio_parcial")
        .or_else(|| json.get("dados_parciais"))
        .filter(|v| !v.is_null())
        .cloned();

    match (preserved, partial) {
        (_, Some(data)) => AnalyzeOutcome::Partial { message, data },
        (true, None) => AnalyzeOutcome::Partial {
            message,
            data: json,
        },
        (false, None) => AnalyzeOutcome::Failed { status, message },
    }
}

/// `message`, then `error`, from an error body.
pub fn server_message(json: &Value) -> Option<String> {
    ["message", "error"]
        .iter()
        .filter_map(|key| json.get(*key).and_then(Value::as_str))
        .find_map(non_empty)
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
