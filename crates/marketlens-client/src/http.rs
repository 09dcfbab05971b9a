//! HttpAnalysisApi - reqwest implementation of [`AnalysisApi`].

use async_trait::async_trait;
use marketlens_core::form::FormPayload;
use marketlens_core::progress::{ProgressEnvelope, ProgressState};
use marketlens_core::report::{ReportDescriptor, ReportListing, ReportType};
use marketlens_core::upload::UploadResponse;
use marketlens_core::{LensError, Result, SessionId};
use reqwest::{Client, Response, multipart};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::api::{AnalysisApi, AnalyzeOutcome, classify_analyze_response, server_message};
use crate::config::ClientConfig;

/// Talks to the analysis backend over HTTP.
#[derive(Clone)]
pub struct HttpAnalysisApi {
    client: Client,
    base_url: String,
}

impl HttpAnalysisApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.normalized_base_url())
    }

    /// Replaces the underlying reqwest client (custom TLS, proxies).
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|err| transport_error(path, err))?;
        let response = ensure_success(response).await?;
        response
            .json()
            .await
            .map_err(|err| decode_error(path, err))
    }

    async fn bytes_of(&self, path: &str, response: Response) -> Result<Vec<u8>> {
        let response = ensure_success(response).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|err| transport_error(path, err))?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl AnalysisApi for HttpAnalysisApi {
    async fn analyze(&self, payload: &FormPayload) -> Result<AnalyzeOutcome> {
        let path = "/api/analyze";
        tracing::info!(
            target: "marketlens::client",
            "[Analyze] Submitting analysis request ({} fields)",
            payload.0.len()
        );

        let response = self
            .client
            .post(self.url(path))
            .json(payload)
            .send()
            .await
            .map_err(|err| transport_error(path, err))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| transport_error(path, err))?;

        Ok(classify_analyze_response(status, &body))
    }

    async fn start_tracking(&self, session_id: &SessionId) -> Result<()> {
        let path = "/api/start_tracking";
        let response = self
            .client
            .post(self.url(path))
            .json(&json!({ "session_id": session_id }))
            .send()
            .await
            .map_err(|err| transport_error(path, err))?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn get_progress(&self, session_id: &SessionId) -> Result<Option<ProgressState>> {
        let envelope: ProgressEnvelope = self
            .get_json(&format!("/api/get_progress/{}", session_id))
            .await?;
        Ok(envelope.progress)
    }

    async fn list_reports(&self, session_id: &SessionId) -> Result<Vec<ReportDescriptor>> {
        let listing: ReportListing = self
            .get_json(&format!("/api/list_consolidated_reports/{}", session_id))
            .await?;
        Ok(listing.reports)
    }

    async fn download_report(
        &self,
        report_type: &ReportType,
        session_id: &SessionId,
    ) -> Result<Vec<u8>> {
        let path = report_path(report_type, session_id);
        let response = self
            .client
            .get(self.url(&path))
            .send()
            .await
            .map_err(|err| transport_error(&path, err))?;
        self.bytes_of(&path, response).await
    }

    async fn generate_pdf(&self, analysis: &Value) -> Result<Vec<u8>> {
        let path = "/api/generate_pdf";
        let response = self
            .client
            .post(self.url(path))
            .json(analysis)
            .send()
            .await
            .map_err(|err| transport_error(path, err))?;
        self.bytes_of(path, response).await
    }

    async fn health(&self) -> Result<Value> {
        self.get_json("/api/health").await
    }

    async fn app_status(&self) -> Result<Value> {
        self.get_json("/api/app_status").await
    }

    async fn upload_attachment(
        &self,
        session_id: &SessionId,
        filename: &str,
        mime_type: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadResponse> {
        let path = "/api/upload_attachment";
        let part = multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(mime_type)
            .map_err(|err| LensError::internal(format!("Invalid MIME type {mime_type}: {err}")))?;
        let form = multipart::Form::new()
            .text("session_id", session_id.to_string())
            .part("file", part);

        let response = self
            .client
            .post(self.url(path))
            .multipart(form)
            .send()
            .await
            .map_err(|err| transport_error(path, err))?;
        let response = ensure_success(response).await?;
        response
            .json()
            .await
            .map_err(|err| decode_error(path, err))
    }

    fn report_url(&self, report_type: &ReportType, session_id: &SessionId) -> String {
        self.url(&report_path(report_type, session_id))
    }
}

/// Report path with both segments percent-encoded; `Other` types carry arbitrary text.
fn report_path(report_type: &ReportType, session_id: &SessionId) -> String {
    format!(
        "/api/download_consolidated_report/{}/{}",
        urlencoding::encode(report_type.as_str()),
        urlencoding::encode(session_id.as_str())
    )
}

/// Turns a non-success response into [`LensError::Http`] with the server's message.
async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Failed to read error body".to_string());
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .as_ref()
        .and_then(server_message)
        .unwrap_or(body);
    Err(LensError::http(status.as_u16(), message))
}

fn transport_error(path: &str, err: reqwest::Error) -> LensError {
    LensError::transport(format!("{path}: {err}"))
}

fn decode_error(path: &str, err: reqwest::Error) -> LensError {
    LensError::Serialization {
        format: "JSON".to_string(),
        message: format!("{path}: {err}"),
    }
}
