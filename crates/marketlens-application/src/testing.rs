//! In-memory [`AnalysisApi`] used by the controller and export tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use marketlens_client::{AnalysisApi, AnalyzeOutcome};
use marketlens_core::form::FormPayload;
use marketlens_core::progress::ProgressState;
use marketlens_core::report::{ReportDescriptor, ReportType};
use marketlens_core::upload::UploadResponse;
use marketlens_core::{LensError, Result, SessionId};
use serde_json::{Value, json};

pub struct FakeApi {
    pub analyze_result: Result<AnalyzeOutcome>,
    pub analyze_delay: Duration,
    pub tracking_fails: bool,
    pub progress: Mutex<VecDeque<Result<ProgressState>>>,
    pub reports: Result<Vec<ReportDescriptor>>,
    pub report_bytes: Result<Vec<u8>>,
    pub pdf_bytes: Result<Vec<u8>>,
    pub app_status: Result<Value>,
    pub health: Result<Value>,
    pub upload: Result<UploadResponse>,

    pub analyze_calls: AtomicUsize,
    pub tracking_calls: AtomicUsize,
    pub progress_calls: AtomicUsize,
    pub pdf_calls: AtomicUsize,
    pub last_payload: Mutex<Option<FormPayload>>,
    pub last_upload: Mutex<Option<(String, String, usize)>>,
}

impl Default for FakeApi {
    fn default() -> Self {
        Self {
            analyze_result: Ok(AnalyzeOutcome::Complete(json!({}))),
            analyze_delay: Duration::ZERO,
            tracking_fails: false,
            progress: Mutex::new(VecDeque::new()),
            reports: Ok(Vec::new()),
            report_bytes: Ok(b"# Report".to_vec()),
            pdf_bytes: Ok(b"%PDF-1.4".to_vec()),
            app_status: Ok(json!({})),
            health: Ok(json!({"status": "healthy"})),
            upload: Ok(UploadResponse {
                success: true,
                ..UploadResponse::default()
            }),
            analyze_calls: AtomicUsize::new(0),
            tracking_calls: AtomicUsize::new(0),
            progress_calls: AtomicUsize::new(0),
            pdf_calls: AtomicUsize::new(0),
            last_payload: Mutex::new(None),
            last_upload: Mutex::new(None),
        }
    }
}

impl FakeApi {
    pub fn with_analysis(mut self, result: Result<AnalyzeOutcome>) -> Self {
        self.analyze_result = result;
        self
    }

    pub fn with_analyze_delay(mut self, delay: Duration) -> Self {
        self.analyze_delay = delay;
        self
    }

    pub fn with_progress(self, states: Vec<ProgressState>) -> Self {
        self.with_progress_results(states.into_iter().map(Ok).collect())
    }

    /// Scripted `get_progress` answers, errors included.
    pub fn with_progress_results(self, results: Vec<Result<ProgressState>>) -> Self {
        *self.progress.lock().unwrap() = results.into();
        self
    }

    pub fn with_tracking_failure(mut self) -> Self {
        self.tracking_fails = true;
        self
    }

    pub fn with_reports(mut self, reports: Result<Vec<ReportDescriptor>>) -> Self {
        self.reports = reports;
        self
    }

    pub fn with_report_bytes(mut self, bytes: Result<Vec<u8>>) -> Self {
        self.report_bytes = bytes;
        self
    }

    pub fn with_status(mut self, app_status: Result<Value>, health: Result<Value>) -> Self {
        self.app_status = app_status;
        self.health = health;
        self
    }

    pub fn with_upload(mut self, upload: Result<UploadResponse>) -> Self {
        self.upload = upload;
        self
    }
}

#[async_trait]
impl AnalysisApi for FakeApi {
    async fn analyze(&self, payload: &FormPayload) -> Result<AnalyzeOutcome> {
        self.analyze_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_payload.lock().unwrap() = Some(payload.clone());
        if !self.analyze_delay.is_zero() {
            tokio::time::sleep(self.analyze_delay).await;
        }
        self.analyze_result.clone()
    }

    async fn start_tracking(&self, _session_id: &SessionId) -> Result<()> {
        self.tracking_calls.fetch_add(1, Ordering::SeqCst);
        if self.tracking_fails {
            return Err(LensError::http(404, "Tracking not available"));
        }
        Ok(())
    }

    async fn get_progress(&self, _session_id: &SessionId) -> Result<Option<ProgressState>> {
        self.progress_calls.fetch_add(1, Ordering::SeqCst);
        self.progress.lock().unwrap().pop_front().transpose()
    }

    async fn list_reports(&self, _session_id: &SessionId) -> Result<Vec<ReportDescriptor>> {
        self.reports.clone()
    }

    async fn download_report(
        &self,
        _report_type: &ReportType,
        _session_id: &SessionId,
    ) -> Result<Vec<u8>> {
        self.report_bytes.clone()
    }

    async fn generate_pdf(&self, _analysis: &Value) -> Result<Vec<u8>> {
        self.pdf_calls.fetch_add(1, Ordering::SeqCst);
        self.pdf_bytes.clone()
    }

    async fn health(&self) -> Result<Value> {
        self.health.clone()
    }

    async fn app_status(&self) -> Result<Value> {
        self.app_status.clone()
    }

    async fn upload_attachment(
        &self,
        _session_id: &SessionId,
        filename: &str,
        mime_type: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadResponse> {
        *self.last_upload.lock().unwrap() =
            Some((filename.to_string(), mime_type.to_string(), bytes.len()));
        self.upload.clone()
    }

    fn report_url(&self, report_type: &ReportType, session_id: &SessionId) -> String {
        format!(
            "http://backend.test/api/download_consolidated_report/{}/{}",
            report_type, session_id
        )
    }
}
