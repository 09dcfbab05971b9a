//! Form & progress controller.
//!
//! `AnalysisController` is the application context: it owns the session id,
//! the loaded analysis, the uploaded attachments and the single progress task,
//! and it is the only writer of the shared [`Page`] besides that task.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use marketlens_client::{AnalysisApi, AnalyzeOutcome, ClientConfig, GENERIC_FAILURE_MESSAGE};
use marketlens_core::analysis::AnalysisDocument;
use marketlens_core::banner::BannerKind;
use marketlens_core::form::FormInput;
use marketlens_core::format::today;
use marketlens_core::report::{ReportDescriptor, ReportType};
use marketlens_core::status::CapabilityStatus;
use marketlens_core::upload::{UploadedFile, infer_mime_type};
use marketlens_core::{FieldError, LensError, Result, SessionId, SessionPolicy};
use marketlens_render::{Page, paint_analysis, paint_reports, paint_status, paint_uploads};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::download::{DownloadSink, Viewer};
use crate::export::ExportService;
use crate::polling::{PollingTask, ProgressStrategy};

/// How a submission ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Validation failed; nothing was sent
    Invalid(Vec<FieldError>),
    /// Full result rendered
    Completed,
    /// Preserved partial data rendered with a warning
    Partial { message: String },
    /// Nothing rendered
    Failed { message: String },
}

/// The loaded result: the raw document for exports plus its typed projection.
#[derive(Debug, Clone)]
pub struct LoadedAnalysis {
    pub raw: Value,
    pub document: AnalysisDocument,
}

impl LoadedAnalysis {
    fn new(raw: Value) -> Self {
        Self {
            document: AnalysisDocument::from_value(raw.clone()),
            raw,
        }
    }
}

pub struct AnalysisController {
    api: Arc<dyn AnalysisApi>,
    config: ClientConfig,
    page: Arc<Mutex<Page>>,
    exports: ExportService,
    session_id: SessionId,
    analysis: Option<LoadedAnalysis>,
    polling: Option<PollingTask>,
    uploads: Vec<UploadedFile>,
}

impl AnalysisController {
    pub fn new(
        api: Arc<dyn AnalysisApi>,
        config: ClientConfig,
        sink: Arc<dyn DownloadSink>,
        viewer: Arc<dyn Viewer>,
    ) -> Self {
        let session_id = SessionId::generate();
        tracing::info!(target: "marketlens::controller", "[Controller] Session {}", session_id);
        Self {
            exports: ExportService::new(api.clone(), sink, viewer),
            api,
            config,
            page: Arc::new(Mutex::new(Page::new())),
            session_id,
            analysis: None,
            polling: None,
            uploads: Vec::new(),
        }
    }

    /// Uses an existing session id instead of minting one.
    pub fn with_session(mut self, session_id: SessionId) -> Self {
        self.session_id = session_id;
        self
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn page(&self) -> Arc<Mutex<Page>> {
        Arc::clone(&self.page)
    }

    pub fn analysis(&self) -> Option<&LoadedAnalysis> {
        self.analysis.as_ref()
    }

    pub fn uploads(&self) -> &[UploadedFile] {
        &self.uploads
    }

    pub fn exports(&self) -> &ExportService {
        &self.exports
    }

    pub fn is_polling(&self) -> bool {
        self.polling.as_ref().is_some_and(PollingTask::is_active)
    }

    pub fn progress_strategy(&self) -> Option<ProgressStrategy> {
        self.polling.as_ref().map(PollingTask::strategy)
    }

    // ============================================================================
    // Submission
    // ============================================================================

    /// Validates, submits and renders one analysis request.
    pub async fn submit(&mut self, form: &FormInput) -> Result<SubmitOutcome> {
        let errors = form.validate(self.config.validation);
        if !errors.is_empty() {
            tracing::warn!(
                target: "marketlens::controller",
                "[Submit] {} invalid field(s), not submitting",
                errors.len()
            );
            self.page.lock().await.set_field_errors(errors.clone());
            return Ok(SubmitOutcome::Invalid(errors));
        }

        if self.config.session_policy == SessionPolicy::PerSubmission {
            self.session_id = SessionId::generate();
        }
        let payload = form.to_payload(&self.session_id, Utc::now());

        {
            let mut page = self.page.lock().await;
            page.clear_field_errors();
            page.begin_submission();
            page.show_progress();
        }

        self.start_progress().await;
        let outcome = self.api.analyze(&payload).await;
        self.stop_polling();

        let result = self.complete(outcome).await;
        self.page.lock().await.end_submission();
        Ok(result)
    }

    async fn start_progress(&mut self) {
        self.stop_polling();

        let task = match self.api.start_tracking(&self.session_id).await {
            Ok(()) => PollingTask::server(
                Arc::clone(&self.api),
                self.session_id.clone(),
                Arc::clone(&self.page),
                self.config.poll_interval(),
            ),
            Err(e) => {
                tracing::warn!(
                    target: "marketlens::controller",
                    "[Progress] Tracking unavailable ({}), using local steps",
                    e
                );
                PollingTask::local(Arc::clone(&self.page), self.config.local_step_interval())
            }
        };
        self.polling = Some(task);
    }

    fn stop_polling(&mut self) {
        if let Some(task) = self.polling.take() {
            task.stop();
        }
    }

    async fn complete(&mut self, outcome: Result<AnalyzeOutcome>) -> SubmitOutcome {
        match outcome {
            Ok(AnalyzeOutcome::Complete(raw)) => {
                self.load(raw).await;
                self.page
                    .lock()
                    .await
                    .show_banner(BannerKind::Success, "Analysis completed successfully!");
                tracing::info!(target: "marketlens::controller", "[Submit] Analysis complete");
                self.refresh_reports().await;
                SubmitOutcome::Completed
            }
            Ok(AnalyzeOutcome::Partial { message, data }) => {
                tracing::warn!(
                    target: "marketlens::controller",
                    "[Submit] Partial result preserved: {}",
                    message
                );
                self.load(data).await;
                self.page.lock().await.show_banner(
                    BannerKind::Warning,
                    format!("Analysis incomplete: {message}. Partial data was preserved."),
                );
                SubmitOutcome::Partial { message }
            }
            Ok(AnalyzeOutcome::Failed { status, message }) => {
                tracing::error!(
                    target: "marketlens::controller",
                    "[Submit] Analysis failed with HTTP {}: {}",
                    status,
                    message
                );
                self.fail(message).await
            }
            Err(e) => {
                tracing::error!(target: "marketlens::controller", "[Submit] Request failed: {}", e);
                self.fail(GENERIC_FAILURE_MESSAGE.to_string()).await
            }
        }
    }

    async fn load(&mut self, raw: Value) {
        let loaded = LoadedAnalysis::new(raw);
        {
            let mut page = self.page.lock().await;
            page.hide_progress();
            paint_analysis(&mut page, &loaded.document);
        }
        self.analysis = Some(loaded);
    }

    async fn fail(&mut self, message: String) -> SubmitOutcome {
        let mut page = self.page.lock().await;
        page.hide_progress();
        page.show_banner(BannerKind::Error, message.clone());
        SubmitOutcome::Failed { message }
    }

    /// Stops progress, clears the loaded analysis, the results and the banner.
    pub async fn reset(&mut self) {
        self.stop_polling();
        self.analysis = None;

        let mut page = self.page.lock().await;
        page.clear_results();
        page.hide_results();
        page.hide_progress();
        page.dismiss_banner();
        page.clear_field_errors();
        page.end_submission();
    }

    // ============================================================================
    // Capabilities & attachments
    // ============================================================================

    /// Reflects provider availability and backend health in the status panel.
    ///
    /// Advisory only: failures are logged and never block submission.
    pub async fn check_capabilities(&self) -> CapabilityStatus {
        let mut status = match self.api.app_status().await {
            Ok(value) => CapabilityStatus::from_app_status(&value),
            Err(e) => {
                tracing::warn!(target: "marketlens::controller", "[Status] App status unavailable: {}", e);
                CapabilityStatus::from_app_status(&Value::Null)
            }
        };

        match self.api.health().await {
            Ok(health) => status = status.with_health(&health),
            Err(e) => {
                tracing::warn!(target: "marketlens::controller", "[Status] Health check failed: {}", e)
            }
        }

        paint_status(&mut *self.page.lock().await, &status);
        status
    }

    /// Uploads an attachment for the current session.
    pub async fn upload_attachment(&mut self, name: &str, bytes: Vec<u8>) -> Result<UploadedFile> {
        let size = bytes.len() as u64;
        let mime_type = infer_mime_type(name);

        let response = self
            .api
            .upload_attachment(&self.session_id, name, &mime_type, bytes)
            .await
            .and_then(|response| {
                if response.success {
                    Ok(response)
                } else {
                    Err(LensError::http(
                        400,
                        response
                            .error
                            .or(response.message)
                            .unwrap_or_else(|| "Upload failed".to_string()),
                    ))
                }
            });

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(target: "marketlens::controller", "[Upload] {} failed: {}", name, e);
                self.page
                    .lock()
                    .await
                    .show_banner(BannerKind::Error, format!("Upload failed: {}", e.user_message()));
                return Err(e);
            }
        };

        let file = UploadedFile {
            name: response.filename.unwrap_or_else(|| name.to_string()),
            size: response.size.unwrap_or(size),
            mime_type,
        };
        self.uploads.push(file.clone());

        let mut page = self.page.lock().await;
        paint_uploads(&mut page, &self.uploads);
        page.show_banner(BannerKind::Success, format!("{} uploaded", file.name));
        Ok(file)
    }

    // ============================================================================
    // Reports & export
    // ============================================================================

    /// Re-renders the consolidated report catalog. Best effort.
    pub async fn refresh_reports(&self) -> Vec<ReportDescriptor> {
        match self.exports.list_reports(&self.session_id).await {
            Ok(reports) => {
                paint_reports(&mut *self.page.lock().await, &reports);
                reports
            }
            Err(e) => {
                tracing::warn!(
                    target: "marketlens::controller",
                    "[Reports] Could not list reports: {}",
                    e
                );
                Vec::new()
            }
        }
    }

    pub async fn download_report(&self, report_type: &ReportType) -> Result<PathBuf> {
        let result = self
            .exports
            .download_report(report_type, &self.session_id, today())
            .await;
        self.report_result(&result, format!("{} downloaded", report_type.title()))
            .await;
        result
    }

    pub async fn view_report(&self, report_type: &ReportType) -> Result<bool> {
        let result = self.exports.view_report(report_type, &self.session_id);
        if let Err(e) = &result {
            self.page
                .lock()
                .await
                .show_banner(BannerKind::Error, e.user_message());
        }
        result
    }

    pub async fn export_pdf(&self) -> Result<PathBuf> {
        let Some(loaded) = self.analysis.as_ref() else {
            self.no_analysis_banner().await;
            return Err(LensError::NoAnalysis);
        };
        let result = self
            .exports
            .export_pdf(&loaded.raw, &loaded.document, today())
            .await;
        self.report_result(&result, "PDF exported".to_string()).await;
        result
    }

    pub async fn save_json(&self) -> Result<PathBuf> {
        let Some(loaded) = self.analysis.as_ref() else {
            self.no_analysis_banner().await;
            return Err(LensError::NoAnalysis);
        };
        let result = self
            .exports
            .save_json(&loaded.raw, &self.session_id, today())
            .await;
        self.report_result(&result, "Analysis saved as JSON".to_string())
            .await;
        result
    }

    async fn no_analysis_banner(&self) {
        self.page
            .lock()
            .await
            .show_banner(BannerKind::Error, "No analysis to export");
    }

    async fn report_result(&self, result: &Result<PathBuf>, success: String) {
        let mut page = self.page.lock().await;
        match result {
            Ok(_) => page.show_banner(BannerKind::Success, success),
            Err(LensError::NotEligible(reason)) => page.show_banner(
                BannerKind::Warning,
                format!("PDF export unavailable: {reason}"),
            ),
            Err(e) => page.show_banner(BannerKind::Error, e.user_message()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::tests::{MemorySink, RecordingViewer};
    use crate::testing::FakeApi;
    use marketlens_core::form::FormControl;
    use marketlens_core::progress::ProgressState;
    use marketlens_core::upload::UploadResponse;
    use marketlens_render::ContainerId;
    use serde_json::json;
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    fn fast_config() -> ClientConfig {
        ClientConfig {
            poll_interval_ms: 5,
            local_step_interval_ms: 5,
            ..ClientConfig::default()
        }
    }

    fn controller(api: Arc<FakeApi>) -> (AnalysisController, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::default());
        let controller = AnalysisController::new(
            api,
            fast_config(),
            sink.clone(),
            Arc::new(RecordingViewer::default()),
        );
        (controller, sink)
    }

    fn valid_form() -> FormInput {
        FormInput::default()
            .with(FormControl::new("segment", "Organic pet food").required())
            .with(FormControl::new("product", "Subscription box"))
            .with(FormControl::new("price", "1234.5"))
            .with(FormControl::new("notes", "   "))
    }

    #[tokio::test]
    async fn test_blank_required_fields_never_hit_the_network() {
        let api = Arc::new(FakeApi::default());
        let (mut controller, _) = controller(api.clone());
        let form = FormInput::default()
            .with(FormControl::new("segment", " ").required())
            .with(FormControl::new("product", "").required());

        let outcome = controller.submit(&form).await.unwrap();

        let SubmitOutcome::Invalid(errors) = outcome else {
            panic!("expected validation failure");
        };
        assert_eq!(errors.len(), 2);
        assert_eq!(api.analyze_calls.load(Ordering::SeqCst), 0);
        let page = controller.page();
        let page = page.lock().await;
        assert!(page.is_field_invalid("segment"));
        assert!(page.is_field_invalid("product"));
        assert!(page.form.submit.enabled);
    }

    #[tokio::test]
    async fn test_placeholder_segment_is_rejected() {
        let api = Arc::new(FakeApi::default());
        let (mut controller, _) = controller(api.clone());
        let form = FormInput::default().with(FormControl::new("segment", "Test market").required());

        let outcome = controller.submit(&form).await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Invalid(_)));
        assert!(
            controller
                .page()
                .lock()
                .await
                .field_error("segment")
                .unwrap()
                .contains("placeholder")
        );
        assert_eq!(api.analyze_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_payload_shape() {
        let api = Arc::new(FakeApi::default());
        let (mut controller, _) = controller(api.clone());
        controller.submit(&valid_form()).await.unwrap();

        let payload = api.last_payload.lock().unwrap().clone().unwrap();
        assert_eq!(payload.get("price"), Some(&json!(1234.5)));
        assert_eq!(payload.get("segment"), Some(&json!("Organic pet food")));
        assert!(!payload.contains("notes"));
        assert_eq!(
            payload.get("session_id"),
            Some(&json!(controller.session_id().as_str()))
        );
        assert_eq!(payload.get("analysis_mode"), Some(&json!("ultra_detailed")));
    }

    #[tokio::test]
    async fn test_end_to_end_success() {
        let api = Arc::new(FakeApi::default().with_analysis(Ok(AnalyzeOutcome::Complete(json!({
            "insights_exclusivos": ["A", "B"],
            "metadata": {"quality_score": 75, "simulation_free": true}
        })))));
        let (mut controller, _) = controller(api);

        let outcome = controller.submit(&valid_form()).await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Completed);

        let page = controller.page();
        let page = page.lock().await;
        let insights = page.container(ContainerId::Insights).unwrap();
        assert_eq!(insights.count_class("insight-card"), 2);
        assert!(page.pdf_export_visible);
        assert!(page.results_visible);
        assert!(!page.progress.visible);
        assert!(page.form.submit.enabled);
        assert_eq!(page.banner().unwrap().kind, BannerKind::Success);
    }

    #[tokio::test]
    async fn test_polling_is_inactive_after_completion() {
        let api = Arc::new(
            FakeApi::default()
                .with_analyze_delay(Duration::from_millis(40))
                .with_progress((1..=100).map(|s| ProgressState::new(s, 100, "working")).collect()),
        );
        let (mut controller, _) = controller(api.clone());

        controller.submit(&valid_form()).await.unwrap();
        assert!(!controller.is_polling());
        assert_eq!(api.tracking_calls.load(Ordering::SeqCst), 1);

        let page = controller.page();
        let frozen = page.lock().await.progress.state.clone();
        assert!(frozen.is_some());
        let calls = api.progress_calls.load(Ordering::SeqCst);

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(page.lock().await.progress.state, frozen);
        assert_eq!(api.progress_calls.load(Ordering::SeqCst), calls);
    }

    #[tokio::test]
    async fn test_tracking_failure_falls_back_to_local_steps() {
        let api = Arc::new(
            FakeApi::default()
                .with_tracking_failure()
                .with_analyze_delay(Duration::from_millis(30)),
        );
        let (mut controller, _) = controller(api.clone());

        controller.submit(&valid_form()).await.unwrap();
        assert_eq!(api.progress_calls.load(Ordering::SeqCst), 0);
        assert!(!controller.is_polling());
        let page = controller.page();
        let state = page.lock().await.progress.state.clone().unwrap();
        assert!(state.percentage < 100.0);
    }

    #[tokio::test]
    async fn test_partial_result_renders_with_warning() {
        let api = Arc::new(FakeApi::default().with_analysis(Ok(AnalyzeOutcome::Partial {
            message: "Gemini quota exceeded".into(),
            data: json!({"insights_exclusivos": ["Only one"]}),
        })));
        let (mut controller, _) = controller(api);

        let outcome = controller.submit(&valid_form()).await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Partial { .. }));

        let page = controller.page();
        let page = page.lock().await;
        assert_eq!(
            page.container(ContainerId::Insights).unwrap().count_class("insight-card"),
            1
        );
        let banner = page.banner().unwrap();
        assert_eq!(banner.kind, BannerKind::Warning);
        assert!(banner.message.contains("Gemini quota exceeded"));
    }

    #[tokio::test]
    async fn test_hard_failure_and_transport_error() {
        let api = Arc::new(FakeApi::default().with_analysis(Ok(AnalyzeOutcome::Failed {
            status: 500,
            message: "APIs not configured".into(),
        })));
        let (mut controller, _) = controller(api);
        controller.submit(&valid_form()).await.unwrap();
        {
            let page = controller.page();
            let page = page.lock().await;
            assert_eq!(page.banner().unwrap().message, "APIs not configured");
            assert!(!page.results_visible);
            assert!(page.form.submit.enabled);
        }
        assert!(controller.analysis().is_none());

        let api = Arc::new(
            FakeApi::default().with_analysis(Err(LensError::transport("connection refused"))),
        );
        let (mut controller, _) = self::controller(api);
        let outcome = controller.submit(&valid_form()).await.unwrap();
        assert_eq!(
            outcome,
            SubmitOutcome::Failed {
                message: GENERIC_FAILURE_MESSAGE.into()
            }
        );
        assert!(!controller.is_polling());
    }

    #[tokio::test]
    async fn test_success_lists_reports_best_effort() {
        let api = Arc::new(
            FakeApi::default().with_reports(Err(LensError::http(500, "listing failed"))),
        );
        let (mut controller, _) = controller(api);
        let outcome = controller.submit(&valid_form()).await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Completed);
        assert!(
            controller
                .page()
                .lock()
                .await
                .container(ContainerId::Reports)
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_session_policy() {
        let api = Arc::new(FakeApi::default());
        let (mut controller, _) = controller(api.clone());
        let first = controller.session_id().clone();
        controller.submit(&valid_form()).await.unwrap();
        assert_eq!(controller.session_id(), &first);

        let sink = Arc::new(MemorySink::default());
        let mut per_submission = AnalysisController::new(
            api,
            ClientConfig {
                session_policy: SessionPolicy::PerSubmission,
                ..fast_config()
            },
            sink,
            Arc::new(RecordingViewer::default()),
        )
        .with_session(SessionId::from_raw("session_0_fixed"));
        per_submission.submit(&valid_form()).await.unwrap();
        assert_ne!(per_submission.session_id().as_str(), "session_0_fixed");
    }

    #[tokio::test]
    async fn test_save_json_without_analysis() {
        let (controller, sink) = controller(Arc::new(FakeApi::default()));
        let err = controller.save_json().await.unwrap_err();
        assert!(matches!(err, LensError::NoAnalysis));
        assert!(sink.files.lock().unwrap().is_empty());
        assert_eq!(
            controller.page().lock().await.banner().unwrap().kind,
            BannerKind::Error
        );
    }

    #[tokio::test]
    async fn test_downloads_leave_no_live_urls() {
        let api = Arc::new(FakeApi::default().with_analysis(Ok(AnalyzeOutcome::Complete(json!({
            "metadata": {"quality_score": 80, "simulation_free": true}
        })))));
        let (mut controller, sink) = controller(api);
        controller.submit(&valid_form()).await.unwrap();

        controller.download_report(&ReportType::Dashboard).await.unwrap();
        controller.export_pdf().await.unwrap();
        controller.save_json().await.unwrap();

        assert_eq!(controller.exports().live_urls().await, 0);
        assert_eq!(sink.files.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_report_download_error_shows_banner() {
        let api = Arc::new(
            FakeApi::default().with_report_bytes(Err(LensError::http(404, "Report not found"))),
        );
        let (controller, sink) = controller(api);

        let err = controller
            .download_report(&ReportType::Executive)
            .await
            .unwrap_err();
        assert!(err.is_http());
        assert!(sink.files.lock().unwrap().is_empty());
        assert_eq!(controller.exports().live_urls().await, 0);
        assert_eq!(
            controller.page().lock().await.banner().unwrap().message,
            "Report not found"
        );
    }

    #[tokio::test]
    async fn test_check_capabilities_is_advisory() {
        let api = Arc::new(FakeApi::default().with_status(
            Ok(json!({"ai_providers": {"gemini": {"available": true}, "openai": false}})),
            Err(LensError::transport("down")),
        ));
        let (controller, _) = controller(api);

        let status = controller.check_capabilities().await;
        assert_eq!(status.available_provider_count(), 1);
        assert_eq!(status.healthy, None);
        assert_eq!(status.local.len(), 2);
        assert!(
            controller
                .page()
                .lock()
                .await
                .container(ContainerId::Status)
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_upload_attachment() {
        let api = Arc::new(FakeApi::default().with_upload(Ok(UploadResponse {
            success: true,
            filename: Some("brief.pdf".into()),
            size: Some(2048),
            ..UploadResponse::default()
        })));
        let (mut controller, _) = controller(api.clone());

        let file = controller
            .upload_attachment("brief.pdf", vec![0; 2048])
            .await
            .unwrap();
        assert_eq!(file.mime_type, "application/pdf");
        assert_eq!(controller.uploads().len(), 1);
        assert_eq!(
            api.last_upload.lock().unwrap().clone().unwrap(),
            ("brief.pdf".to_string(), "application/pdf".to_string(), 2048)
        );
        let page = controller.page();
        let page = page.lock().await;
        assert!(
            page.container(ContainerId::Uploads)
                .unwrap()
                .text_content()
                .contains("2 KB")
        );
    }

    #[tokio::test]
    async fn test_rejected_upload_shows_error() {
        let api = Arc::new(FakeApi::default().with_upload(Ok(UploadResponse {
            success: false,
            error: Some("File type not allowed".into()),
            ..UploadResponse::default()
        })));
        let (mut controller, _) = controller(api);

        let err = controller
            .upload_attachment("virus.exe", vec![1, 2, 3])
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "File type not allowed");
        assert!(controller.uploads().is_empty());
        assert_eq!(
            controller.page().lock().await.banner().unwrap().kind,
            BannerKind::Error
        );
    }

    #[tokio::test]
    async fn test_reset_clears_results() {
        let api = Arc::new(FakeApi::default().with_analysis(Ok(AnalyzeOutcome::Complete(json!({
            "insights_exclusivos": ["A"]
        })))));
        let (mut controller, _) = controller(api);
        controller.submit(&valid_form()).await.unwrap();

        controller.reset().await;
        assert!(controller.analysis().is_none());
        let page = controller.page();
        let page = page.lock().await;
        assert!(page.container(ContainerId::Insights).is_none());
        assert!(!page.results_visible);
        assert!(page.banner().is_none());
    }
}
