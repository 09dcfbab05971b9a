//! Report catalog, report downloads and PDF/JSON export.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use marketlens_client::AnalysisApi;
use marketlens_core::analysis::AnalysisDocument;
use marketlens_core::export::{PdfEligibility, json_filename, pdf_filename};
use marketlens_core::report::{ReportDescriptor, ReportType};
use marketlens_core::{LensError, Result, SessionId};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::download::{Download, DownloadSink, ObjectUrlRegistry, Viewer};

pub struct ExportService {
    api: Arc<dyn AnalysisApi>,
    sink: Arc<dyn DownloadSink>,
    viewer: Arc<dyn Viewer>,
    urls: Mutex<ObjectUrlRegistry>,
}

impl ExportService {
    pub fn new(
        api: Arc<dyn AnalysisApi>,
        sink: Arc<dyn DownloadSink>,
        viewer: Arc<dyn Viewer>,
    ) -> Self {
        Self {
            api,
            sink,
            viewer,
            urls: Mutex::new(ObjectUrlRegistry::new()),
        }
    }

    /// Number of object URLs not yet revoked.
    pub async fn live_urls(&self) -> usize {
        self.urls.lock().await.live_count()
    }

    pub async fn list_reports(&self, session_id: &SessionId) -> Result<Vec<ReportDescriptor>> {
        let reports = self.api.list_reports(session_id).await?;
        tracing::debug!(
            target: "marketlens::export",
            "[Reports] {} consolidated report(s) for {}",
            reports.len(),
            session_id
        );
        Ok(reports)
    }

    /// Downloads a consolidated report as `{ReportTitle}_{YYYY-MM-DD}.{ext}`.
    pub async fn download_report(
        &self,
        report_type: &ReportType,
        session_id: &SessionId,
        date: NaiveDate,
    ) -> Result<PathBuf> {
        let bytes = self.api.download_report(report_type, session_id).await?;
        let filename = report_type.download_filename(date);
        self.deliver(&filename, report_mime_type(report_type), bytes)
            .await
    }

    /// Opens the dashboard report in the viewer. Returns false for other types.
    pub fn view_report(&self, report_type: &ReportType, session_id: &SessionId) -> Result<bool> {
        if !report_type.is_viewable() {
            return Ok(false);
        }
        let url = self.api.report_url(report_type, session_id);
        tracing::info!(target: "marketlens::export", "[Reports] Opening {}", url);
        self.viewer.open(&url)?;
        Ok(true)
    }

    /// Requests a PDF for an eligible analysis and downloads it.
    pub async fn export_pdf(
        &self,
        raw: &Value,
        document: &AnalysisDocument,
        date: NaiveDate,
    ) -> Result<PathBuf> {
        let eligibility = PdfEligibility::evaluate(document);
        if !eligibility.is_eligible() {
            return Err(LensError::not_eligible(eligibility.reason()));
        }

        let bytes = self.api.generate_pdf(raw).await?;
        self.deliver(&pdf_filename(date), "application/pdf", bytes)
            .await
    }

    /// Client-side JSON export of the loaded result.
    pub async fn save_json(
        &self,
        raw: &Value,
        session_id: &SessionId,
        date: NaiveDate,
    ) -> Result<PathBuf> {
        let bytes = serde_json::to_vec_pretty(raw)?;
        self.deliver(&json_filename(session_id, date), "application/json", bytes)
            .await
    }

    /// Creates an object URL, hands it to the sink, then revokes it whatever
    /// the sink reported.
    async fn deliver(&self, filename: &str, mime_type: &str, bytes: Vec<u8>) -> Result<PathBuf> {
        let (url, blob) = {
            let mut urls = self.urls.lock().await;
            let url = urls.create(mime_type, bytes);
            let blob = urls
                .resolve(&url)
                .ok_or_else(|| LensError::internal("object URL vanished before download"))?;
            (url, blob)
        };

        let result = self
            .sink
            .deliver(Download {
                url: &url,
                filename,
                mime_type,
                bytes: &blob,
            })
            .await;

        self.urls.lock().await.revoke(&url);
        if let Err(e) = &result {
            tracing::error!(target: "marketlens::export", "[Download] {} failed: {}", filename, e);
        }
        result
    }
}

fn report_mime_type(report_type: &ReportType) -> &'static str {
    match report_type.extension() {
        "html" => "text/html",
        "json" => "application/json",
        _ => "text/markdown",
    }
}
