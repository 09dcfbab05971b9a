use anyhow::{Result, bail};
use marketlens_client::ClientConfig;
use marketlens_core::format::format_file_size;
use marketlens_core::report::ReportType;

use super::context::build_controller;

pub async fn list(config: ClientConfig, session: &str) -> Result<()> {
    let controller = build_controller(config, Some(session))?;
    let reports = controller.exports().list_reports(controller.session_id()).await?;

    if reports.is_empty() {
        println!("No consolidated reports for {session}");
        return Ok(());
    }
    for report in &reports {
        println!(
            "{:<16} {:<24} {:>10}  {}",
            report.report_type.as_str(),
            report.report_type.title(),
            format_file_size(report.size),
            report.created
        );
    }
    Ok(())
}

pub async fn download(config: ClientConfig, session: &str, report_type: &str) -> Result<()> {
    let controller = build_controller(config, Some(session))?;
    let path = controller.download_report(&ReportType::parse(report_type)).await?;
    println!("Saved {}", path.display());
    Ok(())
}

pub async fn view(config: ClientConfig, session: &str, report_type: &str) -> Result<()> {
    let controller = build_controller(config, Some(session))?;
    let report_type = ReportType::parse(report_type);
    if !controller.view_report(&report_type).await? {
        bail!("{} reports cannot be viewed, download them instead", report_type.title());
    }
    Ok(())
}
