//! Paints typed documents into a [`Page`].

use marketlens_core::analysis::AnalysisDocument;
use marketlens_core::export::PdfEligibility;
use marketlens_core::report::ReportDescriptor;
use marketlens_core::status::CapabilityStatus;
use marketlens_core::upload::UploadedFile;

use crate::fragment::Fragment;
use crate::page::{ContainerId, Page};
use crate::sections;

/// Renders every section of `document` independently and reveals the results.
///
/// Sections with nothing to show leave their container as it was. Returns the
/// number of containers that were touched.
pub fn paint_analysis(page: &mut Page, document: &AnalysisDocument) -> usize {
    let avatar = document.avatar.as_ref();
    let metrics = document.metrics.as_ref();

    let rendered = [
        (ContainerId::Avatar, sections::avatar(avatar)),
        (ContainerId::Pains, sections::pains(avatar)),
        (ContainerId::Desires, sections::desires(avatar)),
        (
            ContainerId::Positioning,
            sections::positioning(document.positioning.as_ref()),
        ),
        (ContainerId::Insights, sections::insights(&document.insights)),
        (ContainerId::Kpis, sections::kpis(metrics)),
        (ContainerId::Scenarios, sections::scenarios(metrics)),
        (ContainerId::Drivers, sections::drivers(&document.drivers)),
        (
            ContainerId::Metadata,
            sections::metadata(document.metadata.as_ref()),
        ),
    ];

    let mut painted = 0;
    for (id, fragment) in rendered {
        if page.apply(id, fragment) {
            painted += 1;
        }
    }

    if !document.innovative.is_empty() {
        // Created once per render pass, then appended to.
        page.replace(ContainerId::Innovative, Fragment::new());
        for component in &document.innovative {
            page.append(ContainerId::Innovative, sections::innovative_card(component));
        }
        painted += 1;
    }

    let eligibility = PdfEligibility::evaluate(document);
    page.pdf_export_visible = eligibility.is_eligible();
    tracing::debug!(
        target: "marketlens::render",
        "[Render] Painted {} section(s); PDF export {}",
        painted,
        eligibility.reason()
    );

    page.show_results();
    painted
}

/// Rebuilds the consolidated-report catalog. An empty list leaves it as it was.
pub fn paint_reports(page: &mut Page, reports: &[ReportDescriptor]) -> bool {
    if reports.is_empty() {
        return false;
    }
    page.replace(ContainerId::Reports, Fragment::new());
    for report in reports {
        page.append(ContainerId::Reports, sections::report_entry(report));
    }
    true
}

pub fn paint_uploads(page: &mut Page, files: &[UploadedFile]) -> bool {
    page.apply(ContainerId::Uploads, sections::uploads(files))
}

pub fn paint_status(page: &mut Page, status: &CapabilityStatus) -> bool {
    page.apply(ContainerId::Status, sections::status(status))
}
