//! One pure renderer per result section.
//!
//! Every function returns `None` when its input has nothing to show; the
//! caller then leaves the target container untouched.

use marketlens_core::analysis::{
    AnalysisMetadata, AvatarProfile, FieldValue, Fields, InnovativeComponent, Insight,
    MentalDriver, PerformanceMetrics,
};
use marketlens_core::format::format_file_size;
use marketlens_core::progress::ProgressState;
use marketlens_core::report::ReportDescriptor;
use marketlens_core::status::{Capability, CapabilityStatus};
use marketlens_core::upload::UploadedFile;

use crate::fragment::{Element, Fragment, Node};

// ============================================================================
// Shared building blocks
// ============================================================================

/// `<dl>` of label/value pairs. Nested objects become nested lists.
fn field_list(fields: &Fields) -> Element {
    let mut list = Element::new("dl").class("field-list");
    for field in fields.iter() {
        list = list
            .child(Element::new("dt").class("field-label").text(&field.label))
            .child(Element::new("dd").class("field-value").child(field_value(&field.value)));
    }
    list
}

fn field_value(value: &FieldValue) -> Node {
    match value {
        FieldValue::Text(text) => Node::text(text),
        FieldValue::Flag { value, label } => Element::new("span")
            .class("flag")
            .class(if *value { "flag-true" } else { "flag-false" })
            .text(label)
            .into(),
        FieldValue::List(items) => bullet_list(items).into(),
        FieldValue::Nested(fields) => field_list(fields).into(),
    }
}

fn bullet_list(items: &[String]) -> Element {
    Element::new("ul")
        .class("value-list")
        .children(items.iter().map(|item| Element::new("li").text(item)))
}

fn numbered_list(items: &[String]) -> Option<Fragment> {
    if items.is_empty() {
        return None;
    }
    let list = Element::new("ol").class("numbered-list").children(
        items.iter().enumerate().map(|(i, item)| {
            Element::new("li")
                .class("list-item")
                .child(Element::new("span").class("item-number").text((i + 1).to_string()))
                .child(Element::new("span").class("item-text").text(item))
        }),
    );
    Some(Fragment::single(list))
}

fn numbered_card(class: &str, index: usize, title: &str) -> Element {
    Element::new("div")
        .class("card")
        .class(class)
        .attr("data-index", (index + 1).to_string())
        .child(
            Element::new("div")
                .class("card-header")
                .child(Element::new("span").class("card-number").text((index + 1).to_string()))
                .child(Element::new("h4").class("card-title").text(title)),
        )
}

fn titled_block(class: &str, title: &str, fields: &Fields) -> Element {
    Element::new("div")
        .class(class)
        .child(Element::new("h4").text(title))
        .child(field_list(fields))
}

// ============================================================================
// Avatar
// ============================================================================

/// Demographic and psychographic profile blocks.
pub fn avatar(profile: Option<&AvatarProfile>) -> Option<Fragment> {
    let profile = profile?;
    let mut fragment = Fragment::new();
    if let Some(demographic) = &profile.demographic {
        fragment.push(titled_block("profile-block", "Demographic Profile", demographic));
    }
    if let Some(psychographic) = &profile.psychographic {
        fragment.push(titled_block(
            "profile-block",
            "Psychographic Profile",
            psychographic,
        ));
    }
    (!fragment.is_empty()).then_some(fragment)
}

pub fn pains(profile: Option<&AvatarProfile>) -> Option<Fragment> {
    numbered_list(&profile?.pains)
}

pub fn desires(profile: Option<&AvatarProfile>) -> Option<Fragment> {
    numbered_list(&profile?.desires)
}

pub fn positioning(fields: Option<&Fields>) -> Option<Fragment> {
    let fields = fields.filter(|f| !f.is_empty())?;
    Some(Fragment::single(field_list(fields)))
}

// ============================================================================
// Insights
// ============================================================================

pub fn insights(insights: &[Insight]) -> Option<Fragment> {
    if insights.is_empty() {
        return None;
    }

    let mut fragment = Fragment::new();
    for (i, insight) in insights.iter().enumerate() {
        let card = Element::new("div")
            .class("insight-card")
            .attr("data-index", (i + 1).to_string())
            .child(Element::new("span").class("insight-number").text((i + 1).to_string()));

        let card = match insight {
            Insight::Plain { text } => card.child(Element::new("p").class("insight-text").text(text)),
            Insight::Enriched(enriched) => {
                let tier = enriched.tier();
                let mut card = card
                    .class("insight-enriched")
                    .class(format!("priority-{}", tier.label()))
                    .child(
                        Element::new("span")
                            .class("priority-badge")
                            .text(format!(
                                "{} priority ({:.0}/10)",
                                tier.label(),
                                enriched.priority
                            )),
                    )
                    .child(Element::new("p").class("insight-text").text(&enriched.text));

                let mut meta = Element::new("div").class("insight-meta");
                if let Some(category) = &enriched.category {
                    meta = meta.child(Element::new("span").class("insight-category").text(category));
                }
                if let Some(actionability) = enriched.actionability {
                    meta = meta.child(
                        Element::new("span")
                            .class("insight-actionability")
                            .text(format!("Actionability {actionability:.0}/10")),
                    );
                }
                if let Some(impact) = &enriched.estimated_impact {
                    meta = meta.child(
                        Element::new("span")
                            .class("insight-impact")
                            .text(format!("Impact: {impact}")),
                    );
                }
                if !meta.children.is_empty() {
                    card = card.child(meta);
                }
                if !enriched.implementation.is_empty() {
                    card = card.child(bullet_list(&enriched.implementation).class("insight-steps"));
                }
                card
            }
        };
        fragment.push(card);
    }
    Some(fragment)
}

// ============================================================================
// Metrics
// ============================================================================

pub fn kpis(metrics: Option<&PerformanceMetrics>) -> Option<Fragment> {
    let metrics = metrics?;
    if metrics.kpis.is_empty() {
        return None;
    }
    let mut fragment = Fragment::new();
    for (i, kpi) in metrics.kpis.iter().enumerate() {
        let mut card = numbered_card("kpi-card", i, &kpi.name);
        if !kpi.details.is_empty() {
            card = card.child(field_list(&kpi.details));
        }
        fragment.push(card);
    }
    Some(fragment)
}

/// Conservative, realistic and optimistic projections, in that order.
pub fn scenarios(metrics: Option<&PerformanceMetrics>) -> Option<Fragment> {
    let metrics = metrics?;
    if metrics.scenarios.is_empty() && metrics.expected_roi.is_none() {
        return None;
    }

    let mut fragment = Fragment::new();
    for scenario in &metrics.scenarios {
        fragment.push(
            Element::new("div")
                .class("scenario-card")
                .class(format!("scenario-{}", scenario.kind.title().to_lowercase()))
                .child(Element::new("h4").text(format!("{} Scenario", scenario.kind.title())))
                .child(field_list(&scenario.fields)),
        );
    }
    if let Some(roi) = &metrics.expected_roi {
        fragment.push(
            Element::new("p")
                .class("expected-roi")
                .text(format!("Expected ROI: {roi}")),
        );
    }
    Some(fragment)
}

// ============================================================================
// Drivers, metadata, innovative components
// ============================================================================

pub fn drivers(drivers: &[MentalDriver]) -> Option<Fragment> {
    if drivers.is_empty() {
        return None;
    }
    let mut fragment = Fragment::new();
    for (i, driver) in drivers.iter().enumerate() {
        let mut card = numbered_card("driver-card", i, &driver.name);
        if !driver.details.is_empty() {
            card = card.child(field_list(&driver.details));
        }
        fragment.push(card);
    }
    Some(fragment)
}

pub fn metadata(metadata: Option<&AnalysisMetadata>) -> Option<Fragment> {
    let metadata = metadata?;
    let mut fragment = Fragment::new();

    if !metadata.fields.is_empty() {
        fragment.push(field_list(&metadata.fields));
    }
    for (class, title, components) in [
        ("components-succeeded", "Succeeded Components", &metadata.succeeded_components),
        ("components-failed", "Failed Components", &metadata.failed_components),
    ] {
        if !components.is_empty() {
            fragment.push(
                Element::new("div")
                    .class(class)
                    .child(Element::new("h4").text(title))
                    .child(bullet_list(components)),
            );
        }
    }
    (!fragment.is_empty()).then_some(fragment)
}

/// A single card, appended to the innovative container.
pub fn innovative_card(component: &InnovativeComponent) -> Fragment {
    Fragment::single(
        Element::new("div")
            .class("innovative-card")
            .attr("data-component", &component.key)
            .child(Element::new("h4").text(&component.title))
            .child(field_list(&component.fields)),
    )
}

// ============================================================================
// Reports, uploads, status, progress
// ============================================================================

/// A catalog entry with download (and, for dashboards, view) actions.
pub fn report_entry(report: &ReportDescriptor) -> Fragment {
    let report_type = &report.report_type;
    let title = report
        .name
        .clone()
        .unwrap_or_else(|| report_type.title().to_string());

    let mut actions = Element::new("div").class("report-actions").child(
        Element::new("button")
            .class("btn-download")
            .attr("data-action", "download")
            .attr("data-report-type", report_type.as_str())
            .text("Download"),
    );
    if report_type.is_viewable() {
        actions = actions.child(
            Element::new("button")
                .class("btn-view")
                .attr("data-action", "view")
                .attr("data-report-type", report_type.as_str())
                .text("View"),
        );
    }

    let mut details = Element::new("div")
        .class("report-details")
        .child(Element::new("span").class("report-size").text(format_file_size(report.size)));
    if !report.created.is_empty() {
        details = details.child(Element::new("span").class("report-created").text(&report.created));
    }

    Fragment::single(
        Element::new("div")
            .class("report-entry")
            .attr("data-report-type", report_type.as_str())
            .child(Element::new("span").class("report-icon").text(report_type.icon()))
            .child(Element::new("h4").class("report-title").text(title))
            .child(details)
            .child(actions),
    )
}

pub fn uploads(files: &[UploadedFile]) -> Option<Fragment> {
    if files.is_empty() {
        return None;
    }
    let list = Element::new("ul").class("upload-list").children(files.iter().map(|file| {
        Element::new("li")
            .class("upload-item")
            .attr("data-mime-type", &file.mime_type)
            .child(Element::new("span").class("upload-name").text(&file.name))
            .child(Element::new("span").class("upload-size").text(file.size_label()))
    }));
    Some(Fragment::single(list))
}

fn capability_badge(capability: &Capability) -> Element {
    Element::new("span")
        .class("status-badge")
        .class(if capability.available {
            "status-available"
        } else {
            "status-unavailable"
        })
        .text(&capability.name)
}

pub fn status(status: &CapabilityStatus) -> Option<Fragment> {
    if status.providers.is_empty() && status.local.is_empty() && status.healthy.is_none() {
        return None;
    }

    let mut fragment = Fragment::new();
    if let Some(healthy) = status.healthy {
        fragment.push(
            Element::new("div")
                .class("health")
                .class(if healthy { "health-ok" } else { "health-degraded" })
                .text(if healthy { "healthy" } else { "degraded" }),
        );
    }
    if !status.providers.is_empty() {
        fragment.push(
            Element::new("div")
                .class("status-providers")
                .children(status.providers.iter().map(capability_badge)),
        );
    }
    if !status.local.is_empty() {
        fragment.push(
            Element::new("div")
                .class("status-local")
                .children(status.local.iter().map(capability_badge)),
        );
    }
    Some(fragment)
}

/// Progress bar, step counter and current message.
pub fn progress(state: &ProgressState) -> Fragment {
    let percentage = state.display_percentage();
    let mut fragment = Fragment::new();
    fragment.push(
        Element::new("div").class("progress-bar").child(
            Element::new("div")
                .class("progress-fill")
                .attr("style", format!("width: {percentage:.0}%")),
        ),
    );
    fragment.push(
        Element::new("div")
            .class("progress-step")
            .text(format!("Step {} of {}", state.current_step, state.total_steps)),
    );
    fragment.push(
        Element::new("div")
            .class("progress-message")
            .text(&state.current_message),
    );
    if let Some(remaining) = &state.estimated_remaining {
        fragment.push(
            Element::new("div")
                .class("progress-eta")
                .text(format!("Estimated time remaining: {remaining}")),
        );
    }
    fragment
}
