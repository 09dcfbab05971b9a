//! The page document: named containers plus the form/progress/banner chrome.
//!
//! All "DOM manipulation" goes through [`Page`]. Containers hold a
//! [`Fragment`]; most are replaced wholesale, the innovative and reports
//! containers are appended to.

use std::collections::BTreeMap;
use std::time::Instant;

use marketlens_core::FieldError;
use marketlens_core::banner::{Banner, BannerKind};
use marketlens_core::progress::ProgressState;
use serde::Serialize;

use crate::fragment::Fragment;

pub const SUBMIT_LABEL: &str = "Generate Analysis";
pub const SUBMIT_BUSY_LABEL: &str = "Analyzing...";

/// Named target regions of the page, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerId {
    Status,
    Uploads,
    Avatar,
    Pains,
    Desires,
    Positioning,
    Insights,
    Kpis,
    Scenarios,
    Drivers,
    Metadata,
    Innovative,
    Reports,
}

impl ContainerId {
    /// Containers cleared by a new submission or a reset.
    pub const RESULTS: [ContainerId; 11] = [
        ContainerId::Avatar,
        ContainerId::Pains,
        ContainerId::Desires,
        ContainerId::Positioning,
        ContainerId::Insights,
        ContainerId::Kpis,
        ContainerId::Scenarios,
        ContainerId::Drivers,
        ContainerId::Metadata,
        ContainerId::Innovative,
        ContainerId::Reports,
    ];

    /// Element id in the serialized page.
    pub fn dom_id(self) -> &'static str {
        match self {
            ContainerId::Status => "statusPanel",
            ContainerId::Uploads => "uploadedFiles",
            ContainerId::Avatar => "avatarProfile",
            ContainerId::Pains => "painsList",
            ContainerId::Desires => "desiresList",
            ContainerId::Positioning => "positioningContent",
            ContainerId::Insights => "insightsContainer",
            ContainerId::Kpis => "kpisContainer",
            ContainerId::Scenarios => "scenariosContainer",
            ContainerId::Drivers => "driversContainer",
            ContainerId::Metadata => "metadataContainer",
            ContainerId::Innovative => "innovativeComponents",
            ContainerId::Reports => "consolidatedReports",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ContainerId::Status => "System Status",
            ContainerId::Uploads => "Attachments",
            ContainerId::Avatar => "Avatar Profile",
            ContainerId::Pains => "Visceral Pains",
            ContainerId::Desires => "Secret Desires",
            ContainerId::Positioning => "Positioning",
            ContainerId::Insights => "Exclusive Insights",
            ContainerId::Kpis => "Key Performance Indicators",
            ContainerId::Scenarios => "Financial Projections",
            ContainerId::Drivers => "Mental Drivers",
            ContainerId::Metadata => "Analysis Metadata",
            ContainerId::Innovative => "Innovative Components",
            ContainerId::Reports => "Consolidated Reports",
        }
    }

    /// Whether content is appended rather than replaced.
    pub fn appends(self) -> bool {
        matches!(self, ContainerId::Innovative | ContainerId::Reports)
    }
}

/// Submit control state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitButton {
    pub enabled: bool,
    pub label: String,
}

impl Default for SubmitButton {
    fn default() -> Self {
        Self {
            enabled: true,
            label: SUBMIT_LABEL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormState {
    pub errors: Vec<FieldError>,
    pub submit: SubmitButton,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProgressArea {
    pub visible: bool,
    pub scrolled_into_view: bool,
    pub state: Option<ProgressState>,
}

#[derive(Debug, Clone, Default)]
pub struct Page {
    containers: BTreeMap<ContainerId, Fragment>,
    pub form: FormState,
    pub progress: ProgressArea,
    pub results_visible: bool,
    pub pdf_export_visible: bool,
    banner: Option<Banner>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    // ============================================================================
    // Containers
    // ============================================================================

    pub fn container(&self, id: ContainerId) -> Option<&Fragment> {
        self.containers.get(&id)
    }

    /// Non-empty containers in display order.
    pub fn containers(&self) -> impl Iterator<Item = (ContainerId, &Fragment)> {
        self.containers
            .iter()
            .filter(|(_, fragment)| !fragment.is_empty())
            .map(|(id, fragment)| (*id, fragment))
    }

    pub fn replace(&mut self, id: ContainerId, fragment: Fragment) {
        self.containers.insert(id, fragment);
    }

    pub fn append(&mut self, id: ContainerId, fragment: Fragment) {
        self.containers.entry(id).or_default().extend(fragment);
    }

    /// Replaces or appends according to [`ContainerId::appends`]. `None` is a no-op.
    pub fn apply(&mut self, id: ContainerId, fragment: Option<Fragment>) -> bool {
        let Some(fragment) = fragment else {
            return false;
        };
        if id.appends() {
            self.append(id, fragment);
        } else {
            self.replace(id, fragment);
        }
        true
    }

    pub fn clear(&mut self, id: ContainerId) {
        self.containers.remove(&id);
    }

    pub fn clear_results(&mut self) {
        for id in ContainerId::RESULTS {
            self.clear(id);
        }
        self.pdf_export_visible = false;
    }

    // ============================================================================
    // Form
    // ============================================================================

    pub fn set_field_errors(&mut self, errors: Vec<FieldError>) {
        self.form.errors = errors;
    }

    pub fn clear_field_errors(&mut self) {
        self.form.errors.clear();
    }

    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.form
            .errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn is_field_invalid(&self, field: &str) -> bool {
        self.field_error(field).is_some()
    }

    /// Disables the submit control and swaps its label.
    pub fn begin_submission(&mut self) {
        self.form.submit = SubmitButton {
            enabled: false,
            label: SUBMIT_BUSY_LABEL.to_string(),
        };
    }

    /// Restores the submit control.
    pub fn end_submission(&mut self) {
        self.form.submit = SubmitButton::default();
    }

    // ============================================================================
    // Progress & results visibility
    // ============================================================================

    /// Reveals the progress area, hides results and scrolls to the progress area.
    pub fn show_progress(&mut self) {
        self.progress = ProgressArea {
            visible: true,
            scrolled_into_view: true,
            state: None,
        };
        self.results_visible = false;
    }

    pub fn update_progress(&mut self, state: ProgressState) {
        self.progress.state = Some(state);
    }

    pub fn hide_progress(&mut self) {
        self.progress.visible = false;
        self.progress.scrolled_into_view = false;
    }

    pub fn show_results(&mut self) {
        self.results_visible = true;
    }

    pub fn hide_results(&mut self) {
        self.results_visible = false;
    }

    // ============================================================================
    // Banner
    // ============================================================================

    /// Shows a banner, evicting any current one.
    pub fn show_banner(&mut self, kind: BannerKind, message: impl Into<String>) {
        self.banner = Some(Banner::new(kind, message));
    }

    pub fn dismiss_banner(&mut self) {
        self.banner = None;
    }

    /// The banner, unless it has self-dismissed by `now`.
    pub fn banner_at(&self, now: Instant) -> Option<&Banner> {
        self.banner.as_ref().filter(|b| !b.is_expired(now))
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner_at(Instant::now())
    }

    /// Drops an expired banner. Returns true when one was removed.
    pub fn expire_banner(&mut self, now: Instant) -> bool {
        if self.banner.as_ref().is_some_and(|b| b.is_expired(now)) {
            self.banner = None;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::Element;
    use marketlens_core::banner::BANNER_TTL;

    fn text(s: &str) -> Fragment {
        Fragment::single(Element::new("p").text(s))
    }

    #[test]
    fn test_replace_discards_prior_content() {
        let mut page = Page::new();
        page.replace(ContainerId::Insights, text("old"));
        page.replace(ContainerId::Insights, text("new"));
        assert_eq!(
            page.container(ContainerId::Insights).unwrap().text_content(),
            "new"
        );
    }

    #[test]
    fn test_apply_appends_only_where_allowed() {
        let mut page = Page::new();
        page.apply(ContainerId::Reports, Some(text("a")));
        page.apply(ContainerId::Reports, Some(text("b")));
        page.apply(ContainerId::Kpis, Some(text("a")));
        page.apply(ContainerId::Kpis, Some(text("b")));
        assert_eq!(page.container(ContainerId::Reports).unwrap().text_content(), "ab");
        assert_eq!(page.container(ContainerId::Kpis).unwrap().text_content(), "b");
    }

    #[test]
    fn test_apply_none_leaves_container_unchanged() {
        let mut page = Page::new();
        page.replace(ContainerId::Drivers, text("kept"));
        assert!(!page.apply(ContainerId::Drivers, None));
        assert_eq!(page.container(ContainerId::Drivers).unwrap().text_content(), "kept");
    }

    #[test]
    fn test_submission_toggles_button() {
        let mut page = Page::new();
        page.begin_submission();
        assert!(!page.form.submit.enabled);
        assert_eq!(page.form.submit.label, SUBMIT_BUSY_LABEL);
        page.end_submission();
        assert!(page.form.submit.enabled);
        assert_eq!(page.form.submit.label, SUBMIT_LABEL);
    }

    #[test]
    fn test_show_progress_hides_results() {
        let mut page = Page::new();
        page.show_results();
        page.show_progress();
        assert!(page.progress.visible);
        assert!(page.progress.scrolled_into_view);
        assert!(!page.results_visible);
    }

    #[test]
    fn test_single_banner_slot_and_expiry() {
        let mut page = Page::new();
        page.show_banner(BannerKind::Info, "first");
        page.show_banner(BannerKind::Error, "second");
        let now = Instant::now();
        assert_eq!(page.banner_at(now).unwrap().message, "second");

        let later = now + BANNER_TTL + std::time::Duration::from_millis(1);
        assert!(page.banner_at(later).is_none());
        assert!(page.expire_banner(later));
        assert!(page.banner_at(now).is_none());
    }
}
