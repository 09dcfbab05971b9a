//! Consolidated report descriptors and their display lookups.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::format::date_stamp;

/// Kind of consolidated report generated server-side for a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReportType {
    Executive,
    Technical,
    Implementation,
    Dashboard,
    Insights,
    Roi,
    Contingency,
    Monitoring,
    Index,
    Other(String),
}

impl ReportType {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "executive" => Self::Executive,
            "technical" => Self::Technical,
            "implementation" => Self::Implementation,
            "dashboard" => Self::Dashboard,
            "insights" => Self::Insights,
            "roi" => Self::Roi,
            "contingency" => Self::Contingency,
            "monitoring" => Self::Monitoring,
            "index" => Self::Index,
            other => Self::Other(other.to_string()),
        }
    }

    /// Path segment used by the download endpoint.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Executive => "executive",
            Self::Technical => "technical",
            Self::Implementation => "implementation",
            Self::Dashboard => "dashboard",
            Self::Insights => "insights",
            Self::Roi => "roi",
            Self::Contingency => "contingency",
            Self::Monitoring => "monitoring",
            Self::Index => "index",
            Self::Other(raw) => raw,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Executive => "Executive Report",
            Self::Technical => "Technical Report",
            Self::Implementation => "Implementation Plan",
            Self::Dashboard => "Interactive Dashboard",
            Self::Insights => "Exclusive Insights",
            Self::Roi => "ROI Analysis",
            Self::Contingency => "Contingency Plan",
            Self::Monitoring => "Monitoring Plan",
            Self::Index => "Report Index",
            Self::Other(_) => "Report",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Executive => "briefcase",
            Self::Technical => "cog",
            Self::Implementation => "road",
            Self::Dashboard => "chart-line",
            Self::Insights => "lightbulb",
            Self::Roi => "dollar-sign",
            Self::Contingency => "shield-alt",
            Self::Monitoring => "eye",
            Self::Index => "list",
            Self::Other(_) => "file-alt",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Dashboard => "html",
            Self::Technical => "json",
            _ => "md",
        }
    }

    /// Only the dashboard can be opened in a browsing context.
    pub fn is_viewable(&self) -> bool {
        matches!(self, Self::Dashboard)
    }

    /// `{ReportTitle}_{YYYY-MM-DD}.{ext}`, spaces in the title become underscores.
    pub fn download_filename(&self, date: NaiveDate) -> String {
        format!(
            "{}_{}.{}",
            self.title().replace(' ', "_"),
            date_stamp(date),
            self.extension()
        )
    }
}

impl Serialize for ReportType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ReportType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(ReportType::parse(&raw))
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A previously generated consolidated report file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub report_type: ReportType,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub created: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

/// Wire envelope of `/api/list_consolidated_reports/:session_id`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportListing {
    #[serde(default)]
    pub reports: Vec<ReportDescriptor>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_lookup() {
        assert_eq!(ReportType::Dashboard.extension(), "html");
        assert_eq!(ReportType::Technical.extension(), "json");
        assert_eq!(ReportType::Executive.extension(), "md");
        assert_eq!(ReportType::parse("whatever").extension(), "md");
    }

    #[test]
    fn test_download_filename() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 2).unwrap();
        assert_eq!(
            ReportType::Executive.download_filename(date),
            "Executive_Report_2024-07-02.md"
        );
        assert_eq!(
            ReportType::Dashboard.download_filename(date),
            "Interactive_Dashboard_2024-07-02.html"
        );
    }

    #[test]
    fn test_parse_round_trips_known_types() {
        for raw in ["executive", "technical", "dashboard", "roi", "index"] {
            assert_eq!(ReportType::parse(raw).as_str(), raw);
        }
        assert_eq!(ReportType::parse("Custom").as_str(), "custom");
    }

    #[test]
    fn test_listing_deserializes() {
        let listing: ReportListing = serde_json::from_str(
            r#"{"reports": [
                {"name": "analise_123_dashboard.html", "type": "dashboard", "size": 2048,
                 "created": "2024-07-02T10:00:00", "download_url": "/api/x"},
                {"type": "weird", "size": 10, "created": "2024-07-02T10:00:00"}
            ], "total": 2}"#,
        )
        .unwrap();
        assert_eq!(listing.reports.len(), 2);
        assert_eq!(listing.reports[0].report_type, ReportType::Dashboard);
        assert_eq!(
            listing.reports[1].report_type,
            ReportType::Other("weird".into())
        );
    }
}
