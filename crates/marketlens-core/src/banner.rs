//! Transient notification banner.
//!
//! The page has exactly one banner slot: showing a new banner evicts the old
//! one, and each banner expires after [`BANNER_TTL`].

use serde::Serialize;
use std::time::{Duration, Instant};

pub const BANNER_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BannerKind {
    Success,
    Info,
    Warning,
    Error,
}

impl BannerKind {
    pub fn css_class(self) -> &'static str {
        match self {
            BannerKind::Success => "alert-success",
            BannerKind::Info => "alert-info",
            BannerKind::Warning => "alert-warning",
            BannerKind::Error => "alert-error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
    shown_at: Instant,
    ttl: Duration,
}

impl Banner {
    pub fn new(kind: BannerKind, message: impl Into<String>) -> Self {
        Self::at(kind, message, Instant::now())
    }

    pub fn at(kind: BannerKind, message: impl Into<String>, shown_at: Instant) -> Self {
        Self {
            kind,
            message: message.into(),
            shown_at,
            ttl: BANNER_TTL,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= self.ttl
    }
}
