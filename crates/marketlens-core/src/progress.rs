//! Progress state reported by the backend while an analysis runs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Remaining-time estimate. Trackers send either display text or seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Eta {
    Seconds(f64),
    Text(String),
}

impl fmt::Display for Eta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Seconds(seconds) => {
                let total = seconds.max(0.0).round() as u64;
                match (total / 60, total % 60) {
                    (0, secs) => write!(f, "{secs}s"),
                    (mins, 0) => write!(f, "{mins}m"),
                    (mins, secs) => write!(f, "{mins}m {secs}s"),
                }
            }
        }
    }
}

/// Snapshot returned by `/api/get_progress/:session_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressState {
    #[serde(default)]
    pub current_step: u32,
    #[serde(default)]
    pub total_steps: u32,
    #[serde(default)]
    pub current_message: String,
    #[serde(default)]
    pub percentage: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_remaining: Option<Eta>,
    #[serde(default)]
    pub is_complete: bool,
}

impl ProgressState {
    pub fn new(current_step: u32, total_steps: u32, message: impl Into<String>) -> Self {
        let percentage = if total_steps == 0 {
            0.0
        } else {
            (current_step as f64 / total_steps as f64) * 100.0
        };
        Self {
            current_step,
            total_steps,
            current_message: message.into(),
            percentage,
            estimated_remaining: None,
            is_complete: false,
        }
    }

    /// Percentage clamped to `0..=100` for display.
    pub fn display_percentage(&self) -> f64 {
        self.percentage.clamp(0.0, 100.0)
    }
}

/// Wire envelope: `{"progress": {...}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProgressEnvelope {
    pub progress: Option<ProgressState>,
}

/// Result of feeding one snapshot into a [`ProgressMonitor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressUpdate {
    /// The snapshot moved forward (or repeated) and was accepted
    Applied,
    /// The snapshot went backwards and was dropped
    Regressed,
    /// The snapshot was accepted and reports completion
    Completed,
}

/// Guards the non-decreasing step invariant of the progress bar.
#[derive(Debug, Default)]
pub struct ProgressMonitor {
    last: Option<ProgressState>,
}

impl ProgressMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, next: ProgressState) -> ProgressUpdate {
        if let Some(last) = &self.last {
            if next.current_step < last.current_step || next.percentage < last.percentage {
                tracing::warn!(
                    target: "marketlens::progress",
                    "[Progress] Dropping regressing update: step {} -> {}, {:.1}% -> {:.1}%",
                    last.current_step,
                    next.current_step,
                    last.percentage,
                    next.percentage
                );
                return ProgressUpdate::Regressed;
            }
        }

        let complete = next.is_complete;
        self.last = Some(next);
        if complete {
            ProgressUpdate::Completed
        } else {
            ProgressUpdate::Applied
        }
    }

    pub fn current(&self) -> Option<&ProgressState> {
        self.last.as_ref()
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Canned step messages used when the server cannot track progress.
pub const LOCAL_STEPS: [&str; 13] = [
    "Validating input data...",
    "Preparing search queries...",
    "Searching market sources...",
    "Extracting page content...",
    "Synthesizing research...",
    "Building the avatar profile...",
    "Generating mental drivers...",
    "Creating visual proofs...",
    "Building the anti-objection system...",
    "Designing the pre-pitch...",
    "Projecting future scenarios...",
    "Generating consolidated reports...",
    "Finalizing analysis...",
];

/// Snapshot for step `index` (0-based) of the canned animation.
///
/// The last canned step stops short of 100%: only the real response
/// completes the bar.
pub fn local_step(index: usize) -> ProgressState {
    let total = LOCAL_STEPS.len();
    let clamped = index.min(total - 1);
    let mut state = ProgressState::new(clamped as u32 + 1, total as u32, LOCAL_STEPS[clamped]);
    state.percentage = state.percentage.min(95.0);
    state
}
