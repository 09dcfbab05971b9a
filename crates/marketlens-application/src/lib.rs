//! Application layer for MarketLens.
//!
//! [`AnalysisController`] ties the backend client, the page model and the
//! export services together. It replaces any global page state: callers own
//! one controller per page and pass it around by reference.

pub mod controller;
pub mod download;
pub mod export;
pub mod polling;
pub mod shortcuts;

#[cfg(test)]
mod testing;

pub use controller::{AnalysisController, LoadedAnalysis, SubmitOutcome};
pub use download::{Download, DownloadSink, FileSystemSink, ObjectUrl, ObjectUrlRegistry, Viewer};
pub use export::ExportService;
pub use polling::{MAX_CONSECUTIVE_FAILURES, PollingTask, ProgressStrategy};
pub use shortcuts::{KeyPress, Shortcut, ShortcutOutcome};
