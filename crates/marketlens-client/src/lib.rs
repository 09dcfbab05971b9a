//! Backend access for MarketLens.
//!
//! [`AnalysisApi`] is the seam the application layer depends on;
//! [`HttpAnalysisApi`] is the reqwest implementation used in production.

pub mod api;
pub mod config;
pub mod http;

pub use api::{AnalysisApi, AnalyzeOutcome, GENERIC_FAILURE_MESSAGE};
pub use config::ClientConfig;
pub use http::HttpAnalysisApi;
