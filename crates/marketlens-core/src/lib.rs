//! Domain types for the MarketLens analysis front-end.
//!
//! Everything here is transport- and rendering-agnostic: form validation,
//! progress bookkeeping, the typed analysis projection, report lookups and
//! export rules.

pub mod analysis;
pub mod banner;
pub mod error;
pub mod export;
pub mod form;
pub mod format;
pub mod progress;
pub mod report;
pub mod session;
pub mod status;
pub mod upload;

// Re-export common error type
pub use error::{FieldError, LensError, Result};
pub use session::{SessionId, SessionPolicy};
