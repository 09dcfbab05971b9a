//! Result rendering for MarketLens.
//!
//! Section renderers in [`sections`] are pure functions from typed analysis
//! data to [`Fragment`]s. [`paint`] applies them to a [`Page`], and
//! [`PageShell`] serializes the page to HTML.

pub mod fragment;
pub mod page;
pub mod paint;
pub mod sections;
pub mod shell;

pub use fragment::{Element, Fragment, Node, html_escape};
pub use page::{ContainerId, Page};
pub use paint::{paint_analysis, paint_reports, paint_status, paint_uploads};
pub use shell::PageShell;
