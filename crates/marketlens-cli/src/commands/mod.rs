pub mod analyze;
pub mod context;
pub mod render;
pub mod reports;
pub mod status;
