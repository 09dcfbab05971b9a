//! Offline rendering of a saved analysis document.

use anyhow::{Context, Result};
use marketlens_core::analysis::AnalysisDocument;
use marketlens_render::{Page, paint_analysis};
use serde_json::Value;
use std::path::{Path, PathBuf};

use super::context::write_page;

pub fn run(input: &Path, out: Option<&Path>) -> Result<()> {
    let path = render_file(input, out)?;
    println!("Page written to {}", path.display());
    Ok(())
}

fn render_file(input: &Path, out: Option<&Path>) -> Result<PathBuf> {
    let content =
        std::fs::read_to_string(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let raw: Value = serde_json::from_str(&content)
        .with_context(|| format!("{} is not valid JSON", input.display()))?;

    let document = AnalysisDocument::from_value(raw);
    if document.is_empty() {
        tracing::warn!("[Render] {} has no renderable sections", input.display());
    }

    let mut page = Page::new();
    paint_analysis(&mut page, &document);

    let out = out
        .map(Path::to_path_buf)
        .unwrap_or_else(|| input.with_extension("html"));
    write_page(&page, &out)
}
