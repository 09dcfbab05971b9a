//! Shared command setup: configuration, controller wiring, page output.

use anyhow::{Context, Result};
use clap::Args;
use marketlens_application::{AnalysisController, FileSystemSink, Viewer};
use marketlens_client::{ClientConfig, HttpAnalysisApi};
use marketlens_core::SessionId;
use marketlens_render::{Page, PageShell};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const PAGE_TITLE: &str = "MarketLens - Market Analysis";

#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Configuration file (default: ~/.config/marketlens/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Directory for downloads and rendered pages
    #[arg(long, global = true)]
    pub output_dir: Option<PathBuf>,
}

impl GlobalArgs {
    /// Defaults, then config file, then environment, then flags.
    pub fn load_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let mut config = ClientConfig::from_file(path)
                    .with_context(|| format!("Failed to load {}", path.display()))?;
                config.apply_env();
                config
            }
            None => ClientConfig::load().context("Failed to load configuration")?,
        };

        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(output_dir) = &self.output_dir {
            config.output_dir = output_dir.clone();
        }
        tracing::debug!("[Config] Using backend {}", config.normalized_base_url());
        Ok(config)
    }
}

/// Prints viewer URLs instead of opening a browser.
pub struct PrintViewer;

impl Viewer for PrintViewer {
    fn open(&self, url: &str) -> marketlens_core::Result<()> {
        println!("{url}");
        Ok(())
    }
}

/// Wires the HTTP client, file sink and viewer. A `--session` value is
/// validated before it can reach URL paths or file names.
pub fn build_controller(config: ClientConfig, session: Option<&str>) -> Result<AnalysisController> {
    let session = session
        .map(SessionId::parse)
        .transpose()
        .context("Invalid --session")?;

    let api = Arc::new(HttpAnalysisApi::from_config(&config));
    let sink = Arc::new(FileSystemSink::new(config.output_dir.clone()));
    let controller = AnalysisController::new(api, config, sink, Arc::new(PrintViewer));
    Ok(match session {
        Some(id) => controller.with_session(id),
        None => controller,
    })
}

/// Serializes the page to `path` and returns the written path.
pub fn write_page(page: &Page, path: &Path) -> Result<PathBuf> {
    let html = PageShell::new(PAGE_TITLE)?.render(page)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, html).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path.to_path_buf())
}
