//! Full-page HTML serialization through a minijinja template.

use std::time::Instant;

use marketlens_core::{LensError, Result};
use minijinja::{Environment, Value, context};
use serde::Serialize;

use crate::page::{ContainerId, Page};
use crate::sections;

const PAGE_TEMPLATE_NAME: &str = "page.html";

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{ title }}</title>
</head>
<body>
<main class="container">
    {%- if banner %}
    <div class="alert {{ banner.class }}" role="alert">{{ banner.message }}</div>
    {%- endif %}
    <form id="analysisForm">
        {%- for error in errors %}
        <div class="field-error" data-field="{{ error.field }}">{{ error.message }}</div>
        {%- endfor %}
        <button type="submit" id="submitBtn"{% if not submit.enabled %} disabled{% endif %}>{{ submit.label }}</button>
    </form>
    {%- if progress_visible %}
    <section id="progressArea" class="progress-area">{{ progress }}</section>
    {%- endif %}
    {%- for section in chrome %}
    <section id="{{ section.id }}" class="panel"><h3>{{ section.title }}</h3>{{ section.body }}</section>
    {%- endfor %}
    {%- if results_visible %}
    <div id="results" class="results">
        {%- for section in results %}
        <section id="{{ section.id }}" class="result-section"><h3>{{ section.title }}</h3>{{ section.body }}</section>
        {%- endfor %}
        <div class="export-actions">
            <button id="saveJsonBtn" data-action="save-json">Save JSON</button>
            {%- if pdf_export_visible %}
            <button id="exportPdfBtn" data-action="export-pdf">Export PDF</button>
            {%- endif %}
        </div>
    </div>
    {%- endif %}
</main>
</body>
</html>
"#;

#[derive(Serialize)]
struct SectionView {
    id: &'static str,
    title: &'static str,
    body: Value,
}

#[derive(Serialize)]
struct BannerView {
    class: &'static str,
    message: String,
}

/// Renders a [`Page`] into a standalone HTML document.
pub struct PageShell {
    env: Environment<'static>,
    title: String,
}

impl PageShell {
    pub fn new(title: impl Into<String>) -> Result<Self> {
        let mut env = Environment::new();
        env.add_template(PAGE_TEMPLATE_NAME, PAGE_TEMPLATE)
            .map_err(template_error)?;
        Ok(Self {
            env,
            title: title.into(),
        })
    }

    pub fn render(&self, page: &Page) -> Result<String> {
        self.render_at(page, Instant::now())
    }

    /// Renders with banner expiry evaluated at `now`.
    pub fn render_at(&self, page: &Page, now: Instant) -> Result<String> {
        let mut chrome = Vec::new();
        let mut results = Vec::new();
        for (id, fragment) in page.containers() {
            let view = SectionView {
                id: id.dom_id(),
                title: id.title(),
                body: Value::from_safe_string(fragment.to_html()),
            };
            match id {
                ContainerId::Status | ContainerId::Uploads => chrome.push(view),
                _ => results.push(view),
            }
        }

        let banner = page.banner_at(now).map(|b| BannerView {
            class: b.kind.css_class(),
            message: b.message.clone(),
        });
        let progress = page
            .progress
            .state
            .as_ref()
            .map(|state| sections::progress(state).to_html())
            .unwrap_or_default();

        let template = self
            .env
            .get_template(PAGE_TEMPLATE_NAME)
            .map_err(template_error)?;
        template
            .render(context! {
                title => &self.title,
                banner => banner,
                errors => &page.form.errors,
                submit => &page.form.submit,
                progress_visible => page.progress.visible,
                progress => Value::from_safe_string(progress),
                chrome => chrome,
                results_visible => page.results_visible,
                results => results,
                pdf_export_visible => page.pdf_export_visible,
            })
            .map_err(template_error)
    }
}

fn template_error(err: minijinja::Error) -> LensError {
    LensError::Serialization {
        format: "HTML".to_string(),
        message: err.to_string(),
    }
}
