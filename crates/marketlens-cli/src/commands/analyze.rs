use anyhow::{Context, Result, bail};
use clap::Args;
use marketlens_application::SubmitOutcome;
use marketlens_client::ClientConfig;
use marketlens_core::LensError;
use marketlens_core::form::{FormControl, FormInput, ValidationMode};
use std::path::PathBuf;

use super::context::{build_controller, write_page};

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Market segment (required)
    #[arg(long)]
    pub segment: String,

    #[arg(long)]
    pub product: Option<String>,

    #[arg(long)]
    pub price: Option<String>,

    #[arg(long)]
    pub audience: Option<String>,

    #[arg(long)]
    pub revenue_goal: Option<String>,

    #[arg(long)]
    pub marketing_budget: Option<String>,

    /// Extra form fields as key=value
    #[arg(long = "field", value_parser = parse_field)]
    pub fields: Vec<(String, String)>,

    /// Files to attach before submitting
    #[arg(long = "attach")]
    pub attachments: Vec<PathBuf>,

    /// Skip the placeholder-segment check
    #[arg(long)]
    pub basic: bool,

    /// Where to write the rendered page (default: <output-dir>/analysis.html)
    #[arg(long, short)]
    pub out: Option<PathBuf>,

    /// Also save the raw result as JSON
    #[arg(long)]
    pub json: bool,

    /// Also export a PDF when the result qualifies
    #[arg(long)]
    pub pdf: bool,
}

impl AnalyzeArgs {
    fn form(&self) -> FormInput {
        let optional = [
            ("product", &self.product),
            ("price", &self.price),
            ("target_audience", &self.audience),
            ("revenue_goal", &self.revenue_goal),
            ("marketing_budget", &self.marketing_budget),
        ];

        let mut form = FormInput::default().with(FormControl::new("segment", &self.segment).required());
        for (name, value) in optional {
            if let Some(value) = value {
                form = form.with(FormControl::new(name, value));
            }
        }
        for (name, value) in &self.fields {
            form = form.with(FormControl::new(name, value));
        }
        form
    }
}

fn parse_field(raw: &str) -> std::result::Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))
}

pub async fn run(mut config: ClientConfig, args: AnalyzeArgs) -> Result<()> {
    if args.basic {
        config.validation = ValidationMode::Basic;
    }
    let out = args
        .out
        .clone()
        .unwrap_or_else(|| config.output_dir.join("analysis.html"));

    let mut controller = build_controller(config, None)?;
    println!("Session: {}", controller.session_id());

    let status = controller.check_capabilities().await;
    tracing::info!(
        "[Analyze] {} provider(s) available",
        status.available_provider_count()
    );

    for path in &args.attachments {
        let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let file = controller.upload_attachment(&name, bytes).await?;
        println!("Attached {} ({})", file.name, file.size_label());
    }

    let outcome = controller.submit(&args.form()).await?;
    let page = controller.page();
    let written = write_page(&*page.lock().await, &out)?;

    match outcome {
        SubmitOutcome::Invalid(errors) => {
            for error in &errors {
                eprintln!("{}: {}", error.field, error.message);
            }
            return Err(LensError::Validation(errors).into());
        }
        SubmitOutcome::Failed { message } => bail!("{message}"),
        SubmitOutcome::Partial { message } => {
            eprintln!("Warning: analysis incomplete ({message}); partial data rendered");
        }
        SubmitOutcome::Completed => println!("Analysis complete"),
    }
    println!("Page written to {}", written.display());

    if args.json {
        let path = controller.save_json().await?;
        println!("JSON saved to {}", path.display());
    }
    if args.pdf {
        match controller.export_pdf().await {
            Ok(path) => println!("PDF saved to {}", path.display()),
            Err(e) => eprintln!("PDF not exported: {}", e.user_message()),
        }
    }
    Ok(())
}
