use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

use commands::analyze::AnalyzeArgs;
use commands::context::GlobalArgs;

#[derive(Parser)]
#[command(name = "marketlens")]
#[command(about = "MarketLens - market analysis front-end", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit an analysis request and render the result page
    Analyze(AnalyzeArgs),
    /// Show backend health and provider availability
    Status,
    /// List consolidated reports for a session
    Reports {
        #[arg(long)]
        session: String,
    },
    /// Download a consolidated report
    Download {
        #[arg(long)]
        session: String,
        /// Report type (executive, technical, dashboard, ...)
        #[arg(long = "type")]
        report_type: String,
    },
    /// Print the viewer URL of the dashboard report
    View {
        #[arg(long)]
        session: String,
        #[arg(long = "type", default_value = "dashboard")]
        report_type: String,
    },
    /// Render a saved analysis JSON file to HTML, offline
    Render {
        input: PathBuf,
        #[arg(long, short)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("marketlens=info")),
        )
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();
    let config = cli.global.load_config()?;

    match cli.command {
        Commands::Analyze(args) => commands::analyze::run(config, args).await?,
        Commands::Status => commands::status::run(config).await?,
        Commands::Reports { session } => commands::reports::list(config, &session).await?,
        Commands::Download {
            session,
            report_type,
        } => commands::reports::download(config, &session, &report_type).await?,
        Commands::View {
            session,
            report_type,
        } => commands::reports::view(config, &session, &report_type).await?,
        Commands::Render { input, out } => commands::render::run(&input, out.as_deref())?,
    }

    Ok(())
}
