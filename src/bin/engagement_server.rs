//! Engagement intake server
//!
//! Serves the intake form and turns submissions into filled engagement letters.
//!
//! # Usage
//!
//! ```bash
//! # Serve on the configured address (default 127.0.0.1:5000)
//! engagement_server
//!
//! # Serve with a config file and a different template directory
//! engagement_server --config engagement.yaml --template-dir ./letters serve
//!
//! # Report which referenced templates are missing from disk
//! engagement_server check-templates
//!
//! # Print the artifact layout for an engagement
//! engagement_server artifacts --year 2025 --seq 7 --slug "Acme Holdings"
//! ```
//!
//! Environment:
//!   ENGAGEMENT_CONFIG       YAML config file
//!   ENGAGEMENT_BIND_ADDR    listen address
//!   ENGAGEMENT_TEMPLATE_DIR template directory
//!   ENGAGEMENT_OUTPUT_DIR   output directory

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use engagement_docgen::api::{create_router, AppState};
use engagement_docgen::config::AppConfig;
use engagement_docgen::storage::{engagement_artifacts, format_engagement_id};
use engagement_docgen::templates::TemplateDirectory;

#[derive(Parser)]
#[command(name = "engagement_server")]
#[command(version)]
#[command(about = "Engagement intake form and letter generator")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// YAML configuration file
    #[arg(long, short, global = true, env = "ENGAGEMENT_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address, overrides the config file
    #[arg(long, global = true, env = "ENGAGEMENT_BIND_ADDR")]
    bind: Option<String>,

    /// Template directory, overrides the config file
    #[arg(long, global = true, env = "ENGAGEMENT_TEMPLATE_DIR")]
    template_dir: Option<PathBuf>,

    /// Output directory, overrides the config file
    #[arg(long, global = true, env = "ENGAGEMENT_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default)
    Serve,
    /// List referenced templates and flag the ones missing from disk
    CheckTemplates,
    /// Print the artifact paths for an engagement as JSON
    Artifacts {
        #[arg(long)]
        year: i32,
        #[arg(long)]
        seq: u32,
        /// Free text, slugified before use
        #[arg(long)]
        slug: String,
        #[arg(long, default_value_t = 1)]
        version: u32,
    },
}

impl Cli {
    fn app_config(&self) -> Result<AppConfig> {
        let mut config = AppConfig::load(self.config.as_deref())?;
        if let Some(bind) = &self.bind {
            config.bind_addr = bind.clone();
        }
        if let Some(dir) = &self.template_dir {
            config.template_dir = dir.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "engagement_docgen=debug,engagement_server=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = cli.app_config()?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::CheckTemplates => check_templates(&config),
        Commands::Artifacts {
            year,
            seq,
            slug,
            version,
        } => {
            let engagement_id = format_engagement_id(year, seq, &slug);
            let artifacts = engagement_artifacts(&config.engagements_root, &engagement_id, version);
            println!("{}", serde_json::to_string_pretty(&artifacts)?);
            Ok(())
        }
    }
}

async fn serve(config: AppConfig) -> Result<()> {
    tracing::info!("Starting engagement intake server");
    tracing::info!("Templates: {}", config.template_dir.display());
    tracing::info!("Output: {}", config.output_dir.display());
    tracing::info!("Selection: {:?}", config.selection);

    let state = AppState::from_config(&config)?;
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;
    tracing::info!("Listening on http://{}", config.bind_addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

fn check_templates(config: &AppConfig) -> Result<()> {
    let directory = TemplateDirectory::new(&config.template_dir);
    let available = directory.available();
    let referenced = config.referenced_templates()?;

    let mut missing = 0;
    for name in &referenced {
        if available.contains(name) {
            println!("ok       {}", name);
        } else {
            println!("missing  {}", name);
            missing += 1;
        }
    }
    for name in available.iter().filter(|name| !referenced.contains(name)) {
        println!("unused   {}", name);
    }

    if missing > 0 {
        bail!(
            "{} of {} templates missing from {}",
            missing,
            referenced.len(),
            config.template_dir.display()
        );
    }
    Ok(())
}
