// Record Parser - Web Server
// REST API with Axum over an in-memory record collection

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::path::PathBuf;

use record_parser::api::{route_summary, router, AppState};
use record_parser::{AppConfig, LineParser, RecordCollection};

#[derive(Debug, Parser)]
#[command(name = "record-server", version = record_parser::VERSION)]
struct Cli {
    /// Input files loaded at startup (override the configured sources)
    files: Vec<PathBuf>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, e.g. 127.0.0.1:3000
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.override_sources(cli.files);
    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }

    let parser = LineParser::new();
    let collection = RecordCollection::create_from_sources(&config.line_sources(), &parser);
    let app = router(AppState::new(collection, parser));

    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("Failed to bind to address {}", config.server.bind))?;

    info!("Server running on http://{}", config.server.bind);
    info!("   API: {}", route_summary());

    axum::serve(listener, app)
        .await
        .context("Server stopped with an error")?;

    Ok(())
}
