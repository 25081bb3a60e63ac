use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

mod api;
mod config;
mod middleware;

use config::{AppState, Secrets, ServerConfig};

#[derive(Parser, Debug)]
#[command(name = "devroast")]
#[command(about = "MCP server that fetches and roasts GitHub and LeetCode profiles", long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "DEVROAST_CONFIG", default_value = "devroast.toml")]
    config: PathBuf,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "8086")]
    port: u16,

    /// Host to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Emit logs as JSON lines
    #[arg(long, env = "DEVROAST_LOG_JSON")]
    log_json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Pull AUTH_TOKEN and friends from .env before clap reads its env fallbacks
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "devroast=info,tower_http=debug".into());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_file(true)
        .with_line_number(true);
    if args.log_json {
        builder.json().init();
    } else {
        builder.init();
    }

    tracing::info!("Starting devroast MCP server");

    let config = ServerConfig::load(&args.config)?;
    let secrets = Secrets::from_env()?;
    let state = AppState::new(&config, secrets)?;

    let addr = format!("{}:{}", args.host, args.port);
    tracing::info!("Starting API server on {}", addr);

    api::serve(&addr, state).await?;

    Ok(())
}
