mod config;
mod pr;
mod report;
mod validation;
mod webhook;

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Commit Validator — receives GitHub pull request webhooks, validates the
/// changed files, and reports the result as a commit status.
#[derive(Parser, Debug)]
#[command(name = "commit-validator", version, about)]
struct Cli {
    /// Path to the TOML config file (defaults to ./.commit-validator.toml)
    #[arg(short, long, env = "COMMIT_VALIDATOR_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind, overrides server.host
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on, overrides server.port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    info!("loading configuration");
    let mut config = config::Config::load(cli.config.as_deref())?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if config.github.token.is_none() {
        warn!("no GitHub token configured; status updates and closes will fail");
    }

    let client = pr::GitHubClient::new(&config.github)?;
    let processor = Arc::new(webhook::Processor::new(Arc::new(client), &config));
    let router = webhook::build_router(processor);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, api_url = %config.github.api_url, "server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
