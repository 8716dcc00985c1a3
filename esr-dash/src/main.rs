//! esr-dash - survey dashboard service
//!
//! Serves filtered descriptive statistics of the relationship survey over
//! HTTP. A data file can be preloaded at startup; clients may upload a
//! replacement at any time.

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::signal;
use tracing::{error, info, warn};

use esr_common::config::{self, TomlConfig};
use esr_dash::dataset::Dataset;
use esr_dash::{build_router, AppState};

#[derive(Parser, Debug)]
#[command(name = "esr-dash")]
#[command(about = "Survey dashboard statistics service")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "ESR_PORT")]
    port: Option<u16>,

    /// Address to bind
    #[arg(long, env = "ESR_BIND_ADDRESS")]
    bind: Option<String>,

    /// Survey file to preload (xlsx, xls, ods or delimited text)
    #[arg(short, long)]
    data_file: Option<PathBuf>,

    /// TOML config file (default: <config dir>/esr/esr-dash.toml)
    #[arg(short, long, env = "ESR_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args.config.clone().or_else(config::default_config_path);
    let toml = TomlConfig::load_or_default(config_path.as_deref())
        .context("Failed to load configuration")?;

    // RUST_LOG wins over the configured level
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&toml.logging.level)),
        )
        .init();

    info!(
        "Starting ESR Dashboard (esr-dash) v{}",
        env!("CARGO_PKG_VERSION")
    );
    match &config_path {
        Some(path) if path.exists() => info!("Config file: {}", path.display()),
        Some(path) => warn!("Config file {} not found, using defaults", path.display()),
        None => warn!("No config directory on this platform, using defaults"),
    }

    let state = AppState::new();

    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    match config::resolve_data_file(args.data_file.as_deref(), &toml, &cwd) {
        Some(path) => preload(&state, &path).await,
        None => info!("No data file configured; waiting for an upload"),
    }

    let port = args.port.unwrap_or(toml.port);
    let bind = args.bind.unwrap_or(toml.bind_address);
    let addr: SocketAddr = format!("{}:{}", bind, port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", bind, port))?;

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("esr-dash listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Load the startup data file; failure leaves the service running empty
async fn preload(state: &AppState, path: &std::path::Path) {
    info!("Preloading {}", path.display());
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(String::from);

    let loaded = match tokio::fs::read(path).await {
        Ok(bytes) => Dataset::from_bytes(&bytes, name.as_deref()),
        Err(e) => {
            error!("Cannot read {}: {}", path.display(), e);
            return;
        }
    };

    match loaded {
        Ok(dataset) => {
            state.replace_dataset(dataset).await;
        }
        Err(e) => error!("Preload of {} failed: {}", path.display(), e),
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
