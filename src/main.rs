//! copilot: middleware dispatcher demo server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ axum fallback ──▶ routing::Router ──▶ layer 0 ──next──▶ layer 1 ──▶ ...
//!                     (request id,       (normalize path,     │                          │
//!                      timeout,           walk registry)      └── answers ◀──────────────┘
//!                      body limit)                                         │
//!     Client Response                                                      ▼
//!     ◀────────────── Response::finish ◀───────────── terminal (404 / error) on its own task
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tokio::net::TcpListener;

use copilot::config::{load_config, validate_config, AppConfig, ConfigError};
use copilot::demo::demo_router;
use copilot::lifecycle::signals::spawn_signal_listener;
use copilot::observability::init_logging;
use copilot::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "copilot")]
#[command(about = "Middleware dispatcher demo server", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address
    #[arg(short, long)]
    bind: Option<String>,

    /// Debug logging for this crate and tower-http (ignored when RUST_LOG is set)
    #[arg(short, long)]
    verbose: bool,
}

fn load(cli: &Cli) -> Result<AppConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };

    if let Some(bind) = &cli.bind {
        config.listener.bind_address = bind.clone();
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    Ok(config)
}

async fn serve(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        max_body_bytes = config.limits.max_body_bytes,
        static_routes = config.routes.len(),
        "Configuration loaded"
    );

    let router = demo_router(&config)?;
    tracing::info!(layers = router.layers().len(), "Router built");

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    spawn_signal_listener(&shutdown);

    HttpServer::new(config, router).run(listener, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("copilot: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_logging(&config.logging, cli.verbose);
    tracing::info!("copilot v{} starting", env!("CARGO_PKG_VERSION"));

    match serve(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Server failed");
            ExitCode::FAILURE
        }
    }
}
