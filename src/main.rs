//! In-memory REST model server.
//!
//! Loads a CSV dataset at startup and serves it as the `/models` collection.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌───────────────────────────────────────────────┐
//!                        │                 MODEL SERVER                  │
//!                        │                                               │
//!     Client Request     │  ┌─────────┐    ┌──────────┐    ┌──────────┐  │
//!     ───────────────────┼─▶│  http   │───▶│ routing  │───▶│ handlers │  │
//!                        │  │ server  │    │  table   │    │          │  │
//!                        │  └─────────┘    └──────────┘    └────┬─────┘  │
//!                        │                                      │        │
//!                        │                                      ▼        │
//!     Client Response    │  ┌──────────┐                  ┌──────────┐   │
//!     ◀──────────────────┼──│ response │◀─────────────────│  store   │◀──┼── CSV
//!                        │  │ encoder  │                  │ (memory) │   │   (startup)
//!                        │  └──────────┘                  └──────────┘   │
//!                        │                                               │
//!                        │  config · observability · lifecycle           │
//!                        └───────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use model_server::lifecycle::startup::{bind_listener, prepare_server, resolve_config};
use model_server::lifecycle::{Overrides, Shutdown, StartupError};
use model_server::observability::{init_logging, metrics};

#[derive(Parser)]
#[command(name = "model-server")]
#[command(about = "Serve a CSV dataset as an in-memory REST collection", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listening port (overrides config and PORT).
    #[arg(short, long)]
    port: Option<u16>,

    /// Dataset CSV (used as given, not relative to the executable).
    #[arg(short, long)]
    data: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let overrides = Overrides {
        config_path: cli.config,
        port: cli.port,
        data_path: cli.data,
    };

    let config = resolve_config(&overrides)?;
    init_logging(&config.observability).map_err(StartupError::from)?;

    tracing::info!("model-server v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address(),
        dataset = %config.dataset.path.display(),
        max_body_bytes = config.limits.max_body_bytes,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr).map_err(StartupError::from)?;
    }

    let listener_config = config.clone();
    let server = prepare_server(config)?;
    let listener = bind_listener(&listener_config).await?;
    tracing::info!(address = %listener.local_addr()?, "Server started");

    let shutdown = Shutdown::new();
    let _signals = shutdown.trigger_on_signal();
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
