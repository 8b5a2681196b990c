//! Compliment streaming proxy.
//!
//! Serves the compliment web UI and streams generated text from an
//! upstream chat-completion API to the browser.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────────────────────────────┐
//!                 │                  COMPLIMENT PROXY                     │
//!                 │                                                       │
//!  POST /api/     │  ┌────────┐   ┌────────┐   ┌──────────┐              │
//!  generate-      │  │  http  │──▶│ prompt │──▶│ upstream │──────────────┼──▶ LLM API
//!  compliment ────┼─▶│handler │   │builder │   │  client  │              │
//!                 │  └────────┘   └────────┘   └────┬─────┘              │
//!                 │                                  │ bytes              │
//!                 │                                  ▼                    │
//!  SSE frames     │  ┌──────────────────────────────────────────────┐    │
//!  ◀──────────────┼──│ streaming: framer → delta → frame (relay)    │◀───┼─── data: {...}
//!                 │  └──────────────────────────────────────────────┘    │
//!                 │                                                       │
//!                 │  config · observability · lifecycle                   │
//!                 └──────────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use compliment_proxy::config;
use compliment_proxy::lifecycle::{wait_for_signal, Shutdown};
use compliment_proxy::observability::{logging, metrics};
use compliment_proxy::HttpServer;

#[derive(Parser)]
#[command(name = "compliment-proxy")]
#[command(about = "Streams generated compliments from an LLM API to the web UI", long_about = None)]
struct Args {
    /// Optional TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory of the bundled UI (overrides the config file).
    #[arg(long)]
    static_dir: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = config::load(args.config.as_deref())?;
    if let Some(dir) = args.static_dir {
        config.static_assets.dir = Some(dir);
    }

    logging::init_logging(&config.observability);

    tracing::info!("compliment-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        model = %config.upstream.model,
        credential_present = config.upstream.api_key.is_some(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    let signal = shutdown.subscribe();

    tokio::spawn(async move {
        wait_for_signal(&shutdown).await;
    });

    server.run(listener, signal).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
