//! bookshelf backend
//!
//! Serves the book collection at `/api/books`. Books live in memory unless
//! a data file is configured.

use std::path::PathBuf;

use bookshelf::{error::Result, models::Config, server};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "bookshelf-server", version, about = "Serve a REST book collection")]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "bookshelf.toml")]
    config: PathBuf,

    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to bind
    #[arg(short, long)]
    port: Option<u16>,

    /// JSON file to keep books in
    #[arg(short, long)]
    data_file: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long)]
    json: bool,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.json);

    let mut config = Config::load_or_default(&args.config).server;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(path) = args.data_file {
        config.data_file = Some(path);
    }

    let storage = server::open_storage(&config).await?;
    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
    server::serve(listener, storage, shutdown_signal()).await
}
