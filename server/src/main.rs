use anyhow::Result;
use axum::Router;
use clap::Parser;
use quarry_core::{EngineConfig, Strategy};
use quarry_server::build_app;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Directory of documents to index at startup
    #[arg(long, default_value = "./documents")]
    docs: PathBuf,
    /// Also index files in subdirectories
    #[arg(long, default_value_t = false)]
    recursive: bool,
    /// Default ranking strategy: frequency or discriminative
    #[arg(long, default_value_t = Strategy::Frequency)]
    strategy: Strategy,
    /// JSON file with engine settings
    #[arg(long)]
    config: Option<PathBuf>,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8000)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let config = match &args.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };
    let app: Router = build_app(&args.docs, args.recursive, args.strategy, config)?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
