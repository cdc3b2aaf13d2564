use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod document;
mod docx;
mod error;
mod export;
mod extract;
mod fetch;
mod models;
mod render;
#[cfg(test)]
mod tests;

use api::AppState;
use export::Exporter;
use fetch::FetchConfig;
use render::Wkhtmltopdf;

/// Export a public webpage as a Word document and a PDF
#[derive(Parser, Debug)]
#[command(name = "webpage-exporter")]
#[command(about = "Serve a page that exports a URL to .docx and .pdf")]
struct Args {
    /// Host address to bind to
    #[arg(long, env = "WEBPAGE_EXPORTER_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "WEBPAGE_EXPORTER_PORT", default_value = "8000")]
    port: u16,

    /// Timeout for fetching the page, in seconds
    #[arg(long, env = "WEBPAGE_EXPORTER_FETCH_TIMEOUT", default_value = "20")]
    fetch_timeout_secs: u64,

    /// Path to the wkhtmltopdf binary
    #[arg(long, env = "WKHTMLTOPDF_PATH", default_value = "wkhtmltopdf")]
    wkhtmltopdf: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let fetch = FetchConfig {
        timeout: Duration::from_secs(args.fetch_timeout_secs),
    };
    let renderer = Arc::new(Wkhtmltopdf::new(&args.wkhtmltopdf));
    let state = AppState {
        exporter: Arc::new(Exporter::new(fetch, renderer)),
    };

    let listener = bind(&args.host, args.port).await?;
    info!("listening on http://{}", listener.local_addr()?);
    info!("fetch timeout: {}s", args.fetch_timeout_secs);
    info!("pdf renderer: {}", args.wkhtmltopdf.display());

    axum::serve(listener, api::router(state)).await?;

    Ok(())
}

/// Bind to a host name or IP literal; `[::1]`-style brackets are optional.
async fn bind(host: &str, port: u16) -> std::io::Result<TcpListener> {
    let host = host.trim_start_matches('[').trim_end_matches(']');
    TcpListener::bind((host, port)).await
}
