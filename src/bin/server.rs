//! Standalone relay server (without the Dioxus frontend)
//!
//! Serves the relay routes and, as a fallback, static files from
//! `--static-dir`. Run with: GEMINI_API_KEY=... cargo run --bin server

use std::net::SocketAddr;

use anyhow::Context;
use clap::Parser;
use tower_http::services::ServeDir;

use gemini_chat_relay::config::RelayConfig;
use gemini_chat_relay::handlers::{RelayState, relay_router};

#[derive(Parser, Debug)]
#[command(name = "server", about = "Streaming relay between the browser and Gemini")]
struct Args {
    /// Port to listen on (overrides PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Generation model (overrides GEMINI_MODEL)
    #[arg(long)]
    model: Option<String>,

    /// Static assets directory (overrides STATIC_DIR)
    #[arg(long)]
    static_dir: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let mut config = RelayConfig::from_env()?;
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(model) = args.model {
        config.model = model;
    }
    if let Some(static_dir) = args.static_dir {
        config.static_dir = static_dir;
    }

    tracing::info!("Starting relay server (standalone)...");

    let state = RelayState::from_config(&config).context("failed to create Gemini provider")?;
    let app = relay_router(state).fallback_service(ServeDir::new(&config.static_dir));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
