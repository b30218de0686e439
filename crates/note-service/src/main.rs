//! Note sharing web service binary.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use note_service::config::Config;
use note_service::{AppState, app, generate_random_string};
use note_store::Store;

#[derive(Parser, Debug)]
#[command(name = "note-service")]
#[command(about = "Password-protectable, shareable plain-text/Markdown notes")]
struct Cli {
    /// Port to listen on
    #[arg(long, default_value_t = 3000, env = "NOTE_PORT")]
    port: u16,

    /// Address to bind to
    #[arg(long, default_value = "0.0.0.0", env = "NOTE_BIND")]
    bind: String,

    /// Path to the data directory (notes, share mappings, config)
    #[arg(long, default_value = "./data", env = "NOTE_DATA_PATH")]
    data_path: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "note_service=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = Config::load(&cli.data_path)?;
    let store = Store::open(cli.data_path.as_str())
        .with_context(|| format!("Failed to open store at {}", cli.data_path))?;

    let secret = match &config.secret {
        Some(s) => s.clone(),
        None => {
            tracing::warn!(
                "No signing secret configured; generated one for this run \
                 (auth cookies won't survive restarts)"
            );
            generate_random_string(48)
        }
    };

    let state = Arc::new(AppState {
        config,
        secret,
        store,
    });

    let addr: SocketAddr = format!("{}:{}", cli.bind, cli.port)
        .parse()
        .context("Invalid bind address")?;

    tracing::info!("Starting note-service on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Note service shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
