//! ekms-server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) plus `EKMS_*`
//! environment overrides, opens the SQLite document store, and serves the
//! JSON API over HTTP until SIGINT or SIGTERM.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use ekms_api::AppState;
use ekms_server::{ServerConfig, app, open_store};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "EKMS record server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;

  let store = open_store(&server_cfg.store_uri)
    .await
    .with_context(|| format!("failed to open store at {:?}", server_cfg.store_uri))?;

  let state = AppState::new(Arc::new(store)).with_store_timeout(server_cfg.store_timeout());
  let router = app(state, &server_cfg);
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, router)
    .with_graceful_shutdown(wait_for_shutdown_signal())
    .await
    .context("server error")?;

  tracing::info!("Shut down cleanly");
  Ok(())
}

async fn wait_for_shutdown_signal() {
  #[cfg(unix)]
  {
    use tokio::signal::unix::{SignalKind, signal};
    let (Ok(mut sigterm), Ok(mut sigint)) =
      (signal(SignalKind::terminate()), signal(SignalKind::interrupt()))
    else {
      tracing::warn!("could not install signal handlers; falling back to ctrl-c");
      let _ = tokio::signal::ctrl_c().await;
      return;
    };
    tokio::select! {
      _ = sigterm.recv() => {}
      _ = sigint.recv() => {}
    }
  }
  #[cfg(not(unix))]
  {
    let _ = tokio::signal::ctrl_c().await;
  }
}
