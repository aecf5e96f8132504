//! Process wiring for the EKMS server: configuration, store selection, and
//! the HTTP middleware stack around [`ekms_api::api_router`].

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use axum::{Router, http::StatusCode};
use ekms_api::{AppState, api_router};
use ekms_core::store::RecordStore;
use ekms_store_sqlite::SqliteStore;
use serde::Deserialize;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// `store_uri` value selecting a throwaway in-memory database.
pub const IN_MEMORY: &str = ":memory:";

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `EKMS_*` environment variables. Every field has a default.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
  pub host:                 String,
  pub port:                 u16,
  pub store_uri:            String,
  pub store_timeout_ms:     u64,
  pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                 "0.0.0.0".into(),
      port:                 8080,
      store_uri:            "ekms.sqlite3".into(),
      store_timeout_ms:     5000,
      request_timeout_secs: 30,
    }
  }
}

impl ServerConfig {
  /// Layer the optional TOML file at `path` under `EKMS_*` variables.
  pub fn load(path: impl Into<PathBuf>) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path.into()).required(false))
      .add_source(config::Environment::with_prefix("EKMS"))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn store_timeout(&self) -> Duration { Duration::from_millis(self.store_timeout_ms) }

  pub fn request_timeout(&self) -> Duration { Duration::from_secs(self.request_timeout_secs) }
}

// ─── Store ────────────────────────────────────────────────────────────────────

/// Open the document store named by `uri`.
pub async fn open_store(uri: &str) -> ekms_store_sqlite::Result<SqliteStore> {
  if uri == IN_MEMORY {
    return SqliteStore::open_in_memory().await;
  }
  SqliteStore::open(expand_tilde(Path::new(uri))).await
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Application ──────────────────────────────────────────────────────────────

/// The API router wrapped in request tracing and the request timeout.
pub fn app<S: RecordStore>(state: AppState<S>, config: &ServerConfig) -> Router {
  api_router(state)
    .layer(TimeoutLayer::with_status_code(
      StatusCode::REQUEST_TIMEOUT,
      config.request_timeout(),
    ))
    .layer(TraceLayer::new_for_http())
}
