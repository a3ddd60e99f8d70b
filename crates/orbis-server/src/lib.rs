//! Process wiring for the Orbis HTTP server.
//!
//! [`ServerConfig`] is deserialised from `config.toml` plus `ORBIS_*`
//! environment overrides; [`build_app`] turns it into a ready-to-serve axum
//! [`Router`] with the SQLite store, both HTTP gateways, and the PNG summary
//! wired into a [`Refresher`].

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use axum::Router;
use orbis_api::AppState;
use orbis_core::refresh::Refresher;
use orbis_sources::{CountriesGateway, ExchangeRatesGateway, SourceConfig};
use orbis_store_sqlite::SqliteStore;
use orbis_summary::PngSummary;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
  pub host:                  String,
  pub port:                  u16,
  /// SQLite database file. A leading `~/` is expanded.
  pub store_path:            PathBuf,
  pub countries_api_url:     String,
  pub exchange_rate_api_url: String,
  /// Per-request timeout for both upstream sources.
  pub request_timeout_ms:    u64,
  pub summary_image_path:    PathBuf,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                  "127.0.0.1".to_string(),
      port:                  3000,
      store_path:            PathBuf::from("orbis.db"),
      countries_api_url:     orbis_sources::countries::DEFAULT_URL.to_string(),
      exchange_rate_api_url: orbis_sources::rates::DEFAULT_URL.to_string(),
      request_timeout_ms:    10_000,
      summary_image_path:    PathBuf::from("cache/summary.png"),
    }
  }
}

impl ServerConfig {
  /// Layer the optional TOML file at `path` under `ORBIS_*` env variables.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("ORBIS"))
      .build()
      .context("failed to read config file")?
      .try_deserialize()
      .context("failed to deserialise ServerConfig")
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Wiring ───────────────────────────────────────────────────────────────────

/// Open the store and assemble the full application router.
pub async fn build_app(cfg: &ServerConfig) -> anyhow::Result<Router> {
  let store_path = expand_tilde(&cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  let store = Arc::new(store);

  let countries = CountriesGateway::new(SourceConfig::new(
    cfg.countries_api_url.clone(),
    cfg.request_timeout_ms,
  ))
  .context("failed to build country facts client")?;
  let rates = ExchangeRatesGateway::new(SourceConfig::new(
    cfg.exchange_rate_api_url.clone(),
    cfg.request_timeout_ms,
  ))
  .context("failed to build exchange rate client")?;

  let summary_path = expand_tilde(&cfg.summary_image_path);
  let refresher = Refresher::new(
    store.clone(),
    countries,
    rates,
    PngSummary::new(&summary_path),
  );

  let state = AppState {
    store,
    refresher: Arc::new(refresher),
    summary_path: Arc::new(summary_path),
  };

  Ok(orbis_api::router(state).layer(TraceLayer::new_for_http()))
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

#[cfg(test)]
mod tests {
  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use tower::ServiceExt as _;

  use super::*;

  #[test]
  fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = ServerConfig::load(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(cfg.port, 3000);
    assert_eq!(cfg.request_timeout_ms, 10_000);
    assert_eq!(cfg.summary_image_path, PathBuf::from("cache/summary.png"));
  }

  #[test]
  fn file_overrides_only_named_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "port = 8080\nstore_path = \"/tmp/o.db\"\n").unwrap();

    let cfg = ServerConfig::load(&path).unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.store_path, PathBuf::from("/tmp/o.db"));
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.address(), "127.0.0.1:8080");
  }

  #[test]
  fn tilde_expansion() {
    let home = std::env::var("HOME").unwrap_or_default();
    if home.is_empty() {
      return;
    }
    assert_eq!(expand_tilde(Path::new("~/x.db")), PathBuf::from(&home).join("x.db"));
    assert_eq!(expand_tilde(Path::new("/abs/x.db")), PathBuf::from("/abs/x.db"));
  }

  #[tokio::test]
  async fn built_app_serves_status() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = ServerConfig {
      store_path: dir.path().join("orbis.db"),
      summary_image_path: dir.path().join("summary.png"),
      ..ServerConfig::default()
    };

    let app = build_app(&cfg).await.unwrap();
    let resp = app
      .oneshot(Request::builder().uri("/status").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
  }
}
