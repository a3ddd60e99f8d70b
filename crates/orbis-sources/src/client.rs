//! Shared HTTP plumbing for the source gateways.

use std::time::Duration;

use orbis_core::{SourceName, SourceUnavailable};
use reqwest::Client;
use serde::de::DeserializeOwned;

/// Connection settings for one upstream source.
#[derive(Debug, Clone)]
pub struct SourceConfig {
  pub url:     String,
  pub timeout: Duration,
}

impl SourceConfig {
  pub fn new(url: impl Into<String>, timeout_ms: u64) -> Self {
    Self { url: url.into(), timeout: Duration::from_millis(timeout_ms) }
  }
}

/// A single-URL JSON fetcher that reports every failure as
/// [`SourceUnavailable`] for its source.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub(crate) struct JsonSource {
  client: Client,
  config: SourceConfig,
  name:   SourceName,
}

impl JsonSource {
  pub(crate) fn new(name: SourceName, config: SourceConfig) -> Result<Self, SourceUnavailable> {
    let client = Client::builder()
      .timeout(config.timeout)
      .build()
      .map_err(|e| SourceUnavailable::new(name, format!("failed to build HTTP client: {e}")))?;
    Ok(Self { client, config, name })
  }

  pub(crate) fn name(&self) -> SourceName { self.name }

  pub(crate) fn unavailable(&self, reason: impl Into<String>) -> SourceUnavailable {
    SourceUnavailable::new(self.name, reason)
  }

  /// `GET <url>` and decode the body as `T`.
  pub(crate) async fn get_json<T: DeserializeOwned>(&self) -> Result<T, SourceUnavailable> {
    let url = &self.config.url;

    let resp = self.client.get(url).send().await.map_err(|e| {
      if e.is_timeout() {
        self.unavailable(format!("GET {url} timed out after {:?}", self.config.timeout))
      } else {
        self.unavailable(format!("GET {url} failed: {e}"))
      }
    })?;

    if !resp.status().is_success() {
      return Err(self.unavailable(format!("GET {url} → {}", resp.status())));
    }

    resp
      .json()
      .await
      .map_err(|e| self.unavailable(format!("decoding response from {url}: {e}")))
  }
}
