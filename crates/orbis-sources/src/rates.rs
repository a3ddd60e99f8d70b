//! Exchange-rate gateway over the open.er-api.com `latest` endpoint.

use std::collections::HashMap;

use chrono::Utc;
use orbis_core::{
  SourceName, SourceUnavailable,
  country::ExchangeRateSnapshot,
  source::SourceGateway,
};
use serde::Deserialize;
use tracing::debug;

use crate::client::{JsonSource, SourceConfig};

pub const DEFAULT_URL: &str = "https://open.er-api.com/v6/latest/USD";

#[derive(Debug, Deserialize)]
struct WireRates {
  /// `"success"` or `"error"`.
  result:    Option<String>,
  base_code: Option<String>,
  rates:     Option<HashMap<String, f64>>,
}

/// Fetches the latest rate table. A response without a `rates` object is a
/// failure.
#[derive(Clone)]
pub struct ExchangeRatesGateway {
  source: JsonSource,
}

impl ExchangeRatesGateway {
  pub fn new(config: SourceConfig) -> Result<Self, SourceUnavailable> {
    Ok(Self { source: JsonSource::new(SourceName::ExchangeRate, config)? })
  }
}

impl SourceGateway for ExchangeRatesGateway {
  type Dataset = ExchangeRateSnapshot;

  fn name(&self) -> SourceName { self.source.name() }

  async fn fetch(&self) -> Result<ExchangeRateSnapshot, SourceUnavailable> {
    let wire: WireRates = self.source.get_json().await?;

    if wire.result.as_deref() == Some("error") {
      return Err(self.source.unavailable("upstream reported an error result"));
    }
    let rates = wire
      .rates
      .filter(|r| !r.is_empty())
      .ok_or_else(|| self.source.unavailable("response has no rates"))?;
    debug!(rates = rates.len(), "decoded exchange rates");

    Ok(ExchangeRateSnapshot {
      base_code: wire.base_code.unwrap_or_else(|| "USD".to_owned()),
      rates,
      retrieved_at: Utc::now(),
    })
  }
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use serde_json::json;
  use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
  };

  use super::*;

  async fn gateway(server: &MockServer, timeout_ms: u64) -> ExchangeRatesGateway {
    ExchangeRatesGateway::new(SourceConfig::new(
      format!("{}/v6/latest/USD", server.uri()),
      timeout_ms,
    ))
    .unwrap()
  }

  #[tokio::test]
  async fn decodes_rate_table() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/v6/latest/USD"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({
        "result": "success",
        "base_code": "USD",
        "time_last_update_unix": 1_700_000_000,
        "rates": { "USD": 1, "TST": 2.0, "NGN": 1600.5 }
      })))
      .mount(&server)
      .await;

    let snapshot = gateway(&server, 1_000).await.fetch().await.unwrap();

    assert_eq!(snapshot.base_code, "USD");
    assert_eq!(snapshot.rate_for("TST"), Some(2.0));
    assert_eq!(snapshot.rate_for("NGN"), Some(1600.5));
    assert_eq!(snapshot.rate_for("XXX"), None);
  }

  #[tokio::test]
  async fn missing_rates_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": "success" })))
      .mount(&server)
      .await;

    let err = gateway(&server, 1_000).await.fetch().await.unwrap_err();
    assert_eq!(err.source_name, SourceName::ExchangeRate);
  }

  #[tokio::test]
  async fn error_result_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({
        "result": "error",
        "error-type": "unsupported-code"
      })))
      .mount(&server)
      .await;

    let err = gateway(&server, 1_000).await.fetch().await.unwrap_err();
    assert_eq!(err.source_name, SourceName::ExchangeRate);
  }

  #[tokio::test]
  async fn slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .respond_with(
        ResponseTemplate::new(200)
          .set_body_json(json!({ "rates": { "TST": 2.0 } }))
          .set_delay(Duration::from_millis(500)),
      )
      .mount(&server)
      .await;

    let err = gateway(&server, 50).await.fetch().await.unwrap_err();
    assert_eq!(err.source_name, SourceName::ExchangeRate);
    assert!(err.to_string().contains("exchange-rate"), "{err}");
  }
}
