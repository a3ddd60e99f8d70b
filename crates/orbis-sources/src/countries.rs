//! Country-facts gateway over the REST Countries v2 API.

use orbis_core::{
  SourceName, SourceUnavailable,
  country::RawCountryFact,
  source::SourceGateway,
};
use serde::Deserialize;
use tracing::debug;

use crate::client::{JsonSource, SourceConfig};

/// Default upstream URL, restricted to the fields we read.
pub const DEFAULT_URL: &str =
  "https://restcountries.com/v2/all?fields=name,capital,region,population,flag,currencies";

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct WireCountry {
  name:       Option<String>,
  capital:    Option<String>,
  region:     Option<String>,
  population: Option<u64>,
  #[serde(default)]
  currencies: Option<Vec<WireCurrency>>,
  flag:       Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireCurrency {
  code: Option<String>,
}

impl WireCountry {
  /// Narrow to a [`RawCountryFact`]. Entries without a name, or without a
  /// population that fits a SQLite integer, cannot be reconciled and are
  /// dropped.
  fn into_fact(self) -> Option<RawCountryFact> {
    let name = self.name.filter(|n| !n.trim().is_empty())?;
    let population = self.population.filter(|&p| i64::try_from(p).is_ok())?;
    let currency_code = self
      .currencies
      .and_then(|cs| cs.into_iter().next())
      .and_then(|c| c.code)
      .filter(|code| !code.is_empty());

    Some(RawCountryFact {
      name,
      capital: self.capital,
      region: self.region,
      population,
      currency_code,
      flag_url: self.flag,
    })
  }
}

// ─── Gateway ─────────────────────────────────────────────────────────────────

/// Fetches the full country list. An empty list is a failure, not an empty
/// success.
#[derive(Clone)]
pub struct CountriesGateway {
  source: JsonSource,
}

impl CountriesGateway {
  pub fn new(config: SourceConfig) -> Result<Self, SourceUnavailable> {
    Ok(Self { source: JsonSource::new(SourceName::CountryFacts, config)? })
  }
}

impl SourceGateway for CountriesGateway {
  type Dataset = Vec<RawCountryFact>;

  fn name(&self) -> SourceName { self.source.name() }

  async fn fetch(&self) -> Result<Vec<RawCountryFact>, SourceUnavailable> {
    let wire: Vec<WireCountry> = self.source.get_json().await?;
    let received = wire.len();

    let facts: Vec<RawCountryFact> = wire.into_iter().filter_map(WireCountry::into_fact).collect();
    debug!(received, kept = facts.len(), "decoded country facts");

    if facts.is_empty() {
      return Err(self.source.unavailable("no countries in response"));
    }
    Ok(facts)
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

  async fn gateway(server: &MockServer, timeout_ms: u64) -> CountriesGateway {
    CountriesGateway::new(SourceConfig::new(format!("{}/v2/all", server.uri()), timeout_ms))
      .unwrap()
  }

  #[tokio::test]
  async fn decodes_first_currency_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/v2/all"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!([
        {
          "name": "Testland",
          "capital": "Test City",
          "region": "Nowhere",
          "population": 1000,
          "currencies": [{ "code": "TST", "name": "Test" }, { "code": "USD" }],
          "flag": "https://flags.example/tst.svg"
        },
        { "name": "Cashless", "population": 5 },
        { "name": "Blank", "population": 7, "currencies": [{ "name": "no code" }] }
      ])))
      .mount(&server)
      .await;

    let facts = gateway(&server, 1_000).await.fetch().await.unwrap();

    assert_eq!(facts.len(), 3);
    assert_eq!(facts[0].name, "Testland");
    assert_eq!(facts[0].currency_code.as_deref(), Some("TST"));
    assert_eq!(facts[0].capital.as_deref(), Some("Test City"));
    assert_eq!(facts[0].flag_url.as_deref(), Some("https://flags.example/tst.svg"));
    assert_eq!(facts[1].currency_code, None);
    assert_eq!(facts[2].currency_code, None);
  }

  #[tokio::test]
  async fn entries_without_name_are_dropped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!([
        { "population": 10 },
        { "name": "Kept", "population": 10 }
      ])))
      .mount(&server)
      .await;

    let facts = gateway(&server, 1_000).await.fetch().await.unwrap();
    assert_eq!(facts.len(), 1);
    assert_eq!(facts[0].name, "Kept");
  }

  #[tokio::test]
  async fn out_of_range_population_is_dropped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!([
        { "name": "Overflow", "population": u64::MAX },
        { "name": "Kept", "population": i64::MAX }
      ])))
      .mount(&server)
      .await;

    let facts = gateway(&server, 1_000).await.fetch().await.unwrap();
    assert_eq!(facts.len(), 1);
    assert_eq!(facts[0].name, "Kept");
  }

  #[tokio::test]
  async fn empty_list_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
      .mount(&server)
      .await;

    let err = gateway(&server, 1_000).await.fetch().await.unwrap_err();
    assert_eq!(err.source_name, SourceName::CountryFacts);
  }

  #[tokio::test]
  async fn server_error_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .respond_with(ResponseTemplate::new(502))
      .mount(&server)
      .await;

    let err = gateway(&server, 1_000).await.fetch().await.unwrap_err();
    assert_eq!(err.source_name, SourceName::CountryFacts);
    assert!(err.reason.contains("502"), "{}", err.reason);
  }

  #[tokio::test]
  async fn malformed_body_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
      .mount(&server)
      .await;

    let err = gateway(&server, 1_000).await.fetch().await.unwrap_err();
    assert_eq!(err.source_name, SourceName::CountryFacts);
  }

  #[tokio::test]
  async fn slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .respond_with(
        ResponseTemplate::new(200)
          .set_body_json(json!([{ "name": "Late", "population": 1 }]))
          .set_delay(Duration::from_millis(500)),
      )
      .mount(&server)
      .await;

    let err = gateway(&server, 50).await.fetch().await.unwrap_err();
    assert_eq!(err.source_name, SourceName::CountryFacts);
  }
}
