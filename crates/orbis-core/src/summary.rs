//! The summary artifact: total country count plus a top-N ranking by
//! estimated GDP, regenerated after every successful refresh.

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::country::CountryRecord;

/// Number of countries shown in the ranking.
pub const TOP_N: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct GdpRank {
  pub name:          String,
  pub estimated_gdp: f64,
}

/// Input to [`SummaryArtifact::generate`].
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
  pub total_countries:   u64,
  /// At most [`TOP_N`] entries, highest estimated GDP first.
  pub top_by_gdp:        Vec<GdpRank>,
  pub last_refreshed_at: DateTime<Utc>,
}

impl Summary {
  /// Build a summary reporting `total_countries`, ranking the top entries of
  /// `records`. `records` need not be sorted.
  pub fn new(
    total_countries: u64,
    records: &[CountryRecord],
    last_refreshed_at: DateTime<Utc>,
  ) -> Self {
    let mut ranked: Vec<&CountryRecord> = records.iter().collect();
    ranked.sort_by(|a, b| b.estimated_gdp.total_cmp(&a.estimated_gdp));

    Self {
      total_countries,
      top_by_gdp: ranked
        .into_iter()
        .take(TOP_N)
        .map(|r| GdpRank { name: r.name.clone(), estimated_gdp: r.estimated_gdp })
        .collect(),
      last_refreshed_at,
    }
  }
}

/// A best-effort renderer/persister for the summary.
pub trait SummaryArtifact: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn generate<'a>(
    &'a self,
    summary: &'a Summary,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}

#[cfg(test)]
mod tests {
  use super::*;

  fn record(name: &str, gdp: f64) -> CountryRecord {
    CountryRecord {
      id: 0,
      name: name.into(),
      capital: None,
      region: None,
      population: 1,
      currency_code: "AAA".into(),
      exchange_rate: 1.0,
      estimated_gdp: gdp,
      flag_url: None,
      last_refreshed_at: Utc::now(),
    }
  }

  #[test]
  fn keeps_top_five_highest_first() {
    let records: Vec<_> = (1..=7).map(|i| record(&format!("C{i}"), f64::from(i))).collect();
    let summary = Summary::new(7, &records, Utc::now());

    assert_eq!(summary.total_countries, 7);
    let names: Vec<_> = summary.top_by_gdp.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["C7", "C6", "C5", "C4", "C3"]);
  }

  #[test]
  fn fewer_than_five_records() {
    let summary = Summary::new(1, &[record("Solo", 10.0)], Utc::now());
    assert_eq!(summary.total_countries, 1);
    assert_eq!(summary.top_by_gdp.len(), 1);
  }

  #[test]
  fn total_is_independent_of_ranking_pool() {
    let records = [record("Fresh", 1.0), record("Stale", 2.0)];
    let summary = Summary::new(1, &records, Utc::now());
    assert_eq!(summary.total_countries, 1);
    assert_eq!(summary.top_by_gdp[0].name, "Stale");
  }
}
