//! Join country facts with exchange rates into priced candidates.
//!
//! A country is priced only when it reports a currency code *and* that code
//! has a usable rate. Everything else is dropped from the cycle; any record a
//! previous cycle stored for it is left untouched.

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::{
  country::{CandidateRecord, ExchangeRateSnapshot, RawCountryFact},
  gdp,
};

/// The pricing outcome for a single country fact.
#[derive(Debug, Clone, PartialEq)]
pub enum Pricing {
  Priced {
    currency_code: String,
    exchange_rate: f64,
    estimated_gdp: f64,
  },
  /// No currency reported, or the reported code has no rate. Distinct from a
  /// country priced at zero, which is `Priced` with `estimated_gdp == 0.0`.
  Unpriceable { currency_code: Option<String> },
}

/// Resolve the currency and rate for `fact` and estimate its GDP.
pub fn price<R>(
  fact: &RawCountryFact,
  rates: &ExchangeRateSnapshot,
  rng: &mut R,
) -> Pricing
where
  R: Rng + ?Sized,
{
  let Some(code) = fact.currency_code.clone() else {
    return Pricing::Unpriceable { currency_code: None };
  };
  let Some(rate) = rates.rate_for(&code) else {
    return Pricing::Unpriceable { currency_code: Some(code) };
  };

  Pricing::Priced {
    estimated_gdp: gdp::estimate(fact.population, Some(rate), rng),
    currency_code: code,
    exchange_rate: rate,
  }
}

/// Build the candidate set for one refresh. Output order follows `facts`.
pub fn join<R>(
  facts: &[RawCountryFact],
  rates: &ExchangeRateSnapshot,
  refreshed_at: DateTime<Utc>,
  rng: &mut R,
) -> Vec<CandidateRecord>
where
  R: Rng + ?Sized,
{
  facts
    .iter()
    .filter_map(|fact| match price(fact, rates, rng) {
      Pricing::Priced { currency_code, exchange_rate, estimated_gdp } => {
        Some(CandidateRecord {
          name: fact.name.clone(),
          capital: fact.capital.clone(),
          region: fact.region.clone(),
          population: fact.population,
          currency_code,
          exchange_rate,
          estimated_gdp,
          flag_url: fact.flag_url.clone(),
          last_refreshed_at: refreshed_at,
        })
      }
      Pricing::Unpriceable { .. } => None,
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use std::collections::HashMap;

  use rand::{SeedableRng, rngs::StdRng};

  use super::*;

  fn fact(name: &str, population: u64, code: Option<&str>) -> RawCountryFact {
    RawCountryFact {
      name: name.into(),
      capital: Some(format!("{name} City")),
      region: Some("Testregion".into()),
      population,
      currency_code: code.map(str::to_owned),
      flag_url: None,
    }
  }

  fn snapshot(rates: &[(&str, f64)]) -> ExchangeRateSnapshot {
    ExchangeRateSnapshot {
      base_code:    "USD".into(),
      rates:        rates.iter().map(|(c, r)| (c.to_string(), *r)).collect::<HashMap<_, _>>(),
      retrieved_at: Utc::now(),
    }
  }

  #[test]
  fn priced_fact_becomes_candidate() {
    let mut rng = StdRng::seed_from_u64(3);
    let at = Utc::now();
    let out = join(&[fact("Testland", 1000, Some("TST"))], &snapshot(&[("TST", 2.0)]), at, &mut rng);

    assert_eq!(out.len(), 1);
    let c = &out[0];
    assert_eq!(c.currency_code, "TST");
    assert_eq!(c.exchange_rate, 2.0);
    assert_eq!(c.last_refreshed_at, at);
    assert!((500_000.0..=999_500.0).contains(&c.estimated_gdp));
  }

  #[test]
  fn candidates_exist_iff_code_and_rate_resolve() {
    let mut rng = StdRng::seed_from_u64(3);
    let facts = [
      fact("Priced", 10, Some("AAA")),
      fact("NoCurrency", 10, None),
      fact("UnknownRate", 10, Some("ZZZ")),
      fact("ZeroRate", 10, Some("NIL")),
    ];
    let rates = snapshot(&[("AAA", 1.0), ("NIL", 0.0)]);

    let names: Vec<_> = join(&facts, &rates, Utc::now(), &mut rng)
      .into_iter()
      .map(|c| c.name)
      .collect();
    assert_eq!(names, ["Priced"]);
  }

  #[test]
  fn unknown_rate_is_unpriceable_not_zero() {
    let mut rng = StdRng::seed_from_u64(3);
    let pricing = price(&fact("Nowhere", 10, Some("ZZZ")), &snapshot(&[]), &mut rng);
    assert_eq!(pricing, Pricing::Unpriceable { currency_code: Some("ZZZ".into()) });
  }

  #[test]
  fn zero_population_is_priced_at_zero() {
    let mut rng = StdRng::seed_from_u64(3);
    let pricing = price(&fact("Empty", 0, Some("AAA")), &snapshot(&[("AAA", 3.0)]), &mut rng);
    assert_eq!(
      pricing,
      Pricing::Priced {
        currency_code: "AAA".into(),
        exchange_rate: 3.0,
        estimated_gdp: 0.0,
      }
    );
  }

  #[test]
  fn empty_input_yields_no_candidates() {
    let mut rng = StdRng::seed_from_u64(3);
    assert!(join(&[], &snapshot(&[("AAA", 1.0)]), Utc::now(), &mut rng).is_empty());
  }
}
