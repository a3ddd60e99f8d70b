//! Country types: what the upstream sources hand us and what we keep.
//!
//! Ingestion types ([`RawCountryFact`], [`ExchangeRateSnapshot`]) are
//! transient and carry every field as optional where the upstream payload
//! may omit it. [`CandidateRecord`] is the priced, pre-persistence shape; the
//! type itself guarantees a currency code and a rate are present.
//! [`CountryRecord`] and [`RefreshMetadata`] are the persisted shapes.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Ingestion ───────────────────────────────────────────────────────────────

/// One country as reported by the country-facts source.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawCountryFact {
  pub name:          String,
  pub capital:       Option<String>,
  pub region:        Option<String>,
  pub population:    u64,
  /// First currency the source lists for this country, if any.
  pub currency_code: Option<String>,
  pub flag_url:      Option<String>,
}

/// Exchange rates relative to `base_code`, as reported by the exchange-rate
/// source.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeRateSnapshot {
  pub base_code:    String,
  pub rates:        HashMap<String, f64>,
  pub retrieved_at: DateTime<Utc>,
}

impl ExchangeRateSnapshot {
  /// The usable rate for `code`. Zero, negative, and non-finite rates are
  /// treated the same as a missing entry.
  pub fn rate_for(&self, code: &str) -> Option<f64> {
    self
      .rates
      .get(code)
      .copied()
      .filter(|rate| rate.is_finite() && *rate > 0.0)
  }
}

// ─── Candidate ───────────────────────────────────────────────────────────────

/// A joined and priced country for one refresh cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateRecord {
  pub name:              String,
  pub capital:           Option<String>,
  pub region:            Option<String>,
  pub population:        u64,
  pub currency_code:     String,
  pub exchange_rate:     f64,
  pub estimated_gdp:     f64,
  pub flag_url:          Option<String>,
  /// Shared by every candidate in the batch.
  pub last_refreshed_at: DateTime<Utc>,
}

// ─── Persisted ───────────────────────────────────────────────────────────────

/// A stored country. `name` is unique under case-insensitive comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRecord {
  pub id:                i64,
  pub name:              String,
  pub capital:           Option<String>,
  pub region:            Option<String>,
  pub population:        u64,
  pub currency_code:     String,
  pub exchange_rate:     f64,
  pub estimated_gdp:     f64,
  pub flag_url:          Option<String>,
  pub last_refreshed_at: DateTime<Utc>,
}

/// The singleton refresh marker. Lives under a fixed identity in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshMetadata {
  pub last_refreshed_at: DateTime<Utc>,
}
