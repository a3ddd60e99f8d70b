//! Encoding and decoding helpers between domain types and the plain
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings. Sort orders map onto fixed
//! `ORDER BY` clauses so no user text ever reaches the SQL.

use chrono::{DateTime, Utc};
use orbis_core::{
  country::CountryRecord,
  store::{CountrySort, SortDirection, SortField},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Names ───────────────────────────────────────────────────────────────────

/// The case-folded form stored in `countries.name_key`.
pub fn name_key(name: &str) -> String { name.to_lowercase() }

// ─── Sort ────────────────────────────────────────────────────────────────────

pub fn encode_order_by(sort: CountrySort) -> &'static str {
  use SortDirection::{Asc, Desc};
  use SortField::{EstimatedGdp, Name, Population};

  match (sort.field, sort.direction) {
    (Name, Asc) => "ORDER BY name_key ASC",
    (Name, Desc) => "ORDER BY name_key DESC",
    (Population, Asc) => "ORDER BY population ASC, name_key ASC",
    (Population, Desc) => "ORDER BY population DESC, name_key ASC",
    (EstimatedGdp, Asc) => "ORDER BY estimated_gdp ASC, name_key ASC",
    (EstimatedGdp, Desc) => "ORDER BY estimated_gdp DESC, name_key ASC",
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawCountry::from_row`].
pub const COUNTRY_COLUMNS: &str = "id, name, capital, region, population, currency_code,
  exchange_rate, estimated_gdp, flag_url, last_refreshed_at";

/// A `countries` row before timestamp decoding.
pub struct RawCountry {
  pub id:                i64,
  pub name:              String,
  pub capital:           Option<String>,
  pub region:            Option<String>,
  pub population:        u64,
  pub currency_code:     String,
  pub exchange_rate:     f64,
  pub estimated_gdp:     f64,
  pub flag_url:          Option<String>,
  pub last_refreshed_at: String,
}

impl RawCountry {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                row.get(0)?,
      name:              row.get(1)?,
      capital:           row.get(2)?,
      region:            row.get(3)?,
      population:        row.get(4)?,
      currency_code:     row.get(5)?,
      exchange_rate:     row.get(6)?,
      estimated_gdp:     row.get(7)?,
      flag_url:          row.get(8)?,
      last_refreshed_at: row.get(9)?,
    })
  }

  pub fn into_record(self) -> Result<CountryRecord> {
    Ok(CountryRecord {
      id:                self.id,
      name:              self.name,
      capital:           self.capital,
      region:            self.region,
      population:        self.population,
      currency_code:     self.currency_code,
      exchange_rate:     self.exchange_rate,
      estimated_gdp:     self.estimated_gdp,
      flag_url:          self.flag_url,
      last_refreshed_at: decode_dt(&self.last_refreshed_at)?,
    })
  }
}
