//! The `CountryStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `orbis-store-sqlite`).
//! The refresh orchestrator and the HTTP layer depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::country::{CandidateRecord, CountryRecord, RefreshMetadata};

// ─── Query types ─────────────────────────────────────────────────────────────

/// Exact-match filters for [`CountryStore::list`]. `None` means "any".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryFilter {
  pub region:        Option<String>,
  pub currency_code: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
  #[default]
  Name,
  Population,
  EstimatedGdp,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
  #[default]
  Asc,
  Desc,
}

/// Ordering for [`CountryStore::list`]. Defaults to name ascending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountrySort {
  pub field:     SortField,
  pub direction: SortDirection,
}

impl CountrySort {
  pub const BY_GDP_DESC: Self = Self {
    field:     SortField::EstimatedGdp,
    direction: SortDirection::Desc,
  };

  /// Parse a `<field>_<direction>` token such as `gdp_desc` or `name_asc`.
  ///
  /// An unrecognised field falls back to the default ordering. Any direction
  /// other than `desc` sorts ascending.
  pub fn parse(token: &str) -> Self {
    let (field, direction) = token.rsplit_once('_').unwrap_or((token, ""));

    let field = match field {
      "name" => SortField::Name,
      "population" => SortField::Population,
      "gdp" | "estimated_gdp" => SortField::EstimatedGdp,
      _ => return Self::default(),
    };
    let direction = if direction.eq_ignore_ascii_case("desc") {
      SortDirection::Desc
    } else {
      SortDirection::Asc
    };

    Self { field, direction }
  }
}

/// Result of [`CountryStore::upsert_all`].
#[derive(Debug, Clone, Default)]
pub struct UpsertOutcome {
  /// Persisted records, in candidate order.
  pub records: Vec<CountryRecord>,
  pub created: usize,
  pub updated: usize,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over an Orbis country store backend.
///
/// Country names are matched case-insensitively everywhere. All methods
/// return `Send` futures so the trait can be used in multi-threaded async
/// runtimes (e.g. tokio with `axum`).
pub trait CountryStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Reconciliation ────────────────────────────────────────────────────

  /// Insert each candidate whose name is unknown, overwrite every field of
  /// the record whose name matches otherwise.
  ///
  /// Candidates are committed one by one; an error stops the batch but keeps
  /// what was already written.
  fn upsert_all(
    &self,
    candidates: Vec<CandidateRecord>,
  ) -> impl Future<Output = Result<UpsertOutcome, Self::Error>> + Send + '_;

  /// Atomically create or overwrite the singleton [`RefreshMetadata`].
  fn upsert_metadata(
    &self,
    refreshed_at: DateTime<Utc>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  fn list<'a>(
    &'a self,
    filter: &'a CountryFilter,
    sort: CountrySort,
  ) -> impl Future<Output = Result<Vec<CountryRecord>, Self::Error>> + Send + 'a;

  /// Returns `None` if no record has this name.
  fn find_by_name<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<CountryRecord>, Self::Error>> + Send + 'a;

  fn count(&self) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Returns `None` before the first successful refresh.
  fn metadata(
    &self,
  ) -> impl Future<Output = Result<Option<RefreshMetadata>, Self::Error>> + Send + '_;

  // ── Deletion ──────────────────────────────────────────────────────────

  /// Delete the record with this name and return it, or `None` if absent.
  fn delete_by_name<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<CountryRecord>, Self::Error>> + Send + 'a;
}
