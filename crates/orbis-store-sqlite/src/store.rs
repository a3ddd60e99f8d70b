//! [`SqliteStore`], the SQLite implementation of [`CountryStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;

use orbis_core::{
  country::{CandidateRecord, CountryRecord, RefreshMetadata},
  store::{CountryFilter, CountrySort, CountryStore, UpsertOutcome},
};

use crate::{
  encode::{COUNTRY_COLUMNS, RawCountry, decode_dt, encode_dt, encode_order_by, name_key},
  schema::SCHEMA,
  Result,
};

/// Identity of the singleton `refresh_metadata` row.
const METADATA_ID: i64 = 1;

// ─── Store ───────────────────────────────────────────────────────────────────

/// An Orbis country store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. All calls
/// are serialised on the connection's thread, so each `call` closure below
/// observes no interleaving writes.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  #[cfg(test)]
  pub(crate) fn conn_for_tests(&self) -> &tokio_rusqlite::Connection { &self.conn }
}

/// Insert or overwrite one candidate. Returns the row id and whether the row
/// was newly created.
fn upsert_one(
  conn: &rusqlite::Connection,
  c: &CandidateRecord,
  refreshed_at: &str,
) -> rusqlite::Result<(i64, bool)> {
  let key = name_key(&c.name);
  let existing: Option<i64> = conn
    .query_row(
      "SELECT id FROM countries WHERE name_key = ?1",
      rusqlite::params![key],
      |r| r.get(0),
    )
    .optional()?;

  match existing {
    Some(id) => {
      conn.execute(
        "UPDATE countries SET
           name = ?2, name_key = ?3, capital = ?4, region = ?5, population = ?6,
           currency_code = ?7, exchange_rate = ?8, estimated_gdp = ?9,
           flag_url = ?10, last_refreshed_at = ?11
         WHERE id = ?1",
        rusqlite::params![
          id,
          c.name,
          key,
          c.capital,
          c.region,
          c.population,
          c.currency_code,
          c.exchange_rate,
          c.estimated_gdp,
          c.flag_url,
          refreshed_at,
        ],
      )?;
      Ok((id, false))
    }
    None => {
      conn.execute(
        "INSERT INTO countries (
           name, name_key, capital, region, population, currency_code,
           exchange_rate, estimated_gdp, flag_url, last_refreshed_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        rusqlite::params![
          c.name,
          key,
          c.capital,
          c.region,
          c.population,
          c.currency_code,
          c.exchange_rate,
          c.estimated_gdp,
          c.flag_url,
          refreshed_at,
        ],
      )?;
      Ok((conn.last_insert_rowid(), true))
    }
  }
}

// ─── CountryStore impl ───────────────────────────────────────────────────────

impl CountryStore for SqliteStore {
  type Error = crate::Error;

  // ── Reconciliation ────────────────────────────────────────────────────────

  async fn upsert_all(&self, candidates: Vec<CandidateRecord>) -> Result<UpsertOutcome> {
    // No enclosing transaction: each statement commits on its own, so rows
    // written before a failure stay written.
    let outcome = self
      .conn
      .call(move |conn| {
        let mut outcome = UpsertOutcome {
          records: Vec::with_capacity(candidates.len()),
          ..UpsertOutcome::default()
        };

        for c in candidates {
          let (id, created) = upsert_one(conn, &c, &encode_dt(c.last_refreshed_at))?;
          if created {
            outcome.created += 1;
          } else {
            outcome.updated += 1;
          }
          outcome.records.push(CountryRecord {
            id,
            name:              c.name,
            capital:           c.capital,
            region:            c.region,
            population:        c.population,
            currency_code:     c.currency_code,
            exchange_rate:     c.exchange_rate,
            estimated_gdp:     c.estimated_gdp,
            flag_url:          c.flag_url,
            last_refreshed_at: c.last_refreshed_at,
          });
        }

        Ok(outcome)
      })
      .await?;

    Ok(outcome)
  }

  async fn upsert_metadata(&self, refreshed_at: DateTime<Utc>) -> Result<()> {
    let at_str = encode_dt(refreshed_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO refresh_metadata (id, last_refreshed_at) VALUES (?1, ?2)
           ON CONFLICT (id) DO UPDATE SET last_refreshed_at = excluded.last_refreshed_at",
          rusqlite::params![METADATA_ID, at_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn list(&self, filter: &CountryFilter, sort: CountrySort) -> Result<Vec<CountryRecord>> {
    let region   = filter.region.clone();
    let currency = filter.currency_code.clone();
    let sql      = format!(
      "SELECT {COUNTRY_COLUMNS} FROM countries
       WHERE (?1 IS NULL OR region = ?1)
         AND (?2 IS NULL OR currency_code = ?2)
       {}",
      encode_order_by(sort)
    );

    let raws: Vec<RawCountry> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![region, currency], RawCountry::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCountry::into_record).collect()
  }

  async fn find_by_name(&self, name: &str) -> Result<Option<CountryRecord>> {
    let key = name_key(name);

    let raw: Option<RawCountry> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {COUNTRY_COLUMNS} FROM countries WHERE name_key = ?1"),
            rusqlite::params![key],
            RawCountry::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawCountry::into_record).transpose()
  }

  async fn count(&self) -> Result<u64> {
    let n: u64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM countries", [], |r| r.get(0))?)
      })
      .await?;
    Ok(n)
  }

  async fn metadata(&self) -> Result<Option<RefreshMetadata>> {
    let at_str: Option<String> = self
      .conn
      .call(|conn| {
        Ok(conn
          .query_row(
            "SELECT last_refreshed_at FROM refresh_metadata WHERE id = ?1",
            rusqlite::params![METADATA_ID],
            |r| r.get(0),
          )
          .optional()?)
      })
      .await?;

    at_str
      .as_deref()
      .map(decode_dt)
      .transpose()
      .map(|at| at.map(|last_refreshed_at| RefreshMetadata { last_refreshed_at }))
  }

  // ── Deletion ──────────────────────────────────────────────────────────────

  async fn delete_by_name(&self, name: &str) -> Result<Option<CountryRecord>> {
    let key = name_key(name);

    let raw: Option<RawCountry> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("DELETE FROM countries WHERE name_key = ?1 RETURNING {COUNTRY_COLUMNS}"),
            rusqlite::params![key],
            RawCountry::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawCountry::into_record).transpose()
  }
}
