//! SQL schema for the Orbis SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per priced country. `name_key` is the Unicode-lowercased name and
-- is what lookups match on, so names are unique ignoring case.
CREATE TABLE IF NOT EXISTS countries (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    name              TEXT    NOT NULL,
    name_key          TEXT    NOT NULL UNIQUE,
    capital           TEXT,
    region            TEXT,
    population        INTEGER NOT NULL CHECK (population >= 0),
    currency_code     TEXT    NOT NULL,
    exchange_rate     REAL    NOT NULL CHECK (exchange_rate > 0),
    estimated_gdp     REAL    NOT NULL CHECK (estimated_gdp >= 0),
    flag_url          TEXT,
    last_refreshed_at TEXT    NOT NULL   -- RFC 3339 UTC
);

-- Singleton row; the id is pinned to 1.
CREATE TABLE IF NOT EXISTS refresh_metadata (
    id                INTEGER PRIMARY KEY CHECK (id = 1),
    last_refreshed_at TEXT    NOT NULL
);

CREATE INDEX IF NOT EXISTS countries_region_idx   ON countries(region);
CREATE INDEX IF NOT EXISTS countries_currency_idx ON countries(currency_code);
CREATE INDEX IF NOT EXISTS countries_gdp_idx      ON countries(estimated_gdp);

PRAGMA user_version = 2;
";
