//! Error types for `orbis-core`.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Identifies which of the two upstream data sources an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceName {
  CountryFacts,
  ExchangeRate,
}

impl SourceName {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::CountryFacts => "country-facts",
      Self::ExchangeRate => "exchange-rate",
    }
  }
}

impl fmt::Display for SourceName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A single fetch against an upstream source failed: transport error,
/// timeout, non-success status, undecodable body, or an empty payload.
#[derive(Debug, Error)]
#[error("{source_name} source unavailable: {reason}")]
pub struct SourceUnavailable {
  pub source_name: SourceName,
  pub reason:      String,
}

impl SourceUnavailable {
  pub fn new(source_name: SourceName, reason: impl Into<String>) -> Self {
    Self { source_name, reason: reason.into() }
  }
}

/// Fatal outcomes of a refresh. Summary artifact failures are not represented
/// here; the orchestrator logs and swallows them.
#[derive(Debug, Error)]
pub enum RefreshError {
  #[error(transparent)]
  SourceUnavailable(#[from] SourceUnavailable),

  #[error("reconciliation failed: {0}")]
  Reconciliation(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = RefreshError> = std::result::Result<T, E>;
