//! The refresh pipeline: fetch → join → reconcile → summarise.
//!
//! Fetch failures end the refresh before anything is written. Reconciliation
//! failures are fatal too. Summary generation is best-effort: its errors are
//! logged and never change the outcome.
//!
//! Overlapping refreshes are allowed. Their per-country upserts may
//! interleave, in which case the last write for a given name wins.

use std::{future::Future, sync::Arc};

use chrono::{DateTime, Utc};
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
  country::CountryRecord,
  error::{RefreshError, Result, SourceUnavailable},
  join,
  source::{CountryFactsGateway, ExchangeRateGateway},
  store::{CountryFilter, CountrySort, CountryStore},
  summary::{Summary, SummaryArtifact},
};

/// Terminal success state of a refresh.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshOutcome {
  /// Reconciled records, in the order the country-facts source listed them.
  pub records:           Vec<CountryRecord>,
  pub created:           usize,
  pub updated:           usize,
  pub last_refreshed_at: DateTime<Utc>,
}

/// Anything that can run a refresh end to end.
pub trait Refresh: Send + Sync {
  fn refresh(&self) -> impl Future<Output = Result<RefreshOutcome>> + Send + '_;
}

/// The production orchestrator, generic over its collaborators.
pub struct Refresher<S, C, X, A> {
  store:     Arc<S>,
  countries: C,
  rates:     X,
  artifact:  A,
}

impl<S, C, X, A> Refresher<S, C, X, A>
where
  S: CountryStore,
  C: CountryFactsGateway,
  X: ExchangeRateGateway,
  A: SummaryArtifact,
{
  pub fn new(store: Arc<S>, countries: C, rates: X, artifact: A) -> Self {
    Self { store, countries, rates, artifact }
  }

  /// Run a refresh drawing GDP multipliers from `rng`.
  pub async fn refresh_with<R>(&self, rng: &mut R) -> Result<RefreshOutcome>
  where
    R: Rng + Send,
  {
    // ── Fetching ──────────────────────────────────────────────────────────
    let (facts, rates) = tokio::try_join!(self.countries.fetch(), self.rates.fetch())
      .inspect_err(|e| warn!(source = %e.source_name, "refresh aborted: {e}"))?;

    if facts.is_empty() {
      return Err(SourceUnavailable::new(self.countries.name(), "no countries returned").into());
    }
    debug!(countries = facts.len(), rates = rates.rates.len(), "sources fetched");

    // ── Joining ───────────────────────────────────────────────────────────
    let refreshed_at = Utc::now();
    let candidates = join::join(&facts, &rates, refreshed_at, rng);
    debug!(
      candidates = candidates.len(),
      dropped = facts.len() - candidates.len(),
      "joined facts with rates"
    );

    // ── Reconciling ───────────────────────────────────────────────────────
    let outcome = self
      .store
      .upsert_all(candidates)
      .await
      .map_err(|e| RefreshError::Reconciliation(Box::new(e)))?;
    self
      .store
      .upsert_metadata(refreshed_at)
      .await
      .map_err(|e| RefreshError::Reconciliation(Box::new(e)))?;

    info!(
      created = outcome.created,
      updated = outcome.updated,
      "countries refreshed"
    );

    // ── Summarizing ───────────────────────────────────────────────────────
    self.summarize(outcome.records.len() as u64, refreshed_at).await;

    Ok(RefreshOutcome {
      records: outcome.records,
      created: outcome.created,
      updated: outcome.updated,
      last_refreshed_at: refreshed_at,
    })
  }

  /// Render the summary. `total` counts this refresh's records; the ranking
  /// draws on every stored row.
  async fn summarize(&self, total: u64, refreshed_at: DateTime<Utc>) {
    let records = match self
      .store
      .list(&CountryFilter::default(), CountrySort::BY_GDP_DESC)
      .await
    {
      Ok(records) => records,
      Err(e) => {
        warn!("skipping summary image, could not list countries: {e}");
        return;
      }
    };

    let summary = Summary::new(total, &records, refreshed_at);
    if let Err(e) = self.artifact.generate(&summary).await {
      warn!("summary image generation failed: {e}");
    }
  }
}

impl<S, C, X, A> Refresh for Refresher<S, C, X, A>
where
  S: CountryStore,
  C: CountryFactsGateway,
  X: ExchangeRateGateway,
  A: SummaryArtifact,
{
  async fn refresh(&self) -> Result<RefreshOutcome> {
    let mut rng = StdRng::from_entropy();
    self.refresh_with(&mut rng).await
  }
}
