//! The uniform contract shared by the two upstream data sources.

use std::future::Future;

use crate::{
  country::{ExchangeRateSnapshot, RawCountryFact},
  error::{SourceName, SourceUnavailable},
};

/// One upstream data provider behind a single fetch operation.
///
/// A fetch is a single attempt; retries are the caller's business. Every
/// failure (including a payload with nothing usable in it) is reported as
/// [`SourceUnavailable`] tagged with [`SourceGateway::name`].
pub trait SourceGateway: Send + Sync {
  type Dataset: Send;

  fn name(&self) -> SourceName;

  fn fetch(
    &self,
  ) -> impl Future<Output = Result<Self::Dataset, SourceUnavailable>> + Send + '_;
}

/// A gateway yielding country facts.
pub trait CountryFactsGateway: SourceGateway<Dataset = Vec<RawCountryFact>> {}

impl<T> CountryFactsGateway for T where T: SourceGateway<Dataset = Vec<RawCountryFact>> {}

/// A gateway yielding exchange rates.
pub trait ExchangeRateGateway: SourceGateway<Dataset = ExchangeRateSnapshot> {}

impl<T> ExchangeRateGateway for T where T: SourceGateway<Dataset = ExchangeRateSnapshot> {}
