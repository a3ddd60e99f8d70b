//! HTTP source gateways for Orbis.
//!
//! Two gateways implement [`orbis_core::source::SourceGateway`]:
//!
//! | Gateway | Upstream | Dataset |
//! |---------|----------|---------|
//! | [`CountriesGateway`] | REST Countries v2 (`/v2/all`) | `Vec<RawCountryFact>` |
//! | [`ExchangeRatesGateway`] | open.er-api.com (`/v6/latest/USD`) | `ExchangeRateSnapshot` |
//!
//! Each fetch is a single GET bounded by the configured timeout. Wire payloads
//! are decoded into private types and narrowed to the core domain types here,
//! so nothing past this crate sees an upstream field that might be missing.

mod client;
pub mod countries;
pub mod rates;

pub use client::SourceConfig;
pub use countries::CountriesGateway;
pub use rates::ExchangeRatesGateway;
