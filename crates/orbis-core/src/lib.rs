//! Core types and trait definitions for the Orbis country snapshot.
//!
//! This crate is deliberately free of HTTP, database, and imaging
//! dependencies. It holds the domain model, the pure pricing logic (GDP
//! estimation and the fact/rate join), and the refresh orchestrator that
//! drives the backends through the traits defined here.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod country;
pub mod error;
pub mod gdp;
pub mod join;
pub mod refresh;
pub mod source;
pub mod store;
pub mod summary;

pub use error::{RefreshError, SourceName, SourceUnavailable};
