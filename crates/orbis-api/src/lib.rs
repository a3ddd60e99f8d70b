//! JSON REST API for Orbis.
//!
//! Exposes an axum [`Router`] backed by any [`CountryStore`] and any
//! [`Refresh`] implementation. TLS and other transport concerns are the
//! caller's responsibility.
//!
//! | Method   | Path | Handler |
//! |----------|------|---------|
//! | `GET`    | `/` | [`status::root`] |
//! | `GET`    | `/status` | [`status::handler`] |
//! | `GET`    | `/countries` | [`countries::list`] |
//! | `POST`   | `/countries/refresh` | [`refresh::handler`] |
//! | `GET`    | `/countries/image` | [`image::handler`] |
//! | `GET`    | `/countries/{name}` | [`countries::get_one`] |
//! | `DELETE` | `/countries/{name}` | [`countries::delete_one`] |

pub mod countries;
pub mod error;
pub mod image;
pub mod refresh;
pub mod status;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use orbis_core::{refresh::Refresh, store::CountryStore};

pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S, R> {
  pub store:        Arc<S>,
  pub refresher:    Arc<R>,
  /// Where the summary artifact is written and served from.
  pub summary_path: Arc<PathBuf>,
}

impl<S, R> Clone for AppState<S, R> {
  fn clone(&self) -> Self {
    Self {
      store:        self.store.clone(),
      refresher:    self.refresher.clone(),
      summary_path: self.summary_path.clone(),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the API router for `state`.
pub fn router<S, R>(state: AppState<S, R>) -> Router
where
  S: CountryStore + 'static,
  R: Refresh + 'static,
{
  Router::new()
    .route("/", get(status::root))
    .route("/status", get(status::handler::<S, R>))
    .route("/countries", get(countries::list::<S, R>))
    .route("/countries/refresh", post(refresh::handler::<S, R>))
    .route("/countries/image", get(image::handler::<S, R>))
    .route(
      "/countries/{name}",
      get(countries::get_one::<S, R>).delete(countries::delete_one::<S, R>),
    )
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
