//! Handlers for `GET /status` and `GET /`.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use orbis_core::{refresh::Refresh, store::CountryStore};
use serde::Serialize;
use serde_json::{Value, json};

use crate::{AppState, error::ApiError};

#[derive(Debug, Serialize)]
pub struct Status {
  pub total_countries:   u64,
  /// `null` until the first successful refresh.
  pub last_refreshed_at: Option<DateTime<Utc>>,
}

/// `GET /status`
pub async fn handler<S, R>(State(state): State<AppState<S, R>>) -> Result<Json<Status>, ApiError>
where
  S: CountryStore + 'static,
  R: Refresh + 'static,
{
  let total_countries = state.store.count().await.map_err(ApiError::internal)?;
  let metadata = state.store.metadata().await.map_err(ApiError::internal)?;

  Ok(Json(Status {
    total_countries,
    last_refreshed_at: metadata.map(|m| m.last_refreshed_at),
  }))
}

/// `GET /`
pub async fn root() -> Json<Value> { Json(json!({ "message": "Hello World" })) }
