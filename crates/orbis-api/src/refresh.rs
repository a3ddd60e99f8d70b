//! Handler for `POST /countries/refresh`.

use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use orbis_core::{country::CountryRecord, refresh::Refresh, store::CountryStore};
use serde::Serialize;

use crate::{AppState, error::ApiError};

#[derive(Debug, Serialize)]
pub struct RefreshSummary {
  pub last_refreshed_at: DateTime<Utc>,
  pub total:             usize,
  pub created:           usize,
  pub updated:           usize,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
  pub message:   &'static str,
  pub countries: Vec<CountryRecord>,
  pub summary:   RefreshSummary,
}

/// `POST /countries/refresh`: 201 on success, 503 when a source is down.
pub async fn handler<S, R>(
  State(state): State<AppState<S, R>>,
) -> Result<(StatusCode, Json<RefreshResponse>), ApiError>
where
  S: CountryStore + 'static,
  R: Refresh + 'static,
{
  let outcome = state.refresher.refresh().await?;

  let summary = RefreshSummary {
    last_refreshed_at: outcome.last_refreshed_at,
    total:             outcome.records.len(),
    created:           outcome.created,
    updated:           outcome.updated,
  };
  Ok((
    StatusCode::CREATED,
    Json(RefreshResponse {
      message: "Countries refreshed successfully",
      countries: outcome.records,
      summary,
    }),
  ))
}
