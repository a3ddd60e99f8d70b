//! Handlers for `/countries` read and delete endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/countries` | Optional `region`, `currency`, `sort=<field>_<asc\|desc>` |
//! | `GET`    | `/countries/{name}` | Case-insensitive; 404 if not found |
//! | `DELETE` | `/countries/{name}` | Case-insensitive; echoes the deleted name |

use axum::{
  Json,
  extract::{Path, Query, State},
};
use orbis_core::{
  country::CountryRecord,
  refresh::Refresh,
  store::{CountryFilter, CountrySort, CountryStore},
};
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiError};

const NOT_FOUND: &str = "Country not found";

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  pub region:   Option<String>,
  pub currency: Option<String>,
  /// `gdp_desc`, `population_asc`, `name_desc`, ... Unknown fields sort by
  /// name ascending.
  pub sort:     Option<String>,
}

/// `GET /countries[?region=...][&currency=...][&sort=...]`
pub async fn list<S, R>(
  State(state): State<AppState<S, R>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<CountryRecord>>, ApiError>
where
  S: CountryStore + 'static,
  R: Refresh + 'static,
{
  let filter = CountryFilter {
    region:        params.region.filter(|r| !r.is_empty()),
    currency_code: params.currency.filter(|c| !c.is_empty()),
  };
  let sort = params.sort.as_deref().map(CountrySort::parse).unwrap_or_default();

  let countries = state
    .store
    .list(&filter, sort)
    .await
    .map_err(ApiError::internal)?;
  Ok(Json(countries))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /countries/{name}`
pub async fn get_one<S, R>(
  State(state): State<AppState<S, R>>,
  Path(name): Path<String>,
) -> Result<Json<CountryRecord>, ApiError>
where
  S: CountryStore + 'static,
  R: Refresh + 'static,
{
  let country = state
    .store
    .find_by_name(&name)
    .await
    .map_err(ApiError::internal)?
    .ok_or(ApiError::NotFound(NOT_FOUND))?;
  Ok(Json(country))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct DeletedCountry {
  pub name: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
  pub message: &'static str,
  pub country: DeletedCountry,
}

/// `DELETE /countries/{name}`
pub async fn delete_one<S, R>(
  State(state): State<AppState<S, R>>,
  Path(name): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError>
where
  S: CountryStore + 'static,
  R: Refresh + 'static,
{
  let deleted = state
    .store
    .delete_by_name(&name)
    .await
    .map_err(ApiError::internal)?
    .ok_or(ApiError::NotFound(NOT_FOUND))?;

  Ok(Json(DeleteResponse {
    message: "Country deleted successfully",
    country: DeletedCountry { name: deleted.name },
  }))
}
