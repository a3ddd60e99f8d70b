//! Handler for `GET /countries/image`.
//!
//! Serves the last generated summary PNG with a strong ETag (SHA-256 of the
//! bytes). A matching `If-None-Match` yields `304 Not Modified`.

use axum::{
  body::Body,
  extract::State,
  http::{HeaderMap, StatusCode, header},
  response::{IntoResponse, Response},
};
use orbis_core::{refresh::Refresh, store::CountryStore};
use sha2::{Digest, Sha256};

use crate::{AppState, error::ApiError};

pub fn compute_etag(bytes: &[u8]) -> String {
  format!("\"{}\"", hex::encode(Sha256::digest(bytes)))
}

fn strip_etag_quotes(s: &str) -> &str { s.trim().trim_start_matches("W/").trim_matches('"') }

/// `GET /countries/image`
pub async fn handler<S, R>(
  State(state): State<AppState<S, R>>,
  headers: HeaderMap,
) -> Result<Response, ApiError>
where
  S: CountryStore + 'static,
  R: Refresh + 'static,
{
  let bytes = orbis_summary::load(&state.summary_path)
    .await
    .map_err(ApiError::internal)?
    .ok_or(ApiError::NotFound("Summary image not found"))?;

  let etag = compute_etag(&bytes);
  let not_modified = headers
    .get(header::IF_NONE_MATCH)
    .and_then(|v| v.to_str().ok())
    .is_some_and(|candidates| {
      candidates
        .split(',')
        .any(|c| c.trim() == "*" || strip_etag_quotes(c) == strip_etag_quotes(&etag))
    });

  if not_modified {
    return Ok((StatusCode::NOT_MODIFIED, [(header::ETAG, etag)]).into_response());
  }

  Ok(
    (
      [
        (header::CONTENT_TYPE, "image/png".to_owned()),
        (header::ETAG, etag),
      ],
      Body::from(bytes),
    )
      .into_response(),
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn etag_is_quoted_sha256() {
    let etag = compute_etag(b"png");
    assert_eq!(etag.len(), 66);
    assert!(etag.starts_with('"') && etag.ends_with('"'));
    assert_eq!(etag, compute_etag(b"png"));
    assert_ne!(etag, compute_etag(b"gif"));
  }

  #[test]
  fn strips_weak_prefix_and_quotes() {
    assert_eq!(strip_etag_quotes("W/\"abc\""), "abc");
    assert_eq!(strip_etag_quotes(" \"abc\" "), "abc");
    assert_eq!(strip_etag_quotes("abc"), "abc");
  }
}
