//! Handlers for journal entry endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/users/{user_id}/entries` | Most recent date first |
//! | `POST`   | `/users/{user_id}/entries` | Body: [`NewEntry`]; 400 on invalid mood/dose |
//! | `GET`    | `/entries/public` | Optional `?limit=N` (default 50) |
//! | `GET`    | `/entries/{id}` | 404 if not found |
//! | `PUT`    | `/entries/{id}` | Replaces every editable field |
//! | `DELETE` | `/entries/{id}` | 204, or 404 if not found |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use taper_core::{
  entry::{JournalEntry, NewEntry},
  store::CommunityStore,
};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

const DEFAULT_PUBLIC_LIMIT: usize = 50;

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /users/{user_id}/entries`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<JournalEntry>>, ApiError>
where
  S: CommunityStore,
{
  let entries = state.store.list_entries(user_id).await.map_err(ApiError::store)?;
  Ok(Json(entries))
}

#[derive(Debug, Deserialize)]
pub struct PublicParams {
  pub limit: Option<usize>,
}

/// `GET /entries/public[?limit=N]`
pub async fn public<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<PublicParams>,
) -> Result<Json<Vec<JournalEntry>>, ApiError>
where
  S: CommunityStore,
{
  let limit = params.limit.unwrap_or(DEFAULT_PUBLIC_LIMIT);
  let entries = state.store.list_public_entries(limit).await.map_err(ApiError::store)?;
  Ok(Json(entries))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /users/{user_id}/entries`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Path(user_id): Path<Uuid>,
  Json(input): Json<NewEntry>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CommunityStore,
{
  input.validate()?;
  let entry = state.store.add_entry(user_id, input).await.map_err(ApiError::store)?;
  tracing::info!(%user_id, entry_id = %entry.entry_id, date = %entry.date, "entry created");
  Ok((StatusCode::CREATED, Json(entry)))
}

// ─── Get / update / delete ────────────────────────────────────────────────────

/// `GET /entries/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<JournalEntry>, ApiError>
where
  S: CommunityStore,
{
  let entry = state
    .store
    .get_entry(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("entry {id} not found")))?;
  Ok(Json(entry))
}

/// `PUT /entries/{id}`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(input): Json<NewEntry>,
) -> Result<Json<JournalEntry>, ApiError>
where
  S: CommunityStore,
{
  input.validate()?;
  let entry = state
    .store
    .update_entry(id, input)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("entry {id} not found")))?;
  Ok(Json(entry))
}

/// `DELETE /entries/{id}`
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: CommunityStore,
{
  if state.store.delete_entry(id).await.map_err(ApiError::store)? {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("entry {id} not found")))
  }
}
