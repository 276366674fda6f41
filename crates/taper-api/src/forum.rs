//! Handlers for threads and replies.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/threads` | Newest first; served from the read-through cache |
//! | `POST` | `/threads` | Body: `{"author_id", "title", "body"}` |
//! | `GET`  | `/threads/{id}` | 404 if not found |
//! | `GET`  | `/threads/{id}/replies` | Oldest first |
//! | `POST` | `/threads/{id}/replies` | Body: `{"author_id", "body"}` |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use taper_core::{
  forum::{NewReply, NewThread, Reply, Thread},
  store::CommunityStore,
};
use uuid::Uuid;

use crate::{AppState, THREAD_LIST, error::ApiError};

pub(crate) async fn require_thread<S>(store: &S, id: Uuid) -> Result<Thread, ApiError>
where
  S: CommunityStore,
{
  store
    .get_thread(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("thread {id} not found")))
}

pub(crate) async fn require_reply<S>(store: &S, id: Uuid) -> Result<Reply, ApiError>
where
  S: CommunityStore,
{
  store
    .get_reply(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("reply {id} not found")))
}

// ─── Threads ──────────────────────────────────────────────────────────────────

/// `GET /threads`
pub async fn list_threads<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Thread>>, ApiError>
where
  S: CommunityStore,
{
  let store = state.store.as_ref();
  let threads = state
    .threads
    .get_or_fetch(THREAD_LIST, || store.list_threads())
    .await
    .map_err(ApiError::store)?;
  Ok(Json(threads))
}

/// `POST /threads`
pub async fn create_thread<S>(
  State(state): State<AppState<S>>,
  Json(input): Json<NewThread>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CommunityStore,
{
  let thread = state.store.create_thread(input).await.map_err(ApiError::store)?;
  state.threads.invalidate(&THREAD_LIST).await;
  tracing::info!(thread_id = %thread.thread_id, "thread created");
  Ok((StatusCode::CREATED, Json(thread)))
}

/// `GET /threads/{id}`
pub async fn get_thread<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Thread>, ApiError>
where
  S: CommunityStore,
{
  Ok(Json(require_thread(state.store.as_ref(), id).await?))
}

// ─── Replies ──────────────────────────────────────────────────────────────────

/// `GET /threads/{id}/replies`
pub async fn list_replies<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<Reply>>, ApiError>
where
  S: CommunityStore,
{
  require_thread(state.store.as_ref(), id).await?;
  let replies = state.store.list_replies(id).await.map_err(ApiError::store)?;
  Ok(Json(replies))
}

#[derive(Debug, Deserialize)]
pub struct ReplyBody {
  pub author_id: Uuid,
  pub body:      String,
}

/// `POST /threads/{id}/replies`
pub async fn create_reply<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<ReplyBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CommunityStore,
{
  require_thread(state.store.as_ref(), id).await?;
  let input = NewReply { thread_id: id, author_id: body.author_id, body: body.body };
  let reply = state.store.create_reply(input).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(reply)))
}
