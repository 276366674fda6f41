//! Vote endpoints. Each click runs the full reconciliation sequence in
//! [`taper_core::protocol::cast_vote`] and answers with the fresh count.
//!
//! | Method | Path | Body |
//! |--------|------|------|
//! | `POST` | `/threads/{id}/vote` | `{"voter_id", "direction": "up"\|"down"}` |
//! | `POST` | `/replies/{id}/vote` | `{"voter_id", "direction": "up"\|"down"}` |
//! | `POST` | `/replies/{id}/helpful` | `{"voter_id"}` |
//! | `POST` | `/threads/{id}/recount` | none |
//! | `POST` | `/replies/{id}/recount` | none; recounts votes and helpful marks |
//!
//! The target is checked for existence first so a missing thread or reply is
//! a 404 instead of a failed aggregate write.

use axum::{
  Json,
  extract::{Path, State},
};
use serde::Deserialize;
use taper_core::{
  forum::{Reply, Thread},
  protocol::{VoteOutcome, cast_vote, recount},
  store::CommunityStore,
  vote::{VoteClick, VoteDirection, VoteTarget},
};
use uuid::Uuid;

use crate::{
  AppState, THREAD_LIST,
  error::ApiError,
  forum::{require_reply, require_thread},
};

#[derive(Debug, Deserialize)]
pub struct DirectionalBody {
  pub voter_id:  Uuid,
  pub direction: VoteDirection,
}

#[derive(Debug, Deserialize)]
pub struct HelpfulBody {
  pub voter_id: Uuid,
}

async fn apply<S>(
  state: &AppState<S>,
  voter_id: Uuid,
  click: VoteClick,
) -> Result<VoteOutcome, ApiError>
where
  S: CommunityStore,
{
  let outcome = cast_vote(state.store.as_ref(), voter_id, click)
    .await
    .map_err(ApiError::store)?;
  tracing::info!(
    %voter_id,
    target_id = %outcome.target.target_id,
    kind = %outcome.target.kind,
    state = ?outcome.state,
    score = outcome.score,
    "vote applied"
  );
  Ok(outcome)
}

// ─── Clicks ───────────────────────────────────────────────────────────────────

/// `POST /threads/{id}/vote`
pub async fn thread_vote<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<DirectionalBody>,
) -> Result<Json<VoteOutcome>, ApiError>
where
  S: CommunityStore,
{
  require_thread(state.store.as_ref(), id).await?;
  let click = VoteClick::Thread { thread_id: id, direction: body.direction };
  let outcome = apply(&state, body.voter_id, click).await?;
  state.threads.invalidate(&THREAD_LIST).await;
  Ok(Json(outcome))
}

/// `POST /replies/{id}/vote`
pub async fn reply_vote<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<DirectionalBody>,
) -> Result<Json<VoteOutcome>, ApiError>
where
  S: CommunityStore,
{
  require_reply(state.store.as_ref(), id).await?;
  let click = VoteClick::Reply { reply_id: id, direction: body.direction };
  Ok(Json(apply(&state, body.voter_id, click).await?))
}

/// `POST /replies/{id}/helpful`
pub async fn helpful<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<HelpfulBody>,
) -> Result<Json<VoteOutcome>, ApiError>
where
  S: CommunityStore,
{
  require_reply(state.store.as_ref(), id).await?;
  Ok(Json(apply(&state, body.voter_id, VoteClick::Helpful { reply_id: id }).await?))
}

// ─── Recount ──────────────────────────────────────────────────────────────────

/// `POST /threads/{id}/recount`
pub async fn thread_recount<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Thread>, ApiError>
where
  S: CommunityStore,
{
  let store = state.store.as_ref();
  require_thread(store, id).await?;
  recount(store, VoteTarget::thread(id)).await.map_err(ApiError::store)?;
  state.threads.invalidate(&THREAD_LIST).await;
  Ok(Json(require_thread(store, id).await?))
}

/// `POST /replies/{id}/recount`
pub async fn reply_recount<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Reply>, ApiError>
where
  S: CommunityStore,
{
  let store = state.store.as_ref();
  require_reply(store, id).await?;
  for target in [VoteTarget::reply(id), VoteTarget::helpful(id)] {
    recount(store, target).await.map_err(ApiError::store)?;
  }
  Ok(Json(require_reply(store, id).await?))
}
