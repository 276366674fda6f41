//! Handlers for `/users/{user_id}/profile`.

use axum::{
  Json,
  extract::{Path, State},
};
use serde::Deserialize;
use taper_core::{
  profile::{Profile, TaperStage},
  store::CommunityStore,
};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// `GET /users/{user_id}/profile`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(user_id): Path<Uuid>,
) -> Result<Json<Profile>, ApiError>
where
  S: CommunityStore,
{
  let profile = state
    .store
    .get_profile(user_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("profile {user_id} not found")))?;
  Ok(Json(profile))
}

#[derive(Debug, Deserialize)]
pub struct ProfileBody {
  pub display_name: Option<String>,
  pub drug:         Option<String>,
  #[serde(default)]
  pub taper_stage:  TaperStage,
}

/// `PUT /users/{user_id}/profile`; the user id always comes from the path.
pub async fn put<S>(
  State(state): State<AppState<S>>,
  Path(user_id): Path<Uuid>,
  Json(body): Json<ProfileBody>,
) -> Result<Json<Profile>, ApiError>
where
  S: CommunityStore,
{
  let profile = Profile {
    user_id,
    display_name: body.display_name,
    drug: body.drug,
    taper_stage: body.taper_stage,
  };
  let saved = state.store.put_profile(profile).await.map_err(ApiError::store)?;
  Ok(Json(saved))
}
