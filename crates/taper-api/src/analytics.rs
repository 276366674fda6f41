//! Read-only analytics over a user's journal.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/users/{user_id}/dashboard` | Optional `?today=YYYY-MM-DD` |
//! | `GET`  | `/users/{user_id}/milestones` | Every rule, achieved or not |
//! | `GET`  | `/users/{user_id}/milestones/{rule}/share` | 404 on unknown rule id |
//! | `POST` | `/schedule` | Body: [`SchedulePlan`]; stateless |
//!
//! A user without a stored profile is analysed against a default one.

use axum::{
  Json,
  extract::{Path, Query, State},
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Value, json};
use taper_core::{
  dashboard::Dashboard,
  entry::JournalEntry,
  milestone::{Milestone, MilestoneRule, detect_milestones, share_text},
  profile::Profile,
  schedule::{SchedulePlan, Waypoint, plan_schedule},
  store::CommunityStore,
};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

async fn load<S>(store: &S, user_id: Uuid) -> Result<(Vec<JournalEntry>, Profile), ApiError>
where
  S: CommunityStore,
{
  let entries = store.list_entries(user_id).await.map_err(ApiError::store)?;
  let profile = store
    .get_profile(user_id)
    .await
    .map_err(ApiError::store)?
    .unwrap_or_else(|| Profile::new(user_id));
  Ok((entries, profile))
}

// ─── Dashboard ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct DashboardParams {
  /// Overrides the server's local date for streak calculation.
  pub today: Option<NaiveDate>,
}

/// `GET /users/{user_id}/dashboard[?today=YYYY-MM-DD]`
pub async fn dashboard<S>(
  State(state): State<AppState<S>>,
  Path(user_id): Path<Uuid>,
  Query(params): Query<DashboardParams>,
) -> Result<Json<Dashboard>, ApiError>
where
  S: CommunityStore,
{
  let today = params.today.unwrap_or_else(|| chrono::Local::now().date_naive());
  let (entries, profile) = load(state.store.as_ref(), user_id).await?;
  Ok(Json(Dashboard::compute(&entries, &profile, today)))
}

// ─── Milestones ───────────────────────────────────────────────────────────────

/// `GET /users/{user_id}/milestones`
pub async fn milestones<S>(
  State(state): State<AppState<S>>,
  Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<Milestone>>, ApiError>
where
  S: CommunityStore,
{
  let (entries, profile) = load(state.store.as_ref(), user_id).await?;
  Ok(Json(detect_milestones(&entries, &profile)))
}

/// `GET /users/{user_id}/milestones/{rule}/share`
///
/// Share text is produced whether or not the milestone is achieved; the
/// `achieved` flag is returned alongside so clients can gate the button.
pub async fn share<S>(
  State(state): State<AppState<S>>,
  Path((user_id, rule)): Path<(Uuid, String)>,
) -> Result<Json<Value>, ApiError>
where
  S: CommunityStore,
{
  let rule = MilestoneRule::from_id(&rule)
    .ok_or_else(|| ApiError::NotFound(format!("milestone {rule} not found")))?;
  let (entries, profile) = load(state.store.as_ref(), user_id).await?;

  let milestone = Milestone {
    rule,
    label: rule.label(),
    achieved: rule.is_achieved(&entries, &profile),
  };
  let text = share_text(&milestone, &profile, &entries);
  Ok(Json(json!({ "rule": milestone.rule, "achieved": milestone.achieved, "text": text })))
}

// ─── Schedule ─────────────────────────────────────────────────────────────────

/// `POST /schedule`
pub async fn schedule(Json(plan): Json<SchedulePlan>) -> Json<Vec<Waypoint>> {
  Json(plan_schedule(&plan))
}
