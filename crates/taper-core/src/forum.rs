//! Forum entities that carry denormalised vote aggregates.
//!
//! Only the fields the vote protocol and thread listings need are modelled;
//! moderation, categories and rich bodies live outside this workspace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
  pub thread_id:  Uuid,
  pub author_id:  Uuid,
  pub title:      String,
  pub body:       String,
  /// Count of thread vote records, rewritten on every vote.
  pub vote_score: i64,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
  pub reply_id:      Uuid,
  pub thread_id:     Uuid,
  pub author_id:     Uuid,
  pub body:          String,
  /// Count of reply vote records.
  pub vote_score:    i64,
  /// Count of "helpful" marks.
  pub helpful_count: i64,
  pub created_at:    DateTime<Utc>,
}

/// Input to [`crate::store::CommunityStore::create_thread`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewThread {
  pub author_id: Uuid,
  pub title:     String,
  pub body:      String,
}

/// Input to [`crate::store::CommunityStore::create_reply`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReply {
  pub thread_id: Uuid,
  pub author_id: Uuid,
  pub body:      String,
}
