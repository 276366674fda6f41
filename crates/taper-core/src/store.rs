//! The `CommunityStore` trait: the data collaborator for journal entries,
//! profiles, forum entities and vote records.
//!
//! The trait is implemented by storage backends (e.g. `taper-store-sqlite`).
//! Higher layers (`taper-api`, the vote protocol) depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  entry::{JournalEntry, NewEntry},
  forum::{NewReply, NewThread, Reply, Thread},
  profile::Profile,
  vote::{VoteDirection, VoteRecord, VoteTarget},
};

/// Abstraction over a TaperCommunity store backend.
///
/// Every method is a single round trip; none of them span a transaction with
/// another. All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait CommunityStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Journal entries ───────────────────────────────────────────────────

  /// Persist a new entry for `owner_id`. `created_at` is set by the store.
  fn add_entry(
    &self,
    owner_id: Uuid,
    input: NewEntry,
  ) -> impl Future<Output = Result<JournalEntry, Self::Error>> + Send + '_;

  fn get_entry(
    &self,
    entry_id: Uuid,
  ) -> impl Future<Output = Result<Option<JournalEntry>, Self::Error>> + Send + '_;

  /// Overwrite every editable field of an existing entry. Returns `None` if
  /// the entry does not exist.
  fn update_entry(
    &self,
    entry_id: Uuid,
    input: NewEntry,
  ) -> impl Future<Output = Result<Option<JournalEntry>, Self::Error>> + Send + '_;

  /// Returns `false` if nothing was deleted.
  fn delete_entry(
    &self,
    entry_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// All entries owned by `owner_id`, most recent date first.
  fn list_entries(
    &self,
    owner_id: Uuid,
  ) -> impl Future<Output = Result<Vec<JournalEntry>, Self::Error>> + Send + '_;

  /// Entries flagged public, most recent date first.
  fn list_public_entries(
    &self,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<JournalEntry>, Self::Error>> + Send + '_;

  // ── Profiles ──────────────────────────────────────────────────────────

  fn get_profile(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + '_;

  /// Insert or replace the profile for `profile.user_id`.
  fn put_profile(
    &self,
    profile: Profile,
  ) -> impl Future<Output = Result<Profile, Self::Error>> + Send + '_;

  // ── Forum ─────────────────────────────────────────────────────────────

  fn create_thread(
    &self,
    input: NewThread,
  ) -> impl Future<Output = Result<Thread, Self::Error>> + Send + '_;

  fn get_thread(
    &self,
    thread_id: Uuid,
  ) -> impl Future<Output = Result<Option<Thread>, Self::Error>> + Send + '_;

  /// Newest first.
  fn list_threads(&self) -> impl Future<Output = Result<Vec<Thread>, Self::Error>> + Send + '_;

  fn create_reply(
    &self,
    input: NewReply,
  ) -> impl Future<Output = Result<Reply, Self::Error>> + Send + '_;

  fn get_reply(
    &self,
    reply_id: Uuid,
  ) -> impl Future<Output = Result<Option<Reply>, Self::Error>> + Send + '_;

  /// Oldest first.
  fn list_replies(
    &self,
    thread_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Reply>, Self::Error>> + Send + '_;

  // ── Votes ─────────────────────────────────────────────────────────────

  /// The voter's record for `target`, if one exists.
  fn find_vote(
    &self,
    voter_id: Uuid,
    target: VoteTarget,
  ) -> impl Future<Output = Result<Option<VoteRecord>, Self::Error>> + Send + '_;

  fn insert_vote(
    &self,
    voter_id: Uuid,
    target: VoteTarget,
    direction: Option<VoteDirection>,
  ) -> impl Future<Output = Result<VoteRecord, Self::Error>> + Send + '_;

  /// Change the direction of an existing record in place.
  fn update_vote(
    &self,
    voter_id: Uuid,
    target: VoteTarget,
    direction: VoteDirection,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn delete_vote(
    &self,
    voter_id: Uuid,
    target: VoteTarget,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Exact number of records for `target`, regardless of direction.
  fn count_votes(
    &self,
    target: VoteTarget,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  /// Overwrite the denormalised aggregate for `target` with `count`.
  fn write_aggregate(
    &self,
    target: VoteTarget,
    count: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// The stored aggregate, or `None` if the target entity does not exist.
  fn read_aggregate(
    &self,
    target: VoteTarget,
  ) -> impl Future<Output = Result<Option<i64>, Self::Error>> + Send + '_;
}
