//! Integration tests for `SqliteStore` against an in-memory database,
//! including the vote protocol end to end.

use chrono::NaiveDate;
use taper_core::{
  entry::NewEntry,
  forum::{NewReply, NewThread},
  profile::{Profile, TaperStage},
  protocol::{cast_vote, recount},
  store::CommunityStore,
  vote::{VoteClick, VoteDirection, VoteState, VoteTarget},
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn date(d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(2024, 5, d).unwrap() }

fn checkin(d: u32, dose: Option<f64>, mood: Option<u8>, symptoms: &[&str]) -> NewEntry {
  NewEntry {
    date: date(d),
    drug: Some("escitalopram".into()),
    dose_numeric: dose,
    mood_score: mood,
    symptoms: symptoms.iter().map(|s| (*s).to_owned()).collect(),
    notes: None,
    is_public: false,
  }
}

async fn thread(s: &SqliteStore) -> Uuid {
  s.create_thread(NewThread {
    author_id: Uuid::new_v4(),
    title:     "Week 3 of my taper".into(),
    body:      "Brain zaps are easing.".into(),
  })
  .await
  .unwrap()
  .thread_id
}

async fn reply(s: &SqliteStore, thread_id: Uuid) -> Uuid {
  s.create_reply(NewReply {
    thread_id,
    author_id: Uuid::new_v4(),
    body:      "Same here, hang in there.".into(),
  })
  .await
  .unwrap()
  .reply_id
}

// ─── Journal entries ─────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_entry() {
  let s = store().await;
  let owner = Uuid::new_v4();

  let entry = s
    .add_entry(owner, checkin(3, Some(10.0), Some(6), &["insomnia", "irritability"]))
    .await
    .unwrap();
  assert_eq!(entry.owner_id, owner);

  let fetched = s.get_entry(entry.entry_id).await.unwrap().unwrap();
  assert_eq!(fetched.date, date(3));
  assert_eq!(fetched.dose_numeric, Some(10.0));
  assert_eq!(fetched.mood_score, Some(6));
  assert_eq!(fetched.symptoms, vec!["insomnia", "irritability"]);
  assert_eq!(fetched.drug.as_deref(), Some("escitalopram"));
}

#[tokio::test]
async fn missing_fields_stay_absent() {
  let s = store().await;
  let entry = s.add_entry(Uuid::new_v4(), NewEntry::new(date(1))).await.unwrap();

  let fetched = s.get_entry(entry.entry_id).await.unwrap().unwrap();
  assert_eq!(fetched.dose_numeric, None);
  assert_eq!(fetched.mood_score, None);
  assert!(fetched.symptoms.is_empty());
}

#[tokio::test]
async fn add_entry_rejects_invalid_mood() {
  let s = store().await;
  let err = s
    .add_entry(Uuid::new_v4(), checkin(1, None, Some(12), &[]))
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::Core(taper_core::Error::InvalidMoodScore(12))));
}

#[tokio::test]
async fn update_overwrites_fields() {
  let s = store().await;
  let entry = s
    .add_entry(Uuid::new_v4(), checkin(1, Some(10.0), Some(4), &["nausea"]))
    .await
    .unwrap();

  let updated = s
    .update_entry(entry.entry_id, checkin(2, None, Some(7), &[]))
    .await
    .unwrap()
    .unwrap();
  assert_eq!(updated.entry_id, entry.entry_id);
  assert_eq!(updated.date, date(2));
  assert_eq!(updated.dose_numeric, None);
  assert_eq!(updated.mood_score, Some(7));
  assert!(updated.symptoms.is_empty());
  assert_eq!(updated.created_at, entry.created_at);
}

#[tokio::test]
async fn update_missing_entry_returns_none() {
  let s = store().await;
  let result = s.update_entry(Uuid::new_v4(), NewEntry::new(date(1))).await.unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn delete_entry() {
  let s = store().await;
  let entry = s.add_entry(Uuid::new_v4(), NewEntry::new(date(1))).await.unwrap();

  assert!(s.delete_entry(entry.entry_id).await.unwrap());
  assert!(s.get_entry(entry.entry_id).await.unwrap().is_none());
  assert!(!s.delete_entry(entry.entry_id).await.unwrap());
}

#[tokio::test]
async fn list_entries_by_owner_newest_first() {
  let s = store().await;
  let alice = Uuid::new_v4();
  let bob = Uuid::new_v4();

  s.add_entry(alice, NewEntry::new(date(1))).await.unwrap();
  s.add_entry(alice, NewEntry::new(date(5))).await.unwrap();
  s.add_entry(bob, NewEntry::new(date(3))).await.unwrap();

  let entries = s.list_entries(alice).await.unwrap();
  let dates: Vec<_> = entries.iter().map(|e| e.date).collect();
  assert_eq!(dates, vec![date(5), date(1)]);
}

#[tokio::test]
async fn public_feed_only_shows_public_entries() {
  let s = store().await;
  let owner = Uuid::new_v4();

  let mut shared = NewEntry::new(date(2));
  shared.is_public = true;
  let shared = s.add_entry(owner, shared).await.unwrap();
  s.add_entry(owner, NewEntry::new(date(3))).await.unwrap();

  let feed = s.list_public_entries(10).await.unwrap();
  assert_eq!(feed.len(), 1);
  assert_eq!(feed[0].entry_id, shared.entry_id);
}

#[tokio::test]
async fn public_feed_respects_limit_newest_first() {
  let s = store().await;
  let owner = Uuid::new_v4();
  for day in 1..=4 {
    let mut input = NewEntry::new(date(day));
    input.is_public = true;
    s.add_entry(owner, input).await.unwrap();
  }

  let feed = s.list_public_entries(2).await.unwrap();
  let dates: Vec<_> = feed.iter().map(|e| e.date).collect();
  assert_eq!(dates, vec![date(4), date(3)]);
  assert_eq!(s.list_public_entries(0).await.unwrap().len(), 0);
}

// ─── Profiles ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn put_profile_upserts() {
  let s = store().await;
  let user = Uuid::new_v4();
  assert!(s.get_profile(user).await.unwrap().is_none());

  let mut profile = Profile::new(user);
  profile.taper_stage = TaperStage::Active;
  s.put_profile(profile.clone()).await.unwrap();

  profile.taper_stage = TaperStage::Completed;
  profile.drug = Some("sertraline".into());
  s.put_profile(profile.clone()).await.unwrap();

  assert_eq!(s.get_profile(user).await.unwrap(), Some(profile));
}

// ─── Forum ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn threads_and_replies() {
  let s = store().await;
  let thread_id = thread(&s).await;
  let first = reply(&s, thread_id).await;
  let second = reply(&s, thread_id).await;

  let fetched = s.get_thread(thread_id).await.unwrap().unwrap();
  assert_eq!(fetched.vote_score, 0);
  assert_eq!(s.list_threads().await.unwrap().len(), 1);

  let replies = s.list_replies(thread_id).await.unwrap();
  let ids: Vec<_> = replies.iter().map(|r| r.reply_id).collect();
  assert_eq!(ids, vec![first, second]);
  assert!(s.get_reply(Uuid::new_v4()).await.unwrap().is_none());
}

// ─── Vote protocol ───────────────────────────────────────────────────────────

#[tokio::test]
async fn upvote_twice_returns_to_none() {
  let s = store().await;
  let thread_id = thread(&s).await;
  let other = Uuid::new_v4();
  cast_vote(&s, other, VoteClick::Thread { thread_id, direction: VoteDirection::Up })
    .await
    .unwrap();
  let before = s.count_votes(VoteTarget::thread(thread_id)).await.unwrap();

  let voter = Uuid::new_v4();
  let click = VoteClick::Thread { thread_id, direction: VoteDirection::Up };

  let first = cast_vote(&s, voter, click).await.unwrap();
  assert_eq!(first.state, VoteState::Up);
  assert_eq!(first.score, before + 1);

  let second = cast_vote(&s, voter, click).await.unwrap();
  assert_eq!(second.state, VoteState::None);
  assert_eq!(second.score, before);
  assert!(s.find_vote(voter, VoteTarget::thread(thread_id)).await.unwrap().is_none());

  let stored = s.get_thread(thread_id).await.unwrap().unwrap();
  assert_eq!(stored.vote_score, before);
}

#[tokio::test]
async fn switching_direction_updates_the_single_row() {
  let s = store().await;
  let reply_id = reply(&s, thread(&s).await).await;
  let voter = Uuid::new_v4();
  let target = VoteTarget::reply(reply_id);

  cast_vote(&s, voter, VoteClick::Reply { reply_id, direction: VoteDirection::Up })
    .await
    .unwrap();
  let created = s.find_vote(voter, target).await.unwrap().unwrap();

  let outcome = cast_vote(&s, voter, VoteClick::Reply { reply_id, direction: VoteDirection::Down })
    .await
    .unwrap();
  assert_eq!(outcome.state, VoteState::Down);
  assert_eq!(outcome.score, 1);

  let record = s.find_vote(voter, target).await.unwrap().unwrap();
  assert_eq!(record.direction, Some(VoteDirection::Down));
  assert_eq!(record.created_at, created.created_at);
  assert_eq!(s.count_votes(target).await.unwrap(), 1);
}

#[tokio::test]
async fn score_counts_rows_not_net_direction() {
  let s = store().await;
  let thread_id = thread(&s).await;

  for direction in [VoteDirection::Up, VoteDirection::Down, VoteDirection::Down] {
    cast_vote(&s, Uuid::new_v4(), VoteClick::Thread { thread_id, direction })
      .await
      .unwrap();
  }

  let stored = s.get_thread(thread_id).await.unwrap().unwrap();
  assert_eq!(stored.vote_score, 3);
}

#[tokio::test]
async fn helpful_toggles_and_is_counted_separately() {
  let s = store().await;
  let reply_id = reply(&s, thread(&s).await).await;
  let voter = Uuid::new_v4();

  cast_vote(&s, voter, VoteClick::Reply { reply_id, direction: VoteDirection::Up })
    .await
    .unwrap();

  let marked = cast_vote(&s, voter, VoteClick::Helpful { reply_id }).await.unwrap();
  assert_eq!(marked.state, VoteState::Voted);
  assert_eq!(marked.score, 1);

  let stored = s.get_reply(reply_id).await.unwrap().unwrap();
  assert_eq!(stored.helpful_count, 1);
  assert_eq!(stored.vote_score, 1);

  let record = s.find_vote(voter, VoteTarget::helpful(reply_id)).await.unwrap().unwrap();
  assert_eq!(record.direction, None);

  let unmarked = cast_vote(&s, voter, VoteClick::Helpful { reply_id }).await.unwrap();
  assert_eq!(unmarked.state, VoteState::None);
  assert_eq!(unmarked.score, 0);
  assert_eq!(s.get_reply(reply_id).await.unwrap().unwrap().vote_score, 1);
}

#[tokio::test]
async fn recount_is_idempotent_and_heals_drift() {
  let s = store().await;
  let thread_id = thread(&s).await;
  let target = VoteTarget::thread(thread_id);

  cast_vote(&s, Uuid::new_v4(), VoteClick::Thread { thread_id, direction: VoteDirection::Up })
    .await
    .unwrap();

  // Simulate a lost write-back.
  s.write_aggregate(target, 42).await.unwrap();
  assert_eq!(s.read_aggregate(target).await.unwrap(), Some(42));

  assert_eq!(recount(&s, target).await.unwrap(), 1);
  assert_eq!(recount(&s, target).await.unwrap(), 1);
  assert_eq!(s.read_aggregate(target).await.unwrap(), Some(1));
}

#[tokio::test]
async fn concurrent_voters_converge() {
  let s = store().await;
  let thread_id = thread(&s).await;

  let voters: Vec<Uuid> = (0..8).map(|_| Uuid::new_v4()).collect();
  let tasks = voters.iter().map(|&voter| {
    let s = s.clone();
    tokio::spawn(async move {
      cast_vote(&s, voter, VoteClick::Thread { thread_id, direction: VoteDirection::Up }).await
    })
  });
  for task in tasks.collect::<Vec<_>>() {
    task.await.unwrap().unwrap();
  }

  // Write-backs may land out of order; the rows themselves are exact and a
  // reconciliation pass restores the aggregate.
  let target = VoteTarget::thread(thread_id);
  assert_eq!(s.count_votes(target).await.unwrap(), 8);
  recount(&s, target).await.unwrap();
  let stored = s.get_thread(thread_id).await.unwrap().unwrap();
  assert_eq!(stored.vote_score, 8);
}

#[tokio::test]
async fn vote_on_missing_target_surfaces_error() {
  let s = store().await;
  let err = cast_vote(
    &s,
    Uuid::new_v4(),
    VoteClick::Thread { thread_id: Uuid::new_v4(), direction: VoteDirection::Up },
  )
  .await
  .unwrap_err();
  assert!(matches!(err, crate::Error::TargetNotFound(_)));
}

#[tokio::test]
async fn update_missing_vote_errors() {
  let s = store().await;
  let err = s
    .update_vote(Uuid::new_v4(), VoteTarget::thread(Uuid::new_v4()), VoteDirection::Down)
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::VoteNotFound { .. }));
}

// ─── Analytics over stored entries ───────────────────────────────────────────

#[tokio::test]
async fn dashboard_from_stored_history() {
  let s = store().await;
  let owner = Uuid::new_v4();
  for (d, dose) in [(1, 40.0), (2, 35.0), (3, 30.0), (4, 20.0)] {
    s.add_entry(owner, checkin(d, Some(dose), Some(7), &[])).await.unwrap();
  }

  let entries = s.list_entries(owner).await.unwrap();
  let dashboard =
    taper_core::dashboard::Dashboard::compute(&entries, &Profile::new(owner), date(5));
  assert_eq!(dashboard.streak.current, 4);
  assert_eq!(dashboard.dose.map(|d| d.reduced), Some(50));
}
