//! Vote records, the per-voter toggle state machine, and the optimistic score
//! shown while a vote is in flight.
//!
//! Thread and reply votes carry a direction; "helpful" marks on replies are
//! presence-only. Either way at most one record exists per
//! `(voter, target, kind)`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Kinds and directions ────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum VoteKind {
  Thread,
  Reply,
  /// A "this helped me" mark on a reply.
  Helpful,
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum VoteDirection {
  Up,
  Down,
}

/// The entity a vote applies to, tagged with the kind of vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoteTarget {
  pub target_id: Uuid,
  pub kind:      VoteKind,
}

impl VoteTarget {
  pub fn thread(thread_id: Uuid) -> Self {
    Self { target_id: thread_id, kind: VoteKind::Thread }
  }

  pub fn reply(reply_id: Uuid) -> Self {
    Self { target_id: reply_id, kind: VoteKind::Reply }
  }

  pub fn helpful(reply_id: Uuid) -> Self {
    Self { target_id: reply_id, kind: VoteKind::Helpful }
  }
}

// ─── Records ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
  pub voter_id:   Uuid,
  pub target:     VoteTarget,
  /// `None` for helpful marks.
  pub direction:  Option<VoteDirection>,
  pub created_at: DateTime<Utc>,
}

// ─── Clicks and state ────────────────────────────────────────────────────────

/// What the user clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum VoteClick {
  Thread { thread_id: Uuid, direction: VoteDirection },
  Reply { reply_id: Uuid, direction: VoteDirection },
  Helpful { reply_id: Uuid },
}

impl VoteClick {
  pub fn target(&self) -> VoteTarget {
    match *self {
      Self::Thread { thread_id, .. } => VoteTarget::thread(thread_id),
      Self::Reply { reply_id, .. } => VoteTarget::reply(reply_id),
      Self::Helpful { reply_id } => VoteTarget::helpful(reply_id),
    }
  }

  pub fn direction(&self) -> Option<VoteDirection> {
    match *self {
      Self::Thread { direction, .. } | Self::Reply { direction, .. } => Some(direction),
      Self::Helpful { .. } => None,
    }
  }
}

/// A voter's standing on one target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteState {
  #[default]
  None,
  Up,
  Down,
  /// Helpful mark present.
  Voted,
}

/// The single storage write a click resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteAction {
  Insert(Option<VoteDirection>),
  /// Change direction in place; the record is never deleted and recreated.
  Update(VoteDirection),
  Delete,
}

impl VoteState {
  /// The state implied by the voter's existing record, if any.
  pub fn from_record(record: Option<&VoteRecord>) -> Self {
    match record {
      None => Self::None,
      Some(r) => match r.direction {
        Some(VoteDirection::Up) => Self::Up,
        Some(VoteDirection::Down) => Self::Down,
        None => Self::Voted,
      },
    }
  }

  /// Apply a click. `clicked` is the direction of a thread/reply vote, or
  /// `None` for a helpful toggle.
  pub fn transition(self, clicked: Option<VoteDirection>) -> (VoteAction, Self) {
    match (self, clicked) {
      (Self::None, Some(dir)) => (VoteAction::Insert(Some(dir)), dir.into()),
      (Self::None, None) => (VoteAction::Insert(None), Self::Voted),
      (Self::Up, Some(VoteDirection::Up))
      | (Self::Down, Some(VoteDirection::Down))
      | (Self::Voted, None) => (VoteAction::Delete, Self::None),
      (Self::Up | Self::Down | Self::Voted, Some(dir)) => {
        (VoteAction::Update(dir), dir.into())
      }
      // A directional record toggled as helpful cannot happen with records
      // of a single kind; treat it as a retraction.
      (Self::Up | Self::Down, None) => (VoteAction::Delete, Self::None),
    }
  }

  /// Whether a record exists in this state.
  pub fn has_record(self) -> bool { self != Self::None }
}

impl From<VoteDirection> for VoteState {
  fn from(dir: VoteDirection) -> Self {
    match dir {
      VoteDirection::Up => Self::Up,
      VoteDirection::Down => Self::Down,
    }
  }
}

// ─── Optimistic score ────────────────────────────────────────────────────────

/// The score a client shows for one target.
///
/// A local delta is layered on top of the last confirmed count so the UI
/// responds immediately. The delta is dropped as soon as the authoritative
/// recount arrives, or when the request fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimisticScore {
  confirmed: i64,
  pending:   i64,
}

impl OptimisticScore {
  pub fn new(confirmed: i64) -> Self { Self { confirmed, pending: 0 } }

  /// Record the local effect of moving from `before` to `after`. The
  /// aggregate counts records, so only record creation and removal move it.
  pub fn apply_local(&mut self, before: VoteState, after: VoteState) {
    self.pending += i64::from(after.has_record()) - i64::from(before.has_record());
  }

  /// Replace everything with the server's count.
  pub fn resolve(&mut self, authoritative: i64) {
    self.confirmed = authoritative;
    self.pending = 0;
  }

  /// Drop the local delta after a failed request.
  pub fn reject(&mut self) { self.pending = 0; }

  pub fn displayed(&self) -> i64 { self.confirmed + self.pending }

  pub fn confirmed(&self) -> i64 { self.confirmed }
}

#[cfg(test)]
mod tests {
  use super::*;

  use VoteDirection::{Down, Up};

  #[test]
  fn clicking_from_none_inserts() {
    assert_eq!(
      VoteState::None.transition(Some(Up)),
      (VoteAction::Insert(Some(Up)), VoteState::Up)
    );
    assert_eq!(
      VoteState::None.transition(None),
      (VoteAction::Insert(None), VoteState::Voted)
    );
  }

  #[test]
  fn clicking_active_direction_retracts() {
    assert_eq!(VoteState::Up.transition(Some(Up)), (VoteAction::Delete, VoteState::None));
    assert_eq!(
      VoteState::Down.transition(Some(Down)),
      (VoteAction::Delete, VoteState::None)
    );
  }

  #[test]
  fn clicking_other_direction_updates_in_place() {
    assert_eq!(
      VoteState::Up.transition(Some(Down)),
      (VoteAction::Update(Down), VoteState::Down)
    );
    assert_eq!(
      VoteState::Down.transition(Some(Up)),
      (VoteAction::Update(Up), VoteState::Up)
    );
  }

  #[test]
  fn helpful_toggles() {
    let (action, state) = VoteState::None.transition(None);
    assert_eq!(action, VoteAction::Insert(None));
    let (action, state) = state.transition(None);
    assert_eq!(action, VoteAction::Delete);
    assert_eq!(state, VoteState::None);
  }

  #[test]
  fn click_serde_shape() {
    let click: VoteClick = serde_json::from_value(serde_json::json!({
      "kind": "thread",
      "thread_id": Uuid::nil(),
      "direction": "down",
    }))
    .unwrap();
    assert_eq!(click.target(), VoteTarget::thread(Uuid::nil()));
    assert_eq!(click.direction(), Some(Down));
  }

  #[test]
  fn optimistic_delta_is_discarded_on_resolve() {
    let mut score = OptimisticScore::new(4);
    score.apply_local(VoteState::None, VoteState::Up);
    assert_eq!(score.displayed(), 5);

    // Another voter retracted concurrently; the server knows best.
    score.resolve(4);
    assert_eq!(score.displayed(), 4);
    assert_eq!(score.confirmed(), 4);
  }

  #[test]
  fn direction_switch_does_not_move_the_count() {
    let mut score = OptimisticScore::new(2);
    score.apply_local(VoteState::Up, VoteState::Down);
    assert_eq!(score.displayed(), 2);
  }

  #[test]
  fn rejected_vote_restores_confirmed_score() {
    let mut score = OptimisticScore::new(3);
    score.apply_local(VoteState::Voted, VoteState::None);
    assert_eq!(score.displayed(), 2);
    score.reject();
    assert_eq!(score.displayed(), 3);
  }
}
