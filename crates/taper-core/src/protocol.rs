//! The vote reconciliation protocol.
//!
//! A vote is a short sequence of independent store calls: look up the voter's
//! record, insert/update/delete it, count every record for the target, and
//! write that count to the target's aggregate column. Nothing wraps the
//! sequence in a transaction. The aggregate is always re-derived from the
//! persisted rows, so concurrent voters converge once each sequence finishes.
//!
//! Store errors are returned unchanged. A failure after the record write
//! leaves the aggregate stale until the next successful vote or [`recount`].

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  store::CommunityStore,
  vote::{VoteAction, VoteClick, VoteState, VoteTarget},
};

/// Result of [`cast_vote`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteOutcome {
  pub target: VoteTarget,
  /// The voter's standing after the click.
  pub state:  VoteState,
  /// The freshly counted aggregate, as written to the target.
  pub score:  i64,
}

/// Apply one click by `voter_id` and reconcile the target's aggregate.
pub async fn cast_vote<S>(
  store: &S,
  voter_id: Uuid,
  click: VoteClick,
) -> Result<VoteOutcome, S::Error>
where
  S: CommunityStore,
{
  let target = click.target();
  let existing = store.find_vote(voter_id, target).await?;
  let before = VoteState::from_record(existing.as_ref());
  let (action, state) = before.transition(click.direction());

  tracing::debug!(
    %voter_id,
    target_id = %target.target_id,
    kind = %target.kind,
    ?before,
    ?action,
    "applying vote"
  );

  match action {
    VoteAction::Insert(direction) => {
      store.insert_vote(voter_id, target, direction).await?;
    }
    VoteAction::Update(direction) => {
      store.update_vote(voter_id, target, direction).await?;
    }
    VoteAction::Delete => store.delete_vote(voter_id, target).await?,
  }

  let score = recount(store, target).await?;
  Ok(VoteOutcome { target, state, score })
}

/// Count the target's records and write the count back to its aggregate.
///
/// Idempotent; also usable as a standalone reconciliation pass.
pub async fn recount<S>(store: &S, target: VoteTarget) -> Result<i64, S::Error>
where
  S: CommunityStore,
{
  let count = store.count_votes(target).await?;
  store.write_aggregate(target, count).await?;
  tracing::debug!(target_id = %target.target_id, kind = %target.kind, count, "aggregate reconciled");
  Ok(count)
}
