//! Everything the dashboard shows, derived in one pass over a user's entries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  dose::{DoseProgress, dose_progress},
  entry::JournalEntry,
  milestone::{Milestone, detect_milestones},
  profile::Profile,
  streak::{Streak, compute_streak, stability_score},
  trend::{TrendAlert, analyze_trend},
};

/// Derived metrics for one user. Absent values mean "not enough data to
/// show", never an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
  pub as_of:      NaiveDate,
  pub streak:     Streak,
  pub stability:  Option<u8>,
  pub trend:      Option<TrendAlert>,
  pub dose:       Option<DoseProgress>,
  pub milestones: Vec<Milestone>,
}

impl Dashboard {
  pub fn compute(entries: &[JournalEntry], profile: &Profile, today: NaiveDate) -> Self {
    Self {
      as_of:      today,
      streak:     compute_streak(entries, today),
      stability:  stability_score(entries),
      trend:      analyze_trend(entries),
      dose:       dose_progress(entries),
      milestones: detect_milestones(entries, profile),
    }
  }

  /// Milestones whose rule currently holds.
  pub fn achieved(&self) -> impl Iterator<Item = &Milestone> {
    self.milestones.iter().filter(|m| m.achieved)
  }
}
