//! Achievement milestones and their shareable text.
//!
//! The rule set is closed: [`MilestoneRule::ALL`] lists every rule in display
//! order. Detection is stateless; tracking which milestones a user has already
//! been shown is the caller's concern.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
  entry::{JournalEntry, SortDirection, sort_entries},
  profile::{Profile, TaperStage},
};

/// Mood at or above this counts toward the good-mood run.
const GOOD_MOOD: u8 = 7;
/// Length of the good-mood run.
const MOOD_RUN: usize = 7;

// ─── Rules ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MilestoneRule {
  /// The journal spans at least this many days.
  DaysTracked(u16),
  /// The latest dose is at most a quarter of the first.
  Dose75,
  TaperCompleted,
  /// Seven consecutive check-ins with a good mood.
  MoodStreak7,
}

impl MilestoneRule {
  pub const ALL: [Self; 8] = [
    Self::DaysTracked(30),
    Self::DaysTracked(60),
    Self::DaysTracked(90),
    Self::DaysTracked(180),
    Self::DaysTracked(365),
    Self::Dose75,
    Self::TaperCompleted,
    Self::MoodStreak7,
  ];

  /// Stable identifier, e.g. `days_30` or `dose_75`.
  pub fn id(&self) -> String {
    match self {
      Self::DaysTracked(n) => format!("days_{n}"),
      Self::Dose75 => "dose_75".to_owned(),
      Self::TaperCompleted => "taper_completed".to_owned(),
      Self::MoodStreak7 => "mood_streak_7".to_owned(),
    }
  }

  pub fn label(&self) -> String {
    match self {
      Self::DaysTracked(n) => format!("{n} days of tracking"),
      Self::Dose75 => "75% dose reduction".to_owned(),
      Self::TaperCompleted => "Taper completed".to_owned(),
      Self::MoodStreak7 => "7 good days in a row".to_owned(),
    }
  }

  /// Look up a rule by its [`id`](Self::id). Only rules in [`Self::ALL`]
  /// resolve.
  pub fn from_id(id: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|rule| rule.id() == id)
  }

  pub fn is_achieved(&self, entries: &[JournalEntry], profile: &Profile) -> bool {
    match self {
      Self::DaysTracked(n) => days_tracked(entries).is_some_and(|span| span >= i64::from(*n)),
      Self::Dose75 => dose_quartered(entries),
      Self::TaperCompleted => profile.taper_stage == TaperStage::Completed,
      Self::MoodStreak7 => good_mood_run(entries),
    }
  }
}

impl fmt::Display for MilestoneRule {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.id()) }
}

impl From<MilestoneRule> for String {
  fn from(rule: MilestoneRule) -> Self { rule.id() }
}

impl TryFrom<String> for MilestoneRule {
  type Error = crate::Error;

  fn try_from(id: String) -> Result<Self, Self::Error> {
    Self::from_id(&id).ok_or(crate::Error::UnknownDiscriminant(id))
  }
}

// ─── Predicates ──────────────────────────────────────────────────────────────

/// Days between the earliest and latest entry; `None` with fewer than two.
fn days_tracked(entries: &[JournalEntry]) -> Option<i64> {
  if entries.len() < 2 {
    return None;
  }
  let first = entries.iter().map(|e| e.date).min()?;
  let last = entries.iter().map(|e| e.date).max()?;
  Some((last - first).num_days())
}

/// Any recorded dose counts here, including zero.
fn dose_quartered(entries: &[JournalEntry]) -> bool {
  let doses: Vec<f64> = sort_entries(entries, SortDirection::Asc)
    .into_iter()
    .filter_map(|e| e.dose_numeric)
    .collect();
  match (doses.first(), doses.last()) {
    (Some(first), Some(latest)) if doses.len() >= 2 => *latest <= first * 0.25,
    _ => false,
  }
}

/// Consecutive in entry order, not calendar days. A missing mood breaks the
/// run like a low one.
fn good_mood_run(entries: &[JournalEntry]) -> bool {
  let mut run = 0;
  for entry in sort_entries(entries, SortDirection::Asc) {
    if entry.mood_score.is_some_and(|m| m >= GOOD_MOOD) {
      run += 1;
      if run >= MOOD_RUN {
        return true;
      }
    } else {
      run = 0;
    }
  }
  false
}

// ─── Detection ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
  pub rule:     MilestoneRule,
  pub label:    String,
  pub achieved: bool,
}

/// Evaluate every rule in [`MilestoneRule::ALL`].
pub fn detect_milestones(entries: &[JournalEntry], profile: &Profile) -> Vec<Milestone> {
  MilestoneRule::ALL
    .into_iter()
    .map(|rule| Milestone {
      rule,
      label: rule.label(),
      achieved: rule.is_achieved(entries, profile),
    })
    .collect()
}

// ─── Share text ──────────────────────────────────────────────────────────────

/// A short sentence the user can post about `milestone`.
pub fn share_text(
  milestone: &Milestone,
  profile: &Profile,
  entries: &[JournalEntry],
) -> String {
  let sorted = sort_entries(entries, SortDirection::Asc);
  let dosed: Vec<&JournalEntry> =
    sorted.iter().copied().filter(|e| e.positive_dose().is_some()).collect();

  let drug = profile
    .drug
    .clone()
    .or_else(|| sorted.iter().rev().find_map(|e| e.drug.clone()))
    .unwrap_or_else(|| "my medication".to_owned());

  let dose_fragment = match (dosed.first(), dosed.last()) {
    (Some(first), Some(last)) if dosed.len() >= 2 => format!(
      " ({}mg \u{2192} {}mg)",
      first.dose_numeric.unwrap_or_default(),
      last.dose_numeric.unwrap_or_default(),
    ),
    _ => String::new(),
  };

  let headline = match milestone.rule {
    MilestoneRule::DaysTracked(n) => format!("{n} days of tracking my {drug} taper"),
    MilestoneRule::Dose75 => format!("a 75% reduction on my {drug} taper"),
    MilestoneRule::TaperCompleted => format!("the end of my {drug} taper"),
    MilestoneRule::MoodStreak7 => format!("7 good days in a row while tapering {drug}"),
  };

  format!("I just reached {headline}{dose_fragment}! #TaperCommunity")
}
