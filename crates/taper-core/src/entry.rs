//! Journal entries and the normalisation helpers every analytics function
//! builds on.
//!
//! Entries are plain check-in records. Analytics never mutate them; they sort
//! copies of the references instead.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── JournalEntry ────────────────────────────────────────────────────────────

/// One check-in record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
  pub entry_id:     Uuid,
  pub owner_id:     Uuid,
  /// Calendar day of the check-in. Several entries may share a date.
  pub date:         NaiveDate,
  pub drug:         Option<String>,
  /// Dose in mg at the time of the entry.
  pub dose_numeric: Option<f64>,
  /// Self-reported mood, 1–10.
  pub mood_score:   Option<u8>,
  /// Symptom labels in the order the user entered them.
  #[serde(default)]
  pub symptoms:     Vec<String>,
  pub notes:        Option<String>,
  #[serde(default)]
  pub is_public:    bool,
  /// Server-assigned; never changes after creation.
  pub created_at:   DateTime<Utc>,
}

impl JournalEntry {
  /// The dose, when it counts as a real reduction data point (`> 0`).
  pub fn positive_dose(&self) -> Option<f64> {
    self.dose_numeric.filter(|d| *d > 0.0)
  }
}

// ─── NewEntry ────────────────────────────────────────────────────────────────

/// Input to [`crate::store::CommunityStore::add_entry`] and
/// [`crate::store::CommunityStore::update_entry`]. Editing an entry overwrites
/// every field listed here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewEntry {
  pub date:         NaiveDate,
  pub drug:         Option<String>,
  pub dose_numeric: Option<f64>,
  pub mood_score:   Option<u8>,
  #[serde(default)]
  pub symptoms:     Vec<String>,
  pub notes:        Option<String>,
  #[serde(default)]
  pub is_public:    bool,
}

impl NewEntry {
  /// Convenience constructor with all optional fields empty.
  pub fn new(date: NaiveDate) -> Self {
    Self { date, ..Default::default() }
  }

  /// Reject values the journal form would never produce.
  pub fn validate(&self) -> Result<()> {
    if let Some(mood) = self.mood_score
      && !(1..=10).contains(&mood)
    {
      return Err(Error::InvalidMoodScore(i64::from(mood)));
    }
    if let Some(dose) = self.dose_numeric
      && (!dose.is_finite() || dose < 0.0)
    {
      return Err(Error::InvalidDose(dose));
    }
    Ok(())
  }
}

// ─── Sorting ─────────────────────────────────────────────────────────────────

/// Order in which [`sort_entries`] arranges entries by date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
  /// Oldest first.
  Asc,
  /// Most recent first.
  Desc,
}

/// Sort entries by `date`.
///
/// The sort is stable: entries sharing a date keep their input order in both
/// directions, so repeated renders never reorder same-day check-ins.
pub fn sort_entries(
  entries: &[JournalEntry],
  direction: SortDirection,
) -> Vec<&JournalEntry> {
  let mut sorted: Vec<&JournalEntry> = entries.iter().collect();
  match direction {
    SortDirection::Asc => sorted.sort_by(|a, b| a.date.cmp(&b.date)),
    SortDirection::Desc => sorted.sort_by(|a, b| b.date.cmp(&a.date)),
  }
  sorted
}

/// Round to two decimal places for display.
pub(crate) fn round2(value: f64) -> f64 { (value * 100.0).round() / 100.0 }

#[cfg(test)]
pub(crate) mod fixtures {
  use chrono::{Duration, NaiveDate, Utc};
  use uuid::Uuid;

  use super::JournalEntry;

  pub fn day(offset: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap() + Duration::days(offset)
  }

  pub fn entry(date: NaiveDate) -> JournalEntry {
    JournalEntry {
      entry_id: Uuid::new_v4(),
      owner_id: Uuid::nil(),
      date,
      drug: None,
      dose_numeric: None,
      mood_score: None,
      symptoms: Vec::new(),
      notes: None,
      is_public: false,
      created_at: Utc::now(),
    }
  }

  pub fn with_dose(date: NaiveDate, dose: f64) -> JournalEntry {
    JournalEntry { dose_numeric: Some(dose), ..entry(date) }
  }

  pub fn with_mood(date: NaiveDate, mood: u8) -> JournalEntry {
    JournalEntry { mood_score: Some(mood), ..entry(date) }
  }
}
