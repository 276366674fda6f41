//! Percentage dose reduction from the first to the latest dosed check-in.

use serde::{Deserialize, Serialize};

use crate::entry::{JournalEntry, SortDirection, sort_entries};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoseProgress {
  /// Dose of the oldest entry with a positive dose.
  pub original: f64,
  /// Dose of the newest entry with a positive dose.
  pub current:  f64,
  /// `current` as a rounded percentage of `original`.
  pub pct:      i64,
  /// `100 - pct`. Negative when the dose went up.
  pub reduced:  i64,
  pub drug:     Option<String>,
}

impl DoseProgress {
  /// `reduced` clamped to 0–100, for filling a progress ring.
  pub fn display_fill(&self) -> u8 { self.reduced.clamp(0, 100) as u8 }
}

/// Returns `None` unless at least two entries carry a dose above zero.
pub fn dose_progress(entries: &[JournalEntry]) -> Option<DoseProgress> {
  let dosed: Vec<(&JournalEntry, f64)> = sort_entries(entries, SortDirection::Desc)
    .into_iter()
    .filter_map(|e| e.positive_dose().map(|d| (e, d)))
    .collect();
  if dosed.len() < 2 {
    return None;
  }

  let (newest, current) = dosed[0];
  let (_, original) = dosed[dosed.len() - 1];
  let pct = (current / original * 100.0).round() as i64;

  let drug = newest
    .drug
    .clone()
    .or_else(|| dosed.iter().find_map(|(e, _)| e.drug.clone()));

  Some(DoseProgress { original, current, pct, reduced: 100 - pct, drug })
}
