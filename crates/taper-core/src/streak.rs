//! Check-in streaks and the mood stability score.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entry::{JournalEntry, SortDirection, sort_entries};

/// Streak counters, all measured in distinct calendar days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
  /// Consecutive days ending today or yesterday; 0 if the run has lapsed or
  /// the latest check-in is dated after today.
  pub current: u32,
  pub longest: u32,
  /// Number of distinct days with at least one check-in.
  pub total:   u32,
}

/// Compute streaks relative to `today` (the caller's local calendar day).
pub fn compute_streak(entries: &[JournalEntry], today: NaiveDate) -> Streak {
  let mut dates: Vec<NaiveDate> = entries.iter().map(|e| e.date).collect();
  dates.sort_unstable_by(|a, b| b.cmp(a));
  dates.dedup();

  let Some(&latest) = dates.first() else {
    return Streak::default();
  };

  let adjacent = |pair: &[NaiveDate]| (pair[0] - pair[1]).num_days() == 1;

  let current = if matches!((today - latest).num_days(), 0 | 1) {
    1 + dates.windows(2).take_while(|pair| adjacent(*pair)).count() as u32
  } else {
    0
  };

  let mut longest = 1;
  let mut run = 1;
  for pair in dates.windows(2) {
    if adjacent(pair) {
      run += 1;
      longest = longest.max(run);
    } else {
      run = 1;
    }
  }

  Streak { current, longest, total: dates.len() as u32 }
}

/// A 0–100 score rewarding a high, steady mood over the last week of entries.
///
/// Returns `None` with fewer than 3 entries, or when fewer than 2 of the 7
/// most recent entries carry a mood score.
pub fn stability_score(entries: &[JournalEntry]) -> Option<u8> {
  if entries.len() < 3 {
    return None;
  }

  let moods: Vec<f64> = sort_entries(entries, SortDirection::Desc)
    .into_iter()
    .take(7)
    .filter_map(|e| e.mood_score)
    .map(f64::from)
    .collect();
  if moods.len() < 2 {
    return None;
  }

  let n = moods.len() as f64;
  let avg = moods.iter().sum::<f64>() / n;
  let variance = moods.iter().map(|m| (m - avg).powi(2)).sum::<f64>() / n;

  let score = (avg / 10.0) * 60.0 + (40.0 - variance * 5.0).max(0.0);
  Some(score.round().min(100.0) as u8)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::entry::fixtures::*;

  #[test]
  fn empty_history_has_no_streak() {
    assert_eq!(compute_streak(&[], day(0)), Streak::default());
  }

  #[test]
  fn consecutive_days_ending_today() {
    let today = day(10);
    let entries: Vec<_> = (0..5).map(|i| entry(day(10 - i))).collect();
    let streak = compute_streak(&entries, today);
    assert_eq!(streak.current, 5);
    assert_eq!(streak.current, streak.total);
    assert_eq!(streak.current, streak.longest);
  }

  #[test]
  fn single_stale_entry() {
    let today = day(10);
    let streak = compute_streak(&[entry(day(0))], today);
    assert_eq!(streak.current, 0);
    assert_eq!(streak.longest, 1);
    assert_eq!(streak.total, 1);
  }

  #[test]
  fn gap_breaks_current_streak() {
    let today = day(10);
    let entries = vec![entry(day(7)), entry(day(10)), entry(day(9))];
    let streak = compute_streak(&entries, today);
    assert_eq!(streak.current, 2);
    assert_eq!(streak.longest, 2);
    assert_eq!(streak.total, 3);
  }

  #[test]
  fn streak_ending_yesterday_still_counts() {
    let today = day(10);
    let entries = vec![entry(day(9)), entry(day(8))];
    assert_eq!(compute_streak(&entries, today).current, 2);
  }

  #[test]
  fn future_dated_entry_is_not_a_live_streak() {
    let today = day(10);
    let streak = compute_streak(&[entry(day(15))], today);
    assert_eq!(streak.current, 0);
    assert_eq!(streak.total, 1);

    // A run that includes today is still broken by a later future date.
    let entries = vec![entry(day(9)), entry(day(10)), entry(day(11))];
    assert_eq!(compute_streak(&entries, today).current, 0);
  }

  #[test]
  fn duplicate_dates_count_once() {
    let today = day(3);
    let entries = vec![entry(day(3)), entry(day(3)), entry(day(2))];
    let streak = compute_streak(&entries, today);
    assert_eq!(streak.total, 2);
    assert_eq!(streak.current, 2);
  }

  #[test]
  fn longest_run_found_in_the_past() {
    let today = day(30);
    let mut entries: Vec<_> = (0..4).map(|i| entry(day(i))).collect();
    entries.push(entry(day(29)));
    let streak = compute_streak(&entries, today);
    assert_eq!(streak.current, 1);
    assert_eq!(streak.longest, 4);
  }

  #[test]
  fn stability_needs_three_entries() {
    let entries = vec![with_mood(day(0), 8), with_mood(day(1), 8)];
    assert_eq!(stability_score(&entries), None);
  }

  #[test]
  fn stability_needs_two_moods_in_recent_window() {
    let entries = vec![entry(day(0)), entry(day(1)), with_mood(day(2), 6)];
    assert_eq!(stability_score(&entries), None);
  }

  #[test]
  fn steady_top_mood_scores_100() {
    let entries: Vec<_> = (0..7).map(|i| with_mood(day(i), 10)).collect();
    assert_eq!(stability_score(&entries), Some(100));
  }

  #[test]
  fn volatile_mood_scores_lower() {
    let volatile: Vec<_> = (0..7)
      .map(|i| with_mood(day(i), if i % 2 == 0 { 1 } else { 10 }))
      .collect();
    let steady: Vec<_> = (0..7).map(|i| with_mood(day(i), 10)).collect();
    let volatile_score = stability_score(&volatile).unwrap();
    assert!(volatile_score < stability_score(&steady).unwrap());
    // Variance is far above 8, so only the average contributes.
    assert_eq!(volatile_score, 29);
  }

  #[test]
  fn only_the_seven_most_recent_entries_count() {
    let mut entries: Vec<_> = (0..7).map(|i| with_mood(day(10 + i), 5)).collect();
    entries.extend((0..5).map(|i| with_mood(day(i), 1)));
    // Seven fives: avg 5, variance 0 → 30 + 40.
    assert_eq!(stability_score(&entries), Some(70));
  }
}
