//! Symptom and mood trend alerts over the most recent check-ins.
//!
//! Each call is a pure classification of a five-entry window. At most one
//! alert comes back; there is no state carried between calls.

use serde::{Deserialize, Serialize};

use crate::entry::{JournalEntry, SortDirection, sort_entries};

const WINDOW: usize = 5;

/// Severity of a [`TrendAlert`], highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
  /// Mood falling while symptoms climb.
  Warning,
  Caution,
  Positive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendAlert {
  pub level:       AlertLevel,
  pub title:       String,
  pub message:     String,
  /// The most frequent symptom in the window, if any were logged.
  pub top_symptom: Option<String>,
}

/// Classify the recent trend. Returns `None` with fewer than 3 entries or when
/// nothing notable is happening.
pub fn analyze_trend(entries: &[JournalEntry]) -> Option<TrendAlert> {
  if entries.len() < 3 {
    return None;
  }

  let window: Vec<&JournalEntry> = sort_entries(entries, SortDirection::Desc)
    .into_iter()
    .take(WINDOW)
    .collect();

  // Index 0 is the newest check-in; `a < b` means the newer value is lower.
  let moods: Vec<u8> = window.iter().filter_map(|e| e.mood_score).collect();
  let counts: Vec<usize> = window.iter().map(|e| e.symptoms.len()).collect();

  let enough_moods = moods.len() >= 3;
  let mood_declining = enough_moods && count_pairs(&moods, |a, b| a < b) >= 2;
  let mood_improving = enough_moods && count_pairs(&moods, |a, b| a > b) >= 2;
  let symptoms_increasing = count_pairs(&counts, |a, b| a > b) >= 2;

  let top_symptom = top_symptom(&window);
  let symptom_phrase = top_symptom
    .as_deref()
    .map(|s| format!(" The most frequent symptom has been {s}."))
    .unwrap_or_default();

  let (level, title, message) = match (mood_declining, symptoms_increasing) {
    (true, true) => (
      AlertLevel::Warning,
      "Symptoms may be intensifying",
      format!(
        "Your mood is trending down while you are logging more symptoms.{symptom_phrase} \
         Consider holding your current dose and talking with your prescriber."
      ),
    ),
    (true, false) => (
      AlertLevel::Caution,
      "Mood trending down",
      "Your mood has dipped across your last few check-ins. Be gentle with \
       yourself and keep tracking."
        .to_owned(),
    ),
    (false, true) => (
      AlertLevel::Caution,
      "More symptoms recently",
      format!(
        "You have been logging more symptoms in recent check-ins.{symptom_phrase}"
      ),
    ),
    (false, false) if mood_improving => (
      AlertLevel::Positive,
      "Mood improving",
      "Your mood has been rising across your recent check-ins.".to_owned(),
    ),
    (false, false) => return None,
  };

  Some(TrendAlert {
    level,
    title: title.to_owned(),
    message,
    top_symptom,
  })
}

/// Count consecutive pairs `(values[i], values[i + 1])` satisfying `pred`.
fn count_pairs<T: Copy>(values: &[T], pred: impl Fn(T, T) -> bool) -> usize {
  values.windows(2).filter(|w| pred(w[0], w[1])).count()
}

/// Most frequent label; ties go to the label seen first, newest entry first.
fn top_symptom(window: &[&JournalEntry]) -> Option<String> {
  let mut tally: Vec<(&str, usize)> = Vec::new();
  for symptom in window.iter().flat_map(|e| e.symptoms.iter()) {
    match tally.iter_mut().find(|(label, _)| *label == symptom.as_str()) {
      Some((_, n)) => *n += 1,
      None => tally.push((symptom.as_str(), 1)),
    }
  }

  let mut best: Option<(&str, usize)> = None;
  for (label, n) in tally {
    if best.is_none_or(|(_, top)| n > top) {
      best = Some((label, n));
    }
  }
  best.map(|(label, _)| label.to_owned())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::entry::fixtures::*;

  fn checkin(offset: i64, mood: Option<u8>, symptoms: &[&str]) -> JournalEntry {
    JournalEntry {
      mood_score: mood,
      symptoms: symptoms.iter().map(|s| (*s).to_owned()).collect(),
      ..entry(day(offset))
    }
  }

  #[test]
  fn too_few_entries() {
    let entries = vec![checkin(0, Some(2), &[]), checkin(1, Some(1), &[])];
    assert_eq!(analyze_trend(&entries), None);
  }

  #[test]
  fn falling_mood_and_rising_symptoms_warn() {
    // Oldest → newest: mood 8,7,6 and symptom counts 0,1,2.
    let entries = vec![
      checkin(0, Some(8), &[]),
      checkin(1, Some(7), &["insomnia"]),
      checkin(2, Some(6), &["insomnia", "brain zaps"]),
    ];
    let alert = analyze_trend(&entries).unwrap();
    assert_eq!(alert.level, AlertLevel::Warning);
    assert_eq!(alert.top_symptom.as_deref(), Some("insomnia"));
  }

  #[test]
  fn falling_mood_alone_is_caution() {
    let entries = vec![
      checkin(0, Some(8), &[]),
      checkin(1, Some(7), &[]),
      checkin(2, Some(6), &[]),
    ];
    let alert = analyze_trend(&entries).unwrap();
    assert_eq!(alert.level, AlertLevel::Caution);
    assert_eq!(alert.title, "Mood trending down");
    assert_eq!(alert.top_symptom, None);
  }

  #[test]
  fn rising_symptoms_alone_is_caution() {
    let entries = vec![
      checkin(0, None, &[]),
      checkin(1, None, &["nausea"]),
      checkin(2, None, &["nausea", "dizziness"]),
    ];
    let alert = analyze_trend(&entries).unwrap();
    assert_eq!(alert.level, AlertLevel::Caution);
    assert_eq!(alert.title, "More symptoms recently");
  }

  #[test]
  fn rising_mood_is_positive() {
    let entries = vec![
      checkin(0, Some(4), &[]),
      checkin(1, Some(5), &[]),
      checkin(2, Some(7), &[]),
    ];
    let alert = analyze_trend(&entries).unwrap();
    assert_eq!(alert.level, AlertLevel::Positive);
  }

  #[test]
  fn flat_history_has_no_alert() {
    let entries: Vec<_> = (0..5).map(|i| checkin(i, Some(6), &["fatigue"])).collect();
    assert_eq!(analyze_trend(&entries), None);
  }

  #[test]
  fn only_five_most_recent_entries_are_considered() {
    // Old entries show a steep decline; the recent five are flat.
    let mut entries: Vec<_> = (0..5).map(|i| checkin(i, Some(9 - i as u8), &[])).collect();
    entries.extend((10..15).map(|i| checkin(i, Some(5), &[])));
    assert_eq!(analyze_trend(&entries), None);
  }

  #[test]
  fn entries_without_mood_are_skipped_when_pairing() {
    // Oldest → newest: 8, -, 7, -, 6. The three recorded moods pair up as
    // (6, 7) and (7, 8), both declining.
    let entries = vec![
      checkin(0, Some(8), &[]),
      checkin(1, None, &[]),
      checkin(2, Some(7), &[]),
      checkin(3, None, &[]),
      checkin(4, Some(6), &[]),
    ];
    let alert = analyze_trend(&entries).unwrap();
    assert_eq!(alert.title, "Mood trending down");
  }

  #[test]
  fn two_moods_in_the_window_are_not_a_trend() {
    let entries = vec![
      checkin(0, Some(9), &[]),
      checkin(1, None, &[]),
      checkin(2, None, &[]),
      checkin(3, Some(2), &[]),
      checkin(4, None, &[]),
    ];
    assert_eq!(analyze_trend(&entries), None);
  }

  #[test]
  fn top_symptom_ties_go_to_first_seen() {
    let entries = vec![
      checkin(0, None, &["headache"]),
      checkin(1, None, &["anxiety"]),
      checkin(2, None, &["anxiety", "headache"]),
    ];
    // Newest first: [anxiety, headache], [anxiety], [headache].
    let window: Vec<_> = sort_entries(&entries, SortDirection::Desc);
    assert_eq!(top_symptom(&window).as_deref(), Some("anxiety"));
  }
}
