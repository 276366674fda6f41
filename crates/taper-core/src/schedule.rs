//! Linear taper schedule projection.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::entry::round2;

/// Plans with more reductions than this are treated as degenerate.
pub const MAX_STEPS: u32 = 520;

/// Parameters for [`plan_schedule`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SchedulePlan {
  pub start_dose:     f64,
  pub target_dose:    f64,
  /// Number of reductions between start and target.
  pub steps:          u32,
  pub interval_weeks: u32,
  pub start_date:     NaiveDate,
}

/// One projected point of the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
  pub step: u32,
  pub date: NaiveDate,
  /// Rounded to 2 decimal places.
  pub dose: f64,
  /// Dose as a rounded percentage of the start dose.
  pub pct:  i64,
}

/// Project `steps + 1` evenly spaced waypoints from the start dose down to the
/// target dose.
///
/// Degenerate plans yield an empty schedule: non-positive start dose, zero
/// steps or interval, more than [`MAX_STEPS`] steps, non-finite doses, or a
/// final date past the end of the calendar.
pub fn plan_schedule(plan: &SchedulePlan) -> Vec<Waypoint> {
  let SchedulePlan { start_dose, target_dose, steps, interval_weeks, start_date } =
    *plan;
  if !start_dose.is_finite()
    || !target_dose.is_finite()
    || start_dose <= 0.0
    || !(1..=MAX_STEPS).contains(&steps)
    || interval_weeks < 1
  {
    return Vec::new();
  }

  let target = target_dose.max(0.0);
  let reduction = (start_dose - target) / f64::from(steps);

  (0..=steps)
    .map(|i| {
      // Clamp so float error never dips the final step below target.
      let dose = target.max(start_dose - reduction * f64::from(i));
      let weeks = i64::from(i) * i64::from(interval_weeks);
      let date = Duration::try_weeks(weeks).and_then(|d| start_date.checked_add_signed(d))?;
      Some(Waypoint {
        step: i,
        date,
        dose: round2(dose),
        pct: (dose / start_dose * 100.0).round() as i64,
      })
    })
    .collect::<Option<Vec<_>>>()
    .unwrap_or_default()
}
