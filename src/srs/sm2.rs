use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{
  INITIAL_EASINESS_FACTOR, MAX_INTERVAL_DAYS, MIN_EASINESS_FACTOR, PASSING_QUALITY,
  QUALITY_THRESHOLDS,
};

/// SM-2 recall quality, 0 (blackout) to 5 (perfect)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Quality(u8);

impl Quality {
  pub const MAX: u8 = 5;

  /// Validates the 0..=5 range; the scheduler only accepts checked values
  pub fn new(value: u8) -> Option<Self> {
    (value <= Self::MAX).then_some(Self(value))
  }

  /// Map an accuracy percentage onto the quality scale
  pub fn from_accuracy(accuracy: f64) -> Self {
    QUALITY_THRESHOLDS
      .iter()
      .find(|(threshold, _)| accuracy >= *threshold)
      .map(|(_, quality)| Self(*quality))
      .unwrap_or(Self(0))
  }

  pub fn value(&self) -> u8 {
    self.0
  }

  pub fn passed(&self) -> bool {
    self.0 >= PASSING_QUALITY
  }
}

impl TryFrom<u8> for Quality {
  type Error = String;

  fn try_from(value: u8) -> Result<Self, Self::Error> {
    Self::new(value).ok_or_else(|| format!("quality must be 0-5, got {}", value))
  }
}

impl From<Quality> for u8 {
  fn from(quality: Quality) -> Self {
    quality.0
  }
}

/// Scheduling state of one grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewState {
  pub easiness_factor: f64,
  pub repetitions: i64,
  #[serde(rename = "interval")]
  pub interval_days: i64,
  pub next_review_date: DateTime<Utc>,
  pub due_for_review: bool,
}

impl ReviewState {
  /// State of a grid that has never been reviewed: due right away
  pub fn initial(now: DateTime<Utc>) -> Self {
    Self {
      easiness_factor: INITIAL_EASINESS_FACTOR,
      repetitions: 0,
      interval_days: 0,
      next_review_date: now,
      due_for_review: true,
    }
  }

  /// Schedule the next review of this state
  pub fn review(&self, quality: Quality, now: DateTime<Utc>) -> Self {
    calculate_review(
      quality,
      self.repetitions,
      self.easiness_factor,
      self.interval_days,
      now,
    )
  }
}

/// SM-2 step.
///
/// Preconditions: `current_repetitions >= 0` and `current_interval >= 0`;
/// quality range is guaranteed by [`Quality`]. The result always has an
/// interval between one day and [`MAX_INTERVAL_DAYS`] and an easiness factor
/// of at least 1.3.
pub fn calculate_review(
  quality: Quality,
  current_repetitions: i64,
  current_easiness_factor: f64,
  current_interval: i64,
  now: DateTime<Utc>,
) -> ReviewState {
  let q = quality.value() as f64;

  // EF' = EF + (0.1 - (5 - q) * (0.08 + (5 - q) * 0.02))
  let easiness_delta = 0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02);
  let new_easiness_factor = (current_easiness_factor + easiness_delta).max(MIN_EASINESS_FACTOR);

  let (new_interval, new_repetitions) = if !quality.passed() {
    // Failed review: hard reset
    (1, 0)
  } else {
    let repetitions = current_repetitions + 1;
    let interval = match repetitions {
      1 => 1,
      2 => 6,
      _ => ((current_interval as f64) * new_easiness_factor).round() as i64,
    };
    (interval.clamp(1, MAX_INTERVAL_DAYS), repetitions)
  };

  let next_review_date = now
    .checked_add_signed(Duration::days(new_interval))
    .unwrap_or(DateTime::<Utc>::MAX_UTC);

  ReviewState {
    easiness_factor: new_easiness_factor,
    repetitions: new_repetitions,
    interval_days: new_interval,
    next_review_date,
    due_for_review: is_due(next_review_date, now.date_naive()),
  }
}

/// Due when the review day is today or earlier (calendar days, UTC)
pub fn is_due(next_review_date: DateTime<Utc>, today: NaiveDate) -> bool {
  next_review_date.date_naive() <= today
}

/// Human-readable time until the next review
pub fn describe_next_review(next_review_date: Option<DateTime<Utc>>, today: NaiveDate) -> String {
  let Some(next) = next_review_date else {
    return "Not practiced yet".to_string();
  };

  let days = (next.date_naive() - today).num_days();

  if days < 0 {
    let overdue = -days;
    if overdue == 1 {
      "Due yesterday".to_string()
    } else {
      format!("Overdue by {} days", overdue)
    }
  } else if days == 0 {
    "Due today".to_string()
  } else if days == 1 {
    "Due tomorrow".to_string()
  } else if days <= 7 {
    format!("Due in {} days", days)
  } else if days <= 30 {
    let weeks = (days as f64 / 7.0).round() as i64;
    format!("Due in {} week{}", weeks, if weeks > 1 { "s" } else { "" })
  } else {
    let months = (days as f64 / 30.0).round() as i64;
    format!("Due in {} month{}", months, if months > 1 { "s" } else { "" })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;

  fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 10, 15, 30, 0).unwrap()
  }

  fn q(value: u8) -> Quality {
    Quality::new(value).unwrap()
  }

  #[test]
  fn test_quality_from_accuracy() {
    assert_eq!(Quality::from_accuracy(100.0).value(), 5);
    assert_eq!(Quality::from_accuracy(95.0).value(), 5);
    assert_eq!(Quality::from_accuracy(94.9).value(), 4);
    assert_eq!(Quality::from_accuracy(85.0).value(), 4);
    assert_eq!(Quality::from_accuracy(84.9).value(), 3);
    assert_eq!(Quality::from_accuracy(70.0).value(), 3);
    assert_eq!(Quality::from_accuracy(69.9).value(), 2);
    assert_eq!(Quality::from_accuracy(50.0).value(), 2);
    assert_eq!(Quality::from_accuracy(49.9).value(), 1);
    assert_eq!(Quality::from_accuracy(30.0).value(), 1);
    assert_eq!(Quality::from_accuracy(29.9).value(), 0);
    assert_eq!(Quality::from_accuracy(0.0).value(), 0);
  }

  #[test]
  fn test_quality_rejects_out_of_range() {
    assert!(Quality::new(5).is_some());
    assert!(Quality::new(6).is_none());
    assert!(Quality::new(255).is_none());
    assert!(serde_json::from_str::<Quality>("7").is_err());
    assert_eq!(serde_json::from_str::<Quality>("3").unwrap(), q(3));
  }

  #[test]
  fn test_first_review_perfect() {
    let result = calculate_review(q(5), 0, 2.5, 0, now());
    assert_eq!(result.repetitions, 1);
    assert_eq!(result.interval_days, 1);
    assert!((result.easiness_factor - 2.6).abs() < 1e-9);
    assert_eq!(result.next_review_date, now() + Duration::days(1));
    assert!(!result.due_for_review);
  }

  #[test]
  fn test_second_review_good() {
    let result = calculate_review(q(4), 1, 2.5, 1, now());
    assert_eq!(result.repetitions, 2);
    assert_eq!(result.interval_days, 6);
  }

  #[test]
  fn test_third_review_good() {
    let result = calculate_review(q(4), 2, 2.5, 6, now());
    assert_eq!(result.repetitions, 3);
    // Quality 4 leaves EF unchanged: 6 * 2.5 = 15
    assert_eq!(result.interval_days, 15);
  }

  #[test]
  fn test_three_perfect_reviews_from_defaults() {
    let first = ReviewState::initial(now()).review(q(5), now());
    let second = first.review(q(5), now());
    let third = second.review(q(5), now());

    assert_eq!(first.interval_days, 1);
    assert_eq!(second.interval_days, 6);
    assert_eq!(third.interval_days, (6.0 * third.easiness_factor).round() as i64);
    // 2.5 -> 2.6 -> 2.7 -> 2.8, round(6 * 2.8) = 17
    assert_eq!(third.interval_days, 17);
  }

  #[test]
  fn test_failed_review_resets() {
    let result = calculate_review(q(0), 2, 2.3, 6, now());
    assert_eq!(result.repetitions, 0);
    assert_eq!(result.interval_days, 1);
    assert!(result.easiness_factor < 2.3);
    assert!(result.easiness_factor >= MIN_EASINESS_FACTOR);
  }

  #[test]
  fn test_reset_ignores_prior_state() {
    for quality in 0..PASSING_QUALITY {
      for (reps, ef, interval) in [(0, 2.5, 0), (7, 1.3, 200), (3, 3.1, 40)] {
        let result = calculate_review(q(quality), reps, ef, interval, now());
        assert_eq!(result.repetitions, 0);
        assert_eq!(result.interval_days, 1);
      }
    }
  }

  #[test]
  fn test_quality_three_passes() {
    let result = calculate_review(q(3), 0, 2.5, 0, now());
    assert_eq!(result.repetitions, 1);
    // EF drops by 0.14 even on a pass
    assert!((result.easiness_factor - 2.36).abs() < 1e-9);
  }

  #[test]
  fn test_easiness_floor() {
    let mut state = ReviewState::initial(now());
    for i in 0..50 {
      let quality = q((i % 6) as u8 / 2);
      state = state.review(quality, now());
      assert!(state.easiness_factor >= MIN_EASINESS_FACTOR);
    }
    assert!((state.easiness_factor - MIN_EASINESS_FACTOR).abs() < 1e-9);
  }

  #[test]
  fn test_interval_always_positive_after_review() {
    let mut state = ReviewState::initial(now());
    for value in [5, 3, 0, 4, 4, 4, 1, 5, 5, 5] {
      state = state.review(q(value), now());
      assert!(state.interval_days >= 1);
    }
  }

  #[test]
  fn test_long_perfect_streak_stays_bounded() {
    let mut state = ReviewState::initial(now());
    let mut previous = 0;
    for _ in 0..50 {
      state = state.review(q(5), now());
      assert!(state.interval_days >= previous);
      assert!(state.interval_days <= MAX_INTERVAL_DAYS);
      previous = state.interval_days;
    }
    assert_eq!(state.interval_days, MAX_INTERVAL_DAYS);
    assert_eq!(state.next_review_date, now() + Duration::days(MAX_INTERVAL_DAYS));
    assert_eq!(state.repetitions, 50);
  }

  #[test]
  fn test_initial_state_is_due() {
    let state = ReviewState::initial(now());
    assert!(state.due_for_review);
    assert_eq!(state.repetitions, 0);
    assert_eq!(state.interval_days, 0);
    assert!(is_due(state.next_review_date, now().date_naive()));
  }

  #[test]
  fn test_is_due_compares_days() {
    let today = now().date_naive();
    let later_today = Utc.with_ymd_and_hms(2024, 3, 10, 23, 59, 0).unwrap();
    let tomorrow = Utc.with_ymd_and_hms(2024, 3, 11, 0, 1, 0).unwrap();
    let last_week = Utc.with_ymd_and_hms(2024, 3, 3, 9, 0, 0).unwrap();
    assert!(is_due(later_today, today));
    assert!(is_due(last_week, today));
    assert!(!is_due(tomorrow, today));
  }

  #[test]
  fn test_describe_next_review() {
    let today = now().date_naive();
    let at = |days: i64| Some(now() + Duration::days(days));

    assert_eq!(describe_next_review(None, today), "Not practiced yet");
    assert_eq!(describe_next_review(at(-1), today), "Due yesterday");
    assert_eq!(describe_next_review(at(-4), today), "Overdue by 4 days");
    assert_eq!(describe_next_review(at(0), today), "Due today");
    assert_eq!(describe_next_review(at(1), today), "Due tomorrow");
    assert_eq!(describe_next_review(at(6), today), "Due in 6 days");
    assert_eq!(describe_next_review(at(10), today), "Due in 1 week");
    assert_eq!(describe_next_review(at(15), today), "Due in 2 weeks");
    assert_eq!(describe_next_review(at(40), today), "Due in 1 month");
    assert_eq!(describe_next_review(at(95), today), "Due in 3 months");
  }

  #[test]
  fn test_review_state_serde_names() {
    let json = serde_json::to_value(ReviewState::initial(now())).unwrap();
    assert_eq!(json["easinessFactor"], 2.5);
    assert_eq!(json["interval"], 0);
    assert_eq!(json["dueForReview"], true);
  }
}
