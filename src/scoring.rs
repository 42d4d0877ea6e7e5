//! Attempt scoring: grading a recalled range against the reference grid.
//!
//! Every hand painted in the reference is graded exactly once (correct,
//! missed or wrong colour). Hands painted only in the attempt are extra.
//! Accuracy is the share of reference hands recalled with the right colour.

use serde::{Deserialize, Serialize};

use crate::domain::{CellStateMap, ColorRef, Hand, GRID_SIZE};

// ============================================================================
// Result types
// ============================================================================

/// A hand painted in both grids, but with different colours
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncorrectColorHand {
  pub hand: Hand,
  pub expected_color: ColorRef,
  pub actual_color: ColorRef,
}

/// Categorized diff of an attempt against its reference.
///
/// All hand lists are in grid order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringResult {
  pub correct_hands: Vec<Hand>,
  pub missed_hands: Vec<Hand>,
  pub extra_hands: Vec<Hand>,
  pub incorrect_color_hands: Vec<IncorrectColorHand>,
  /// Number of painted reference hands (the accuracy denominator)
  pub total_hands_in_range: usize,
  /// Percentage rounded to one decimal, 0 for an empty reference
  pub accuracy: f64,
}

impl ScoringResult {
  pub fn correct_count(&self) -> usize {
    self.correct_hands.len()
  }

  pub fn missed_count(&self) -> usize {
    self.missed_hands.len()
  }

  pub fn extra_count(&self) -> usize {
    self.extra_hands.len()
  }

  pub fn incorrect_color_count(&self) -> usize {
    self.incorrect_color_hands.len()
  }

  /// Hands that count as mistakes for problem-hand tracking:
  /// missed hands first, then wrong-colour hands
  pub fn mistaken_hands(&self) -> impl Iterator<Item = Hand> + '_ {
    self
      .missed_hands
      .iter()
      .copied()
      .chain(self.incorrect_color_hands.iter().map(|h| h.hand))
  }
}

// ============================================================================
// Scoring
// ============================================================================

/// Round half-up to one decimal place
pub fn round_to_tenth(value: f64) -> f64 {
  (value * 10.0).round() / 10.0
}

/// Compare an attempt with the reference range.
///
/// Total over all inputs: an empty reference yields accuracy 0 and turns
/// every painted attempt cell into an extra hand.
pub fn score_attempt(reference: &CellStateMap, attempt: &CellStateMap) -> ScoringResult {
  let mut result = ScoringResult::default();

  for (hand, expected) in reference.iter() {
    match attempt.get(hand) {
      Some(actual) if actual == expected => result.correct_hands.push(*hand),
      None => result.missed_hands.push(*hand),
      Some(actual) => result.incorrect_color_hands.push(IncorrectColorHand {
        hand: *hand,
        expected_color: expected.clone(),
        actual_color: actual.clone(),
      }),
    }
  }

  // Independent pass: only hands never graded above can be extra
  result.extra_hands = attempt
    .painted_hands()
    .filter(|hand| !reference.is_painted(hand))
    .collect();

  result.total_hands_in_range = reference.len();
  result.accuracy = if result.total_hands_in_range > 0 {
    round_to_tenth(result.correct_count() as f64 / result.total_hands_in_range as f64 * 100.0)
  } else {
    0.0
  };

  result
}

// ============================================================================
// Per-cell comparison
// ============================================================================

/// How a single cell compares between reference and attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellOutcome {
  Correct,
  Missed,
  Extra,
  WrongColor,
  /// Unpainted in both grids
  Untouched,
}

impl CellOutcome {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Correct => "correct",
      Self::Missed => "missed",
      Self::Extra => "extra",
      Self::WrongColor => "wrong_color",
      Self::Untouched => "untouched",
    }
  }
}

pub fn classify_cell(hand: &Hand, reference: &CellStateMap, attempt: &CellStateMap) -> CellOutcome {
  match (reference.get(hand), attempt.get(hand)) {
    (Some(expected), Some(actual)) if expected == actual => CellOutcome::Correct,
    (Some(_), Some(_)) => CellOutcome::WrongColor,
    (Some(_), None) => CellOutcome::Missed,
    (None, Some(_)) => CellOutcome::Extra,
    (None, None) => CellOutcome::Untouched,
  }
}

/// Outcome of every cell, laid out like the range grid
pub fn comparison_grid(
  reference: &CellStateMap,
  attempt: &CellStateMap,
) -> [[CellOutcome; GRID_SIZE]; GRID_SIZE] {
  let mut grid = [[CellOutcome::Untouched; GRID_SIZE]; GRID_SIZE];
  for hand in Hand::all() {
    grid[hand.row()][hand.col()] = classify_cell(&hand, reference, attempt);
  }
  grid
}

// ============================================================================
// Performance rating
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceRating {
  Perfect,
  Excellent,
  Good,
  NeedsPractice,
  KeepTrying,
}

impl PerformanceRating {
  pub fn from_accuracy(accuracy: f64) -> Self {
    if accuracy >= 95.0 {
      Self::Perfect
    } else if accuracy >= 85.0 {
      Self::Excellent
    } else if accuracy >= 70.0 {
      Self::Good
    } else if accuracy >= 50.0 {
      Self::NeedsPractice
    } else {
      Self::KeepTrying
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      Self::Perfect => "Perfect!",
      Self::Excellent => "Excellent",
      Self::Good => "Good",
      Self::NeedsPractice => "Needs Practice",
      Self::KeepTrying => "Keep Trying",
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashSet;

  fn hands(names: &[&str]) -> Vec<Hand> {
    names.iter().map(|s| s.parse().unwrap()).collect()
  }

  #[test]
  fn test_partial_recall() {
    let reference = CellStateMap::from([("AA", "green"), ("KK", "green")]);
    let attempt = CellStateMap::from([("AA", "green")]);
    let result = score_attempt(&reference, &attempt);

    assert_eq!(result.correct_hands, hands(&["AA"]));
    assert_eq!(result.missed_hands, hands(&["KK"]));
    assert!(result.extra_hands.is_empty());
    assert!(result.incorrect_color_hands.is_empty());
    assert_eq!(result.total_hands_in_range, 2);
    assert_eq!(result.accuracy, 50.0);
  }

  #[test]
  fn test_wrong_color() {
    let reference = CellStateMap::from([("AKs", "red")]);
    let attempt = CellStateMap::from([("AKs", "blue")]);
    let result = score_attempt(&reference, &attempt);

    assert!(result.correct_hands.is_empty());
    assert_eq!(result.incorrect_color_hands.len(), 1);
    let wrong = &result.incorrect_color_hands[0];
    assert_eq!(wrong.hand.to_string(), "AKs");
    assert_eq!(wrong.expected_color.as_str(), "red");
    assert_eq!(wrong.actual_color.as_str(), "blue");
    assert_eq!(result.accuracy, 0.0);
  }

  #[test]
  fn test_empty_reference_scores_zero() {
    let reference = CellStateMap::new();
    let attempt = CellStateMap::from([("AA", "green"), ("72o", "red")]);
    let result = score_attempt(&reference, &attempt);

    assert_eq!(result.total_hands_in_range, 0);
    assert_eq!(result.accuracy, 0.0);
    assert_eq!(result.extra_hands, hands(&["AA", "72o"]));
  }

  #[test]
  fn test_both_empty() {
    let result = score_attempt(&CellStateMap::new(), &CellStateMap::new());
    assert_eq!(result, ScoringResult::default());
  }

  #[test]
  fn test_default_in_attempt_counts_as_missed() {
    let reference = CellStateMap::from([("QQ", "raise")]);
    let attempt = CellStateMap::from([("QQ", "default")]);
    let result = score_attempt(&reference, &attempt);
    assert_eq!(result.missed_hands, hands(&["QQ"]));
  }

  #[test]
  fn test_color_identity_only() {
    let reference = CellStateMap::from([("AA", "mixed3"), ("KK", "#ff0000")]);
    let attempt = CellStateMap::from([("AA", "mixed3"), ("KK", "#ff0000")]);
    let result = score_attempt(&reference, &attempt);
    assert_eq!(result.correct_count(), 2);
    assert_eq!(result.accuracy, 100.0);
  }

  #[test]
  fn test_accuracy_rounds_to_tenth() {
    let reference = CellStateMap::from([("AA", "g"), ("KK", "g"), ("QQ", "g")]);
    let attempt = CellStateMap::from([("AA", "g")]);
    assert_eq!(score_attempt(&reference, &attempt).accuracy, 33.3);

    let attempt = CellStateMap::from([("AA", "g"), ("KK", "g")]);
    assert_eq!(score_attempt(&reference, &attempt).accuracy, 66.7);
  }

  #[test]
  fn test_round_half_up() {
    assert_eq!(round_to_tenth(12.25), 12.3);
    assert_eq!(round_to_tenth(0.04), 0.0);
    assert_eq!(round_to_tenth(99.95), 100.0);
  }

  #[test]
  fn test_partition_is_disjoint_and_complete() {
    let reference = CellStateMap::from([
      ("AA", "raise"),
      ("KK", "raise"),
      ("AKs", "call"),
      ("AQo", "raise"),
      ("T9s", "call"),
    ]);
    let attempt = CellStateMap::from([
      ("AA", "raise"),
      ("AKs", "raise"),
      ("T9s", "call"),
      ("22", "call"),
      ("A5s", "raise"),
    ]);
    let result = score_attempt(&reference, &attempt);

    let correct: HashSet<Hand> = result.correct_hands.iter().copied().collect();
    let missed: HashSet<Hand> = result.missed_hands.iter().copied().collect();
    let extra: HashSet<Hand> = result.extra_hands.iter().copied().collect();
    let wrong: HashSet<Hand> = result.incorrect_color_hands.iter().map(|h| h.hand).collect();

    assert!(correct.is_disjoint(&missed));
    assert!(correct.is_disjoint(&extra));
    assert!(correct.is_disjoint(&wrong));
    assert!(missed.is_disjoint(&extra));
    assert!(missed.is_disjoint(&wrong));
    assert!(extra.is_disjoint(&wrong));

    let graded = correct.len() + missed.len() + wrong.len();
    assert_eq!(graded, result.total_hands_in_range);
    assert_eq!(extra, hands(&["22", "A5s"]).into_iter().collect());
    assert_eq!(result.accuracy, 40.0);
  }

  #[test]
  fn test_accuracy_bounded_for_full_grid() {
    let mut reference = CellStateMap::new();
    let mut attempt = CellStateMap::new();
    for hand in Hand::all() {
      reference.paint(hand, "fold");
      attempt.paint(hand, "fold");
    }
    let result = score_attempt(&reference, &attempt);
    assert_eq!(result.total_hands_in_range, 169);
    assert_eq!(result.accuracy, 100.0);
  }

  #[test]
  fn test_mistaken_hands_order() {
    let reference = CellStateMap::from([("AA", "r"), ("KK", "r"), ("QQ", "r")]);
    let attempt = CellStateMap::from([("AA", "b")]);
    let result = score_attempt(&reference, &attempt);
    let mistakes: Vec<Hand> = result.mistaken_hands().collect();
    assert_eq!(mistakes, hands(&["KK", "QQ", "AA"]));
  }

  #[test]
  fn test_classify_cell() {
    let reference = CellStateMap::from([("AA", "r"), ("KK", "r"), ("QQ", "r")]);
    let attempt = CellStateMap::from([("AA", "r"), ("KK", "b"), ("JJ", "r")]);
    let h = |s: &str| s.parse::<Hand>().unwrap();

    assert_eq!(classify_cell(&h("AA"), &reference, &attempt), CellOutcome::Correct);
    assert_eq!(classify_cell(&h("KK"), &reference, &attempt), CellOutcome::WrongColor);
    assert_eq!(classify_cell(&h("QQ"), &reference, &attempt), CellOutcome::Missed);
    assert_eq!(classify_cell(&h("JJ"), &reference, &attempt), CellOutcome::Extra);
    assert_eq!(classify_cell(&h("TT"), &reference, &attempt), CellOutcome::Untouched);

    let grid = comparison_grid(&reference, &attempt);
    assert_eq!(grid[1][1], CellOutcome::WrongColor);
    assert_eq!(grid[3][3], CellOutcome::Extra);
    assert_eq!(grid[12][0], CellOutcome::Untouched);
  }

  #[test]
  fn test_performance_rating_thresholds() {
    assert_eq!(PerformanceRating::from_accuracy(100.0), PerformanceRating::Perfect);
    assert_eq!(PerformanceRating::from_accuracy(95.0), PerformanceRating::Perfect);
    assert_eq!(PerformanceRating::from_accuracy(94.9), PerformanceRating::Excellent);
    assert_eq!(PerformanceRating::from_accuracy(70.0), PerformanceRating::Good);
    assert_eq!(PerformanceRating::from_accuracy(50.0), PerformanceRating::NeedsPractice);
    assert_eq!(PerformanceRating::from_accuracy(49.9), PerformanceRating::KeepTrying);
    assert_eq!(PerformanceRating::KeepTrying.label(), "Keep Trying");
  }

  #[test]
  fn test_result_serializes_camel_case() {
    let reference = CellStateMap::from([("AKs", "red")]);
    let attempt = CellStateMap::from([("AKs", "blue")]);
    let json = serde_json::to_value(score_attempt(&reference, &attempt)).unwrap();
    assert_eq!(json["incorrectColorHands"][0]["hand"], "AKs");
    assert_eq!(json["incorrectColorHands"][0]["expectedColor"], "red");
    assert_eq!(json["incorrectColorHands"][0]["actualColor"], "blue");
    assert_eq!(json["totalHandsInRange"], 1);
  }
}
