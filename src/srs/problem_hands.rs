//! Ranking of the hands a user keeps getting wrong on a grid.

use serde::{Deserialize, Serialize};

use crate::config::PROBLEM_HANDS_LIMIT;
use crate::domain::Hand;
use crate::scoring::IncorrectColorHand;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemHandEntry {
  pub hand: Hand,
  pub miss_count: u32,
  pub total_seen: u32,
}

impl ProblemHandEntry {
  pub fn miss_rate(&self) -> f64 {
    if self.total_seen > 0 {
      self.miss_count as f64 / self.total_seen as f64
    } else {
      0.0
    }
  }
}

/// Fold one attempt's mistakes into the problem-hand list.
///
/// Only mistaken hands (missed or wrong colour) have their counters
/// bumped; hands answered correctly leave `total_seen` untouched. The
/// result is ranked by miss rate, highest first, with ties keeping their
/// previous order (new hands after existing ones), and capped at
/// [`PROBLEM_HANDS_LIMIT`] entries.
pub fn update_problem_hands(
  existing: &[ProblemHandEntry],
  missed_hands: &[Hand],
  incorrect_color_hands: &[IncorrectColorHand],
) -> Vec<ProblemHandEntry> {
  let mut problems = existing.to_vec();

  let mistakes = missed_hands
    .iter()
    .copied()
    .chain(incorrect_color_hands.iter().map(|h| h.hand));

  for hand in mistakes {
    match problems.iter_mut().find(|p| p.hand == hand) {
      Some(entry) => {
        entry.miss_count += 1;
        entry.total_seen += 1;
      }
      None => problems.push(ProblemHandEntry {
        hand,
        miss_count: 1,
        total_seen: 1,
      }),
    }
  }

  // sort_by is stable
  problems.sort_by(|a, b| b.miss_rate().total_cmp(&a.miss_rate()));
  problems.truncate(PROBLEM_HANDS_LIMIT);
  problems
}
