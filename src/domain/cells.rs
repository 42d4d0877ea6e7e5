use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::hand::Hand;

/// Colour stored for an unpainted cell
pub const DEFAULT_COLOR: &str = "default";

/// Opaque colour identifier ("green", "mixed1", a hex value...).
///
/// Never holds the `"default"` sentinel; unpainted cells are simply absent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorRef(String);

impl ColorRef {
  /// Returns None for the unpainted sentinel and the empty string
  pub fn new(id: &str) -> Option<Self> {
    if id.is_empty() || id == DEFAULT_COLOR {
      None
    } else {
      Some(Self(id.to_string()))
    }
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

/// Painted cells of a range grid, keyed by hand.
///
/// Iteration follows grid order (row-major) since `Hand` orders by position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct CellStateMap {
  cells: BTreeMap<Hand, ColorRef>,
}

impl CellStateMap {
  pub fn new() -> Self {
    Self::default()
  }

  /// Build from loosely-typed input, returning the keys that are not hands.
  pub fn from_raw<I, K, V>(raw: I) -> (Self, Vec<String>)
  where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
  {
    let mut map = Self::new();
    let mut ignored = Vec::new();

    for (key, color) in raw {
      match key.as_ref().parse::<Hand>() {
        Ok(hand) => map.paint(hand, color.as_ref()),
        Err(_) => {
          tracing::debug!("Ignoring unknown hand key {:?}", key.as_ref());
          ignored.push(key.as_ref().to_string());
        }
      }
    }

    (map, ignored)
  }

  /// Colour of a cell, None when unpainted
  pub fn get(&self, hand: &Hand) -> Option<&ColorRef> {
    self.cells.get(hand)
  }

  /// Paint a cell; painting with `"default"` clears it
  pub fn paint(&mut self, hand: Hand, color: &str) {
    match ColorRef::new(color) {
      Some(color) => {
        self.cells.insert(hand, color);
      }
      None => self.clear(&hand),
    }
  }

  pub fn clear(&mut self, hand: &Hand) {
    self.cells.remove(hand);
  }

  pub fn is_painted(&self, hand: &Hand) -> bool {
    self.cells.contains_key(hand)
  }

  pub fn len(&self) -> usize {
    self.cells.len()
  }

  pub fn is_empty(&self) -> bool {
    self.cells.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&Hand, &ColorRef)> {
    self.cells.iter()
  }

  pub fn painted_hands(&self) -> impl Iterator<Item = Hand> + '_ {
    self.cells.keys().copied()
  }

  /// Card combinations covered by the painted cells (1326 for a full grid)
  pub fn combo_count(&self) -> u32 {
    self.cells.keys().map(Hand::combos).sum()
  }
}

impl From<BTreeMap<String, String>> for CellStateMap {
  fn from(raw: BTreeMap<String, String>) -> Self {
    Self::from_raw(raw).0
  }
}

impl From<CellStateMap> for BTreeMap<String, String> {
  fn from(map: CellStateMap) -> Self {
    map
      .cells
      .into_iter()
      .map(|(hand, color)| (hand.to_string(), color.0))
      .collect()
  }
}

impl<const N: usize> From<[(&str, &str); N]> for CellStateMap {
  fn from(entries: [(&str, &str); N]) -> Self {
    Self::from_raw(entries).0
  }
}
