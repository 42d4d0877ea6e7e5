//! The 169 starting hands laid out on the 13×13 range grid.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of ranks on each side of the grid
pub const GRID_SIZE: usize = 13;

/// Number of distinct starting hands
pub const HAND_COUNT: usize = GRID_SIZE * GRID_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
  Ace,
  King,
  Queen,
  Jack,
  Ten,
  Nine,
  Eight,
  Seven,
  Six,
  Five,
  Four,
  Three,
  Two,
}

impl Rank {
  /// Grid ordering, highest rank first
  pub const ALL: [Rank; GRID_SIZE] = [
    Self::Ace,
    Self::King,
    Self::Queen,
    Self::Jack,
    Self::Ten,
    Self::Nine,
    Self::Eight,
    Self::Seven,
    Self::Six,
    Self::Five,
    Self::Four,
    Self::Three,
    Self::Two,
  ];

  pub fn index(&self) -> usize {
    *self as usize
  }

  pub fn symbol(&self) -> char {
    match self {
      Self::Ace => 'A',
      Self::King => 'K',
      Self::Queen => 'Q',
      Self::Jack => 'J',
      Self::Ten => 'T',
      Self::Nine => '9',
      Self::Eight => '8',
      Self::Seven => '7',
      Self::Six => '6',
      Self::Five => '5',
      Self::Four => '4',
      Self::Three => '3',
      Self::Two => '2',
    }
  }

  pub fn from_symbol(c: char) -> Option<Self> {
    Self::ALL.iter().copied().find(|r| r.symbol() == c)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandKind {
  Pair,
  Suited,
  Offsuit,
}

/// One cell of the range grid.
///
/// Cells above the diagonal (`row < col`) are suited, cells below are
/// offsuit and the diagonal holds the pocket pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Hand {
  row: u8,
  col: u8,
}

impl Hand {
  pub fn new(row: usize, col: usize) -> Option<Self> {
    if row < GRID_SIZE && col < GRID_SIZE {
      Some(Self {
        row: row as u8,
        col: col as u8,
      })
    } else {
      None
    }
  }

  pub fn row(&self) -> usize {
    self.row as usize
  }

  pub fn col(&self) -> usize {
    self.col as usize
  }

  pub fn kind(&self) -> HandKind {
    match self.row.cmp(&self.col) {
      std::cmp::Ordering::Equal => HandKind::Pair,
      std::cmp::Ordering::Less => HandKind::Suited,
      std::cmp::Ordering::Greater => HandKind::Offsuit,
    }
  }

  /// (higher, lower) rank of the hand
  pub fn ranks(&self) -> (Rank, Rank) {
    let high = self.row.min(self.col) as usize;
    let low = self.row.max(self.col) as usize;
    (Rank::ALL[high], Rank::ALL[low])
  }

  /// Number of concrete two-card combinations the cell stands for
  pub fn combos(&self) -> u32 {
    match self.kind() {
      HandKind::Pair => 6,
      HandKind::Suited => 4,
      HandKind::Offsuit => 12,
    }
  }

  /// All 169 hands in row-major grid order
  pub fn all() -> impl Iterator<Item = Hand> {
    (0..GRID_SIZE).flat_map(|row| {
      (0..GRID_SIZE).map(move |col| Hand {
        row: row as u8,
        col: col as u8,
      })
    })
  }

  pub fn grid() -> [[Hand; GRID_SIZE]; GRID_SIZE] {
    let mut grid = [[Hand { row: 0, col: 0 }; GRID_SIZE]; GRID_SIZE];
    for hand in Hand::all() {
      grid[hand.row()][hand.col()] = hand;
    }
    grid
  }
}

impl fmt::Display for Hand {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let (high, low) = self.ranks();
    match self.kind() {
      HandKind::Pair => write!(f, "{}{}", high.symbol(), low.symbol()),
      HandKind::Suited => write!(f, "{}{}s", high.symbol(), low.symbol()),
      HandKind::Offsuit => write!(f, "{}{}o", high.symbol(), low.symbol()),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseHandError(pub String);

impl fmt::Display for ParseHandError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "not a starting hand: {:?}", self.0)
  }
}

impl std::error::Error for ParseHandError {}

impl FromStr for Hand {
  type Err = ParseHandError;

  /// Parse canonical notation: `"AA"`, `"AKs"`, `"AKo"`.
  /// The higher rank must come first.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let err = || ParseHandError(s.to_string());
    let chars: Vec<char> = s.chars().collect();

    let (first, second, suffix) = match chars.as_slice() {
      [a, b] => (*a, *b, None),
      [a, b, c] => (*a, *b, Some(*c)),
      _ => return Err(err()),
    };
    let high = Rank::from_symbol(first).ok_or_else(err)?.index();
    let low = Rank::from_symbol(second).ok_or_else(err)?.index();

    match suffix {
      None if high == low => Ok(Hand {
        row: high as u8,
        col: high as u8,
      }),
      Some('s') if high < low => Ok(Hand {
        row: high as u8,
        col: low as u8,
      }),
      Some('o') if high < low => Ok(Hand {
        row: low as u8,
        col: high as u8,
      }),
      _ => Err(err()),
    }
  }
}

impl TryFrom<String> for Hand {
  type Error = ParseHandError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

impl From<Hand> for String {
  fn from(hand: Hand) -> Self {
    hand.to_string()
  }
}
