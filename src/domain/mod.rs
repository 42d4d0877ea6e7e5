pub mod cells;
pub mod hand;

pub use cells::{CellStateMap, ColorRef, DEFAULT_COLOR};
pub use hand::{Hand, HandKind, ParseHandError, Rank, GRID_SIZE, HAND_COUNT};
