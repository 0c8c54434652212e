use serde::{Deserialize, Serialize};

use crate::{CellCount, Coord2};

/// Player-visible state of a single cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    Hidden,
    Flagged,
    Questioned,
    Revealed,
}

impl CellState {
    pub const fn is_revealed(self) -> bool {
        matches!(self, Self::Revealed)
    }

    /// Whether the player has placed an annotation on the cell.
    pub const fn is_marked(self) -> bool {
        matches!(self, Self::Flagged | Self::Questioned)
    }
}

impl Default for CellState {
    fn default() -> Self {
        Self::Hidden
    }
}

/// One square of the board.
///
/// `mine` and `adjacent_mines` are written during board construction and frozen
/// afterwards; only `state` changes during play.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    id: CellCount,
    coords: Coord2,
    mine: bool,
    adjacent_mines: u8,
    pub(crate) state: CellState,
}

impl Cell {
    pub(crate) fn new(id: CellCount, coords: Coord2, mine: bool) -> Self {
        Self {
            id,
            coords,
            mine,
            adjacent_mines: 0,
            state: CellState::Hidden,
        }
    }

    pub(crate) fn set_adjacent_mines(&mut self, count: u8) {
        self.adjacent_mines = count;
    }

    /// Stable row-major index of the cell within its board.
    pub fn id(&self) -> CellCount {
        self.id
    }

    pub fn coords(&self) -> Coord2 {
        self.coords
    }

    pub fn has_mine(&self) -> bool {
        self.mine
    }

    /// Number of the up-to-8 surrounding cells that contain a mine.
    pub fn adjacent_mines(&self) -> u8 {
        self.adjacent_mines
    }

    pub fn state(&self) -> CellState {
        self.state
    }

    pub fn is_revealed(&self) -> bool {
        self.state.is_revealed()
    }

    pub fn is_marked(&self) -> bool {
        self.state.is_marked()
    }
}
