use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use cell::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use input::*;
pub use timer::*;
pub use types::*;

mod cell;
mod engine;
mod error;
mod generator;
mod input;
mod timer;
mod types;

pub const MAX_COLUMNS: Coord = 30;
pub const MAX_ROWS: Coord = 24;
pub const MAX_MINES: CellCount = 667;

/// The elapsed-seconds display saturates here.
pub const MAX_ELAPSED_SECS: u32 = 999;

/// Board dimensions and mine count for one round.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub columns: Coord,
    pub rows: Coord,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(columns: Coord, rows: Coord, mines: CellCount) -> Self {
        Self {
            columns,
            rows,
            mines,
        }
    }

    /// Builds a config, silently clamping oversized values to the configured maxima.
    pub fn new(columns: Coord, rows: Coord, mines: CellCount) -> Self {
        let clamped_columns = columns.clamp(1, MAX_COLUMNS);
        let clamped_rows = rows.clamp(1, MAX_ROWS);
        let total = mult(clamped_columns, clamped_rows);
        let mine_limit = MAX_MINES.min(total.saturating_sub(1)).max(1);
        let clamped_mines = mines.clamp(1, mine_limit);

        if (clamped_columns, clamped_rows, clamped_mines) != (columns, rows, mines) {
            log::warn!(
                "config clamped: {}x{} with {} mines -> {}x{} with {} mines",
                columns,
                rows,
                mines,
                clamped_columns,
                clamped_rows,
                clamped_mines
            );
        }

        Self::new_unchecked(clamped_columns, clamped_rows, clamped_mines)
    }

    pub const fn size(&self) -> Coord2 {
        (self.columns, self.rows)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.columns, self.rows)
    }

    pub const fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mines
    }
}

/// Named `(columns, rows, mines)` presets. A closed enumeration, so the
/// invalid-difficulty failure mode cannot occur at runtime.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Expert,
}

impl Difficulty {
    pub const fn config(self) -> GameConfig {
        match self {
            Self::Beginner => GameConfig::new_unchecked(9, 9, 10),
            Self::Intermediate => GameConfig::new_unchecked(16, 16, 40),
            Self::Expert => GameConfig::new_unchecked(30, 16, 99),
        }
    }
}

/// A generated minefield: the cell grid plus its mine count.
///
/// Mine flags and adjacency counts are computed in the constructor and never
/// change afterwards; a new round replaces the board wholesale.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    cells: Array2<Cell>,
    mine_count: CellCount,
}

impl Board {
    /// Builds a board with mines at the given coordinates. Used by tests and
    /// deterministic layouts; random boards come from a [`BoardGenerator`].
    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());

        for &coords in mine_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::InvalidCoords);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        if mine_mask.iter().all(|&mine| mine) {
            return Err(GameError::TooManyMines);
        }

        Ok(Self::from_mine_mask(mine_mask))
    }

    pub(crate) fn from_mine_mask(mine_mask: Array2<bool>) -> Self {
        let (columns, rows) = mine_mask.grid_bounds();

        let cells = Array2::from_shape_fn(mine_mask.raw_dim(), |(x, y)| {
            let coords = (x as Coord, y as Coord);
            let id = coords.1 as CellCount * columns as CellCount + coords.0 as CellCount;
            Cell::new(id, coords, mine_mask[[x, y]])
        });

        let mut board = Self {
            cells,
            mine_count: mine_mask.iter().filter(|&&mine| mine).count() as CellCount,
        };

        for y in 0..rows {
            for x in 0..columns {
                let coords = (x, y);
                let count = mine_mask
                    .iter_neighbors(coords)
                    .filter(|&pos| mine_mask[pos.to_nd_index()])
                    .count() as u8;
                board.cells[coords.to_nd_index()].set_adjacent_mines(count);
            }
        }

        board
    }

    pub fn size(&self) -> Coord2 {
        self.cells.grid_bounds()
    }

    pub fn columns(&self) -> Coord {
        self.size().0
    }

    pub fn rows(&self) -> Coord {
        self.size().1
    }

    pub fn total_cells(&self) -> CellCount {
        self.cells.len() as CellCount
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn in_bounds(&self, coords: Coord2) -> bool {
        let (columns, rows) = self.size();
        coords.0 < columns && coords.1 < rows
    }

    pub fn cell(&self, coords: Coord2) -> &Cell {
        &self.cells[coords.to_nd_index()]
    }

    pub(crate) fn cell_mut(&mut self, coords: Coord2) -> &mut Cell {
        &mut self.cells[coords.to_nd_index()]
    }

    pub fn iter_cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// The up-to-8 cells surrounding `coords`.
    pub fn cells_adjacent_to(&self, coords: Coord2) -> impl Iterator<Item = &Cell> + '_ {
        self.cells
            .iter_neighbors(coords)
            .map(move |pos| self.cell(pos))
    }

    pub(crate) fn iter_cardinal(&self, coords: Coord2) -> OffsetIter {
        self.cells.iter_cardinal(coords)
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        self.cell(coords)
    }
}

/// Outcome of a mark toggle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    /// Whether this outcome could have caused an update to the game.
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

/// Outcome of a reveal.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    /// Whether this outcome could have caused an update to the game.
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            HitMine => true,
            Won => true,
        }
    }
}
