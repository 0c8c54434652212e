use ndarray::Array2;
use std::collections::BTreeSet;

use super::*;

/// Uniform random mine placement: cell indices are drawn with rejection until
/// the requested number of distinct mines exists.
///
/// The seed is the injection point for reproducible boards in tests; gameplay
/// callers seed from entropy. The starting cell is not excluded from placement,
/// so a first click can detonate.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RandomBoardGenerator {
    seed: u64,
}

impl RandomBoardGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }
}

impl BoardGenerator for RandomBoardGenerator {
    fn generate(self, config: GameConfig) -> Board {
        use rand::prelude::*;

        let config = GameConfig::new(config.columns, config.rows, config.mines);
        let total_cells = config.total_cells();

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut mine_indices: BTreeSet<CellCount> = BTreeSet::new();
        while mine_indices.len() < config.mines as usize {
            mine_indices.insert(rng.gen_range(0..total_cells));
        }

        let columns = config.columns as CellCount;
        let mut mine_mask: Array2<bool> = Array2::default(config.size().to_nd_index());
        for index in mine_indices {
            let coords = ((index % columns) as Coord, (index / columns) as Coord);
            mine_mask[coords.to_nd_index()] = true;
        }

        log::debug!(
            "generated {}x{} board with {} mines (seed {})",
            config.columns,
            config.rows,
            config.mines,
            self.seed
        );

        Board::from_mine_mask(mine_mask)
    }
}
