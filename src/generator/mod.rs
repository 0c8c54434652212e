use crate::*;
pub use random::*;

mod random;

/// Strategy producing the minefield for a new round.
pub trait BoardGenerator {
    fn generate(self, config: GameConfig) -> Board;
}
