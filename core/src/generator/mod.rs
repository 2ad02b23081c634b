use crate::*;
pub use random::*;

mod random;

/// Source of mine placements for a new round.
pub trait GridGenerator {
    fn generate(self, config: GameConfig) -> Grid;
}

/// Creates a fresh, fully hidden grid using seeded random placement.
///
/// `mine_count` is clamped to `1..size*size`, so at least one gem always exists.
pub fn initialize_grid(size: Coord, mine_count: CellCount, seed: u64) -> Grid {
    RandomGridGenerator::new(seed).generate(GameConfig::new(size, mine_count))
}
