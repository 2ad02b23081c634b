use ndarray::Array2;

use super::*;

/// Places mines by drawing uniformly random positions and redrawing on collisions.
///
/// Non-cryptographic and fully determined by `seed`.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomGridGenerator {
    seed: u64,
}

impl RandomGridGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl GridGenerator for RandomGridGenerator {
    fn generate(self, config: GameConfig) -> Grid {
        use rand::prelude::*;

        let size = config.size();
        let mut mines: Array2<bool> = Array2::default((size, size).to_nd_index());
        let mut mines_placed: CellCount = 0;
        let mut draws: u32 = 0;

        let mut rng = SmallRng::seed_from_u64(self.seed);
        while mines_placed < config.mines() {
            let coords: Coord2 = (rng.random_range(0..size), rng.random_range(0..size));
            draws += 1;
            let tile = &mut mines[coords.to_nd_index()];
            if !*tile {
                *tile = true;
                mines_placed += 1;
            }
        }

        log::trace!(
            "Placed {} mines on a {}x{} grid in {} draws",
            mines_placed,
            size,
            size,
            draws
        );
        Grid::from_mine_mask(&mines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn places_exact_mine_count() {
        for mines in 1..25 {
            let grid = RandomGridGenerator::new(u64::from(mines)).generate(GameConfig::new(5, mines));
            assert_eq!(grid.mine_count(), mines);
            assert_eq!(grid.iter_coords().filter(|&c| grid[c].is_mine()).count(), mines as usize);
            assert_eq!(grid.revealed_count(), 0);
        }
    }

    #[test]
    fn same_seed_same_layout() {
        let config = GameConfig::new(5, 7);
        let a = RandomGridGenerator::new(42).generate(config);
        let b = RandomGridGenerator::new(42).generate(config);
        assert_eq!(a, b);
    }

    #[test]
    fn initialize_grid_clamps_full_boards() {
        let grid = initialize_grid(5, 25, 9);
        assert_eq!(grid.mine_count(), 24);
        assert_eq!(grid.safe_tiles(), 1);

        let grid = initialize_grid(3, 500, 9);
        assert_eq!(grid.mine_count(), 8);
    }
}
