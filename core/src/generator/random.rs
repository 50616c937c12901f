use ndarray::Array2;

use super::*;

/// Uniform placement that keeps the first revealed cell and its neighbors free of mines.
///
/// Candidates are drawn with replacement and rejected when they already hold a mine or touch
/// the excluded cell, until the requested count is reached.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMineGenerator {
    seed: u64,
    exclude: Coord2,
}

impl RandomMineGenerator {
    pub fn new(seed: u64, exclude: Coord2) -> Self {
        Self { seed, exclude }
    }

    /// Cells that may hold a mine, the excluded block is clipped by the grid edge.
    fn eligible_cells(&self, size: Coord2) -> CellCount {
        let block = NeighborIter::new(self.exclude, size).count() as CellCount + 1;
        mult(size.0, size.1).saturating_sub(block)
    }
}

impl MineGenerator for RandomMineGenerator {
    fn generate(self, config: &GameConfig) -> Result<MineLayout> {
        use rand::prelude::*;

        let (rows, cols) = config.size;
        if self.exclude.0 >= rows || self.exclude.1 >= cols {
            return Err(GameError::InvalidCoords);
        }

        let eligible = self.eligible_cells(config.size);
        if config.mines > eligible {
            log::warn!(
                "Cannot place {} mines, only {} cells are eligible",
                config.mines,
                eligible
            );
            return Err(GameError::TooManyMines);
        }

        let mut mines: Array2<bool> = Array2::default(config.size.to_nd_index());
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut mines_placed = 0;
        let mut rejected = 0usize;

        while mines_placed < config.mines {
            let coords = (rng.random_range(0..rows), rng.random_range(0..cols));
            if mines[coords.to_nd_index()] || chebyshev(coords, self.exclude) <= 1 {
                rejected += 1;
                continue;
            }
            mines[coords.to_nd_index()] = true;
            mines_placed += 1;
        }

        log::debug!(
            "Placed {} mines around {:?} (seed {}, {} rejected draws)",
            mines_placed,
            self.exclude,
            self.seed,
            rejected
        );
        MineLayout::from_mine_mask(mines)
    }
}
