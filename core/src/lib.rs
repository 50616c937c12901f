//! Game engine for a single-player minesweeper with a timed tournament mode.
//!
//! The engine holds pure state only. A presentation layer drives it through
//! [`GameEngine::reveal`], [`GameEngine::toggle_flag`] and [`GameEngine::tick`], then renders
//! from [`GameEngine::cell_at`] or a [`Snapshot`].

use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use engine::*;
pub use error::*;
pub use generator::*;
pub use settings::*;
pub use snapshot::*;
pub use tile::*;
pub use timer::*;
pub use types::*;

mod engine;
mod error;
mod generator;
mod settings;
mod snapshot;
mod tile;
mod timer;
mod types;

/// The mine set of a game, with neighbor counts computed once at construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    neighbor_counts: Array2<u8>,
    mine_count: CellCount,
}

impl MineLayout {
    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Result<Self> {
        let mine_count = mine_mask
            .iter()
            .filter(|&&is_mine| is_mine)
            .count()
            .try_into()
            .map_err(|_| GameError::TooManyMines)?;
        let max_side = usize::from(Coord::MAX);
        if mine_mask.nrows() > max_side || mine_mask.ncols() > max_side {
            return Err(GameError::InvalidBoardShape);
        }

        let mut neighbor_counts = Array2::default(mine_mask.dim());
        let (rows, cols) = grid_size(&mine_mask);
        for row in 0..rows {
            for col in 0..cols {
                let coords = (row, col);
                if mine_mask[coords.to_nd_index()] {
                    continue;
                }
                neighbor_counts[coords.to_nd_index()] = mine_mask
                    .iter_neighbors(coords)
                    .filter(|&pos| mine_mask[pos.to_nd_index()])
                    .count() as u8;
            }
        }

        Ok(Self {
            mine_mask,
            neighbor_counts,
            mine_count,
        })
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());

        for &coords in mine_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::InvalidCoords);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Self::from_mine_mask(mine_mask)
    }

    pub fn size(&self) -> Coord2 {
        grid_size(&self.mine_mask)
    }

    pub fn total_cells(&self) -> CellCount {
        mult(self.size().0, self.size().1)
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords]
    }

    /// Mines among the Chebyshev neighbors, always 0 for a mine cell.
    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        self.neighbor_counts[coords.to_nd_index()]
    }

    /// Positions of every mine, row by row.
    pub fn iter_mines(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.mine_mask
            .indexed_iter()
            .filter(|&(_, &is_mine)| is_mine)
            .map(|((row, col), _)| (row as Coord, col as Coord))
    }

    pub(crate) fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.mine_mask.iter_neighbors(coords)
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.mine_mask[coords.to_nd_index()]
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
    /// The flag completed the board under the strict win policy.
    Won,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbor_counts_on_hand_placed_grid() {
        let layout = MineLayout::from_mine_coords((3, 3), &[(0, 0)]).unwrap();

        assert_eq!(layout.mine_count(), 1);
        assert_eq!(layout.safe_cell_count(), 8);
        assert_eq!(layout.adjacent_mine_count((1, 1)), 1);
        assert_eq!(layout.adjacent_mine_count((0, 1)), 1);
        assert_eq!(layout.adjacent_mine_count((1, 0)), 1);
        assert_eq!(layout.adjacent_mine_count((2, 2)), 0);
        assert_eq!(layout.adjacent_mine_count((0, 2)), 0);
        assert_eq!(layout.adjacent_mine_count((0, 0)), 0);
    }

    #[test]
    fn neighbor_counts_sum_mines() {
        let mines = &[(0, 0), (0, 2), (2, 0), (2, 2)];
        let layout = MineLayout::from_mine_coords((3, 3), mines).unwrap();

        assert_eq!(layout.adjacent_mine_count((1, 1)), 4);
        assert_eq!(layout.adjacent_mine_count((0, 1)), 2);
        assert_eq!(layout.iter_mines().collect::<Vec<_>>(), mines);
    }

    #[test]
    fn rejects_out_of_bounds_mines() {
        assert_eq!(
            MineLayout::from_mine_coords((3, 3), &[(3, 0)]),
            Err(GameError::InvalidCoords)
        );
    }

    #[test]
    fn outcomes_report_updates() {
        assert!(!RevealOutcome::NoChange.has_update());
        assert!(RevealOutcome::HitMine.has_update());
        assert!(!MarkOutcome::NoChange.has_update());
        assert!(MarkOutcome::Won.has_update());
        assert!(TickOutcome::Expired.has_update());
    }

    #[test]
    fn non_square_layout_size() {
        let layout = MineLayout::from_mine_coords((2, 3), &[(1, 2)]).unwrap();

        assert_eq!(layout.size(), (2, 3));
        assert_eq!(layout.total_cells(), 6);
        assert!(layout.contains_mine((1, 2)));
        assert_eq!(layout.adjacent_mine_count((0, 1)), 1);
        assert_eq!(layout.adjacent_mine_count((0, 0)), 0);
    }
}
