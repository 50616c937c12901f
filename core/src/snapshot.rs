use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Everything a presentation layer needs to draw a game, detached from the engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub session: SessionId,
    pub mode: Mode,
    pub size: Coord2,
    pub state: EngineState,
    pub outcome: Option<Outcome>,
    pub cells: Array2<CellView>,
    pub mines_left: isize,
    pub timer: u32,
    pub clock: String,
}

impl Snapshot {
    pub fn from_engine(engine: &GameEngine) -> Self {
        let size = engine.size();
        let cells = Array2::from_shape_fn(size.to_nd_index(), |(row, col)| {
            engine.view_of((row as Coord, col as Coord))
        });

        Self {
            session: engine.session(),
            mode: engine.mode(),
            size,
            state: engine.state(),
            outcome: engine.outcome(),
            cells,
            mines_left: engine.mines_left(),
            timer: engine.timer().value(),
            clock: engine.clock_display(),
        }
    }

    pub fn cell(&self, coords: Coord2) -> Result<CellView> {
        self.cells
            .get(coords.to_nd_index())
            .copied()
            .ok_or(GameError::InvalidCoords)
    }

    /// Positions whose view differs from `older`, every cell when the shapes differ.
    pub fn changed_since(&self, older: &Snapshot) -> Vec<Coord2> {
        let same_shape = self.cells.dim() == older.cells.dim();
        self.cells
            .indexed_iter()
            .filter(|&(index, view)| !same_shape || older.cells[index] != *view)
            .map(|((row, col), _)| (row as Coord, col as Coord))
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        if self.cells.dim() != (self.size.0 as usize, self.size.1 as usize) {
            return Err(GameError::InvalidBoardShape);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(size: Coord2, mines: &[Coord2]) -> GameEngine {
        let layout = MineLayout::from_mine_coords(size, mines).unwrap();
        GameEngine::from_layout(Settings::default(), Mode::Normal, layout)
    }

    #[test]
    fn snapshot_mirrors_engine() {
        let mut engine = engine((3, 4), &[(0, 3)]);
        engine.toggle_flag((2, 3)).unwrap();
        engine.reveal((2, 0)).unwrap();
        engine.tick();

        let snapshot = Snapshot::from_engine(&engine);

        assert!(snapshot.validate().is_ok());
        assert_eq!(snapshot.size, (3, 4));
        assert_eq!(snapshot.state, EngineState::Active);
        assert_eq!(snapshot.outcome, None);
        assert_eq!(snapshot.mines_left, 0);
        assert_eq!(snapshot.clock, "0:01");
        assert_eq!(snapshot.cell((2, 0)), Ok(CellView::Revealed(0)));
        assert_eq!(snapshot.cell((1, 2)), Ok(CellView::Revealed(1)));
        assert_eq!(snapshot.cell((2, 3)), Ok(CellView::Flagged));
        assert_eq!(snapshot.cell((0, 3)), Ok(CellView::Hidden));
        assert_eq!(snapshot.cell((3, 0)), Err(GameError::InvalidCoords));
    }

    #[test]
    fn changed_since_lists_updated_cells() {
        let mut engine = engine((3, 3), &[(0, 0), (2, 2)]);
        let before = Snapshot::from_engine(&engine);

        engine.reveal((1, 1)).unwrap();
        engine.toggle_flag((0, 0)).unwrap();
        let after = Snapshot::from_engine(&engine);

        assert_eq!(after.changed_since(&before), vec![(0, 0), (1, 1)]);
        assert!(after.changed_since(&after).is_empty());
    }

    #[test]
    fn loss_snapshot_exposes_mines() {
        let mut engine = engine((2, 2), &[(0, 0), (1, 1)]);
        engine.reveal((0, 0)).unwrap();

        let snapshot = Snapshot::from_engine(&engine);

        assert_eq!(snapshot.outcome, Some(Outcome::Lost));
        assert_eq!(snapshot.cell((0, 0)), Ok(CellView::Detonated));
        assert_eq!(snapshot.cell((1, 1)), Ok(CellView::Mine));
        assert!(snapshot.cells.iter().filter(|view| view.is_mine_exposed()).count() == 2);
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let engine = GameEngine::with_seed(Settings::default(), Mode::Tournament, 4).unwrap();
        let snapshot = Snapshot::from_engine(&engine);

        let json = serde_json::to_string(&snapshot).unwrap();
        let parsed: Snapshot = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, snapshot);
        assert_eq!(parsed.clock, "20:00");
        assert_eq!(parsed.cells.len(), 1600);
    }
}
