use serde::{Deserialize, Serialize};

/// Canonical player-visible state stored by the gameplay engine.
///
/// A cell is never revealed and flagged at once.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineCell {
    #[default]
    Hidden,
    Flagged,
    Revealed(u8),
    /// The mine that was revealed and lost the game.
    Detonated,
}

/// What the presentation layer should draw for a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    Hidden,
    Flagged,
    /// Safe cell with its neighbor mine count, 0 renders blank.
    Revealed(u8),
    /// Mine exposed after the game was lost or the time ran out.
    Mine,
    Detonated,
    /// Flag on a safe cell, only shown once the game was lost or the time ran out.
    WrongFlag,
}

impl CellView {
    pub const fn is_revealed(self) -> bool {
        matches!(self, Self::Revealed(_) | Self::Detonated)
    }

    pub const fn is_flagged(self) -> bool {
        matches!(self, Self::Flagged | Self::WrongFlag)
    }

    pub const fn is_mine_exposed(self) -> bool {
        matches!(self, Self::Mine | Self::Detonated)
    }

    pub const fn neighbor_count(self) -> Option<u8> {
        match self {
            Self::Revealed(count) => Some(count),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_queries() {
        assert!(CellView::Revealed(0).is_revealed());
        assert_eq!(CellView::Revealed(3).neighbor_count(), Some(3));
        assert_eq!(CellView::Hidden.neighbor_count(), None);
        assert!(CellView::Detonated.is_mine_exposed());
        assert!(CellView::WrongFlag.is_flagged());
        assert!(!CellView::Mine.is_flagged());
    }
}
