use serde::{Deserialize, Serialize};

use crate::*;

/// Ruleset selected for a game.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Normal,
    /// Denser board and a countdown that ends the game on expiry.
    Tournament,
}

impl Mode {
    pub const fn other(self) -> Self {
        match self {
            Self::Normal => Self::Tournament,
            Self::Tournament => Self::Normal,
        }
    }
}

/// How the win condition treats flags.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinPolicy {
    /// All safe cells revealed and the flags mark exactly the mine set.
    #[default]
    Strict,
    /// All safe cells revealed, flags are ignored.
    Permissive,
}

/// Timer behavior of a game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Clock {
    CountUp,
    CountDown { limit: u32 },
}

impl Clock {
    pub const fn starting_value(self) -> u32 {
        match self {
            Self::CountUp => 0,
            Self::CountDown { limit } => limit,
        }
    }
}

/// Resolved parameters of a single game.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub mines: CellCount,
    pub clock: Clock,
    pub win_policy: WinPolicy,
}

impl GameConfig {
    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    /// Mines must fit outside the 3x3 block kept clear around the first reveal.
    pub fn validate(&self) -> Result<()> {
        if self.size.0 == 0 || self.size.1 == 0 {
            return Err(GameError::InvalidBoardShape);
        }
        if u32::from(self.mines) + 9 > u32::from(self.total_cells()) {
            return Err(GameError::TooManyMines);
        }
        Ok(())
    }
}

/// Engine configuration, shared by every game an engine plays.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Side of the square grid.
    pub grid_size: Coord,
    pub normal_mines: CellCount,
    pub tournament_mines: CellCount,
    /// Tournament countdown in seconds.
    pub time_limit: u32,
    pub win_policy: WinPolicy,
}

impl Settings {
    pub const GRID_SIZE: Coord = 40;
    pub const NORMAL_MINES: CellCount = 250;
    pub const TOURNAMENT_MINES: CellCount = 500;
    pub const TIME_LIMIT: u32 = 20 * 60;

    /// Parses settings from JSON, missing fields take their default.
    pub fn from_json(input: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(input)
            .map_err(|err| GameError::InvalidSettings(err.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        self.game_config(Mode::Normal).validate()?;
        self.game_config(Mode::Tournament).validate()?;
        if self.time_limit == 0 {
            return Err(GameError::InvalidSettings(
                "time limit must be at least one second".into(),
            ));
        }
        Ok(())
    }

    pub fn game_config(&self, mode: Mode) -> GameConfig {
        let (mines, clock) = match mode {
            Mode::Normal => (self.normal_mines, Clock::CountUp),
            Mode::Tournament => (
                self.tournament_mines,
                Clock::CountDown {
                    limit: self.time_limit,
                },
            ),
        };
        GameConfig {
            size: (self.grid_size, self.grid_size),
            mines,
            clock,
            win_policy: self.win_policy,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grid_size: Self::GRID_SIZE,
            normal_mines: Self::NORMAL_MINES,
            tournament_mines: Self::TOURNAMENT_MINES,
            time_limit: Self::TIME_LIMIT,
            win_policy: WinPolicy::default(),
        }
    }
}
