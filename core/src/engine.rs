use core::num::Saturating;
use ndarray::Array2;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::*;

/// Identifies one game of an engine, bumped by every [`GameEngine::initialize`].
pub type SessionId = u64;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    /// Waiting for the first reveal, mines may not be placed yet.
    #[default]
    Ready,
    Active,
    Won,
    Lost,
    /// Tournament countdown ran out.
    Expired,
}

impl EngineState {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    pub const fn is_finished(self) -> bool {
        self.outcome().is_some()
    }

    pub const fn outcome(self) -> Option<Outcome> {
        match self {
            Self::Ready | Self::Active => None,
            Self::Won => Some(Outcome::Won),
            Self::Lost => Some(Outcome::Lost),
            Self::Expired => Some(Outcome::Expired),
        }
    }
}

/// How a finished game ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Won,
    Lost,
    Expired,
}

impl From<Outcome> for EngineState {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Won => Self::Won,
            Outcome::Lost => Self::Lost,
            Outcome::Expired => Self::Expired,
        }
    }
}

/// A single player's game, reset in place for every new game.
#[derive(Clone, Debug)]
pub struct GameEngine {
    settings: Settings,
    mode: Mode,
    config: GameConfig,
    mine_layout: Option<MineLayout>,
    board: Array2<EngineCell>,
    revealed_count: Saturating<CellCount>,
    flagged_count: Saturating<CellCount>,
    state: EngineState,
    timer: GameTimer,
    triggered_mine: Option<Coord2>,
    session: SessionId,
    rng: SmallRng,
}

impl GameEngine {
    /// Engine with the default settings, seeded from system entropy.
    pub fn new(mode: Mode) -> Result<Self> {
        Self::with_settings(Settings::default(), mode)
    }

    pub fn with_settings(settings: Settings, mode: Mode) -> Result<Self> {
        Self::with_seed(settings, mode, rand::random())
    }

    /// Deterministic engine, every game it plays derives its mines from `seed`.
    pub fn with_seed(settings: Settings, mode: Mode, seed: u64) -> Result<Self> {
        let config = settings.game_config(mode);
        config.validate()?;
        let mut engine = Self::blank(settings, mode, config, SmallRng::seed_from_u64(seed));
        engine.initialize(mode)?;
        Ok(engine)
    }

    /// Engine whose first game uses `layout` instead of random placement.
    ///
    /// Later games started with [`Self::new_game`] or [`Self::toggle_mode`] go back to
    /// `settings`.
    pub fn from_layout(settings: Settings, mode: Mode, layout: MineLayout) -> Self {
        let config = GameConfig {
            size: layout.size(),
            mines: layout.mine_count(),
            ..settings.game_config(mode)
        };
        let rng = SmallRng::seed_from_u64(rand::random());
        let mut engine = Self::blank(settings, mode, config, rng);
        engine.mine_layout = Some(layout);
        engine
    }

    fn blank(settings: Settings, mode: Mode, config: GameConfig, rng: SmallRng) -> Self {
        Self {
            settings,
            mode,
            config,
            mine_layout: None,
            board: Array2::default(config.size.to_nd_index()),
            revealed_count: Saturating(0),
            flagged_count: Saturating(0),
            state: EngineState::Ready,
            timer: GameTimer::new(config.clock),
            triggered_mine: None,
            session: 0,
            rng,
        }
    }

    /// Starts a fresh game in `mode`, nothing of the previous game survives.
    ///
    /// On error the current game is left untouched.
    pub fn initialize(&mut self, mode: Mode) -> Result<()> {
        let config = self.settings.game_config(mode);
        if let Err(err) = config.validate() {
            log::warn!("Rejected {:?} configuration {:?}: {}", mode, config, err);
            return Err(err);
        }

        self.timer.stop();
        self.mode = mode;
        self.config = config;
        self.mine_layout = None;
        self.board = Array2::default(config.size.to_nd_index());
        self.revealed_count = Saturating(0);
        self.flagged_count = Saturating(0);
        self.state = EngineState::Ready;
        self.timer = GameTimer::new(config.clock);
        self.triggered_mine = None;
        self.session = self.session.wrapping_add(1);

        log::info!(
            "New {:?} game {}: {}x{} with {} mines",
            mode,
            self.session,
            config.size.0,
            config.size.1,
            config.mines
        );
        Ok(())
    }

    pub fn new_game(&mut self) -> Result<()> {
        self.initialize(self.mode)
    }

    pub fn toggle_mode(&mut self) -> Result<()> {
        self.initialize(self.mode.other())
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.state.outcome()
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn is_first_click_pending(&self) -> bool {
        self.state.is_ready()
    }

    pub fn size(&self) -> Coord2 {
        self.config.size
    }

    pub fn total_mines(&self) -> CellCount {
        self.config.mines
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count.0
    }

    /// Mines minus flags, negative when the player placed more flags than there are mines.
    pub fn mines_left(&self) -> isize {
        (self.config.mines as isize) - (self.flagged_count.0 as isize)
    }

    pub fn timer(&self) -> &GameTimer {
        &self.timer
    }

    pub fn clock_display(&self) -> String {
        self.timer.to_string()
    }

    /// Mine set of the current game, `None` until the first reveal placed it.
    pub fn mine_layout(&self) -> Option<&MineLayout> {
        self.mine_layout.as_ref()
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let (rows, cols) = self.config.size;
        if coords.0 < rows && coords.1 < cols {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn cell_at(&self, coords: Coord2) -> Result<CellView> {
        let coords = self.validate_coords(coords)?;
        Ok(self.view_of(coords))
    }

    pub(crate) fn view_of(&self, coords: Coord2) -> CellView {
        let exposed = matches!(self.state, EngineState::Lost | EngineState::Expired);
        let has_mine = self
            .mine_layout
            .as_ref()
            .is_some_and(|layout| layout.contains_mine(coords));

        match (self.board[coords.to_nd_index()], has_mine, exposed) {
            (EngineCell::Detonated, _, _) => CellView::Detonated,
            (EngineCell::Revealed(count), _, _) => CellView::Revealed(count),
            (EngineCell::Hidden | EngineCell::Flagged, true, true) => CellView::Mine,
            (EngineCell::Flagged, false, true) => CellView::WrongFlag,
            (EngineCell::Flagged, _, _) => CellView::Flagged,
            (EngineCell::Hidden, _, _) => CellView::Hidden,
        }
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        use EngineCell::*;

        let coords = self.validate_coords(coords)?;
        if self.state.is_finished() {
            return Ok(MarkOutcome::NoChange);
        }

        match self.board[coords.to_nd_index()] {
            Hidden => {
                self.board[coords.to_nd_index()] = Flagged;
                self.flagged_count += 1;
            }
            Flagged => {
                self.board[coords.to_nd_index()] = Hidden;
                self.flagged_count -= 1;
            }
            Revealed(_) | Detonated => return Ok(MarkOutcome::NoChange),
        }
        log::debug!("Flag toggled at {:?}, {} mines left", coords, self.mines_left());

        if self.config.win_policy == WinPolicy::Strict && self.check_win() {
            self.end_game(Outcome::Won);
            Ok(MarkOutcome::Won)
        } else {
            Ok(MarkOutcome::Changed)
        }
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.validate_coords(coords)?;
        if self.state.is_finished() || self.board[coords.to_nd_index()] != EngineCell::Hidden {
            return Ok(RevealOutcome::NoChange);
        }

        if self.state.is_ready() {
            self.start(coords)?;
        }
        Ok(self.reveal_single_cell(coords))
    }

    /// Whether the current board satisfies the configured [`WinPolicy`].
    pub fn check_win(&self) -> bool {
        let Some(layout) = &self.mine_layout else {
            return false;
        };
        if self.state != EngineState::Active || self.revealed_count.0 != layout.safe_cell_count() {
            return false;
        }

        match self.config.win_policy {
            WinPolicy::Permissive => true,
            WinPolicy::Strict => {
                self.flagged_count.0 == layout.mine_count()
                    && layout
                        .iter_mines()
                        .all(|pos| self.board[pos.to_nd_index()] == EngineCell::Flagged)
            }
        }
    }

    /// Advances the timer by one second.
    pub fn tick(&mut self) -> TickOutcome {
        if self.state.is_finished() {
            return TickOutcome::Idle;
        }

        let outcome = self.timer.tick();
        if outcome == TickOutcome::Expired {
            self.end_game(Outcome::Expired);
        }
        outcome
    }

    /// Like [`Self::tick`], ignoring ticks scheduled for an earlier game.
    pub fn tick_session(&mut self, session: SessionId) -> TickOutcome {
        if session != self.session {
            log::warn!(
                "Dropping tick for session {}, current session is {}",
                session,
                self.session
            );
            return TickOutcome::Idle;
        }
        self.tick()
    }

    /// Places the mines away from the first revealed cell and starts the clock.
    fn start(&mut self, first: Coord2) -> Result<()> {
        if self.mine_layout.is_none() {
            let generator = RandomMineGenerator::new(self.rng.random(), first);
            self.mine_layout = Some(generator.generate(&self.config)?);
        }

        self.state = EngineState::Active;
        self.timer.start();
        log::debug!("Game {} started at {:?}", self.session, first);
        Ok(())
    }

    fn reveal_single_cell(&mut self, coords: Coord2) -> RevealOutcome {
        let Some(layout) = &self.mine_layout else {
            return RevealOutcome::NoChange;
        };

        if layout.contains_mine(coords) {
            self.board[coords.to_nd_index()] = EngineCell::Detonated;
            self.triggered_mine = Some(coords);
            self.end_game(Outcome::Lost);
            return RevealOutcome::HitMine;
        }

        let opened = self.flood_reveal(coords);
        self.revealed_count += opened;
        log::debug!(
            "Revealed {} cells from {:?}, {} of {} safe cells open",
            opened,
            coords,
            self.revealed_count.0,
            self.config.total_cells() - self.config.mines
        );

        if self.check_win() {
            self.end_game(Outcome::Won);
            RevealOutcome::Won
        } else {
            RevealOutcome::Revealed
        }
    }

    /// Opens `start` and, through zero-count cells, everything connected to it.
    ///
    /// Only hidden cells are opened, so the revealed state doubles as the visited set and
    /// flagged cells stop the fill.
    fn flood_reveal(&mut self, start: Coord2) -> CellCount {
        let Some(layout) = &self.mine_layout else {
            return 0;
        };
        let board = &mut self.board;

        let mut opened = 0;
        let mut to_visit = vec![start];
        while let Some(visit_coords) = to_visit.pop() {
            if board[visit_coords.to_nd_index()] != EngineCell::Hidden {
                continue;
            }

            let count = layout.adjacent_mine_count(visit_coords);
            board[visit_coords.to_nd_index()] = EngineCell::Revealed(count);
            opened += 1;
            log::trace!("Opened {:?} with count {}", visit_coords, count);

            if count == 0 {
                to_visit.extend(
                    layout
                        .iter_neighbors(visit_coords)
                        .filter(|&pos| board[pos.to_nd_index()] == EngineCell::Hidden),
                );
            }
        }
        opened
    }

    fn end_game(&mut self, outcome: Outcome) {
        if self.state.is_finished() {
            return;
        }

        self.timer.stop();
        self.state = outcome.into();

        // flag whatever the permissive policy let the player leave open
        if outcome == Outcome::Won {
            if let Some(layout) = &self.mine_layout {
                for pos in layout.iter_mines() {
                    let cell = &mut self.board[pos.to_nd_index()];
                    if *cell == EngineCell::Hidden {
                        *cell = EngineCell::Flagged;
                        self.flagged_count += 1;
                    }
                }
            }
        }

        log::debug!("Game {} ended: {:?} at {}", self.session, outcome, self.timer);
    }
}
