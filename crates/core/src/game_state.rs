//! Game state module - the turn controller
//!
//! Owns the grid, the resolver and the random source, and walks each swipe
//! through `Idle -> Resolving -> Finalizing -> Idle | GameOver`:
//!
//! 1. [`GameState::submit_direction`] resolves the swipe. An empty move set is
//!    a no-op and the state goes straight back to `Idle`. Otherwise the state
//!    stays in `Resolving` and the plan is handed out for animation.
//! 2. [`GameState::finish_turn`] commits the claimed merges, spawns a tile and
//!    runs the terminal check.
//!
//! Input is only accepted in `Idle`, which is what keeps turns from
//! overlapping. [`GameState::play`] runs both halves back to back for callers
//! that do not animate.

use rand::Rng;

use crate::geometry::GridGeometry;
use crate::grid::Grid;
use crate::resolver::{MoveResolver, TileMove};
use crate::rng::SimpleRng;
use crate::snapshot::GameSnapshot;
use crate::spawner::{self, SpawnedTile};
use crate::terminal::{self, TerminalCheck};
use crate::types::*;
use crate::GridError;

/// Rules fixed for the lifetime of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub grid_size: u8,
    pub win_value: u32,
    pub terminal_check: TerminalCheck,
    pub start_tiles: u8,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            win_value: WIN_VALUE,
            terminal_check: TerminalCheck::default(),
            start_tiles: START_TILES,
        }
    }
}

impl GameConfig {
    /// Check the rules and return the grid geometry they describe
    pub fn validate(&self) -> Result<GridGeometry, GridError> {
        let geometry = GridGeometry::new(self.grid_size)?;
        // The target must be a value a merge can produce.
        if self.win_value < 4 || !self.win_value.is_power_of_two() {
            return Err(GridError::InvalidValue(self.win_value));
        }
        // The board must start with at least one tile and one empty cell.
        if self.start_tiles == 0 || self.start_tiles as usize >= geometry.cell_count() {
            return Err(GridError::Full);
        }
        Ok(geometry)
    }
}

/// Moves computed for a turn, handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnPlan {
    pub turn: u32,
    pub direction: Direction,
    pub moves: Vec<TileMove>,
    pub merges: usize,
}

/// A committed merge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeRecord {
    /// Stationary tile that doubled
    pub survivor: TileId,
    /// Moving tile that was removed
    pub absorbed: TileId,
    pub position: Position,
    /// Survivor's value after the merge
    pub value: u32,
}

/// Everything that changed in a finished turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReport {
    pub turn: u32,
    pub direction: Direction,
    pub moves: Vec<TileMove>,
    pub merges: Vec<MergeRecord>,
    pub spawned: Option<SpawnedTile>,
    pub outcome: Option<GameOutcome>,
}

impl TurnReport {
    /// Ids of tiles removed by merges this turn
    pub fn released(&self) -> impl Iterator<Item = TileId> + '_ {
        self.merges.iter().map(|m| m.absorbed)
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState<R = SimpleRng> {
    config: GameConfig,
    grid: Grid,
    resolver: MoveResolver,
    rng: R,
    seed: u32,
    phase: TurnPhase,
    started: bool,
    in_flight: Option<TurnPlan>,
    /// Number of turns that moved at least one tile
    turn: u32,
    /// Monotonic episode id (increments on restart).
    episode_id: u32,
    start_spawns: Vec<SpawnedTile>,
    end_event: Option<GameOutcome>,
    end_reported: bool,
}

impl GameState<SimpleRng> {
    /// Create a default 4x4 game with the given RNG seed
    pub fn new(seed: u32) -> Self {
        Self::build(
            GameConfig::default(),
            GridGeometry::default(),
            SimpleRng::new(seed),
            seed,
        )
    }

    /// Create a game with custom rules and the built-in RNG
    pub fn with_config(config: GameConfig, seed: u32) -> Result<Self, GridError> {
        let geometry = config.validate()?;
        Ok(Self::build(config, geometry, SimpleRng::new(seed), seed))
    }
}

impl<R: Rng> GameState<R> {
    /// Create a game with custom rules and any `rand` generator
    pub fn with_rng(config: GameConfig, rng: R) -> Result<Self, GridError> {
        let geometry = config.validate()?;
        Ok(Self::build(config, geometry, rng, 0))
    }

    /// Continue from an existing position; the game counts as started.
    ///
    /// The grid's size overrides `config.grid_size`.
    pub fn from_grid(config: GameConfig, grid: Grid, rng: R) -> Result<Self, GridError> {
        let config = GameConfig {
            grid_size: grid.size(),
            ..config
        };
        let geometry = config.validate()?;
        grid.check_consistency()?;

        let mut state = Self::build(config, geometry, rng, 0);
        state.grid = grid;
        state.started = true;
        Ok(state)
    }

    fn build(config: GameConfig, geometry: GridGeometry, rng: R, seed: u32) -> Self {
        Self {
            config,
            grid: Grid::with_geometry(geometry),
            resolver: MoveResolver::new(),
            rng,
            seed,
            phase: TurnPhase::Idle,
            started: false,
            in_flight: None,
            turn: 0,
            episode_id: 0,
            start_spawns: Vec::new(),
            end_event: None,
            end_reported: false,
        }
    }

    /// Start the game and spawn the opening tiles
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.phase = TurnPhase::Idle;

        self.start_spawns.clear();
        for _ in 0..self.config.start_tiles {
            match spawner::spawn(&mut self.grid, &mut self.rng) {
                Ok(s) => self.start_spawns.push(s),
                Err(e) => log::error!("opening spawn failed: {e}"),
            }
        }
        log::info!(
            "game {} started on a {}x{} grid",
            self.episode_id,
            self.grid.size(),
            self.grid.size()
        );
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, TurnPhase::GameOver(_))
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.phase.outcome()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[cfg(test)]
    pub(crate) fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Tiles placed by [`GameState::start`]
    pub fn start_spawns(&self) -> &[SpawnedTile] {
        &self.start_spawns
    }

    /// Moves of the turn awaiting [`GameState::finish_turn`]
    pub fn in_flight(&self) -> Option<&TurnPlan> {
        self.in_flight.as_ref()
    }

    /// Resolve a swipe.
    ///
    /// Ignored (returns `None`) unless the game is started and `Idle`. A swipe
    /// that moves nothing also returns `None` and leaves the state `Idle`
    /// without spawning. Otherwise the state is `Resolving` until
    /// [`GameState::finish_turn`].
    pub fn submit_direction(&mut self, direction: Direction) -> Option<TurnPlan> {
        if !self.started || !self.phase.accepts_input() {
            log::debug!(
                "ignoring {} while {}",
                direction.as_str(),
                self.phase.as_str()
            );
            return None;
        }

        self.phase = TurnPhase::Resolving;
        let set = self.resolver.resolve(&mut self.grid, direction);
        if set.is_empty() {
            self.phase = TurnPhase::Idle;
            return None;
        }

        self.turn = self.turn.wrapping_add(1);
        let plan = TurnPlan {
            turn: self.turn,
            direction,
            merges: set.merges(),
            moves: set.into_moves(),
        };
        log::debug!(
            "turn {}: {} with {} move(s), {} merge(s)",
            plan.turn,
            direction.as_str(),
            plan.moves.len(),
            plan.merges
        );
        self.in_flight = Some(plan.clone());
        Some(plan)
    }

    /// Commit the resolved turn: merges, spawn, terminal check.
    ///
    /// Returns `None` unless a turn is `Resolving`. Reaching the win value on
    /// any merge ends the game before anything spawns; the remaining merges of
    /// the turn are still committed so the grid stays consistent.
    pub fn finish_turn(&mut self) -> Option<TurnReport> {
        if self.phase != TurnPhase::Resolving {
            return None;
        }
        let Some(plan) = self.in_flight.take() else {
            self.phase = TurnPhase::Idle;
            return None;
        };
        self.phase = TurnPhase::Finalizing;

        let mut merges = Vec::with_capacity(plan.merges);
        let mut won = false;
        for m in &plan.moves {
            let Some(target) = m.merge_target else {
                continue;
            };
            let value = self.grid.promote(target);
            self.grid.release(m.tile);
            let (survivor, position) = self
                .grid
                .tile(target)
                .and_then(|t| t.cell().map(|c| (t.id(), self.grid.geometry().position(c))))
                .unwrap_or((m.merged_into.unwrap_or(m.id), m.to));
            merges.push(MergeRecord {
                survivor,
                absorbed: m.id,
                position,
                value,
            });
            if value >= self.config.win_value && !won {
                won = true;
                log::info!("turn {}: reached {} at {}", plan.turn, value, position);
            }
        }
        self.grid.clear_merge_marks();
        debug_assert_eq!(self.grid.check_consistency(), Ok(()));

        let mut spawned = None;
        let outcome = if won {
            Some(GameOutcome::Won)
        } else {
            match spawner::spawn(&mut self.grid, &mut self.rng) {
                Ok(s) => spawned = Some(s),
                Err(e) => log::error!("spawn after turn {} failed: {e}", plan.turn),
            }
            let stuck = self.config.terminal_check.applies(&self.grid)
                && terminal::is_stuck(&mut self.resolver, &self.grid);
            stuck.then_some(GameOutcome::Lost)
        };

        self.phase = match outcome {
            Some(o) => {
                self.end(o);
                TurnPhase::GameOver(o)
            }
            None => TurnPhase::Idle,
        };

        Some(TurnReport {
            turn: plan.turn,
            direction: plan.direction,
            moves: plan.moves,
            merges,
            spawned,
            outcome,
        })
    }

    /// Resolve and commit a swipe with no animation step in between
    pub fn play(&mut self, direction: Direction) -> Option<TurnReport> {
        self.submit_direction(direction)?;
        self.finish_turn()
    }

    fn end(&mut self, outcome: GameOutcome) {
        if self.end_reported {
            return;
        }
        self.end_reported = true;
        self.end_event = Some(outcome);
        log::info!(
            "game {} {} after {} turn(s), max tile {}",
            self.episode_id,
            outcome.as_str(),
            self.turn,
            self.grid.max_value()
        );
    }

    /// The game-ended event, yielded once per game
    pub fn take_game_ended(&mut self) -> Option<GameOutcome> {
        self.end_event.take()
    }

    /// Start a fresh game, optionally with a new grid size.
    ///
    /// The random stream and tile ids carry on from the previous game.
    pub fn restart(&mut self, grid_size: Option<u8>) -> Result<(), GridError> {
        let config = GameConfig {
            grid_size: grid_size.unwrap_or(self.config.grid_size),
            ..self.config
        };
        let geometry = config.validate()?;

        let next_id = self.grid.next_id();
        self.config = config;
        self.grid = Grid::with_geometry(geometry);
        self.grid.continue_ids_from(next_id);
        self.phase = TurnPhase::Idle;
        self.started = false;
        self.in_flight = None;
        self.turn = 0;
        self.episode_id = self.episode_id.wrapping_add(1);
        self.end_event = None;
        self.end_reported = false;
        self.start();
        Ok(())
    }

    /// Apply a player action; returns whether anything changed
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::Move(direction) => self.play(direction).is_some(),
            GameAction::Restart => self.restart(None).is_ok(),
            GameAction::GrowGrid => {
                let size = self.config.grid_size.saturating_add(1).min(MAX_GRID_SIZE);
                size != self.config.grid_size && self.restart(Some(size)).is_ok()
            }
            GameAction::ShrinkGrid => {
                let size = self.config.grid_size.saturating_sub(1).max(MIN_GRID_SIZE);
                size != self.config.grid_size && self.restart(Some(size)).is_ok()
            }
        }
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.clear();
        out.size = self.grid.size();
        for (i, cell) in self.grid.cells().iter().enumerate() {
            if let Some(tile) = cell.tile().and_then(|t| self.grid.tile(t)) {
                out.values[i] = tile.value();
                out.tile_ids[i] = Some(tile.id());
            }
        }
        out.phase = self.phase;
        out.turn = self.turn;
        out.episode_id = self.episode_id;
        out.seed = self.seed;
        out.tile_count = self.grid.tile_count() as u32;
        out.value_sum = self.grid.value_sum();
        out.max_tile = self.grid.max_value();
        out.win_value = self.config.win_value;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Started game with a hand-built grid
    fn game_with(rows: &[[u32; 4]]) -> GameState {
        let mut state = GameState::new(12345);
        state.start();
        *state.grid_mut() = Grid::from_rows(rows).unwrap();
        state
    }

    #[test]
    fn test_new_game_state() {
        let state = GameState::new(12345);
        assert!(!state.started());
        assert_eq!(state.phase(), TurnPhase::Idle);
        assert_eq!(state.grid().tile_count(), 0);
        assert_eq!(state.turn(), 0);
    }

    #[test]
    fn test_start_spawns_two_tiles() {
        let mut state = GameState::new(12345);
        state.start();
        assert_eq!(state.grid().tile_count(), 2);
        assert_eq!(state.start_spawns().len(), 2);
        for s in state.start_spawns() {
            assert!(s.value == 2 || s.value == 4);
        }

        // Starting twice is a no-op.
        state.start();
        assert_eq!(state.grid().tile_count(), 2);
    }

    #[test]
    fn test_input_ignored_before_start() {
        let mut state = GameState::new(1);
        assert!(state.submit_direction(Direction::Left).is_none());
        assert_eq!(state.phase(), TurnPhase::Idle);
    }

    #[test]
    fn test_turn_phases() {
        let mut state = game_with(&[[0, 0, 0, 2], [0; 4], [0; 4], [0; 4]]);

        let plan = state.submit_direction(Direction::Left).unwrap();
        assert_eq!(plan.turn, 1);
        assert_eq!(state.phase(), TurnPhase::Resolving);
        assert!(state.in_flight().is_some());

        // A second swipe while resolving is ignored.
        assert!(state.submit_direction(Direction::Right).is_none());
        assert_eq!(state.phase(), TurnPhase::Resolving);

        let report = state.finish_turn().unwrap();
        assert_eq!(state.phase(), TurnPhase::Idle);
        assert!(report.spawned.is_some());
        assert_eq!(state.grid().tile_count(), 2);
        assert!(state.finish_turn().is_none());
    }

    #[test]
    fn test_noop_swipe_stays_idle_without_spawn() {
        let mut state = game_with(&[[2, 4, 2, 0], [0; 4], [0; 4], [0; 4]]);
        assert!(state.submit_direction(Direction::Left).is_none());
        assert_eq!(state.phase(), TurnPhase::Idle);
        assert_eq!(state.grid().tile_count(), 3);
        assert_eq!(state.turn(), 0);
    }

    #[test]
    fn test_merge_commit_doubles_and_releases() {
        let mut state = game_with(&[[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let report = state.play(Direction::Left).unwrap();

        assert_eq!(report.merges.len(), 1);
        let merge = report.merges[0];
        assert_eq!(merge.value, 4);
        assert_eq!(merge.position, Position::new(0, 0));
        assert_eq!(report.released().collect::<Vec<_>>(), vec![merge.absorbed]);
        assert_eq!(state.grid().value_at(Position::new(0, 0)), Some(4));
        // One merged tile plus one spawn.
        assert_eq!(state.grid().tile_count(), 2);
        assert!(state.grid().tiles().all(|(_, t)| !t.pending_merge()));
        assert!(state.grid().check_consistency().is_ok());
    }

    #[test]
    fn test_win_ends_game_before_spawn() {
        let mut state = game_with(&[[1024, 1024, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let report = state.play(Direction::Left).unwrap();

        assert_eq!(report.outcome, Some(GameOutcome::Won));
        assert!(report.spawned.is_none());
        assert_eq!(state.phase(), TurnPhase::GameOver(GameOutcome::Won));
        assert_eq!(state.take_game_ended(), Some(GameOutcome::Won));
        assert_eq!(state.take_game_ended(), None);

        // Absorbing: further input is ignored.
        assert!(state.submit_direction(Direction::Right).is_none());
    }

    #[test]
    fn test_loss_when_last_cell_filled_and_stuck() {
        // One empty cell; whatever lands there, the left swipe is the only move
        // and it leaves a stuck board after the spawn fills the gap.
        let mut state = game_with(&[
            [2, 4, 8, 16],
            [32, 64, 128, 256],
            [512, 4, 8, 16],
            [0, 2, 32, 64],
        ]);
        let report = state.play(Direction::Left).unwrap();
        assert!(report.merges.is_empty());
        let spawned = report.spawned.unwrap();
        assert_eq!(spawned.position, Position::new(3, 3));
        // 64 next to a 2 or 4 cannot merge: no moves anywhere.
        assert_eq!(report.outcome, Some(GameOutcome::Lost));
        assert_eq!(state.take_game_ended(), Some(GameOutcome::Lost));
    }

    #[test]
    fn test_restart_resets_and_keeps_ids_unique() {
        let mut state = game_with(&[[1024, 1024, 0, 0], [0; 4], [0; 4], [0; 4]]);
        state.play(Direction::Left);
        assert!(state.is_over());
        let max_id = state.grid().tiles().map(|(_, t)| t.id()).max().unwrap();

        state.restart(Some(5)).unwrap();
        assert_eq!(state.episode_id(), 1);
        assert_eq!(state.phase(), TurnPhase::Idle);
        assert_eq!(state.grid().size(), 5);
        assert_eq!(state.grid().tile_count(), 2);
        assert!(state.grid().tiles().all(|(_, t)| t.id() > max_id));
        assert_eq!(state.take_game_ended(), None);
    }

    #[test]
    fn test_apply_action_grid_size_clamped() {
        let mut state = GameState::with_config(
            GameConfig {
                grid_size: MAX_GRID_SIZE,
                ..GameConfig::default()
            },
            3,
        )
        .unwrap();
        state.start();
        assert!(!state.apply_action(GameAction::GrowGrid));
        assert!(state.apply_action(GameAction::ShrinkGrid));
        assert_eq!(state.grid().size(), MAX_GRID_SIZE - 1);
    }

    #[test]
    fn test_config_validation() {
        let bad_size = GameConfig {
            grid_size: 1,
            ..GameConfig::default()
        };
        assert_eq!(bad_size.validate(), Err(GridError::InvalidSize(1)));

        let too_many = GameConfig {
            grid_size: 2,
            start_tiles: 4,
            ..GameConfig::default()
        };
        assert_eq!(too_many.validate(), Err(GridError::Full));

        let bad_win = GameConfig {
            win_value: 2,
            ..GameConfig::default()
        };
        assert_eq!(bad_win.validate(), Err(GridError::InvalidValue(2)));

        let unreachable_win = GameConfig {
            win_value: 3000,
            ..GameConfig::default()
        };
        assert_eq!(unreachable_win.validate(), Err(GridError::InvalidValue(3000)));
        assert!(GameState::with_config(unreachable_win, 1).is_err());

        let small_win = GameConfig {
            win_value: 64,
            ..GameConfig::default()
        };
        assert!(small_win.validate().is_ok());
    }

    #[test]
    fn test_snapshot_reflects_grid() {
        let state = game_with(&[[2, 0, 0, 4], [0; 4], [0; 4], [0, 0, 8, 0]]);
        let snap = state.snapshot();
        assert_eq!(snap.size, 4);
        assert_eq!(snap.value(Position::new(0, 3)), 4);
        assert_eq!(snap.value(Position::new(3, 2)), 8);
        assert_eq!(snap.value(Position::new(7, 7)), 0);
        assert_eq!(snap.tile_count, 3);
        assert_eq!(snap.value_sum, 14);
        assert_eq!(snap.max_tile, 8);
        assert!(snap.tile_id(Position::new(0, 0)).is_some());
        assert!(snap.tile_id(Position::new(1, 1)).is_none());
        assert_eq!(snap.rows().count(), 4);
    }
}
