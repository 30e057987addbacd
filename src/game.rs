//! The match state machine: turn order, move validation and derived status.

use std::time::Duration;

use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::ai::{Opponent, OpponentState, OpponentTurn};
use crate::common::{MatchError, ShotResult};
use crate::config::{
    check_grid_size, inventory_is_legit, GameMode, Player, ShipInventory, STANDARD_GRID_SIZES,
};
use crate::grid::{Grid, GridState};
use crate::timer::TurnTimer;

/// Current status of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    InProgress,
    Finished { winner: Player },
}

/// Serializable match state, enough to suspend and resume a game. Timers and
/// attempt counters are not part of it; a restored match starts them fresh.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchState {
    pub grid_size: usize,
    pub mode: GameMode,
    pub inventory: ShipInventory,
    pub active_player: Player,
    pub status: MatchStatus,
    pub grids: [GridState; 2],
    pub opponent: Option<OpponentState>,
}

/// A two-player match. Grid `i` belongs to the player with index `i`.
#[derive(Debug)]
pub struct Match {
    grid_size: usize,
    inventory: ShipInventory,
    mode: GameMode,
    active: Player,
    status: MatchStatus,
    attempts: [u32; 2],
    timers: [TurnTimer; 2],
    grids: [Grid; 2],
    opponent: Option<Opponent>,
}

impl Match {
    /// Match on a standard 5×5 or 10×10 grid with the preset inventory.
    pub fn standard(grid_size: usize, mode: GameMode) -> Result<Self, MatchError> {
        if mode == GameMode::Custom {
            return Err(MatchError::InvalidConfiguration(
                "custom mode needs an explicit ship inventory",
            ));
        }
        if !STANDARD_GRID_SIZES.contains(&grid_size) {
            return Err(MatchError::InvalidConfiguration(
                "standard matches are played on 5x5 or 10x10 grids",
            ));
        }
        let inventory = ShipInventory::preset(grid_size).ok_or(
            MatchError::InvalidConfiguration("no preset inventory for this grid size"),
        )?;
        Self::with_inventory(mode, grid_size, inventory)
    }

    /// Human-vs-human match with an explicit inventory. The inventory is not
    /// checked; callers ask [`Match::is_inventory_legit`] first.
    pub fn custom(grid_size: usize, inventory: ShipInventory) -> Result<Self, MatchError> {
        Self::with_inventory(GameMode::Custom, grid_size, inventory)
    }

    /// Match in any mode with an explicit inventory.
    pub fn with_inventory(
        mode: GameMode,
        grid_size: usize,
        inventory: ShipInventory,
    ) -> Result<Self, MatchError> {
        if !check_grid_size(grid_size) {
            return Err(MatchError::InvalidConfiguration(
                "grid size must be between 2 and 11",
            ));
        }
        let opponent = mode
            .difficulty()
            .map(|difficulty| Opponent::new(grid_size, difficulty));
        debug!(
            "new {:?} match on {}x{} grid with {:?}",
            mode, grid_size, grid_size, inventory
        );
        Ok(Match {
            grid_size,
            inventory,
            mode,
            active: Player::PlayerOne,
            status: MatchStatus::InProgress,
            attempts: [0; 2],
            timers: [TurnTimer::new(), TurnTimer::new()],
            grids: [
                Grid::new(grid_size, inventory)?,
                Grid::new(grid_size, inventory)?,
            ],
            opponent,
        })
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Ship inventory both grids are built from.
    pub fn inventory(&self) -> ShipInventory {
        self.inventory
    }

    pub fn active_player(&self) -> Player {
        self.active
    }

    pub fn status(&self) -> MatchStatus {
        self.status
    }

    pub fn winner(&self) -> Option<Player> {
        match self.status {
            MatchStatus::Finished { winner } => Some(winner),
            MatchStatus::InProgress => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.winner().is_some()
    }

    /// Moves applied so far by `player`.
    pub fn attempts(&self, player: Player) -> u32 {
        self.attempts[player.index()]
    }

    pub fn grid(&self, player: Player) -> &Grid {
        &self.grids[player.index()]
    }

    pub fn grid_mut(&mut self, player: Player) -> &mut Grid {
        &mut self.grids[player.index()]
    }

    /// Grid of the player who is not active, i.e. the one being targeted.
    pub fn grid_under_attack(&self) -> &Grid {
        self.grid(self.active.other())
    }

    /// Grid of the active player, used while placing and selecting ships.
    pub fn current_grid(&self) -> &Grid {
        self.grid(self.active)
    }

    pub fn current_grid_mut(&mut self) -> &mut Grid {
        let active = self.active;
        self.grid_mut(active)
    }

    /// The computer opponent, present in computer modes only.
    pub fn opponent(&self) -> Option<&Opponent> {
        self.opponent.as_ref()
    }

    /// Whether `inventory` would be acceptable on this match's grid size.
    pub fn is_inventory_legit(&self, inventory: &ShipInventory) -> bool {
        inventory_is_legit(self.grid_size, inventory)
    }

    /// Randomly lay out both fleets.
    pub fn place_all_ships<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), MatchError> {
        for grid in self.grids.iter_mut() {
            grid.fleet_mut().place_ships_randomly(rng)?;
        }
        Ok(())
    }

    /// Attack (col, row) on the opponent's grid as `player`.
    pub fn make_move(
        &mut self,
        player: Player,
        col: usize,
        row: usize,
    ) -> Result<ShotResult, MatchError> {
        if self.is_finished() {
            return Err(MatchError::MatchFinished);
        }
        if player != self.active {
            return Err(MatchError::TurnViolation { player });
        }
        let target = player.other();
        let result = self.grids[target.index()].attack(col, row)?;
        self.attempts[player.index()] += 1;
        debug!("{} fires at ({}, {}): {:?}", player, col, row, result);

        if result.is_hit() && self.grids[target.index()].all_ships_destroyed() {
            info!(
                "{} wins after {} attempts",
                player,
                self.attempts[player.index()]
            );
            self.status = MatchStatus::Finished { winner: player };
        }
        Ok(result)
    }

    /// Hand the turn to the other player.
    pub fn switch_players(&mut self) {
        self.active = self.active.other();
    }

    /// Let the computer opponent take its whole turn. Player two must be
    /// active; the turn passes back to player one afterwards unless the
    /// opponent won.
    pub fn play_opponent_turn<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<OpponentTurn, MatchError> {
        if self.is_finished() {
            return Err(MatchError::MatchFinished);
        }
        if self.active != Player::PlayerTwo {
            return Err(MatchError::TurnViolation {
                player: Player::PlayerTwo,
            });
        }
        let mut opponent = self.opponent.take().ok_or(MatchError::NoOpponent)?;
        let turn = opponent.play_turn(self, rng);
        self.opponent = Some(opponent);
        let turn = turn?;
        if !self.is_finished() {
            self.switch_players();
        }
        Ok(turn)
    }

    /// Start the active player's clock.
    pub fn start_timer(&mut self) {
        self.timers[self.active.index()].start();
    }

    /// Stop both clocks.
    pub fn stop_timer(&mut self) {
        for timer in self.timers.iter_mut() {
            timer.stop();
        }
    }

    /// Time on the clock that matters right now: the human's in computer
    /// modes, otherwise the active player's.
    pub fn time(&self) -> Duration {
        let player = if self.mode.has_opponent() {
            Player::PlayerOne
        } else {
            self.active
        };
        self.timers[player.index()].elapsed()
    }

    pub fn state(&self) -> MatchState {
        MatchState {
            grid_size: self.grid_size,
            mode: self.mode,
            inventory: self.inventory,
            active_player: self.active,
            status: self.status,
            grids: [self.grids[0].state(), self.grids[1].state()],
            opponent: self.opponent.as_ref().map(Opponent::state),
        }
    }

    /// Restore a match from a snapshot. Clocks and attempt counters restart.
    pub fn from_state(state: MatchState) -> Result<Self, MatchError> {
        if !check_grid_size(state.grid_size) {
            return Err(MatchError::CorruptState("grid size out of range"));
        }
        if state.mode.has_opponent() != state.opponent.is_some() {
            return Err(MatchError::CorruptState("opponent does not match mode"));
        }
        if let Some(opponent) = &state.opponent {
            if state.mode.difficulty() != Some(opponent.difficulty) {
                return Err(MatchError::CorruptState("opponent difficulty does not match mode"));
            }
        }
        let [first, second] = state.grids;
        if first.size != state.grid_size || second.size != state.grid_size {
            return Err(MatchError::CorruptState("grid sizes differ"));
        }
        if first.inventory != state.inventory || second.inventory != state.inventory {
            return Err(MatchError::CorruptState("grid inventories differ"));
        }
        let grids = [Grid::try_from(first)?, Grid::try_from(second)?];
        let opponent = match state.opponent {
            Some(s) => Some(Opponent::from_state(s, state.grid_size)?),
            None => None,
        };
        Ok(Match {
            grid_size: state.grid_size,
            inventory: state.inventory,
            mode: state.mode,
            active: state.active_player,
            status: state.status,
            attempts: [0; 2],
            timers: [TurnTimer::new(), TurnTimer::new()],
            grids,
            opponent,
        })
    }

    /// Encode the match with `bincode`.
    pub fn to_bytes(&self) -> Result<Vec<u8>, MatchError> {
        Ok(bincode::serialize(&self.state())?)
    }

    /// Decode a match written by [`Match::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MatchError> {
        let state: MatchState = bincode::deserialize(bytes)?;
        Self::from_state(state)
    }
}
