// Hunt-and-target opponent. It sees the human's grid only through the
// hit/miss answers of `Match::make_move` and keeps its own belief map.

use log::trace;
use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::bitboard::Mask;
use crate::common::{Coordinate, MatchError, ShotResult};
use crate::config::{check_grid_size, Player};
use crate::game::Match;

/// How the opponent searches while it has no ship fragment to follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    /// Any unknown cell.
    Easy,
    /// Unknown cells with odd `col + row`, then follow-up candidates.
    Hard,
}

/// What the opponent knows about a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Belief {
    Unknown,
    Water,
    Ship,
}

/// Serializable opponent state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpponentState {
    pub difficulty: Difficulty,
    pub water: Mask,
    pub ship: Mask,
    pub candidates: Vec<Coordinate>,
    pub has_won: bool,
}

/// Shots fired during one opponent turn, in order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OpponentTurn {
    pub shots: Vec<(Coordinate, ShotResult)>,
    pub won: bool,
}

enum Step {
    Fired(Coordinate, ShotResult),
    Stale,
    Exhausted,
}

/// Computer opponent. Always plays as [`Player::PlayerTwo`].
#[derive(Debug, Clone)]
pub struct Opponent {
    grid_size: usize,
    difficulty: Difficulty,
    water: Mask,
    ship: Mask,
    candidates: Vec<Coordinate>,
    has_won: bool,
}

impl Opponent {
    pub fn new(grid_size: usize, difficulty: Difficulty) -> Self {
        Opponent {
            grid_size,
            difficulty,
            water: Mask::new(grid_size),
            ship: Mask::new(grid_size),
            candidates: Vec::new(),
            has_won: false,
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn has_won(&self) -> bool {
        self.has_won
    }

    /// Pending follow-up targets. May contain duplicates and stale entries.
    pub fn candidates(&self) -> &[Coordinate] {
        &self.candidates
    }

    pub fn belief(&self, cell: Coordinate) -> Belief {
        if self.ship.get(cell.col, cell.row).unwrap_or(false) {
            Belief::Ship
        } else if self.water.get(cell.col, cell.row).unwrap_or(false) {
            Belief::Water
        } else {
            Belief::Unknown
        }
    }

    /// Cells not yet shot at.
    pub fn unknown(&self) -> Mask {
        !(self.water | self.ship)
    }

    /// Fire until a miss, a win, or no unknown cell is left.
    pub fn play_turn<R: Rng + ?Sized>(
        &mut self,
        game: &mut Match,
        rng: &mut R,
    ) -> Result<OpponentTurn, MatchError> {
        let mut turn = OpponentTurn::default();
        loop {
            match self.step(game, rng)? {
                Step::Stale => continue,
                Step::Exhausted => break,
                Step::Fired(cell, result) => {
                    turn.shots.push((cell, result));
                    if !result.is_hit() || self.has_won {
                        break;
                    }
                }
            }
        }
        turn.won = self.has_won;
        Ok(turn)
    }

    fn step<R: Rng + ?Sized>(&mut self, game: &mut Match, rng: &mut R) -> Result<Step, MatchError> {
        let target = if self.difficulty == Difficulty::Hard && !self.candidates.is_empty() {
            let idx = rng.random_range(0..self.candidates.len());
            let cell = self.candidates.swap_remove(idx);
            if self.belief(cell) != Belief::Unknown {
                trace!("dropping stale candidate {}", cell);
                return Ok(Step::Stale);
            }
            cell
        } else {
            match self.search_target(rng) {
                Some(cell) => cell,
                None => return Ok(Step::Exhausted),
            }
        };

        let result = game.make_move(Player::PlayerTwo, target.col, target.row)?;
        match result {
            ShotResult::Hit => {
                self.ship.set(target.col, target.row)?;
                if self.difficulty == Difficulty::Hard {
                    self.enqueue_neighbors(target);
                }
                if game.grid_under_attack().all_ships_destroyed() {
                    self.has_won = true;
                }
            }
            ShotResult::Miss => self.water.set(target.col, target.row)?,
        }
        Ok(Step::Fired(target, result))
    }

    /// Search-phase pick: filter the eligible cells, then sample once.
    fn search_target<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Coordinate> {
        let unknown: Vec<Coordinate> = self
            .unknown()
            .iter_set_bits()
            .map(Coordinate::from)
            .collect();
        if self.difficulty == Difficulty::Hard {
            let parity: Vec<Coordinate> = unknown
                .iter()
                .copied()
                .filter(Coordinate::has_odd_parity)
                .collect();
            if let Some(&cell) = parity.choose(rng) {
                return Some(cell);
            }
        }
        unknown.choose(rng).copied()
    }

    fn enqueue_neighbors(&mut self, hit: Coordinate) {
        let before = self.candidates.len();
        for cell in hit.neighbors(self.grid_size) {
            if self.belief(cell) == Belief::Unknown {
                self.candidates.push(cell);
            }
        }
        trace!(
            "hit at {} queued {} candidate(s), {} pending",
            hit,
            self.candidates.len() - before,
            self.candidates.len()
        );
    }

    pub fn state(&self) -> OpponentState {
        OpponentState {
            difficulty: self.difficulty,
            water: self.water,
            ship: self.ship,
            candidates: self.candidates.clone(),
            has_won: self.has_won,
        }
    }

    pub fn from_state(state: OpponentState, grid_size: usize) -> Result<Self, MatchError> {
        if !check_grid_size(grid_size) {
            return Err(MatchError::CorruptState("grid size out of range"));
        }
        let water = Mask::from_raw(state.water.into_raw(), grid_size);
        let ship = Mask::from_raw(state.ship.into_raw(), grid_size);
        if !(water & ship).is_empty() {
            return Err(MatchError::CorruptState("cell believed to be both water and ship"));
        }
        let candidates = state
            .candidates
            .into_iter()
            .filter(|c| c.col < grid_size && c.row < grid_size)
            .collect();
        Ok(Opponent {
            grid_size,
            difficulty: state.difficulty,
            water,
            ship,
            candidates,
            has_won: state.has_won,
        })
    }
}
