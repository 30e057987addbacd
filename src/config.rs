//! Match configuration: ship classes, presets, modes and the player enum.

use core::fmt;
use serde::{Deserialize, Serialize};

use crate::ai::Difficulty;
use crate::bitboard::Mask;

/// Number of ship length classes.
pub const SHIP_CLASSES: usize = 4;
/// Ship lengths by class index.
pub const SHIP_LENGTHS: [usize; SHIP_CLASSES] = [2, 3, 4, 5];

/// Inventory for a 5×5 grid: two length-2 ships and one length-3 ship.
pub const PRESET_SMALL: ShipInventory = ShipInventory::new([2, 1, 0, 0]);
/// Inventory for a 10×10 grid.
pub const PRESET_LARGE: ShipInventory = ShipInventory::new([1, 2, 1, 1]);

/// Grid sizes accepted by [`crate::Match::standard`].
pub const STANDARD_GRID_SIZES: [usize; 2] = [5, 10];
/// Smallest grid that can hold the shortest ship.
pub const MIN_GRID_SIZE: usize = 2;
/// Largest grid that fits into a [`Mask`].
pub const MAX_GRID_SIZE: usize = 11;

/// Ships may cover at most `COVERAGE_NUM / COVERAGE_DEN` of the grid.
pub const COVERAGE_NUM: usize = 2;
pub const COVERAGE_DEN: usize = 5;

const _: () = assert!(MAX_GRID_SIZE * MAX_GRID_SIZE <= u128::BITS as usize);

/// Ship counts by length class (lengths 2, 3, 4, 5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipInventory {
    counts: [usize; SHIP_CLASSES],
}

impl ShipInventory {
    pub const fn new(counts: [usize; SHIP_CLASSES]) -> Self {
        Self { counts }
    }

    /// Preset inventory for a standard grid size.
    pub fn preset(grid_size: usize) -> Option<Self> {
        match grid_size {
            5 => Some(PRESET_SMALL),
            10 => Some(PRESET_LARGE),
            _ => None,
        }
    }

    pub fn counts(&self) -> [usize; SHIP_CLASSES] {
        self.counts
    }

    /// Number of ships of the given length; zero for unknown lengths.
    pub fn count(&self, length: usize) -> usize {
        SHIP_LENGTHS
            .iter()
            .position(|&l| l == length)
            .map_or(0, |i| self.counts[i])
    }

    /// Number of ships, saturating at `usize::MAX`.
    pub fn total_ships(&self) -> usize {
        self.counts.iter().fold(0, |acc, &n| acc.saturating_add(n))
    }

    /// Cells covered when every ship is placed, or `None` if that overflows.
    pub fn checked_covered_cells(&self) -> Option<usize> {
        SHIP_LENGTHS
            .iter()
            .zip(self.counts.iter())
            .try_fold(0usize, |acc, (len, n)| acc.checked_add(len.checked_mul(*n)?))
    }

    /// Cells covered when every ship is placed, saturating at `usize::MAX`.
    pub fn covered_cells(&self) -> usize {
        self.checked_covered_cells().unwrap_or(usize::MAX)
    }

    /// One length per ship, longest first.
    pub fn lengths(&self) -> impl Iterator<Item = usize> {
        SHIP_LENGTHS
            .into_iter()
            .zip(self.counts)
            .rev()
            .flat_map(|(len, n)| core::iter::repeat(len).take(n))
    }
}

/// Whether `inventory` keeps the a-priori hit chance of a random shot at or
/// below 2/5 on a `grid_size×grid_size` grid. Counts too large to add up are
/// never legit.
pub fn inventory_is_legit(grid_size: usize, inventory: &ShipInventory) -> bool {
    let bound = grid_size
        .checked_mul(grid_size)
        .and_then(|cells| cells.checked_mul(COVERAGE_NUM))
        .map_or(usize::MAX / COVERAGE_DEN, |n| n / COVERAGE_DEN);
    inventory
        .checked_covered_cells()
        .is_some_and(|covered| covered <= bound)
}

/// Check a grid size against the mask capacity.
pub(crate) fn check_grid_size(grid_size: usize) -> bool {
    (MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&grid_size)
        && Mask::try_new(grid_size).is_ok()
}

/// Who plays player two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    VsPlayer,
    VsAiEasy,
    VsAiHard,
    /// Human against human with an explicit inventory.
    Custom,
}

impl GameMode {
    /// Difficulty of the computer opponent, if this mode has one.
    pub fn difficulty(self) -> Option<Difficulty> {
        match self {
            GameMode::VsAiEasy => Some(Difficulty::Easy),
            GameMode::VsAiHard => Some(Difficulty::Hard),
            GameMode::VsPlayer | GameMode::Custom => None,
        }
    }

    pub fn has_opponent(self) -> bool {
        self.difficulty().is_some()
    }
}

/// The two seats of a match. The computer opponent, if any, is `PlayerTwo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    PlayerOne,
    PlayerTwo,
}

impl Player {
    pub fn index(self) -> usize {
        match self {
            Player::PlayerOne => 0,
            Player::PlayerTwo => 1,
        }
    }

    pub fn other(self) -> Player {
        match self {
            Player::PlayerOne => Player::PlayerTwo,
            Player::PlayerTwo => Player::PlayerOne,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::PlayerOne => write!(f, "player one"),
            Player::PlayerTwo => write!(f, "player two"),
        }
    }
}
