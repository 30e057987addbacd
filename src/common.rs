//! Common types for the rules engine: coordinates, shot results and errors.

use core::fmt;
use serde::{Deserialize, Serialize};

use crate::bitboard::BitBoardError;
use crate::config::Player;

/// A cell address on a grid, column first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub col: usize,
    pub row: usize,
}

impl Coordinate {
    pub const fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }

    /// Offset by (`dc`, `dr`), or `None` when the result leaves a `size×size` grid.
    pub fn offset(&self, dc: isize, dr: isize, size: usize) -> Option<Coordinate> {
        let col = self.col.checked_add_signed(dc)?;
        let row = self.row.checked_add_signed(dr)?;
        if col < size && row < size {
            Some(Coordinate { col, row })
        } else {
            None
        }
    }

    /// The up to eight in-bounds cells surrounding this one.
    pub fn neighbors(self, size: usize) -> impl Iterator<Item = Coordinate> {
        (-1isize..=1)
            .flat_map(|dr| (-1isize..=1).map(move |dc| (dc, dr)))
            .filter(|&(dc, dr)| dc != 0 || dr != 0)
            .filter_map(move |(dc, dr)| self.offset(dc, dr, size))
    }

    /// Checkerboard colour used by the hard opponent while searching.
    pub fn has_odd_parity(&self) -> bool {
        (self.col + self.row) % 2 == 1
    }
}

impl From<(usize, usize)> for Coordinate {
    fn from((col, row): (usize, usize)) -> Self {
        Coordinate { col, row }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// Result of a single attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotResult {
    /// The attacked cell covers a ship segment.
    Hit,
    /// The attacked cell is open water.
    Miss,
}

impl ShotResult {
    pub fn is_hit(self) -> bool {
        self == ShotResult::Hit
    }
}

/// Errors returned by grid, fleet and ship operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    /// Underlying bitboard error (e.g., invalid size or index).
    BitBoardError(BitBoardError),
    /// Coordinates outside the grid.
    OutOfBounds { col: usize, row: usize },
    /// The cell has already been attacked.
    AlreadyAttacked { col: usize, row: usize },
    /// A ship would leave the grid.
    ShipOutOfBounds,
    /// Ship lengths are limited to 2..=5.
    InvalidShipLength(usize),
    /// Ship index is out of range.
    InvalidIndex,
    /// The inventory has no room left for a ship of this length.
    InventoryExhausted(usize),
    /// Random placement could not find a layout.
    UnableToPlaceShips,
}

impl From<BitBoardError> for GridError {
    fn from(err: BitBoardError) -> Self {
        match err {
            BitBoardError::IndexOutOfBounds { col, row } => GridError::OutOfBounds { col, row },
            other => GridError::BitBoardError(other),
        }
    }
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::BitBoardError(e) => write!(f, "BitBoard error: {}", e),
            GridError::OutOfBounds { col, row } => {
                write!(f, "Cell ({}, {}) is outside the grid", col, row)
            }
            GridError::AlreadyAttacked { col, row } => {
                write!(f, "Cell ({}, {}) has already been attacked", col, row)
            }
            GridError::ShipOutOfBounds => write!(f, "Ship placement is out of bounds"),
            GridError::InvalidShipLength(len) => write!(f, "No ship class of length {}", len),
            GridError::InvalidIndex => write!(f, "Ship index is out of range"),
            GridError::InventoryExhausted(len) => {
                write!(f, "All ships of length {} are already placed", len)
            }
            GridError::UnableToPlaceShips => write!(f, "Unable to place ships"),
        }
    }
}

impl std::error::Error for GridError {}

/// Errors returned by match operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    /// A move was requested by the player who is not active.
    TurnViolation { player: Player },
    /// A move targeted a cell that was already attacked.
    RepeatedMove { col: usize, row: usize },
    /// Unsupported grid size, mode or inventory at construction.
    InvalidConfiguration(&'static str),
    /// The match already has a winner.
    MatchFinished,
    /// The mode has no computer opponent.
    NoOpponent,
    /// Any other grid-level failure.
    Grid(GridError),
    /// Serialized state could not be encoded or decoded.
    Codec(String),
    /// Decoded state is internally inconsistent.
    CorruptState(&'static str),
}

impl From<GridError> for MatchError {
    fn from(err: GridError) -> Self {
        match err {
            GridError::AlreadyAttacked { col, row } => MatchError::RepeatedMove { col, row },
            other => MatchError::Grid(other),
        }
    }
}

impl From<BitBoardError> for MatchError {
    fn from(err: BitBoardError) -> Self {
        MatchError::from(GridError::from(err))
    }
}

impl From<bincode::Error> for MatchError {
    fn from(err: bincode::Error) -> Self {
        MatchError::Codec(err.to_string())
    }
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchError::TurnViolation { player } => {
                write!(f, "It is not {}'s turn", player)
            }
            MatchError::RepeatedMove { col, row } => {
                write!(f, "Cell ({}, {}) has already been attacked", col, row)
            }
            MatchError::InvalidConfiguration(why) => write!(f, "Invalid configuration: {}", why),
            MatchError::MatchFinished => write!(f, "The match is already finished"),
            MatchError::NoOpponent => write!(f, "This match has no computer opponent"),
            MatchError::Grid(e) => write!(f, "{}", e),
            MatchError::Codec(e) => write!(f, "Codec error: {}", e),
            MatchError::CorruptState(why) => write!(f, "Corrupt match state: {}", why),
        }
    }
}

impl std::error::Error for MatchError {}
