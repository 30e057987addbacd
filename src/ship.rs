//! Ship geometry: length, bow cell and heading, with a cached occupancy mask.

use core::fmt;
use serde::{Deserialize, Serialize};

use crate::bitboard::Mask;
use crate::common::{Coordinate, GridError};
use crate::config::SHIP_LENGTHS;

/// Compass direction, used both to move ships and as a ship's heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Column and row delta of one step.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }

    /// Quarter turn clockwise.
    pub fn turned_right(self) -> Direction {
        match self {
            Direction::North => Direction::East,
            Direction::East => Direction::South,
            Direction::South => Direction::West,
            Direction::West => Direction::North,
        }
    }

    /// Quarter turn counter-clockwise.
    pub fn turned_left(self) -> Direction {
        match self {
            Direction::North => Direction::West,
            Direction::West => Direction::South,
            Direction::South => Direction::East,
            Direction::East => Direction::North,
        }
    }
}

/// Serializable ship placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipState {
    pub length: usize,
    pub bow: Coordinate,
    pub heading: Direction,
}

/// A ship placed on a `size×size` grid. Its cells start at `bow` and run in
/// the `heading` direction.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Ship {
    length: usize,
    bow: Coordinate,
    heading: Direction,
    mask: Mask,
}

impl Ship {
    /// Place a ship of `length` at `bow` pointing along `heading`.
    pub fn new(
        length: usize,
        bow: Coordinate,
        heading: Direction,
        grid_size: usize,
    ) -> Result<Self, GridError> {
        if !SHIP_LENGTHS.contains(&length) {
            return Err(GridError::InvalidShipLength(length));
        }
        let (dc, dr) = heading.delta();
        let mut mask = Mask::try_new(grid_size)?;
        for i in 0..length as isize {
            let cell = bow
                .offset(dc * i, dr * i, grid_size)
                .ok_or(GridError::ShipOutOfBounds)?;
            mask.set(cell.col, cell.row)?;
        }
        Ok(Ship {
            length,
            bow,
            heading,
            mask,
        })
    }

    /// Rebuild a ship from its serialized form, re-validating the geometry.
    pub fn from_state(state: &ShipState, grid_size: usize) -> Result<Self, GridError> {
        Ship::new(state.length, state.bow, state.heading, grid_size)
    }

    pub fn state(&self) -> ShipState {
        ShipState {
            length: self.length,
            bow: self.bow,
            heading: self.heading,
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn bow(&self) -> Coordinate {
        self.bow
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    /// Occupancy mask of the ship on the grid.
    pub fn mask(&self) -> Mask {
        self.mask
    }

    /// Cells covered by the ship, bow first.
    pub fn cells(&self) -> impl Iterator<Item = Coordinate> + '_ {
        let (dc, dr) = self.heading.delta();
        (0..self.length as isize).filter_map(move |i| {
            self.bow.offset(dc * i, dr * i, self.mask.size())
        })
    }

    pub fn contains(&self, cell: Coordinate) -> bool {
        self.mask.get(cell.col, cell.row).unwrap_or(false)
    }

    /// True once every cell is in `hits`.
    pub fn is_destroyed(&self, hits: &Mask) -> bool {
        self.mask.is_subset_of(hits)
    }

    /// The ship shifted one cell towards `direction`.
    pub fn moved(&self, direction: Direction) -> Result<Ship, GridError> {
        let (dc, dr) = direction.delta();
        let size = self.mask.size();
        let bow = self
            .bow
            .offset(dc, dr, size)
            .ok_or(GridError::ShipOutOfBounds)?;
        Ship::new(self.length, bow, self.heading, size)
    }

    /// The ship rotated clockwise around its bow.
    pub fn turned_right(&self) -> Result<Ship, GridError> {
        Ship::new(self.length, self.bow, self.heading.turned_right(), self.mask.size())
    }

    /// The ship rotated counter-clockwise around its bow.
    pub fn turned_left(&self) -> Result<Ship, GridError> {
        Ship::new(self.length, self.bow, self.heading.turned_left(), self.mask.size())
    }
}

impl fmt::Debug for Ship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ship {{ length: {}, bow: {}, heading: {:?} }}",
            self.length, self.bow, self.heading,
        )
    }
}
