//! One player's grid: the fleet plus the record of attacked cells.

use core::fmt;
use serde::{Deserialize, Serialize};

use crate::bitboard::Mask;
use crate::common::{Coordinate, GridError, ShotResult};
use crate::config::ShipInventory;
use crate::fleet::Fleet;
use crate::ship::{Ship, ShipState};

/// Snapshot of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    coord: Coordinate,
    hit: bool,
    ships: usize,
}

impl Cell {
    pub fn col(&self) -> usize {
        self.coord.col
    }

    pub fn row(&self) -> usize {
        self.coord.row
    }

    pub fn coordinate(&self) -> Coordinate {
        self.coord
    }

    /// Whether the cell has been attacked.
    pub fn is_hit(&self) -> bool {
        self.hit
    }

    /// Whether any ship covers the cell.
    pub fn is_ship(&self) -> bool {
        self.ships > 0
    }

    /// Number of ships covering the cell; above one only during placement.
    pub fn ships(&self) -> usize {
        self.ships
    }
}

/// Serializable grid state for saving games.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridState {
    pub size: usize,
    pub inventory: ShipInventory,
    pub ships: Vec<ShipState>,
    pub hits: Mask,
}

/// Grid of one player.
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    hits: Mask,
    fleet: Fleet,
}

impl Grid {
    /// Create an empty grid (no ships placed, nothing attacked). Fails when
    /// `size×size` cells do not fit into a [`Mask`].
    pub fn new(size: usize, inventory: ShipInventory) -> Result<Self, GridError> {
        Ok(Grid {
            size,
            hits: Mask::try_new(size)?,
            fleet: Fleet::new(size, inventory),
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Attacked cells.
    pub fn hits(&self) -> Mask {
        self.hits
    }

    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    pub fn fleet_mut(&mut self) -> &mut Fleet {
        &mut self.fleet
    }

    /// Add a single ship to the fleet.
    pub fn place_ship(&mut self, ship: Ship) -> Result<(), GridError> {
        self.fleet.add_ship(ship)
    }

    /// Snapshot of the cell at (col, row).
    pub fn cell(&self, col: usize, row: usize) -> Result<Cell, GridError> {
        let hit = self.hits.get(col, row)?;
        let coord = Coordinate::new(col, row);
        Ok(Cell {
            coord,
            hit,
            ships: self.fleet.ships_on_cell(coord),
        })
    }

    /// Mark (col, row) as attacked and report whether a ship was there.
    pub fn attack(&mut self, col: usize, row: usize) -> Result<ShotResult, GridError> {
        if self.hits.get(col, row)? {
            return Err(GridError::AlreadyAttacked { col, row });
        }
        self.hits.set(col, row)?;
        if self.fleet.ships_on_cell(Coordinate::new(col, row)) > 0 {
            Ok(ShotResult::Hit)
        } else {
            Ok(ShotResult::Miss)
        }
    }

    /// Returns `true` when every ship cell has been attacked.
    pub fn all_ships_destroyed(&self) -> bool {
        self.fleet.all_ships_destroyed(&self.hits)
    }

    pub fn ships_remaining(&self) -> usize {
        self.fleet.ships_remaining(&self.hits)
    }

    pub fn state(&self) -> GridState {
        GridState {
            size: self.size,
            inventory: self.fleet.inventory(),
            ships: self.fleet.ships().iter().map(Ship::state).collect(),
            hits: self.hits,
        }
    }
}

impl TryFrom<GridState> for Grid {
    type Error = GridError;

    fn try_from(state: GridState) -> Result<Self, Self::Error> {
        let mut grid = Grid::new(state.size, state.inventory)?;
        for ship in &state.ships {
            grid.place_ship(Ship::from_state(ship, state.size)?)?;
        }
        grid.hits = Mask::from_raw(state.hits.into_raw(), state.size);
        Ok(grid)
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Grid {{\n  size: {},\n  hits: {:?},\n  fleet: {:?}\n}}",
            self.size, self.hits, self.fleet
        )
    }
}
