//! The ships of one grid and the rules for laying them out.

use log::{debug, warn};
use rand::seq::IndexedRandom;
use rand::Rng;

use crate::bitboard::Mask;
use crate::common::{Coordinate, GridError};
use crate::config::ShipInventory;
use crate::ship::{Direction, Ship};

/// Random layouts tried before giving up.
const MAX_LAYOUT_ATTEMPTS: usize = 100;

/// Ship collection of a single grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fleet {
    grid_size: usize,
    inventory: ShipInventory,
    ships: Vec<Ship>,
}

impl Fleet {
    /// An empty fleet that may hold the ships listed in `inventory`.
    pub fn new(grid_size: usize, inventory: ShipInventory) -> Self {
        Fleet {
            grid_size,
            inventory,
            ships: Vec::new(),
        }
    }

    pub fn inventory(&self) -> ShipInventory {
        self.inventory
    }

    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    pub fn ship(&self, index: usize) -> Option<&Ship> {
        self.ships.get(index)
    }

    /// Union of all ship masks.
    pub fn occupancy(&self) -> Mask {
        self.ships
            .iter()
            .fold(Mask::new(self.grid_size), |acc, s| acc | s.mask())
    }

    /// Add a ship, as long as its length class still has room. Overlapping
    /// ships are accepted; see [`Fleet::placement_legit`].
    pub fn add_ship(&mut self, ship: Ship) -> Result<(), GridError> {
        let len = ship.length();
        if ship.mask().size() != self.grid_size {
            return Err(GridError::ShipOutOfBounds);
        }
        let placed = self.ships.iter().filter(|s| s.length() == len).count();
        if placed >= self.inventory.count(len) {
            return Err(GridError::InventoryExhausted(len));
        }
        self.ships.push(ship);
        Ok(())
    }

    /// Remove every ship.
    pub fn clear(&mut self) {
        self.ships.clear();
    }

    /// Number of ships covering `cell`.
    pub fn ships_on_cell(&self, cell: Coordinate) -> usize {
        self.ships.iter().filter(|s| s.contains(cell)).count()
    }

    /// First ship covering `cell`.
    pub fn find_ship_containing_cell(&self, cell: Coordinate) -> Option<&Ship> {
        self.ships.iter().find(|s| s.contains(cell))
    }

    /// Index of the first ship covering `cell`.
    pub fn ship_index_at(&self, cell: Coordinate) -> Option<usize> {
        self.ships.iter().position(|s| s.contains(cell))
    }

    /// Every inventory ship is placed and no two ships share a cell.
    pub fn placement_legit(&self) -> bool {
        if self.ships.len() != self.inventory.total_ships() {
            return false;
        }
        let mut seen = Mask::new(self.grid_size);
        for ship in &self.ships {
            if !(seen & ship.mask()).is_empty() {
                return false;
            }
            seen |= ship.mask();
        }
        true
    }

    /// Shift ship `index` by one cell. The ship stays put if it would leave
    /// the grid.
    pub fn move_ship(&mut self, index: usize, direction: Direction) -> Result<(), GridError> {
        let ship = self.ships.get_mut(index).ok_or(GridError::InvalidIndex)?;
        *ship = ship.moved(direction)?;
        Ok(())
    }

    pub fn turn_ship_right(&mut self, index: usize) -> Result<(), GridError> {
        let ship = self.ships.get_mut(index).ok_or(GridError::InvalidIndex)?;
        *ship = ship.turned_right()?;
        Ok(())
    }

    pub fn turn_ship_left(&mut self, index: usize) -> Result<(), GridError> {
        let ship = self.ships.get_mut(index).ok_or(GridError::InvalidIndex)?;
        *ship = ship.turned_left()?;
        Ok(())
    }

    /// True when every ship cell is in `hits`. An empty fleet counts as destroyed.
    pub fn all_ships_destroyed(&self, hits: &Mask) -> bool {
        self.ships.iter().all(|s| s.is_destroyed(hits))
    }

    /// Ships with at least one cell not yet hit.
    pub fn ships_remaining(&self, hits: &Mask) -> usize {
        self.ships.iter().filter(|s| !s.is_destroyed(hits)).count()
    }

    /// Replace the fleet with a random legal layout of the whole inventory.
    pub fn place_ships_randomly<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), GridError> {
        let cells = self.grid_size.saturating_mul(self.grid_size);
        if self.inventory.covered_cells() > cells {
            warn!(
                "{:?} cannot fit on a {}x{} grid",
                self.inventory, self.grid_size, self.grid_size
            );
            self.ships.clear();
            return Err(GridError::UnableToPlaceShips);
        }
        for attempt in 1..=MAX_LAYOUT_ATTEMPTS {
            if self.try_random_layout(rng)? {
                debug!(
                    "placed {} ships on {}x{} grid after {} layout(s)",
                    self.ships.len(),
                    self.grid_size,
                    self.grid_size,
                    attempt
                );
                return Ok(());
            }
        }
        warn!(
            "no layout found for {:?} on {}x{} grid",
            self.inventory, self.grid_size, self.grid_size
        );
        self.ships.clear();
        Err(GridError::UnableToPlaceShips)
    }

    /// One layout pass, longest ship first. Returns `false` when some ship
    /// has no free placement left.
    fn try_random_layout<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<bool, GridError> {
        self.ships.clear();
        let mut occupied = Mask::new(self.grid_size);
        let lengths: Vec<usize> = self.inventory.lengths().collect();
        for len in lengths {
            let options = self.free_placements(len, &occupied)?;
            let Some(&ship) = options.choose(rng) else {
                return Ok(false);
            };
            occupied |= ship.mask();
            self.ships.push(ship);
        }
        Ok(true)
    }

    /// Every placement of a ship of `len` that avoids `occupied`. East and
    /// South headings cover every distinct cell set.
    fn free_placements(&self, len: usize, occupied: &Mask) -> Result<Vec<Ship>, GridError> {
        let mut options = Vec::new();
        for row in 0..self.grid_size {
            for col in 0..self.grid_size {
                for heading in [Direction::East, Direction::South] {
                    let bow = Coordinate::new(col, row);
                    let ship = match Ship::new(len, bow, heading, self.grid_size) {
                        Ok(ship) => ship,
                        Err(GridError::ShipOutOfBounds) => continue,
                        Err(e) => return Err(e),
                    };
                    if (ship.mask() & *occupied).is_empty() {
                        options.push(ship);
                    }
                }
            }
        }
        Ok(options)
    }
}
