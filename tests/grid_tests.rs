use broadside::{
    Coordinate, Direction, Grid, GridError, GridState, ShipInventory, Ship, ShotResult,
    PRESET_LARGE, PRESET_SMALL,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn two_destroyers() -> Grid {
    Grid::new(5, ShipInventory::new([2, 0, 0, 0])).unwrap()
}

#[test]
fn test_attack_hit_miss_and_repeat() {
    let mut grid = two_destroyers();
    grid.place_ship(Ship::new(2, Coordinate::new(0, 0), Direction::South, 5).unwrap())
        .unwrap();

    assert_eq!(grid.attack(3, 3).unwrap(), ShotResult::Miss);
    assert_eq!(grid.attack(0, 0).unwrap(), ShotResult::Hit);
    assert!(grid.cell(0, 0).unwrap().is_hit());
    assert!(grid.cell(0, 0).unwrap().is_ship());
    assert!(!grid.cell(3, 3).unwrap().is_ship());

    // repeated attack triggers error and leaves the cell hit
    assert_eq!(
        grid.attack(0, 0).unwrap_err(),
        GridError::AlreadyAttacked { col: 0, row: 0 }
    );
    assert!(grid.cell(0, 0).unwrap().is_hit());

    assert_eq!(
        grid.attack(5, 0).unwrap_err(),
        GridError::OutOfBounds { col: 5, row: 0 }
    );
}

#[test]
fn test_single_ship_destroyed() {
    let mut grid = two_destroyers();
    grid.place_ship(Ship::new(2, Coordinate::new(0, 0), Direction::South, 5).unwrap())
        .unwrap();

    grid.attack(0, 0).unwrap();
    assert!(!grid.all_ships_destroyed());
    assert_eq!(grid.ships_remaining(), 1);
    grid.attack(0, 1).unwrap();
    assert!(grid.all_ships_destroyed());
    assert_eq!(grid.ships_remaining(), 0);
}

#[test]
fn test_inventory_limits_ships() {
    let mut grid = Grid::new(5, PRESET_SMALL).unwrap();
    grid.place_ship(Ship::new(3, Coordinate::new(0, 0), Direction::East, 5).unwrap())
        .unwrap();
    assert_eq!(
        grid.place_ship(Ship::new(3, Coordinate::new(0, 2), Direction::East, 5).unwrap())
            .unwrap_err(),
        GridError::InventoryExhausted(3)
    );
}

#[test]
fn test_overlap_counts_and_legitimacy() {
    let mut grid = two_destroyers();
    let fleet = grid.fleet_mut();
    fleet
        .add_ship(Ship::new(2, Coordinate::new(1, 1), Direction::East, 5).unwrap())
        .unwrap();
    assert!(!fleet.placement_legit(), "inventory not complete");

    fleet
        .add_ship(Ship::new(2, Coordinate::new(2, 1), Direction::South, 5).unwrap())
        .unwrap();
    assert_eq!(fleet.ships_on_cell(Coordinate::new(2, 1)), 2);
    assert_eq!(grid.cell(2, 1).unwrap().ships(), 2);
    assert!(!grid.fleet().placement_legit());

    // drag the second ship clear of the first
    let idx = grid.fleet().ship_index_at(Coordinate::new(2, 2)).unwrap();
    grid.fleet_mut().move_ship(idx, Direction::East).unwrap();
    assert_eq!(grid.fleet().ships_on_cell(Coordinate::new(2, 1)), 1);
    assert!(grid.fleet().placement_legit());

    let found = grid
        .fleet()
        .find_ship_containing_cell(Coordinate::new(3, 2))
        .unwrap();
    assert_eq!(found.bow(), Coordinate::new(3, 1));
    assert!(grid.fleet().find_ship_containing_cell(Coordinate::new(4, 4)).is_none());
}

#[test]
fn test_turn_ship_in_fleet() {
    let mut grid = two_destroyers();
    grid.place_ship(Ship::new(2, Coordinate::new(4, 4), Direction::North, 5).unwrap())
        .unwrap();
    // turning right would point east, off the grid
    assert_eq!(
        grid.fleet_mut().turn_ship_right(0).unwrap_err(),
        GridError::ShipOutOfBounds
    );
    grid.fleet_mut().turn_ship_left(0).unwrap();
    assert_eq!(grid.fleet().ship(0).unwrap().heading(), Direction::West);
    assert_eq!(grid.fleet_mut().turn_ship_left(7).unwrap_err(), GridError::InvalidIndex);
}

#[test]
fn test_random_placement_is_legit() {
    let mut rng = SmallRng::seed_from_u64(42);
    for (size, inventory) in [(5, PRESET_SMALL), (10, PRESET_LARGE)] {
        let mut grid = Grid::new(size, inventory).unwrap();
        grid.fleet_mut().place_ships_randomly(&mut rng).unwrap();
        assert!(grid.fleet().placement_legit());
        assert_eq!(grid.fleet().occupancy().count_ones(), inventory.covered_cells());
    }
}

#[test]
fn test_random_placement_gives_up() {
    let mut rng = SmallRng::seed_from_u64(7);
    let mut grid = Grid::new(2, ShipInventory::new([0, 1, 0, 0])).unwrap();
    assert_eq!(
        grid.fleet_mut().place_ships_randomly(&mut rng).unwrap_err(),
        GridError::UnableToPlaceShips
    );
    assert!(grid.fleet().ships().is_empty());
}

#[test]
fn test_reproducible_placement() {
    let mut rng1 = SmallRng::seed_from_u64(42);
    let mut rng2 = SmallRng::seed_from_u64(42);
    let mut g1 = Grid::new(10, PRESET_LARGE).unwrap();
    let mut g2 = Grid::new(10, PRESET_LARGE).unwrap();
    g1.fleet_mut().place_ships_randomly(&mut rng1).unwrap();
    g2.fleet_mut().place_ships_randomly(&mut rng2).unwrap();
    assert_eq!(g1, g2);
}

#[test]
fn test_grid_state_roundtrip() {
    let mut grid = two_destroyers();
    grid.place_ship(Ship::new(2, Coordinate::new(1, 2), Direction::East, 5).unwrap())
        .unwrap();
    grid.attack(1, 2).unwrap();

    let state = grid.state();
    let mut grid2 = Grid::try_from(state).unwrap();

    assert_eq!(
        grid2.attack(1, 2).unwrap_err(),
        GridError::AlreadyAttacked { col: 1, row: 2 }
    );
    assert_eq!(grid2.fleet().ship(0).unwrap().bow(), Coordinate::new(1, 2));
}

#[test]
fn test_grid_state_rejects_bad_ship() {
    let mut state: GridState = two_destroyers().state();
    state.ships.push(broadside::ShipState {
        length: 2,
        bow: Coordinate::new(4, 4),
        heading: Direction::East,
    });
    assert_eq!(Grid::try_from(state).unwrap_err(), GridError::ShipOutOfBounds);
}

#[test]
fn test_grid_too_large_for_mask() {
    assert!(matches!(
        Grid::new(12, PRESET_LARGE),
        Err(GridError::BitBoardError(_))
    ));
    let grid = Grid::new(11, PRESET_LARGE).unwrap();
    assert_eq!(grid.size(), 11);
}
