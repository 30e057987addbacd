use std::collections::HashSet;

use broadside::{
    Belief, Coordinate, Difficulty, Direction, GameMode, Mask, Match, MatchError, OpponentState,
    OpponentTurn, Player, Ship, ShipInventory, ShotResult,
};
use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;

/// Player one takes a single random shot, then the computer takes its turn.
fn play_round(game: &mut Match, rng: &mut SmallRng) -> Option<OpponentTurn> {
    let open: Vec<Coordinate> = (!game.grid_under_attack().hits())
        .iter_set_bits()
        .map(Coordinate::from)
        .collect();
    let cell = *open.choose(rng).unwrap();
    game.make_move(Player::PlayerOne, cell.col, cell.row).unwrap();
    if game.is_finished() {
        return None;
    }
    game.switch_players();
    Some(game.play_opponent_turn(rng).unwrap())
}

#[test]
fn test_easy_exhausts_empty_grid_without_repeats() {
    let mut rng = SmallRng::seed_from_u64(5);
    let mut game =
        Match::with_inventory(GameMode::VsAiEasy, 5, ShipInventory::new([0, 0, 0, 0])).unwrap();

    let mut seen = HashSet::new();
    for _ in 0..25 {
        game.switch_players();
        let turn = game.play_opponent_turn(&mut rng).unwrap();
        assert_eq!(turn.shots.len(), 1);
        let (cell, result) = turn.shots[0];
        assert_eq!(result, ShotResult::Miss);
        assert!(seen.insert(cell), "repeated shot at {}", cell);
        assert_eq!(game.opponent().unwrap().belief(cell), Belief::Water);
        assert_eq!(game.active_player(), Player::PlayerOne);
    }
    assert_eq!(seen.len(), 25);
    assert_eq!(game.attempts(Player::PlayerTwo), 25);

    // nothing left to shoot at
    game.switch_players();
    let turn = game.play_opponent_turn(&mut rng).unwrap();
    assert!(turn.shots.is_empty());
    assert!(!turn.won);
}

#[test]
fn test_opponent_needs_its_turn() {
    let mut rng = SmallRng::seed_from_u64(1);
    let mut game = Match::standard(5, GameMode::VsAiHard).unwrap();
    assert_eq!(
        game.play_opponent_turn(&mut rng).unwrap_err(),
        MatchError::TurnViolation {
            player: Player::PlayerTwo
        }
    );
}

#[test]
fn test_miss_marks_water() {
    let mut rng = SmallRng::seed_from_u64(3);
    let mut game =
        Match::with_inventory(GameMode::VsAiHard, 5, ShipInventory::new([2, 0, 0, 0])).unwrap();
    game.switch_players();
    let turn = game.play_opponent_turn(&mut rng).unwrap();
    // player one has no ships, so the only shot misses
    assert_eq!(turn.shots.len(), 1);
    let (cell, result) = turn.shots[0];
    assert_eq!(result, ShotResult::Miss);
    assert!(cell.has_odd_parity());
    assert_eq!(game.opponent().unwrap().belief(cell), Belief::Water);
}

#[test]
fn test_opponent_sinks_lone_ship_and_wins() {
    for seed in 0..20 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut game =
            Match::with_inventory(GameMode::VsAiHard, 5, ShipInventory::new([2, 0, 0, 0]))
                .unwrap();
        game.grid_mut(Player::PlayerOne)
            .place_ship(Ship::new(2, Coordinate::new(0, 0), Direction::South, 5).unwrap())
            .unwrap();

        let mut won = false;
        for _ in 0..25 {
            game.switch_players();
            let turn = game.play_opponent_turn(&mut rng).unwrap();
            if turn.won {
                won = true;
                assert_eq!(turn.shots.last().unwrap().1, ShotResult::Hit);
                break;
            }
        }
        assert!(won, "seed {} never finished", seed);
        assert_eq!(game.winner(), Some(Player::PlayerTwo));
        assert!(game.opponent().unwrap().has_won());
        // the winner keeps the turn
        assert_eq!(game.active_player(), Player::PlayerTwo);
        assert_eq!(
            game.play_opponent_turn(&mut rng).unwrap_err(),
            MatchError::MatchFinished
        );
    }
}

#[test]
fn test_ai_vs_random_game_finishes() {
    for (seed, mode) in [(11, GameMode::VsAiEasy), (12, GameMode::VsAiHard)] {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut game = Match::standard(10, mode).unwrap();
        game.place_all_ships(&mut rng).unwrap();
        let mut rounds = 0;
        while !game.is_finished() {
            rounds += 1;
            assert!(rounds <= 100, "game took too many rounds");
            play_round(&mut game, &mut rng);
        }
        let winner = game.winner().unwrap();
        assert!(game.grid(winner.other()).all_ships_destroyed());
    }
}

/// Everything on player one's grid is resolved except (2,2) and (4,4), the
/// last cells of two destroyers. The candidate list holds a cell already
/// known to be water next to the open (2,2).
#[test]
fn test_stale_candidate_is_skipped() {
    let mut game =
        Match::with_inventory(GameMode::VsAiHard, 5, ShipInventory::new([2, 0, 0, 0])).unwrap();
    let grid = game.grid_mut(Player::PlayerOne);
    grid.place_ship(Ship::new(2, Coordinate::new(2, 1), Direction::South, 5).unwrap())
        .unwrap();
    grid.place_ship(Ship::new(2, Coordinate::new(3, 4), Direction::East, 5).unwrap())
        .unwrap();

    let mut hits = Mask::new(5);
    hits.fill();
    hits.clear(2, 2).unwrap();
    hits.clear(4, 4).unwrap();
    let ship = Mask::from_iter(5, [(2, 1), (3, 4)]).unwrap();
    let water = hits & !ship;

    let stale = Coordinate::new(0, 0);
    let open = Coordinate::new(2, 2);
    let mut state = game.state();
    state.grids[0].hits = hits;
    state.active_player = Player::PlayerTwo;
    state.opponent = Some(OpponentState {
        difficulty: Difficulty::Hard,
        water,
        ship,
        candidates: vec![stale, open],
        has_won: false,
    });
    let restored = Match::from_state(state).unwrap();
    assert_eq!(restored.opponent().unwrap().belief(stale), Belief::Water);

    for seed in 0..8 {
        let mut game = Match::from_state(restored.state()).unwrap();
        let mut rng = SmallRng::seed_from_u64(seed);
        let turn = game.play_opponent_turn(&mut rng).unwrap();
        assert_eq!(
            turn.shots,
            vec![
                (open, ShotResult::Hit),
                (Coordinate::new(4, 4), ShotResult::Hit)
            ]
        );
        assert!(turn.won);
        assert!(!game.opponent().unwrap().candidates().contains(&stale));
        assert_eq!(game.winner(), Some(Player::PlayerTwo));
    }
}

#[test]
fn test_hard_difficulty_from_mode() {
    let game = Match::standard(10, GameMode::VsAiHard).unwrap();
    assert_eq!(game.opponent().unwrap().difficulty(), Difficulty::Hard);
    let game = Match::standard(10, GameMode::VsAiEasy).unwrap();
    assert_eq!(game.opponent().unwrap().difficulty(), Difficulty::Easy);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Hard search shots keep odd parity until the first hit; the shot after
    /// the first hit is one of that hit's unknown neighbours.
    #[test]
    fn hard_search_then_follow_up(seed in any::<u64>()) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut game = Match::standard(10, GameMode::VsAiHard).unwrap();
        game.place_all_ships(&mut rng).unwrap();

        let mut shots: Vec<(Coordinate, ShotResult)> = Vec::new();
        let mut first_hit: Option<(usize, HashSet<Coordinate>)> = None;
        while !game.is_finished() && shots.len() < 100 {
            if let Some(turn) = play_round(&mut game, &mut rng) {
                for shot in turn.shots {
                    if first_hit.is_none() && shot.1 == ShotResult::Hit {
                        // neighbours still unknown right before this hit
                        let known: HashSet<Coordinate> =
                            shots.iter().map(|(c, _)| *c).collect();
                        let pending = shot
                            .0
                            .neighbors(10)
                            .filter(|c| !known.contains(c))
                            .collect();
                        first_hit = Some((shots.len(), pending));
                    }
                    shots.push(shot);
                }
            }
            if first_hit.as_ref().is_some_and(|(i, _)| shots.len() > i + 1) {
                break;
            }
        }

        let limit = first_hit.as_ref().map_or(shots.len(), |(i, _)| *i + 1);
        for (cell, _) in &shots[..limit] {
            prop_assert!(cell.has_odd_parity(), "search shot {} has even parity", cell);
        }
        if let Some((i, pending)) = first_hit {
            if let Some((next, _)) = shots.get(i + 1) {
                prop_assert!(pending.contains(next), "{} is not next to the first hit", next);
            }
        }
    }

    /// Beliefs never change once resolved and always match the grid.
    #[test]
    fn beliefs_are_monotonic(seed in any::<u64>(), easy in any::<bool>()) {
        let mode = if easy { GameMode::VsAiEasy } else { GameMode::VsAiHard };
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut game = Match::standard(5, mode).unwrap();
        game.place_all_ships(&mut rng).unwrap();

        let mut resolved: Vec<(Coordinate, Belief)> = Vec::new();
        while !game.is_finished() {
            play_round(&mut game, &mut rng);
            let opponent = game.opponent().unwrap();
            for (cell, belief) in &resolved {
                prop_assert_eq!(opponent.belief(*cell), *belief);
            }
            resolved.clear();
            for row in 0..5 {
                for col in 0..5 {
                    let cell = Coordinate::new(col, row);
                    let belief = opponent.belief(cell);
                    if belief != Belief::Unknown {
                        let truth = game.grid(Player::PlayerOne).cell(col, row).unwrap();
                        prop_assert!(truth.is_hit());
                        prop_assert_eq!(belief == Belief::Ship, truth.is_ship());
                        resolved.push((cell, belief));
                    }
                }
            }
        }
    }
}
