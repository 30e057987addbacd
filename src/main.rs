use std::io::{self, BufRead, Write};

use anyhow::{anyhow, bail};
use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;

use broadside::ui::{coord_to_string, format_attempts, format_clock, parse_coord, render_grid};
use broadside::{
    init_logging, Coordinate, GameMode, Match, MatchError, Player, ShipInventory, SHIP_CLASSES,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OpponentKind {
    /// Another human at the same terminal.
    Human,
    Easy,
    Hard,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a match in the terminal.
    Play {
        #[arg(long, default_value_t = 10)]
        size: usize,
        #[arg(long, value_enum, default_value_t = OpponentKind::Hard)]
        opponent: OpponentKind,
        #[arg(long, help = "Custom ship counts for lengths 2,3,4,5 (e.g. --ships 2,1,0,0)")]
        ships: Option<String>,
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
    },
    /// Pit a random shooter against the computer opponent and report results.
    Simulate {
        #[arg(long, default_value_t = 10)]
        size: usize,
        #[arg(long, value_enum, default_value_t = OpponentKind::Hard)]
        opponent: OpponentKind,
        #[arg(long, default_value_t = 100)]
        games: u64,
        #[arg(long, help = "Fix RNG seed for reproducible runs (e.g., --seed 12345)")]
        seed: Option<u64>,
    },
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Play {
            size,
            opponent,
            ships,
            seed,
        } => {
            let mut rng = make_rng(seed);
            let inventory = ships.as_deref().map(parse_inventory).transpose()?;
            let mut game = build_match(size, opponent, inventory)?;
            game.place_all_ships(&mut rng)?;
            play(&mut game, &mut rng)
        }
        Commands::Simulate {
            size,
            opponent,
            games,
            seed,
        } => {
            if matches!(opponent, OpponentKind::Human) {
                bail!("simulation needs a computer opponent");
            }
            simulate(size, opponent, games, seed)
        }
    }
}

fn make_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(s) => {
            println!("Using fixed seed: {} (game will be reproducible)", s);
            SmallRng::seed_from_u64(s)
        }
        None => {
            let mut seed_rng = rand::rng();
            SmallRng::from_rng(&mut seed_rng)
        }
    }
}

fn mode_for(opponent: OpponentKind) -> GameMode {
    match opponent {
        OpponentKind::Human => GameMode::VsPlayer,
        OpponentKind::Easy => GameMode::VsAiEasy,
        OpponentKind::Hard => GameMode::VsAiHard,
    }
}

fn parse_inventory(input: &str) -> anyhow::Result<ShipInventory> {
    let counts: Vec<usize> = input
        .split(',')
        .map(|s| s.trim().parse::<usize>())
        .collect::<Result<_, _>>()
        .map_err(|e| anyhow!("invalid ship count in {:?}: {}", input, e))?;
    let counts: [usize; SHIP_CLASSES] = counts
        .try_into()
        .map_err(|_| anyhow!("expected {} ship counts", SHIP_CLASSES))?;
    Ok(ShipInventory::new(counts))
}

fn build_match(
    size: usize,
    opponent: OpponentKind,
    inventory: Option<ShipInventory>,
) -> anyhow::Result<Match> {
    let mode = mode_for(opponent);
    let game = match inventory {
        None => Match::standard(size, mode)?,
        Some(inv) if mode == GameMode::VsPlayer => Match::custom(size, inv)?,
        Some(inv) => Match::with_inventory(mode, size, inv)?,
    };
    if !game.is_inventory_legit(&game.inventory()) {
        bail!(
            "{:?} covers too much of a {}x{} grid",
            game.inventory(),
            size,
            size
        );
    }
    Ok(game)
}

fn play(game: &mut Match, rng: &mut SmallRng) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while !game.is_finished() {
        let player = game.active_player();
        if player == Player::PlayerTwo && game.opponent().is_some() {
            let turn = game.play_opponent_turn(rng)?;
            for (cell, result) in &turn.shots {
                println!("Computer fires at {}: {:?}", coord_to_string(*cell), result);
            }
            continue;
        }

        println!("\n{} to move. Target grid:", player);
        print!("{}", render_grid(game.grid_under_attack(), false));
        println!("Your grid:");
        print!("{}", render_grid(game.current_grid(), true));
        println!(
            "Time {}  Attempts {}",
            format_clock(game.time().as_secs()),
            format_attempts(game.attempts(player))
        );

        game.start_timer();
        let result = loop {
            print!("Enter target (e.g. B3): ");
            io::stdout().flush()?;
            let Some(line) = lines.next() else {
                game.stop_timer();
                println!("\nInput closed, abandoning match.");
                return Ok(());
            };
            let Some(cell) = parse_coord(&line?) else {
                println!("Could not parse coordinate.");
                continue;
            };
            match game.make_move(player, cell.col, cell.row) {
                Ok(result) => break (cell, result),
                Err(e @ (MatchError::RepeatedMove { .. } | MatchError::Grid(_))) => {
                    println!("{}", e);
                }
                Err(e) => return Err(e.into()),
            }
        };
        game.stop_timer();
        println!("{}: {:?}", coord_to_string(result.0), result.1);

        if !game.is_finished() {
            game.switch_players();
        }
    }

    if let Some(winner) = game.winner() {
        println!(
            "\n{} wins after {} attempts.",
            winner,
            format_attempts(game.attempts(winner))
        );
    }
    Ok(())
}

/// Single random shot for player one at a cell not yet attacked.
fn random_shot(game: &Match, rng: &mut SmallRng) -> Option<Coordinate> {
    let open: Vec<Coordinate> = (!game.grid_under_attack().hits())
        .iter_set_bits()
        .map(Coordinate::from)
        .collect();
    open.choose(rng).copied()
}

fn simulate(
    size: usize,
    opponent: OpponentKind,
    games: u64,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    let base = seed.unwrap_or_else(rand::random);
    let mut computer_wins = 0u64;
    let mut computer_attempts = 0u64;

    for g in 0..games {
        let mut rng = SmallRng::seed_from_u64(base.wrapping_add(g));
        let mut game = build_match(size, opponent, None)?;
        game.place_all_ships(&mut rng)?;

        while !game.is_finished() {
            let Some(cell) = random_shot(&game, &mut rng) else {
                break;
            };
            game.make_move(Player::PlayerOne, cell.col, cell.row)?;
            if game.is_finished() {
                break;
            }
            game.switch_players();
            game.play_opponent_turn(&mut rng)?;
        }

        if game.winner() == Some(Player::PlayerTwo) {
            computer_wins += 1;
            computer_attempts += u64::from(game.attempts(Player::PlayerTwo));
        }
    }

    println!("games: {}", games);
    println!("computer wins: {}", computer_wins);
    if computer_wins > 0 {
        println!(
            "average attempts per computer win: {:.1}",
            computer_attempts as f64 / computer_wins as f64
        );
    }
    Ok(())
}
