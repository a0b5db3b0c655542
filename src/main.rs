//! Checkers-Rust: a draughts engine with a minimax opponent.
//!
//! ## Usage
//!
//! - `checkers-rust` - Show a demo
//! - `checkers-rust ctp` - Start the text protocol server for a GUI
//! - `checkers-rust selfplay` - Play the agent against itself or a random mover
//!
//! Set `CHECKERS_LOG=debug` to see search statistics on stderr.

use anyhow::bail;
use clap::{Parser, Subcommand, ValueEnum};
use env_logger::Env;

use checkers_rust::board::{Board, Side};
use checkers_rust::constants::{DEFAULT_SEED, MAX_GAME_PLIES};
use checkers_rust::ctp::CtpEngine;
use checkers_rust::playout::{play_match, Player, RandomMover};
use checkers_rust::search::{Agent, Level};

/// Checkers-Rust: a draughts engine with a minimax opponent
#[derive(Parser)]
#[command(name = "checkers-rust")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Copy, Clone, ValueEnum)]
enum SideArg {
    First,
    Second,
}

impl From<SideArg> for Side {
    fn from(arg: SideArg) -> Self {
        match arg {
            SideArg::First => Side::First,
            SideArg::Second => Side::Second,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Start the Checkers Text Protocol server on stdin/stdout
    Ctp {
        /// Agent level: easy, medium or hard
        #[arg(long, default_value = "medium")]
        level: Level,
        /// Side the agent plays
        #[arg(long, value_enum, default_value = "second")]
        agent_side: SideArg,
    },
    /// Play a full game between two players
    Selfplay {
        /// Level of the first side's agent
        #[arg(long, default_value = "easy")]
        first: Level,
        /// Level of the second side's agent
        #[arg(long, default_value = "medium")]
        second: Level,
        /// Replace the second side's agent with a random mover
        #[arg(long)]
        random_opponent: bool,
        /// Seed for the random mover
        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,
        /// Stop after this many plies
        #[arg(long, default_value_t = MAX_GAME_PLIES)]
        max_plies: usize,
    },
    /// Run a simple demo of the engine
    Demo,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().filter_or("CHECKERS_LOG", "warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Ctp { level, agent_side }) => {
            let mut engine = CtpEngine::with_agent_side(agent_side.into(), level);
            engine.run()
        }
        Some(Commands::Selfplay {
            first,
            second,
            random_opponent,
            seed,
            max_plies,
        }) => run_selfplay(first, second, random_opponent, seed, max_plies),
        Some(Commands::Demo) | None => run_demo(),
    }
}

fn run_selfplay(
    first: Level,
    second: Level,
    random_opponent: bool,
    seed: u64,
    max_plies: usize,
) -> anyhow::Result<()> {
    if max_plies == 0 {
        bail!("--max-plies must be at least 1");
    }

    let mut board = Board::new();
    let mut first_player = Agent::new(Side::First, first);
    let mut second_player: Box<dyn Player> = if random_opponent {
        Box::new(RandomMover::new(seed))
    } else {
        Box::new(Agent::new(Side::Second, second))
    };

    let result = play_match(
        &mut board,
        &mut first_player,
        second_player.as_mut(),
        max_plies,
    );

    for (i, mv) in result.moves.iter().enumerate() {
        let side = if i % 2 == 0 { Side::First } else { Side::Second };
        println!("{:>3}. {side:<6} {mv}", i + 1);
    }
    println!("\n{board}");
    match (result.finished, result.winner) {
        (true, Some(side)) => println!("Winner: {side}"),
        (true, None) => println!("Blocked position, no winner"),
        (false, _) => println!("Stopped after {} plies", result.moves.len()),
    }
    println!("Material: {:+.1}", result.score);
    Ok(())
}

fn run_demo() -> anyhow::Result<()> {
    println!("Checkers-Rust: draughts engine with alpha-beta search\n");

    println!("=== Starting Position ===");
    let mut board = Board::new();
    println!("{board}");

    println!("=== Search Demo ===");
    for level in [Level::Easy, Level::Medium] {
        let agent = Agent::new(Side::First, level);
        let (result, stats) = agent.search(&board);
        let Some(mv) = result.best_move else {
            bail!("no move found in the starting position");
        };
        println!(
            "{level}: {mv} (score {:+.1}, {} nodes, {} cutoffs)",
            result.score, stats.nodes, stats.cutoffs
        );
    }

    let agent = Agent::new(Side::First, Level::Easy);
    if let Some(mv) = agent.best_move(&board) {
        board.apply_move(mv);
        println!("\nAfter {mv}:\n{board}");
    }
    Ok(())
}
