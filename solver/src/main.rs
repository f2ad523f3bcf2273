//! Generate a random Bridges puzzle and solve it step by step.

use std::env;
use std::process::ExitCode;

use bridges::{Generator, GeneratorConfig, PuzzleState, Solver};
use clap::Parser;
use log::{debug, info};

/// Generate a random Bridges puzzle and solve it by deduction.
#[derive(Parser)]
#[command(about, long_about = None, version)]
struct Args {
    /// Width of the field
    #[arg(short = 'x', long, default_value_t = 10)]
    width: usize,

    /// Height of the field
    #[arg(short = 'y', long, default_value_t = 10)]
    height: usize,

    /// Number of islands
    #[arg(short, long, default_value_t = 12)]
    islands: usize,

    /// Seed for reproducible puzzles
    #[arg(short, long)]
    seed: Option<u64>,

    /// Print the puzzle after every bridge the solver adds
    #[arg(long, default_value_t = false)]
    steps: bool,

    /// Accept puzzles the solver cannot finish on its own
    #[arg(long, default_value_t = false)]
    allow_guessing: bool,

    /// Enable debug messages
    #[arg(short, long, default_value_t = false)]
    debug: bool,
}

fn main() -> ExitCode {
    let args: Args = Args::parse();

    if args.debug {
        env::set_var("RUST_LOG", "debug");
    }
    env_logger::init();

    let config = GeneratorConfig {
        require_deducible: !args.allow_guessing,
        ..GeneratorConfig::default()
    };
    let generator = match args.seed {
        Some(seed) => Generator::from_seed(seed),
        None => Generator::new(),
    };

    let mut puzzle = match generator
        .with_config(config)
        .generate(args.width, args.height, args.islands)
    {
        Ok(puzzle) => puzzle,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    println!("{}", puzzle);

    let solver = Solver::new();
    let mut moves = 0;
    while let Some(id) = solver.step(&mut puzzle) {
        moves += 1;
        debug!("move {}: connection {}", moves, id);
        if args.steps {
            puzzle.clear_emphasis();
            puzzle.set_emphasized(id, true);
            println!("{}", puzzle);
        }
    }
    puzzle.mark_invalid_connections();

    let state = puzzle.state();
    info!("{} moves, {:?}", moves, state);
    println!("{}", puzzle);
    println!("{:?} after {} moves", state, moves);

    match state {
        PuzzleState::Solved => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    }
}
