use std::io::{stdin, stdout, BufReader};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};

use uttt_engine::arena::Node;
use uttt_engine::board::Board;
use uttt_engine::constants::{
    DEFAULT_ARENA_BYTES, DEFAULT_C, DEFAULT_DEADLINE_MS, DEFAULT_FPU, FPU_JITTER,
};
use uttt_engine::io::run as run_protocol;
use uttt_engine::mcts::{McConfig, Mcts};
use uttt_engine::playout::Rng as FastRng;
use uttt_engine::search::{Driver, EngineConfig};

/// Ultimate Tic-Tac-Toe move-selection engine: UCT search over a node
/// arena, with a small opening book and a fixed per-move time budget.
#[derive(Parser)]
#[command(name = "uttt-engine", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// UCT exploration constant.
    #[arg(long, default_value_t = DEFAULT_C)]
    c: f64,

    /// First-play-urgency bound for unvisited children.
    #[arg(long, default_value_t = DEFAULT_FPU)]
    fpu: f64,

    /// Per-move wall-clock budget, in milliseconds.
    #[arg(long = "deadline-ms", default_value_t = DEFAULT_DEADLINE_MS)]
    deadline_ms: u64,

    /// Node arena capacity, in bytes.
    #[arg(long = "arena-bytes", default_value_t = DEFAULT_ARENA_BYTES)]
    arena_bytes: usize,

    /// Print per-move search diagnostics to stderr.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Play one game over the line-oriented turn protocol on stdin/stdout
    /// (the default when no subcommand is given).
    Play,
    /// Run a fixed-position throughput benchmark at increasing playout
    /// counts, reporting playouts/sec to stderr.
    Bench,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = EngineConfig {
        exploration_c: cli.c,
        fpu: cli.fpu,
        deadline_ms: cli.deadline_ms,
        arena_bytes: cli.arena_bytes,
        verbose: cli.verbose,
    };

    match cli.command.unwrap_or(Command::Play) {
        Command::Play => play(config),
        Command::Bench => {
            bench(config);
            Ok(())
        }
    }
}

fn play(config: EngineConfig) -> anyhow::Result<()> {
    let mut driver = Driver::new(config);
    let mut reader = BufReader::new(stdin());
    let mut writer = stdout();
    run_protocol(&mut reader, &mut writer, &mut driver).context("turn protocol loop failed")
}

/// Benchmark harness for a single canonical mid-game position: a fresh tree
/// runs an increasing number of playouts (1k, 10k, 100k, 1M) and reports
/// playouts per second each time.
fn bench(config: EngineConfig) {
    let board = Board {
        minis: [0, 0, 0, 0, 891, 0, 12393, 729, 6],
    };
    let last_move = 61;
    let root_player: i8 = 1;

    let node_size = std::mem::size_of::<Node>();
    let capacity = (config.arena_bytes / node_size).max(64);
    let mc_config = McConfig {
        c: config.exploration_c,
        fpu: config.fpu,
        fpu_jitter: FPU_JITTER,
    };

    let mut playouts = 1_000u64;
    for _ in 0..4 {
        let mut mcts = Mcts::new(capacity, mc_config);
        let root = mcts.new_search(root_player);
        let mut working_board = board;
        let mut fast_rng = FastRng::new(0xC0FFEE);
        let mut cold_rng = fastrand::Rng::with_seed(0xC0FFEE);

        let start = Instant::now();
        for _ in 0..playouts {
            mcts.playout_once(root, &mut working_board, last_move, &mut fast_rng, &mut cold_rng);
        }
        let elapsed = start.elapsed();
        let kpps = playouts as f64 / elapsed.as_secs_f64().max(1e-9) / 1000.0;
        eprintln!(
            "time {}ms playouts {playouts} kpps {:.1}",
            elapsed.as_millis(),
            kpps
        );
        playouts *= 10;
    }
}
