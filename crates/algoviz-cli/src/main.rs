//! Algorithm visualization CLI.
//!
//! Provides the `algoviz` binary:
//!
//! - `list` prints every algorithm with the input kind it expects.
//! - `generate` prints a trace as the same JSON the HTTP endpoint returns.
//! - `play` loads a trace (remote first when `--remote` is given) and prints
//!   one line per step as a playback session advances.

use std::fs;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::sync::broadcast::error::RecvError;

use algoviz_core::input::{RANDOM_MAX, RANDOM_MIN};
use algoviz_core::{random_array, AlgorithmId, Input, InputKind, Step};
use algoviz_playback::{
    LoadError, PlaybackConfig, PlaybackSession, RemoteClient, Status, StepsPayload, TraceLoader,
};

/// Step-by-step algorithm traces and playback.
#[derive(Parser)]
#[command(name = "algoviz", about = "Step-by-step algorithm traces and playback")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where the input comes from.
#[derive(clap::Args)]
struct InputArgs {
    /// Algorithm name, e.g. `quick-sort` or `dijkstra`.
    #[arg(short, long)]
    algorithm: String,

    /// Path to a JSON input file, or `-` for stdin.
    #[arg(short, long, conflicts_with = "random")]
    input: Option<String>,

    /// Generate a random array of this length instead of reading input.
    #[arg(short, long)]
    random: Option<usize>,

    /// Seed for `--random`.
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// List available algorithms.
    List,

    /// Print the full trace for one run as JSON.
    Generate {
        #[command(flatten)]
        input: InputArgs,

        /// Pretty-print the JSON.
        #[arg(long)]
        pretty: bool,
    },

    /// Play a trace on a timer, one line per step.
    Play {
        #[command(flatten)]
        input: InputArgs,

        /// Tick interval in milliseconds (default: ALGOVIZ_SPEED_MS or 1000).
        #[arg(short, long)]
        speed_ms: Option<u64>,

        /// Base URL of a remote step generator (default: ALGOVIZ_REMOTE_URL).
        #[arg(long)]
        remote: Option<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::List => run_list(),
        Commands::Generate { input, pretty } => run_generate(&input, pretty),
        Commands::Play {
            input,
            speed_ms,
            remote,
        } => run_play(&input, speed_ms, remote),
    };
    process::exit(exit_code);
}

fn run_list() -> i32 {
    for id in AlgorithmId::ALL {
        println!(
            "{:<28} {:<20} {}",
            id,
            id.family(),
            algoviz_trace::registry::expected_input(id)
        );
    }
    0
}

/// Execute the generate subcommand.
///
/// Returns exit code: 0 = success, 1 = usage error, 2 = invalid input,
/// 3 = I/O error.
fn run_generate(args: &InputArgs, pretty: bool) -> i32 {
    let (algorithm, input) = match resolve(args) {
        Ok(resolved) => resolved,
        Err(code) => return code,
    };

    match algoviz_trace::generate(algorithm, &input) {
        Ok(trace) => {
            let payload = StepsPayload::from_trace(&trace);
            let json = if pretty {
                serde_json::to_string_pretty(&payload)
            } else {
                serde_json::to_string(&payload)
            };
            match json {
                Ok(json) => {
                    println!("{}", json);
                    0
                }
                Err(e) => {
                    eprintln!("Error: failed to serialize trace: {}", e);
                    3
                }
            }
        }
        Err(e) => {
            eprintln!("Invalid input: {}", e);
            2
        }
    }
}

/// Execute the play subcommand. Exit codes as for `generate`.
fn run_play(args: &InputArgs, speed_ms: Option<u64>, remote: Option<String>) -> i32 {
    let (algorithm, input) = match resolve(args) {
        Ok(resolved) => resolved,
        Err(code) => return code,
    };

    let mut config = PlaybackConfig::from_env();
    if let Some(ms) = speed_ms {
        if ms == 0 {
            eprintln!("Error: --speed-ms must be positive");
            return 1;
        }
        config.default_speed = Duration::from_millis(ms);
    }
    if remote.is_some() {
        config.remote_url = remote;
    }

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to start runtime: {}", e);
            return 3;
        }
    };
    runtime.block_on(play(algorithm, input, config))
}

async fn play(algorithm: AlgorithmId, input: Input, config: PlaybackConfig) -> i32 {
    let loader = match &config.remote_url {
        Some(url) => match RemoteClient::new(url.clone(), config.remote_timeout) {
            Ok(client) => TraceLoader::with_remote(client),
            Err(e) => {
                eprintln!("Error: invalid remote: {}", e);
                return 1;
            }
        },
        None => TraceLoader::local(),
    };

    let loaded = match loader.load(algorithm, &input).await {
        Ok(loaded) => loaded,
        Err(LoadError::Invalid(e)) => {
            eprintln!("Invalid input: {}", e);
            return 2;
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    tracing::info!(%algorithm, origin = ?loaded.origin, steps = loaded.trace.len(), "trace loaded");

    let trace = Arc::new(loaded.trace);
    let session = match PlaybackSession::spawn(Arc::clone(&trace), config.default_speed) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let mut frames = session.frames();
    print_step(0, trace.len(), session.current_step());
    if let Err(e) = session.play().await {
        eprintln!("Error: {}", e);
        return 1;
    }
    if session.state().status == Status::Completed {
        return 0;
    }

    loop {
        match frames.recv().await {
            Ok(frame) => {
                if let Some(step) = trace.get(frame.position) {
                    print_step(frame.position, trace.len(), step);
                }
                if frame.status == Status::Completed {
                    break;
                }
            }
            Err(RecvError::Lagged(missed)) => {
                tracing::warn!(missed, "terminal fell behind playback");
            }
            Err(RecvError::Closed) => break,
        }
    }
    session.shutdown();
    0
}

fn print_step(position: usize, total: usize, step: &Step) {
    println!("[{:>3}/{}] {:<13} {}", position + 1, total, step.kind, step.description);
}

/// Parses the algorithm name and loads or generates its input. On failure
/// the error is printed and the exit code returned.
fn resolve(args: &InputArgs) -> Result<(AlgorithmId, Input), i32> {
    let algorithm: AlgorithmId = args.algorithm.parse().map_err(|e| {
        eprintln!("Error: {}", e);
        1
    })?;

    if let Some(len) = args.random {
        return random_input(algorithm, len, args.seed).map(|input| (algorithm, input));
    }

    let Some(path) = &args.input else {
        eprintln!("Error: one of --input or --random is required");
        return Err(1);
    };
    let raw = match path.as_str() {
        "-" => std::io::read_to_string(std::io::stdin()),
        file => fs::read_to_string(file),
    }
    .map_err(|e| {
        eprintln!("Error: failed to read '{}': {}", path, e);
        3
    })?;

    let input: Input = serde_json::from_str(&raw).map_err(|e| {
        eprintln!("Invalid input: {}", e);
        2
    })?;
    Ok((algorithm, input))
}

/// Random arrays for sorting, and sorted arrays with a present target for
/// searching.
fn random_input(algorithm: AlgorithmId, len: usize, seed: u64) -> Result<Input, i32> {
    let mut values = random_array(seed, len, RANDOM_MIN, RANDOM_MAX);
    match algoviz_trace::registry::expected_input(algorithm) {
        InputKind::Array => Ok(Input::Array { values }),
        InputKind::Search => {
            values.sort_unstable();
            let target = values.get(len / 2).copied().unwrap_or(RANDOM_MIN);
            Ok(Input::Search { values, target })
        }
        other => {
            eprintln!("Error: --random only supports array and search inputs, {} expects {}", algorithm, other);
            Err(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_search_input_is_sorted_and_contains_target() {
        let Input::Search { values, target } = random_input(AlgorithmId::BinarySearch, 9, 3).unwrap() else {
            panic!("expected search input");
        };
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
        assert!(values.contains(&target));
        assert!(algoviz_trace::validate(AlgorithmId::BinarySearch, &Input::Search { values, target }).is_ok());
    }

    #[test]
    fn random_arrays_suit_the_distribution_sorts() {
        for algorithm in [AlgorithmId::CountingSort, AlgorithmId::RadixSort] {
            let input = random_input(algorithm, 12, 9).unwrap();
            assert!(algoviz_trace::validate(algorithm, &input).is_ok(), "{}", algorithm);
        }
    }

    #[test]
    fn random_input_rejects_graph_algorithms() {
        assert_eq!(random_input(AlgorithmId::Dijkstra, 5, 0).unwrap_err(), 1);
    }

    #[test]
    fn cli_parses_play_arguments() {
        let cli = Cli::try_parse_from([
            "algoviz", "play", "-a", "heap-sort", "--random", "8", "--seed", "4", "--speed-ms", "50",
        ])
        .unwrap();
        let Commands::Play { input, speed_ms, remote } = cli.command else {
            panic!("expected play");
        };
        assert_eq!(input.random, Some(8));
        assert_eq!(input.seed, 4);
        assert_eq!(speed_ms, Some(50));
        assert_eq!(remote, None);
    }
}
