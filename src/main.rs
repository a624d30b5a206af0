//! Harvester CLI - play turns from a host pipe and inspect the engine.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Harvester - a per-turn decision engine for toroidal resource games
#[derive(Parser, Debug)]
#[command(name = "harvester")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play: read one observation per line on stdin, write actions on stdout
    Act {
        /// Host game configuration (JSON, default: standard game)
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,

        /// Parameter overrides (JSON, partial)
        #[arg(short, long)]
        params: Option<std::path::PathBuf>,
    },

    /// Replay recorded episodes and report decisions and timing
    Replay {
        /// Recording files (JSON)
        #[arg(required = true)]
        recordings: Vec<std::path::PathBuf>,

        /// Parameter overrides (JSON, partial)
        #[arg(short, long)]
        params: Option<std::path::PathBuf>,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::ReplayFormat,

        /// Show progress bar
        #[arg(long)]
        progress: bool,
    },

    /// Print the effective parameter table as JSON
    Params {
        /// Parameter overrides (JSON, partial)
        #[arg(short, long)]
        params: Option<std::path::PathBuf>,

        /// Board size to clamp radii against (default: 21)
        #[arg(short, long, default_value = "21")]
        size: usize,
    },

    /// Print the optimal-dwell table as JSON
    Dwell {
        /// Host game configuration (JSON, default: standard game)
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,
    },
}

/// Send logs to stderr so stdout only ever carries host messages.
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let result = match args.command {
        Commands::Act { config, params } => cli::act::execute(config, params),

        Commands::Replay {
            recordings,
            params,
            threads,
            format,
            progress,
        } => cli::replay::execute(recordings, params, threads, format, progress),

        Commands::Params { params, size } => cli::params::execute(params, size),

        Commands::Dwell { config } => cli::dwell::execute(config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
