//! Replay command implementation.

use super::output::{JsonReplayResult, format_replay_text};
use super::{CliError, ReplayFormat, load_params};
use harvester::replay::{Recording, replay_batch};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;

/// Execute the replay command.
///
/// # Errors
///
/// Returns an error if a recording or the parameter file cannot be loaded.
/// A recording that loads but fails to replay is reported in the output.
pub(crate) fn execute(
    recordings: Vec<PathBuf>,
    params: Option<PathBuf>,
    threads: Option<usize>,
    format: ReplayFormat,
    progress: bool,
) -> Result<(), CliError> {
    let params = load_params(params.as_deref())?;

    let mut loaded = Vec::with_capacity(recordings.len());
    let mut names = Vec::with_capacity(recordings.len());
    for path in &recordings {
        loaded.push(Recording::load(path)?);
        names.push(
            path.file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        );
    }

    // Set thread pool size if specified
    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let pb = if progress {
        let pb = ProgressBar::new(loaded.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} recordings ({per_sec})")
                .map_err(|e| CliError::new(format!("Invalid progress template: {e}")))?
                .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();
    let results = replay_batch(&loaded, &params);

    if let Some(pb) = pb {
        pb.set_position(results.len() as u64);
        pb.finish_with_message("done");
    }
    let duration = start.elapsed();

    match format {
        ReplayFormat::Text => {
            print!("{}", format_replay_text(&results, &names));
            println!();
            println!("Duration: {:.2}s", duration.as_secs_f64());
        }
        ReplayFormat::Json => {
            let json_results: Vec<_> = names
                .iter()
                .zip(&results)
                .map(|(name, result)| JsonReplayResult::from_result(name, result))
                .collect();
            let json = serde_json::to_string_pretty(&json_results)
                .map_err(|e| CliError::new(format!("JSON serialization failed: {e}")))?;
            println!("{json}");
        }
    }

    Ok(())
}
