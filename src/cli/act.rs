//! Act command implementation.

use super::{CliError, load_config, load_params};
use harvester::{Engine, Observation};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{info, warn};

/// Execute the act command.
///
/// Reads one JSON observation per line from stdin and answers each with
/// one line of host actions. A line that does not decode is answered with
/// an empty action map so the host never waits on us.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or stdio fails.
pub(crate) fn execute(config: Option<PathBuf>, params: Option<PathBuf>) -> Result<(), CliError> {
    let config = load_config(config.as_deref())?;
    let params = load_params(params.as_deref())?;
    let mut engine = Engine::new(config, params)?;
    info!(size = config.size, "ready");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let reply = match serde_json::from_str::<Observation>(&line) {
            Ok(obs) => serde_json::to_string(&engine.act(&obs).to_host())?,
            Err(e) => {
                warn!(error = %e, "undecodable observation, sending no actions");
                "{}".to_string()
            }
        };
        writeln!(out, "{reply}")?;
        out.flush()?;
    }
    Ok(())
}
