//! Params command implementation.

use super::{CliError, load_params};
use std::path::PathBuf;

/// Execute the params command.
///
/// # Errors
///
/// Returns an error if the parameter file cannot be loaded.
pub(crate) fn execute(params: Option<PathBuf>, size: usize) -> Result<(), CliError> {
    let params = load_params(params.as_deref())?.clamped(size);
    println!("{}", serde_json::to_string_pretty(&params)?);
    Ok(())
}
