//! Dwell command implementation.

use super::{CliError, load_config};
use harvester::dwell::DwellTable;
use harvester::spatial::SpatialIndex;
use std::path::PathBuf;

/// Execute the dwell command.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or is invalid.
pub(crate) fn execute(config: Option<PathBuf>) -> Result<(), CliError> {
    let config = load_config(config.as_deref())?;
    config.validate()?;
    let max_distance = SpatialIndex::new(config.size).max_distance();
    let table = DwellTable::generate(max_distance, config.collect_rate, config.regen_rate);
    println!("{}", serde_json::to_string_pretty(&table)?);
    Ok(())
}
