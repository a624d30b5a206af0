//! Output formatting utilities for CLI.

use harvester::replay::{ReplayError, ReplaySummary};
use serde::Serialize;

/// JSON-serializable replay outcome for one recording.
#[derive(Debug, Serialize)]
pub(super) struct JsonReplayResult<'a> {
    /// Recording file name.
    pub(super) recording: &'a str,
    /// Summary, if the replay succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) summary: Option<&'a ReplaySummary>,
    /// Error message, if it failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) error: Option<String>,
}

impl<'a> JsonReplayResult<'a> {
    /// Create from a replay result.
    pub(super) fn from_result(
        recording: &'a str,
        result: &'a Result<ReplaySummary, ReplayError>,
    ) -> Self {
        match result {
            Ok(summary) => Self {
                recording,
                summary: Some(summary),
                error: None,
            },
            Err(e) => Self {
                recording,
                summary: None,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Format replay results as human-readable text.
pub(super) fn format_replay_text(
    results: &[Result<ReplaySummary, ReplayError>],
    names: &[String],
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Replay Results ({} recordings)\n", results.len()));
    output.push_str("========================================\n");

    for (name, result) in names.iter().zip(results) {
        output.push_str(&format!("\n{name}:\n"));
        match result {
            Ok(summary) => {
                output.push_str(&format!(
                    "  Turns: {}  Spawns: {}  Converts: {}\n",
                    summary.turns, summary.spawns, summary.converts
                ));
                output.push_str(&format!(
                    "  Turn time: {:.0}us mean, {}us max\n",
                    summary.mean_turn_us(),
                    summary.max_turn_us
                ));
                output.push_str("  Unit-turns by role:\n");
                for (role, count) in &summary.roles {
                    output.push_str(&format!("    {role:<18} {count}\n"));
                }
            }
            Err(e) => output.push_str(&format!("  Error: {e}\n")),
        }
    }

    output
}
