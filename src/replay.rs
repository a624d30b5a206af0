//! Replay of recorded episodes.
//!
//! A [`Recording`] is the game configuration plus the observations one
//! player received, in turn order. Because the engine is deterministic,
//! feeding them back through a fresh [`Engine`] reproduces every decision,
//! which makes recordings useful both for regression checks and for timing
//! the per-turn pipeline on real boards.
//!
//! [`replay_batch`] replays many recordings in parallel; each worker owns
//! its own engine and nothing mutable is shared between them.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::Engine;
use crate::error::EngineError;
use crate::game::{GameConfig, Observation, PlayerId};
use crate::params::Params;

/// Failure loading, saving or replaying a recording.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// Recording file could not be read or written.
    #[error("{path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// Recording is not valid JSON.
    #[error("{path}: invalid recording: {source}")]
    Parse {
        /// File that failed.
        path: PathBuf,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },
    /// Engine could not be built for the recorded configuration.
    #[error(transparent)]
    Engine(#[from] EngineError),
    /// Recording holds no observations.
    #[error("recording has no turns")]
    Empty,
}

/// Observations one player received during a game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    /// Static game configuration.
    #[serde(default)]
    pub config: GameConfig,
    /// Player the engine controls; overrides the per-observation field.
    #[serde(default)]
    pub player: PlayerId,
    /// One observation per turn.
    pub observations: Vec<Observation>,
}

impl Recording {
    /// Read a recording from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded.
    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let text = fs::read_to_string(path).map_err(|source| ReplayError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ReplayError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the recording as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ReplayError> {
        let json = serde_json::to_string(self).map_err(|e| ReplayError::Io {
            path: path.to_path_buf(),
            source: io::Error::from(e),
        })?;
        fs::write(path, json).map_err(|source| ReplayError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Outcome of one replayed turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TurnSummary {
    /// Turn index.
    pub step: u32,
    /// Host commands emitted (stays and idles excluded).
    pub commands: usize,
    /// Spawn orders.
    pub spawns: usize,
    /// Conversion orders.
    pub converts: usize,
    /// Time spent deciding, in microseconds.
    pub elapsed_us: u64,
}

/// Aggregate outcome of a replayed recording.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplaySummary {
    /// Turns replayed.
    pub turns: usize,
    /// Total spawn orders.
    pub spawns: usize,
    /// Total conversion orders.
    pub converts: usize,
    /// Unit-turns spent in each role, by role name.
    pub roles: BTreeMap<String, usize>,
    /// Total decision time in microseconds.
    pub total_us: u64,
    /// Slowest turn in microseconds.
    pub max_turn_us: u64,
    /// Per-turn detail.
    pub per_turn: Vec<TurnSummary>,
}

impl ReplaySummary {
    /// Mean decision time per turn in microseconds.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_turn_us(&self) -> f64 {
        if self.turns == 0 {
            0.0
        } else {
            self.total_us as f64 / self.turns as f64
        }
    }
}

fn micros(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX)
}

/// Feed every observation of `recording` through a fresh engine.
///
/// # Errors
///
/// Returns an error if the recorded configuration is invalid or the
/// recording is empty.
pub fn replay_recording(recording: &Recording, params: &Params) -> Result<ReplaySummary, ReplayError> {
    if recording.observations.is_empty() {
        return Err(ReplayError::Empty);
    }
    let mut engine = Engine::new(recording.config, *params)?;
    let mut summary = ReplaySummary::default();

    for obs in &recording.observations {
        let actions = if obs.player == recording.player {
            engine.act(obs)
        } else {
            let mut obs = obs.clone();
            obs.player = recording.player;
            engine.act(&obs)
        };
        let report = engine.last_turn();
        let elapsed_us = micros(report.elapsed);

        for role in report.roles.values() {
            *summary.roles.entry(role.name().to_string()).or_default() += 1;
        }
        summary.turns += 1;
        summary.spawns += actions.spawn_count();
        summary.converts += actions.convert_count();
        summary.total_us = summary.total_us.saturating_add(elapsed_us);
        summary.max_turn_us = summary.max_turn_us.max(elapsed_us);
        summary.per_turn.push(TurnSummary {
            step: report.step,
            commands: actions.to_host().len(),
            spawns: actions.spawn_count(),
            converts: actions.convert_count(),
            elapsed_us,
        });
    }
    Ok(summary)
}

/// Replay many recordings in parallel, one independent engine each.
///
/// Results are returned in input order.
#[must_use]
pub fn replay_batch(
    recordings: &[Recording],
    params: &Params,
) -> Vec<Result<ReplaySummary, ReplayError>> {
    recordings
        .par_iter()
        .map(|recording| replay_recording(recording, params))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::PlayerObservation;

    fn recording(turns: u32) -> Recording {
        let config = GameConfig {
            size: 9,
            ..GameConfig::default()
        };
        let observations = (0..turns)
            .map(|step| Observation {
                player: 0,
                step,
                halite: vec![60.0; 81],
                players: vec![
                    PlayerObservation::new(1000.0)
                        .with_base("home", 40)
                        .with_unit("a", 30, 0.0),
                    PlayerObservation::new(1000.0).with_unit("x", 0, 0.0),
                ],
            })
            .collect();
        Recording {
            config,
            player: 0,
            observations,
        }
    }

    #[test]
    fn test_replay_counts_turns_and_roles() {
        let summary = replay_recording(&recording(3), &Params::default()).unwrap();
        assert_eq!(summary.turns, 3);
        assert_eq!(summary.per_turn.len(), 3);
        assert_eq!(summary.roles.values().sum::<usize>(), 3);
        assert!(summary.max_turn_us <= summary.total_us);
    }

    #[test]
    fn test_replay_is_deterministic() {
        let params = Params::default();
        let a = replay_recording(&recording(4), &params).unwrap();
        let b = replay_recording(&recording(4), &params).unwrap();
        let strip = |s: &ReplaySummary| {
            s.per_turn
                .iter()
                .map(|t| (t.step, t.commands, t.spawns, t.converts))
                .collect::<Vec<_>>()
        };
        assert_eq!(strip(&a), strip(&b));
        assert_eq!(a.roles, b.roles);
    }

    #[test]
    fn test_empty_recording_is_rejected() {
        assert!(matches!(
            replay_recording(&recording(0), &Params::default()),
            Err(ReplayError::Empty)
        ));
    }

    #[test]
    fn test_batch_keeps_order_and_isolates_errors() {
        let mut bad = recording(2);
        bad.config.size = 0;
        let results = replay_batch(&[recording(2), bad, recording(1)], &Params::default());
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().map(|s| s.turns).ok(), Some(2));
        assert!(matches!(results[1], Err(ReplayError::Engine(_))));
        assert_eq!(results[2].as_ref().map(|s| s.turns).ok(), Some(1));
    }
}
