//! Static game configuration and the raw per-turn observation.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::spatial::Cell;

/// Largest supported board edge. Distances are stored as `u8`.
pub const MAX_BOARD_SIZE: usize = 64;

/// Static configuration for one game, as sent by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameConfig {
    /// Board edge length N (board is N×N).
    pub size: usize,
    /// Total resource seeded on the board at game start.
    pub starting_halite: f64,
    /// Treasury cost of spawning a unit.
    pub spawn_cost: f64,
    /// Cost of converting a unit into a base.
    pub convert_cost: f64,
    /// Total number of turns in the game.
    pub episode_steps: u32,
    /// Fraction of a cell's resource collected per turn spent mining it.
    pub collect_rate: f64,
    /// Fractional per-turn regrowth of unmined cells.
    pub regen_rate: f64,
    /// Regrowth cap per cell.
    pub max_cell_halite: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            size: 21,
            starting_halite: 24_000.0,
            spawn_cost: 500.0,
            convert_cost: 500.0,
            episode_steps: 400,
            collect_rate: 0.25,
            regen_rate: 0.02,
            max_cell_halite: 500.0,
        }
    }
}

impl GameConfig {
    /// Check the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error for a board size outside `1..=MAX_BOARD_SIZE`, a
    /// zero-length game, or a negative or non-finite cost or rate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.size == 0 || self.size > MAX_BOARD_SIZE {
            return Err(ConfigError::BoardSize(self.size));
        }
        if self.episode_steps == 0 {
            return Err(ConfigError::NoTurns);
        }
        let checks = [
            ("startingHalite", self.starting_halite),
            ("spawnCost", self.spawn_cost),
            ("convertCost", self.convert_cost),
            ("collectRate", self.collect_rate),
            ("regenRate", self.regen_rate),
            ("maxCellHalite", self.max_cell_halite),
        ];
        for (name, value) in checks {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidValue { name, value });
            }
        }
        if self.collect_rate > 1.0 {
            return Err(ConfigError::InvalidValue {
                name: "collectRate",
                value: self.collect_rate,
            });
        }
        Ok(())
    }

    /// Number of cells on the board.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.size * self.size
    }

    /// Read a (possibly partial) host configuration from a JSON file.
    ///
    /// Missing fields keep their defaults. The result is not validated;
    /// [`Engine::new`](crate::Engine::new) does that.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// One player's part of an observation: `[treasury, bases, units]`.
///
/// Bases map id → cell; units map id → `[cell, cargo]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerObservation(
    pub f64,
    pub BTreeMap<String, Cell>,
    pub BTreeMap<String, (Cell, f64)>,
);

impl PlayerObservation {
    /// A player with the given treasury and nothing on the board.
    #[must_use]
    pub fn new(treasury: f64) -> Self {
        Self(treasury, BTreeMap::new(), BTreeMap::new())
    }

    /// Add a base.
    #[must_use]
    pub fn with_base(mut self, id: impl Into<String>, cell: Cell) -> Self {
        self.1.insert(id.into(), cell);
        self
    }

    /// Add a unit.
    #[must_use]
    pub fn with_unit(mut self, id: impl Into<String>, cell: Cell, cargo: f64) -> Self {
        self.2.insert(id.into(), (cell, cargo));
        self
    }

    /// Treasury.
    #[must_use]
    pub const fn treasury(&self) -> f64 {
        self.0
    }

    /// Bases by id.
    #[must_use]
    pub const fn bases(&self) -> &BTreeMap<String, Cell> {
        &self.1
    }

    /// Units by id.
    #[must_use]
    pub const fn units(&self) -> &BTreeMap<String, (Cell, f64)> {
        &self.2
    }
}

/// Raw observation delivered by the host once per turn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Index of the player this engine controls.
    pub player: usize,
    /// Zero-based turn index.
    pub step: u32,
    /// Resource amount per cell, row-major.
    pub halite: Vec<f64>,
    /// Every player's treasury, bases and units.
    pub players: Vec<PlayerObservation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
        assert_eq!(GameConfig::default().cell_count(), 441);
    }

    #[test]
    fn test_rejects_bad_config() {
        let config = GameConfig {
            size: 0,
            ..GameConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::BoardSize(0))));

        let config = GameConfig {
            spawn_cost: f64::NAN,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue {
                name: "spawnCost",
                ..
            })
        ));

        let config = GameConfig {
            episode_steps: 0,
            ..GameConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::NoTurns)));
    }

    #[test]
    fn test_observation_json() {
        let json = r#"{
            "player": 0,
            "step": 3,
            "halite": [0, 10.5, 0, 0],
            "players": [[5000, {"0-1": 0}, {"1-1": [1, 12]}], [4000, {}, {}]]
        }"#;
        let obs: Observation = serde_json::from_str(json).unwrap();
        assert_eq!(obs.step, 3);
        assert_eq!(obs.players.len(), 2);
        assert_eq!(obs.players[0].bases()["0-1"], 0);
        assert_eq!(obs.players[0].units()["1-1"], (1, 12.0));
    }

    #[test]
    fn test_config_json_camel_case_partial() {
        let config: GameConfig = serde_json::from_str(r#"{"size": 11, "episodeSteps": 50}"#).unwrap();
        assert_eq!(config.size, 11);
        assert_eq!(config.episode_steps, 50);
        assert!((config.spawn_cost - 500.0).abs() < f64::EPSILON);
    }
}
