//! File-backed loading of parameters, configurations and recordings.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::fs;

use harvester::replay::{Recording, ReplayError, replay_batch, replay_recording};
use harvester::{ConfigError, GameConfig, Observation, Params, PlayerObservation};
use tempfile::TempDir;

fn recording(turns: u32) -> Recording {
    let config = GameConfig {
        size: 9,
        ..GameConfig::default()
    };
    let mut halite = vec![30.0; 81];
    halite[10] = 300.0;
    let observations = (0..turns)
        .map(|step| Observation {
            player: 1,
            step,
            halite: halite.clone(),
            players: vec![
                PlayerObservation::new(2000.0).with_unit("x", 0, 0.0),
                PlayerObservation::new(2000.0)
                    .with_base("home", 40)
                    .with_unit("a", 31, 0.0)
                    .with_unit("b", 49, 120.0),
            ],
        })
        .collect();
    Recording {
        config,
        player: 1,
        observations,
    }
}

#[test]
fn test_partial_params_file_keeps_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("params.json");
    fs::write(&path, r#"{"return_cargo": 250.0, "max_units": 12}"#).unwrap();

    let params = Params::load(&path).unwrap();
    let defaults = Params::default();
    assert!((params.return_cargo - 250.0).abs() < 1e-9);
    assert_eq!(params.max_units, 12);
    assert_eq!(params.return_slots, defaults.return_slots);
}

#[test]
fn test_bad_params_file_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ not json").unwrap();

    let err = Params::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("broken.json"));

    let missing = Params::load(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(missing, ConfigError::Read { .. }));
}

#[test]
fn test_host_config_file_uses_camel_case() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{"size": 15, "spawnCost": 400}"#).unwrap();

    let config = GameConfig::load(&path).unwrap();
    assert_eq!(config.size, 15);
    assert!((config.spawn_cost - 400.0).abs() < 1e-9);
    assert_eq!(config.episode_steps, GameConfig::default().episode_steps);
}

#[test]
fn test_recording_survives_save_and_replay() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("game.json");
    let original = recording(5);
    original.save(&path).unwrap();

    let loaded = Recording::load(&path).unwrap();
    assert_eq!(loaded, original);

    let params = Params::default();
    let first = replay_recording(&loaded, &params).unwrap();
    let second = replay_recording(&original, &params).unwrap();
    assert_eq!(first.turns, 5);
    assert_eq!(first.roles, second.roles);
    assert_eq!(first.spawns, second.spawns);
}

#[test]
fn test_batch_replays_each_file_independently() {
    let dir = TempDir::new().unwrap();
    let paths: Vec<_> = (0..3)
        .map(|i| {
            let path = dir.path().join(format!("game{i}.json"));
            recording(i + 1).save(&path).unwrap();
            path
        })
        .collect();
    let recordings: Vec<Recording> = paths.iter().map(|p| Recording::load(p).unwrap()).collect();

    let results = replay_batch(&recordings, &Params::default());
    let turns: Vec<usize> = results.iter().map(|r| r.as_ref().unwrap().turns).collect();
    assert_eq!(turns, vec![1, 2, 3]);
}

#[test]
fn test_unreadable_recording_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("game.json");
    fs::write(&path, r#"{"observations": 3}"#).unwrap();
    assert!(matches!(
        Recording::load(&path),
        Err(ReplayError::Parse { .. })
    ));
}
