// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Harvester: a per-turn decision engine for toroidal resource-collection games.
//!
//! Each turn the engine reads a board snapshot and returns one action per
//! own unit and base, within a fixed time budget. The pipeline is reactive
//! (no lookahead) and fully deterministic for identical inputs.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │        Turn Orchestrator            │  engine
//! ├─────────────────────────────────────┤
//! │  Role State Machine │ Assignment    │  roles, assign
//! ├─────────────────────────────────────┤
//! │        Task Scorers                 │  scoring, dwell
//! ├─────────────────────────────────────┤
//! │        Influence Maps               │  influence
//! ├─────────────────────────────────────┤
//! │        Spatial Index                │  spatial (built once per game)
//! └─────────────────────────────────────┘
//! ```

pub mod assign;
pub mod dwell;
pub mod engine;
pub mod error;
pub mod game;
pub mod influence;
pub mod params;
pub mod replay;
pub mod roles;
pub mod scoring;
pub mod spatial;

pub use engine::{ConstructionPlan, Engine, Target, TurnReport};
pub use error::{ConfigError, EngineError};
pub use params::Params;

// Re-export key game types at crate root for convenience
pub use game::{
    Actions, Base, BaseAction, Board, GameConfig, Observation, PlayerId, PlayerObservation, Unit,
    UnitAction,
};
pub use roles::Role;
pub use spatial::{Cell, Direction, SpatialIndex};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_round_trip_through_host_json() {
        let config: GameConfig = serde_json::from_str(r#"{"size": 5}"#).unwrap();
        let mut engine = Engine::new(config, Params::default()).unwrap();
        let obs: Observation = serde_json::from_str(
            r#"{"player": 0, "step": 1, "halite": [],
                "players": [[0, {"b": 12}, {"u": [12, 0]}]]}"#,
        )
        .unwrap();
        let actions = engine.act(&obs);
        assert_eq!(actions.units.len(), 1);
        assert_eq!(actions.bases.len(), 1);
        let host = serde_json::to_string(&actions.to_host()).unwrap();
        assert!(host.starts_with('{'));
    }
}
