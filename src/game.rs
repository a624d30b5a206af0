//! Host-facing game model.
//!
//! Everything the host hands the engine each turn, and everything the engine
//! hands back:
//! - Static game configuration (board size, costs, rates)
//! - Per-turn observation and the normalised [`Board`] snapshot built from it
//! - Unit and base actions in the host's vocabulary

mod action;
mod board;
mod config;

pub use action::{Actions, BaseAction, UnitAction};
pub use board::{Base, Board, PlayerId, Unit};
pub use config::{GameConfig, Observation, PlayerObservation, MAX_BOARD_SIZE};
