//! Per-turn unit roles.
//!
//! Every own unit gets exactly one [`Role`] at the start of the turn via
//! [`classify`], evaluated in a fixed precedence:
//!
//! 1. Units carrying out a persisted construction plan keep that duty
//!    (`Constructing` for the builder, `ConstructionGuarding` for its escort).
//! 2. Loaded units without time to mine and get home become `Ending`.
//! 3. Units above the return threshold become `Returning`.
//! 4. Everything else defaults to `Mining`.
//!
//! Later phases of the turn may reclassify `Mining` units into guarding,
//! defending, hunting or converting, always by replacing the single entry
//! in the [`RoleMap`].

use std::collections::BTreeMap;

use serde::Serialize;

use crate::params::Params;

/// Behaviour of a unit for the current turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Role {
    /// Collect resource from an assigned cell.
    Mining,
    /// Deliver cargo to a base.
    Returning,
    /// Chase a heavier enemy unit.
    Hunting,
    /// Move to a threatened base.
    ShipyardGuarding,
    /// Hold a contested border cell.
    BorderGuarding,
    /// Sit on a threatened base.
    Defending,
    /// Convert into a base this turn.
    Converting,
    /// Travel to a planned base site.
    Constructing,
    /// Escort the builder.
    ConstructionGuarding,
    /// Final deposit before the game ends.
    Ending,
}

impl Role {
    /// Every role, in declaration order.
    pub const ALL: [Role; 10] = [
        Role::Mining,
        Role::Returning,
        Role::Hunting,
        Role::ShipyardGuarding,
        Role::BorderGuarding,
        Role::Defending,
        Role::Converting,
        Role::Constructing,
        Role::ConstructionGuarding,
        Role::Ending,
    ];

    /// Short lowercase name for logs and reports.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Role::Mining => "mining",
            Role::Returning => "returning",
            Role::Hunting => "hunting",
            Role::ShipyardGuarding => "shipyard_guarding",
            Role::BorderGuarding => "border_guarding",
            Role::Defending => "defending",
            Role::Converting => "converting",
            Role::Constructing => "constructing",
            Role::ConstructionGuarding => "construction_guarding",
            Role::Ending => "ending",
        }
    }
}

/// Unit id → role for the current turn.
pub type RoleMap = BTreeMap<String, Role>;

/// Part a unit plays in the persisted construction plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstructionDuty {
    /// Travels to the site and converts.
    Builder,
    /// Accompanies the builder.
    Escort,
}

/// Facts about one unit that the classifier needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoleInput {
    /// Cargo carried.
    pub cargo: f64,
    /// Turns left in the game.
    pub turns_remaining: usize,
    /// Distance to the nearest own base, `None` without bases.
    pub base_distance: Option<usize>,
    /// Construction duty carried over from earlier turns.
    pub construction: Option<ConstructionDuty>,
}

/// Base role by precedence.
#[must_use]
pub fn classify(input: &RoleInput, params: &Params) -> Role {
    if let Some(duty) = input.construction {
        return match duty {
            ConstructionDuty::Builder => Role::Constructing,
            ConstructionDuty::Escort => Role::ConstructionGuarding,
        };
    }

    let trip = input.base_distance.unwrap_or(params.no_base_distance);
    if input.cargo > params.ending_min_cargo
        && input.turns_remaining <= trip + params.end_game_buffer
    {
        return Role::Ending;
    }

    if input.base_distance.is_some() && input.cargo > params.return_cargo {
        return Role::Returning;
    }

    Role::Mining
}

/// Classify a whole fleet; every id appears exactly once in the result.
pub fn classify_fleet<'a>(
    units: impl IntoIterator<Item = (&'a str, RoleInput)>,
    params: &Params,
) -> RoleMap {
    units
        .into_iter()
        .map(|(id, input)| (id.to_string(), classify(&input, params)))
        .collect()
}

/// Number of units per role, in [`Role::ALL`] order, skipping empty roles.
#[must_use]
pub fn role_counts(roles: &RoleMap) -> Vec<(Role, usize)> {
    Role::ALL
        .into_iter()
        .map(|role| (role, roles.values().filter(|&&r| r == role).count()))
        .filter(|&(_, n)| n > 0)
        .collect()
}
