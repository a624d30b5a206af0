//! Typed tuning parameters.
//!
//! Every threshold, weight, radius and decay rate used by scoring and role
//! classification lives here. The table is loaded once per game (a partial
//! JSON file overrides only the fields it names), clamped to valid ranges,
//! and then never mutated.

// Radii are small board distances; the float/usize casts are exact
#![allow(clippy::cast_precision_loss, clippy::struct_field_names)]

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;

/// Flat parameter table driving every heuristic decision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    // --- Role thresholds ---
    /// Cargo above which a unit heads home.
    pub return_cargo: f64,
    /// Slack turns kept in hand when deciding the end-game return.
    pub end_game_buffer: usize,
    /// Cargo above which a unit joins the end-game return.
    pub ending_min_cargo: f64,
    /// Distance assumed to a base when none exists.
    pub no_base_distance: usize,

    // --- Influence maps ---
    /// Accumulation radius of the tactical dominance field.
    pub small_radius: usize,
    /// Blur sigma of the tactical dominance field.
    pub small_sigma: f64,
    /// Accumulation radius of the territorial dominance field.
    pub medium_radius: usize,
    /// Blur sigma of the territorial dominance field.
    pub medium_sigma: f64,
    /// Blur sigma of the long-range resource density field.
    pub ultra_sigma: f64,
    /// Blur sigma of the resource field blended into mining value.
    pub resource_sigma: f64,
    /// Blur sigma of the enemy cargo density field.
    pub cargo_sigma: f64,
    /// Own unit contribution to dominance.
    pub dominance_unit_weight: f64,
    /// Own base contribution to dominance.
    pub dominance_base_weight: f64,
    /// Opposing unit contribution (subtracted).
    pub dominance_enemy_unit_weight: f64,
    /// Opposing base contribution (subtracted).
    pub dominance_enemy_base_weight: f64,
    /// Cargo at which a unit's dominance contribution bottoms out.
    pub dominance_cargo_cap: f64,

    // --- Mining ---
    /// Share of blurred value in the mining cell value (0 = raw only).
    pub mining_blur_blend: f64,
    /// Per-step decay applied to a cell's value over the travel distance.
    pub mining_distance_decay: f64,
    /// How strongly negative tactical dominance discounts a mining cell.
    pub mining_safety_weight: f64,
    /// Minimum cell value to be a mining candidate.
    pub min_mining_halite: f64,
    /// Number of candidate cells offered to the mining assignment.
    pub mining_candidates: usize,
    /// Radius around own bases treated as the farming zone.
    pub farming_radius: usize,
    /// Farming-zone cells below this value count as farmed out.
    pub farmed_out_threshold: f64,
    /// Fractional score cut for farmed-out cells.
    pub farmed_out_penalty: f64,
    /// Scale of the return-to-base pseudo-column score.
    pub return_weight: f64,
    /// Minimum return pseudo-columns per base; raised to the number of
    /// assignable units so no returner is left without a slot.
    pub return_slots: usize,

    // --- Hunting ---
    /// Hunters may carry at most this much cargo.
    pub hunter_max_cargo: f64,
    /// Prey must carry at least this much cargo.
    pub prey_min_cargo: f64,
    /// Maximum share of the fleet promoted to hunting.
    pub hunter_fraction: f64,
    /// Maximum hunter-to-prey distance.
    pub hunt_max_distance: usize,
    /// No hunting when fewer turns remain.
    pub hunt_min_turns_remaining: usize,
    /// Scale of the cargo differential.
    pub hunt_weight: f64,
    /// Geometric decay per extra step of distance.
    pub hunt_distance_decay: f64,
    /// Boost per unit of own dominance at the prey.
    pub hunt_dominance_weight: f64,
    /// Boost for striking a cornered prey.
    pub hunt_cornered_bonus: f64,
    /// Boost for striking a pinned prey.
    pub hunt_pinned_bonus: f64,
    /// Boost for approaching from the prey's only escape side.
    pub hunt_escape_bonus: f64,
    /// Boost for prey inside own territory.
    pub hunt_territory_bonus: f64,
    /// Boost per unit of blurred enemy cargo around the prey.
    pub hunt_cargo_density_weight: f64,

    // --- Guarding ---
    /// Guards may carry at most this much cargo.
    pub guard_max_cargo: f64,
    /// Enemy distance at which a base counts as threatened.
    pub base_threat_distance: usize,
    /// Border cells to hold.
    pub border_guards: usize,
    /// Minimum fleet size before border guards are posted.
    pub border_guard_min_fleet: usize,
    /// Scale of the border guard score.
    pub guard_border_weight: f64,
    /// Geometric decay per step to the border cell.
    pub guard_distance_decay: f64,
    /// Boost per unit of negative dominance at the border cell.
    pub guard_dominance_weight: f64,

    // --- Directional bias ---
    /// Bias toward a mining target.
    pub mine_move_weight: f64,
    /// Bias for staying on the mining target.
    pub mine_stay_weight: f64,
    /// Bias toward the assigned base when returning.
    pub return_move_weight: f64,
    /// Bias along the hunting approach.
    pub hunt_move_weight: f64,
    /// Bias toward a guard post.
    pub guard_move_weight: f64,
    /// Bias toward a construction site.
    pub build_move_weight: f64,
    /// Bias toward the nearest base at game end.
    pub ending_move_weight: f64,
    /// Bias for staying when there is nothing to do.
    pub idle_stay_weight: f64,

    // --- Cell occupancy ---
    /// Penalty for a cell claimed by another own unit.
    pub own_collision_penalty: f64,
    /// Multiplier on (spawn cost + cargo) for risking a losing collision.
    pub enemy_collision_penalty: f64,
    /// Multiplier on enemy cargo for capturing a heavier enemy.
    pub capture_reward: f64,
    /// Cargo above which entering a foreign base is penalised.
    pub foreign_base_max_cargo: f64,
    /// Penalty for entering a foreign base with cargo.
    pub foreign_base_penalty: f64,

    // --- Construction and conversion ---
    /// Maximum own bases.
    pub max_bases: usize,
    /// Units needed per existing base before planning another.
    pub units_per_base: f64,
    /// Closest a new base may be to an existing own base.
    pub min_base_distance: usize,
    /// Farthest a new base may be from an existing own base.
    pub max_base_distance: usize,
    /// No construction when fewer turns remain.
    pub construction_min_turns_remaining: usize,
    /// Site score weight on long-range resource density.
    pub construction_resource_weight: f64,
    /// Site score weight on territorial dominance.
    pub construction_dominance_weight: f64,
    /// Minimum territorial dominance at a site.
    pub construction_min_dominance: f64,
    /// Score of an emergency conversion (worse than most moves).
    pub convert_fallback_score: f64,
    /// Score of a planned conversion.
    pub convert_bias: f64,
    /// Fleet size from which a builder gets an escort.
    pub escort_min_fleet: usize,

    // --- Spawning ---
    /// Maximum own units.
    pub max_units: usize,
    /// No regular spawns when this few turns remain.
    pub spawn_stop_turns_remaining: usize,
    /// Minimum territorial dominance at a base to spawn there.
    pub spawn_min_dominance: f64,
    /// Treasury kept back from spawning.
    pub spawn_reserve: f64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            return_cargo: 400.0,
            end_game_buffer: 3,
            ending_min_cargo: 0.0,
            no_base_distance: 6,

            small_radius: 2,
            small_sigma: 1.0,
            medium_radius: 4,
            medium_sigma: 2.5,
            ultra_sigma: 4.0,
            resource_sigma: 1.5,
            cargo_sigma: 1.5,
            dominance_unit_weight: 1.0,
            dominance_base_weight: 2.5,
            dominance_enemy_unit_weight: 1.0,
            dominance_enemy_base_weight: 2.5,
            dominance_cargo_cap: 500.0,

            mining_blur_blend: 0.3,
            mining_distance_decay: 0.97,
            mining_safety_weight: 0.6,
            min_mining_halite: 20.0,
            mining_candidates: 60,
            farming_radius: 4,
            farmed_out_threshold: 80.0,
            farmed_out_penalty: 0.5,
            return_weight: 1.0,
            return_slots: 3,

            hunter_max_cargo: 20.0,
            prey_min_cargo: 50.0,
            hunter_fraction: 0.35,
            hunt_max_distance: 6,
            hunt_min_turns_remaining: 10,
            hunt_weight: 1.0,
            hunt_distance_decay: 0.6,
            hunt_dominance_weight: 0.5,
            hunt_cornered_bonus: 2.0,
            hunt_pinned_bonus: 1.0,
            hunt_escape_bonus: 0.3,
            hunt_territory_bonus: 0.5,
            hunt_cargo_density_weight: 0.001,

            guard_max_cargo: 50.0,
            base_threat_distance: 3,
            border_guards: 2,
            border_guard_min_fleet: 12,
            guard_border_weight: 10.0,
            guard_distance_decay: 0.8,
            guard_dominance_weight: 0.5,

            mine_move_weight: 100.0,
            mine_stay_weight: 120.0,
            return_move_weight: 150.0,
            hunt_move_weight: 130.0,
            guard_move_weight: 110.0,
            build_move_weight: 140.0,
            ending_move_weight: 300.0,
            idle_stay_weight: 10.0,

            own_collision_penalty: 1.0e6,
            enemy_collision_penalty: 1.0,
            capture_reward: 0.5,
            foreign_base_max_cargo: 0.0,
            foreign_base_penalty: 500.0,

            max_bases: 4,
            units_per_base: 8.0,
            min_base_distance: 5,
            max_base_distance: 9,
            construction_min_turns_remaining: 100,
            construction_resource_weight: 1.0,
            construction_dominance_weight: 20.0,
            construction_min_dominance: -0.5,
            convert_fallback_score: -800.0,
            convert_bias: 1000.0,
            escort_min_fleet: 6,

            max_units: 40,
            spawn_stop_turns_remaining: 80,
            spawn_min_dominance: -2.0,
            spawn_reserve: 0.0,
        }
    }
}

/// Upper bound for weights and amounts; keeps every score finite.
const MAX_MAGNITUDE: f64 = 1.0e7;

impl Params {
    /// Read a (possibly partial) parameter table from a JSON file.
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

    /// Clamp every field into its valid range for a board of edge `size`.
    ///
    /// Out-of-range values are clamped rather than rejected so a turn can
    /// always produce a legal action set; each adjustment is logged.
    #[must_use]
    pub fn clamped(self, size: usize) -> Self {
        let d = Self::default();
        let half = (size / 2).max(1);
        let span = 2 * half;
        let m = MAX_MAGNITUDE;

        Self {
            return_cargo: f("return_cargo", self.return_cargo, 0.0, m, d.return_cargo),
            end_game_buffer: u("end_game_buffer", self.end_game_buffer, 0, 100),
            ending_min_cargo: f("ending_min_cargo", self.ending_min_cargo, 0.0, m, d.ending_min_cargo),
            no_base_distance: u("no_base_distance", self.no_base_distance, 0, span),

            small_radius: u("small_radius", self.small_radius, 0, half),
            small_sigma: f("small_sigma", self.small_sigma, 0.0, half as f64, d.small_sigma),
            medium_radius: u("medium_radius", self.medium_radius, 0, half),
            medium_sigma: f("medium_sigma", self.medium_sigma, 0.0, half as f64, d.medium_sigma),
            ultra_sigma: f("ultra_sigma", self.ultra_sigma, 0.0, half as f64, d.ultra_sigma),
            resource_sigma: f("resource_sigma", self.resource_sigma, 0.0, half as f64, d.resource_sigma),
            cargo_sigma: f("cargo_sigma", self.cargo_sigma, 0.0, half as f64, d.cargo_sigma),
            dominance_unit_weight: f("dominance_unit_weight", self.dominance_unit_weight, 0.0, m, d.dominance_unit_weight),
            dominance_base_weight: f("dominance_base_weight", self.dominance_base_weight, 0.0, m, d.dominance_base_weight),
            dominance_enemy_unit_weight: f("dominance_enemy_unit_weight", self.dominance_enemy_unit_weight, 0.0, m, d.dominance_enemy_unit_weight),
            dominance_enemy_base_weight: f("dominance_enemy_base_weight", self.dominance_enemy_base_weight, 0.0, m, d.dominance_enemy_base_weight),
            dominance_cargo_cap: f("dominance_cargo_cap", self.dominance_cargo_cap, 1.0, m, d.dominance_cargo_cap),

            mining_blur_blend: f("mining_blur_blend", self.mining_blur_blend, 0.0, 1.0, d.mining_blur_blend),
            mining_distance_decay: f("mining_distance_decay", self.mining_distance_decay, 0.01, 1.0, d.mining_distance_decay),
            mining_safety_weight: f("mining_safety_weight", self.mining_safety_weight, 0.0, m, d.mining_safety_weight),
            min_mining_halite: f("min_mining_halite", self.min_mining_halite, 0.0, m, d.min_mining_halite),
            mining_candidates: u("mining_candidates", self.mining_candidates, 1, size * size),
            farming_radius: u("farming_radius", self.farming_radius, 0, half),
            farmed_out_threshold: f("farmed_out_threshold", self.farmed_out_threshold, 0.0, m, d.farmed_out_threshold),
            farmed_out_penalty: f("farmed_out_penalty", self.farmed_out_penalty, 0.0, 1.0, d.farmed_out_penalty),
            return_weight: f("return_weight", self.return_weight, 0.0, m, d.return_weight),
            return_slots: u("return_slots", self.return_slots, 1, 10),

            hunter_max_cargo: f("hunter_max_cargo", self.hunter_max_cargo, 0.0, m, d.hunter_max_cargo),
            prey_min_cargo: f("prey_min_cargo", self.prey_min_cargo, 0.0, m, d.prey_min_cargo),
            hunter_fraction: f("hunter_fraction", self.hunter_fraction, 0.0, 1.0, d.hunter_fraction),
            hunt_max_distance: u("hunt_max_distance", self.hunt_max_distance, 1, span),
            hunt_min_turns_remaining: u("hunt_min_turns_remaining", self.hunt_min_turns_remaining, 0, 10_000),
            hunt_weight: f("hunt_weight", self.hunt_weight, 0.0, m, d.hunt_weight),
            hunt_distance_decay: f("hunt_distance_decay", self.hunt_distance_decay, 0.01, 1.0, d.hunt_distance_decay),
            hunt_dominance_weight: f("hunt_dominance_weight", self.hunt_dominance_weight, 0.0, m, d.hunt_dominance_weight),
            hunt_cornered_bonus: f("hunt_cornered_bonus", self.hunt_cornered_bonus, 0.0, m, d.hunt_cornered_bonus),
            hunt_pinned_bonus: f("hunt_pinned_bonus", self.hunt_pinned_bonus, 0.0, m, d.hunt_pinned_bonus),
            hunt_escape_bonus: f("hunt_escape_bonus", self.hunt_escape_bonus, 0.0, m, d.hunt_escape_bonus),
            hunt_territory_bonus: f("hunt_territory_bonus", self.hunt_territory_bonus, 0.0, m, d.hunt_territory_bonus),
            hunt_cargo_density_weight: f(
                "hunt_cargo_density_weight",
                self.hunt_cargo_density_weight,
                0.0,
                m,
                d.hunt_cargo_density_weight,
            ),

            guard_max_cargo: f("guard_max_cargo", self.guard_max_cargo, 0.0, m, d.guard_max_cargo),
            base_threat_distance: u("base_threat_distance", self.base_threat_distance, 1, span),
            border_guards: u("border_guards", self.border_guards, 0, 50),
            border_guard_min_fleet: u("border_guard_min_fleet", self.border_guard_min_fleet, 0, 1_000),
            guard_border_weight: f("guard_border_weight", self.guard_border_weight, 0.0, m, d.guard_border_weight),
            guard_distance_decay: f("guard_distance_decay", self.guard_distance_decay, 0.01, 1.0, d.guard_distance_decay),
            guard_dominance_weight: f("guard_dominance_weight", self.guard_dominance_weight, 0.0, m, d.guard_dominance_weight),

            mine_move_weight: f("mine_move_weight", self.mine_move_weight, 0.0, m, d.mine_move_weight),
            mine_stay_weight: f("mine_stay_weight", self.mine_stay_weight, 0.0, m, d.mine_stay_weight),
            return_move_weight: f("return_move_weight", self.return_move_weight, 0.0, m, d.return_move_weight),
            hunt_move_weight: f("hunt_move_weight", self.hunt_move_weight, 0.0, m, d.hunt_move_weight),
            guard_move_weight: f("guard_move_weight", self.guard_move_weight, 0.0, m, d.guard_move_weight),
            build_move_weight: f("build_move_weight", self.build_move_weight, 0.0, m, d.build_move_weight),
            ending_move_weight: f("ending_move_weight", self.ending_move_weight, 0.0, m, d.ending_move_weight),
            idle_stay_weight: f("idle_stay_weight", self.idle_stay_weight, 0.0, m, d.idle_stay_weight),

            own_collision_penalty: f("own_collision_penalty", self.own_collision_penalty, 0.0, m, d.own_collision_penalty),
            enemy_collision_penalty: f("enemy_collision_penalty", self.enemy_collision_penalty, 0.0, 100.0, d.enemy_collision_penalty),
            capture_reward: f("capture_reward", self.capture_reward, 0.0, 100.0, d.capture_reward),
            foreign_base_max_cargo: f("foreign_base_max_cargo", self.foreign_base_max_cargo, 0.0, m, d.foreign_base_max_cargo),
            foreign_base_penalty: f("foreign_base_penalty", self.foreign_base_penalty, 0.0, m, d.foreign_base_penalty),

            max_bases: u("max_bases", self.max_bases, 1, 50),
            units_per_base: f("units_per_base", self.units_per_base, 0.0, 1_000.0, d.units_per_base),
            min_base_distance: u("min_base_distance", self.min_base_distance, 1, span),
            max_base_distance: u("max_base_distance", self.max_base_distance.max(self.min_base_distance), 1, span),
            construction_min_turns_remaining: u("construction_min_turns_remaining", self.construction_min_turns_remaining, 0, 10_000),
            construction_resource_weight: f("construction_resource_weight", self.construction_resource_weight, 0.0, m, d.construction_resource_weight),
            construction_dominance_weight: f("construction_dominance_weight", self.construction_dominance_weight, 0.0, m, d.construction_dominance_weight),
            construction_min_dominance: f("construction_min_dominance", self.construction_min_dominance, -m, m, d.construction_min_dominance),
            convert_fallback_score: f("convert_fallback_score", self.convert_fallback_score, -m, m, d.convert_fallback_score),
            convert_bias: f("convert_bias", self.convert_bias, 0.0, m, d.convert_bias),
            escort_min_fleet: u("escort_min_fleet", self.escort_min_fleet, 0, 1_000),

            max_units: u("max_units", self.max_units, 0, 1_000),
            spawn_stop_turns_remaining: u("spawn_stop_turns_remaining", self.spawn_stop_turns_remaining, 0, 10_000),
            spawn_min_dominance: f("spawn_min_dominance", self.spawn_min_dominance, -m, m, d.spawn_min_dominance),
            spawn_reserve: f("spawn_reserve", self.spawn_reserve, 0.0, m, d.spawn_reserve),
        }
    }
}

/// Clamp a float field; NaN falls back to the default.
fn f(name: &'static str, value: f64, lo: f64, hi: f64, fallback: f64) -> f64 {
    let clamped = if value.is_nan() {
        fallback
    } else {
        value.clamp(lo, hi)
    };
    if clamped.to_bits() != value.to_bits() {
        warn!(param = name, from = value, to = clamped, "parameter clamped");
    }
    clamped
}

/// Clamp an integer field.
fn u(name: &'static str, value: usize, lo: usize, hi: usize) -> usize {
    let clamped = value.clamp(lo, hi.max(lo));
    if clamped != value {
        warn!(param = name, from = value, to = clamped, "parameter clamped");
    }
    clamped
}
