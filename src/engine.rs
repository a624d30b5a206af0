//! Per-game engine and the turn pipeline.
//!
//! An [`Engine`] is built once per game and owns everything that is
//! amortised across turns: the validated configuration, the clamped
//! parameters, the [`SpatialIndex`] and the [`DwellTable`]. The only state
//! carried from one turn to the next is the construction plan.
//!
//! Each call to [`Engine::act`] runs, in order:
//!
//! 1. Snapshot and influence maps
//! 2. Base role classification
//! 3. Escape analysis of enemy units
//! 4. Construction planning (including the first-base bootstrap)
//! 5. Shipyard and border defence
//! 6. Hunting assignment
//! 7. Mining and return assignment
//! 8. Directional bias accumulation
//! 9. Final move assignment
//! 10. Spawn decisions
//! 11. Action emission
//!
//! Phases live in the submodules as methods on the private [`Turn`]
//! scratch object, which is created fresh every turn.

mod classify;
mod construction;
mod defense;
mod hunting;
mod mining;
mod moves;
mod spawn;

pub use construction::ConstructionPlan;

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, warn};

use crate::dwell::DwellTable;
use crate::error::EngineError;
use crate::game::{Actions, BaseAction, Board, GameConfig, Observation, Unit, UnitAction};
use crate::influence::InfluenceMaps;
use crate::params::Params;
use crate::roles::{Role, RoleMap, role_counts};
use crate::scoring::{Escape, ScoreContext, analyse_escapes};
use crate::spatial::{Cell, Direction, SpatialIndex};

/// What a unit is working towards this turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Target {
    /// Mine this cell.
    Mine(Cell),
    /// Deliver to the base at `base`, arriving in `slot`.
    Return {
        /// Base cell.
        base: Cell,
        /// Arrival slot (0 = first).
        slot: usize,
    },
    /// Intercept an enemy unit from one side.
    Hunt {
        /// Enemy unit id.
        prey: String,
        /// Step that closes the distance.
        approach: Direction,
    },
    /// Hold or reach a guard post.
    Guard(Cell),
    /// Reach the planned base site (or convert on it).
    Build(Cell),
    /// Follow the builder to the site.
    Escort(Cell),
    /// Nothing feasible; stay put.
    Hold,
}

/// Diagnostics of the most recent turn.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TurnReport {
    /// Turn index.
    pub step: u32,
    /// Final role per own unit.
    pub roles: RoleMap,
    /// Target per own unit that has one.
    pub targets: BTreeMap<String, Target>,
    /// Planned dwell for each mining unit.
    pub dwell: BTreeMap<String, usize>,
    /// Escape status per enemy unit.
    pub escapes: BTreeMap<String, Escape>,
    /// Spawn orders issued.
    pub spawns: usize,
    /// Conversions issued.
    pub converts: usize,
    /// Wall-clock time spent in [`Engine::act`].
    pub elapsed: Duration,
}

impl TurnReport {
    fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Decision engine for one player in one game.
#[derive(Debug)]
pub struct Engine {
    /// Validated game configuration.
    config: GameConfig,
    /// Clamped parameters.
    params: Params,
    /// Distance, navigation and radius tables.
    spatial: SpatialIndex,
    /// Optimal dwell lookup.
    dwell: DwellTable,
    /// Base being built, carried across turns.
    plan: Option<ConstructionPlan>,
    /// Diagnostics of the last turn.
    report: TurnReport,
}

impl Engine {
    /// Prepare an engine for a new game.
    ///
    /// # Errors
    ///
    /// Returns an error if the game configuration is invalid.
    pub fn new(config: GameConfig, params: Params) -> Result<Self, EngineError> {
        config.validate()?;
        let params = params.clamped(config.size);
        let spatial = SpatialIndex::new(config.size);
        let dwell = DwellTable::generate(
            spatial.max_distance(),
            config.collect_rate,
            config.regen_rate,
        );
        debug!(
            size = config.size,
            dwell_version = dwell.version(),
            "engine ready"
        );
        Ok(Self {
            config,
            params,
            spatial,
            dwell,
            plan: None,
            report: TurnReport::default(),
        })
    }

    /// Game configuration.
    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Parameters in effect (after clamping).
    #[must_use]
    pub const fn params(&self) -> &Params {
        &self.params
    }

    /// Spatial tables.
    #[must_use]
    pub const fn spatial(&self) -> &SpatialIndex {
        &self.spatial
    }

    /// Dwell table.
    #[must_use]
    pub const fn dwell(&self) -> &DwellTable {
        &self.dwell
    }

    /// Persisted construction plan, if any.
    #[must_use]
    pub const fn plan(&self) -> Option<&ConstructionPlan> {
        self.plan.as_ref()
    }

    /// Diagnostics of the most recent [`act`](Self::act) call.
    #[must_use]
    pub const fn last_turn(&self) -> &TurnReport {
        &self.report
    }

    /// Decide one action per own unit and base.
    ///
    /// Never fails: every degraded condition falls back to staying put or
    /// idling for the affected unit only.
    pub fn act(&mut self, obs: &Observation) -> Actions {
        let started = Instant::now();
        self.report.clear();

        let board = Board::from_observation(obs, &self.config);
        self.report.step = board.step;
        if !board.has_me() {
            warn!(
                player = board.me,
                players = board.player_count(),
                "own player missing from observation"
            );
            return Actions::default();
        }

        let maps = InfluenceMaps::build(&self.spatial, &board, &self.params);
        let ctx = ScoreContext::new(
            &self.spatial,
            &board,
            &maps,
            &self.dwell,
            &self.params,
            &self.config,
        );
        let mut turn = Turn::new(ctx);

        turn.validate_plan(&mut self.plan);
        turn.classify(self.plan.as_ref());
        turn.escapes = analyse_escapes(&self.spatial, &board);
        turn.plan_construction(&mut self.plan);
        turn.defend();
        turn.hunt();
        turn.mine();
        turn.accumulate_biases();
        let moves = turn.resolve_moves();
        let reserve = if self.plan.is_some() {
            self.config.convert_cost
        } else {
            0.0
        };
        let spawns = turn.plan_spawns(&moves, reserve);
        let actions = turn.emit(&moves, &spawns);

        let elapsed = started.elapsed();
        debug!(
            step = board.step,
            units = moves.len(),
            roles = ?role_counts(&turn.roles),
            spawns = actions.spawn_count(),
            converts = actions.convert_count(),
            elapsed_us = elapsed.as_micros(),
            "turn complete"
        );
        self.report = TurnReport {
            step: board.step,
            roles: turn.roles,
            targets: turn.targets,
            dwell: turn.dwell,
            escapes: turn.escapes,
            spawns: actions.spawn_count(),
            converts: actions.convert_count(),
            elapsed,
        };
        actions
    }
}

/// Final decision for one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Move {
    /// Action sent to the host.
    action: UnitAction,
    /// Cell the unit occupies after the action.
    cell: Cell,
}

/// Scratch state of a single turn.
#[derive(Debug)]
struct Turn<'a> {
    /// Shared scorer inputs.
    ctx: ScoreContext<'a>,
    /// Own units in id order.
    own: Vec<&'a Unit>,
    /// Role per own unit.
    roles: RoleMap,
    /// Target per own unit.
    targets: BTreeMap<String, Target>,
    /// Planned dwell per mining unit.
    dwell: BTreeMap<String, usize>,
    /// Escape status per enemy unit.
    escapes: BTreeMap<String, Escape>,
    /// Preference per unit over [`UnitAction::ALL`].
    biases: BTreeMap<String, [f64; UnitAction::COUNT]>,
    /// Actions fixed before the final solve.
    pinned: BTreeMap<String, UnitAction>,
    /// Cells reserved by a specific unit.
    claimed: BTreeMap<Cell, String>,
    /// Turns left including this one.
    turns_remaining: usize,
    /// Treasury available for conversions and spawns.
    treasury: f64,
}

impl<'a> Turn<'a> {
    fn new(ctx: ScoreContext<'a>) -> Self {
        let board: &'a Board = ctx.board;
        let own: Vec<&'a Unit> = board.own_units().collect();
        let turns_remaining = board.turns_remaining(ctx.config);
        let treasury = board.my_treasury();
        Self {
            ctx,
            own,
            roles: RoleMap::new(),
            targets: BTreeMap::new(),
            dwell: BTreeMap::new(),
            escapes: BTreeMap::new(),
            biases: BTreeMap::new(),
            pinned: BTreeMap::new(),
            claimed: BTreeMap::new(),
            turns_remaining,
            treasury,
        }
    }

    /// Role of an own unit.
    fn role(&self, id: &str) -> Option<Role> {
        self.roles.get(id).copied()
    }

    fn set_role(&mut self, id: &str, role: Role) {
        self.roles.insert(id.to_string(), role);
    }

    /// Own units whose role is one of `wanted`, in id order.
    fn units_with(&self, wanted: &[Role]) -> Vec<&'a Unit> {
        self.own
            .iter()
            .copied()
            .filter(|u| self.role(&u.id).is_some_and(|r| wanted.contains(&r)))
            .collect()
    }

    /// Own unit by id.
    fn own_unit(&self, id: &str) -> Option<&'a Unit> {
        self.own.iter().copied().find(|u| u.id == id)
    }

    /// Whether `unit` can pay for turning into a base right now.
    fn can_convert(&self, unit: &Unit) -> bool {
        self.treasury + unit.cargo >= self.ctx.config.convert_cost
    }

    /// Fix a unit's action before the final solve and reserve the resulting cell.
    fn pin(&mut self, unit: &Unit, action: UnitAction) {
        self.pinned.insert(unit.id.clone(), action);
        let cell = match action {
            UnitAction::Move(dir) => self.ctx.spatial.neighbour(unit.cell, dir),
            UnitAction::Stay | UnitAction::Convert => unit.cell,
        };
        self.claimed.insert(cell, unit.id.clone());
    }

    /// Translate moves and spawns into the host action map.
    fn emit(&self, moves: &[(String, Move)], spawns: &BTreeMap<String, BaseAction>) -> Actions {
        Actions {
            units: moves
                .iter()
                .map(|(id, m)| (id.clone(), m.action))
                .collect(),
            bases: spawns.clone(),
        }
    }
}
