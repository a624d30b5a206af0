//! Base construction: the persisted plan, site choice and first-base bootstrap.

#![allow(clippy::cast_precision_loss)]

use serde::Serialize;
use tracing::debug;

use crate::engine::{Target, Turn};
use crate::game::{Unit, UnitAction};
use crate::roles::{ConstructionDuty, Role};
use crate::spatial::Cell;

/// A base under construction, kept across turns until it is built or abandoned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstructionPlan {
    /// Unit that will convert on the site.
    pub builder: String,
    /// Optional escort travelling with the builder.
    pub escort: Option<String>,
    /// Planned base cell.
    pub site: Cell,
    /// Turn the plan was made.
    pub started: u32,
}

impl ConstructionPlan {
    /// Duty of `id` under this plan, if any.
    #[must_use]
    pub fn duty(&self, id: &str) -> Option<ConstructionDuty> {
        if self.builder == id {
            Some(ConstructionDuty::Builder)
        } else if self.escort.as_deref() == Some(id) {
            Some(ConstructionDuty::Escort)
        } else {
            None
        }
    }
}

impl<'a> Turn<'a> {
    /// Drop a plan that can no longer complete, and a vanished escort.
    pub(super) fn validate_plan(&self, plan: &mut Option<ConstructionPlan>) {
        let Some(current) = plan.as_mut() else {
            return;
        };

        let cancel = match self.own_unit(&current.builder) {
            None => Some("builder lost"),
            Some(_) if self.ctx.board.base_at(current.site).is_some() => Some("site occupied"),
            Some(builder)
                if self.ctx.spatial.distance(builder.cell, current.site) >= self.turns_remaining =>
            {
                Some("out of time")
            }
            Some(_) => None,
        };
        if let Some(reason) = cancel {
            debug!(builder = %current.builder, site = current.site, reason, "construction plan dropped");
            *plan = None;
            return;
        }

        if current
            .escort
            .as_deref()
            .is_some_and(|id| self.own_unit(id).is_none())
        {
            current.escort = None;
        }
    }

    /// Carry out, start or bootstrap base construction.
    pub(super) fn plan_construction(&mut self, plan: &mut Option<ConstructionPlan>) {
        let board = self.ctx.board;
        if board.own_bases().next().is_none() {
            *plan = None;
            self.bootstrap_first_base();
            return;
        }

        if let Some(current) = plan.as_ref() {
            self.follow_plan(current);
            return;
        }

        let params = self.ctx.params;
        let own_bases = board.own_bases().count();
        let ready = own_bases < params.max_bases
            && self.own.len() as f64 >= params.units_per_base * own_bases as f64
            && self.turns_remaining >= params.construction_min_turns_remaining
            && self.treasury >= self.ctx.config.convert_cost;
        if !ready {
            return;
        }

        let Some(site) = self.choose_site() else {
            return;
        };
        let Some(builder) = self.nearest_with(site, Role::Mining, None, f64::INFINITY) else {
            return;
        };
        let escort = if self.own.len() >= params.escort_min_fleet {
            self.nearest_with(site, Role::Mining, Some(&builder.id), params.guard_max_cargo)
        } else {
            None
        };

        let new_plan = ConstructionPlan {
            builder: builder.id.clone(),
            escort: escort.map(|u| u.id.clone()),
            site,
            started: board.step,
        };
        debug!(builder = %new_plan.builder, site, escort = ?new_plan.escort, "construction planned");
        self.set_role(&builder.id, Role::Constructing);
        if let Some(escort) = escort {
            self.set_role(&escort.id, Role::ConstructionGuarding);
        }
        self.follow_plan(&new_plan);
        *plan = Some(new_plan);
    }

    /// Without any base the richest unit converts on the spot if it can pay.
    fn bootstrap_first_base(&mut self) {
        let mut richest: Option<&'a Unit> = None;
        for &unit in &self.own {
            if self.ctx.board.base_at(unit.cell).is_some() {
                continue;
            }
            if richest.is_none_or(|r| unit.cargo > r.cargo) {
                richest = Some(unit);
            }
        }
        let Some(unit) = richest else {
            return;
        };
        if !self.can_convert(unit) {
            debug!(unit = %unit.id, "first base not affordable yet");
            return;
        }
        self.set_role(&unit.id, Role::Converting);
        self.targets.insert(unit.id.clone(), Target::Build(unit.cell));
        self.pin(unit, UnitAction::Convert);
    }

    /// Targets for the builder and escort of an active plan.
    fn follow_plan(&mut self, plan: &ConstructionPlan) {
        if let Some(builder) = self.own_unit(&plan.builder) {
            if builder.cell == plan.site && self.can_convert(builder) {
                self.set_role(&builder.id, Role::Converting);
            }
            self.targets
                .insert(builder.id.clone(), Target::Build(plan.site));
        }
        if let Some(escort) = plan.escort.as_deref().and_then(|id| self.own_unit(id)) {
            self.targets
                .insert(escort.id.clone(), Target::Escort(plan.site));
        }
    }

    /// Best cell for a new base inside the allowed distance window.
    ///
    /// Scores long-range resource density plus territorial dominance; ties
    /// go to the lower cell index.
    fn choose_site(&self) -> Option<Cell> {
        let ctx = &self.ctx;
        let params = ctx.params;
        let me = ctx.me();
        let enemy_bases: Vec<Cell> = ctx.board.enemy_bases().map(|b| b.cell).collect();

        let mut best: Option<(Cell, f64)> = None;
        for cell in 0..ctx.spatial.cell_count() {
            let Some((_, distance)) = ctx.nearest_base(cell) else {
                continue;
            };
            if distance < params.min_base_distance || distance > params.max_base_distance {
                continue;
            }
            if ctx.board.base_at(cell).is_some() {
                continue;
            }
            if enemy_bases
                .iter()
                .any(|&b| ctx.spatial.distance(cell, b) < params.min_base_distance)
            {
                continue;
            }
            let dominance = ctx.maps.medium_at(me, cell);
            if dominance < params.construction_min_dominance {
                continue;
            }
            let score = params.construction_resource_weight * ctx.maps.resource_ultra[cell]
                + params.construction_dominance_weight * dominance;
            if best.is_none_or(|(_, s)| score > s) {
                best = Some((cell, score));
            }
        }
        best.map(|(cell, _)| cell)
    }

    /// Nearest unit in `role` to `cell` carrying at most `max_cargo`, skipping `exclude`.
    fn nearest_with(
        &self,
        cell: Cell,
        role: Role,
        exclude: Option<&str>,
        max_cargo: f64,
    ) -> Option<&'a Unit> {
        let mut best: Option<(&'a Unit, usize)> = None;
        for unit in self.units_with(&[role]) {
            if exclude == Some(unit.id.as_str()) || unit.cargo > max_cargo {
                continue;
            }
            let d = self.ctx.spatial.distance(unit.cell, cell);
            if best.is_none_or(|(_, bd)| d < bd) {
                best = Some((unit, d));
            }
        }
        best.map(|(unit, _)| unit)
    }
}
