//! Shipyard defence and border guarding.

use tracing::debug;

use crate::assign::{ScoreMatrix, solve};
use crate::engine::{Target, Turn};
use crate::game::UnitAction;
use crate::roles::Role;
use crate::scoring::{border_cells, border_score, shipyard_guard_score};
use crate::spatial::Cell;

/// Roles a unit may be pulled out of to defend.
const DEFENDER_SOURCES: [Role; 2] = [Role::Mining, Role::Returning];

impl Turn<'_> {
    /// Own bases with an enemy unit within the threat radius, with the nearest threat distance.
    pub(super) fn threatened_bases(&self) -> Vec<(Cell, usize)> {
        let ctx = &self.ctx;
        let radius = ctx.params.base_threat_distance;
        ctx.board
            .own_bases()
            .filter_map(|base| {
                ctx.spatial
                    .nearest(base.cell, ctx.board.enemy_units().map(|u| u.cell))
                    .filter(|&(_, d)| d <= radius)
                    .map(|(_, d)| (base.cell, d))
            })
            .collect()
    }

    /// Sit on threatened bases, send guards to the rest, then hold contested borders.
    pub(super) fn defend(&mut self) {
        let board = self.ctx.board;
        let threatened = self.threatened_bases();
        let mut unguarded = Vec::new();

        for &(base, distance) in &threatened {
            let sitter = board.unit_at(base).filter(|u| {
                u.owner == self.ctx.me()
                    && self
                        .role(&u.id)
                        .is_some_and(|r| DEFENDER_SOURCES.contains(&r))
            });
            match sitter {
                Some(unit) => {
                    self.set_role(&unit.id, Role::Defending);
                    self.targets.insert(unit.id.clone(), Target::Guard(base));
                    self.pin(unit, UnitAction::Stay);
                }
                None => unguarded.push((base, distance)),
            }
        }

        if !unguarded.is_empty() {
            self.assign_shipyard_guards(&unguarded);
        }
        self.assign_border_guards();
    }

    fn assign_shipyard_guards(&mut self, bases: &[(Cell, usize)]) {
        let max_cargo = self.ctx.params.guard_max_cargo;
        let rows: Vec<_> = self
            .units_with(&[Role::Mining])
            .into_iter()
            .filter(|u| u.cargo <= max_cargo)
            .collect();
        if rows.is_empty() {
            return;
        }

        let mut matrix = ScoreMatrix::new(rows.len(), bases.len());
        for (r, unit) in rows.iter().enumerate() {
            for (c, &(base, threat)) in bases.iter().enumerate() {
                matrix.set(r, c, shipyard_guard_score(self.ctx.spatial, unit.cell, base, threat));
            }
        }

        for (unit, col) in rows.iter().zip(solve(&matrix)) {
            if let Some(c) = col {
                let base = bases[c].0;
                debug!(unit = %unit.id, base, "shipyard guard");
                self.set_role(&unit.id, Role::ShipyardGuarding);
                self.targets.insert(unit.id.clone(), Target::Guard(base));
            }
        }
    }

    fn assign_border_guards(&mut self) {
        let params = self.ctx.params;
        if params.border_guards == 0 || self.own.len() < params.border_guard_min_fleet {
            return;
        }
        let me = self.ctx.me();

        // Most contested border cells first
        let mut posts: Vec<(Cell, f64)> = border_cells(self.ctx.spatial, &self.ctx.maps.region, me)
            .into_iter()
            .map(|cell| (cell, self.ctx.maps.medium_at(me, cell)))
            .filter(|&(_, dominance)| dominance < 0.0)
            .collect();
        posts.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        posts.truncate(params.border_guards);

        let rows: Vec<_> = self
            .units_with(&[Role::Mining])
            .into_iter()
            .filter(|u| u.cargo <= params.guard_max_cargo)
            .collect();
        if rows.is_empty() || posts.is_empty() {
            return;
        }

        let mut matrix = ScoreMatrix::new(rows.len(), posts.len());
        for (r, unit) in rows.iter().enumerate() {
            for (c, &(cell, _)) in posts.iter().enumerate() {
                matrix.set(r, c, border_score(&self.ctx, unit, cell));
            }
        }

        for (unit, col) in rows.iter().zip(solve(&matrix)) {
            if let Some(c) = col {
                self.set_role(&unit.id, Role::BorderGuarding);
                self.targets
                    .insert(unit.id.clone(), Target::Guard(posts[c].0));
            }
        }
    }
}
