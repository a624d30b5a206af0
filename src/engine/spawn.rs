//! Spawn decisions.

use std::collections::BTreeMap;

use tracing::debug;

use crate::engine::{Move, Turn};
use crate::game::BaseAction;

impl Turn<'_> {
    /// Decide which own bases spawn a unit this turn.
    ///
    /// A base never spawns onto a cell an own unit ends the turn on. Regular
    /// spawns need fleet room, enough game left and non-hostile territory;
    /// a base with an enemy next to it spawns a blocker regardless. Every
    /// spawn must be covered by the treasury above `reserve`.
    pub(super) fn plan_spawns(
        &mut self,
        moves: &[(String, Move)],
        reserve: f64,
    ) -> BTreeMap<String, BaseAction> {
        let ctx = &self.ctx;
        let params = ctx.params;
        let cost = ctx.config.spawn_cost;
        let reserve = reserve + params.spawn_reserve;
        let mut fleet = self.own.len();
        let mut spawns = BTreeMap::new();

        for base in ctx.board.own_bases() {
            let occupied = moves.iter().any(|(_, m)| m.cell == base.cell);
            let adjacent_enemy = ctx
                .board
                .enemy_units()
                .any(|u| ctx.spatial.distance(u.cell, base.cell) <= 1);
            let regular = fleet < params.max_units
                && self.turns_remaining > params.spawn_stop_turns_remaining
                && ctx.maps.medium_at(ctx.me(), base.cell) >= params.spawn_min_dominance;
            let affordable = self.treasury - reserve >= cost;

            let action = if !occupied && affordable && (regular || adjacent_enemy) {
                self.treasury -= cost;
                fleet += 1;
                debug!(base = %base.id, blocker = adjacent_enemy && !regular, "spawn");
                BaseAction::Spawn
            } else {
                BaseAction::Idle
            };
            spawns.insert(base.id.clone(), action);
        }
        spawns
    }
}
