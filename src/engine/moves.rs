//! Directional biases and the final move assignment.
//!
//! Every role turns its target into preferences over the six unit actions.
//! The final solve then assigns each unit one cell of its one-step
//! reachable set (or its private convert column), so two own units never
//! end the turn on the same cell.

use std::collections::BTreeSet;

use tracing::warn;

use crate::assign::{SENTINEL, ScoreMatrix, solve};
use crate::engine::{Move, Target, Turn};
use crate::game::{Unit, UnitAction};
use crate::roles::Role;
use crate::scoring::occupancy_score;
use crate::spatial::Cell;

const STAY: usize = 0;
const CONVERT: usize = 5;

impl Turn<'_> {
    /// Build per-unit action preferences from roles and targets.
    pub(super) fn accumulate_biases(&mut self) {
        let units = self.own.clone();
        for unit in units {
            let biases = self.unit_biases(unit);
            self.biases.insert(unit.id.clone(), biases);
        }
    }

    fn unit_biases(&mut self, unit: &Unit) -> [f64; UnitAction::COUNT] {
        let params = self.ctx.params;
        let mut biases = [0.0; UnitAction::COUNT];

        biases[CONVERT] =
            if self.can_convert(unit) && self.ctx.board.base_at(unit.cell).is_none() {
                params.convert_fallback_score
            } else {
                SENTINEL
            };

        let role = self.role(&unit.id).unwrap_or(Role::Mining);
        if role == Role::Ending {
            self.ending_biases(unit, &mut biases);
            return biases;
        }
        if role == Role::Converting && biases[CONVERT] > SENTINEL {
            biases[CONVERT] += params.convert_bias;
        }

        match self.targets.get(&unit.id) {
            Some(Target::Mine(cell)) => {
                if *cell == unit.cell {
                    biases[STAY] += params.mine_stay_weight;
                } else {
                    self.toward(unit.cell, *cell, params.mine_move_weight, &mut biases);
                }
            }
            Some(Target::Return { base, .. }) => {
                self.toward(unit.cell, *base, params.return_move_weight, &mut biases);
            }
            Some(Target::Hunt { approach, .. }) => {
                biases[1 + approach.index()] += params.hunt_move_weight;
            }
            Some(Target::Guard(cell) | Target::Escort(cell)) => {
                if *cell == unit.cell {
                    biases[STAY] += params.guard_move_weight;
                } else {
                    self.toward(unit.cell, *cell, params.guard_move_weight, &mut biases);
                }
            }
            Some(Target::Build(site)) => {
                if *site == unit.cell {
                    biases[STAY] += params.build_move_weight;
                } else {
                    self.toward(unit.cell, *site, params.build_move_weight, &mut biases);
                }
            }
            Some(Target::Hold) | None => biases[STAY] += params.idle_stay_weight,
        }
        biases
    }

    /// Head home for the final deposit; convert in place on the last turn if there is no home.
    fn ending_biases(&mut self, unit: &Unit, biases: &mut [f64; UnitAction::COUNT]) {
        let params = self.ctx.params;
        match self.ctx.nearest_base(unit.cell) {
            Some((base, _)) => {
                self.targets
                    .insert(unit.id.clone(), Target::Return { base, slot: 0 });
                if base == unit.cell {
                    biases[STAY] += params.idle_stay_weight;
                } else {
                    self.toward(unit.cell, base, params.ending_move_weight, biases);
                }
            }
            None => {
                self.targets.insert(unit.id.clone(), Target::Hold);
                if self.turns_remaining <= 1 && biases[CONVERT] > SENTINEL {
                    biases[CONVERT] += params.convert_bias;
                } else {
                    biases[STAY] += params.idle_stay_weight;
                }
            }
        }
    }

    /// Add `weight` to every shortest-path step from `from` to `to`.
    fn toward(&self, from: Cell, to: Cell, weight: f64, biases: &mut [f64; UnitAction::COUNT]) {
        for dir in self.ctx.spatial.directions(from, to).iter() {
            biases[1 + dir.index()] += weight;
        }
    }

    /// Solve the final unit → cell (or convert) assignment.
    ///
    /// Returns one move per own unit in id order. Conversions are funded
    /// in order (pinned first); a unit whose conversion the treasury
    /// cannot cover loses its convert column and the solve is repeated, so
    /// it competes for a cell like everyone else. Rows left unassigned
    /// stay put.
    pub(super) fn resolve_moves(&mut self) -> Vec<(String, Move)> {
        let spatial = self.ctx.spatial;
        let units = self.own.clone();
        let cells: Vec<Cell> = units
            .iter()
            .flat_map(|u| spatial.reachable(u.cell))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut unfunded = BTreeSet::new();
        let assignment = loop {
            let matrix = self.move_matrix(&units, &cells, &unfunded);
            let assignment = solve(&matrix);
            let short = self.unfunded_conversions(&units, &assignment, cells.len());
            if short.is_empty() {
                break assignment;
            }
            for r in short {
                warn!(
                    unit = %units[r].id,
                    treasury = self.treasury,
                    "conversion not affordable, re-solving"
                );
                unfunded.insert(r);
            }
        };

        let mut moves = Vec::with_capacity(units.len());
        for (unit, col) in units.iter().zip(assignment) {
            let action = match col {
                Some(c) if c >= cells.len() => {
                    self.treasury += unit.cargo - self.ctx.config.convert_cost;
                    UnitAction::Convert
                }
                Some(c) => match spatial.step_between(unit.cell, cells[c]) {
                    Some(Some(dir)) => UnitAction::Move(dir),
                    Some(None) => UnitAction::Stay,
                    None => {
                        warn!(unit = %unit.id, cell = cells[c], "assigned cell not adjacent, staying");
                        UnitAction::Stay
                    }
                },
                None => {
                    warn!(unit = %unit.id, "no feasible move, staying");
                    UnitAction::Stay
                }
            };
            let cell = match action {
                UnitAction::Move(dir) => spatial.neighbour(unit.cell, dir),
                UnitAction::Stay | UnitAction::Convert => unit.cell,
            };
            moves.push((unit.id.clone(), Move { action, cell }));
        }
        moves
    }

    /// Score every unit against every reachable cell plus its private convert column.
    ///
    /// Rows in `unfunded` get no convert column; if they were pinned to
    /// convert they may only stay.
    fn move_matrix(
        &self,
        units: &[&Unit],
        cells: &[Cell],
        unfunded: &BTreeSet<usize>,
    ) -> ScoreMatrix {
        let spatial = self.ctx.spatial;
        let column_of = |cell: Cell| cells.binary_search(&cell).ok();

        let mut matrix = ScoreMatrix::new(units.len(), cells.len() + units.len());
        for (r, unit) in units.iter().enumerate() {
            let biases = self.biases.get(&unit.id).copied().unwrap_or([0.0; UnitAction::COUNT]);
            let pinned = match self.pinned.get(&unit.id).copied() {
                Some(UnitAction::Convert) if unfunded.contains(&r) => Some(UnitAction::Stay),
                other => other,
            };

            for action in UnitAction::ALL {
                if pinned.is_some_and(|p| p != action) {
                    continue;
                }
                let slot = action.slot();
                let (col, cell) = match action {
                    UnitAction::Convert if unfunded.contains(&r) => (None, unit.cell),
                    UnitAction::Convert => (Some(cells.len() + r), unit.cell),
                    UnitAction::Stay => (column_of(unit.cell), unit.cell),
                    UnitAction::Move(dir) => {
                        let cell = spatial.neighbour(unit.cell, dir);
                        (column_of(cell), cell)
                    }
                };
                let Some(col) = col else {
                    continue;
                };
                let bias = biases[slot];
                if bias <= SENTINEL {
                    continue;
                }
                let occupancy = if action == UnitAction::Convert {
                    0.0
                } else {
                    let claimed = self
                        .claimed
                        .get(&cell)
                        .is_some_and(|owner| *owner != unit.id);
                    occupancy_score(&self.ctx, unit, cell, claimed)
                };
                matrix.set(r, col, bias + occupancy);
            }
        }
        matrix
    }

    /// Rows whose chosen conversion the treasury cannot cover.
    ///
    /// Pinned conversions are paid first, then the rest in id order.
    fn unfunded_conversions(
        &self,
        units: &[&Unit],
        assignment: &[Option<usize>],
        first_convert: usize,
    ) -> Vec<usize> {
        let mut converting: Vec<usize> = assignment
            .iter()
            .enumerate()
            .filter(|(_, col)| col.is_some_and(|c| c >= first_convert))
            .map(|(r, _)| r)
            .collect();
        converting.sort_by_key(|&r| (!self.pinned.contains_key(&units[r].id), r));

        let cost = self.ctx.config.convert_cost;
        let mut treasury = self.treasury;
        let mut short = Vec::new();
        for r in converting {
            let cargo = units[r].cargo;
            if treasury + cargo >= cost {
                treasury += cargo - cost;
            } else {
                short.push(r);
            }
        }
        short
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Engine;
    use crate::game::{GameConfig, Observation, PlayerObservation};
    use crate::params::Params;

    #[test]
    fn test_crowded_units_never_share_a_cell() {
        let config = GameConfig {
            size: 7,
            ..GameConfig::default()
        };
        let mut engine = Engine::new(config, Params::default()).unwrap();
        let mut me = PlayerObservation::new(0.0).with_base("home", 24);
        for (i, cell) in [16, 17, 18, 23, 25, 30, 31, 32].into_iter().enumerate() {
            me = me.with_unit(format!("u{i}"), cell, 450.0);
        }
        let obs = Observation {
            player: 0,
            step: 100,
            halite: vec![0.0; 49],
            players: vec![me],
        };
        let actions = engine.act(&obs);
        let spatial = engine.spatial();
        let mut finals = BTreeSet::new();
        for (id, action) in &actions.units {
            let start = obs.players[0].units()[id].0;
            let end = match action {
                UnitAction::Move(dir) => spatial.neighbour(start, *dir),
                _ => start,
            };
            assert!(finals.insert(end), "two units end on cell {end}");
        }
        assert_eq!(finals.len(), 8);
    }

    #[test]
    fn test_unfunded_conversion_competes_for_a_cell() {
        let config = GameConfig {
            size: 11,
            ..GameConfig::default()
        };
        let mut engine = Engine::new(config, Params::default()).unwrap();
        // No base yet: "a" bootstraps and uses up the treasury, so "b"
        // (boxed in by lighter enemies) cannot also convert
        let obs = Observation {
            player: 0,
            step: 20,
            halite: vec![0.0; 121],
            players: vec![
                PlayerObservation::new(100.0)
                    .with_unit("a", 0, 430.0)
                    .with_unit("b", 60, 420.0)
                    .with_unit("c", 61, 0.0),
                PlayerObservation::new(0.0)
                    .with_unit("x1", 49, 0.0)
                    .with_unit("x2", 59, 0.0)
                    .with_unit("x3", 71, 0.0)
                    .with_unit("x4", 62, 0.0),
            ],
        };
        let actions = engine.act(&obs);
        assert_eq!(actions.units["a"], UnitAction::Convert);
        assert_ne!(actions.units["b"], UnitAction::Convert);
        assert_eq!(actions.convert_count(), 1);

        let spatial = engine.spatial();
        let mut finals = BTreeSet::new();
        for (id, action) in &actions.units {
            if *action == UnitAction::Convert {
                continue;
            }
            let start = obs.players[0].units()[id].0;
            let end = match action {
                UnitAction::Move(dir) => spatial.neighbour(start, *dir),
                _ => start,
            };
            assert!(finals.insert(end), "two units end on cell {end}");
        }
    }
}
