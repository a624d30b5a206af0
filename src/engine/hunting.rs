//! Hunter promotion and hunting assignment.

#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]

use tracing::debug;

use crate::assign::{ScoreMatrix, solve, total_score};
use crate::engine::{Target, Turn};
use crate::game::Unit;
use crate::roles::Role;
use crate::scoring::{Escape, hunt_score};
use crate::spatial::Direction;

impl<'a> Turn<'a> {
    /// Promote light miners near heavy prey and assign each an approach side.
    ///
    /// Columns are (direction, prey) pairs, so up to four hunters can close
    /// on one prey from different sides. Hunters left without a feasible
    /// column go back to mining.
    pub(super) fn hunt(&mut self) {
        let params = self.ctx.params;
        if self.turns_remaining < params.hunt_min_turns_remaining {
            return;
        }

        let board = self.ctx.board;
        let prey: Vec<&'a Unit> = board
            .enemy_units()
            .filter(|u| u.cargo >= params.prey_min_cargo)
            .collect();
        if prey.is_empty() {
            return;
        }

        let hunters = self.promote_hunters(&prey);
        if hunters.is_empty() {
            return;
        }

        let columns: Vec<(Direction, &'a Unit)> = prey
            .iter()
            .flat_map(|&p| Direction::ALL.into_iter().map(move |d| (d, p)))
            .collect();
        let mut matrix = ScoreMatrix::new(hunters.len(), columns.len());
        for (r, hunter) in hunters.iter().enumerate() {
            for (c, &(dir, target)) in columns.iter().enumerate() {
                let escape = self
                    .escapes
                    .get(&target.id)
                    .copied()
                    .unwrap_or(Escape::Free);
                matrix.set(r, c, hunt_score(&self.ctx, hunter, target, dir, escape));
            }
        }

        let assignment = solve(&matrix);
        let mut matched = 0;
        for (hunter, &col) in hunters.iter().zip(&assignment) {
            match col {
                Some(c) => {
                    let (approach, target) = columns[c];
                    self.targets.insert(
                        hunter.id.clone(),
                        Target::Hunt {
                            prey: target.id.clone(),
                            approach,
                        },
                    );
                    matched += 1;
                }
                None => self.set_role(&hunter.id, Role::Mining),
            }
        }
        let trapped = prey
            .iter()
            .filter(|p| self.escapes.get(&p.id).is_some_and(|e| e.is_trapped()))
            .count();
        debug!(
            hunters = hunters.len(),
            matched,
            prey = prey.len(),
            trapped,
            utility = total_score(&matrix, &assignment),
            "hunting assigned"
        );
    }

    /// Light miners with heavier prey in range, nearest first, capped by the hunter fraction.
    fn promote_hunters(&mut self, prey: &[&'a Unit]) -> Vec<&'a Unit> {
        let params = self.ctx.params;
        let spatial = self.ctx.spatial;
        let cap = (params.hunter_fraction * self.own.len() as f64).floor() as usize;
        if cap == 0 {
            return Vec::new();
        }

        let mut candidates: Vec<(usize, &'a Unit)> = self
            .units_with(&[Role::Mining])
            .into_iter()
            .filter(|u| u.cargo <= params.hunter_max_cargo)
            .filter_map(|u| {
                prey.iter()
                    .filter(|p| p.cargo > u.cargo)
                    .map(|p| spatial.distance(u.cell, p.cell))
                    .filter(|&d| d <= params.hunt_max_distance)
                    .min()
                    .map(|d| (d, u))
            })
            .collect();
        // Stable sort keeps id order among equally distant hunters
        candidates.sort_by_key(|&(d, _)| d);
        candidates.truncate(cap);

        let hunters: Vec<&'a Unit> = candidates.into_iter().map(|(_, u)| u).collect();
        for unit in &hunters {
            self.set_role(&unit.id, Role::Hunting);
        }
        hunters
    }
}

#[cfg(test)]
mod tests {
    use crate::Engine;
    use crate::engine::Target;
    use crate::game::{GameConfig, Observation, PlayerObservation, UnitAction};
    use crate::params::Params;
    use crate::roles::Role;
    use crate::spatial::Direction;

    #[test]
    fn test_light_unit_hunts_heavy_neighbour() {
        let config = GameConfig {
            size: 11,
            ..GameConfig::default()
        };
        let params = Params {
            hunter_fraction: 0.5,
            ..Params::default()
        };
        let mut engine = Engine::new(config, params).unwrap();
        let obs = Observation {
            player: 0,
            step: 30,
            halite: vec![0.0; 121],
            players: vec![
                PlayerObservation::new(0.0)
                    .with_base("home", 0)
                    .with_unit("h", 60, 0.0)
                    .with_unit("m", 5, 0.0),
                PlayerObservation::new(0.0).with_unit("fat", 62, 300.0),
            ],
        };
        let actions = engine.act(&obs);
        let report = engine.last_turn();
        assert_eq!(report.roles["h"], Role::Hunting);
        assert_eq!(
            report.targets["h"],
            Target::Hunt {
                prey: "fat".to_string(),
                approach: Direction::East
            }
        );
        assert_eq!(actions.units["h"], UnitAction::Move(Direction::East));
    }

    #[test]
    fn test_no_hunting_near_game_end() {
        let config = GameConfig {
            size: 11,
            episode_steps: 20,
            ..GameConfig::default()
        };
        let mut engine = Engine::new(config, Params::default()).unwrap();
        let obs = Observation {
            player: 0,
            step: 15,
            halite: vec![0.0; 121],
            players: vec![
                PlayerObservation::new(0.0)
                    .with_base("home", 0)
                    .with_unit("h", 60, 0.0)
                    .with_unit("m", 5, 0.0)
                    .with_unit("n", 7, 0.0),
                PlayerObservation::new(0.0).with_unit("fat", 62, 300.0),
            ],
        };
        engine.act(&obs);
        assert!(
            engine
                .last_turn()
                .roles
                .values()
                .all(|&r| r != Role::Hunting)
        );
    }
}
