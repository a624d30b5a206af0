//! Base role classification for the turn.

use crate::engine::Turn;
use crate::engine::construction::ConstructionPlan;
use crate::roles::{RoleInput, classify_fleet};

impl Turn<'_> {
    /// Give every own unit its precedence-ordered base role.
    pub(super) fn classify(&mut self, plan: Option<&ConstructionPlan>) {
        let ctx = &self.ctx;
        let inputs: Vec<(&str, RoleInput)> = self
            .own
            .iter()
            .map(|&unit| {
                let input = RoleInput {
                    cargo: unit.cargo,
                    turns_remaining: self.turns_remaining,
                    base_distance: ctx.nearest_base(unit.cell).map(|(_, d)| d),
                    construction: plan.and_then(|p| p.duty(&unit.id)),
                };
                (unit.id.as_str(), input)
            })
            .collect();
        self.roles = classify_fleet(inputs, ctx.params);
    }
}

#[cfg(test)]
mod tests {
    use crate::Engine;
    use crate::game::{GameConfig, Observation, PlayerObservation};
    use crate::params::Params;
    use crate::roles::Role;

    #[test]
    fn test_every_unit_gets_one_role() {
        let config = GameConfig {
            size: 9,
            ..GameConfig::default()
        };
        let mut engine = Engine::new(config, Params::default()).unwrap();
        let obs = Observation {
            player: 0,
            step: 20,
            halite: vec![50.0; 81],
            players: vec![
                PlayerObservation::new(1000.0)
                    .with_base("home", 40)
                    .with_unit("a", 0, 0.0)
                    .with_unit("b", 10, 900.0)
                    .with_unit("c", 20, 30.0),
                PlayerObservation::new(0.0).with_unit("x", 70, 10.0),
            ],
        };
        engine.act(&obs);
        let roles = &engine.last_turn().roles;
        assert_eq!(
            roles.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["a", "b", "c"]
        );
        assert_eq!(roles["b"], Role::Returning);
    }
}
