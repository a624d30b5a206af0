//! Safety of ending the turn on a given cell.

use crate::game::Unit;
use crate::scoring::ScoreContext;
use crate::spatial::Cell;

/// Preference adjustment for `unit` finishing its move on `cell`.
///
/// `claimed_by_other` is set when another of our units has already
/// reserved the cell this turn. Ending on a foreign base with cargo,
/// or next to an enemy that would survive a collision, is penalised; an
/// enemy heavier than us sitting on the cell is a capture opportunity.
#[must_use]
pub fn occupancy_score(
    ctx: &ScoreContext<'_>,
    unit: &Unit,
    cell: Cell,
    claimed_by_other: bool,
) -> f64 {
    let params = ctx.params;
    let me = ctx.me();
    let mut score = 0.0;

    if claimed_by_other {
        score -= params.own_collision_penalty;
    }

    if ctx.board.base_at(cell).is_some_and(|b| b.owner != me)
        && unit.cargo > params.foreign_base_max_cargo
    {
        score -= params.foreign_base_penalty + unit.cargo;
    }

    // Any enemy that can reach the cell and would win or trade the collision
    let lethal = ctx
        .spatial
        .reachable(cell)
        .into_iter()
        .filter_map(|c| ctx.board.unit_at(c))
        .any(|enemy| enemy.owner != me && enemy.cargo <= unit.cargo);
    if lethal {
        score -= params.enemy_collision_penalty * (ctx.config.spawn_cost + unit.cargo);
    }

    if let Some(enemy) = ctx.board.unit_at(cell) {
        if enemy.owner != me && enemy.cargo > unit.cargo {
            score += params.capture_reward * enemy.cargo;
        }
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::PlayerObservation;
    use crate::scoring::fixtures::Fixture;

    fn fixture() -> Fixture {
        Fixture::new(
            9,
            vec![0.0; 81],
            vec![
                PlayerObservation::new(0.0).with_unit("u", 40, 50.0),
                PlayerObservation::new(0.0)
                    .with_base("x", 38)
                    .with_unit("killer", 42, 0.0)
                    .with_unit("fat", 31, 300.0),
            ],
        )
    }

    #[test]
    fn test_free_cell_is_neutral() {
        let fx = fixture();
        let ctx = fx.ctx();
        assert!(occupancy_score(&ctx, fx.unit("u"), 49, false).abs() < f64::EPSILON);
    }

    #[test]
    fn test_claimed_cell_is_heavily_penalised() {
        let fx = fixture();
        let ctx = fx.ctx();
        assert!(occupancy_score(&ctx, fx.unit("u"), 49, true) <= -fx.params.own_collision_penalty);
    }

    #[test]
    fn test_cell_next_to_lighter_enemy_is_penalised() {
        let fx = fixture();
        let ctx = fx.ctx();
        // (4,5) neighbours the empty enemy at (4,6)
        let score = occupancy_score(&ctx, fx.unit("u"), 41, false);
        assert!(score < 0.0);
    }

    #[test]
    fn test_foreign_base_with_cargo_is_penalised() {
        let fx = fixture();
        let ctx = fx.ctx();
        let score = occupancy_score(&ctx, fx.unit("u"), 38, false);
        assert!(score <= -(fx.params.foreign_base_penalty + 50.0));
    }

    #[test]
    fn test_capturing_heavier_enemy_is_rewarded() {
        let fx = fixture();
        let ctx = fx.ctx();
        let score = occupancy_score(&ctx, fx.unit("u"), 31, false);
        assert!(score > 0.0);
    }
}
