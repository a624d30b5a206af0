//! Enemy-hunting score.

#![allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]

use crate::assign::SENTINEL;
use crate::game::Unit;
use crate::scoring::{Escape, ScoreContext};
use crate::spatial::Direction;

/// Score `hunter` closing on `prey` by stepping `approach`.
///
/// Feasible only when the prey is heavier than the hunter, within range,
/// and `approach` lies on a shortest path towards it. The base value is
/// the cargo differential decayed geometrically with distance, lifted by
/// our territorial dominance at the prey. Adjacent hunters get the full
/// cornered or pinned bonus; approaching from the single open side gets
/// the escape bonus; prey inside our region gets the territory bonus.
/// Prey moving among other loaded enemies is worth more in proportion to
/// the blurred enemy cargo at its cell.
#[must_use]
pub fn hunt_score(
    ctx: &ScoreContext<'_>,
    hunter: &Unit,
    prey: &Unit,
    approach: Direction,
    escape: Escape,
) -> f64 {
    let params = ctx.params;
    let diff = prey.cargo - hunter.cargo;
    if diff <= 0.0 {
        return SENTINEL;
    }
    let distance = ctx.spatial.distance(hunter.cell, prey.cell);
    if distance == 0 || distance > params.hunt_max_distance {
        return SENTINEL;
    }
    if !ctx.spatial.directions(hunter.cell, prey.cell).contains(approach) {
        return SENTINEL;
    }

    let me = ctx.me();
    let mut score = params.hunt_weight
        * diff
        * params.hunt_distance_decay.powi(distance as i32 - 1)
        * (1.0 + params.hunt_dominance_weight * ctx.maps.medium_at(me, prey.cell).max(0.0));

    match escape {
        Escape::Cornered if distance == 1 => score *= params.hunt_cornered_bonus,
        Escape::Pinned if distance == 1 => score *= params.hunt_pinned_bonus,
        // Coming in from the open side closes the only exit
        Escape::OneWay(open) if approach == open.opposite() => {
            score *= 1.0 + params.hunt_escape_bonus;
        }
        _ => {}
    }

    if ctx.maps.region[prey.cell] == Some(me) {
        score *= 1.0 + params.hunt_territory_bonus;
    }
    score * (1.0 + params.hunt_cargo_density_weight * ctx.maps.enemy_cargo[prey.cell])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assign::is_feasible;
    use crate::game::PlayerObservation;
    use crate::scoring::analyse_escapes;
    use crate::scoring::fixtures::Fixture;

    #[test]
    fn test_requires_heavier_prey_and_approach() {
        let fx = Fixture::new(
            9,
            vec![0.0; 81],
            vec![
                PlayerObservation::new(0.0)
                    .with_unit("light", 10, 0.0)
                    .with_unit("heavy", 12, 500.0),
                PlayerObservation::new(0.0).with_unit("prey", 13, 200.0),
            ],
        );
        let ctx = fx.ctx();
        let prey = fx.unit("prey");
        // (1,1) → (1,4): east only
        assert!(is_feasible(hunt_score(&ctx, fx.unit("light"), prey, Direction::East, Escape::Free)));
        assert!(!is_feasible(hunt_score(&ctx, fx.unit("light"), prey, Direction::West, Escape::Free)));
        assert!(!is_feasible(hunt_score(&ctx, fx.unit("heavy"), prey, Direction::East, Escape::Free)));
    }

    #[test]
    fn test_adjacent_cornered_beats_distant() {
        let fx = Fixture::new(
            9,
            vec![0.0; 81],
            vec![
                PlayerObservation::new(0.0)
                    .with_unit("n", 31, 10.0)
                    .with_unit("e", 41, 10.0)
                    .with_unit("s", 49, 10.0)
                    .with_unit("w", 39, 10.0)
                    .with_unit("far", 37, 0.0),
                PlayerObservation::new(0.0).with_unit("prey", 40, 100.0),
            ],
        );
        let ctx = fx.ctx();
        let escapes = analyse_escapes(&fx.spatial, &fx.board);
        let status = escapes["prey"];
        assert_eq!(status, Escape::Cornered);

        let prey = fx.unit("prey");
        let adjacent = hunt_score(&ctx, fx.unit("w"), prey, Direction::East, status);
        let distant = hunt_score(&ctx, fx.unit("far"), prey, Direction::East, status);
        assert!(is_feasible(distant));
        assert!(adjacent > distant);
    }

    #[test]
    fn test_loaded_neighbourhood_raises_value() {
        let mut fx = Fixture::new(
            9,
            vec![0.0; 81],
            vec![
                PlayerObservation::new(0.0).with_unit("hunter", 37, 0.0),
                PlayerObservation::new(0.0)
                    .with_unit("prey", 40, 100.0)
                    .with_unit("convoy", 41, 800.0),
            ],
        );
        assert!(fx.maps.enemy_cargo[40] > 0.0);

        let score = |fx: &Fixture| {
            hunt_score(&fx.ctx(), fx.unit("hunter"), fx.unit("prey"), Direction::East, Escape::Free)
        };
        let dense = score(&fx);
        fx.params.hunt_cargo_density_weight = 0.0;
        let plain = score(&fx);
        assert!(is_feasible(plain));
        assert!(dense > plain, "dense {dense} vs plain {plain}");
    }
}
