//! Mining and return-to-base scores.

#![allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]

use crate::assign::SENTINEL;
use crate::game::Unit;
use crate::scoring::ScoreContext;
use crate::spatial::Cell;

/// Mining utility together with the dwell it assumes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MiningEstimate {
    /// Expected delivered resource per turn (or the sentinel).
    pub score: f64,
    /// Turns to sit on the cell before heading home.
    pub dwell: usize,
}

impl MiningEstimate {
    const INFEASIBLE: Self = Self {
        score: SENTINEL,
        dwell: 1,
    };
}

/// Blend of the instantaneous and lightly blurred resource at `cell`.
#[must_use]
pub fn cell_value(ctx: &ScoreContext<'_>, cell: Cell) -> f64 {
    let blend = ctx.params.mining_blur_blend;
    (1.0 - blend) * ctx.board.halite[cell] + blend * ctx.maps.resource[cell]
}

/// Score `unit` mining `cell` then returning to the nearest base.
///
/// The estimate divides cargo plus the decayed yield of the optimal dwell
/// by the whole trip length, then applies the tactical safety discount and
/// the farmed-out penalty. Cells holding an enemy base, or an enemy unit
/// that would win a collision, are infeasible.
#[must_use]
pub fn mining_score(ctx: &ScoreContext<'_>, unit: &Unit, cell: Cell) -> MiningEstimate {
    let me = ctx.me();
    if ctx.board.base_at(cell).is_some_and(|b| b.owner != me) {
        return MiningEstimate::INFEASIBLE;
    }
    if ctx
        .board
        .unit_at(cell)
        .is_some_and(|u| u.owner != me && u.cargo <= unit.cargo)
    {
        return MiningEstimate::INFEASIBLE;
    }

    let params = ctx.params;
    let value = cell_value(ctx, cell);
    let to_target = ctx.spatial.distance(unit.cell, cell);
    let to_base = ctx.base_distance(cell);
    let dwell = ctx.dwell.lookup(to_target, to_base, unit.cargo, value);

    let decay = params.mining_distance_decay.powi(to_target as i32);
    let mined = value * decay * (1.0 - (1.0 - ctx.config.collect_rate).powi(dwell as i32));
    let turns = (to_target + dwell + to_base) as f64;
    let mut score = (unit.cargo + mined) / turns;

    let danger = ctx.maps.small_at(me, cell).min(0.0);
    score *= (1.0 + params.mining_safety_weight * danger).max(0.0);

    let farmed_out = ctx
        .nearest_base(cell)
        .is_some_and(|(_, d)| d <= params.farming_radius)
        && ctx.board.halite[cell] < params.farmed_out_threshold;
    if farmed_out {
        score *= 1.0 - params.farmed_out_penalty;
    }

    MiningEstimate { score, dwell }
}

/// Score `unit` delivering to the base at `base`, arriving in time slot `slot`.
///
/// Each base is offered once per slot so simultaneous returns are spread
/// over successive turns instead of piling onto the same cell.
#[must_use]
pub fn return_score(ctx: &ScoreContext<'_>, unit: &Unit, base: Cell, slot: usize) -> f64 {
    if unit.cargo <= 0.0 {
        return SENTINEL;
    }
    let distance = ctx.spatial.distance(unit.cell, base);
    ctx.params.return_weight * unit.cargo / (distance + slot + 1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assign::is_feasible;
    use crate::game::PlayerObservation;
    use crate::scoring::fixtures::Fixture;

    fn rich_board() -> Fixture {
        let mut halite = vec![0.0; 81];
        halite[13] = 400.0;
        halite[40] = 400.0;
        Fixture::new(
            9,
            halite,
            vec![
                PlayerObservation::new(0.0)
                    .with_base("home", 0)
                    .with_unit("u", 10, 0.0),
                PlayerObservation::new(0.0),
            ],
        )
    }

    #[test]
    fn test_closer_rich_cell_scores_higher() {
        let fx = rich_board();
        let ctx = fx.ctx();
        let unit = fx.unit("u");
        let near = mining_score(&ctx, unit, 13);
        let far = mining_score(&ctx, unit, 40);
        assert!(near.score > far.score);
        assert!(near.dwell >= 1);
    }

    #[test]
    fn test_empty_cell_scores_below_rich_cell() {
        let fx = rich_board();
        let ctx = fx.ctx();
        let unit = fx.unit("u");
        assert!(mining_score(&ctx, unit, 11).score < mining_score(&ctx, unit, 13).score);
    }

    #[test]
    fn test_enemy_base_is_infeasible() {
        let fx = Fixture::new(
            9,
            vec![100.0; 81],
            vec![
                PlayerObservation::new(0.0).with_unit("u", 10, 0.0),
                PlayerObservation::new(0.0).with_base("x", 12),
            ],
        );
        let ctx = fx.ctx();
        assert!(!is_feasible(mining_score(&ctx, fx.unit("u"), 12).score));
        assert!(is_feasible(mining_score(&ctx, fx.unit("u"), 11).score));
    }

    #[test]
    fn test_lighter_enemy_on_cell_is_infeasible() {
        let fx = Fixture::new(
            9,
            vec![100.0; 81],
            vec![
                PlayerObservation::new(0.0).with_unit("u", 10, 50.0),
                PlayerObservation::new(0.0)
                    .with_unit("light", 30, 10.0)
                    .with_unit("heavy", 50, 90.0),
            ],
        );
        let ctx = fx.ctx();
        let unit = fx.unit("u");
        assert!(!is_feasible(mining_score(&ctx, unit, 30).score));
        assert!(is_feasible(mining_score(&ctx, unit, 50).score));
    }

    #[test]
    fn test_return_score() {
        let fx = Fixture::new(
            9,
            vec![0.0; 81],
            vec![
                PlayerObservation::new(0.0)
                    .with_base("home", 0)
                    .with_unit("full", 2, 300.0)
                    .with_unit("empty", 3, 0.0),
            ],
        );
        let ctx = fx.ctx();
        let full = fx.unit("full");
        assert!(return_score(&ctx, full, 0, 0) > return_score(&ctx, full, 0, 1));
        assert!((return_score(&ctx, full, 0, 0) - 100.0).abs() < 1e-9);
        assert!(!is_feasible(return_score(&ctx, fx.unit("empty"), 0, 0)));
    }
}
