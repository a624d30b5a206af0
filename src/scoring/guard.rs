//! Border and shipyard guard positioning.

#![allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]

use crate::assign::SENTINEL;
use crate::game::{PlayerId, Unit};
use crate::scoring::ScoreContext;
use crate::spatial::{Cell, SpatialIndex};

/// Cells of `player`'s region that touch a cell outside it, in index order.
#[must_use]
pub fn border_cells(
    spatial: &SpatialIndex,
    region: &[Option<PlayerId>],
    player: PlayerId,
) -> Vec<Cell> {
    (0..spatial.cell_count())
        .filter(|&cell| region[cell] == Some(player))
        .filter(|&cell| {
            spatial
                .neighbours(cell)
                .iter()
                .any(|&n| region[n] != Some(player))
        })
        .collect()
}

/// Utility of `unit` holding border `cell`.
///
/// Decays with travel distance and grows where our territorial dominance
/// is negative, i.e. where the border is actually contested.
#[must_use]
pub fn border_score(ctx: &ScoreContext<'_>, unit: &Unit, cell: Cell) -> f64 {
    let params = ctx.params;
    let distance = ctx.spatial.distance(unit.cell, cell);
    let contested = (-ctx.maps.medium_at(ctx.me(), cell)).max(0.0);
    params.guard_border_weight
        * params.guard_distance_decay.powi(distance as i32)
        * (1.0 + params.guard_dominance_weight * contested)
}

/// Utility of sending a unit at `from` to defend the base at `base`.
///
/// Nearer is better; a unit that cannot arrive before the threat at
/// `threat_distance` is useless.
#[must_use]
pub fn shipyard_guard_score(
    spatial: &SpatialIndex,
    from: Cell,
    base: Cell,
    threat_distance: usize,
) -> f64 {
    let distance = spatial.distance(from, base);
    if distance > threat_distance {
        SENTINEL
    } else {
        -(distance as f64)
    }
}
