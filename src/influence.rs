//! Influence ("dominance") maps rebuilt from scratch every turn.
//!
//! A dominance field for player P accumulates P's units and bases
//! positively and every opponent's negatively over a radius, then smooths
//! the result with a periodic Gaussian blur. Two variants are kept per
//! player: a small tactical field for local combat safety and a medium
//! territorial field for siting and spawning. Alongside them the engine
//! gets an enemy cargo density, a nearest-base region ownership map and
//! two blurred copies of the resource field.
//!
//! Blurring is separable and sums in a fixed order, so identical inputs
//! produce bit-identical outputs.

// Kernel radii are tiny; the float/int conversions are exact
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]

use crate::game::{Board, PlayerId};
use crate::params::Params;
use crate::spatial::{Cell, SpatialIndex};

/// Normalised 1-D Gaussian kernel covering ±3σ.
///
/// A non-positive sigma yields the identity kernel `[1.0]`.
#[must_use]
pub fn gaussian_kernel(sigma: f64) -> Vec<f64> {
    if sigma <= 0.0 || !sigma.is_finite() {
        return vec![1.0];
    }
    let radius = (3.0 * sigma).ceil() as i64;
    let mut kernel: Vec<f64> = (-radius..=radius)
        .map(|x| {
            let x = x as f64;
            (-(x * x) / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let total: f64 = kernel.iter().sum();
    for w in &mut kernel {
        *w /= total;
    }
    kernel
}

/// Blur an N×N field with wrap-around boundaries.
///
/// The kernel sums to one and every source cell spreads its full weight
/// onto the torus, so total mass is preserved.
#[must_use]
pub fn blur_periodic(field: &[f64], size: usize, sigma: f64) -> Vec<f64> {
    let kernel = gaussian_kernel(sigma);
    if kernel.len() == 1 || size == 0 {
        return field.to_vec();
    }
    let radius = (kernel.len() / 2) as i64;
    let n = size as i64;

    // Horizontal pass
    let mut rows = vec![0.0; field.len()];
    for r in 0..size {
        let line = &field[r * size..(r + 1) * size];
        for c in 0..size {
            let mut acc = 0.0;
            for (k, w) in kernel.iter().enumerate() {
                let src = (c as i64 + k as i64 - radius).rem_euclid(n) as usize;
                acc += w * line[src];
            }
            rows[r * size + c] = acc;
        }
    }

    // Vertical pass
    let mut out = vec![0.0; field.len()];
    for r in 0..size {
        for c in 0..size {
            let mut acc = 0.0;
            for (k, w) in kernel.iter().enumerate() {
                let src = (r as i64 + k as i64 - radius).rem_euclid(n) as usize;
                acc += w * rows[src * size + c];
            }
            out[r * size + c] = acc;
        }
    }
    out
}

/// Raw (unblurred) dominance accumulation for `player`.
///
/// Own units add `unit_weight × (1 + free_capacity)` where free capacity is
/// `(cap - min(cargo, cap)) / cap`, so empty units count double. Own bases
/// add the base weight; opposing units and bases subtract fixed weights.
#[must_use]
pub fn raw_dominance(
    spatial: &SpatialIndex,
    board: &Board,
    player: PlayerId,
    radius: usize,
    params: &Params,
) -> Vec<f64> {
    let mut field = vec![0.0; spatial.cell_count()];
    let cap = params.dominance_cargo_cap.max(1.0);

    for unit in &board.units {
        let contribution = if unit.owner == player {
            let free = (cap - unit.cargo.min(cap)) / cap;
            params.dominance_unit_weight * (1.0 + free)
        } else {
            -params.dominance_enemy_unit_weight
        };
        for &cell in spatial.within(unit.cell, radius) {
            field[cell] += contribution;
        }
    }

    for base in &board.bases {
        let contribution = if base.owner == player {
            params.dominance_base_weight
        } else {
            -params.dominance_enemy_base_weight
        };
        for &cell in spatial.within(base.cell, radius) {
            field[cell] += contribution;
        }
    }

    field
}

/// All per-turn maps.
#[derive(Debug, Clone)]
pub struct InfluenceMaps {
    /// Tactical dominance per player.
    pub small: Vec<Vec<f64>>,
    /// Territorial dominance per player.
    pub medium: Vec<Vec<f64>>,
    /// Blurred cargo carried by units not owned by the controlled player,
    /// used to value prey moving among other loaded enemies.
    pub enemy_cargo: Vec<f64>,
    /// Player whose base is strictly nearest to each cell.
    pub region: Vec<Option<PlayerId>>,
    /// Lightly blurred resource field used in mining value.
    pub resource: Vec<f64>,
    /// Heavily blurred resource field used for long-range siting.
    pub resource_ultra: Vec<f64>,
}

impl InfluenceMaps {
    /// Build every map from the current snapshot.
    #[must_use]
    pub fn build(spatial: &SpatialIndex, board: &Board, params: &Params) -> Self {
        let size = spatial.size();
        let players = board.player_count();

        let small = (0..players)
            .map(|p| {
                let raw = raw_dominance(spatial, board, p, params.small_radius, params);
                blur_periodic(&raw, size, params.small_sigma)
            })
            .collect();
        let medium = (0..players)
            .map(|p| {
                let raw = raw_dominance(spatial, board, p, params.medium_radius, params);
                blur_periodic(&raw, size, params.medium_sigma)
            })
            .collect();

        let mut cargo = vec![0.0; spatial.cell_count()];
        for unit in board.enemy_units() {
            cargo[unit.cell] += unit.cargo;
        }

        Self {
            small,
            medium,
            enemy_cargo: blur_periodic(&cargo, size, params.cargo_sigma),
            region: region_ownership(spatial, board),
            resource: blur_periodic(&board.halite, size, params.resource_sigma),
            resource_ultra: blur_periodic(&board.halite, size, params.ultra_sigma),
        }
    }

    /// Tactical dominance of `player` at `cell` (zero for unknown players).
    #[must_use]
    pub fn small_at(&self, player: PlayerId, cell: Cell) -> f64 {
        self.small.get(player).map_or(0.0, |f| f[cell])
    }

    /// Territorial dominance of `player` at `cell` (zero for unknown players).
    #[must_use]
    pub fn medium_at(&self, player: PlayerId, cell: Cell) -> f64 {
        self.medium.get(player).map_or(0.0, |f| f[cell])
    }
}

/// Coarse territory: the owner of the strictly nearest base per cell.
///
/// Cells equidistant from bases of different players, and every cell on a
/// board without bases, belong to nobody.
#[must_use]
pub fn region_ownership(spatial: &SpatialIndex, board: &Board) -> Vec<Option<PlayerId>> {
    (0..spatial.cell_count())
        .map(|cell| {
            let mut best: Option<(usize, Option<PlayerId>)> = None;
            for base in &board.bases {
                let d = spatial.distance(cell, base.cell);
                best = match best {
                    None => Some((d, Some(base.owner))),
                    Some((bd, _)) if d < bd => Some((d, Some(base.owner))),
                    Some((bd, owner)) if d == bd && owner != Some(base.owner) => Some((bd, None)),
                    keep => keep,
                };
            }
            best.and_then(|(_, owner)| owner)
        })
        .collect()
}
