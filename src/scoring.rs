//! Per-role task scorers.
//!
//! Every scorer is a pure function of a unit, a candidate and the shared
//! [`ScoreContext`], returning a finite utility. Infeasible pairs return
//! [`SENTINEL`](crate::assign::SENTINEL) instead of `NaN` or infinity so
//! the assignment solver can treat them as forbidden without special cases.

mod escape;
mod guard;
mod hunting;
mod mining;
mod occupancy;

pub use escape::{Escape, analyse_escapes, capture_threat, escape_status};
pub use guard::{border_cells, border_score, shipyard_guard_score};
pub use hunting::hunt_score;
pub use mining::{MiningEstimate, cell_value, mining_score, return_score};
pub use occupancy::occupancy_score;

use crate::dwell::DwellTable;
use crate::game::{Board, GameConfig, PlayerId};
use crate::influence::InfluenceMaps;
use crate::params::Params;
use crate::spatial::{Cell, SpatialIndex};

/// Read-only inputs shared by every scorer during one turn.
#[derive(Debug)]
pub struct ScoreContext<'a> {
    /// Precomputed board geometry.
    pub spatial: &'a SpatialIndex,
    /// Current snapshot.
    pub board: &'a Board,
    /// This turn's influence maps.
    pub maps: &'a InfluenceMaps,
    /// Optimal dwell lookup.
    pub dwell: &'a DwellTable,
    /// Clamped parameters.
    pub params: &'a Params,
    /// Static game configuration.
    pub config: &'a GameConfig,
    /// Nearest own base per cell.
    nearest_base: Vec<Option<(Cell, usize)>>,
}

impl<'a> ScoreContext<'a> {
    /// Bundle the per-turn inputs and precompute nearest-base distances.
    #[must_use]
    pub fn new(
        spatial: &'a SpatialIndex,
        board: &'a Board,
        maps: &'a InfluenceMaps,
        dwell: &'a DwellTable,
        params: &'a Params,
        config: &'a GameConfig,
    ) -> Self {
        let bases: Vec<Cell> = board.own_bases().map(|b| b.cell).collect();
        let nearest_base = (0..spatial.cell_count())
            .map(|cell| spatial.nearest(cell, bases.iter().copied()))
            .collect();
        Self {
            spatial,
            board,
            maps,
            dwell,
            params,
            config,
            nearest_base,
        }
    }

    /// Controlled player.
    #[must_use]
    pub const fn me(&self) -> PlayerId {
        self.board.me
    }

    /// Nearest own base to `cell` and its distance.
    #[must_use]
    pub fn nearest_base(&self, cell: Cell) -> Option<(Cell, usize)> {
        self.nearest_base.get(cell).copied().flatten()
    }

    /// Distance to the nearest own base, or the configured stand-in when there is none.
    #[must_use]
    pub fn base_distance(&self, cell: Cell) -> usize {
        self.nearest_base(cell)
            .map_or(self.params.no_base_distance, |(_, d)| d)
    }
}
