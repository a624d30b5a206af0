//! Normalised per-turn board snapshot.

use tracing::warn;

use crate::game::{GameConfig, Observation};
use crate::spatial::Cell;

/// Index of a player in the observation's player list.
pub type PlayerId = usize;

/// A mobile unit on the board.
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    /// Host-assigned identifier.
    pub id: String,
    /// Owning player.
    pub owner: PlayerId,
    /// Current cell.
    pub cell: Cell,
    /// Resource carried.
    pub cargo: f64,
}

/// A base (drop-off and spawn point).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Base {
    /// Host-assigned identifier.
    pub id: String,
    /// Owning player.
    pub owner: PlayerId,
    /// Cell the base occupies.
    pub cell: Cell,
}

/// Snapshot of the board for a single turn.
///
/// Units and bases are ordered by owner, then by id, so every iteration
/// over them is deterministic.
#[derive(Debug, Clone)]
pub struct Board {
    /// Player the engine controls.
    pub me: PlayerId,
    /// Turn index.
    pub step: u32,
    /// Board edge length.
    pub size: usize,
    /// Resource per cell.
    pub halite: Vec<f64>,
    /// Treasury per player.
    pub treasury: Vec<f64>,
    /// All units on the board.
    pub units: Vec<Unit>,
    /// All bases on the board.
    pub bases: Vec<Base>,
    /// Unit index per cell.
    unit_at: Vec<Option<usize>>,
    /// Base index per cell.
    base_at: Vec<Option<usize>>,
}

impl Board {
    /// Build a snapshot from a host observation.
    ///
    /// Entries referring to cells outside the board are dropped, a short
    /// resource vector is zero-padded, and negative or non-finite amounts
    /// are read as zero. This never fails.
    #[must_use]
    pub fn from_observation(obs: &Observation, config: &GameConfig) -> Self {
        let cells = config.cell_count();

        let mut halite: Vec<f64> = obs
            .halite
            .iter()
            .take(cells)
            .map(|&h| sanitize(h))
            .collect();
        if halite.len() < cells {
            warn!(
                got = halite.len(),
                expected = cells,
                "resource vector too short, padding with zeros"
            );
            halite.resize(cells, 0.0);
        }

        let mut treasury = Vec::with_capacity(obs.players.len());
        let mut units = Vec::new();
        let mut bases = Vec::new();

        for (owner, player) in obs.players.iter().enumerate() {
            treasury.push(sanitize(player.treasury()));

            for (id, &cell) in player.bases() {
                if cell >= cells {
                    warn!(base = %id, cell, "base outside the board, ignoring");
                    continue;
                }
                bases.push(Base {
                    id: id.clone(),
                    owner,
                    cell,
                });
            }

            for (id, &(cell, cargo)) in player.units() {
                if cell >= cells {
                    warn!(unit = %id, cell, "unit outside the board, ignoring");
                    continue;
                }
                units.push(Unit {
                    id: id.clone(),
                    owner,
                    cell,
                    cargo: sanitize(cargo),
                });
            }
        }

        let mut unit_at = vec![None; cells];
        for (idx, unit) in units.iter().enumerate() {
            // First unit wins if the host reports a stacked cell
            if unit_at[unit.cell].is_none() {
                unit_at[unit.cell] = Some(idx);
            }
        }
        let mut base_at = vec![None; cells];
        for (idx, base) in bases.iter().enumerate() {
            if base_at[base.cell].is_none() {
                base_at[base.cell] = Some(idx);
            }
        }

        Self {
            me: obs.player,
            step: obs.step,
            size: config.size,
            halite,
            treasury,
            units,
            bases,
            unit_at,
            base_at,
        }
    }

    /// Number of players in the observation.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.treasury.len()
    }

    /// Whether the controlled player appears in the observation.
    #[must_use]
    pub fn has_me(&self) -> bool {
        self.me < self.player_count()
    }

    /// Treasury of the controlled player (zero if absent).
    #[must_use]
    pub fn my_treasury(&self) -> f64 {
        self.treasury.get(self.me).copied().unwrap_or(0.0)
    }

    /// Unit occupying a cell, if any.
    #[must_use]
    pub fn unit_at(&self, cell: Cell) -> Option<&Unit> {
        self.unit_at
            .get(cell)
            .copied()
            .flatten()
            .map(|idx| &self.units[idx])
    }

    /// Base occupying a cell, if any.
    #[must_use]
    pub fn base_at(&self, cell: Cell) -> Option<&Base> {
        self.base_at
            .get(cell)
            .copied()
            .flatten()
            .map(|idx| &self.bases[idx])
    }

    /// Units owned by the controlled player.
    pub fn own_units(&self) -> impl Iterator<Item = &Unit> {
        let me = self.me;
        self.units.iter().filter(move |u| u.owner == me)
    }

    /// Units owned by any other player.
    pub fn enemy_units(&self) -> impl Iterator<Item = &Unit> {
        let me = self.me;
        self.units.iter().filter(move |u| u.owner != me)
    }

    /// Bases owned by the controlled player.
    pub fn own_bases(&self) -> impl Iterator<Item = &Base> {
        let me = self.me;
        self.bases.iter().filter(move |b| b.owner == me)
    }

    /// Bases owned by any other player.
    pub fn enemy_bases(&self) -> impl Iterator<Item = &Base> {
        let me = self.me;
        self.bases.iter().filter(move |b| b.owner != me)
    }

    /// Turns left including the current one.
    #[must_use]
    pub fn turns_remaining(&self, config: &GameConfig) -> usize {
        config.episode_steps.saturating_sub(self.step) as usize
    }
}

/// Negative, NaN and infinite amounts read as zero.
fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
