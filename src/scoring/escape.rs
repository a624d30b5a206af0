//! Escape analysis for enemy units.
//!
//! A cell is unsafe for an enemy when one of our units that can reach it
//! this turn carries no more than the enemy does: a collision there
//! destroys the enemy. The analysis classifies each enemy by the safe
//! cells left in its one-step reachable set.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::game::{Board, Unit};
use crate::spatial::{Direction, SpatialIndex};

/// How much room an enemy unit has to avoid capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Escape {
    /// Every reachable cell is covered.
    Cornered,
    /// Only staying put is safe.
    Pinned,
    /// Exactly one neighbouring cell is safe.
    OneWay(Direction),
    /// Two or more safe cells.
    Free,
}

impl Escape {
    /// Whether the enemy cannot leave its cell safely.
    #[must_use]
    pub const fn is_trapped(self) -> bool {
        matches!(self, Escape::Cornered | Escape::Pinned)
    }
}

/// Lightest own cargo able to reach each cell next turn (`INFINITY` if none).
#[must_use]
pub fn capture_threat(spatial: &SpatialIndex, board: &Board) -> Vec<f64> {
    let mut threat = vec![f64::INFINITY; spatial.cell_count()];
    for unit in board.own_units() {
        for cell in spatial.reachable(unit.cell) {
            threat[cell] = threat[cell].min(unit.cargo);
        }
    }
    threat
}

/// Classify one enemy against a precomputed threat field.
#[must_use]
pub fn escape_status(spatial: &SpatialIndex, threat: &[f64], enemy: &Unit) -> Escape {
    let safe = |cell: usize| threat[cell] > enemy.cargo;

    let stay_safe = safe(enemy.cell);
    let mut exits = Direction::ALL
        .into_iter()
        .filter(|&d| safe(spatial.neighbour(enemy.cell, d)));
    let first = exits.next();
    let more = exits.next().is_some();

    match (stay_safe, first, more) {
        (false, None, _) => Escape::Cornered,
        (true, None, _) => Escape::Pinned,
        (false, Some(dir), false) => Escape::OneWay(dir),
        _ => Escape::Free,
    }
}

/// Escape status of every enemy unit, keyed by unit id.
#[must_use]
pub fn analyse_escapes(spatial: &SpatialIndex, board: &Board) -> BTreeMap<String, Escape> {
    let threat = capture_threat(spatial, board);
    board
        .enemy_units()
        .map(|enemy| (enemy.id.clone(), escape_status(spatial, &threat, enemy)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameConfig, Observation, PlayerObservation};

    fn board(spatial: &SpatialIndex, mine: &[(usize, f64)], enemy_cargo: f64) -> Board {
        let mut me = PlayerObservation::new(0.0);
        for (i, &(cell, cargo)) in mine.iter().enumerate() {
            me = me.with_unit(format!("m{i}"), cell, cargo);
        }
        let obs = Observation {
            player: 0,
            step: 0,
            halite: vec![0.0; spatial.cell_count()],
            players: vec![
                me,
                PlayerObservation::new(0.0).with_unit("prey", spatial.cell(4, 4), enemy_cargo),
            ],
        };
        let config = GameConfig {
            size: spatial.size(),
            ..GameConfig::default()
        };
        Board::from_observation(&obs, &config)
    }

    #[test]
    fn test_surrounded_enemy_is_cornered() {
        let spatial = SpatialIndex::new(9);
        let ring: Vec<_> = spatial
            .neighbours(spatial.cell(4, 4))
            .iter()
            .map(|&c| (c, 10.0))
            .collect();
        let board = board(&spatial, &ring, 100.0);
        let escapes = analyse_escapes(&spatial, &board);
        assert_eq!(escapes.get("prey"), Some(&Escape::Cornered));
    }

    #[test]
    fn test_heavier_hunters_do_not_threaten() {
        let spatial = SpatialIndex::new(9);
        let ring: Vec<_> = spatial
            .neighbours(spatial.cell(4, 4))
            .iter()
            .map(|&c| (c, 500.0))
            .collect();
        let board = board(&spatial, &ring, 100.0);
        assert_eq!(analyse_escapes(&spatial, &board)["prey"], Escape::Free);
    }

    #[test]
    fn test_one_way_out() {
        let spatial = SpatialIndex::new(9);
        // Threaten the cell, north, east and west but leave south open
        let hunters = [
            (spatial.cell(3, 4), 0.0),
            (spatial.cell(4, 5), 0.0),
            (spatial.cell(4, 3), 0.0),
        ];
        let board = board(&spatial, &hunters, 100.0);
        assert_eq!(
            analyse_escapes(&spatial, &board)["prey"],
            Escape::OneWay(Direction::South)
        );
    }

    #[test]
    fn test_pinned_when_only_staying_is_safe() {
        let spatial = SpatialIndex::new(9);
        // Units two steps away cover each neighbour but not the centre
        let hunters = [
            (spatial.cell(2, 4), 0.0),
            (spatial.cell(6, 4), 0.0),
            (spatial.cell(4, 2), 0.0),
            (spatial.cell(4, 6), 0.0),
        ];
        let board = board(&spatial, &hunters, 100.0);
        let status = analyse_escapes(&spatial, &board)["prey"];
        assert_eq!(status, Escape::Pinned);
        assert!(status.is_trapped());
    }
}
