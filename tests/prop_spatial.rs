//! Property-based tests for board geometry, blurring and assignment.
//!
//! Run with: cargo test --release prop_spatial

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use proptest::prelude::*;

use harvester::assign::{ScoreMatrix, solve};
use harvester::influence::blur_periodic;
use harvester::roles::{RoleInput, classify_fleet};
use harvester::{Params, SpatialIndex};

/// A board size and two cells on it.
fn board_and_cells() -> impl Strategy<Value = (usize, usize, usize, usize)> {
    (1usize..=24).prop_flat_map(|n| (Just(n), 0..n * n, 0..n * n, 0..n * n))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2000))]

    /// Toroidal distance is a bounded metric.
    #[test]
    fn prop_distance_is_a_metric((n, a, b, c) in board_and_cells()) {
        let spatial = SpatialIndex::new(n);
        prop_assert_eq!(spatial.distance(a, a), 0);
        prop_assert_eq!(spatial.distance(a, b), spatial.distance(b, a));
        prop_assert!(spatial.distance(a, b) <= spatial.max_distance());
        prop_assert!(
            spatial.distance(a, c) <= spatial.distance(a, b) + spatial.distance(b, c)
        );
        if a != b {
            prop_assert!(spatial.distance(a, b) > 0);
        }
    }

    /// Every navigation step shortens the trip by exactly one.
    #[test]
    fn prop_directions_are_minimal((n, a, b, _c) in board_and_cells()) {
        let spatial = SpatialIndex::new(n);
        let dirs = spatial.directions(a, b);
        let d = spatial.distance(a, b);
        prop_assert_eq!(dirs.is_empty(), d == 0);
        prop_assert!(dirs.len() <= 2);
        for dir in dirs.iter() {
            let next = spatial.neighbour(a, dir);
            prop_assert_eq!(spatial.distance(next, b) + 1, d);
        }
    }

    /// Radius queries agree with the distance table.
    #[test]
    fn prop_within_matches_distance((n, a, _b, _c) in board_and_cells(), r in 0usize..6) {
        let spatial = SpatialIndex::new(n);
        let near = spatial.within(a, r);
        let expected = (0..n * n).filter(|&c| spatial.distance(a, c) <= r).count();
        prop_assert_eq!(near.len(), expected);
        prop_assert!(near.iter().all(|&c| spatial.distance(a, c) <= r));
    }

    /// Periodic blur neither creates nor destroys mass.
    #[test]
    fn prop_blur_preserves_mass(
        n in 1usize..=16,
        sigma in 0.0f64..4.0,
        seed in prop::collection::vec(0.0f64..500.0, 256),
    ) {
        let field: Vec<f64> = seed.into_iter().take(n * n).collect();
        let blurred = blur_periodic(&field, n, sigma);
        prop_assert_eq!(blurred.len(), field.len());
        let before: f64 = field.iter().sum();
        let after: f64 = blurred.iter().sum();
        prop_assert!((before - after).abs() <= 1e-6 * before.max(1.0));
        prop_assert!(blurred.iter().all(|v| *v >= -1e-9));
    }

    /// A planted permutation of dominant scores is always recovered.
    #[test]
    fn prop_assignment_recovers_planted_permutation(
        perm in (1usize..=12).prop_flat_map(|n| Just((0..n).collect::<Vec<_>>()).prop_shuffle()),
        noise in prop::collection::vec(0.0f64..1.0, 144),
    ) {
        let n = perm.len();
        let mut matrix = ScoreMatrix::new(n, n);
        for r in 0..n {
            for c in 0..n {
                matrix.set(r, c, noise[r * 12 + c]);
            }
            matrix.set(r, perm[r], 100.0);
        }
        let assignment = solve(&matrix);
        let expected: Vec<Option<usize>> = perm.iter().map(|&c| Some(c)).collect();
        prop_assert_eq!(assignment, expected);
    }

    /// Surplus columns never leave a row unmatched when every pair is feasible.
    #[test]
    fn prop_assignment_covers_rows(rows in 1usize..=8, extra in 0usize..=8) {
        let cols = rows + extra;
        let mut matrix = ScoreMatrix::new(rows, cols);
        for r in 0..rows {
            for c in 0..cols {
                matrix.set(r, c, ((r * 7 + c * 3) % 11) as f64);
            }
        }
        let assignment = solve(&matrix);
        prop_assert_eq!(assignment.len(), rows);
        let mut used: Vec<usize> = assignment.iter().map(|c| c.unwrap()).collect();
        used.sort_unstable();
        used.dedup();
        prop_assert_eq!(used.len(), rows);
    }

    /// Classification yields exactly one role per unit id.
    #[test]
    fn prop_every_unit_gets_one_role(
        cargo in prop::collection::vec(0.0f64..2000.0, 0..40),
        turns in 0usize..400,
    ) {
        let params = Params::default();
        let ids: Vec<String> = (0..cargo.len()).map(|i| format!("u{i}")).collect();
        let roles = classify_fleet(
            ids.iter().zip(&cargo).map(|(id, &cargo)| {
                (
                    id.as_str(),
                    RoleInput {
                        cargo,
                        turns_remaining: turns,
                        base_distance: Some(3),
                        construction: None,
                    },
                )
            }),
            &params,
        );
        prop_assert_eq!(roles.len(), ids.len());
        prop_assert!(ids.iter().all(|id| roles.contains_key(id)));
    }
}
