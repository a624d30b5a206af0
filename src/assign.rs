//! Rectangular optimal assignment.
//!
//! Every role group builds a [`ScoreMatrix`] (rows = units, columns =
//! candidate targets) and hands it to [`solve`], which returns the matching
//! that maximises total utility. Infeasible pairs hold [`SENTINEL`]; a row
//! that can only be matched through a sentinel entry comes back unassigned
//! and the caller falls back to its safe default.
//!
//! The heavy lifting is the Kuhn-Munkres implementation from `pathfinding`,
//! which needs integer weights and no more rows than columns. Scores are
//! fixed-point scaled and wide matrices are transposed before solving.

// Scores are clamped to ±1e9 before scaling: 1e15 per entry, well inside i64
#![allow(clippy::cast_possible_truncation)]

use pathfinding::kuhn_munkres::kuhn_munkres;
use pathfinding::matrix::Matrix;

/// Utility of an infeasible pair.
pub const SENTINEL: f64 = -1.0e9;

/// Fixed-point scale applied before solving.
///
/// Utilities closer than `0.5 / SCALE` round to the same weight and are
/// treated as ties. The sentinel scales to 1e15, which still leaves room
/// for thousands of rows before a row sum could overflow.
const SCALE: f64 = 1_000_000.0;

/// Dense utility matrix for one assignment call.
#[derive(Debug, Clone)]
pub struct ScoreMatrix {
    /// Number of rows (units).
    rows: usize,
    /// Number of columns (targets).
    cols: usize,
    /// Row-major utilities.
    data: Vec<f64>,
}

impl ScoreMatrix {
    /// A matrix with every pair infeasible.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![SENTINEL; rows * cols],
        }
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Utility of (row, col).
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    /// Set a utility; non-finite values and anything below the sentinel become the sentinel.
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.cols + col] = if value.is_finite() {
            value.clamp(SENTINEL, -SENTINEL)
        } else {
            SENTINEL
        };
    }

    /// Whether (row, col) is admissible.
    #[must_use]
    pub fn is_feasible(&self, row: usize, col: usize) -> bool {
        is_feasible(self.get(row, col))
    }
}

/// Anything within half of the sentinel counts as forbidden.
#[must_use]
pub fn is_feasible(score: f64) -> bool {
    score > SENTINEL * 0.5
}

fn weight(score: f64) -> i64 {
    (score * SCALE).round() as i64
}

/// Solve the assignment, returning the matched column per row.
///
/// Deterministic for identical matrices. Rows left without a feasible
/// column are `None`.
#[must_use]
pub fn solve(matrix: &ScoreMatrix) -> Vec<Option<usize>> {
    let (rows, cols) = (matrix.rows, matrix.cols);
    let mut result = vec![None; rows];
    if rows == 0 || cols == 0 {
        return result;
    }

    if rows <= cols {
        let mut weights = Matrix::new(rows, cols, 0i64);
        for r in 0..rows {
            for c in 0..cols {
                weights[(r, c)] = weight(matrix.get(r, c));
            }
        }
        let (_, assignment) = kuhn_munkres(&weights);
        for (r, &c) in assignment.iter().enumerate() {
            result[r] = Some(c);
        }
    } else {
        // More units than targets: solve the transpose so each target picks a unit
        let mut weights = Matrix::new(cols, rows, 0i64);
        for r in 0..rows {
            for c in 0..cols {
                weights[(c, r)] = weight(matrix.get(r, c));
            }
        }
        let (_, assignment) = kuhn_munkres(&weights);
        for (c, &r) in assignment.iter().enumerate() {
            result[r] = Some(c);
        }
    }

    for (r, slot) in result.iter_mut().enumerate() {
        if let Some(c) = *slot {
            if !matrix.is_feasible(r, c) {
                *slot = None;
            }
        }
    }
    result
}

/// Total utility of an assignment (feasible pairs only).
#[must_use]
pub fn total_score(matrix: &ScoreMatrix, assignment: &[Option<usize>]) -> f64 {
    assignment
        .iter()
        .enumerate()
        .filter_map(|(r, c)| c.map(|c| matrix.get(r, c)))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_rows(rows: &[&[f64]]) -> ScoreMatrix {
        let mut m = ScoreMatrix::new(rows.len(), rows[0].len());
        for (r, row) in rows.iter().enumerate() {
            for (c, &v) in row.iter().enumerate() {
                m.set(r, c, v);
            }
        }
        m
    }

    #[test]
    fn test_square_picks_best_permutation() {
        let m = from_rows(&[&[1.0, 9.0, 1.0], &[9.0, 1.0, 1.0], &[1.0, 1.0, 9.0]]);
        assert_eq!(solve(&m), vec![Some(1), Some(0), Some(2)]);
        assert!((total_score(&m, &solve(&m)) - 27.0).abs() < 1e-9);
    }

    #[test]
    fn test_greedy_is_not_optimal() {
        // Greedy row 0 → col 0 would give 10 + 1; optimum is 8 + 8
        let m = from_rows(&[&[10.0, 8.0], &[8.0, 1.0]]);
        assert_eq!(solve(&m), vec![Some(1), Some(0)]);
    }

    #[test]
    fn test_wide_matrix() {
        let m = from_rows(&[&[0.0, 5.0, 1.0, 2.0]]);
        assert_eq!(solve(&m), vec![Some(1)]);
    }

    #[test]
    fn test_tall_matrix_leaves_rows_unassigned() {
        let m = from_rows(&[&[1.0], &[7.0], &[3.0]]);
        assert_eq!(solve(&m), vec![None, Some(0), None]);
    }

    #[test]
    fn test_sentinel_row_is_unassigned() {
        let m = from_rows(&[&[SENTINEL, SENTINEL], &[4.0, 2.0]]);
        let result = solve(&m);
        assert_eq!(result[0], None);
        assert_eq!(result[1], Some(0));
    }

    #[test]
    fn test_non_finite_becomes_sentinel() {
        let mut m = ScoreMatrix::new(1, 2);
        m.set(0, 0, f64::NAN);
        m.set(0, 1, f64::INFINITY);
        assert!(!m.is_feasible(0, 0));
        assert!(!m.is_feasible(0, 1));
        assert_eq!(solve(&m), vec![None]);
    }

    #[test]
    fn test_empty() {
        assert!(solve(&ScoreMatrix::new(0, 3)).is_empty());
        assert_eq!(solve(&ScoreMatrix::new(2, 0)), vec![None, None]);
    }

    #[test]
    fn test_deterministic() {
        let m = from_rows(&[&[1.0, 1.0, 1.0], &[1.0, 1.0, 1.0], &[1.0, 1.0, 1.0]]);
        assert_eq!(solve(&m), solve(&m));
    }

    #[test]
    fn test_small_utility_gaps_are_not_ties() {
        let m = from_rows(&[&[0.0002, 0.0], &[0.0, 0.0]]);
        assert_eq!(solve(&m), vec![Some(0), Some(1)]);
        let flipped = from_rows(&[&[0.0, 0.0002], &[0.0, 0.0]]);
        assert_eq!(solve(&flipped), vec![Some(1), Some(0)]);
    }
}
