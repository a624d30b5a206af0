//! Precomputed spatial tables for the toroidal board.
//!
//! Built once per game and read-only afterwards:
//! - Full pairwise wrap-around Manhattan distance table
//! - Shortest-path direction sets for every (source, target) pair
//! - Per-cell neighbour list and cells ordered by distance, so radius
//!   membership is a slice lookup
//!
//! Every table is indexed by [`Cell`], never by raw coordinates.

// Board sizes are bounded by MAX_BOARD_SIZE, so the narrowing casts are lossless
#![allow(clippy::cast_possible_truncation)]

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Row-major cell index on an N×N board.
pub type Cell = usize;

/// A single-step move on the 4-neighbour torus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Row - 1.
    North,
    /// Column + 1.
    East,
    /// Row + 1.
    South,
    /// Column - 1.
    West,
}

impl Direction {
    /// All four directions in index order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Dense index in `0..4`.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::East => 1,
            Direction::South => 2,
            Direction::West => 3,
        }
    }

    /// The reverse move.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// Host command string.
    #[must_use]
    pub const fn host_name(self) -> &'static str {
        match self {
            Direction::North => "NORTH",
            Direction::East => "EAST",
            Direction::South => "SOUTH",
            Direction::West => "WEST",
        }
    }
}

/// Up to two directions, stored as a bitmask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DirectionSet(u8);

impl DirectionSet {
    /// No directions.
    pub const EMPTY: Self = Self(0);

    /// Add a direction.
    pub fn insert(&mut self, dir: Direction) {
        self.0 |= 1 << dir.index();
    }

    /// Check membership.
    #[must_use]
    pub const fn contains(self, dir: Direction) -> bool {
        self.0 & (1 << dir.index()) != 0
    }

    /// Number of directions in the set.
    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// True when source and target coincide.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterate in [`Direction::ALL`] order.
    pub fn iter(self) -> impl Iterator<Item = Direction> {
        Direction::ALL.into_iter().filter(move |d| self.contains(*d))
    }
}

/// Pairwise distance, navigation and radius tables for one board size.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    /// Board edge length.
    size: usize,
    /// Number of cells (size²).
    cells: usize,
    /// `distances[a * cells + b]`.
    distances: Vec<u8>,
    /// `directions[a * cells + b]`.
    directions: Vec<DirectionSet>,
    /// Neighbour per direction index.
    neighbours: Vec<[Cell; 4]>,
    /// For each cell, all cells sorted by (distance, index).
    by_distance: Vec<Cell>,
    /// `radius_end[a * (max_distance + 1) + r]` = cells within radius r.
    radius_end: Vec<u32>,
    /// Largest distance on this board.
    max_distance: usize,
}

impl SpatialIndex {
    /// Build every table for an N×N torus.
    ///
    /// O(N⁴) time and space; rows are filled in parallel. Callers validate
    /// `size` against [`MAX_BOARD_SIZE`](crate::game::MAX_BOARD_SIZE).
    #[must_use]
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        let cells = size * size;
        let max_distance = 2 * (size / 2);

        let neighbours: Vec<[Cell; 4]> = (0..cells)
            .map(|cell| {
                let (row, col) = (cell / size, cell % size);
                let up = (row + size - 1) % size;
                let down = (row + 1) % size;
                let left = (col + size - 1) % size;
                let right = (col + 1) % size;
                [
                    up * size + col,
                    row * size + right,
                    down * size + col,
                    row * size + left,
                ]
            })
            .collect();

        let mut distances = vec![0u8; cells * cells];
        let mut directions = vec![DirectionSet::EMPTY; cells * cells];
        distances
            .par_chunks_mut(cells)
            .zip(directions.par_chunks_mut(cells))
            .enumerate()
            .for_each(|(a, (dist_row, dir_row))| {
                let (ar, ac) = (a / size, a % size);
                for b in 0..cells {
                    let (br, bc) = (b / size, b % size);
                    let (dr, sr) = axis_delta(ar, br, size);
                    let (dc, sc) = axis_delta(ac, bc, size);
                    dist_row[b] = (dr + dc) as u8;

                    let mut set = DirectionSet::EMPTY;
                    match sr {
                        1 => set.insert(Direction::South),
                        -1 => set.insert(Direction::North),
                        _ => {}
                    }
                    match sc {
                        1 => set.insert(Direction::East),
                        -1 => set.insert(Direction::West),
                        _ => {}
                    }
                    dir_row[b] = set;
                }
            });

        let stride = max_distance + 1;
        let mut by_distance = vec![0; cells * cells];
        let mut radius_end = vec![0u32; cells * stride];
        by_distance
            .par_chunks_mut(cells)
            .zip(radius_end.par_chunks_mut(stride))
            .enumerate()
            .for_each(|(a, (order, ends))| {
                let row = &distances[a * cells..(a + 1) * cells];
                for (slot, cell) in order.iter_mut().enumerate() {
                    *cell = slot;
                }
                order.sort_by_key(|&b| (row[b], b));

                // Counting pass: ends[r] = number of cells with distance <= r
                let mut counts = vec![0u32; stride];
                for &d in row {
                    counts[usize::from(d)] += 1;
                }
                let mut running = 0;
                for (r, count) in counts.iter().enumerate() {
                    running += count;
                    ends[r] = running;
                }
            });

        Self {
            size,
            cells,
            distances,
            directions,
            neighbours,
            by_distance,
            radius_end,
            max_distance,
        }
    }

    /// Board edge length.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Number of cells.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.cells
    }

    /// Largest distance between any two cells.
    #[must_use]
    pub const fn max_distance(&self) -> usize {
        self.max_distance
    }

    /// Cell at (row, col), wrapping both coordinates.
    #[must_use]
    pub const fn cell(&self, row: usize, col: usize) -> Cell {
        (row % self.size) * self.size + col % self.size
    }

    /// (row, col) of a cell.
    #[must_use]
    pub const fn row_col(&self, cell: Cell) -> (usize, usize) {
        (cell / self.size, cell % self.size)
    }

    /// Wrap-around Manhattan distance.
    #[must_use]
    #[inline]
    pub fn distance(&self, a: Cell, b: Cell) -> usize {
        usize::from(self.distances[a * self.cells + b])
    }

    /// Directions from `a` that lie on a shortest path to `b`.
    #[must_use]
    #[inline]
    pub fn directions(&self, a: Cell, b: Cell) -> DirectionSet {
        self.directions[a * self.cells + b]
    }

    /// Cell reached by one step.
    #[must_use]
    #[inline]
    pub fn neighbour(&self, cell: Cell, dir: Direction) -> Cell {
        self.neighbours[cell][dir.index()]
    }

    /// All four neighbours in [`Direction::ALL`] order.
    #[must_use]
    #[inline]
    pub fn neighbours(&self, cell: Cell) -> &[Cell; 4] {
        &self.neighbours[cell]
    }

    /// The cell plus its four neighbours (one-step reachable set).
    #[must_use]
    pub fn reachable(&self, cell: Cell) -> [Cell; 5] {
        let n = self.neighbours[cell];
        [cell, n[0], n[1], n[2], n[3]]
    }

    /// Single step (or stay) that takes `from` to the adjacent `to`.
    #[must_use]
    pub fn step_between(&self, from: Cell, to: Cell) -> Option<Option<Direction>> {
        if from == to {
            return Some(None);
        }
        Direction::ALL
            .into_iter()
            .find(|&d| self.neighbour(from, d) == to)
            .map(Some)
    }

    /// Cells within `radius` of `cell`, nearest first.
    #[must_use]
    pub fn within(&self, cell: Cell, radius: usize) -> &[Cell] {
        let stride = self.max_distance + 1;
        let r = radius.min(self.max_distance);
        let end = self.radius_end[cell * stride + r] as usize;
        let start = cell * self.cells;
        &self.by_distance[start..start + end]
    }

    /// Nearest candidate and its distance; ties go to the earliest candidate.
    pub fn nearest(&self, from: Cell, candidates: impl IntoIterator<Item = Cell>) -> Option<(Cell, usize)> {
        let mut best: Option<(Cell, usize)> = None;
        for c in candidates {
            let d = self.distance(from, c);
            if best.is_none_or(|(_, bd)| d < bd) {
                best = Some((c, d));
            }
        }
        best
    }
}

/// Distance along one axis and the sign of the shortest move (+1, -1, 0).
///
/// When both wraps are equally long (even board, half-way apart) the
/// positive direction is chosen.
fn axis_delta(from: usize, to: usize, size: usize) -> (usize, i8) {
    let forward = (to + size - from) % size;
    if forward == 0 {
        return (0, 0);
    }
    let backward = size - forward;
    if forward <= backward {
        (forward, 1)
    } else {
        (backward, -1)
    }
}
