//! Mining and return assignment.

use tracing::{debug, warn};

use crate::assign::{SENTINEL, ScoreMatrix, solve};
use crate::engine::{Target, Turn};
use crate::game::Unit;
use crate::roles::Role;
use crate::scoring::{cell_value, mining_score, return_score};
use crate::spatial::Cell;

/// A column of the mining matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    /// Mine this cell.
    Mine(Cell),
    /// Deliver to this base in this arrival slot.
    Return(Cell, usize),
}

impl<'a> Turn<'a> {
    /// Richest cells worth sending a miner to, best first.
    ///
    /// Keeps at least one candidate per row so every miner has somewhere
    /// to go when the board is rich enough.
    fn mining_candidates(&self, rows: usize) -> Vec<Cell> {
        let ctx = &self.ctx;
        let mut cells: Vec<(Cell, f64)> = (0..ctx.spatial.cell_count())
            .filter(|&cell| ctx.board.base_at(cell).is_none())
            .filter(|&cell| ctx.board.halite[cell] >= ctx.params.min_mining_halite)
            .map(|cell| (cell, cell_value(ctx, cell)))
            .collect();
        cells.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        cells.truncate(ctx.params.mining_candidates.max(rows));
        cells.into_iter().map(|(cell, _)| cell).collect()
    }

    /// Match miners and returners to cells and base arrival slots.
    pub(super) fn mine(&mut self) {
        let rows: Vec<&'a Unit> = self.units_with(&[Role::Mining, Role::Returning]);
        if rows.is_empty() {
            return;
        }

        let mut columns: Vec<Column> = self
            .mining_candidates(rows.len())
            .into_iter()
            .map(Column::Mine)
            .collect();
        // Every row must be able to reach some base, so slots never run out
        let slots = self.ctx.params.return_slots.max(rows.len());
        let bases: Vec<Cell> = self.ctx.board.own_bases().map(|b| b.cell).collect();
        for &base in &bases {
            for slot in 0..slots {
                columns.push(Column::Return(base, slot));
            }
        }
        if columns.is_empty() {
            for unit in &rows {
                warn!(unit = %unit.id, "no mining target available");
                self.targets.insert(unit.id.clone(), Target::Hold);
            }
            return;
        }

        let mut dwell = vec![vec![1; columns.len()]; rows.len()];
        let mut matrix = ScoreMatrix::new(rows.len(), columns.len());
        for (r, unit) in rows.iter().enumerate() {
            let returning = self.role(&unit.id) == Some(Role::Returning);
            for (c, &column) in columns.iter().enumerate() {
                let score = match column {
                    Column::Mine(_) if returning => SENTINEL,
                    Column::Mine(cell) => {
                        let estimate = mining_score(&self.ctx, unit, cell);
                        dwell[r][c] = estimate.dwell;
                        estimate.score
                    }
                    Column::Return(base, slot) => return_score(&self.ctx, unit, base, slot),
                };
                matrix.set(r, c, score);
            }
        }

        let mut unassigned = 0;
        for (r, (unit, col)) in rows.iter().zip(solve(&matrix)).enumerate() {
            let target = match col.map(|c| (c, columns[c])) {
                Some((c, Column::Mine(cell))) => {
                    self.dwell.insert(unit.id.clone(), dwell[r][c]);
                    Target::Mine(cell)
                }
                Some((_, Column::Return(base, slot))) => Target::Return { base, slot },
                None => {
                    warn!(unit = %unit.id, "no feasible mining target, holding");
                    unassigned += 1;
                    Target::Hold
                }
            };
            self.targets.insert(unit.id.clone(), target);
        }
        debug!(
            rows = rows.len(),
            columns = columns.len(),
            unassigned,
            "mining assigned"
        );
    }
}
