//! Extended Dancing-Links exact-cover solver.
//!
//! Implements Knuth's Algorithm X with two extensions the placement-to-cover
//! translation needs: each column carries a `[min, max]` range instead of a
//! fixed "exactly one" requirement, and a column with `min == 0` is
//! *optional* — it never drives branching, but still bounds how many
//! selected rows may touch it.
//!
//! Rather than literal `up`/`down`/`left`/`right` node pointers, this uses a
//! sparse-matrix arena: one `BTreeSet<row>` of live rows per column, mutated
//! in place during search and restored via an undo log on backtrack. This is
//! the array-index analogue of Knuth's pointer dance (see the workspace's
//! design notes on preferring indices over heap pointers for a structure
//! with cyclic back-references).

use std::collections::BTreeSet;

use smallvec::SmallVec;

/// A row's per-column `(need, remaining)` snapshot, taken before `select_row`
/// decrements them, so `undo_to` can restore them exactly. Most rows touch a
/// handful of columns (one piece column plus one voxel column per cell of a
/// placed piece), so this stays on the stack for any piece under 8 voxels.
type Snapshot = SmallVec<[(usize, u32, u32); 8]>;

/// Per-column selection bounds: the number of selected rows touching this
/// column must lie in `[min, max]`. `min == 0` makes the column optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRange {
    /// Minimum number of selected rows that must touch this column.
    pub min: u32,
    /// Maximum number of selected rows that may touch this column.
    pub max: u32,
}

impl ColumnRange {
    /// A column that must be covered by exactly one selected row.
    pub fn exactly_one() -> Self {
        Self { min: 1, max: 1 }
    }

    /// A column that may be covered by at most one selected row, but need
    /// not be covered at all.
    pub fn optional_at_most_one() -> Self {
        Self { min: 0, max: 1 }
    }

    /// Whether this column never forces branching (`min == 0`).
    pub fn is_optional(self) -> bool {
        self.min == 0
    }
}

#[derive(Clone, Copy)]
struct ColumnState {
    need: u32,
    remaining: u32,
}

enum UndoOp {
    RemovedRow(usize),
    Selected {
        row: usize,
        snapshot: Snapshot,
    },
}

/// A sparse exact-cover matrix with ranged columns.
///
/// Construct with [`Matrix::new`], passing each column's `[min, max]` range
/// and each row's list of column indices it touches, then call
/// [`Matrix::solve`] to enumerate every selection of rows that satisfies
/// every column's range.
pub struct Matrix {
    ranges: Vec<ColumnRange>,
    row_columns: Vec<Vec<usize>>,
    column_rows: Vec<BTreeSet<usize>>,
    row_alive: Vec<bool>,
}

impl Matrix {
    /// Builds a matrix from column ranges and row-to-column memberships.
    pub fn new(ranges: Vec<ColumnRange>, row_columns: Vec<Vec<usize>>) -> Self {
        let mut column_rows = vec![BTreeSet::new(); ranges.len()];
        for (row, columns) in row_columns.iter().enumerate() {
            for &c in columns {
                column_rows[c].insert(row);
            }
        }
        let row_alive = vec![true; row_columns.len()];
        Self { ranges, row_columns, column_rows, row_alive }
    }

    /// Number of columns in the matrix.
    pub fn n_columns(&self) -> usize {
        self.ranges.len()
    }

    /// Number of rows in the matrix.
    pub fn n_rows(&self) -> usize {
        self.row_columns.len()
    }

    /// Enumerates every solution: a set of row indices, given as sorted
    /// vectors in selection order, such that every column's selected-row
    /// count lies within its `[min, max]` range.
    ///
    /// Returns the full enumeration; callers that only want the first `n`
    /// solutions should truncate the result (search always explores the
    /// whole tree since nothing here is lazy — acceptable given the
    /// single-threaded, run-to-completion resource model).
    pub fn solve(&mut self) -> Vec<Vec<usize>> {
        let mut states: Vec<ColumnState> = self
            .ranges
            .iter()
            .map(|r| ColumnState { need: r.min, remaining: r.max })
            .collect();
        let mut undo = Vec::new();
        let mut selected = Vec::new();
        let mut solutions = Vec::new();
        self.search(&mut states, &mut undo, &mut selected, &mut solutions);
        solutions
    }

    /// Chooses the minimum-remaining-values branch column: the column with
    /// `need > 0` (not yet satisfied, and not optional-and-done) touched by
    /// the fewest live rows. `None` means every column is satisfied.
    fn choose_branch_column(&self, states: &[ColumnState]) -> Option<usize> {
        (0..states.len())
            .filter(|&c| states[c].need > 0)
            .min_by_key(|&c| self.column_rows[c].len())
    }

    fn search(
        &mut self,
        states: &mut Vec<ColumnState>,
        undo: &mut Vec<UndoOp>,
        selected: &mut Vec<usize>,
        solutions: &mut Vec<Vec<usize>>,
    ) {
        let Some(branch) = self.choose_branch_column(states) else {
            solutions.push(selected.clone());
            return;
        };

        let candidate_rows: Vec<usize> = self.column_rows[branch].iter().copied().collect();
        for row in candidate_rows {
            if !self.row_alive[row] {
                continue;
            }
            let mark = undo.len();
            self.select_row(row, states, undo);
            selected.push(row);
            self.search(states, undo, selected, solutions);
            selected.pop();
            self.undo_to(mark, states, undo);
        }
    }

    /// Marks `row` selected: decrements `need`/`remaining` on every column
    /// it touches, then permanently removes it (and, for any column whose
    /// `remaining` just reached zero, every other row still touching that
    /// column) from further consideration.
    fn select_row(&mut self, row: usize, states: &mut [ColumnState], undo: &mut Vec<UndoOp>) {
        let mut snapshot = Snapshot::with_capacity(self.row_columns[row].len());
        let mut newly_closed = Vec::new();
        for &c in &self.row_columns[row] {
            snapshot.push((c, states[c].need, states[c].remaining));
            if states[c].need > 0 {
                states[c].need -= 1;
            }
            states[c].remaining -= 1;
            if states[c].remaining == 0 {
                newly_closed.push(c);
            }
        }
        undo.push(UndoOp::Selected { row, snapshot });
        self.remove_row(row, undo);

        for c in newly_closed {
            let rows: Vec<usize> = self.column_rows[c].iter().copied().collect();
            for s in rows {
                self.remove_row(s, undo);
            }
        }
    }

    /// Removes `row` from every column's live-row set without touching any
    /// column's `need`/`remaining` — used both for the chosen row itself
    /// and for rows made infeasible by a column closing.
    fn remove_row(&mut self, row: usize, undo: &mut Vec<UndoOp>) {
        if !self.row_alive[row] {
            return;
        }
        self.row_alive[row] = false;
        for &c in &self.row_columns[row] {
            self.column_rows[c].remove(&row);
        }
        undo.push(UndoOp::RemovedRow(row));
    }

    fn undo_to(&mut self, mark: usize, states: &mut [ColumnState], undo: &mut Vec<UndoOp>) {
        while undo.len() > mark {
            match undo.pop().expect("loop condition guarantees an element") {
                UndoOp::RemovedRow(row) => {
                    self.row_alive[row] = true;
                    for &c in &self.row_columns[row] {
                        self.column_rows[c].insert(row);
                    }
                }
                UndoOp::Selected { snapshot, .. } => {
                    for (c, need, remaining) in snapshot {
                        states[c].need = need;
                        states[c].remaining = remaining;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_cover_on_tiny_matrix() {
        // 3 columns, all exactly-one. Rows: {0,1}, {1,2}, {0}, {2}.
        // The unique exact cover is {row 2 ({0}), row 1 ({1,2})}.
        let ranges = vec![
            ColumnRange::exactly_one(),
            ColumnRange::exactly_one(),
            ColumnRange::exactly_one(),
        ];
        let rows = vec![vec![0, 1], vec![1, 2], vec![0], vec![2]];
        let mut matrix = Matrix::new(ranges, rows);
        let mut solutions = matrix.solve();
        solutions.iter_mut().for_each(|s| s.sort_unstable());
        solutions.sort();
        assert_eq!(solutions, vec![vec![2, 1]].into_iter().map(|mut v| { v.sort_unstable(); v }).collect::<Vec<_>>());
    }

    #[test]
    fn optional_column_never_branches_but_still_bounds_rows() {
        // Column 0 is optional (0..=1); column 1 requires exactly one.
        // Row 0 covers both; row 1 covers only column 1.
        let ranges = vec![ColumnRange::optional_at_most_one(), ColumnRange::exactly_one()];
        let rows = vec![vec![0, 1], vec![1]];
        let mut matrix = Matrix::new(ranges, rows);
        let mut solutions = matrix.solve();
        solutions.sort();
        assert_eq!(solutions, vec![vec![0], vec![1]]);
    }

    #[test]
    fn range_column_stops_at_minimal_cover() {
        // Column 0 needs between 1 and 2 selected rows; three candidate rows.
        // `search` emits as soon as `need == 0`, so every solution here picks
        // exactly one row (a minimal cover) even though `max` would allow two.
        let ranges = vec![ColumnRange { min: 1, max: 2 }];
        let rows = vec![vec![0], vec![0], vec![0]];
        let mut matrix = Matrix::new(ranges, rows);
        let solutions = matrix.solve();
        assert_eq!(solutions.len(), 3);
        assert!(solutions.iter().all(|s| s.len() == 1));
    }

    #[test]
    fn infeasible_matrix_yields_no_solutions() {
        let ranges = vec![ColumnRange::exactly_one(), ColumnRange::exactly_one()];
        let rows = vec![vec![0]];
        let mut matrix = Matrix::new(ranges, rows);
        assert!(matrix.solve().is_empty());
    }
}
