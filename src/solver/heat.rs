use crate::state::{Grid, idx_inner};

/// Cell plus its four cardinal neighbours, as (d_row, d_col).
const PLUS: [(i64, i64); 5] = [(0, 0), (-1, 0), (1, 0), (0, -1), (0, 1)];

/// Add `amount` to the cell at (row, col) and to each in-bounds cardinal
/// neighbour. Out-of-bounds targets are ignored. No upper clamp.
pub fn inject(grid: &mut Grid, row: i64, col: i64, amount: f64) {
    if !grid.in_bounds(row, col) {
        return;
    }
    let cols = grid.cols();
    for (dr, dc) in PLUS {
        let (r, c) = (row + dr, col + dc);
        if grid.in_bounds(r, c) {
            grid.cells[idx_inner(r as usize, c as usize, cols)] += amount;
        }
    }
}
