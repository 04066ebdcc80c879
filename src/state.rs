use serde::Deserialize;

use crate::error::SimError;

pub const MAX_ROWS: usize = 1080;
pub const MAX_COLS: usize = 1920;

/// Shape of the initial radial bump.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadialProfile {
    /// Spread control: smaller is wider.
    pub beta: f64,
    /// Peak value at the grid center.
    pub amplitude: f64,
}

impl Default for RadialProfile {
    fn default() -> Self {
        Self {
            beta: 1e-4,
            amplitude: 255.0,
        }
    }
}

/// Initial temperature field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InitMode {
    Zeros,
    Radial(RadialProfile),
}

/// Configuration-facing init selector; the radial profile is filled in
/// from the physics parameters at reset time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitKind {
    Zeros,
    #[default]
    Radial,
}

impl InitKind {
    pub fn toggle(self) -> Self {
        match self {
            InitKind::Zeros => InitKind::Radial,
            InitKind::Radial => InitKind::Zeros,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            InitKind::Zeros => "zeros",
            InitKind::Radial => "radial",
        }
    }
}

/// Row-major temperature field.
#[derive(Clone, Debug)]
pub struct Grid {
    rows: usize,
    cols: usize,
    pub(crate) cells: Vec<f64>,
    /// Pre-step copy of `cells`, reused by the snapshot stepper.
    pub(crate) scratch: Vec<f64>,
}

/// Fast index for cells where row/col are known to be in bounds.
#[inline(always)]
pub const fn idx_inner(row: usize, col: usize, cols: usize) -> usize {
    row * cols + col
}

impl Grid {
    /// Build a `rows x cols` grid in the requested initial state.
    pub fn initialize(rows: usize, cols: usize, mode: InitMode) -> Result<Self, SimError> {
        if !(1..=MAX_ROWS).contains(&rows) || !(1..=MAX_COLS).contains(&cols) {
            return Err(SimError::InvalidDimensions { rows, cols });
        }

        let size = rows * cols;
        let mut cells = vec![0.0; size];

        if let InitMode::Radial(RadialProfile { beta, amplitude }) = mode {
            let mid_x = (cols / 2) as f64;
            let mid_y = (rows / 2) as f64;
            for i in 0..rows {
                let dy = i as f64 - mid_y;
                for j in 0..cols {
                    let dx = j as f64 - mid_x;
                    cells[idx_inner(i, j, cols)] = amplitude * (-beta * (dy * dy + dx * dx)).exp();
                }
            }
        }

        Ok(Self {
            rows,
            cols,
            cells,
            scratch: vec![0.0; size],
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Flat row-major view of all cells.
    pub fn cells(&self) -> &[f64] {
        &self.cells
    }

    #[cfg(test)]
    pub(crate) fn get(&self, row: usize, col: usize) -> f64 {
        self.cells[idx_inner(row, col, self.cols)]
    }

    /// True when the signed `(row, col)` lies inside the grid.
    pub fn in_bounds(&self, row: i64, col: i64) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.rows && (col as usize) < self.cols
    }

    /// Sum of all cell values (total heat).
    pub fn total_heat(&self) -> f64 {
        self.cells.iter().sum()
    }

    /// Largest cell value.
    pub fn peak(&self) -> f64 {
        self.cells.iter().copied().fold(0.0, f64::max)
    }

    #[cfg(test)]
    pub(crate) fn set(&mut self, row: usize, col: usize, value: f64) {
        self.cells[idx_inner(row, col, self.cols)] = value;
    }

    #[cfg(test)]
    pub(crate) fn filled(rows: usize, cols: usize, value: f64) -> Self {
        let mut grid = Self::initialize(rows, cols, InitMode::Zeros).unwrap();
        grid.cells.fill(value);
        grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_zeros_all_zero() {
        let grid = Grid::initialize(12, 17, InitMode::Zeros).unwrap();
        assert_eq!(grid.rows(), 12);
        assert_eq!(grid.cols(), 17);
        assert_eq!(grid.cells().len(), 12 * 17);
        assert!(grid.cells().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_invalid_dimensions() {
        for (rows, cols) in [(0, 10), (1081, 10), (10, 0), (10, 1921)] {
            let err = Grid::initialize(rows, cols, InitMode::Zeros).unwrap_err();
            assert_eq!(err, SimError::InvalidDimensions { rows, cols });
        }
    }

    #[test]
    fn test_extreme_valid_dimensions() {
        assert!(Grid::initialize(1, 1, InitMode::Zeros).is_ok());
        assert!(Grid::initialize(MAX_ROWS, MAX_COLS, InitMode::Zeros).is_ok());
    }

    #[test]
    fn test_radial_peak_at_center() {
        let grid = Grid::initialize(9, 14, InitMode::Radial(RadialProfile::default())).unwrap();
        // midY = 4, midX = 7
        assert_eq!(grid.get(4, 7), 255.0);
        assert!(grid.get(0, 0) < 255.0);
        assert!((grid.peak() - 255.0).abs() < 1e-12);
    }

    #[test]
    fn test_radial_matches_formula() {
        let profile = RadialProfile { beta: 0.01, amplitude: 100.0 };
        let grid = Grid::initialize(5, 5, InitMode::Radial(profile)).unwrap();
        // (0, 0) is at squared distance 8 from (2, 2)
        let expected = 100.0 * (-0.01_f64 * 8.0).exp();
        assert!((grid.get(0, 0) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_radial_wider_with_smaller_beta() {
        let narrow = Grid::initialize(21, 21, InitMode::Radial(RadialProfile { beta: 0.1, amplitude: 1.0 })).unwrap();
        let wide = Grid::initialize(21, 21, InitMode::Radial(RadialProfile { beta: 0.001, amplitude: 1.0 })).unwrap();
        assert!(wide.get(0, 0) > narrow.get(0, 0));
    }

    #[test]
    fn test_in_bounds() {
        let grid = Grid::initialize(3, 4, InitMode::Zeros).unwrap();
        assert!(grid.in_bounds(0, 0));
        assert!(grid.in_bounds(2, 3));
        assert!(!grid.in_bounds(-1, 0));
        assert!(!grid.in_bounds(0, -1));
        assert!(!grid.in_bounds(3, 0));
        assert!(!grid.in_bounds(0, 4));
    }

    #[test]
    fn test_init_kind_toggle() {
        assert_eq!(InitKind::Radial.toggle(), InitKind::Zeros);
        assert_eq!(InitKind::Zeros.toggle(), InitKind::Radial);
        assert_eq!(InitKind::default(), InitKind::Radial);
    }

    proptest! {
        #[test]
        fn zeros_for_all_valid_dims(rows in 1usize..=64, cols in 1usize..=64) {
            let grid = Grid::initialize(rows, cols, InitMode::Zeros).unwrap();
            prop_assert!(grid.cells().iter().all(|&v| v == 0.0));
        }

        #[test]
        fn radial_peaks_and_decays(
            rows in 1usize..=40,
            cols in 1usize..=40,
            beta in 1e-6f64..1.0,
            amplitude in 0.0f64..1000.0,
        ) {
            let grid = Grid::initialize(rows, cols, InitMode::Radial(RadialProfile { beta, amplitude })).unwrap();
            let (mid_y, mid_x) = (rows / 2, cols / 2);
            prop_assert_eq!(grid.get(mid_y, mid_x), amplitude);

            let mut by_distance: Vec<(i64, f64)> = Vec::with_capacity(rows * cols);
            for i in 0..rows {
                for j in 0..cols {
                    let dy = i as i64 - mid_y as i64;
                    let dx = j as i64 - mid_x as i64;
                    by_distance.push((dy * dy + dx * dx, grid.get(i, j)));
                }
            }
            by_distance.sort_by_key(|&(d, _)| d);
            for pair in by_distance.windows(2) {
                if pair[1].0 > pair[0].0 {
                    prop_assert!(pair[1].1 <= pair[0].1);
                }
            }
        }
    }
}
