mod color;

pub use color::temperature_to_rgba;

use crate::error::SimError;
use crate::state::Grid;

/// Flat RGBA pixel buffer paired with its pixel dimensions. Reused across
/// frames; reallocated only when the canvas size or scale changes.
pub struct RenderTarget {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl RenderTarget {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height * 4],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// RGBA bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    #[cfg(test)]
    pub(crate) fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let off = (y * self.width + x) * 4;
        [self.pixels[off], self.pixels[off + 1], self.pixels[off + 2], self.pixels[off + 3]]
    }
}

/// How a `width x height` target divides into `scale x scale` blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockLayout {
    pub full_cells_x: usize,
    pub full_cells_y: usize,
    /// Full blocks plus one partial block when the width has a remainder.
    pub total_cells_x: usize,
    pub total_cells_y: usize,
}

impl BlockLayout {
    /// Returns `None` for a zero scale.
    pub fn compute(width: usize, height: usize, scale: usize) -> Option<Self> {
        if scale == 0 {
            return None;
        }
        let full_cells_x = width / scale;
        let full_cells_y = height / scale;
        Some(Self {
            full_cells_x,
            full_cells_y,
            total_cells_x: full_cells_x + usize::from(width % scale != 0),
            total_cells_y: full_cells_y + usize::from(height % scale != 0),
        })
    }
}

/// Grid dimensions `(rows, cols)` that exactly cover a canvas at `scale`.
pub fn grid_dims_for_canvas(width: usize, height: usize, scale: usize) -> (usize, usize) {
    match BlockLayout::compute(width, height, scale) {
        Some(layout) => (layout.total_cells_y, layout.total_cells_x),
        None => (0, 0),
    }
}

/// Paint every grid cell as a `scale x scale` block of `target`. The
/// remainder block row/column runs to the target edge.
///
/// Fails without touching the buffer when the target geometry does not
/// reconcile with the grid at this scale.
pub fn render(grid: &Grid, scale: usize, target: &mut RenderTarget) -> Result<(), SimError> {
    let (width, height) = (target.width, target.height);
    let layout = match BlockLayout::compute(width, height, scale) {
        Some(l) if l.total_cells_x == grid.cols() && l.total_cells_y == grid.rows() => l,
        _ => {
            let (expected_rows, expected_cols) = grid_dims_for_canvas(width, height, scale);
            return Err(SimError::GridTargetMismatch {
                rows: grid.rows(),
                cols: grid.cols(),
                width,
                height,
                scale,
                expected_rows,
                expected_cols,
            });
        }
    };

    let cols = grid.cols();
    let buf = &mut target.pixels;
    for (row, cells) in grid.cells().chunks_exact(cols).enumerate() {
        let y0 = row * scale;
        let y1 = if row < layout.full_cells_y { y0 + scale } else { height };
        for (col, &t) in cells.iter().enumerate() {
            let rgba = temperature_to_rgba(t);
            let x0 = col * scale;
            let x1 = if col < layout.full_cells_x { x0 + scale } else { width };
            for y in y0..y1 {
                let start = (y * width + x0) * 4;
                let end = (y * width + x1) * 4;
                for px in buf[start..end].chunks_exact_mut(4) {
                    px.copy_from_slice(&rgba);
                }
            }
        }
    }
    Ok(())
}
