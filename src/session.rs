use tracing::{debug, info};

use crate::error::SimError;
use crate::input::screen_to_grid;
use crate::renderer::{self, RenderTarget};
use crate::solver::{self, SolverParams, UpdateScheme};
use crate::state::Grid;

/// The one live simulation: grid, render target, and the parameters they
/// were built with. Owned by the driver and passed by reference to every
/// operation.
pub struct SimulationSession {
    params: SolverParams,
    grid: Grid,
    target: RenderTarget,
    steps: u64,
}

/// Build a grid and render target that agree at `params.scale`.
fn build(width: usize, height: usize, params: &SolverParams) -> Result<(Grid, RenderTarget), SimError> {
    let scale = params.scale.multiplier();
    let (rows, cols) = renderer::grid_dims_for_canvas(width, height, scale);
    let grid = Grid::initialize(rows, cols, params.init_mode())?;
    let mut target = RenderTarget::new(width, height);
    renderer::render(&grid, scale, &mut target)?;
    Ok((grid, target))
}

impl SimulationSession {
    /// Create a session for a `width x height` canvas with the initial
    /// field already rendered.
    pub fn new(width: usize, height: usize, params: SolverParams) -> Result<Self, SimError> {
        let (grid, target) = build(width, height, &params)?;
        info!(
            rows = grid.rows(),
            cols = grid.cols(),
            scale = params.scale.multiplier(),
            gamma = params.gamma,
            "session created"
        );
        Ok(Self {
            params,
            grid,
            target,
            steps: 0,
        })
    }

    /// Replace grid, target and parameters together. On error the current
    /// session is left untouched.
    pub fn reset(&mut self, params: SolverParams) -> Result<(), SimError> {
        self.reset_canvas(self.target.width(), self.target.height(), params)
    }

    /// Reset for a new canvas size, keeping the current parameters.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<(), SimError> {
        self.reset_canvas(width, height, self.params.clone())
    }

    fn reset_canvas(&mut self, width: usize, height: usize, params: SolverParams) -> Result<(), SimError> {
        let (grid, target) = build(width, height, &params)?;
        info!(
            rows = grid.rows(),
            cols = grid.cols(),
            width,
            height,
            scale = params.scale.multiplier(),
            gamma = params.gamma,
            init = params.init.label(),
            "session reset"
        );
        *self = Self {
            params,
            grid,
            target,
            steps: 0,
        };
        Ok(())
    }

    /// One animation tick: advance the field, then repaint the target.
    pub fn tick(&mut self) -> Result<(), SimError> {
        match self.params.scheme {
            UpdateScheme::Snapshot => solver::step(&mut self.grid, self.params.gamma),
            scheme => solver::step_with(&mut self.grid, self.params.gamma, scheme),
        }
        renderer::render(&self.grid, self.params.scale.multiplier(), &mut self.target)?;
        self.steps += 1;
        if self.steps % 600 == 0 {
            debug!(steps = self.steps, heat = self.grid.total_heat(), peak = self.grid.peak(), "progress");
        }
        Ok(())
    }

    /// Inject one heat quantum at a canvas pixel position. Positions that
    /// map outside the grid are ignored.
    pub fn inject_at(&mut self, px: f64, py: f64) {
        let (col, row) = screen_to_grid(px, py, self.params.scale.multiplier());
        solver::inject(&mut self.grid, row, col, self.params.injection_amount());
    }

    pub fn params(&self) -> &SolverParams {
        &self.params
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn target(&self) -> &RenderTarget {
        &self.target
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }
}
