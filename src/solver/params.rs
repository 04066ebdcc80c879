use serde::Deserialize;

use super::UpdateScheme;
use crate::state::{InitKind, InitMode, RadialProfile};

/// Heat added per injection event, before `heat_multiplier`.
pub const HEAT_QUANTUM: f64 = 25.0;

/// Peak value of the radial starting bump.
pub const RADIAL_AMPLITUDE: f64 = 255.0;

/// Discrete pixels-per-cell selector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelScale {
    X1,
    #[default]
    X2,
    X4,
    X8,
}

impl PixelScale {
    /// Every selectable scale, in cycle order.
    pub const ALL: [PixelScale; 4] = [PixelScale::X1, PixelScale::X2, PixelScale::X4, PixelScale::X8];

    /// Pixels per grid cell along each axis.
    pub const fn multiplier(self) -> usize {
        match self {
            PixelScale::X1 => 1,
            PixelScale::X2 => 2,
            PixelScale::X4 => 4,
            PixelScale::X8 => 8,
        }
    }

    /// Cycle to the next scale.
    pub fn next(self) -> Self {
        match self {
            PixelScale::X1 => PixelScale::X2,
            PixelScale::X2 => PixelScale::X4,
            PixelScale::X4 => PixelScale::X8,
            PixelScale::X8 => PixelScale::X1,
        }
    }

    pub fn from_multiplier(m: usize) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.multiplier() == m)
    }

    pub fn label(self) -> &'static str {
        match self {
            PixelScale::X1 => "x1",
            PixelScale::X2 => "x2",
            PixelScale::X4 => "x4",
            PixelScale::X8 => "x8",
        }
    }
}

/// Parameters fixed for the lifetime of one grid. Changing any of them
/// takes effect on the next reset.
#[derive(Clone, Debug, PartialEq)]
pub struct SolverParams {
    pub gamma: f64,
    /// Integer spread control, see [`SolverParams::beta_scaled`].
    pub beta: u32,
    pub heat_multiplier: f64,
    pub scale: PixelScale,
    pub init: InitKind,
    pub scheme: UpdateScheme,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            gamma: 0.25,
            beta: 10,
            heat_multiplier: 1.0,
            scale: PixelScale::default(),
            init: InitKind::default(),
            scheme: UpdateScheme::default(),
        }
    }
}

impl SolverParams {
    /// Spread of the radial bump in grid units: `(beta / 100000) * scale²`.
    /// Keeps the bump the same size on screen regardless of scale.
    pub fn beta_scaled(&self) -> f64 {
        let s = self.scale.multiplier() as f64;
        (self.beta as f64 / 100_000.0) * s * s
    }

    /// Heat added to each touched cell by one injection event.
    pub fn injection_amount(&self) -> f64 {
        HEAT_QUANTUM * self.heat_multiplier
    }

    pub fn init_mode(&self) -> InitMode {
        match self.init {
            InitKind::Zeros => InitMode::Zeros,
            InitKind::Radial => InitMode::Radial(RadialProfile {
                beta: self.beta_scaled(),
                amplitude: RADIAL_AMPLITUDE,
            }),
        }
    }
}
