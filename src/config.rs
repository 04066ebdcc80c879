use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::solver::{PixelScale, SolverParams, UpdateScheme};
use crate::state::InitKind;

pub const DEFAULT_PATH: &str = "thermarium.yaml";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub physics: PhysicsConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gamma: f64,
    pub beta: u32,
    pub heat_multiplier: f64,
    pub init: InitKind,
    pub scheme: UpdateScheme,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: usize,
    pub height: usize,
    pub scale: PixelScale,
    pub target_fps: u32,
    pub inject_hz: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        let p = SolverParams::default();
        Self {
            gamma: p.gamma,
            beta: p.beta,
            heat_multiplier: p.heat_multiplier,
            init: p.init,
            scheme: p.scheme,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            scale: PixelScale::default(),
            target_fps: 60,
            inject_hz: 120,
        }
    }
}

#[derive(Debug, PartialEq, Error)]
pub enum ConfigError {
    #[error("gamma must be finite and non-negative, got {0}")]
    Gamma(f64),
    #[error("heat_multiplier must be finite and non-negative, got {0}")]
    HeatMultiplier(f64),
    #[error("canvas must be at least 1x1, got {width}x{height}")]
    Canvas { width: usize, height: usize },
    #[error("{name} must be non-zero")]
    ZeroRate { name: &'static str },
}

impl Config {
    /// Reject values the simulation core cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.physics;
        if !p.gamma.is_finite() || p.gamma < 0.0 {
            return Err(ConfigError::Gamma(p.gamma));
        }
        if !p.heat_multiplier.is_finite() || p.heat_multiplier < 0.0 {
            return Err(ConfigError::HeatMultiplier(p.heat_multiplier));
        }
        let d = &self.display;
        if d.width == 0 || d.height == 0 {
            return Err(ConfigError::Canvas {
                width: d.width,
                height: d.height,
            });
        }
        if d.target_fps == 0 {
            return Err(ConfigError::ZeroRate { name: "target_fps" });
        }
        if d.inject_hz == 0 {
            return Err(ConfigError::ZeroRate { name: "inject_hz" });
        }
        Ok(())
    }

    pub fn solver_params(&self) -> SolverParams {
        SolverParams {
            gamma: self.physics.gamma,
            beta: self.physics.beta,
            heat_multiplier: self.physics.heat_multiplier,
            scale: self.display.scale,
            init: self.physics.init,
            scheme: self.physics.scheme,
        }
    }
}

/// Load configuration from `path`. A missing file gives defaults; an
/// unreadable or malformed one logs a warning and gives defaults.
pub fn load(path: &Path) -> Config {
    if !path.exists() {
        return Config::default();
    }
    match std::fs::read_to_string(path) {
        Ok(contents) => match serde_yaml::from_str(&contents) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to parse config; using defaults");
                Config::default()
            }
        },
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read config; using defaults");
            Config::default()
        }
    }
}
