//! Simulation configuration
//!
//! A `GameConfig` is created once per run and handed to the engine. The
//! control surface changes it between ticks through a `ConfigPatch`; every
//! change is validated first and rejected changes leave the config as it was.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::vector::Vector2D;

/// Whether the engine advances on `tick()`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    #[default]
    Running,
    Paused,
}

impl RunState {
    pub fn is_running(&self) -> bool {
        matches!(self, RunState::Running)
    }

    pub fn toggled(&self) -> Self {
        match self {
            RunState::Running => RunState::Paused,
            RunState::Paused => RunState::Running,
        }
    }
}

/// What happens to an entity that leaves the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryPolicy {
    /// Re-enter from the opposite edge
    #[default]
    Wrap,
    /// Bounce off the wall (velocity component flipped)
    Reflect,
}

/// What happens to the losing side of a decisive collision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LossPolicy {
    /// Loser loses a life and is removed at zero
    #[default]
    Eliminate,
    /// Loser takes on the winner's kind
    Convert,
}

/// Population presets for the control surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PopulationPreset {
    Small,
    #[default]
    Medium,
    Large,
}

impl PopulationPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            PopulationPreset::Small => "Small",
            PopulationPreset::Medium => "Medium",
            PopulationPreset::Large => "Large",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "small" | "s" => Some(PopulationPreset::Small),
            "medium" | "med" | "m" => Some(PopulationPreset::Medium),
            "large" | "l" => Some(PopulationPreset::Large),
            _ => None,
        }
    }

    /// Target population for this preset
    pub fn items(&self) -> usize {
        match self {
            PopulationPreset::Small => 30,
            PopulationPreset::Medium => 90,
            PopulationPreset::Large => 300,
        }
    }
}

/// Partial update from the control surface. `None` keeps the current value.
///
/// `items` is signed so that a negative request can be seen and rejected
/// instead of wrapping around.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ConfigPatch {
    #[serde(default)]
    pub items: Option<i64>,
    #[serde(default)]
    pub radius: Option<f64>,
    #[serde(default)]
    pub state: Option<RunState>,
}

impl ConfigPatch {
    pub fn items(items: i64) -> Self {
        Self {
            items: Some(items),
            ..Default::default()
        }
    }

    pub fn radius(radius: f64) -> Self {
        Self {
            radius: Some(radius),
            ..Default::default()
        }
    }

    pub fn state(state: RunState) -> Self {
        Self {
            state: Some(state),
            ..Default::default()
        }
    }
}

/// Full run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Control surface ===
    /// Target population
    pub items: usize,
    /// Collision radius given to newly spawned entities
    pub radius: f64,
    /// Running or paused
    pub state: RunState,

    // === Arena ===
    pub arena_width: f64,
    pub arena_height: f64,
    /// Grid cell edge; fixed for the run, must be at least twice `radius`
    pub cell_size: f64,
    pub boundary: BoundaryPolicy,

    // === Entities ===
    pub min_speed: f64,
    pub max_speed: f64,
    /// Lives given to newly spawned entities
    pub lives: u32,
    pub loss: LossPolicy,
    /// Spawn new entities when the population drops below `items`
    pub replenish: bool,

    /// Run seed for reproducibility
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            items: DEFAULT_ITEMS,
            radius: DEFAULT_RADIUS,
            state: RunState::Running,

            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            cell_size: CELL_SIZE,
            boundary: BoundaryPolicy::Wrap,

            min_speed: MIN_SPEED,
            max_speed: MAX_SPEED,
            lives: DEFAULT_LIVES,
            loss: LossPolicy::Eliminate,
            replenish: false,

            seed: DEFAULT_SEED,
        }
    }
}

impl GameConfig {
    /// Config with the preset's target population
    pub fn from_preset(preset: PopulationPreset) -> Self {
        Self {
            items: preset.items(),
            ..Self::default()
        }
    }

    /// Parse from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Malformed(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Malformed(e.to_string()))
    }

    /// Largest radius the grid can serve without missing collisions
    pub fn max_radius(&self) -> f64 {
        self.cell_size / 2.0
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.items > MAX_ITEMS {
            return Err(ConfigError::invalid("items", "exceeds the population cap"));
        }
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(ConfigError::invalid("cell_size", "must be positive"));
        }
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(ConfigError::invalid("radius", "must be positive"));
        }
        if self.radius > self.max_radius() {
            return Err(ConfigError::invalid(
                "radius",
                "must be at most half the grid cell size",
            ));
        }
        if !self.arena_width.is_finite() || self.arena_width <= 0.0 {
            return Err(ConfigError::invalid("arena_width", "must be positive"));
        }
        if !self.arena_height.is_finite() || self.arena_height <= 0.0 {
            return Err(ConfigError::invalid("arena_height", "must be positive"));
        }
        if !self.min_speed.is_finite() || self.min_speed < 0.0 {
            return Err(ConfigError::invalid("min_speed", "must not be negative"));
        }
        if !self.max_speed.is_finite() || self.max_speed < self.min_speed {
            return Err(ConfigError::invalid("max_speed", "must be at least min_speed"));
        }
        if self.lives == 0 {
            return Err(ConfigError::invalid("lives", "must be at least 1"));
        }
        Ok(())
    }

    /// Whether an entity may be placed at `pos` moving at `speed`
    ///
    /// The position must lie in `[0, arena_width) x [0, arena_height)`.
    pub fn check_spawn(&self, pos: Vector2D, speed: f64) -> Result<(), ConfigError> {
        if !speed.is_finite() || speed < 0.0 {
            return Err(ConfigError::invalid("speed", "must be finite and not negative"));
        }
        if !pos.is_finite() {
            return Err(ConfigError::invalid("pos", "must be finite"));
        }
        if pos.x < 0.0 || pos.x >= self.arena_width || pos.y < 0.0 || pos.y >= self.arena_height {
            return Err(ConfigError::invalid("pos", "must lie inside the arena"));
        }
        Ok(())
    }

    /// Config with `patch` applied, or the reason it was rejected
    pub fn patched(&self, patch: &ConfigPatch) -> Result<Self, ConfigError> {
        let mut next = self.clone();
        if let Some(items) = patch.items {
            if items < 0 {
                return Err(ConfigError::invalid("items", "must not be negative"));
            }
            next.items = usize::try_from(items)
                .map_err(|_| ConfigError::invalid("items", "exceeds the population cap"))?;
        }
        if let Some(radius) = patch.radius {
            next.radius = radius;
        }
        if let Some(state) = patch.state {
            next.state = state;
        }
        next.validate()?;
        Ok(next)
    }
}
