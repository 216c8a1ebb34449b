//! RPS Arena - a rock-paper-scissors particle arena
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spatial grid, interactions, tick)
//! - `vector`: Pure 2D vector helpers
//! - `config`: Run configuration and control-surface patches
//! - `error`: Error types

pub mod config;
pub mod error;
pub mod sim;
pub mod vector;

pub use config::{BoundaryPolicy, ConfigPatch, GameConfig, LossPolicy, PopulationPreset, RunState};
pub use error::{ConfigError, VectorError};
pub use sim::{SimulationEngine, Snapshot};

/// Simulation configuration constants
pub mod consts {
    /// Arena dimensions
    pub const ARENA_WIDTH: f64 = 800.0;
    pub const ARENA_HEIGHT: f64 = 600.0;

    /// Grid cell edge (must stay >= 2x the largest entity radius)
    pub const CELL_SIZE: f64 = 32.0;

    /// Entity defaults
    pub const DEFAULT_RADIUS: f64 = 8.0;
    pub const DEFAULT_LIVES: u32 = 1;
    /// Speed range in arena units per tick
    pub const MIN_SPEED: f64 = 0.5;
    pub const MAX_SPEED: f64 = 1.5;

    /// Population defaults
    pub const DEFAULT_ITEMS: usize = 90;
    pub const MAX_ITEMS: usize = 100_000;

    pub const DEFAULT_SEED: u64 = 0x5eed;
}

/// Wrap a coordinate into [0, extent)
#[inline]
pub fn wrap_coordinate(value: f64, extent: f64) -> f64 {
    let wrapped = value.rem_euclid(extent);
    // rem_euclid can round up to `extent` for tiny negative inputs
    if wrapped >= extent { 0.0 } else { wrapped }
}

/// Mirror a coordinate back into [0, extent]
///
/// Returns the new coordinate and whether it bounced.
#[inline]
pub fn reflect_coordinate(value: f64, extent: f64) -> (f64, bool) {
    if value < 0.0 {
        ((-value).min(extent), true)
    } else if value > extent {
        ((2.0 * extent - value).max(0.0), true)
    } else {
        (value, false)
    }
}
