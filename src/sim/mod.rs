//! Deterministic simulation module
//!
//! All arena logic lives here. This module must stay pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - Collision pairs resolved in sorted order, never grid order
//! - No rendering or platform dependencies

pub mod engine;
pub mod entity;
pub mod grid;
pub mod interaction;
pub mod state;
pub mod tick;

pub use engine::{EntitySnapshot, SimulationEngine, Snapshot};
pub use entity::{Entity, EntityId, ItemKind};
pub use grid::{CellCoord, SpatialGrid};
pub use interaction::{LossEffect, Outcome, Resolution, apply_loss, outcome, resolve};
pub use state::{Census, SimEvent, SimState};
pub use tick::{overlapping_pairs, step, tick};
