//! Entities and their kinds
//!
//! An entity is a circle moving in a straight line at constant speed. The
//! engine owns every entity; other code only sees copies.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::grid::CellCoord;
use crate::vector::{self, Vector2D};

/// Stable identity of an entity within one run (never reused)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The three entity kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Rock,
    Paper,
    Scissors,
}

impl ItemKind {
    pub const ALL: [ItemKind; 3] = [ItemKind::Rock, ItemKind::Paper, ItemKind::Scissors];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Rock => "rock",
            ItemKind::Paper => "paper",
            ItemKind::Scissors => "scissors",
        }
    }

    /// Kind this one defeats
    pub fn prey(&self) -> ItemKind {
        match self {
            ItemKind::Rock => ItemKind::Scissors,
            ItemKind::Scissors => ItemKind::Paper,
            ItemKind::Paper => ItemKind::Rock,
        }
    }

    /// True if `self` wins against `other`
    #[inline]
    pub fn beats(&self, other: ItemKind) -> bool {
        self.prey() == other
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single mobile circle in the arena
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub pos: Vector2D,
    /// Per-tick displacement (unit heading * speed)
    pub vel: Vector2D,
    pub speed: f64,
    /// Collision radius, fixed at spawn
    pub radius: f64,
    pub kind: ItemKind,
    /// Grid cell holding this entity (kept in sync by the engine)
    pub zone: CellCoord,
    pub lives: u32,
}

impl Entity {
    /// Create an entity heading along `heading` at `speed`
    ///
    /// A zero heading leaves the entity stationary instead of producing a
    /// NaN velocity.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: EntityId,
        pos: Vector2D,
        heading: Vector2D,
        speed: f64,
        radius: f64,
        kind: ItemKind,
        zone: CellCoord,
        lives: u32,
    ) -> Self {
        let vel = match vector::normalize(heading) {
            Ok(dir) => vector::mult(dir, speed),
            Err(_) => vector::zero(),
        };
        Self {
            id,
            pos,
            vel,
            speed,
            radius,
            kind,
            zone,
            lives,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.lives > 0
    }

    #[inline]
    pub fn is_stationary(&self) -> bool {
        self.vel == vector::zero()
    }

    /// Circle-circle overlap test (touching does not count)
    #[inline]
    pub fn overlaps(&self, other: &Entity) -> bool {
        vector::dist(self.pos, other.pos) < self.radius + other.radius
    }

    /// Heading angle of travel (radians), `None` when stationary
    pub fn direction(&self) -> Option<f64> {
        if self.is_stationary() {
            None
        } else {
            Some(vector::heading(self.vel))
        }
    }
}
