//! Simulation state
//!
//! Everything one run owns: the population, the grid that indexes it, the
//! seeded RNG and the events produced by the latest tick.

use std::collections::BTreeMap;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityId, ItemKind};
use super::grid::SpatialGrid;
use super::interaction::Resolution;
use crate::config::GameConfig;
use crate::error::ConfigError;
use crate::vector::{self, Vector2D};

/// Things that happened during a tick, oldest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SimEvent {
    Spawned { id: EntityId, kind: ItemKind },
    Interaction(Resolution),
    /// At most one kind is left; `survivor` is `None` when the arena is empty
    Terminal { survivor: Option<ItemKind> },
}

/// Per-kind population counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Census {
    pub rock: usize,
    pub paper: usize,
    pub scissors: usize,
}

impl Census {
    pub fn get(&self, kind: ItemKind) -> usize {
        match kind {
            ItemKind::Rock => self.rock,
            ItemKind::Paper => self.paper,
            ItemKind::Scissors => self.scissors,
        }
    }

    fn bump(&mut self, kind: ItemKind) {
        match kind {
            ItemKind::Rock => self.rock += 1,
            ItemKind::Paper => self.paper += 1,
            ItemKind::Scissors => self.scissors += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.rock + self.paper + self.scissors
    }

    /// Number of kinds with at least one entity
    pub fn kinds_present(&self) -> usize {
        ItemKind::ALL.iter().filter(|k| self.get(**k) > 0).count()
    }

    /// No decisive collision is possible any more
    pub fn is_terminal(&self) -> bool {
        self.kinds_present() <= 1
    }

    /// The only kind left, if exactly one remains
    pub fn survivor(&self) -> Option<ItemKind> {
        if self.kinds_present() == 1 {
            ItemKind::ALL.into_iter().find(|k| self.get(*k) > 0)
        } else {
            None
        }
    }
}

/// Population, grid and RNG for one run
#[derive(Debug, Clone)]
pub struct SimState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Simulation tick counter (only advances while running)
    pub time_ticks: u64,
    /// Population indexed by id; iteration order is ascending id
    pub entities: BTreeMap<EntityId, Entity>,
    pub grid: SpatialGrid,
    /// Events from the latest tick
    pub events: Vec<SimEvent>,
    /// Whether the population was terminal at the end of the last tick
    pub(crate) terminal_reported: bool,
    pub(crate) rng: Pcg32,
    next_id: u64,
}

impl SimState {
    /// Fresh state seeded from `config`, populated with `config.items` entities
    pub fn new(config: &GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut state = Self {
            seed: config.seed,
            time_ticks: 0,
            entities: BTreeMap::new(),
            grid: SpatialGrid::new(config.cell_size)?,
            events: Vec::new(),
            terminal_reported: false,
            rng: Pcg32::seed_from_u64(config.seed),
            next_id: 1,
        };

        for _ in 0..config.items {
            state.spawn_random(config);
        }

        Ok(state)
    }

    /// Allocate a new entity ID (64-bit, never reused within a run)
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Place an entity and index it in the grid
    pub fn spawn(
        &mut self,
        kind: ItemKind,
        pos: Vector2D,
        heading: Vector2D,
        speed: f64,
        radius: f64,
        lives: u32,
    ) -> EntityId {
        let id = self.next_entity_id();
        let zone = self.grid.insert(id, pos);
        let entity = Entity::new(id, pos, heading, speed, radius, kind, zone, lives);
        self.entities.insert(id, entity);
        self.events.push(SimEvent::Spawned { id, kind });
        id
    }

    /// Spawn an entity with random position, kind, heading and speed
    pub fn spawn_random(&mut self, config: &GameConfig) -> EntityId {
        let pos = Vector2D::new(
            self.rng.random_range(0.0..config.arena_width),
            self.rng.random_range(0.0..config.arena_height),
        );
        let kind = ItemKind::random(&mut self.rng);
        let heading = vector::random(&mut self.rng);
        let speed = self.rng.random_range(config.min_speed..=config.max_speed);
        self.spawn(kind, pos, heading, speed, config.radius, config.lives)
    }

    /// Drop an entity from the population and the grid
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let entity = self.entities.remove(&id)?;
        self.grid.remove(id, entity.zone);
        Some(entity)
    }

    pub fn census(&self) -> Census {
        let mut census = Census::default();
        for entity in self.entities.values() {
            census.bump(entity.kind);
        }
        census
    }

    /// Every entity sits in exactly the grid cell its position maps to
    pub fn grid_consistent(&self) -> bool {
        self.grid.len() == self.entities.len()
            && self.entities.values().all(|e| {
                e.zone == self.grid.cell_of(e.pos) && self.grid.contains(e.id, e.zone)
            })
    }
}
