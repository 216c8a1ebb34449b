//! Simulation engine
//!
//! The surface a presentation layer talks to. The engine owns the config and
//! the state; every change goes through `&mut self`, so configuration can only
//! move between ticks.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityId, ItemKind};
use super::state::{Census, SimEvent, SimState};
use super::tick::tick;
use crate::config::{ConfigPatch, GameConfig, RunState};
use crate::error::ConfigError;
use crate::vector::Vector2D;

/// One entity as seen by a renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub id: EntityId,
    pub pos: DVec2,
    pub kind: ItemKind,
    pub radius: f64,
    pub lives: u32,
}

impl From<&Entity> for EntitySnapshot {
    fn from(e: &Entity) -> Self {
        Self {
            id: e.id,
            pos: e.pos,
            kind: e.kind,
            radius: e.radius,
            lives: e.lives,
        }
    }
}

/// Point-in-time copy of the arena
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub run_state: RunState,
    /// Radius newly spawned entities will get
    pub radius: f64,
    pub census: Census,
    /// Sorted by id
    pub entities: Vec<EntitySnapshot>,
}

impl Snapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn is_terminal(&self) -> bool {
        self.census.is_terminal()
    }
}

/// Owner of one simulation run
#[derive(Debug, Clone)]
pub struct SimulationEngine {
    config: GameConfig,
    state: SimState,
}

impl SimulationEngine {
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        let state = SimState::new(&config)?;
        log::info!(
            "Simulation initialized with seed {} ({} entities)",
            config.seed,
            state.entities.len()
        );
        Ok(Self { config, state })
    }

    /// Advance by one step (no-op while paused)
    pub fn tick(&mut self) {
        tick(&mut self.state, &self.config);
    }

    /// Run `n` ticks
    pub fn run(&mut self, n: u64) {
        for _ in 0..n {
            self.tick();
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.state.time_ticks,
            run_state: self.config.state,
            radius: self.config.radius,
            census: self.state.census(),
            entities: self.state.entities.values().map(EntitySnapshot::from).collect(),
        }
    }

    /// Apply a partial config update
    ///
    /// Rejected patches leave the config untouched. A new radius only
    /// applies to entities spawned afterwards.
    pub fn set_config(&mut self, patch: ConfigPatch) -> Result<(), ConfigError> {
        let next = match self.config.patched(&patch) {
            Ok(next) => next,
            Err(e) => {
                log::warn!("Rejected config change: {}", e);
                return Err(e);
            }
        };

        if next.state != self.config.state {
            log::info!("Simulation {:?} at tick {}", next.state, self.state.time_ticks);
        }
        if next.items != self.config.items {
            log::info!("Population target: {} -> {}", self.config.items, next.items);
        }
        if next.radius != self.config.radius {
            log::info!("Spawn radius: {} -> {}", self.config.radius, next.radius);
        }
        self.config = next;
        Ok(())
    }

    /// Throw away the current run and start a new one from `config`
    pub fn reset(&mut self, config: GameConfig) -> Result<(), ConfigError> {
        let state = match SimState::new(&config) {
            Ok(state) => state,
            Err(e) => {
                log::warn!("Rejected reset: {}", e);
                return Err(e);
            }
        };
        log::info!(
            "Simulation reset with seed {} ({} entities)",
            config.seed,
            state.entities.len()
        );
        self.config = config;
        self.state = state;
        Ok(())
    }

    pub fn pause(&mut self) {
        if self.config.state.is_running() {
            self.config.state = RunState::Paused;
            log::info!("Simulation Paused at tick {}", self.state.time_ticks);
        }
    }

    pub fn resume(&mut self) {
        if !self.config.state.is_running() {
            self.config.state = RunState::Running;
            log::info!("Simulation Running at tick {}", self.state.time_ticks);
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.config.state.is_running() {
            self.pause();
        } else {
            self.resume();
        }
    }

    /// Place a specific entity using the current radius and lives
    ///
    /// `pos` must be inside the arena and `speed` finite and not negative.
    pub fn spawn_entity(
        &mut self,
        kind: ItemKind,
        pos: Vector2D,
        heading: Vector2D,
        speed: f64,
    ) -> Result<EntityId, ConfigError> {
        if let Err(e) = self.config.check_spawn(pos, speed) {
            log::warn!("Rejected spawn of {}: {}", kind, e);
            return Err(e);
        }
        Ok(self
            .state
            .spawn(kind, pos, heading, speed, self.config.radius, self.config.lives))
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        self.config.state.is_running()
    }

    pub fn time_ticks(&self) -> u64 {
        self.state.time_ticks
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.state.entities.get(&id)
    }

    /// Entities in ascending id order
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.state.entities.values()
    }

    pub fn len(&self) -> usize {
        self.state.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.entities.is_empty()
    }

    /// Events produced by the latest tick
    pub fn events(&self) -> &[SimEvent] {
        &self.state.events
    }

    pub fn census(&self) -> Census {
        self.state.census()
    }

    pub fn is_terminal(&self) -> bool {
        self.census().is_terminal()
    }

    /// The surviving kind once the arena is terminal
    pub fn winner(&self) -> Option<ItemKind> {
        self.census().survivor()
    }
}
