//! Simulation tick
//!
//! One call advances the arena by one step: move, keep in bounds, re-bucket,
//! find overlapping pairs, resolve them in id order, apply removals, then
//! top the population back up if asked to.

use std::collections::BTreeSet;

use super::entity::EntityId;
use super::interaction;
use super::state::{SimEvent, SimState};
use crate::config::{BoundaryPolicy, GameConfig};
use crate::vector::{self, Vector2D};
use crate::{reflect_coordinate, wrap_coordinate};

/// Advance the simulation by one step
///
/// `config` is read once for the whole tick. While paused nothing changes,
/// not even the tick counter or the event list.
pub fn tick(state: &mut SimState, config: &GameConfig) {
    if !config.state.is_running() {
        return;
    }

    state.events.clear();
    state.time_ticks += 1;

    advance_positions(state, config);
    let pairs = overlapping_pairs(state);
    resolve_pairs(state, config, &pairs);
    replenish(state, config);
    report_terminal(state);

    log::debug!(
        "tick {}: {} entities, {} contacts, {} events",
        state.time_ticks,
        state.entities.len(),
        pairs.len(),
        state.events.len()
    );
}

/// Next position and velocity after one step under `config.boundary`
pub fn step(pos: Vector2D, vel: Vector2D, config: &GameConfig) -> (Vector2D, Vector2D) {
    let next = vector::add(pos, vel);
    match config.boundary {
        BoundaryPolicy::Wrap => (
            Vector2D::new(
                wrap_coordinate(next.x, config.arena_width),
                wrap_coordinate(next.y, config.arena_height),
            ),
            vel,
        ),
        BoundaryPolicy::Reflect => {
            let (x, bounced_x) = reflect_coordinate(next.x, config.arena_width);
            let (y, bounced_y) = reflect_coordinate(next.y, config.arena_height);
            let vel = Vector2D::new(
                if bounced_x { -vel.x } else { vel.x },
                if bounced_y { -vel.y } else { vel.y },
            );
            (Vector2D::new(x, y), vel)
        }
    }
}

fn advance_positions(state: &mut SimState, config: &GameConfig) {
    let SimState { entities, grid, .. } = state;
    for entity in entities.values_mut() {
        if entity.is_stationary() {
            continue;
        }
        let (pos, vel) = step(entity.pos, entity.vel, config);
        entity.pos = pos;
        entity.vel = vel;
        entity.zone = grid.move_entity(entity.id, entity.zone, pos);
    }
}

/// Every overlapping pair once, as (lower id, higher id), sorted
///
/// Grid iteration order is unspecified, so the result is sorted to keep
/// resolution reproducible.
pub fn overlapping_pairs(state: &SimState) -> Vec<(EntityId, EntityId)> {
    let mut pairs = Vec::new();
    for (id, entity) in &state.entities {
        for other_id in state.grid.neighbors(entity.zone) {
            if other_id <= *id {
                continue;
            }
            if let Some(other) = state.entities.get(&other_id) {
                if entity.overlaps(other) {
                    pairs.push((*id, other_id));
                }
            }
        }
    }
    pairs.sort_unstable();
    pairs
}

fn resolve_pairs(state: &mut SimState, config: &GameConfig, pairs: &[(EntityId, EntityId)]) {
    // Eliminated entities stay in the map until the pass is over so the
    // grid is never touched mid-scan; they are skipped instead.
    let mut eliminated: BTreeSet<EntityId> = BTreeSet::new();

    for &(a_id, b_id) in pairs {
        if eliminated.contains(&a_id) || eliminated.contains(&b_id) {
            continue;
        }
        let (Some(a), Some(b)) = (
            state.entities.get(&a_id).copied(),
            state.entities.get(&b_id).copied(),
        ) else {
            continue;
        };
        let Some(resolution) = interaction::resolve(&a, &b, config.loss) else {
            continue;
        };

        let loser = if resolution.loser == a.id { a } else { b };
        match interaction::apply_loss(&loser, resolution.effect) {
            Some(updated) => {
                state.entities.insert(loser.id, updated);
            }
            None => {
                eliminated.insert(loser.id);
            }
        }
        state.events.push(SimEvent::Interaction(resolution));
    }

    for id in eliminated {
        state.remove(id);
    }
}

fn replenish(state: &mut SimState, config: &GameConfig) {
    if !config.replenish || state.entities.len() >= config.items {
        return;
    }
    let missing = config.items - state.entities.len();
    for _ in 0..missing {
        state.spawn_random(config);
    }
    log::debug!("Replenished {} entities", missing);
}

fn report_terminal(state: &mut SimState) {
    let census = state.census();
    let terminal = census.is_terminal();
    if terminal && !state.terminal_reported {
        let survivor = census.survivor();
        match survivor {
            Some(kind) => log::info!(
                "Tick {}: only {} remains ({} entities)",
                state.time_ticks,
                kind,
                census.total()
            ),
            None => log::info!("Tick {}: arena is empty", state.time_ticks),
        }
        state.events.push(SimEvent::Terminal { survivor });
    }
    state.terminal_reported = terminal;
}
