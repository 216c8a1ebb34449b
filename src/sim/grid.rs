//! Uniform spatial grid for broad-phase collision queries
//!
//! The arena is cut into square cells of a fixed edge. Every entity lives in
//! exactly one cell, found by flooring its position by the cell size. As long
//! as the cell edge is at least twice the largest radius, any two overlapping
//! circles sit in the same cell or in adjacent ones, so a 3x3 block lookup
//! finds every candidate.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::entity::EntityId;
use crate::error::ConfigError;
use crate::vector::Vector2D;

/// Integer cell coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct CellCoord {
    pub x: i32,
    pub y: i32,
}

impl CellCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Cell containing `pos` for the given cell edge
    #[inline]
    pub fn from_position(pos: Vector2D, cell_size: f64) -> Self {
        Self {
            x: (pos.x / cell_size).floor() as i32,
            y: (pos.y / cell_size).floor() as i32,
        }
    }

    /// This cell and its 8 neighbours
    pub fn moore(&self) -> [CellCoord; 9] {
        let mut out = [*self; 9];
        let mut i = 0;
        for dy in -1..=1 {
            for dx in -1..=1 {
                out[i] = CellCoord::new(self.x.wrapping_add(dx), self.y.wrapping_add(dy));
                i += 1;
            }
        }
        out
    }
}

/// Flat map from cell to the ids inside it
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f64,
    cells: HashMap<CellCoord, HashSet<EntityId>>,
}

impl SpatialGrid {
    pub fn new(cell_size: f64) -> Result<Self, ConfigError> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(ConfigError::invalid("cell_size", "must be positive"));
        }
        Ok(Self {
            cell_size,
            cells: HashMap::new(),
        })
    }

    #[inline]
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    #[inline]
    pub fn cell_of(&self, pos: Vector2D) -> CellCoord {
        CellCoord::from_position(pos, self.cell_size)
    }

    /// Add `id` to the cell under `pos` and return that cell
    pub fn insert(&mut self, id: EntityId, pos: Vector2D) -> CellCoord {
        let cell = self.cell_of(pos);
        self.cells.entry(cell).or_default().insert(id);
        cell
    }

    /// Remove `id` from `cell`; absent ids are ignored
    pub fn remove(&mut self, id: EntityId, cell: CellCoord) {
        if let Some(set) = self.cells.get_mut(&cell) {
            set.remove(&id);
            if set.is_empty() {
                self.cells.remove(&cell);
            }
        }
    }

    /// Re-bucket `id` after it moved to `new_pos`, returning its current cell
    ///
    /// Most entities stay put between ticks, in which case nothing changes.
    pub fn move_entity(&mut self, id: EntityId, old_cell: CellCoord, new_pos: Vector2D) -> CellCoord {
        let new_cell = self.cell_of(new_pos);
        if new_cell != old_cell {
            self.remove(id, old_cell);
            self.cells.entry(new_cell).or_default().insert(id);
        }
        new_cell
    }

    /// Ids in `cell` and its 8 neighbours, in no particular order
    pub fn neighbors(&self, cell: CellCoord) -> impl Iterator<Item = EntityId> + '_ {
        cell.moore()
            .into_iter()
            .filter_map(move |c| self.cells.get(&c))
            .flat_map(|set| set.iter().copied())
    }

    pub fn contains(&self, id: EntityId, cell: CellCoord) -> bool {
        self.cells.get(&cell).is_some_and(|set| set.contains(&id))
    }

    /// Non-empty cells
    pub fn occupied_cells(&self) -> impl Iterator<Item = (CellCoord, &HashSet<EntityId>)> {
        self.cells.iter().map(|(cell, set)| (*cell, set))
    }

    /// Total number of ids stored
    pub fn len(&self) -> usize {
        self.cells.values().map(HashSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;
    use proptest::prelude::*;

    #[test]
    fn test_cell_from_position_floors() {
        assert_eq!(CellCoord::from_position(DVec2::new(0.0, 0.0), 10.0), CellCoord::new(0, 0));
        assert_eq!(CellCoord::from_position(DVec2::new(9.99, 10.0), 10.0), CellCoord::new(0, 1));
        assert_eq!(CellCoord::from_position(DVec2::new(-0.1, 25.0), 10.0), CellCoord::new(-1, 2));
    }

    #[test]
    fn test_invalid_cell_size() {
        assert!(SpatialGrid::new(0.0).is_err());
        assert!(SpatialGrid::new(-4.0).is_err());
        assert!(SpatialGrid::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_insert_and_remove() {
        let mut grid = SpatialGrid::new(10.0).unwrap();
        let cell = grid.insert(EntityId(1), DVec2::new(15.0, 5.0));
        assert_eq!(cell, CellCoord::new(1, 0));
        assert!(grid.contains(EntityId(1), cell));
        assert_eq!(grid.len(), 1);

        grid.remove(EntityId(1), cell);
        assert!(!grid.contains(EntityId(1), cell));
        assert!(grid.is_empty());

        // Removing again is a no-op
        grid.remove(EntityId(1), cell);
        grid.remove(EntityId(9), CellCoord::new(40, 40));
        assert!(grid.is_empty());
    }

    #[test]
    fn test_move_within_cell_is_noop() {
        let mut grid = SpatialGrid::new(10.0).unwrap();
        let cell = grid.insert(EntityId(1), DVec2::new(1.0, 1.0));
        let after = grid.move_entity(EntityId(1), cell, DVec2::new(8.0, 8.0));
        assert_eq!(after, cell);
        assert!(grid.contains(EntityId(1), cell));
    }

    #[test]
    fn test_move_across_cells() {
        let mut grid = SpatialGrid::new(10.0).unwrap();
        let cell = grid.insert(EntityId(1), DVec2::new(9.0, 1.0));
        let after = grid.move_entity(EntityId(1), cell, DVec2::new(11.0, 1.0));
        assert_eq!(after, CellCoord::new(1, 0));
        assert!(!grid.contains(EntityId(1), cell));
        assert!(grid.contains(EntityId(1), after));
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn test_neighbors_cover_moore_block() {
        let mut grid = SpatialGrid::new(10.0).unwrap();
        grid.insert(EntityId(1), DVec2::new(15.0, 15.0)); // (1,1) centre
        grid.insert(EntityId(2), DVec2::new(5.0, 5.0)); // (0,0) corner
        grid.insert(EntityId(3), DVec2::new(25.0, 25.0)); // (2,2) corner
        grid.insert(EntityId(4), DVec2::new(35.0, 15.0)); // (3,1) outside

        let mut found: Vec<_> = grid.neighbors(CellCoord::new(1, 1)).collect();
        found.sort();
        assert_eq!(found, vec![EntityId(1), EntityId(2), EntityId(3)]);
    }

    #[test]
    fn test_overlapping_pair_always_neighbours() {
        // cell edge 2, radius 1: any overlapping pair is at most one cell apart
        let mut grid = SpatialGrid::new(2.0).unwrap();
        let a = grid.insert(EntityId(1), DVec2::new(1.99, 1.99));
        grid.insert(EntityId(2), DVec2::new(2.5, 2.5));
        assert!(grid.neighbors(a).any(|id| id == EntityId(2)));
    }

    #[derive(Debug, Clone)]
    enum Op {
        Insert(u64, f64, f64),
        Move(u64, f64, f64),
        Remove(u64),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u64..16, -100.0f64..100.0, -100.0f64..100.0).prop_map(|(i, x, y)| Op::Insert(i, x, y)),
            (0u64..16, -100.0f64..100.0, -100.0f64..100.0).prop_map(|(i, x, y)| Op::Move(i, x, y)),
            (0u64..16).prop_map(Op::Remove),
        ]
    }

    proptest! {
        #[test]
        fn prop_every_live_id_in_exactly_one_matching_cell(ops in prop::collection::vec(op_strategy(), 0..64)) {
            let mut grid = SpatialGrid::new(7.5).unwrap();
            let mut live: HashMap<EntityId, (DVec2, CellCoord)> = HashMap::new();

            for op in ops {
                match op {
                    Op::Insert(i, x, y) => {
                        let id = EntityId(i);
                        if !live.contains_key(&id) {
                            let pos = DVec2::new(x, y);
                            let cell = grid.insert(id, pos);
                            live.insert(id, (pos, cell));
                        }
                    }
                    Op::Move(i, x, y) => {
                        let id = EntityId(i);
                        if let Some((_, cell)) = live.get(&id).copied() {
                            let pos = DVec2::new(x, y);
                            let cell = grid.move_entity(id, cell, pos);
                            live.insert(id, (pos, cell));
                        }
                    }
                    Op::Remove(i) => {
                        let id = EntityId(i);
                        if let Some((_, cell)) = live.remove(&id) {
                            grid.remove(id, cell);
                        }
                    }
                }
            }

            prop_assert_eq!(grid.len(), live.len());
            for (id, (pos, cell)) in &live {
                prop_assert_eq!(*cell, grid.cell_of(*pos));
                let holders = grid.occupied_cells().filter(|(_, set)| set.contains(id)).count();
                prop_assert_eq!(holders, 1);
                prop_assert!(grid.contains(*id, *cell));
            }
        }
    }
}
