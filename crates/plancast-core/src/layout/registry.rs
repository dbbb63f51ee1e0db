//! Wall reference resolution.
//!
//! Windows and doors reference a wall by id. The id is looked up in a merged
//! registry: the shared scope (detached walls plus the `wallsById` table) and,
//! when the item belongs to a room, that room's own vectors. The registry
//! borrows from the payload; it is built per validation pass and thrown away.

use std::collections::HashMap;

use super::model::{Node, RoomPayload, Vector};

/// Merged wall lookup over one layout payload.
///
/// Id collisions are never resolved by overriding: [`WallRegistry::add`]
/// refuses the second insert and reports it, and the validator turns that
/// into a `DuplicateWallId` error.
#[derive(Debug, Default)]
pub struct WallRegistry<'a> {
    /// Walls visible to every item: detached walls and the walls-by-id table.
    shared: HashMap<&'a str, &'a Vector>,
    /// Walls owned by a single room, keyed by room id.
    by_room: HashMap<&'a str, HashMap<&'a str, &'a Vector>>,
}

impl<'a> WallRegistry<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a shared wall under an explicit key. Returns `false` if the
    /// key is already taken anywhere in the registry.
    pub fn add_shared(&mut self, key: &'a str, wall: &'a Vector) -> bool {
        if self.contains(key) {
            return false;
        }
        self.shared.insert(key, wall);
        true
    }

    /// Register a wall owned by `room`. Returns `false` on id collision with
    /// any already-registered wall, shared or room-owned.
    pub fn add_room_wall(&mut self, room: &'a RoomPayload, wall: &'a Vector) -> bool {
        if self.contains(&wall.id) {
            return false;
        }
        self.by_room
            .entry(room.id.as_str())
            .or_default()
            .insert(wall.id.as_str(), wall);
        true
    }

    fn contains(&self, key: &str) -> bool {
        self.shared.contains_key(key)
            || self.by_room.values().any(|walls| walls.contains_key(key))
    }

    /// Resolve a wall id as seen from `room_id`'s scope.
    ///
    /// Room-owned walls are only visible to items of that room; shared walls
    /// are visible everywhere. `room_id = None` resolves against the shared
    /// scope alone.
    pub fn resolve(&self, room_id: Option<&str>, wall_id: &str) -> Option<&'a Vector> {
        if let Some(room_id) = room_id {
            if let Some(wall) = self.by_room.get(room_id).and_then(|walls| walls.get(wall_id)) {
                return Some(wall);
            }
        }
        self.shared.get(wall_id).copied()
    }
}

/// The two nodes bounding segment `index` of `wall`, or `None` when the index
/// is out of range. A wall with fewer than 2 nodes has no valid segment.
pub fn segment_nodes(wall: &Vector, index: usize) -> Option<(&Node, &Node)> {
    if index + 1 < wall.nodes.len() {
        Some((&wall.nodes[index], &wall.nodes[index + 1]))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plancast_test_utils::{room, wall, wall_with_nodes};

    #[test]
    fn resolves_shared_walls_from_any_scope() {
        let w = wall("wall-1");
        let mut registry = WallRegistry::new();
        assert!(registry.add_shared("wall-1", &w));

        assert!(registry.resolve(None, "wall-1").is_some());
        assert!(registry.resolve(Some("room-1"), "wall-1").is_some());
        assert!(registry.resolve(None, "wall-404").is_none());
    }

    #[test]
    fn room_walls_are_scoped_to_their_room() {
        let r = room("room-1", vec![wall("wall-1")]);
        let mut registry = WallRegistry::new();
        assert!(registry.add_room_wall(&r, &r.vectors[0]));

        assert!(registry.resolve(Some("room-1"), "wall-1").is_some());
        assert!(registry.resolve(Some("room-2"), "wall-1").is_none());
        assert!(registry.resolve(None, "wall-1").is_none());
    }

    #[test]
    fn rejects_id_collisions_instead_of_overriding() {
        let shared = wall("wall-1");
        let r = room("room-1", vec![wall("wall-1")]);
        let mut registry = WallRegistry::new();

        assert!(registry.add_shared("wall-1", &shared));
        assert!(!registry.add_room_wall(&r, &r.vectors[0]));
        assert!(!registry.add_shared("wall-1", &shared));
    }

    #[test]
    fn segment_lookup_is_bounds_checked() {
        let w = wall_with_nodes("wall-1", &[(0.0, 0.0), (4.0, 0.0), (4.0, 3.0)]);
        let (a, b) = segment_nodes(&w, 1).expect("segment 1 exists");
        assert_eq!(a.x, 4.0);
        assert_eq!(b.y, 3.0);
        assert!(segment_nodes(&w, 2).is_none());
    }

    #[test]
    fn degenerate_wall_has_no_segments() {
        let w = wall_with_nodes("stub", &[(0.0, 0.0)]);
        assert!(segment_nodes(&w, 0).is_none());

        let empty = wall_with_nodes("empty", &[]);
        assert!(segment_nodes(&empty, 0).is_none());
    }
}
