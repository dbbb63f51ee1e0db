//! Shared test fixtures for plancast crates.
//!
//! Builders for the layout object graph plus a canonical one-room layout
//! (one 2-node wall, one door anchored at segment 0, offset 0.5) that is
//! valid by construction. Consumed as a dev-dependency by `plancast-core`
//! and `plancast-server`.

use plancast_core::layout::{
    DoorItem, LayoutPayload, Node, RoomPayload, RoomPosition, Vector, WindowItem,
};

/// A straight 2-node wall from (0, 0) to (4, 0).
pub fn wall(id: &str) -> Vector {
    wall_with_nodes(id, &[(0.0, 0.0), (4.0, 0.0)])
}

/// A wall polyline through the given points.
pub fn wall_with_nodes(id: &str, points: &[(f64, f64)]) -> Vector {
    let nodes = points
        .iter()
        .enumerate()
        .map(|(i, &(x, y))| Node {
            id: format!("{id}-n{i}"),
            x,
            y,
            kind: "corner".to_owned(),
        })
        .collect();
    Vector {
        id: id.to_owned(),
        nodes,
    }
}

/// A window anchored to `wall_id`, with no explicit room reference.
pub fn window(id: &str, wall_id: &str, segment_index: usize, offset: f64, length: f64) -> WindowItem {
    WindowItem {
        id: id.to_owned(),
        wall_id: wall_id.to_owned(),
        room_id: None,
        segment_index,
        offset,
        length,
    }
}

/// A door anchored to `wall_id`, with no explicit room reference.
pub fn door(id: &str, wall_id: &str, segment_index: usize, offset: f64) -> DoorItem {
    DoorItem {
        id: id.to_owned(),
        wall_id: wall_id.to_owned(),
        room_id: None,
        segment_index,
        offset,
    }
}

/// A 4m x 3m room owning the given walls, with no windows, doors, or photos.
pub fn room(id: &str, vectors: Vec<Vector>) -> RoomPayload {
    RoomPayload {
        id: id.to_owned(),
        label: format!("Room {id}"),
        area: 12.0,
        length: 4.0,
        width: 3.0,
        position: RoomPosition { x: 0.0, y: 0.0 },
        vectors,
        windows: Vec::new(),
        doors: Vec::new(),
        photos: Vec::new(),
    }
}

/// The canonical valid layout: `room-1` owns `wall-1` (2 nodes) and a door at
/// segment 0, offset 0.5, referencing that wall.
pub fn single_room_layout() -> LayoutPayload {
    let mut r = room("room-1", vec![wall("wall-1")]);
    r.doors.push(door("door-1", "wall-1", 0, 0.5));
    LayoutPayload {
        rooms: vec![r],
        detached_walls: Vec::new(),
        windows: Vec::new(),
        doors: Vec::new(),
        walls_by_id: Default::default(),
    }
}

/// The canonical layout in external (camelCase) wire form, as a client would
/// send it.
pub fn wire_layout_json() -> serde_json::Value {
    serde_json::json!({
        "rooms": [{
            "id": "room-1",
            "label": "Room room-1",
            "area": 12.0,
            "length": 4.0,
            "width": 3.0,
            "position": {"x": 0.0, "y": 0.0},
            "vectors": [{
                "id": "wall-1",
                "nodes": [
                    {"id": "wall-1-n0", "x": 0.0, "y": 0.0, "kind": "corner"},
                    {"id": "wall-1-n1", "x": 4.0, "y": 0.0, "kind": "corner"},
                ],
            }],
            "windows": [],
            "doors": [{
                "id": "door-1",
                "wallId": "wall-1",
                "segmentIndex": 0,
                "offset": 0.5,
            }],
            "photos": [],
        }],
        "detachedWalls": [],
        "windows": [],
        "doors": [],
        "wallsById": {},
    })
}
