//! Layout aggregate validation.
//!
//! [`validate`] is a pure function over a [`LayoutPayload`]. It is exhaustive:
//! every violation in the payload is collected and returned together, so a
//! client sees all of its problems in one response instead of one per
//! round-trip. On success it hands back an immutable [`ValidatedLayout`].
//!
//! Checks, in error-ordering (not outcome-affecting) order:
//! 1. room ids unique;
//! 2. wall ids unique across rooms, detached walls, and the walls-by-id table;
//! 3. every window/door wall reference resolvable in its scope (the item's
//!    room's own vectors plus the shared walls);
//! 4. every segment index in range — a wall with fewer than 2 nodes fails
//!    every item that references it;
//! 5. numeric fields finite and non-negative, and offsets within the
//!    fractional range (`offset` in `[0, 1]`, `offset + length <= 1` for
//!    windows).

use std::collections::HashSet;

use serde::Serialize;
use thiserror::Error;

use super::model::{DoorItem, LayoutPayload, RoomPayload, WindowItem};
use super::registry::{WallRegistry, segment_nodes};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A single structural violation found in a layout payload.
///
/// Serializes with a `code` tag plus the offending identifiers, so the server
/// can return the list as structured JSON.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum ValidationError {
    #[error("duplicate room id {room_id:?}")]
    DuplicateRoomId { room_id: String },

    #[error("duplicate wall id {wall_id:?}")]
    DuplicateWallId { wall_id: String },

    #[error("{item_kind} {item_id:?} references unknown wall {wall_id:?}")]
    UnresolvedWallReference {
        item_kind: ItemKind,
        item_id: String,
        wall_id: String,
    },

    #[error("{item_kind} {item_id:?} references unknown room {room_id:?}")]
    UnresolvedRoomReference {
        item_kind: ItemKind,
        item_id: String,
        room_id: String,
    },

    #[error(
        "{item_kind} {item_id:?} uses segment {segment_index} of wall {wall_id:?}, \
         which has {segment_count} segment(s)"
    )]
    SegmentIndexOutOfRange {
        item_kind: ItemKind,
        item_id: String,
        wall_id: String,
        segment_index: usize,
        segment_count: usize,
    },

    #[error("field {field:?} of {entity_id:?} is not a finite number")]
    NonFiniteNumber { entity_id: String, field: String },

    #[error("field {field:?} of {entity_id:?} is negative ({value})")]
    NegativeNumber {
        entity_id: String,
        field: String,
        value: f64,
    },

    #[error("{item_kind} {item_id:?} has offset {offset} outside [0, 1]")]
    OffsetOutOfRange {
        item_kind: ItemKind,
        item_id: String,
        offset: f64,
    },

    #[error("window {item_id:?} spans past its segment end (offset + length = {end})")]
    WindowSpanOutOfRange { item_id: String, end: f64 },
}

/// Which kind of wall-anchored item an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Window,
    Door,
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Window => "window",
            Self::Door => "door",
        })
    }
}

impl ValidationError {
    /// Wire representation: the serialized fields plus a human-readable
    /// `message`.
    pub fn to_wire(&self) -> serde_json::Value {
        let mut value =
            serde_json::to_value(self).unwrap_or_else(|_| serde_json::Value::Null);
        if let serde_json::Value::Object(map) = &mut value {
            map.insert(
                "message".to_owned(),
                serde_json::Value::String(self.to_string()),
            );
        }
        value
    }
}

// ---------------------------------------------------------------------------
// Validated view
// ---------------------------------------------------------------------------

/// An immutable layout that passed every structural check.
///
/// The payload is only reachable by reference; downstream consumers (the
/// generation pipeline) cannot mutate it back into an unchecked state.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedLayout {
    payload: LayoutPayload,
}

impl ValidatedLayout {
    pub fn payload(&self) -> &LayoutPayload {
        &self.payload
    }

    /// Strict wire encoding (external camelCase names only).
    pub fn to_wire_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.payload)
    }

    pub fn into_inner(self) -> LayoutPayload {
        self.payload
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a layout payload, collecting every violation.
pub fn validate(payload: &LayoutPayload) -> Result<ValidatedLayout, Vec<ValidationError>> {
    let mut errors = Vec::new();

    // 1. Room ids unique.
    let mut room_ids: HashSet<&str> = HashSet::new();
    for room in &payload.rooms {
        if !room_ids.insert(room.id.as_str()) {
            errors.push(ValidationError::DuplicateRoomId {
                room_id: room.id.clone(),
            });
        }
    }

    // 2. Wall ids unique payload-wide; build the merged registry as we go.
    let mut registry = WallRegistry::new();
    for room in &payload.rooms {
        for wall in &room.vectors {
            if !registry.add_room_wall(room, wall) {
                errors.push(ValidationError::DuplicateWallId {
                    wall_id: wall.id.clone(),
                });
            }
        }
    }
    for wall in &payload.detached_walls {
        if !registry.add_shared(&wall.id, wall) {
            errors.push(ValidationError::DuplicateWallId {
                wall_id: wall.id.clone(),
            });
        }
    }
    // The map key is what anchored items reference, so it is the registered
    // name even when the embedded vector id differs.
    for (key, wall) in &payload.walls_by_id {
        if !registry.add_shared(key, wall) {
            errors.push(ValidationError::DuplicateWallId {
                wall_id: key.clone(),
            });
        }
    }

    // 3-5. Per-item reference, segment, and numeric checks. The flat lists
    // and the per-room lists are independent views; every occurrence is
    // checked. Items nested in a room fall back to that room's scope when
    // they carry no explicit room id.
    for window in &payload.windows {
        check_window(window, None, &room_ids, &registry, &mut errors);
    }
    for door in &payload.doors {
        check_door(door, None, &room_ids, &registry, &mut errors);
    }
    for room in &payload.rooms {
        check_room_numbers(room, &mut errors);
        for window in &room.windows {
            check_window(window, Some(room.id.as_str()), &room_ids, &registry, &mut errors);
        }
        for door in &room.doors {
            check_door(door, Some(room.id.as_str()), &room_ids, &registry, &mut errors);
        }
    }

    if errors.is_empty() {
        Ok(ValidatedLayout {
            payload: payload.clone(),
        })
    } else {
        Err(errors)
    }
}

/// Resolve the scope room for an item: its own `room_id` wins, then the room
/// it is nested in. An explicit `room_id` naming an unknown room is reported
/// and the item falls back to the shared scope.
fn scope_room<'a>(
    item_kind: ItemKind,
    item_id: &str,
    item_room: Option<&'a str>,
    containing_room: Option<&'a str>,
    room_ids: &HashSet<&str>,
    errors: &mut Vec<ValidationError>,
) -> Option<&'a str> {
    match item_room {
        Some(room_id) if room_ids.contains(room_id) => Some(room_id),
        Some(room_id) => {
            errors.push(ValidationError::UnresolvedRoomReference {
                item_kind,
                item_id: item_id.to_owned(),
                room_id: room_id.to_owned(),
            });
            None
        }
        None => containing_room,
    }
}

fn check_wall_anchor(
    item_kind: ItemKind,
    item_id: &str,
    wall_id: &str,
    segment_index: usize,
    scope: Option<&str>,
    registry: &WallRegistry<'_>,
    errors: &mut Vec<ValidationError>,
) {
    let Some(wall) = registry.resolve(scope, wall_id) else {
        errors.push(ValidationError::UnresolvedWallReference {
            item_kind,
            item_id: item_id.to_owned(),
            wall_id: wall_id.to_owned(),
        });
        return;
    };
    if segment_nodes(wall, segment_index).is_none() {
        errors.push(ValidationError::SegmentIndexOutOfRange {
            item_kind,
            item_id: item_id.to_owned(),
            wall_id: wall_id.to_owned(),
            segment_index,
            segment_count: wall.segment_count(),
        });
    }
}

fn check_window(
    window: &WindowItem,
    containing_room: Option<&str>,
    room_ids: &HashSet<&str>,
    registry: &WallRegistry<'_>,
    errors: &mut Vec<ValidationError>,
) {
    let scope = scope_room(
        ItemKind::Window,
        &window.id,
        window.room_id.as_deref(),
        containing_room,
        room_ids,
        errors,
    );
    check_wall_anchor(
        ItemKind::Window,
        &window.id,
        &window.wall_id,
        window.segment_index,
        scope,
        registry,
        errors,
    );
    let offset_ok = check_number(&window.id, "offset", window.offset, errors);
    let length_ok = check_number(&window.id, "length", window.length, errors);
    if offset_ok && !(0.0..=1.0).contains(&window.offset) {
        errors.push(ValidationError::OffsetOutOfRange {
            item_kind: ItemKind::Window,
            item_id: window.id.clone(),
            offset: window.offset,
        });
    } else if offset_ok && length_ok && window.offset + window.length > 1.0 {
        errors.push(ValidationError::WindowSpanOutOfRange {
            item_id: window.id.clone(),
            end: window.offset + window.length,
        });
    }
}

fn check_door(
    door: &DoorItem,
    containing_room: Option<&str>,
    room_ids: &HashSet<&str>,
    registry: &WallRegistry<'_>,
    errors: &mut Vec<ValidationError>,
) {
    let scope = scope_room(
        ItemKind::Door,
        &door.id,
        door.room_id.as_deref(),
        containing_room,
        room_ids,
        errors,
    );
    check_wall_anchor(
        ItemKind::Door,
        &door.id,
        &door.wall_id,
        door.segment_index,
        scope,
        registry,
        errors,
    );
    if check_number(&door.id, "offset", door.offset, errors)
        && !(0.0..=1.0).contains(&door.offset)
    {
        errors.push(ValidationError::OffsetOutOfRange {
            item_kind: ItemKind::Door,
            item_id: door.id.clone(),
            offset: door.offset,
        });
    }
}

fn check_room_numbers(room: &RoomPayload, errors: &mut Vec<ValidationError>) {
    check_number(&room.id, "area", room.area, errors);
    check_number(&room.id, "length", room.length, errors);
    check_number(&room.id, "width", room.width, errors);
}

/// Finite and non-negative. Returns `true` when the value passed, so range
/// checks only run on sane numbers.
fn check_number(
    entity_id: &str,
    field: &str,
    value: f64,
    errors: &mut Vec<ValidationError>,
) -> bool {
    if !value.is_finite() {
        errors.push(ValidationError::NonFiniteNumber {
            entity_id: entity_id.to_owned(),
            field: field.to_owned(),
        });
        false
    } else if value < 0.0 {
        errors.push(ValidationError::NegativeNumber {
            entity_id: entity_id.to_owned(),
            field: field.to_owned(),
            value,
        });
        false
    } else {
        true
    }
}
