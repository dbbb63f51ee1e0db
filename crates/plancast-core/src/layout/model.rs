//! Layout payload types and their wire encoding.
//!
//! Internally every field uses snake_case; the external wire format uses
//! camelCase. The mapping is declared per field with explicit
//! `rename`/`alias` pairs: decoding is tolerant (either naming is accepted),
//! encoding is strict (only the external name is ever emitted). Unknown
//! fields are ignored on this typed path; the opaque save-layout path keeps
//! its payload as a raw [`serde_json::Value`] instead and preserves
//! everything verbatim.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Geometry primitives
// ---------------------------------------------------------------------------

/// One point of a wall or furniture polyline.
///
/// `kind` is an open-ended tag supplied by the client (e.g. corner, arc
/// control point); the core never interprets it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub kind: String,
}

/// A named polyline representing a wall or a furniture outline.
///
/// Segment `i` is the line between `nodes[i]` and `nodes[i + 1]`, so a vector
/// needs at least 2 nodes before any segment index is meaningful.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    pub id: String,
    pub nodes: Vec<Node>,
}

impl Vector {
    /// Number of addressable segments (`nodes.len() - 1`, saturating).
    pub fn segment_count(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }
}

// ---------------------------------------------------------------------------
// Wall-anchored items
// ---------------------------------------------------------------------------

/// A window anchored to a wall segment.
///
/// `offset` and `length` are fractions of the referenced segment's length:
/// the window spans `[offset, offset + length]` with both bounds in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowItem {
    pub id: String,
    #[serde(rename = "wallId", alias = "wall_id")]
    pub wall_id: String,
    #[serde(rename = "roomId", alias = "room_id", default)]
    pub room_id: Option<String>,
    #[serde(rename = "segmentIndex", alias = "segment_index")]
    pub segment_index: usize,
    pub offset: f64,
    pub length: f64,
}

/// A door anchored to a wall segment at a single fractional offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoorItem {
    pub id: String,
    #[serde(rename = "wallId", alias = "wall_id")]
    pub wall_id: String,
    #[serde(rename = "roomId", alias = "room_id", default)]
    pub room_id: Option<String>,
    #[serde(rename = "segmentIndex", alias = "segment_index")]
    pub segment_index: usize,
    pub offset: f64,
}

// ---------------------------------------------------------------------------
// Rooms and the layout aggregate
// ---------------------------------------------------------------------------

/// A room's placement origin in the overall plan coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoomPosition {
    pub x: f64,
    pub y: f64,
}

/// One room: identity, physical dimensions, placement, own geometry, and the
/// photo references attached to it.
///
/// `area` is advisory; the validator checks it is finite and non-negative but
/// does not enforce `area == length * width`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomPayload {
    pub id: String,
    pub label: String,
    pub area: f64,
    pub length: f64,
    pub width: f64,
    pub position: RoomPosition,
    pub vectors: Vec<Vector>,
    pub windows: Vec<WindowItem>,
    pub doors: Vec<DoorItem>,
    pub photos: Vec<String>,
}

/// The full floor plan exchanged as one unit.
///
/// The flat `windows`/`doors` lists and the per-room lists are independent
/// authoritative views: every occurrence is validated, and an item may appear
/// in both without error. `walls_by_id` is keyed by the id that anchored
/// items reference; a `BTreeMap` keeps the strict encoding deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutPayload {
    pub rooms: Vec<RoomPayload>,
    #[serde(rename = "detachedWalls", alias = "detached_walls", default)]
    pub detached_walls: Vec<Vector>,
    pub windows: Vec<WindowItem>,
    pub doors: Vec<DoorItem>,
    #[serde(rename = "wallsById", alias = "walls_by_id", default)]
    pub walls_by_id: BTreeMap<String, Vector>,
}

// ---------------------------------------------------------------------------
// Persistence envelope
// ---------------------------------------------------------------------------

/// Envelope for the opaque save-layout path.
///
/// `payload` is deliberately untyped: it is persisted verbatim with no schema
/// enforcement, and nothing re-validates it on reload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveLayoutRequest {
    #[serde(rename = "layoutId", alias = "layout_id")]
    pub layout_id: String,
    pub payload: serde_json::Value,
}
