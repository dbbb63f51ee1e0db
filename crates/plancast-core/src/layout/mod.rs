//! Floor-plan layout: geometry primitives, wall reference resolution, and
//! aggregate validation.

pub mod model;
pub mod registry;
pub mod validate;

pub use model::{
    DoorItem, LayoutPayload, Node, RoomPayload, RoomPosition, SaveLayoutRequest, Vector,
    WindowItem,
};
pub use registry::{WallRegistry, segment_nodes};
pub use validate::{ValidatedLayout, ValidationError, validate};
