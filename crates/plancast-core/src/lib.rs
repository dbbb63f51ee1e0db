//! plancast-core: floor-plan layout model, validation, and render pipeline.
//!
//! The layout aggregate ([`layout::LayoutPayload`]) carries cross-referential
//! geometry: walls are named polylines, and windows/doors anchor themselves to
//! a wall segment by id, segment index, and fractional offset.
//! [`layout::validate`] checks every reference and returns either an immutable
//! [`layout::ValidatedLayout`] or the full list of violations. The
//! [`generate`] module turns a validated layout into a prompt for an external
//! image-generation endpoint and interprets its loosely-structured response.
//! The [`store`] module is the flat-file persistence gateway for opaque layout
//! blobs and uploaded photos.

pub mod config;
pub mod generate;
pub mod layout;
pub mod store;

// The fixture crate depends on plancast-core, so linking it as a
// dev-dependency would give the unit tests a second, incompatible copy of
// every layout type. Compile its source into the test build instead; the
// self-alias lets the fixture file's `plancast_core::` imports resolve to
// this crate.
#[cfg(test)]
extern crate self as plancast_core;

#[cfg(test)]
#[path = "../../plancast-test-utils/src/lib.rs"]
mod plancast_test_utils;
