//! Floor plan: rooms, doors, walls and vertical links

pub mod components;
pub mod graph;

pub use components::{Door, LinkKind, Room, VerticalLink, WallSegment};
pub use graph::{Connection, ConnectionKind, FloorPlanGraph, RoomGraph};
