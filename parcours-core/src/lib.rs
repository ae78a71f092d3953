//! Route planning engine for personalised museum tours.
//!
//! Given a floor plan (rooms, doors, walls, stairs and elevators) and a
//! catalogue of narrated artworks, the engine picks a diverse subset that
//! fits a visit duration, orders it into a walkable sequence and renders
//! the walking path between consecutive stops as per-floor segments.

pub mod config;
pub mod error;
pub mod model;
pub mod planning;
pub mod prelude;
pub mod routing;

pub use config::PlannerConfig;
pub use error::Error;
pub use model::{
    Artwork, ArtworkType, Door, FloorPlanGraph, LinkKind, Position, Room, Segment, Tour,
    VerticalLink, WallSegment, Waypoint, WaypointKind,
};
pub use planning::{PlanRequest, plan_tour};
pub use routing::{GridPathfinder, MultiRoomRouter, PathStatus, RoutedPath};

/// Identifier of a room in the floor plan
pub type RoomId = u32;
/// Floor number, 0 is the ground floor
pub type Floor = i32;
/// Identifier of an artwork in the catalogue
pub type ArtworkId = u32;

/// Floor the selector prefers to start from
pub const GROUND_FLOOR: Floor = 0;
/// Default plan calibration: 40 plan units span half a meter
pub const SCALE_METERS_PER_UNIT: f64 = 0.0125;
/// Default obstacle grid cell size, in plan units
pub const GRID_RESOLUTION: f64 = 5.0;
/// Default lower bound on the number of artworks in a tour
pub const MIN_ARTWORKS: usize = 3;
/// Default upper bound on the cells of one room's obstacle grid
pub const MAX_GRID_CELLS: usize = 4_000_000;
