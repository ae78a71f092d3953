//! Data model of the route planner
//!
//! Contains the floor plan, the artwork catalogue and the tour produced
//! for a planning request.

pub mod artwork;
pub mod floor_plan;
pub mod position;
pub mod to_geojson;
pub mod tour;

pub use artwork::{Artwork, ArtworkType, estimate_narration_seconds};
pub use floor_plan::{
    Connection, ConnectionKind, Door, FloorPlanGraph, LinkKind, Room, RoomGraph, VerticalLink,
    WallSegment,
};
pub use position::Position;
pub use tour::{
    ConnectivityMode, ENTRANCE_SEGMENT_INDEX, PlanningWarning, Segment, Tour, TourMetadata,
    Waypoint, WaypointKind,
};
