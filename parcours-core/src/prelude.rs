pub use crate::config::PlannerConfig;
pub use crate::error::Error;

// Floor plan and catalogue
pub use crate::model::{
    Artwork, ArtworkType, ConnectionKind, Door, FloorPlanGraph, LinkKind, Position, Room,
    VerticalLink, WallSegment, estimate_narration_seconds,
};

// Routing
pub use crate::routing::{GridCache, GridPathfinder, MultiRoomRouter, PathStatus, RoutedPath};

// Tour assembly
pub use crate::model::{
    ConnectivityMode, ENTRANCE_SEGMENT_INDEX, PlanningWarning, Segment, Tour, TourMetadata,
    Waypoint, WaypointKind,
};
pub use crate::planning::{
    ArtworkSelector, PlanRequest, RouteSequencer, SegmentBuilder, Selection, plan_tour,
};

pub use crate::{ArtworkId, Floor, RoomId};
