//! Planning results: waypoints, segments and the tour itself

use serde::Serialize;

use super::{Artwork, Position};
use crate::{Floor, RoomId};

/// `segment_index` of the entrance → first artwork segment
pub const ENTRANCE_SEGMENT_INDEX: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WaypointKind {
    Artwork,
    Door,
    Stairs,
    Elevator,
    Entrance,
    /// Untyped point of a walking path: a leg endpoint or a turn
    /// around an obstacle
    Path,
}

/// A typed point along a computed path
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Waypoint {
    pub position: Position,
    pub kind: WaypointKind,
}

impl Waypoint {
    pub fn new(position: Position, kind: WaypointKind) -> Self {
        Self { position, kind }
    }

    pub fn path(position: Position) -> Self {
        Self::new(position, WaypointKind::Path)
    }
}

/// A same-floor line between two consecutive waypoints of the tour
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub from: Waypoint,
    pub to: Waypoint,
    pub distance_meters: f64,
    pub floor: Floor,
    /// Index of the tour leg this segment belongs to,
    /// [`ENTRANCE_SEGMENT_INDEX`] for the entrance leg
    pub segment_index: i32,
    /// The leg was routed with a penalized fallback estimate
    pub low_confidence: bool,
}

/// Whether candidate pruning ran on the room graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectivityMode {
    /// Candidates were restricted to one connected component
    Connected,
    /// Pruning would have emptied the candidate set, all candidates kept
    Minimal,
}

/// Non-fatal conditions met while planning
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanningWarning {
    DegradedConnectivity {
        candidate_count: usize,
    },
    UnreachableLeg {
        segment_index: i32,
        from_room: RoomId,
        to_room: RoomId,
    },
    EnclosedLeg {
        segment_index: i32,
        from_room: RoomId,
        to_room: RoomId,
    },
    EntranceFloorMismatch {
        entrance_floor: Floor,
        artwork_floor: Floor,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TourMetadata {
    /// Seed of the weighted sampling, replays the same selection apart
    /// from the first pick
    pub seed: u64,
    pub artwork_count: usize,
    pub floors_visited: usize,
    pub rooms_visited: usize,
    pub connectivity: ConnectivityMode,
    pub low_confidence_legs: usize,
    pub entrance_distance_meters: Option<f64>,
    /// Routed distance from each artwork to the next one, 0 for the last
    pub distances_to_next: Vec<f64>,
    pub warnings: Vec<PlanningWarning>,
}

/// Final ordered sequence of artworks plus rendered path segments
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tour {
    ordered_artworks: Vec<Artwork>,
    segments: Vec<Segment>,
    total_distance_meters: f64,
    total_duration_minutes: u32,
    metadata: TourMetadata,
}

impl Tour {
    pub(crate) fn new(
        ordered_artworks: Vec<Artwork>,
        segments: Vec<Segment>,
        total_distance_meters: f64,
        total_duration_minutes: u32,
        metadata: TourMetadata,
    ) -> Self {
        Self {
            ordered_artworks,
            segments,
            total_distance_meters,
            total_duration_minutes,
            metadata,
        }
    }

    pub fn ordered_artworks(&self) -> &[Artwork] {
        &self.ordered_artworks
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn total_distance_meters(&self) -> f64 {
        self.total_distance_meters
    }

    pub fn total_duration_minutes(&self) -> u32 {
        self.total_duration_minutes
    }

    pub fn metadata(&self) -> &TourMetadata {
        &self.metadata
    }

    /// Whether any part of the tour relies on a fallback estimate
    pub fn is_degraded(&self) -> bool {
        self.metadata.connectivity == ConnectivityMode::Minimal
            || self.metadata.low_confidence_legs > 0
    }

    /// Artwork ids in visit order
    pub fn path_order(&self) -> Vec<crate::ArtworkId> {
        self.ordered_artworks.iter().map(|artwork| artwork.id).collect()
    }
}
