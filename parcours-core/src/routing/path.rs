use serde::Serialize;

use crate::model::Waypoint;

/// Confidence of a routed distance
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PathStatus {
    /// Obstacle-aware walking path
    Found,
    /// A room grid had no free path, the leg is a penalized estimate
    Enclosed,
    /// No chain of rooms joins the endpoints, the whole path is a
    /// penalized estimate
    Unreachable,
}

impl PathStatus {
    /// The less trustworthy of two statuses
    pub fn worst(self, other: Self) -> Self {
        self.max(other)
    }
}

/// Walking path between two positions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutedPath {
    pub distance_meters: f64,
    /// Polyline of the path, starting at the origin and ending at the
    /// destination
    pub waypoints: Vec<Waypoint>,
    pub status: PathStatus,
}

impl RoutedPath {
    pub fn is_unreachable(&self) -> bool {
        self.status == PathStatus::Unreachable
    }

    /// The distance is a fallback estimate rather than a navigable route
    pub fn is_low_confidence(&self) -> bool {
        self.status != PathStatus::Found
    }
}
