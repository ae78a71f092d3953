//! Floor plan components - rooms, doors, vertical links and walls

use geo::{BoundingRect, Centroid, Coord, Intersects, LineString, Point, Polygon, Rect};
use serde::{Deserialize, Serialize};

use crate::{Error, Floor, RoomId};

/// A polygonal area of one floor
#[derive(Debug, Clone)]
pub struct Room {
    pub id: RoomId,
    pub floor: Floor,
    /// Outline of the room
    pub polygon: Polygon<f64>,
    /// Axis-aligned bounds of the outline
    pub bounds: Rect<f64>,
    /// Centroid of the outline
    pub center: Coord<f64>,
}

impl Room {
    /// Creates a room from its outline
    ///
    /// # Errors
    ///
    /// Returns `Error::MalformedGeometry` if the outline has no area to
    /// bound, i.e. no points.
    pub fn from_polygon(id: RoomId, floor: Floor, polygon: Polygon<f64>) -> Result<Self, Error> {
        let bounds = polygon.bounding_rect().ok_or_else(|| {
            Error::MalformedGeometry(format!("Room {id} has an empty outline"))
        })?;
        let center = polygon
            .centroid()
            .map_or_else(|| bounds.center(), Coord::from);

        Ok(Self {
            id,
            floor,
            polygon,
            bounds,
            center,
        })
    }

    /// Creates a room from the vertices of its outline
    ///
    /// # Errors
    ///
    /// Returns `Error::MalformedGeometry` if fewer than three vertices are given.
    pub fn from_points(id: RoomId, floor: Floor, points: &[(f64, f64)]) -> Result<Self, Error> {
        if points.len() < 3 {
            return Err(Error::MalformedGeometry(format!(
                "Room {id} needs at least 3 outline points, got {}",
                points.len()
            )));
        }
        let exterior = LineString::from(points.to_vec());
        Self::from_polygon(id, floor, Polygon::new(exterior, vec![]))
    }

    /// Creates an axis-aligned rectangular room
    pub fn rectangle(id: RoomId, floor: Floor, min: (f64, f64), max: (f64, f64)) -> Self {
        let bounds = Rect::new(Coord::from(min), Coord::from(max));
        Self {
            id,
            floor,
            polygon: bounds.to_polygon(),
            bounds,
            center: bounds.center(),
        }
    }

    /// Whether the point lies inside the room or on its outline
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        self.polygon.intersects(&Point::new(x, y))
    }
}

/// Same-floor connection between two rooms
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Door {
    pub room_a: RoomId,
    pub room_b: RoomId,
    /// Recorded opening, if the floor plan editor placed one
    pub position: Option<Coord<f64>>,
}

impl Door {
    pub fn new(room_a: RoomId, room_b: RoomId) -> Self {
        Self {
            room_a,
            room_b,
            position: None,
        }
    }

    pub fn at(room_a: RoomId, room_b: RoomId, x: f64, y: f64) -> Self {
        Self {
            room_a,
            room_b,
            position: Some(Coord { x, y }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    Stairs,
    Elevator,
}

/// Stairs or elevator between two rooms, possibly on different floors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalLink {
    pub room_from: RoomId,
    pub room_to: RoomId,
    pub position: Coord<f64>,
    pub kind: LinkKind,
}

/// Wall obstacle confined to one room
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallSegment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub room: RoomId,
}

impl WallSegment {
    pub fn new(room: RoomId, start: (f64, f64), end: (f64, f64)) -> Self {
        Self {
            x1: start.0,
            y1: start.1,
            x2: end.0,
            y2: end.1,
            room,
        }
    }

    pub fn start(&self) -> Coord<f64> {
        Coord {
            x: self.x1,
            y: self.y1,
        }
    }

    pub fn end(&self) -> Coord<f64> {
        Coord {
            x: self.x2,
            y: self.y2,
        }
    }
}
