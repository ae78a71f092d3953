use geo::{Coord, Distance, Euclidean, Point};
use serde::{Deserialize, Serialize};

use crate::{Floor, RoomId};

/// A point of the floor plan, in plan units, tied to the room and floor
/// it lies in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub room: RoomId,
    pub floor: Floor,
}

impl Position {
    pub fn new(x: f64, y: f64, room: RoomId, floor: Floor) -> Self {
        Self { x, y, room, floor }
    }

    pub fn point(&self) -> Point<f64> {
        Point::new(self.x, self.y)
    }

    pub fn coord(&self) -> Coord<f64> {
        Coord {
            x: self.x,
            y: self.y,
        }
    }

    /// Straight-line distance in plan units, floors are ignored
    pub fn planar_distance(&self, other: &Position) -> f64 {
        Euclidean.distance(self.point(), other.point())
    }

    /// Same coordinates, moved into another room
    pub(crate) fn relocated(coord: Coord<f64>, room: RoomId, floor: Floor) -> Self {
        Self::new(coord.x, coord.y, room, floor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planar_distance_ignores_floor() {
        let a = Position::new(0.0, 0.0, 1, 0);
        let b = Position::new(30.0, 40.0, 2, 3);
        assert!((a.planar_distance(&b) - 50.0).abs() < 1e-9);
    }
}
