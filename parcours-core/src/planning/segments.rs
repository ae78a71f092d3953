//! Renderable same-floor segments of a tour

use itertools::Itertools;
use log::{trace, warn};

use crate::Error;
use crate::model::{
    Artwork, ENTRANCE_SEGMENT_INDEX, PlanningWarning, Position, Segment, Waypoint, WaypointKind,
};
use crate::routing::{MultiRoomRouter, PathStatus, RoutedPath};

/// Segments of a tour together with the routed legs they came from
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltSegments {
    pub segments: Vec<Segment>,
    /// One leg per consecutive artwork pair
    pub legs: Vec<RoutedPath>,
    /// Leg from the entrance to the first artwork
    pub entrance_leg: Option<RoutedPath>,
    pub warnings: Vec<PlanningWarning>,
}

/// Turns an ordered artwork list into same-floor line segments
pub struct SegmentBuilder<'r, 'a> {
    router: &'r MultiRoomRouter<'a>,
}

impl<'r, 'a> SegmentBuilder<'r, 'a> {
    pub fn new(router: &'r MultiRoomRouter<'a>) -> Self {
        Self { router }
    }

    /// Segments between consecutive artworks, preceded by the entrance
    /// segments when `entrance` is on the first artwork's floor
    ///
    /// # Errors
    ///
    /// Propagates routing errors for positions outside the floor plan.
    pub fn build(
        &self,
        ordered: &[Artwork],
        entrance: Option<&Position>,
    ) -> Result<Vec<Segment>, Error> {
        Ok(self.build_with_legs(ordered, entrance)?.segments)
    }

    /// [`build`](Self::build), also returning the routed legs and the
    /// warnings raised along the way
    ///
    /// # Errors
    ///
    /// Propagates routing errors for positions outside the floor plan.
    pub fn build_with_legs(
        &self,
        ordered: &[Artwork],
        entrance: Option<&Position>,
    ) -> Result<BuiltSegments, Error> {
        let mut built = BuiltSegments {
            segments: Vec::new(),
            legs: Vec::with_capacity(ordered.len().saturating_sub(1)),
            entrance_leg: None,
            warnings: Vec::new(),
        };

        if let (Some(entrance), Some(first)) = (entrance, ordered.first()) {
            let mut leg = self.router.find_path(entrance, &first.position)?;
            retype_ends(&mut leg, WaypointKind::Entrance);
            note_status(&mut built.warnings, &leg, ENTRANCE_SEGMENT_INDEX, entrance, &first.position);

            if entrance.floor == first.position.floor {
                self.push_segments(&mut built.segments, &leg, ENTRANCE_SEGMENT_INDEX);
            } else {
                warn!(
                    "Entrance is on floor {} but the tour starts on floor {}, no entrance segment",
                    entrance.floor, first.position.floor
                );
                built.warnings.push(PlanningWarning::EntranceFloorMismatch {
                    entrance_floor: entrance.floor,
                    artwork_floor: first.position.floor,
                });
            }
            built.entrance_leg = Some(leg);
        }

        for (index, (from, to)) in ordered.iter().tuple_windows().enumerate() {
            let segment_index = i32::try_from(index).map_err(|_| {
                Error::InvalidData(format!("Tour of {} artworks is too long", ordered.len()))
            })?;
            let mut leg = self.router.find_path(&from.position, &to.position)?;
            retype_ends(&mut leg, WaypointKind::Artwork);
            note_status(&mut built.warnings, &leg, segment_index, &from.position, &to.position);
            self.push_segments(&mut built.segments, &leg, segment_index);
            built.legs.push(leg);
        }

        Ok(built)
    }

    fn push_segments(&self, segments: &mut Vec<Segment>, leg: &RoutedPath, segment_index: i32) {
        let low_confidence = leg.is_low_confidence();
        for (from, to) in leg.waypoints.iter().tuple_windows() {
            if from.position.floor != to.position.floor {
                trace!(
                    "Skipping floor change {} -> {} in segment {segment_index}",
                    from.position.floor, to.position.floor
                );
                continue;
            }
            segments.push(Segment {
                from: *from,
                to: *to,
                distance_meters: self
                    .router
                    .config()
                    .to_meters(from.position.planar_distance(&to.position)),
                floor: from.position.floor,
                segment_index,
                low_confidence,
            });
        }
    }
}

/// Types the first waypoint of a leg as `start` and the last as an artwork
fn retype_ends(leg: &mut RoutedPath, start: WaypointKind) {
    if let Some(first) = leg.waypoints.first_mut() {
        first.kind = start;
    }
    if let Some(last) = leg.waypoints.last_mut() {
        last.kind = WaypointKind::Artwork;
    }
}

fn note_status(
    warnings: &mut Vec<PlanningWarning>,
    leg: &RoutedPath,
    segment_index: i32,
    from: &Position,
    to: &Position,
) {
    let (from_room, to_room) = (from.room, to.room);
    match leg.status {
        PathStatus::Found => {}
        PathStatus::Enclosed => warnings.push(PlanningWarning::EnclosedLeg {
            segment_index,
            from_room,
            to_room,
        }),
        PathStatus::Unreachable => warnings.push(PlanningWarning::UnreachableLeg {
            segment_index,
            from_room,
            to_room,
        }),
    }
}

impl BuiltSegments {
    /// Waypoints of every leg, entrance first
    pub fn waypoints(&self) -> impl Iterator<Item = &Waypoint> {
        self.entrance_leg
            .iter()
            .chain(&self.legs)
            .flat_map(|leg| leg.waypoints.iter())
    }
}
