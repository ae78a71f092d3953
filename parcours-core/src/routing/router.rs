//! Paths spanning several rooms

use std::collections::VecDeque;

use fixedbitset::FixedBitSet;
use log::{trace, warn};
use petgraph::graph::NodeIndex;

use super::astar::GridPathfinder;
use super::path::{PathStatus, RoutedPath};
use crate::model::floor_plan::graph::other_end;
use crate::model::{Connection, ConnectionKind, FloorPlanGraph, LinkKind, Position, Waypoint};
use crate::{Error, PlannerConfig};

/// One room-to-room hop of a room route
#[derive(Debug, Clone, Copy)]
struct Hop {
    next: NodeIndex,
    connection: Connection,
}

/// Router between arbitrary positions of the floor plan
///
/// Finds the chain of rooms with the fewest crossings by breadth-first
/// search, then stitches one grid leg per room through the crossing points.
/// The result is not necessarily the shortest walking distance.
#[derive(Debug)]
pub struct MultiRoomRouter<'a> {
    pathfinder: GridPathfinder<'a>,
}

impl<'a> MultiRoomRouter<'a> {
    pub fn new(plan: &'a FloorPlanGraph, config: &'a PlannerConfig) -> Self {
        Self {
            pathfinder: GridPathfinder::new(plan, config),
        }
    }

    pub fn pathfinder(&self) -> &GridPathfinder<'a> {
        &self.pathfinder
    }

    pub fn plan(&self) -> &'a FloorPlanGraph {
        self.pathfinder.plan()
    }

    pub fn config(&self) -> &'a PlannerConfig {
        self.pathfinder.config()
    }

    /// Walking path between two positions
    ///
    /// When no chain of rooms joins the endpoints, the straight-line
    /// distance times `unreachable_penalty_factor` is returned with
    /// [`PathStatus::Unreachable`].
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPosition` if a position references an unknown
    /// room.
    pub fn find_path(&self, from: &Position, to: &Position) -> Result<RoutedPath, Error> {
        if from.room == to.room {
            return self.pathfinder.find_path(from, to);
        }

        let plan = self.plan();
        let config = self.config();
        let start = plan
            .node(from.room)
            .ok_or_else(|| Error::InvalidPosition(format!("Unknown room {}", from.room)))?;
        let goal = plan
            .node(to.room)
            .ok_or_else(|| Error::InvalidPosition(format!("Unknown room {}", to.room)))?;

        let Some(hops) = room_route(plan, start, goal) else {
            warn!(
                "Rooms {} and {} are not connected, using penalized estimate",
                from.room, to.room
            );
            let estimate = from.planar_distance(to) * config.unreachable_penalty_factor;
            return Ok(RoutedPath {
                distance_meters: config.to_meters(estimate),
                waypoints: vec![Waypoint::path(*from), Waypoint::path(*to)],
                status: PathStatus::Unreachable,
            });
        };

        let mut distance = 0.0;
        let mut status = PathStatus::Found;
        let mut waypoints = vec![Waypoint::path(*from)];
        let mut current = *from;

        for hop in &hops {
            let kind = hop.connection.kind;
            let crossing = hop.connection.crossing;
            let exit = Position::relocated(crossing, current.room, current.floor);

            let leg = self.pathfinder.find_path(&current, &exit)?;
            distance += leg.distance_meters;
            status = status.worst(leg.status);
            extend_inner(&mut waypoints, &leg);
            waypoints.push(Waypoint::new(exit, kind.waypoint_kind()));

            let next_room = plan.room_at(hop.next);
            let entry = Position::relocated(crossing, next_room.id, next_room.floor);
            if let ConnectionKind::Vertical(link) = kind {
                distance += match link {
                    LinkKind::Stairs => config.stairs_penalty_meters,
                    LinkKind::Elevator => config.elevator_penalty_meters,
                };
                waypoints.push(Waypoint::new(entry, kind.waypoint_kind()));
            }
            current = entry;
        }

        let leg = self.pathfinder.find_path(&current, to)?;
        distance += leg.distance_meters;
        status = status.worst(leg.status);
        extend_inner(&mut waypoints, &leg);
        waypoints.push(Waypoint::path(*to));

        trace!(
            "Room {} -> {}: {} crossings, {distance:.2} m",
            from.room,
            to.room,
            hops.len()
        );

        Ok(RoutedPath {
            distance_meters: distance,
            waypoints,
            status,
        })
    }
}

/// Appends the turns of a leg, dropping its endpoints which the caller
/// places itself
fn extend_inner(waypoints: &mut Vec<Waypoint>, leg: &RoutedPath) {
    if leg.waypoints.len() > 2 {
        waypoints.extend_from_slice(&leg.waypoints[1..leg.waypoints.len() - 1]);
    }
}

/// Breadth-first search over rooms; returns the hops from `start` to
/// `goal` with the fewest crossings
fn room_route(plan: &FloorPlanGraph, start: NodeIndex, goal: NodeIndex) -> Option<Vec<Hop>> {
    let graph = &plan.graph;
    let mut visited = FixedBitSet::with_capacity(graph.node_count());
    let mut reached_by: Vec<Option<(NodeIndex, Connection)>> = vec![None; graph.node_count()];
    let mut queue = VecDeque::from([start]);
    visited.insert(start.index());

    while let Some(node) = queue.pop_front() {
        if node == goal {
            break;
        }
        for edge in graph.edges(node) {
            let next = other_end(&edge, node);
            if visited.put(next.index()) {
                continue;
            }
            reached_by[next.index()] = Some((node, *edge.weight()));
            queue.push_back(next);
        }
    }

    if !visited.contains(goal.index()) {
        return None;
    }

    let mut hops = Vec::new();
    let mut current = goal;
    while let Some((previous, connection)) = reached_by[current.index()] {
        hops.push(Hop {
            next: current,
            connection,
        });
        current = previous;
    }
    hops.reverse();
    Some(hops)
}
