//! Room adjacency graph of the floor plan

use geo::{Coord, Rect};
use hashbrown::HashMap;
use log::debug;
use petgraph::graph::{EdgeReference, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

use super::components::{Door, LinkKind, Room, VerticalLink, WallSegment};
use crate::model::{Position, WaypointKind};
use crate::{Error, Floor, RoomId};

/// Undirected room multigraph, nodes are indices into the room table
pub type RoomGraph = UnGraph<RoomId, Connection>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionKind {
    Door,
    Vertical(LinkKind),
}

impl ConnectionKind {
    pub fn waypoint_kind(self) -> WaypointKind {
        match self {
            Self::Door => WaypointKind::Door,
            Self::Vertical(LinkKind::Stairs) => WaypointKind::Stairs,
            Self::Vertical(LinkKind::Elevator) => WaypointKind::Elevator,
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Self::Vertical(_))
    }
}

/// Room graph edge: where the connection is crossed and how
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    pub crossing: Coord<f64>,
    pub kind: ConnectionKind,
}

/// Static floor plan of one planning request
///
/// Rooms are stored in insertion order; the node index of a room in the
/// graph is its slot in the room table, which also keys per-room data
/// such as walls and obstacle grids.
#[derive(Debug, Clone)]
pub struct FloorPlanGraph {
    pub(crate) graph: RoomGraph,
    rooms: Vec<Room>,
    room_index: HashMap<RoomId, NodeIndex>,
    walls: Vec<Vec<WallSegment>>,
}

impl FloorPlanGraph {
    /// Builds the graph from floor plan data
    ///
    /// # Errors
    ///
    /// Returns `Error::MalformedGeometry` if a room id is duplicated, if a
    /// door, vertical link or wall references an unknown room, if a door or
    /// link connects a room to itself, or if a door joins two floors.
    pub fn build(
        rooms: Vec<Room>,
        doors: &[Door],
        walls: &[WallSegment],
        vertical_links: &[VerticalLink],
    ) -> Result<Self, Error> {
        let mut graph = RoomGraph::with_capacity(rooms.len(), doors.len() + vertical_links.len());
        let mut room_index = HashMap::with_capacity(rooms.len());

        for room in &rooms {
            let node = graph.add_node(room.id);
            if room_index.insert(room.id, node).is_some() {
                return Err(Error::MalformedGeometry(format!(
                    "Room {} is defined twice",
                    room.id
                )));
            }
        }

        let mut plan = Self {
            graph,
            rooms,
            room_index,
            walls: Vec::new(),
        };

        for door in doors {
            let (a, b) = plan.endpoints("Door", door.room_a, door.room_b)?;
            let (room_a, room_b) = (&plan.rooms[a.index()], &plan.rooms[b.index()]);
            if room_a.floor != room_b.floor {
                return Err(Error::MalformedGeometry(format!(
                    "Door between rooms {} and {} joins floors {} and {}",
                    room_a.id, room_b.id, room_a.floor, room_b.floor
                )));
            }
            let crossing = door.position.unwrap_or_else(|| Coord {
                x: (room_a.center.x + room_b.center.x) / 2.0,
                y: (room_a.center.y + room_b.center.y) / 2.0,
            });
            plan.graph.add_edge(
                a,
                b,
                Connection {
                    crossing,
                    kind: ConnectionKind::Door,
                },
            );
        }

        for link in vertical_links {
            let (a, b) = plan.endpoints("Vertical link", link.room_from, link.room_to)?;
            plan.graph.add_edge(
                a,
                b,
                Connection {
                    crossing: link.position,
                    kind: ConnectionKind::Vertical(link.kind),
                },
            );
        }

        let mut room_walls = vec![Vec::new(); plan.rooms.len()];
        for wall in walls {
            let slot = plan.room_slot(wall.room).ok_or_else(|| {
                Error::MalformedGeometry(format!("Wall references unknown room {}", wall.room))
            })?;
            room_walls[slot].push(*wall);
        }
        plan.walls = room_walls;

        debug!(
            "Floor plan graph: {} rooms, {} connections, {} walls",
            plan.room_count(),
            plan.connection_count(),
            walls.len()
        );

        Ok(plan)
    }

    fn endpoints(
        &self,
        what: &str,
        from: RoomId,
        to: RoomId,
    ) -> Result<(NodeIndex, NodeIndex), Error> {
        if from == to {
            return Err(Error::MalformedGeometry(format!(
                "{what} connects room {from} to itself"
            )));
        }
        let lookup = |room: RoomId| {
            self.node(room).ok_or_else(|| {
                Error::MalformedGeometry(format!("{what} references unknown room {room}"))
            })
        };
        Ok((lookup(from)?, lookup(to)?))
    }

    /// Neighbouring rooms of `room` with the crossing point and kind of
    /// each connection. Unknown rooms have no neighbours.
    pub fn rooms_adjacent_via(
        &self,
        room: RoomId,
    ) -> impl Iterator<Item = (RoomId, Coord<f64>, ConnectionKind)> + '_ {
        self.node(room).into_iter().flat_map(move |node| {
            self.graph.edges(node).map(move |edge| {
                let neighbor = self.graph[other_end(&edge, node)];
                let connection = edge.weight();
                (neighbor, connection.crossing, connection.kind)
            })
        })
    }

    pub fn bounds_of(&self, room: RoomId) -> Option<Rect<f64>> {
        self.room(room).map(|room| room.bounds)
    }

    /// Walls of a room; empty for unknown rooms
    pub fn walls_in(&self, room: RoomId) -> &[WallSegment] {
        self.room_slot(room)
            .and_then(|slot| self.walls.get(slot))
            .map_or(&[], Vec::as_slice)
    }

    pub fn room(&self, room: RoomId) -> Option<&Room> {
        self.room_slot(room).map(|slot| &self.rooms[slot])
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn connection_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Number of doors and vertical links touching a room
    pub fn degree(&self, room: RoomId) -> usize {
        self.node(room).map_or(0, |node| self.graph.edges(node).count())
    }

    /// Finds the room of `floor` whose outline contains the point
    pub fn room_containing(&self, x: f64, y: f64, floor: Floor) -> Option<RoomId> {
        self.rooms
            .iter()
            .find(|room| room.floor == floor && room.contains_point(x, y))
            .map(|room| room.id)
    }

    /// Checks that a position references an existing room on its floor
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPosition` for an unknown room or a floor that
    /// differs from the room's.
    pub fn validate_position(&self, position: &Position) -> Result<(), Error> {
        let room = self.room(position.room).ok_or_else(|| {
            Error::InvalidPosition(format!(
                "({}, {}) references unknown room {}",
                position.x, position.y, position.room
            ))
        })?;
        if room.floor != position.floor {
            return Err(Error::InvalidPosition(format!(
                "({}, {}) claims floor {} but room {} is on floor {}",
                position.x, position.y, position.floor, room.id, room.floor
            )));
        }
        Ok(())
    }

    pub(crate) fn node(&self, room: RoomId) -> Option<NodeIndex> {
        self.room_index.get(&room).copied()
    }

    pub(crate) fn room_slot(&self, room: RoomId) -> Option<usize> {
        self.node(room).map(NodeIndex::index)
    }

    pub(crate) fn room_at(&self, node: NodeIndex) -> &Room {
        &self.rooms[node.index()]
    }
}

/// The endpoint of `edge` that is not `node`
pub(crate) fn other_end(edge: &EdgeReference<'_, Connection>, node: NodeIndex) -> NodeIndex {
    if edge.source() == node {
        edge.target()
    } else {
        edge.source()
    }
}
