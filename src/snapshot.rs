//! Museum snapshot: floor plan and catalogue as exported by the ingestion
//! pipeline

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use geo::Coord;
use serde::Deserialize;
use tracing::{debug, warn};

use parcours_core::{
    Artwork, ArtworkType, Door, FloorPlanGraph, LinkKind, Position, Room, VerticalLink,
    WallSegment, model::estimate_narration_seconds,
};

#[derive(Debug, Clone, Deserialize)]
pub struct RoomRecord {
    pub id: u32,
    #[serde(default)]
    pub floor: i32,
    /// Polygon outline in plan units, closing point optional
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DoorRecord {
    pub room_a: u32,
    pub room_b: u32,
    pub x: Option<f64>,
    pub y: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WallRecord {
    pub room: u32,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerticalLinkRecord {
    pub room_from: u32,
    pub room_to: u32,
    pub x: f64,
    pub y: f64,
    pub kind: LinkKind,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntranceRecord {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub floor: i32,
    pub room: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtworkRecord {
    pub id: u32,
    #[serde(default)]
    pub title: String,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub floor: i32,
    /// Resolved from the coordinates when missing
    pub room: Option<u32>,
    #[serde(default)]
    pub narration_text: String,
    /// Duration of the recorded narration; estimated from the text when
    /// missing
    pub narration_duration_seconds: Option<f64>,
    #[serde(default)]
    pub materials: String,
    #[serde(rename = "type")]
    pub kind: Option<ArtworkType>,
}

/// Everything the planner needs about one museum
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MuseumSnapshot {
    pub rooms: Vec<RoomRecord>,
    pub doors: Vec<DoorRecord>,
    pub walls: Vec<WallRecord>,
    pub vertical_links: Vec<VerticalLinkRecord>,
    pub entrances: Vec<EntranceRecord>,
    pub artworks: Vec<ArtworkRecord>,
}

impl MuseumSnapshot {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Invalid snapshot {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let snapshot: Self = serde_json::from_str(text)?;
        debug!(
            "Snapshot: {} rooms, {} doors, {} walls, {} vertical links, {} artworks",
            snapshot.rooms.len(),
            snapshot.doors.len(),
            snapshot.walls.len(),
            snapshot.vertical_links.len(),
            snapshot.artworks.len()
        );
        Ok(snapshot)
    }

    /// Builds the floor plan graph
    pub fn to_plan(&self) -> Result<FloorPlanGraph> {
        let rooms = self
            .rooms
            .iter()
            .map(|room| Room::from_points(room.id, room.floor, &room.points))
            .collect::<Result<Vec<_>, _>>()?;

        let mut doors = Vec::with_capacity(self.doors.len());
        for door in &self.doors {
            doors.push(match (door.x, door.y) {
                (Some(x), Some(y)) => Door::at(door.room_a, door.room_b, x, y),
                (None, None) => Door::new(door.room_a, door.room_b),
                _ => bail!(
                    "Door between rooms {} and {} has only one coordinate",
                    door.room_a,
                    door.room_b
                ),
            });
        }

        let walls: Vec<WallSegment> = self
            .walls
            .iter()
            .map(|wall| WallSegment::new(wall.room, (wall.x1, wall.y1), (wall.x2, wall.y2)))
            .collect();

        let links: Vec<VerticalLink> = self
            .vertical_links
            .iter()
            .map(|link| VerticalLink {
                room_from: link.room_from,
                room_to: link.room_to,
                position: Coord {
                    x: link.x,
                    y: link.y,
                },
                kind: link.kind,
            })
            .collect();

        Ok(FloorPlanGraph::build(rooms, &doors, &walls, &links)?)
    }

    /// Catalogue entries as planner candidates
    ///
    /// Artworks without a room are placed in the room containing their
    /// coordinates; those outside every room are skipped.
    pub fn candidates(&self, plan: &FloorPlanGraph) -> Vec<Artwork> {
        let mut candidates = Vec::with_capacity(self.artworks.len());
        for record in &self.artworks {
            let Some(room) = record
                .room
                .or_else(|| plan.room_containing(record.x, record.y, record.floor))
            else {
                warn!(
                    "Artwork {} at ({}, {}) on floor {} is outside every room, skipped",
                    record.id, record.x, record.y, record.floor
                );
                continue;
            };

            candidates.push(Artwork {
                id: record.id,
                title: record.title.clone(),
                position: Position::new(record.x, record.y, room, record.floor),
                narration_text: record.narration_text.clone(),
                narration_duration_seconds: record
                    .narration_duration_seconds
                    .unwrap_or_else(|| estimate_narration_seconds(&record.narration_text)),
                kind: record
                    .kind
                    .unwrap_or_else(|| ArtworkType::classify(&record.materials)),
            });
        }
        candidates
    }

    /// Position of the entrance with the given id
    pub fn entrance(&self, id: u32, plan: &FloorPlanGraph) -> Result<Position> {
        let entrance = self
            .entrances
            .iter()
            .find(|entrance| entrance.id == id)
            .ok_or_else(|| anyhow!("Unknown entrance {id}"))?;
        let room = entrance
            .room
            .or_else(|| plan.room_containing(entrance.x, entrance.y, entrance.floor))
            .ok_or_else(|| {
                anyhow!(
                    "Entrance {id} ({}) is outside every room of floor {}",
                    entrance.name,
                    entrance.floor
                )
            })?;
        Ok(Position::new(entrance.x, entrance.y, room, entrance.floor))
    }
}
