use geo::line_string;
use geojson::{Feature, FeatureCollection, Geometry};
use serde_json::{Map, Value as JsonValue, json};

use super::{Segment, Tour, Waypoint};
use crate::Error;

impl Segment {
    /// Converts the segment to a `GeoJSON` `LineString` feature
    pub fn to_feature(&self) -> Feature {
        let coordinates = line_string![
            (x: self.from.position.x, y: self.from.position.y),
            (x: self.to.position.x, y: self.to.position.y),
        ];

        let mut properties = Map::new();
        properties.insert("floor".to_string(), json!(self.floor));
        properties.insert("segment_index".to_string(), json!(self.segment_index));
        properties.insert("distance_meters".to_string(), json!(self.distance_meters));
        properties.insert("from_kind".to_string(), kind_value(&self.from));
        properties.insert("to_kind".to_string(), kind_value(&self.to));
        properties.insert(
            "low_confidence".to_string(),
            JsonValue::Bool(self.low_confidence),
        );

        Feature {
            bbox: None,
            geometry: Some(Geometry::new((&coordinates).into())),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        }
    }
}

fn kind_value(waypoint: &Waypoint) -> JsonValue {
    serde_json::to_value(waypoint.kind).unwrap_or(JsonValue::Null)
}

impl Tour {
    /// Converts the tour segments to a `GeoJSON` `FeatureCollection`,
    /// one feature per segment in tour order
    pub fn to_geojson(&self) -> FeatureCollection {
        let features = self.segments().iter().map(Segment::to_feature).collect();

        FeatureCollection {
            features,
            bbox: None,
            foreign_members: None,
        }
    }

    /// # Errors
    ///
    /// Returns `Error::Serialization` if the collection cannot be encoded.
    pub fn to_geojson_string(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(&self.to_geojson())?)
    }
}
