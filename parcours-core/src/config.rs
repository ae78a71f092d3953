//! Tunable constants of the planner.

use serde::Deserialize;

use crate::model::FloorPlanGraph;
use crate::routing::grid_dimensions;
use crate::{Error, GRID_RESOLUTION, MAX_GRID_CELLS, MIN_ARTWORKS, SCALE_METERS_PER_UNIT};

/// Planner configuration
///
/// Every field has a default, so a partial TOML/JSON document only needs
/// to name the values it overrides.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Meters per floor-plan unit
    pub scale_meters_per_unit: f64,
    /// Cell size of the per-room obstacle grid, in plan units
    pub grid_resolution: f64,
    /// Largest obstacle grid a single room may rasterize to
    pub max_grid_cells: usize,
    /// Fixed distance added when a route takes the stairs
    pub stairs_penalty_meters: f64,
    /// Fixed distance added when a route takes an elevator
    pub elevator_penalty_meters: f64,
    /// Time a visitor spends looking at one artwork
    pub observation_minutes: f64,
    /// Average walk between two artworks, used to size the selection
    pub walk_minutes: f64,
    /// Share of the target duration the selection aims to fill
    pub duration_slack: f64,
    /// Lower bound on the number of selected artworks
    pub min_artworks: usize,
    /// Walking speed used for the tour duration estimate
    pub walking_speed_mps: f64,
    /// Multiplier on the straight-line distance when a room grid has no path
    pub enclosed_penalty_factor: f64,
    /// Multiplier on the straight-line distance when no room route exists
    pub unreachable_penalty_factor: f64,
    /// Distance assumed by the selector for unreachable pairs
    pub unreachable_selection_distance_meters: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            scale_meters_per_unit: SCALE_METERS_PER_UNIT,
            grid_resolution: GRID_RESOLUTION,
            max_grid_cells: MAX_GRID_CELLS,
            stairs_penalty_meters: 12.5,
            elevator_penalty_meters: 20.0,
            observation_minutes: 2.0,
            walk_minutes: 0.5,
            duration_slack: 0.85,
            min_artworks: MIN_ARTWORKS,
            walking_speed_mps: 1.2,
            enclosed_penalty_factor: 3.0,
            unreachable_penalty_factor: 5.0,
            unreachable_selection_distance_meters: 50.0,
        }
    }
}

impl PlannerConfig {
    /// Checks that the configuration can drive a planning request
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidData` for non-positive scale, grid resolution,
    /// walking speed or duration slack, or a zero grid cell budget. Grid
    /// sizes depend on the rooms and are checked by
    /// [`validate_for`](Self::validate_for).
    pub fn validate(&self) -> Result<(), Error> {
        let positive = [
            ("scale_meters_per_unit", self.scale_meters_per_unit),
            ("grid_resolution", self.grid_resolution),
            ("walking_speed_mps", self.walking_speed_mps),
            ("duration_slack", self.duration_slack),
        ];

        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidData(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }

        if self.max_grid_cells == 0 {
            return Err(Error::InvalidData(
                "max_grid_cells must be at least 1".to_string(),
            ));
        }

        if self.stairs_penalty_meters < 0.0 || self.elevator_penalty_meters < 0.0 {
            return Err(Error::InvalidData(
                "Vertical link penalties cannot be negative".to_string(),
            ));
        }

        Ok(())
    }

    /// [`validate`](Self::validate), plus a check that every room of
    /// `plan` rasterizes within `max_grid_cells`
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidData` for an invalid configuration or a room
    /// whose obstacle grid would be too large.
    pub fn validate_for(&self, plan: &FloorPlanGraph) -> Result<(), Error> {
        self.validate()?;
        for room in plan.rooms() {
            grid_dimensions(room.bounds, self.grid_resolution, self.max_grid_cells)?;
        }
        Ok(())
    }

    /// Converts a planar length in plan units to meters
    pub fn to_meters(&self, units: f64) -> f64 {
        units * self.scale_meters_per_unit
    }
}
