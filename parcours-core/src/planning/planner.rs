//! Single entry point running the whole planning chain

use hashbrown::HashSet;
use log::{debug, info};
use rand::Rng;

use super::{ArtworkSelector, RouteSequencer, SegmentBuilder};
use crate::model::{
    Artwork, ConnectivityMode, FloorPlanGraph, PlanningWarning, Position, Tour, TourMetadata,
};
use crate::routing::MultiRoomRouter;
use crate::{Error, PlannerConfig};

/// Parameters of one planning request
#[derive(Debug, Clone, PartialEq)]
pub struct PlanRequest {
    pub target_duration_minutes: f64,
    /// Seed of the weighted sampling; a random one is drawn and recorded
    /// in the tour metadata when absent
    pub seed: Option<u64>,
    pub entrance: Option<Position>,
}

impl PlanRequest {
    pub fn new(target_duration_minutes: f64) -> Self {
        Self {
            target_duration_minutes,
            seed: None,
            entrance: None,
        }
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn with_entrance(mut self, entrance: Position) -> Self {
        self.entrance = Some(entrance);
        self
    }
}

/// Plans a tour: selects artworks for the target duration, orders them and
/// renders the walking segments
///
/// # Errors
///
/// Returns `Error::InvalidData` for an invalid configuration or target
/// duration, or for a room whose obstacle grid would exceed
/// `max_grid_cells`. Returns `Error::NoCandidates` if `candidates` is empty
/// and `Error::InvalidPosition` if a candidate or the entrance does not
/// match the floor plan.
pub fn plan_tour(
    plan: &FloorPlanGraph,
    candidates: &[Artwork],
    request: &PlanRequest,
    config: &PlannerConfig,
) -> Result<Tour, Error> {
    config.validate_for(plan)?;
    if !(request.target_duration_minutes.is_finite() && request.target_duration_minutes > 0.0) {
        return Err(Error::InvalidData(format!(
            "Target duration must be a positive number of minutes, got {}",
            request.target_duration_minutes
        )));
    }
    if candidates.is_empty() {
        return Err(Error::NoCandidates);
    }
    for artwork in candidates {
        plan.validate_position(&artwork.position)?;
    }
    if let Some(entrance) = &request.entrance {
        plan.validate_position(entrance)?;
    }

    let seed = request.seed.unwrap_or_else(|| rand::rng().random());
    debug!(
        "Planning {} min tour over {} candidates, seed {seed}",
        request.target_duration_minutes,
        candidates.len()
    );

    let router = MultiRoomRouter::new(plan, config);
    let selection =
        ArtworkSelector::new(&router).select(candidates, request.target_duration_minutes, Some(seed))?;
    let ordered = RouteSequencer::new(&router).sequence(selection.artworks)?;
    let built = SegmentBuilder::new(&router).build_with_legs(&ordered, request.entrance.as_ref())?;

    let mut distances_to_next: Vec<f64> = built.legs.iter().map(|leg| leg.distance_meters).collect();
    let total_distance_meters: f64 = distances_to_next.iter().sum();
    if !ordered.is_empty() {
        distances_to_next.push(0.0);
    }

    let total_duration_minutes = tour_duration_minutes(&ordered, total_distance_meters, config);

    let mut warnings = Vec::with_capacity(built.warnings.len() + 1);
    if selection.mode == ConnectivityMode::Minimal {
        warnings.push(PlanningWarning::DegradedConnectivity {
            candidate_count: candidates.len(),
        });
    }
    warnings.extend(built.warnings);

    let floors_visited = ordered
        .iter()
        .map(|artwork| artwork.position.floor)
        .collect::<HashSet<_>>()
        .len();
    let rooms_visited = ordered
        .iter()
        .map(|artwork| artwork.position.room)
        .collect::<HashSet<_>>()
        .len();
    let low_confidence_legs = built
        .entrance_leg
        .iter()
        .chain(&built.legs)
        .filter(|leg| leg.is_low_confidence())
        .count();

    let metadata = TourMetadata {
        seed,
        artwork_count: ordered.len(),
        floors_visited,
        rooms_visited,
        connectivity: selection.mode,
        low_confidence_legs,
        entrance_distance_meters: built.entrance_leg.as_ref().map(|leg| leg.distance_meters),
        distances_to_next,
        warnings,
    };

    info!(
        "Planned tour: {} artworks, {} rooms, {} floors, {:.1} m, {} min, {} segments",
        metadata.artwork_count,
        metadata.rooms_visited,
        metadata.floors_visited,
        total_distance_meters,
        total_duration_minutes,
        built.segments.len()
    );

    Ok(Tour::new(
        ordered,
        built.segments,
        total_distance_meters,
        total_duration_minutes,
        metadata,
    ))
}

/// Walking time plus narration and observation time of every artwork,
/// rounded to whole minutes
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn tour_duration_minutes(ordered: &[Artwork], distance_meters: f64, config: &PlannerConfig) -> u32 {
    let walking = distance_meters / config.walking_speed_mps / 60.0;
    let narration = ordered
        .iter()
        .map(|artwork| artwork.narration_duration_seconds)
        .sum::<f64>()
        / 60.0;
    let observation = ordered.len() as f64 * config.observation_minutes;
    (walking + narration + observation).round().max(0.0) as u32
}
