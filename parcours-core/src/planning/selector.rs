//! Diverse, duration-fitting selection of artworks

use hashbrown::{HashMap, HashSet};
use log::{debug, info, warn};
use petgraph::unionfind::UnionFind;
use petgraph::visit::EdgeRef;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::model::{Artwork, ArtworkType, ConnectivityMode};
use crate::routing::MultiRoomRouter;
use crate::{Error, Floor, GROUND_FLOOR, RoomId};

/// Bonus of a candidate in a room the tour has not visited yet
const NEW_ROOM_BONUS: f64 = 3.0;
const SEEN_ROOM_BONUS: f64 = 0.5;
const NEW_FLOOR_BONUS: f64 = 2.0;
const SEEN_FLOOR_BONUS: f64 = 0.7;
const NEW_TYPE_BONUS: f64 = 1.5;
/// Average path distance, in meters, at which the distance bonus reaches 1
const DISTANCE_UNIT_METERS: f64 = 15.0;
const MAX_DISTANCE_BONUS: f64 = 2.0;

/// Outcome of a selection
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Selected artworks, in pick order
    pub artworks: Vec<Artwork>,
    pub mode: ConnectivityMode,
}

/// Picks the artworks of a tour
pub struct ArtworkSelector<'r, 'a> {
    router: &'r MultiRoomRouter<'a>,
}

impl<'r, 'a> ArtworkSelector<'r, 'a> {
    pub fn new(router: &'r MultiRoomRouter<'a>) -> Self {
        Self { router }
    }

    /// Selects a diverse subset of `candidates` sized for the target
    /// duration
    ///
    /// The first artwork is drawn from a fresh entropy source on every call;
    /// the following weighted picks replay for a given `seed`.
    ///
    /// Only the candidates of the chosen connected component are eligible,
    /// so the result can hold fewer than `min_artworks` artworks when that
    /// component is small, even if other components hold more candidates.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoCandidates` if `candidates` is empty and propagates
    /// routing errors for positions outside the floor plan.
    pub fn select(
        &self,
        candidates: &[Artwork],
        target_duration_minutes: f64,
        seed: Option<u64>,
    ) -> Result<Selection, Error> {
        let mut first_pick = rand::rng();
        let mut sampler = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        self.select_with(candidates, target_duration_minutes, &mut first_pick, &mut sampler)
    }

    /// [`select`](Self::select) with caller-provided random sources for the
    /// first pick and for the weighted sampling
    ///
    /// # Errors
    ///
    /// See [`select`](Self::select).
    pub fn select_with<F, S>(
        &self,
        candidates: &[Artwork],
        target_duration_minutes: f64,
        first_pick: &mut F,
        sampler: &mut S,
    ) -> Result<Selection, Error>
    where
        F: Rng + ?Sized,
        S: Rng + ?Sized,
    {
        if candidates.is_empty() {
            return Err(Error::NoCandidates);
        }

        let (pool, mode) = self.filter_by_connectivity(candidates);
        let target_count = self.target_count(&pool, target_duration_minutes);
        info!(
            "Selecting {target_count} of {} candidates ({} before connectivity filtering)",
            pool.len(),
            candidates.len()
        );

        let artworks = self.weighted_selection(pool, target_count, first_pick, sampler)?;
        Ok(Selection { artworks, mode })
    }

    /// Keeps the candidates of the best connected component of the room graph
    ///
    /// Rooms without any door or vertical link are dropped. The component
    /// with the most ground-floor candidate rooms wins, then the one with
    /// the most candidates. If nothing would remain, every candidate is kept
    /// in [`ConnectivityMode::Minimal`]. The winning component is kept even
    /// when it holds fewer than `min_artworks` candidates.
    pub fn filter_by_connectivity(&self, candidates: &[Artwork]) -> (Vec<Artwork>, ConnectivityMode) {
        let plan = self.router.plan();

        if plan.connection_count() == 0 {
            warn!("Floor plan has no doors or vertical links, keeping all candidates");
            return (candidates.to_vec(), ConnectivityMode::Minimal);
        }

        let connected: Vec<&Artwork> = candidates
            .iter()
            .filter(|artwork| plan.degree(artwork.position.room) > 0)
            .collect();
        if connected.is_empty() {
            warn!(
                "All {} candidates are in isolated rooms, keeping all candidates",
                candidates.len()
            );
            return (candidates.to_vec(), ConnectivityMode::Minimal);
        }

        let mut components = UnionFind::<usize>::new(plan.room_count());
        for edge in plan.graph.edge_references() {
            components.union(edge.source().index(), edge.target().index());
        }

        let mut per_room: HashMap<RoomId, usize> = HashMap::new();
        for artwork in &connected {
            *per_room.entry(artwork.position.room).or_default() += 1;
        }

        // (ground-floor candidate rooms, candidates) per component
        let mut scores: HashMap<usize, (usize, usize)> = HashMap::new();
        for (&room_id, &count) in &per_room {
            let Some(slot) = plan.room_slot(room_id) else {
                continue;
            };
            let score = scores.entry(components.find(slot)).or_default();
            if plan.rooms()[slot].floor == GROUND_FLOOR {
                score.0 += 1;
            }
            score.1 += count;
        }

        let Some(best) = scores
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0)))
            .map(|(&component, _)| component)
        else {
            return (candidates.to_vec(), ConnectivityMode::Minimal);
        };

        let kept: Vec<Artwork> = connected
            .into_iter()
            .filter(|artwork| {
                plan.room_slot(artwork.position.room)
                    .is_some_and(|slot| components.find(slot) == best)
            })
            .cloned()
            .collect();

        debug!(
            "Connectivity filter kept {} of {} candidates",
            kept.len(),
            candidates.len()
        );
        (kept, ConnectivityMode::Connected)
    }

    /// Number of artworks that fit the target duration
    ///
    /// Each artwork costs its average narration time plus a fixed observation
    /// and walking time; only `duration_slack` of the target is filled.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn target_count(&self, candidates: &[Artwork], target_duration_minutes: f64) -> usize {
        if candidates.is_empty() {
            return 0;
        }
        let config = self.router.config();

        let avg_narration_minutes = candidates
            .iter()
            .map(|artwork| artwork.narration_duration_seconds)
            .sum::<f64>()
            / candidates.len() as f64
            / 60.0;
        let per_artwork = avg_narration_minutes + config.observation_minutes + config.walk_minutes;

        let estimate = (target_duration_minutes * config.duration_slack / per_artwork).round();
        let count = if estimate.is_finite() && estimate > 0.0 {
            estimate as usize
        } else {
            0
        };

        debug!(
            "Target {target_duration_minutes} min, {per_artwork:.2} min per artwork -> {count} artworks"
        );
        count.min(candidates.len()).max(config.min_artworks)
    }

    fn weighted_selection<F, S>(
        &self,
        candidates: Vec<Artwork>,
        count: usize,
        first_pick: &mut F,
        sampler: &mut S,
    ) -> Result<Vec<Artwork>, Error>
    where
        F: Rng + ?Sized,
        S: Rng + ?Sized,
    {
        if candidates.len() <= count {
            return Ok(candidates);
        }

        let mut available: Vec<usize> = (0..candidates.len()).collect();
        let mut selected: Vec<usize> = Vec::with_capacity(count);
        let mut distance_sums = vec![0.0; candidates.len()];
        let mut rooms: HashSet<RoomId> = HashSet::new();
        let mut floors: HashSet<Floor> = HashSet::new();
        let mut types: HashMap<ArtworkType, usize> = HashMap::new();

        while selected.len() < count && !available.is_empty() {
            let slot = if selected.is_empty() {
                let ground: Vec<usize> = (0..available.len())
                    .filter(|&slot| candidates[available[slot]].position.floor == GROUND_FLOOR)
                    .collect();
                if ground.is_empty() {
                    first_pick.random_range(0..available.len())
                } else {
                    ground[first_pick.random_range(0..ground.len())]
                }
            } else {
                let weights: Vec<f64> = available
                    .iter()
                    .map(|&index| {
                        let artwork = &candidates[index];
                        let room_bonus = if rooms.contains(&artwork.position.room) {
                            SEEN_ROOM_BONUS
                        } else {
                            NEW_ROOM_BONUS
                        };
                        let floor_bonus = if floors.contains(&artwork.position.floor) {
                            SEEN_FLOOR_BONUS
                        } else {
                            NEW_FLOOR_BONUS
                        };
                        #[allow(clippy::cast_precision_loss)]
                        let type_bonus = match types.get(&artwork.kind).copied().unwrap_or(0) {
                            0 => NEW_TYPE_BONUS,
                            seen => 1.0 / (seen as f64 + 1.0),
                        };
                        #[allow(clippy::cast_precision_loss)]
                        let avg_distance = distance_sums[index] / selected.len() as f64;
                        let distance_bonus =
                            (avg_distance / DISTANCE_UNIT_METERS).min(MAX_DISTANCE_BONUS);
                        room_bonus * floor_bonus * type_bonus * distance_bonus
                    })
                    .collect();

                match WeightedIndex::new(&weights) {
                    Ok(distribution) => distribution.sample(sampler),
                    Err(_) => {
                        debug!("All selection weights are zero, drawing uniformly");
                        sampler.random_range(0..available.len())
                    }
                }
            };

            let chosen = available.swap_remove(slot);
            let artwork = &candidates[chosen];
            rooms.insert(artwork.position.room);
            floors.insert(artwork.position.floor);
            *types.entry(artwork.kind).or_default() += 1;
            selected.push(chosen);

            // Real path distance from the new pick to every remaining candidate
            let distances: Vec<f64> = available
                .par_iter()
                .map(|&index| self.selection_distance(&candidates[index], artwork))
                .collect::<Result<_, Error>>()?;
            for (&index, distance) in available.iter().zip(distances) {
                distance_sums[index] += distance;
            }
        }

        let mut candidates: Vec<Option<Artwork>> = candidates.into_iter().map(Some).collect();
        Ok(selected
            .into_iter()
            .filter_map(|index| candidates[index].take())
            .collect())
    }

    fn selection_distance(&self, a: &Artwork, b: &Artwork) -> Result<f64, Error> {
        let path = self.router.find_path(&a.position, &b.position)?;
        if path.is_unreachable() {
            Ok(self.router.config().unreachable_selection_distance_meters)
        } else {
            Ok(path.distance_meters)
        }
    }
}
