//! Visit order of the selected artworks

use log::debug;
use rayon::prelude::*;

use crate::Error;
use crate::model::Artwork;
use crate::routing::MultiRoomRouter;

/// Orders artworks with a greedy nearest-neighbour walk over routed
/// distances
pub struct RouteSequencer<'r, 'a> {
    router: &'r MultiRoomRouter<'a>,
}

impl<'r, 'a> RouteSequencer<'r, 'a> {
    pub fn new(router: &'r MultiRoomRouter<'a>) -> Self {
        Self { router }
    }

    /// Returns `artworks` reordered so that each next artwork is the closest
    /// unvisited one by path distance
    ///
    /// The first artwork keeps its place. Ties go to the earlier artwork.
    ///
    /// # Errors
    ///
    /// Propagates routing errors for positions outside the floor plan.
    pub fn sequence(&self, artworks: Vec<Artwork>) -> Result<Vec<Artwork>, Error> {
        if artworks.len() <= 2 {
            return Ok(artworks);
        }

        let mut remaining: Vec<Artwork> = artworks;
        let mut ordered = Vec::with_capacity(remaining.len());
        ordered.push(remaining.remove(0));

        while !remaining.is_empty() {
            let Some(current) = ordered.last() else {
                break;
            };
            let distances: Vec<f64> = remaining
                .par_iter()
                .map(|next| {
                    self.router
                        .find_path(&current.position, &next.position)
                        .map(|path| path.distance_meters)
                })
                .collect::<Result<_, Error>>()?;

            let mut nearest = 0;
            for (index, &distance) in distances.iter().enumerate().skip(1) {
                if distance < distances[nearest] {
                    nearest = index;
                }
            }
            debug!(
                "Artwork {} -> {} ({:.1} m)",
                current.id, remaining[nearest].id, distances[nearest]
            );
            ordered.push(remaining.remove(nearest));
        }

        Ok(ordered)
    }
}
