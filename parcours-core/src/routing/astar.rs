//! Obstacle-aware pathfinding inside a single room

use std::collections::BinaryHeap;

use fixedbitset::FixedBitSet;
use geo::{Distance, Euclidean};
use log::{trace, warn};

use super::grid::{GridCache, GridCell, ObstacleGrid};
use super::path::{PathStatus, RoutedPath};
use super::state::State;
use crate::model::{FloorPlanGraph, Position, Waypoint};
use crate::{Error, PlannerConfig};

/// A* search on the rasterized grid of one room
///
/// Obstacle grids are rasterized lazily and memoized in the pathfinder's
/// [`GridCache`], so one pathfinder should serve a whole planning request.
#[derive(Debug)]
pub struct GridPathfinder<'a> {
    plan: &'a FloorPlanGraph,
    config: &'a PlannerConfig,
    grids: GridCache,
}

impl<'a> GridPathfinder<'a> {
    pub fn new(plan: &'a FloorPlanGraph, config: &'a PlannerConfig) -> Self {
        Self {
            plan,
            config,
            grids: GridCache::for_plan(plan),
        }
    }

    pub fn plan(&self) -> &'a FloorPlanGraph {
        self.plan
    }

    pub fn config(&self) -> &'a PlannerConfig {
        self.config
    }

    pub fn grids(&self) -> &GridCache {
        &self.grids
    }

    /// Walking path between two positions of the same room
    ///
    /// A straight line that crosses no wall cell is returned as is. Otherwise
    /// the grid is searched; when the search exhausts, the straight-line
    /// distance times `enclosed_penalty_factor` is returned with
    /// [`PathStatus::Enclosed`].
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPosition` if the positions lie in different
    /// rooms or the room is unknown, and `Error::InvalidData` if the room's
    /// obstacle grid would exceed `max_grid_cells`.
    pub fn find_path(&self, from: &Position, to: &Position) -> Result<RoutedPath, Error> {
        if from.room != to.room {
            return Err(Error::InvalidPosition(format!(
                "Grid search needs one room, got rooms {} and {}",
                from.room, to.room
            )));
        }
        let grid = self.grids.get_or_build(self.plan, from.room, self.config)?;

        let start = grid.cell_of(from.coord());
        let goal = grid.cell_of(to.coord());

        if grid.line_is_clear(start, goal) {
            return Ok(RoutedPath {
                distance_meters: self.config.to_meters(from.planar_distance(to)),
                waypoints: vec![Waypoint::path(*from), Waypoint::path(*to)],
                status: PathStatus::Found,
            });
        }

        let Some(cells) = astar(grid, start, goal) else {
            warn!(
                "No free path in room {} from ({:.1}, {:.1}) to ({:.1}, {:.1}), using penalized estimate",
                from.room, from.x, from.y, to.x, to.y
            );
            let estimate = from.planar_distance(to) * self.config.enclosed_penalty_factor;
            return Ok(RoutedPath {
                distance_meters: self.config.to_meters(estimate),
                waypoints: vec![Waypoint::path(*from), Waypoint::path(*to)],
                status: PathStatus::Enclosed,
            });
        };

        let waypoints = polyline(grid, &cells, from, to);
        let length: f64 = waypoints
            .windows(2)
            .map(|pair| Euclidean.distance(pair[0].position.point(), pair[1].position.point()))
            .sum();
        trace!(
            "Room {}: {} grid cells, {} waypoints, {length:.1} units",
            from.room,
            cells.len(),
            waypoints.len()
        );

        Ok(RoutedPath {
            distance_meters: self.config.to_meters(length),
            waypoints,
            status: PathStatus::Found,
        })
    }
}

/// Manhattan distance in grid units
fn heuristic(a: GridCell, b: GridCell) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let steps = a.col.abs_diff(b.col) + a.row.abs_diff(b.row);
    steps as f64
}

/// 8-directional A* from `start` to `goal`, returns the cells of the path
/// including both ends
fn astar(grid: &ObstacleGrid, start: GridCell, goal: GridCell) -> Option<Vec<GridCell>> {
    let cell_count = grid.len();
    let mut g_score = vec![f64::INFINITY; cell_count];
    let mut came_from: Vec<Option<usize>> = vec![None; cell_count];
    let mut closed = FixedBitSet::with_capacity(cell_count);
    let mut heap = BinaryHeap::new();

    let start_index = grid.index(start);
    let goal_index = grid.index(goal);
    g_score[start_index] = 0.0;
    heap.push(State {
        f_score: heuristic(start, goal),
        cell: start_index,
    });

    while let Some(State { cell, .. }) = heap.pop() {
        if cell == goal_index {
            return Some(reconstruct(grid, &came_from, goal_index));
        }
        // Skip stale entries
        if closed.put(cell) {
            continue;
        }

        let current = grid.cell_at(cell);
        for (next, step_cost) in grid.neighbors(current, start, goal) {
            let next_index = grid.index(next);
            if closed.contains(next_index) {
                continue;
            }
            let tentative = g_score[cell] + step_cost;
            if tentative < g_score[next_index] {
                g_score[next_index] = tentative;
                came_from[next_index] = Some(cell);
                heap.push(State {
                    f_score: tentative + heuristic(next, goal),
                    cell: next_index,
                });
            }
        }
    }

    None
}

fn reconstruct(grid: &ObstacleGrid, came_from: &[Option<usize>], goal: usize) -> Vec<GridCell> {
    let mut cells = vec![grid.cell_at(goal)];
    let mut current = goal;
    while let Some(previous) = came_from[current] {
        cells.push(grid.cell_at(previous));
        current = previous;
    }
    cells.reverse();
    cells
}

/// Turns a cell path into waypoints: the exact endpoints plus the center
/// of every cell where the direction changes
fn polyline(
    grid: &ObstacleGrid,
    cells: &[GridCell],
    from: &Position,
    to: &Position,
) -> Vec<Waypoint> {
    let direction =
        |a: GridCell, b: GridCell| (b.col.cmp(&a.col) as i8, b.row.cmp(&a.row) as i8);

    let mut waypoints = vec![Waypoint::path(*from)];
    for window in cells.windows(3) {
        if direction(window[0], window[1]) != direction(window[1], window[2]) {
            let turn = grid.center_of(window[1]);
            waypoints.push(Waypoint::path(Position::relocated(turn, from.room, from.floor)));
        }
    }
    waypoints.push(Waypoint::path(*to));
    waypoints
}
