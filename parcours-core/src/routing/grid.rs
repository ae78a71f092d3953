//! Rasterized obstacle grids of single rooms

use std::sync::OnceLock;

use fixedbitset::FixedBitSet;
use geo::{Coord, Rect};
use log::trace;

use crate::model::{FloorPlanGraph, WallSegment};
use crate::{Error, PlannerConfig, RoomId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCell {
    pub col: usize,
    pub row: usize,
}

impl GridCell {
    pub fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }
}

/// Cells of the digital (Bresenham) line between two cells, both
/// endpoints included
#[derive(Debug, Clone)]
pub struct LineCells {
    x: i64,
    y: i64,
    end_x: i64,
    end_y: i64,
    dx: i64,
    dy: i64,
    step_x: i64,
    step_y: i64,
    err: i64,
    done: bool,
}

impl LineCells {
    #[allow(clippy::cast_possible_wrap)]
    pub fn new(from: GridCell, to: GridCell) -> Self {
        let (x, y) = (from.col as i64, from.row as i64);
        let (end_x, end_y) = (to.col as i64, to.row as i64);
        let dx = (end_x - x).abs();
        let dy = -(end_y - y).abs();
        Self {
            x,
            y,
            end_x,
            end_y,
            dx,
            dy,
            step_x: if x < end_x { 1 } else { -1 },
            step_y: if y < end_y { 1 } else { -1 },
            err: dx + dy,
            done: false,
        }
    }
}

impl Iterator for LineCells {
    type Item = GridCell;

    #[allow(clippy::cast_sign_loss)]
    fn next(&mut self) -> Option<GridCell> {
        if self.done {
            return None;
        }
        // Every visited cell lies between the two non-negative endpoints
        let cell = GridCell::new(self.x as usize, self.y as usize);

        if self.x == self.end_x && self.y == self.end_y {
            self.done = true;
        } else {
            let doubled = 2 * self.err;
            if doubled >= self.dy {
                self.err += self.dy;
                self.x += self.step_x;
            }
            if doubled <= self.dx {
                self.err += self.dx;
                self.y += self.step_y;
            }
        }

        Some(cell)
    }
}

/// Columns and rows of a grid with cells of `resolution` covering `bounds`
///
/// # Errors
///
/// Returns `Error::InvalidData` if the resolution is not a positive number
/// or the grid would exceed `max_cells` cells.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
pub fn grid_dimensions(
    bounds: Rect<f64>,
    resolution: f64,
    max_cells: usize,
) -> Result<(usize, usize), Error> {
    if !(resolution.is_finite() && resolution > 0.0) {
        return Err(Error::InvalidData(format!(
            "Grid resolution must be a positive number, got {resolution}"
        )));
    }

    let axis = |extent: f64| {
        let steps = (extent / resolution).floor();
        if steps.is_finite() && steps >= 0.0 && steps < max_cells as f64 {
            (steps as usize).checked_add(1)
        } else {
            None
        }
    };

    axis(bounds.width())
        .zip(axis(bounds.height()))
        .filter(|&(cols, rows)| cols.checked_mul(rows).is_some_and(|cells| cells <= max_cells))
        .ok_or_else(|| {
            Error::InvalidData(format!(
                "A {:.1} x {:.1} room at resolution {resolution} needs more than {max_cells} grid cells",
                bounds.width(),
                bounds.height()
            ))
        })
}

/// Uniform grid over a room's bounds with the cells crossed by walls
/// marked as blocked
#[derive(Debug, Clone)]
pub struct ObstacleGrid {
    origin: Coord<f64>,
    resolution: f64,
    cols: usize,
    rows: usize,
    blocked: FixedBitSet,
}

impl ObstacleGrid {
    /// Creates an obstacle-free grid covering `bounds`
    ///
    /// # Errors
    ///
    /// See [`grid_dimensions`].
    pub fn new(bounds: Rect<f64>, resolution: f64, max_cells: usize) -> Result<Self, Error> {
        let (cols, rows) = grid_dimensions(bounds, resolution, max_cells)?;

        Ok(Self {
            origin: bounds.min(),
            resolution,
            cols,
            rows,
            blocked: FixedBitSet::with_capacity(cols * rows),
        })
    }

    /// Creates the grid of a room and marks every cell its walls pass through
    ///
    /// # Errors
    ///
    /// See [`grid_dimensions`].
    pub fn rasterize(
        bounds: Rect<f64>,
        walls: &[WallSegment],
        resolution: f64,
        max_cells: usize,
    ) -> Result<Self, Error> {
        let mut grid = Self::new(bounds, resolution, max_cells)?;
        for wall in walls {
            let from = grid.cell_of(wall.start());
            let to = grid.cell_of(wall.end());
            for cell in LineCells::new(from, to) {
                grid.block(cell);
            }
        }
        Ok(grid)
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.cols * self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    pub fn blocked_count(&self) -> usize {
        self.blocked.count_ones(..)
    }

    /// Cell containing a point; points outside the bounds snap to the
    /// nearest border cell
    pub fn cell_of(&self, point: Coord<f64>) -> GridCell {
        GridCell::new(
            self.axis_index(point.x - self.origin.x, self.cols),
            self.axis_index(point.y - self.origin.y, self.rows),
        )
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn axis_index(&self, offset: f64, count: usize) -> usize {
        let index = (offset / self.resolution).floor();
        if index.is_nan() || index < 0.0 {
            0
        } else {
            (index as usize).min(count - 1)
        }
    }

    /// Center of a cell in plan units
    #[allow(clippy::cast_precision_loss)]
    pub fn center_of(&self, cell: GridCell) -> Coord<f64> {
        Coord {
            x: self.origin.x + (cell.col as f64 + 0.5) * self.resolution,
            y: self.origin.y + (cell.row as f64 + 0.5) * self.resolution,
        }
    }

    pub fn is_blocked(&self, cell: GridCell) -> bool {
        self.contains(cell) && self.blocked.contains(self.index(cell))
    }

    pub fn block(&mut self, cell: GridCell) {
        if self.contains(cell) {
            let index = self.index(cell);
            self.blocked.insert(index);
        }
    }

    pub fn contains(&self, cell: GridCell) -> bool {
        cell.col < self.cols && cell.row < self.rows
    }

    pub(crate) fn index(&self, cell: GridCell) -> usize {
        cell.row * self.cols + cell.col
    }

    pub(crate) fn cell_at(&self, index: usize) -> GridCell {
        GridCell::new(index % self.cols, index / self.cols)
    }

    /// A diagonal step whose two orthogonal side cells are both blocked
    /// would slip through a diagonal wall
    pub(crate) fn squeezes(&self, from: GridCell, to: GridCell) -> bool {
        from.col != to.col
            && from.row != to.row
            && self.is_blocked(GridCell::new(to.col, from.row))
            && self.is_blocked(GridCell::new(from.col, to.row))
    }

    /// Whether the digital line between two cells crosses no blocked cell.
    /// The two end cells are always considered free.
    pub fn line_is_clear(&self, from: GridCell, to: GridCell) -> bool {
        let mut previous = from;
        for cell in LineCells::new(from, to).skip(1) {
            if self.squeezes(previous, cell) || (cell != to && self.is_blocked(cell)) {
                return false;
            }
            previous = cell;
        }
        true
    }

    /// Free 8-connected neighbours of `cell` with their step cost in grid
    /// units. `start` and `goal` are free even when a wall crosses them.
    pub(crate) fn neighbors(
        &self,
        cell: GridCell,
        start: GridCell,
        goal: GridCell,
    ) -> impl Iterator<Item = (GridCell, f64)> + '_ {
        const STEPS: [(i64, i64); 8] = [
            (1, 0),
            (-1, 0),
            (0, 1),
            (0, -1),
            (1, 1),
            (1, -1),
            (-1, 1),
            (-1, -1),
        ];

        STEPS.iter().filter_map(move |&(dc, dr)| {
            let col = cell.col.checked_add_signed(dc as isize)?;
            let row = cell.row.checked_add_signed(dr as isize)?;
            let next = GridCell::new(col, row);
            if !self.contains(next) {
                return None;
            }
            let free = next == start || next == goal || !self.is_blocked(next);
            if !free || self.squeezes(cell, next) {
                return None;
            }
            let cost = if dc != 0 && dr != 0 {
                std::f64::consts::SQRT_2
            } else {
                1.0
            };
            Some((next, cost))
        })
    }
}

/// Request-scoped memo of room obstacle grids
///
/// Slots follow the room table of one [`FloorPlanGraph`]; each grid is
/// rasterized on first use and then shared read-only, also across threads.
#[derive(Debug, Default)]
pub struct GridCache {
    grids: Vec<OnceLock<ObstacleGrid>>,
}

impl GridCache {
    pub fn for_plan(plan: &FloorPlanGraph) -> Self {
        Self {
            grids: (0..plan.room_count()).map(|_| OnceLock::new()).collect(),
        }
    }

    /// Grid of `room`, rasterized on first access
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPosition` for an unknown room and
    /// `Error::InvalidData` if its grid would exceed
    /// `config.max_grid_cells`.
    pub fn get_or_build(
        &self,
        plan: &FloorPlanGraph,
        room: RoomId,
        config: &PlannerConfig,
    ) -> Result<&ObstacleGrid, Error> {
        let unknown = || Error::InvalidPosition(format!("Unknown room {room}"));
        let slot = plan.room_slot(room).ok_or_else(unknown)?;
        let cached = self.grids.get(slot).ok_or_else(unknown)?;
        if let Some(grid) = cached.get() {
            return Ok(grid);
        }

        let bounds = plan.rooms()[slot].bounds;
        let grid = ObstacleGrid::rasterize(
            bounds,
            plan.walls_in(room),
            config.grid_resolution,
            config.max_grid_cells,
        )?;
        trace!(
            "Rasterized room {room}: {}x{} cells, {} blocked",
            grid.cols(),
            grid.rows(),
            grid.blocked_count()
        );
        Ok(cached.get_or_init(|| grid))
    }

    /// Number of grids rasterized so far
    pub fn built_count(&self) -> usize {
        self.grids.iter().filter(|grid| grid.get().is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MAX_GRID_CELLS;

    fn room_bounds() -> Rect<f64> {
        Rect::new(Coord { x: 0.0, y: 0.0 }, Coord { x: 100.0, y: 100.0 })
    }

    #[test]
    fn bresenham_covers_both_endpoints() {
        let cells: Vec<_> = LineCells::new(GridCell::new(0, 0), GridCell::new(4, 2)).collect();
        assert_eq!(cells.first(), Some(&GridCell::new(0, 0)));
        assert_eq!(cells.last(), Some(&GridCell::new(4, 2)));
        assert_eq!(cells.len(), 5);

        let reversed: Vec<_> = LineCells::new(GridCell::new(3, 3), GridCell::new(3, 0)).collect();
        assert_eq!(reversed.len(), 4);
        assert!(reversed.iter().all(|cell| cell.col == 3));
    }

    #[test]
    fn grid_dimensions_and_clamping() {
        let grid = ObstacleGrid::new(room_bounds(), 5.0, MAX_GRID_CELLS).unwrap();
        assert_eq!(grid.cols(), 21);
        assert_eq!(grid.rows(), 21);
        assert_eq!(grid.cell_of(Coord { x: 12.0, y: 3.0 }), GridCell::new(2, 0));
        assert_eq!(grid.cell_of(Coord { x: -50.0, y: 500.0 }), GridCell::new(0, 20));
        assert_eq!(grid.center_of(GridCell::new(2, 0)), Coord { x: 12.5, y: 2.5 });
    }

    #[test]
    fn walls_block_their_cells() {
        let wall = WallSegment::new(1, (50.0, 0.0), (50.0, 100.0));
        let grid = ObstacleGrid::rasterize(room_bounds(), &[wall], 5.0, MAX_GRID_CELLS).unwrap();
        assert_eq!(grid.blocked_count(), 21);
        assert!(grid.is_blocked(GridCell::new(10, 7)));
        assert!(!grid.is_blocked(GridCell::new(9, 7)));

        let left = grid.cell_of(Coord { x: 10.0, y: 50.0 });
        let right = grid.cell_of(Coord { x: 90.0, y: 50.0 });
        assert!(!grid.line_is_clear(left, right));
        assert!(grid.line_is_clear(left, GridCell::new(2, 18)));
    }

    #[test]
    fn diagonal_wall_cannot_be_squeezed_through() {
        let wall = WallSegment::new(1, (0.0, 0.0), (100.0, 100.0));
        let grid = ObstacleGrid::rasterize(room_bounds(), &[wall], 5.0, MAX_GRID_CELLS).unwrap();
        // Crossing the diagonal between two blocked cells
        assert!(grid.squeezes(GridCell::new(5, 4), GridCell::new(4, 5)));
        assert!(!grid.line_is_clear(GridCell::new(6, 2), GridCell::new(2, 6)));
        assert!(
            grid.neighbors(GridCell::new(5, 4), GridCell::new(0, 20), GridCell::new(20, 0))
                .all(|(cell, _)| cell != GridCell::new(4, 5))
        );
    }

    #[test]
    fn cache_rasterizes_each_room_once() {
        let plan = FloorPlanGraph::build(
            vec![
                crate::model::Room::rectangle(1, 0, (0.0, 0.0), (50.0, 50.0)),
                crate::model::Room::rectangle(2, 0, (50.0, 0.0), (100.0, 50.0)),
            ],
            &[],
            &[],
            &[],
        )
        .unwrap();
        let config = PlannerConfig::default();
        let cache = GridCache::for_plan(&plan);
        assert_eq!(cache.built_count(), 0);

        let first = cache.get_or_build(&plan, 1, &config).unwrap() as *const ObstacleGrid;
        let again = cache.get_or_build(&plan, 1, &config).unwrap() as *const ObstacleGrid;
        assert_eq!(first, again);
        assert_eq!(cache.built_count(), 1);
        assert!(matches!(
            cache.get_or_build(&plan, 3, &config),
            Err(Error::InvalidPosition(_))
        ));
    }

    #[test]
    fn oversized_grids_are_rejected() {
        let bounds = Rect::new(Coord { x: 0.0, y: 0.0 }, Coord { x: 1000.0, y: 1000.0 });
        for resolution in [1e-9, 0.0, -5.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                grid_dimensions(bounds, resolution, MAX_GRID_CELLS),
                Err(Error::InvalidData(_))
            ));
        }
        assert!(matches!(ObstacleGrid::new(bounds, 5.0, 1000), Err(Error::InvalidData(_))));
        assert_eq!(grid_dimensions(bounds, 5.0, MAX_GRID_CELLS).unwrap(), (201, 201));
        assert_eq!(grid_dimensions(bounds, 5.0, 201 * 201).unwrap(), (201, 201));
    }

    #[test]
    fn cache_reports_oversized_room() {
        let plan = FloorPlanGraph::build(
            vec![crate::model::Room::rectangle(1, 0, (0.0, 0.0), (1000.0, 1000.0))],
            &[],
            &[],
            &[],
        )
        .unwrap();
        let config = PlannerConfig {
            grid_resolution: 1e-9,
            ..PlannerConfig::default()
        };
        let cache = GridCache::for_plan(&plan);
        assert!(matches!(
            cache.get_or_build(&plan, 1, &config),
            Err(Error::InvalidData(_))
        ));
        assert_eq!(cache.built_count(), 0);
    }
}
