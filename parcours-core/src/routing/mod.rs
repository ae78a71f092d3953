//! Walking paths through the floor plan
//!
//! Single-room legs are searched on a rasterized obstacle grid, legs
//! spanning several rooms are stitched through doors and vertical links.

mod astar;
mod grid;
mod path;
mod router;
mod state;

pub use astar::GridPathfinder;
pub use grid::{GridCache, GridCell, LineCells, ObstacleGrid, grid_dimensions};
pub use path::{PathStatus, RoutedPath};
pub use router::MultiRoomRouter;
