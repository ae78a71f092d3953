//! Tour planning: artwork selection, visit order and path segments

mod planner;
mod segments;
mod selector;
mod sequencer;

pub use planner::{PlanRequest, plan_tour};
pub use segments::{BuiltSegments, SegmentBuilder};
pub use selector::{ArtworkSelector, Selection};
pub use sequencer::RouteSequencer;
