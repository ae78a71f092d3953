//! Command-line surface of the tour planner: loads a museum snapshot and
//! planner settings, hands them to [`parcours_core`].

pub mod settings;
pub mod snapshot;

pub use settings::load_planner_config;
pub use snapshot::MuseumSnapshot;
