//! Aerial survey planning: sheet nomenclature, grid tessellation, camera
//! geometry and flight-path synthesis over a selection of grid cells.
//!
//! The work is split across the workspace crates and re-exported here so the
//! command line tools and any other front-end share one entry point.

pub use aerosurvey_camera as camera;
pub use aerosurvey_config as config;
pub use aerosurvey_core as core;
pub use aerosurvey_export as export;
pub use aerosurvey_grid as grid;
pub use aerosurvey_mission as mission;
pub use aerosurvey_nomenclature as nomenclature;
pub use aerosurvey_paths as paths;
pub use aerosurvey_selection as selection;

pub mod manifest;
pub mod report;

/// Returns the version of the library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
