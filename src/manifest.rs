//! Build a [`Mission`] from a loaded manifest.

use aerosurvey_config::{GridConfig, MissionManifest};
use aerosurvey_grid::{GridError, GridSpec};
use aerosurvey_mission::{Mission, MissionError};
use aerosurvey_selection::SelectionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid grid: {0}")]
    Grid(#[from] GridError),
    #[error(transparent)]
    Mission(#[from] MissionError),
}

/// Grid of the manifest; a missing distance is taken from the sheet size of the scale.
pub fn grid_from_config(config: &GridConfig) -> Result<GridSpec, GridError> {
    match (config.lat_distance, config.lng_distance) {
        (Some(lat), Some(lng)) => GridSpec::new(lat, lng, config.scale),
        (lat, lng) => {
            let (sheet_lat, sheet_lng) = config.scale.sheet_size().ok_or(GridError::NoSheetSize)?;
            GridSpec::new(lat.unwrap_or(sheet_lat), lng.unwrap_or(sheet_lng), config.scale)
        }
    }
}

/// Select every manifest cell and plan the mission.
///
/// Cells with an inverted height range stay selected and flagged, the same
/// way an interactive edit would leave them.
pub fn build_mission(manifest: &MissionManifest) -> Result<Mission, BuildError> {
    let grid = grid_from_config(&manifest.grid)?;
    let mut mission = Mission::new(
        manifest.name.clone(),
        grid,
        manifest.camera.clone(),
        manifest.airport_or_default(),
    )?;
    for cell in &manifest.cells {
        let key = grid.cell_at(aerosurvey_core::LatLng::new(cell.lat, cell.lng));
        mission.select_cell(key);
        match mission.set_cell_heights(key, cell.min_height, cell.max_height) {
            Ok(_) => {}
            Err(MissionError::Selection(SelectionError::InvalidHeightRange { .. })) => {}
            Err(err) => return Err(err.into()),
        }
    }
    Ok(mission)
}
