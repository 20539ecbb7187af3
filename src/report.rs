//! Flat views of a mission for the CSV and JSON exports.

use aerosurvey_core::rounding::round5;
use aerosurvey_export::cells::CellRecord;
use aerosurvey_export::summary::{MissionSummary, PathSummary, timestamp};
use aerosurvey_mission::{Mission, MissionWarning};
use aerosurvey_paths::FlightPath;

/// One row per selected cell, metrics left empty for invalid height ranges.
pub fn cell_records(mission: &Mission) -> Vec<CellRecord> {
    let grid = mission.grid();
    let flight_height = mission.camera().flight_height_m;
    mission
        .selection()
        .iter()
        .map(|(key, entry)| {
            let sw = grid.south_west(key);
            let ne = grid.north_east(key);
            let metrics = entry.metrics(flight_height).ok();
            CellRecord {
                name: entry.name.clone(),
                south: round5(sw.lat),
                west: round5(sw.lng),
                north: round5(ne.lat),
                east: round5(ne.lng),
                min_height: entry.min_height,
                max_height: entry.max_height,
                mean_height: metrics.map(|m| m.mean_height),
                absolute_height: metrics.map(|m| m.absolute_height),
                elevation_difference: metrics.map(|m| round5(m.elevation_difference)),
                relief: metrics.map(|m| m.relief.to_string()),
            }
        })
        .collect()
}

/// Scalar summary of the mission, with every reason the result may be incomplete.
pub fn summary(mission: &Mission) -> MissionSummary {
    let grid = mission.grid();
    let geometry = mission.geometry();

    let mut warnings = Vec::new();
    if geometry.rotated_sensor {
        warnings.push(
            "camera height is greater than camera width, the camera will be rotated by 90°"
                .to_string(),
        );
    }
    for key in mission.selection().invalid_cells() {
        warnings.push(format!("cell {key} has an invalid height range and is not covered"));
    }
    if let Some(rejection) = mission.last_rejection() {
        warnings.push(rejection.to_string());
    }
    let paths = match mission.plan() {
        Some(plan) => plan.paths().into_iter().map(path_summary).collect(),
        None => {
            if !mission.selection().is_empty() {
                warnings.push(MissionWarning::NoPathsComputedYet.to_string());
            }
            Vec::new()
        }
    };

    MissionSummary {
        mission: mission.name().to_string(),
        generated_at: timestamp(),
        scale: grid.scale().to_string(),
        lat_distance_deg: round5(grid.lat_distance()),
        lng_distance_deg: round5(grid.lng_distance()),
        selected_cells: mission.selection().len(),
        selected_area_m2: mission.selected_area_m2(),
        image_scale: geometry.image_scale.clone(),
        gsi_m: round5(geometry.gsi_m),
        basis_along_m: round5(geometry.basis_along_m),
        basis_across_m: round5(geometry.basis_across_m),
        paths,
        warnings,
    }
}

fn path_summary(path: &FlightPath) -> PathSummary {
    PathSummary {
        orientation: path.orientation.to_string(),
        length_m: path.length_m,
        flight_time_h: path.flight_time_h,
        paths_per_cell: path.paths_per_cell,
        passes: path.segment_count,
    }
}
