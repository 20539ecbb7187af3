//! Survey mission model tying grid, camera, selection, airport and flight plan together.
//!
//! The mission owns every piece of mutable state. Each mutation is followed by a
//! synchronous recompute of the flight plan, except for airport previews which
//! only move the marker until the drag is released.

use std::fmt;

use aerosurvey_camera::{
    CameraError, CameraGeometry, CameraParams, CellCoverage, cell_coverage, compute, validate,
};
use aerosurvey_core::LatLng;
use aerosurvey_grid::{CellKey, GridSpec};
use aerosurvey_paths::{FlightPlan, PlanError, plan};
use aerosurvey_selection::{SelectionError, SelectionSet};
use geo::LineString;
use thiserror::Error;
use tracing::{info, warn};

mod export;

pub use export::{
    AIRPORT_FEATURE_NAME, CELL_FEATURE_NAME, Export, MERIDIANS_FEATURE_NAME, PARALLELS_FEATURE_NAME,
};

#[derive(Debug, Error)]
pub enum MissionError {
    #[error("invalid camera parameters: {0}")]
    Camera(#[from] CameraError),
    #[error(transparent)]
    Selection(#[from] SelectionError),
}

/// Result of one recompute.
#[derive(Debug, Clone, PartialEq)]
pub enum RecomputeOutcome {
    Planned,
    /// Nothing selected, any previous plan was dropped.
    NothingToCover,
    /// Planning failed; the previous plan, if any, is kept.
    Rejected(PlanError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissionWarning {
    NoPathsComputedYet,
}

impl fmt::Display for MissionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissionWarning::NoPathsComputedYet => {
                f.write_str(
                    "flight paths have not been computed yet, only cells and airport were exported",
                )
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Mission {
    name: String,
    grid: GridSpec,
    camera: CameraParams,
    geometry: CameraGeometry,
    selection: SelectionSet,
    airport: LatLng,
    plan: Option<FlightPlan>,
    last_rejection: Option<PlanError>,
}

impl Mission {
    pub fn new(
        name: impl Into<String>,
        grid: GridSpec,
        camera: CameraParams,
        airport: LatLng,
    ) -> Result<Self, MissionError> {
        validate(&camera)?;
        let geometry = compute(&camera);
        if geometry.rotated_sensor {
            warn!("camera height is greater than camera width, the camera will be rotated by 90°");
        }
        Ok(Self {
            name: name.into(),
            grid,
            geometry,
            camera,
            selection: SelectionSet::new(grid),
            airport,
            plan: None,
            last_rejection: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn grid(&self) -> &GridSpec {
        &self.grid
    }

    pub fn camera(&self) -> &CameraParams {
        &self.camera
    }

    pub fn geometry(&self) -> &CameraGeometry {
        &self.geometry
    }

    pub fn coverage(&self) -> CellCoverage {
        cell_coverage(&self.geometry, &self.grid)
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn airport(&self) -> LatLng {
        self.airport
    }

    /// Last successfully computed plan.
    pub fn plan(&self) -> Option<&FlightPlan> {
        self.plan.as_ref()
    }

    /// Reason the most recent recompute was rejected, cleared by the next success.
    pub fn last_rejection(&self) -> Option<&PlanError> {
        self.last_rejection.as_ref()
    }

    /// Replace the camera settings; invalid settings leave the mission untouched.
    pub fn set_camera(&mut self, camera: CameraParams) -> Result<RecomputeOutcome, MissionError> {
        validate(&camera)?;
        self.geometry = compute(&camera);
        self.camera = camera;
        if self.geometry.rotated_sensor {
            warn!("camera height is greater than camera width, the camera will be rotated by 90°");
        }
        Ok(self.recompute())
    }

    pub fn toggle_cell(&mut self, key: CellKey) -> RecomputeOutcome {
        self.selection.toggle(key);
        self.recompute()
    }

    pub fn select_cell(&mut self, key: CellKey) -> RecomputeOutcome {
        self.selection.select(key);
        self.recompute()
    }

    /// Select the cell containing `point`.
    pub fn select_at(&mut self, point: LatLng) -> RecomputeOutcome {
        let key = self.grid.cell_at(point);
        self.select_cell(key)
    }

    pub fn deselect_cell(&mut self, key: CellKey) -> RecomputeOutcome {
        self.selection.deselect(key);
        self.recompute()
    }

    /// Set the terrain height range of a selected cell.
    ///
    /// An inverted range is stored and reported as an error; the plan is
    /// recomputed without that cell either way.
    pub fn set_cell_heights(
        &mut self,
        key: CellKey,
        min: f64,
        max: f64,
    ) -> Result<RecomputeOutcome, MissionError> {
        match self.selection.set_heights(key, min, max) {
            Ok(()) => Ok(self.recompute()),
            Err(err @ SelectionError::InvalidHeightRange { .. }) => {
                warn!(cell = %key, min, max, "invalid height range");
                self.recompute();
                Err(err.into())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Move the airport without replanning, e.g. while it is being dragged.
    pub fn preview_airport(&mut self, airport: LatLng) {
        self.airport = airport;
    }

    /// Move the airport and replan.
    pub fn set_airport(&mut self, airport: LatLng) -> RecomputeOutcome {
        self.airport = airport;
        self.recompute()
    }

    pub fn recompute(&mut self) -> RecomputeOutcome {
        match plan(self.selection.union(), &self.geometry, &self.grid, self.airport) {
            Ok(Some(plan)) => {
                info!(
                    mission = %self.name,
                    cells = self.selection.len(),
                    parallels_m = plan.parallels.length_m,
                    meridians_m = plan.meridians.length_m,
                    "mission replanned"
                );
                self.plan = Some(plan);
                self.last_rejection = None;
                RecomputeOutcome::Planned
            }
            Ok(None) => {
                self.plan = None;
                self.last_rejection = None;
                RecomputeOutcome::NothingToCover
            }
            Err(err) => {
                warn!(
                    mission = %self.name,
                    error = %err,
                    "flight plan rejected, keeping previous paths"
                );
                self.last_rejection = Some(err.clone());
                RecomputeOutcome::Rejected(err)
            }
        }
    }

    /// Boundary rings of the selection union, for drawing its outline.
    pub fn union_outline(&self) -> Vec<LineString<f64>> {
        let Some(union) = self.selection.union() else {
            return Vec::new();
        };
        union
            .iter()
            .flat_map(|polygon| std::iter::once(polygon.exterior()).chain(polygon.interiors()))
            .cloned()
            .collect()
    }

    /// Approximate area of all selected cells (m²).
    pub fn selected_area_m2(&self) -> f64 {
        self.selection.selected_area_m2(self.coverage().cell_area_m2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aerosurvey_nomenclature::StandardScale;
    use aerosurvey_paths::CountBound;

    fn camera() -> CameraParams {
        CameraParams {
            flight_height_m: 2000.0,
            focal_length_mm: 50.0,
            ..CameraParams::default()
        }
    }

    fn mission() -> Mission {
        let grid = GridSpec::new(0.01, 0.01, StandardScale::Custom).unwrap();
        Mission::new("test", grid, camera(), LatLng::new(0.0, -0.02)).unwrap()
    }

    #[test]
    fn empty_selection_has_nothing_to_cover() {
        let mut m = mission();
        assert_eq!(m.recompute(), RecomputeOutcome::NothingToCover);
        assert!(m.plan().is_none());
        assert!(m.union_outline().is_empty());
    }

    #[test]
    fn selecting_a_cell_plans_both_routes() {
        let mut m = mission();
        assert_eq!(m.select_at(LatLng::new(0.005, 0.005)), RecomputeOutcome::Planned);
        let plan = m.plan().unwrap();
        assert_eq!(plan.parallels.vertices[0], m.airport());
        assert_eq!(m.union_outline().len(), 1);
        assert_eq!(m.toggle_cell(CellKey::new(0, 0)), RecomputeOutcome::NothingToCover);
        assert!(m.plan().is_none());
    }

    #[test]
    fn rejected_camera_change_keeps_previous_paths() {
        let mut m = mission();
        m.select_cell(CellKey::new(0, 0));
        let before = m.plan().cloned();
        let outcome = m.set_camera(CameraParams::default()).unwrap();
        assert!(matches!(
            outcome,
            RecomputeOutcome::Rejected(PlanError::PathCountOutOfRange {
                bound: CountBound::TooMany,
                ..
            })
        ));
        assert_eq!(m.plan().cloned(), before);
        assert!(m.last_rejection().is_some());

        assert_eq!(m.set_camera(camera()).unwrap(), RecomputeOutcome::Planned);
        assert!(m.last_rejection().is_none());
    }

    #[test]
    fn invalid_camera_is_refused() {
        let mut m = mission();
        let bad = CameraParams {
            overlap_between_paths_pct: 10.0,
            ..camera()
        };
        assert!(matches!(m.set_camera(bad), Err(MissionError::Camera(_))));
        assert_eq!(m.camera(), &camera());
    }

    #[test]
    fn airport_preview_does_not_replan() {
        let mut m = mission();
        m.select_cell(CellKey::new(0, 0));
        let old = m.plan().unwrap().parallels.vertices[0];
        m.preview_airport(LatLng::new(0.02, 0.02));
        assert_eq!(m.plan().unwrap().parallels.vertices[0], old);
        m.set_airport(LatLng::new(0.02, 0.02));
        assert_eq!(m.plan().unwrap().parallels.vertices[0], LatLng::new(0.02, 0.02));
    }

    #[test]
    fn inverted_heights_drop_the_cell_from_the_plan() {
        let mut m = mission();
        m.select_cell(CellKey::new(0, 0));
        let err = m.set_cell_heights(CellKey::new(0, 0), 50.0, 10.0).unwrap_err();
        assert!(matches!(
            err,
            MissionError::Selection(SelectionError::InvalidHeightRange { .. })
        ));
        assert!(m.plan().is_none());
        assert_eq!(
            m.set_cell_heights(CellKey::new(0, 0), 10.0, 50.0).unwrap(),
            RecomputeOutcome::Planned
        );
    }

    #[test]
    fn selected_area_counts_cells() {
        let mut m = mission();
        m.select_cell(CellKey::new(0, 0));
        m.select_cell(CellKey::new(0, 1));
        assert_eq!(m.selected_area_m2(), 2.0 * 1112.0 * 1112.0);
    }
}
