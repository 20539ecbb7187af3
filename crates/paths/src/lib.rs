//! Flight line synthesis.
//!
//! Two routes are planned over the union of selected cells: one flying along
//! parallels (east-west passes stepping south) and one along meridians
//! (north-south passes stepping east). Each pass is a sweep line across the
//! bounding box of a polygon, clipped to the polygon, stretched past its edges
//! by the capture basis and joined to the previous pass end to end so the
//! aircraft flies one continuous back-and-forth track from and to the airport.

use std::fmt;

use aerosurvey_camera::{CameraGeometry, CellCoverage, capture_basis_degrees, cell_coverage};
use aerosurvey_core::LatLng;
use aerosurvey_core::constants::{PATH_EARTH_RADIUS_M, SECONDS_PER_HOUR};
use aerosurvey_core::rounding::{round_to, round5};
use aerosurvey_grid::GridSpec;
use geo::{Coord, HaversineMeasure, Length, Line, LineString, MultiPolygon, Polygon};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

pub mod geometry;

use geometry::{bounding_box, clip_line_by_polygon};

/// Per-cell line counts at or above this are rejected.
pub const MAX_PATHS_PER_CELL: u32 = 20;
/// Per-cell line counts at or below this are rejected.
pub const MIN_PATHS_PER_CELL: u32 = 2;

/// Sweep lines are shifted by this fraction of the line spacing in the sweep
/// direction and kept that far inside the bounding box, so they never run
/// along a polygon edge.
const SWEEP_NUDGE: f64 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CountBound {
    TooMany,
    TooFew,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PlanError {
    #[error("{}", path_count_message(.bound, .parallels, .meridians))]
    PathCountOutOfRange {
        parallels: u32,
        meridians: u32,
        bound: CountBound,
    },
}

fn path_count_message(bound: &CountBound, parallels: &u32, meridians: &u32) -> String {
    match bound {
        CountBound::TooMany => format!(
            "calculated paths count is too big \
             ({parallels} by parallels, {meridians} by meridians), \
             it should be less than {MAX_PATHS_PER_CELL}; please check your values"
        ),
        CountBound::TooFew => format!(
            "calculated paths count is too small \
             ({parallels} by parallels, {meridians} by meridians), \
             it should be greater than {MIN_PATHS_PER_CELL}; please check your values"
        ),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Orientation {
    Parallel,
    Meridian,
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Parallel => f.write_str("parallels"),
            Orientation::Meridian => f.write_str("meridians"),
        }
    }
}

/// One continuous route, airport to airport.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightPath {
    pub orientation: Orientation,
    pub vertices: Vec<LatLng>,
    /// Haversine length at flight height, rounded to whole metres.
    pub length_m: f64,
    /// Flight time in hours (2 decimals); `None` when the speed is zero.
    pub flight_time_h: Option<f64>,
    pub paths_per_cell: u32,
    /// Number of clipped passes in the route.
    pub segment_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightPlan {
    pub parallels: FlightPath,
    pub meridians: FlightPath,
    pub coverage: CellCoverage,
}

impl FlightPlan {
    pub fn paths(&self) -> [&FlightPath; 2] {
        [&self.parallels, &self.meridians]
    }
}

/// Reject per-cell line counts outside `(MIN_PATHS_PER_CELL, MAX_PATHS_PER_CELL)`.
pub fn check_path_counts(coverage: &CellCoverage) -> Result<(), PlanError> {
    let parallels = coverage.parallel_paths_per_cell;
    let meridians = coverage.meridian_paths_per_cell;
    let bound = if parallels >= MAX_PATHS_PER_CELL || meridians >= MAX_PATHS_PER_CELL {
        CountBound::TooMany
    } else if parallels <= MIN_PATHS_PER_CELL || meridians <= MIN_PATHS_PER_CELL {
        CountBound::TooFew
    } else {
        return Ok(());
    };
    Err(PlanError::PathCountOutOfRange {
        parallels,
        meridians,
        bound,
    })
}

/// Plan both routes over `union`.
///
/// `Ok(None)` means there is nothing to cover. A rejected plan leaves it to the
/// caller to keep whatever it planned before.
pub fn plan(
    union: Option<&MultiPolygon<f64>>,
    geometry: &CameraGeometry,
    grid: &GridSpec,
    airport: LatLng,
) -> Result<Option<FlightPlan>, PlanError> {
    let Some(union) = union else {
        debug!("empty selection, nothing to plan");
        return Ok(None);
    };
    let coverage = cell_coverage(geometry, grid);
    check_path_counts(&coverage)?;

    let parallels = sweep(
        union,
        Sweep {
            orientation: Orientation::Parallel,
            per_cell: coverage.parallel_paths_per_cell,
            cell_deg: grid.lat_distance(),
            extend_deg: capture_basis_degrees(geometry.basis_along_m),
        },
        geometry,
        airport,
    );
    let meridians = sweep(
        union,
        Sweep {
            orientation: Orientation::Meridian,
            per_cell: coverage.meridian_paths_per_cell,
            cell_deg: grid.lng_distance(),
            extend_deg: capture_basis_degrees(geometry.basis_across_m),
        },
        geometry,
        airport,
    );
    info!(
        polygons = union.0.len(),
        parallels_m = parallels.length_m,
        meridians_m = meridians.length_m,
        "flight plan computed"
    );
    Ok(Some(FlightPlan {
        parallels,
        meridians,
        coverage,
    }))
}

#[derive(Debug, Clone, Copy)]
struct Sweep {
    orientation: Orientation,
    per_cell: u32,
    cell_deg: f64,
    extend_deg: f64,
}

fn sweep(
    union: &MultiPolygon<f64>,
    s: Sweep,
    geometry: &CameraGeometry,
    airport: LatLng,
) -> FlightPath {
    let mut vertices = vec![airport];
    let mut segment_count = 0;
    for polygon in union.iter() {
        for pass in polygon_passes(polygon, s) {
            vertices.push(pass.start.into());
            vertices.push(pass.end.into());
            segment_count += 1;
        }
    }
    vertices.push(airport);

    let length_m = path_length(&vertices, geometry.flight_height_m).round();
    FlightPath {
        orientation: s.orientation,
        vertices,
        length_m,
        flight_time_h: flight_time_h(length_m, geometry.speed_ms),
        paths_per_cell: s.per_cell,
        segment_count,
    }
}

/// Clipped and extended passes over one polygon, already in flying order.
fn polygon_passes(polygon: &Polygon<f64>, s: Sweep) -> Vec<Line<f64>> {
    let Some(bbox) = bounding_box(polygon) else {
        return Vec::new();
    };
    let (west, south) = bbox.min().x_y();
    let (east, north) = bbox.max().x_y();

    let extent = match s.orientation {
        Orientation::Parallel => north - south,
        Orientation::Meridian => east - west,
    };
    let cells = round5(extent / s.cell_deg).ceil().max(1.0) as u32;
    let count = s.per_cell.saturating_mul(cells).max(1);
    let spacing = extent / f64::from(count);
    debug!(
        orientation = %s.orientation,
        lines = count + 1,
        spacing_deg = spacing,
        "sweeping polygon"
    );

    let nudge = spacing * SWEEP_NUDGE;
    let mut passes = Vec::with_capacity(count as usize + 1);
    let mut reverse = false;
    for i in 0..=count {
        let step = f64::from(i) * spacing;
        let line = match s.orientation {
            Orientation::Parallel => {
                let lat = (north - step - nudge).clamp(south + nudge, north - nudge);
                Line::new(Coord { x: west, y: lat }, Coord { x: east, y: lat })
            }
            Orientation::Meridian => {
                let lng = (west + step + nudge).clamp(west + nudge, east - nudge);
                Line::new(Coord { x: lng, y: north }, Coord { x: lng, y: south })
            }
        };
        let Some(chord) = clip_line_by_polygon(&line, polygon) else {
            continue;
        };
        let pass = extend(chord, s.orientation, s.extend_deg);
        passes.push(if reverse {
            Line::new(pass.end, pass.start)
        } else {
            pass
        });
        reverse = !reverse;
    }
    passes
}

/// Push both ends of a chord outward along its own axis.
fn extend(chord: Line<f64>, orientation: Orientation, by_deg: f64) -> Line<f64> {
    let (mut start, mut end) = (chord.start, chord.end);
    match orientation {
        // west to east
        Orientation::Parallel => {
            start.x -= by_deg;
            end.x += by_deg;
        }
        // north to south
        Orientation::Meridian => {
            start.y += by_deg;
            end.y -= by_deg;
        }
    }
    Line::new(start, end)
}

/// Haversine length of the polyline on a sphere of radius
/// `6 371 000 m + flight_height_m`.
pub fn path_length(vertices: &[LatLng], flight_height_m: f64) -> f64 {
    let line: LineString<f64> = vertices.iter().map(|&p| Coord::from(p)).collect();
    HaversineMeasure::new(PATH_EARTH_RADIUS_M + flight_height_m).length(&line)
}

/// Hours needed to fly `length_m` at `speed_ms`, rounded to 2 decimals.
pub fn flight_time_h(length_m: f64, speed_ms: f64) -> Option<f64> {
    if speed_ms > 0.0 {
        Some(round_to(length_m / speed_ms / SECONDS_PER_HOUR, 2))
    } else {
        None
    }
}
