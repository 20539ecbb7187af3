//! Camera geometry: from sensor, lens and overlap settings to ground footprint
//! and the distances between exposures and between flight lines.

use aerosurvey_core::format::group_thousands;
use aerosurvey_core::units::{
    degrees_to_radians, kmh_to_ms, length_to_degrees, mm_to_m, radians_to_length, um_to_m,
};
use aerosurvey_grid::GridSpec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_OVERLAP_BETWEEN_PATHS_PCT: f64 = 60.0;
pub const MIN_OVERLAP_BETWEEN_IMAGES_PCT: f64 = 30.0;

/// Camera, lens and flight settings as entered by the operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraParams {
    pub width_px: u32,
    pub height_px: u32,
    pub pixel_size_um: f64,
    pub focal_length_mm: f64,
    pub flight_height_m: f64,
    pub overlap_between_paths_pct: f64,
    pub overlap_between_images_pct: f64,
    pub speed_kmh: f64,
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            width_px: 4096,
            height_px: 4096,
            pixel_size_um: 1.0,
            focal_length_mm: 100.0,
            flight_height_m: 1000.0,
            overlap_between_paths_pct: 60.0,
            overlap_between_images_pct: 50.0,
            speed_kmh: 350.0,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum CameraError {
    #[error("camera {axis} must be at least one pixel")]
    EmptySensor { axis: &'static str },
    #[error("{field} must be a positive number, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("{field} must be within [{min}, 100), got {value}")]
    OverlapOutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
    },
    #[error("aircraft speed cannot be negative, got {0}")]
    NegativeSpeed(f64),
}

/// Check the ranges every parameter must respect before [`compute`] is meaningful.
pub fn validate(params: &CameraParams) -> Result<(), CameraError> {
    if params.width_px == 0 {
        return Err(CameraError::EmptySensor { axis: "width" });
    }
    if params.height_px == 0 {
        return Err(CameraError::EmptySensor { axis: "height" });
    }
    positive("pixel size", params.pixel_size_um)?;
    positive("focal length", params.focal_length_mm)?;
    positive("flight height", params.flight_height_m)?;
    overlap(
        "overlap between paths",
        params.overlap_between_paths_pct,
        MIN_OVERLAP_BETWEEN_PATHS_PCT,
    )?;
    overlap(
        "overlap between images",
        params.overlap_between_images_pct,
        MIN_OVERLAP_BETWEEN_IMAGES_PCT,
    )?;
    if !params.speed_kmh.is_finite() || params.speed_kmh < 0.0 {
        return Err(CameraError::NegativeSpeed(params.speed_kmh));
    }
    Ok(())
}

fn positive(field: &'static str, value: f64) -> Result<(), CameraError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CameraError::NotPositive { field, value })
    }
}

fn overlap(field: &'static str, value: f64, min: f64) -> Result<(), CameraError> {
    if (min..100.0).contains(&value) {
        Ok(())
    } else {
        Err(CameraError::OverlapOutOfRange { field, value, min })
    }
}

/// Ground geometry derived from [`CameraParams`]. Lengths in metres.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CameraGeometry {
    /// Geometric scale coefficient `m = H / f`.
    pub scale: f64,
    /// `1:N` label of the image scale.
    pub image_scale: String,
    /// Sensor width on the image plane (`ly`).
    pub image_width_m: f64,
    /// Sensor height on the image plane (`lx`).
    pub image_height_m: f64,
    /// Ground footprint across the flight line (`Ly`).
    pub footprint_along_m: f64,
    /// Ground footprint along the flight line (`Lx`).
    pub footprint_across_m: f64,
    /// Distance between neighbouring flight lines (`By`).
    pub basis_along_m: f64,
    /// Distance between consecutive exposures of one line (`Bx`).
    pub basis_across_m: f64,
    pub gsi_m: f64,
    pub ifov_urad: f64,
    pub gifov_m: f64,
    pub fov: f64,
    pub gfov_m: f64,
    /// Sensor is taller than wide and will be mounted rotated by 90°.
    pub rotated_sensor: bool,
    /// Flight height the geometry was computed for.
    pub flight_height_m: f64,
    /// Aircraft ground speed (m/s).
    pub speed_ms: f64,
}

pub fn compute(params: &CameraParams) -> CameraGeometry {
    let pixel = um_to_m(params.pixel_size_um);
    let focal = mm_to_m(params.focal_length_mm);
    let width = f64::from(params.width_px);
    let height = f64::from(params.height_px);

    let scale = params.flight_height_m / focal;
    let ly = width * pixel;
    let big_ly = ly * scale;
    let by = big_ly * (100.0 - params.overlap_between_paths_pct) / 100.0;
    let lx = height * pixel;
    let big_lx = lx * scale;
    let bx = big_lx * (100.0 - params.overlap_between_images_pct) / 100.0;

    let gsi = pixel * scale;
    let ifov = pixel / focal * 1e6;

    CameraGeometry {
        scale,
        image_scale: format_image_scale(scale),
        image_width_m: ly,
        image_height_m: lx,
        footprint_along_m: big_ly,
        footprint_across_m: big_lx,
        basis_along_m: by,
        basis_across_m: bx,
        gsi_m: gsi,
        ifov_urad: ifov,
        gifov_m: gsi,
        fov: width * ifov,
        gfov_m: width * gsi,
        rotated_sensor: params.height_px > params.width_px,
        flight_height_m: params.flight_height_m,
        speed_ms: kmh_to_ms(params.speed_kmh),
    }
}

/// `1:N` label with `N = round(m)` grouped by thousands.
pub fn format_image_scale(scale: f64) -> String {
    let rounded = scale.round();
    if rounded.is_finite() && rounded >= 0.0 {
        format!("1:{}", group_thousands(rounded as u64))
    } else {
        format!("1:{scale}")
    }
}

/// Ground span in degrees by which a clipped flight line is extended at each
/// end: twice the given basis.
pub fn capture_basis_degrees(basis_m: f64) -> f64 {
    length_to_degrees(basis_m) * 2.0
}

/// How a grid cell is covered by flight lines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CellCoverage {
    /// North-south extent of one cell, rounded to whole metres.
    pub lat_cell_m: f64,
    /// East-west extent of one cell at the equator, rounded to whole metres.
    pub lng_cell_m: f64,
    /// Flight lines per cell when flying along parallels, from the east-west extent.
    pub parallel_paths_per_cell: u32,
    /// Flight lines per cell when flying along meridians, from the north-south extent.
    pub meridian_paths_per_cell: u32,
    /// Approximate area of one cell (m²).
    pub cell_area_m2: f64,
}

pub fn cell_coverage(geometry: &CameraGeometry, grid: &GridSpec) -> CellCoverage {
    let lat_cell_m = cell_size_m(grid.lat_distance());
    let lng_cell_m = cell_size_m(grid.lng_distance());
    CellCoverage {
        lat_cell_m,
        lng_cell_m,
        parallel_paths_per_cell: paths_per_cell(lng_cell_m, geometry.basis_along_m),
        meridian_paths_per_cell: paths_per_cell(lat_cell_m, geometry.basis_along_m),
        cell_area_m2: (lat_cell_m * lng_cell_m).round(),
    }
}

fn cell_size_m(degrees: f64) -> f64 {
    radians_to_length(degrees_to_radians(degrees)).round()
}

fn paths_per_cell(cell_m: f64, basis_m: f64) -> u32 {
    let count = (cell_m / basis_m).ceil() + 1.0;
    if count.is_finite() && count >= 0.0 {
        count.min(f64::from(u32::MAX)) as u32
    } else {
        u32::MAX
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aerosurvey_nomenclature::StandardScale;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * b.abs().max(1.0)
    }

    #[test]
    fn defaults_give_scale_ten_thousand() {
        let g = compute(&CameraParams::default());
        assert!(close(g.scale, 10_000.0));
        assert_eq!(g.image_scale, "1:10 000");
        // 4096 px × 1 µm
        assert!(close(g.image_width_m, 0.004096));
        assert!(close(g.footprint_along_m, 40.96));
        assert!(close(g.basis_along_m, 40.96 * 0.4));
        assert!(close(g.basis_across_m, 40.96 * 0.5));
        assert!(close(g.gsi_m, 0.01));
        assert!(close(g.gifov_m, g.gsi_m));
        assert!(close(g.ifov_urad, 10.0));
        assert!(close(g.fov, 40_960.0));
        assert!(close(g.gfov_m, 40.96));
        assert!(!g.rotated_sensor);
        assert!(close(g.speed_ms, 350.0 / 3.6));
    }

    #[test]
    fn scale_is_height_over_focal_length() {
        for (h, f) in [(500.0, 50.0), (1200.0, 35.0), (3000.0, 150.0)] {
            let params = CameraParams {
                flight_height_m: h,
                focal_length_mm: f,
                ..CameraParams::default()
            };
            assert!(close(compute(&params).scale, h / (f / 1000.0)));
            assert_eq!(compute(&params), compute(&params));
        }
    }

    #[test]
    fn taller_sensor_is_flagged() {
        let params = CameraParams {
            width_px: 3000,
            height_px: 4000,
            ..CameraParams::default()
        };
        assert!(compute(&params).rotated_sensor);
    }

    #[test]
    fn validation_rejects_out_of_range_inputs() {
        assert_eq!(validate(&CameraParams::default()), Ok(()));
        let bad = CameraParams {
            overlap_between_paths_pct: 59.0,
            ..CameraParams::default()
        };
        assert!(matches!(
            validate(&bad),
            Err(CameraError::OverlapOutOfRange { min, .. }) if min == 60.0
        ));
        let bad = CameraParams {
            overlap_between_images_pct: 100.0,
            ..CameraParams::default()
        };
        assert!(validate(&bad).is_err());
        let bad = CameraParams {
            focal_length_mm: 0.0,
            ..CameraParams::default()
        };
        assert!(matches!(validate(&bad), Err(CameraError::NotPositive { .. })));
        let bad = CameraParams {
            width_px: 0,
            ..CameraParams::default()
        };
        assert_eq!(validate(&bad), Err(CameraError::EmptySensor { axis: "width" }));
        let bad = CameraParams {
            speed_kmh: -1.0,
            ..CameraParams::default()
        };
        assert_eq!(validate(&bad), Err(CameraError::NegativeSpeed(-1.0)));
    }

    #[test]
    fn coverage_counts_flight_lines_per_cell() {
        let params = CameraParams {
            flight_height_m: 2000.0,
            focal_length_mm: 50.0,
            ..CameraParams::default()
        };
        let g = compute(&params);
        // By = 4096e-6 × 40000 × 0.4 = 65.536 m
        let grid = GridSpec::new(0.01, 0.01, StandardScale::Custom).unwrap();
        let c = cell_coverage(&g, &grid);
        assert_eq!(c.lat_cell_m, 1112.0);
        assert_eq!(c.lng_cell_m, 1112.0);
        assert_eq!(c.parallel_paths_per_cell, 18);
        assert_eq!(c.meridian_paths_per_cell, 18);
        assert_eq!(c.cell_area_m2, 1112.0 * 1112.0);
    }

    #[test]
    fn parallels_count_across_the_cell_width() {
        let params = CameraParams {
            pixel_size_um: 10.0,
            flight_height_m: 15_000.0,
            focal_length_mm: 50.0,
            ..CameraParams::default()
        };
        // By = 4915.2 m over a 37 065 m × 55 598 m sheet
        let grid = GridSpec::for_standard_scale(StandardScale::Scale100K).unwrap();
        let c = cell_coverage(&compute(&params), &grid);
        assert_eq!(c.lat_cell_m, 37_065.0);
        assert_eq!(c.lng_cell_m, 55_598.0);
        assert_eq!(c.parallel_paths_per_cell, 13);
        assert_eq!(c.meridian_paths_per_cell, 9);
    }

    #[test]
    fn capture_basis_is_doubled() {
        let one_degree_m = radians_to_length(degrees_to_radians(1.0));
        assert!(close(capture_basis_degrees(one_degree_m), 2.0));
    }
}
