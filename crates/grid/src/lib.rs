//! Lat/lng aligned grid over the earth's surface.
//!
//! A grid is fixed by its two cell sizes in degrees. Cells are addressed by
//! integer `(row, col)` keys so that the same cell produces the same key and
//! the same corners on every redraw, whatever window it was generated for.

use std::fmt;

use aerosurvey_core::LatLng;
use aerosurvey_core::rounding::round5;
use aerosurvey_nomenclature::{StandardScale, name_for};
use geo_types::{Polygon, polygon};
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod tessellate;

pub use tessellate::{
    GridLabel, GridView, LabelAnchor, LabelAxis, WindowBounds, labels, visible_cells,
};

/// Below this many pixels per cell a standard-scale grid is hidden (names no longer fit).
pub const STANDARD_GRID_HIDE_PX: f64 = 70.0;
/// Below this many pixels per cell a custom grid is hidden.
pub const CUSTOM_GRID_HIDE_PX: f64 = 15.0;
/// Below this many pixels per cell the per-cell overlays (height widgets) are hidden.
pub const OVERLAY_HIDE_PX: f64 = 200.0;

#[derive(Debug, Error, PartialEq)]
pub enum GridError {
    #[error("{axis} cell distance must be a positive number of degrees, got {value}")]
    InvalidDistance { axis: &'static str, value: f64 },
    #[error("custom scale has no natural sheet size")]
    NoSheetSize,
}

/// Immutable grid definition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridSpec {
    lat_distance: f64,
    lng_distance: f64,
    scale: StandardScale,
}

impl GridSpec {
    pub fn new(
        lat_distance: f64,
        lng_distance: f64,
        scale: StandardScale,
    ) -> Result<Self, GridError> {
        check_distance("latitude", lat_distance)?;
        check_distance("longitude", lng_distance)?;
        Ok(Self {
            lat_distance,
            lng_distance,
            scale,
        })
    }

    /// Grid whose cells are exactly one sheet of `scale`.
    pub fn for_standard_scale(scale: StandardScale) -> Result<Self, GridError> {
        let (lat, lng) = scale.sheet_size().ok_or(GridError::NoSheetSize)?;
        Self::new(lat, lng, scale)
    }

    pub fn lat_distance(&self) -> f64 {
        self.lat_distance
    }

    pub fn lng_distance(&self) -> f64 {
        self.lng_distance
    }

    pub fn scale(&self) -> StandardScale {
        self.scale
    }

    /// Key of the cell containing `point`. Cell borders belong to the cell north/east of them.
    pub fn cell_at(&self, point: LatLng) -> CellKey {
        CellKey {
            row: floor_index(point.lat, self.lat_distance),
            col: floor_index(point.lng, self.lng_distance),
        }
    }

    pub fn south_west(&self, key: CellKey) -> LatLng {
        LatLng::new(
            key.row as f64 * self.lat_distance,
            key.col as f64 * self.lng_distance,
        )
    }

    pub fn north_east(&self, key: CellKey) -> LatLng {
        LatLng::new(
            (key.row + 1) as f64 * self.lat_distance,
            (key.col + 1) as f64 * self.lng_distance,
        )
    }

    pub fn centre(&self, key: CellKey) -> LatLng {
        let sw = self.south_west(key);
        LatLng::new(
            sw.lat + self.lat_distance / 2.0,
            sw.lng + self.lng_distance / 2.0,
        )
    }

    /// Closed ring of the cell (SW, NW, NE, SE) in lon/lat coordinates.
    ///
    /// Adjacent cells compute their shared corners from the same integer, so
    /// they share them bit for bit and union without slivers.
    pub fn cell_polygon(&self, key: CellKey) -> Polygon<f64> {
        let sw = self.south_west(key);
        let ne = self.north_east(key);
        polygon![
            (x: sw.lng, y: sw.lat),
            (x: sw.lng, y: ne.lat),
            (x: ne.lng, y: ne.lat),
            (x: ne.lng, y: sw.lat),
            (x: sw.lng, y: sw.lat),
        ]
    }

    /// Sheet name of the cell, computed from its centre.
    pub fn cell_name(&self, key: CellKey) -> String {
        let centre = self.centre(key);
        name_for(centre.lat, centre.lng, self.scale)
    }

    pub fn cell(&self, key: CellKey) -> Cell {
        Cell {
            key,
            sw: self.south_west(key),
            ne: self.north_east(key),
            name: self.cell_name(key),
            is_selected: false,
        }
    }

    /// Pixel span of one cell below which the grid is not drawn.
    pub fn hide_threshold_px(&self) -> f64 {
        if self.scale.is_standard() {
            STANDARD_GRID_HIDE_PX
        } else {
            CUSTOM_GRID_HIDE_PX
        }
    }

    /// Whether the grid should be hidden when a cell spans `pixel_span` pixels on screen.
    pub fn should_hide_grid(&self, pixel_span: f64) -> bool {
        pixel_span < self.hide_threshold_px()
    }
}

/// Whether per-cell overlays should be hidden when a cell spans `pixel_span` pixels.
pub fn should_hide_overlays(pixel_span: f64) -> bool {
    pixel_span < OVERLAY_HIDE_PX
}

fn check_distance(axis: &'static str, value: f64) -> Result<(), GridError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GridError::InvalidDistance { axis, value })
    }
}

/// `floor(value / step)` after trimming float noise below the display precision,
/// so that 55.3 / 0.1 lands on 553 rather than 552.999….
pub(crate) fn floor_index(value: f64, step: f64) -> i64 {
    round5(value / step).floor() as i64
}

pub(crate) fn ceil_index(value: f64, step: f64) -> i64 {
    round5(value / step).ceil() as i64
}

/// Integer address of a cell: its SW corner is `(row·lat_distance, col·lng_distance)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellKey {
    pub row: i64,
    pub col: i64,
}

impl CellKey {
    pub const fn new(row: i64, col: i64) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}c{}", self.row, self.col)
    }
}

/// One generated grid cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    pub key: CellKey,
    pub sw: LatLng,
    pub ne: LatLng,
    pub name: String,
    pub is_selected: bool,
}

impl Cell {
    pub fn centre(&self) -> LatLng {
        LatLng::new(
            (self.sw.lat + self.ne.lat) / 2.0,
            (self.sw.lng + self.ne.lng) / 2.0,
        )
    }
}
