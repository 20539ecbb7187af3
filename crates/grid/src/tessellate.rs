//! Window queries: visible cells and their row/column labels.

use std::collections::BTreeSet;

use aerosurvey_core::LatLng;
use aerosurvey_core::rounding::round5;
use serde::{Deserialize, Serialize};

use crate::{Cell, CellKey, GridSpec, ceil_index, floor_index};

/// Rectangular lat/lng window, usually the visible part of the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl WindowBounds {
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self {
            south: south.min(north),
            west: west.min(east),
            north: south.max(north),
            east: west.max(east),
        }
    }

    /// Window spanned by two opposite corners in any order.
    pub fn from_corners(a: LatLng, b: LatLng) -> Self {
        Self::new(a.lat, a.lng, b.lat, b.lng)
    }

    pub fn centre(&self) -> LatLng {
        LatLng::new(
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }

    /// Row and column index ranges of the cells touching the window, snapped outward.
    fn index_ranges(&self, spec: &GridSpec) -> (std::ops::Range<i64>, std::ops::Range<i64>) {
        let (lat_d, lng_d) = (spec.lat_distance(), spec.lng_distance());
        let rows = floor_index(self.south, lat_d)..ceil_index(self.north, lat_d);
        let cols = floor_index(self.west, lng_d)..ceil_index(self.east, lng_d);
        (rows, cols)
    }
}

/// Cells covering `window`, rows south to north and columns west to east.
///
/// The iterator is lazy: only cells actually pulled are named.
pub fn visible_cells<'a>(
    window: &WindowBounds,
    spec: &'a GridSpec,
) -> impl Iterator<Item = Cell> + 'a {
    let (rows, cols) = window.index_ranges(spec);
    rows.flat_map(move |row| {
        cols.clone()
            .map(move |col| spec.cell(CellKey::new(row, col)))
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LabelAxis {
    /// Latitude of a row, drawn on the west edge.
    Row,
    /// Longitude of a column, drawn on the north edge.
    Column,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LabelAnchor {
    LeftCenter,
    TopCenter,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridLabel {
    pub axis: LabelAxis,
    pub position: LatLng,
    pub text: String,
    pub anchor: LabelAnchor,
}

/// Coordinate labels for `window`: one per row at the west edge, one per
/// column at the north edge.
pub fn labels(window: &WindowBounds, spec: &GridSpec) -> Vec<GridLabel> {
    let (rows, cols) = window.index_ranges(spec);
    let mut out = Vec::with_capacity(rows.clone().count() + cols.clone().count());
    for row in rows {
        let lat = round5(row as f64 * spec.lat_distance());
        out.push(GridLabel {
            axis: LabelAxis::Row,
            position: LatLng::new(lat, window.west),
            text: lat.to_string(),
            anchor: LabelAnchor::LeftCenter,
        });
    }
    for col in cols {
        let lng = round5(col as f64 * spec.lng_distance());
        out.push(GridLabel {
            axis: LabelAxis::Column,
            position: LatLng::new(window.north, lng),
            text: lng.to_string(),
            anchor: LabelAnchor::TopCenter,
        });
    }
    out
}

/// A window query that knows which keys are selected.
#[derive(Debug, Clone)]
pub struct GridView<'a> {
    spec: &'a GridSpec,
    window: WindowBounds,
    selected: BTreeSet<CellKey>,
}

impl<'a> GridView<'a> {
    pub fn new(spec: &'a GridSpec, window: WindowBounds) -> Self {
        Self {
            spec,
            window,
            selected: BTreeSet::new(),
        }
    }

    pub fn with_selected<I>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = CellKey>,
    {
        self.selected.extend(keys);
        self
    }

    pub fn window(&self) -> &WindowBounds {
        &self.window
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        visible_cells(&self.window, self.spec).map(|mut cell| {
            cell.is_selected = self.selected.contains(&cell.key);
            cell
        })
    }

    pub fn labels(&self) -> Vec<GridLabel> {
        labels(&self.window, self.spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aerosurvey_nomenclature::StandardScale;

    fn spec() -> GridSpec {
        GridSpec::new(0.1, 0.2, StandardScale::Custom).unwrap()
    }

    #[test]
    fn window_snaps_outward() {
        let window = WindowBounds::new(55.25, 37.1, 55.45, 37.5);
        let spec = spec();
        let cells: Vec<Cell> = visible_cells(&window, &spec).collect();
        // rows 552..555, cols 185..188
        assert_eq!(cells.len(), 3 * 3);
        assert_eq!(cells[0].key, CellKey::new(552, 185));
        assert_eq!(cells[1].key, CellKey::new(552, 186));
        assert_eq!(cells[3].key, CellKey::new(553, 185));
        assert!(cells[0].sw.lat <= window.south && cells[8].ne.lat >= window.north);
    }

    #[test]
    fn aligned_window_adds_no_extra_row() {
        let window = WindowBounds::new(55.0, 37.0, 55.3, 37.4);
        assert_eq!(visible_cells(&window, &spec()).count(), 3 * 2);
    }

    #[test]
    fn corners_can_be_given_in_any_order() {
        let a = WindowBounds::from_corners(LatLng::new(56.0, 38.0), LatLng::new(55.0, 37.0));
        assert_eq!(a, WindowBounds::new(55.0, 37.0, 56.0, 38.0));
    }

    #[test]
    fn one_label_per_row_and_column() {
        let window = WindowBounds::new(55.0, 37.0, 55.3, 37.4);
        let labels = labels(&window, &spec());
        let rows: Vec<&str> = labels
            .iter()
            .filter(|l| l.axis == LabelAxis::Row)
            .map(|l| l.text.as_str())
            .collect();
        let cols: Vec<&str> = labels
            .iter()
            .filter(|l| l.axis == LabelAxis::Column)
            .map(|l| l.text.as_str())
            .collect();
        assert_eq!(rows, ["55", "55.1", "55.2"]);
        assert_eq!(cols, ["37", "37.2"]);
        assert!(labels
            .iter()
            .filter(|l| l.axis == LabelAxis::Column)
            .all(|l| l.position.lat == window.north));
    }

    #[test]
    fn view_marks_selected_cells() {
        let spec = spec();
        let window = WindowBounds::new(55.0, 37.0, 55.2, 37.4);
        let view = GridView::new(&spec, window).with_selected([CellKey::new(551, 186)]);
        let selected: Vec<CellKey> =
            view.cells().filter(|c| c.is_selected).map(|c| c.key).collect();
        assert_eq!(selected, [CellKey::new(551, 186)]);
    }
}
