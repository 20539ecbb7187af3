//! The set of grid cells chosen for survey.
//!
//! Each selected cell carries the terrain height range the operator entered
//! for it. The set keeps the union of all valid cell polygons up to date after
//! every mutation, which is what flight lines are later clipped against.

use std::collections::BTreeMap;
use std::fmt;

use aerosurvey_grid::{CellKey, GridSpec};
use geo::{BooleanOps, MultiPolygon, Polygon};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Terrain height assumed for a freshly selected cell (m).
pub const DEFAULT_HEIGHT_M: f64 = 1.0;
/// Elevation difference at or above which relief counts as variable.
pub const VARIABLE_RELIEF_THRESHOLD: f64 = 0.2;

#[derive(Debug, Error, PartialEq)]
pub enum SelectionError {
    #[error("min height {min} is greater than max height {max}")]
    InvalidHeightRange { min: f64, max: f64 },
    #[error("cell {0} is not selected")]
    NotSelected(CellKey),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Relief {
    Plain,
    Variable,
}

impl fmt::Display for Relief {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relief::Plain => f.write_str("Plain"),
            Relief::Variable => f.write_str("Variable"),
        }
    }
}

/// Height derived values of one cell for a given flight height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CellMetrics {
    pub mean_height: f64,
    pub absolute_height: f64,
    pub elevation_difference: f64,
    pub relief: Relief,
}

/// One selected cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CellEntry {
    pub polygon: Polygon<f64>,
    pub name: String,
    pub min_height: f64,
    pub max_height: f64,
}

impl CellEntry {
    pub fn is_valid(&self) -> bool {
        self.min_height <= self.max_height
    }

    pub fn check(&self) -> Result<(), SelectionError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(SelectionError::InvalidHeightRange {
                min: self.min_height,
                max: self.max_height,
            })
        }
    }

    pub fn metrics(&self, flight_height_m: f64) -> Result<CellMetrics, SelectionError> {
        self.check()?;
        let spread = self.max_height - self.min_height;
        let mean_height = (spread / 2.0).round();
        let elevation_difference = spread / flight_height_m;
        let relief = if elevation_difference >= VARIABLE_RELIEF_THRESHOLD {
            Relief::Variable
        } else {
            Relief::Plain
        };
        Ok(CellMetrics {
            mean_height,
            absolute_height: flight_height_m + mean_height,
            elevation_difference,
            relief,
        })
    }
}

/// Union of `b` into `a`; just `b` when there is nothing yet.
pub fn polygon_union(a: Option<MultiPolygon<f64>>, b: &Polygon<f64>) -> MultiPolygon<f64> {
    match a {
        Some(acc) => acc.union(b),
        None => MultiPolygon::new(vec![b.clone()]),
    }
}

/// Selected cells of one grid.
#[derive(Debug, Clone)]
pub struct SelectionSet {
    grid: GridSpec,
    entries: BTreeMap<CellKey, CellEntry>,
    union: Option<MultiPolygon<f64>>,
}

impl SelectionSet {
    pub fn new(grid: GridSpec) -> Self {
        Self {
            grid,
            entries: BTreeMap::new(),
            union: None,
        }
    }

    pub fn grid(&self) -> &GridSpec {
        &self.grid
    }

    /// Selects an unselected cell or deselects a selected one. Returns whether
    /// the cell is selected afterwards.
    pub fn toggle(&mut self, key: CellKey) -> bool {
        if self.entries.contains_key(&key) {
            self.deselect(key);
            false
        } else {
            self.select(key);
            true
        }
    }

    /// Returns `false` if the cell was already selected.
    pub fn select(&mut self, key: CellKey) -> bool {
        if self.entries.contains_key(&key) {
            return false;
        }
        let entry = CellEntry {
            polygon: self.grid.cell_polygon(key),
            name: self.grid.cell_name(key),
            min_height: DEFAULT_HEIGHT_M,
            max_height: DEFAULT_HEIGHT_M,
        };
        self.entries.insert(key, entry);
        self.rebuild_union();
        true
    }

    /// Returns `false` if the cell was not selected.
    pub fn deselect(&mut self, key: CellKey) -> bool {
        if self.entries.remove(&key).is_none() {
            return false;
        }
        self.rebuild_union();
        true
    }

    /// Stores the height range of a selected cell. An inverted range is kept,
    /// reported, and leaves the cell out of the union until corrected.
    pub fn set_heights(&mut self, key: CellKey, min: f64, max: f64) -> Result<(), SelectionError> {
        let entry = self
            .entries
            .get_mut(&key)
            .ok_or(SelectionError::NotSelected(key))?;
        entry.min_height = min;
        entry.max_height = max;
        let outcome = entry.check();
        self.rebuild_union();
        outcome
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.union = None;
    }

    pub fn contains(&self, key: CellKey) -> bool {
        self.entries.contains_key(&key)
    }

    pub fn get(&self, key: CellKey) -> Option<&CellEntry> {
        self.entries.get(&key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = CellKey> + '_ {
        self.entries.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CellKey, &CellEntry)> {
        self.entries.iter().map(|(key, entry)| (*key, entry))
    }

    /// Cells whose height range is inverted.
    pub fn invalid_cells(&self) -> impl Iterator<Item = CellKey> + '_ {
        self.iter()
            .filter(|(_, entry)| !entry.is_valid())
            .map(|(key, _)| key)
    }

    /// Union of every valid selected cell, `None` when there is nothing to cover.
    pub fn union(&self) -> Option<&MultiPolygon<f64>> {
        self.union.as_ref()
    }

    /// Selected area given the area of one cell (m²).
    pub fn selected_area_m2(&self, cell_area_m2: f64) -> f64 {
        self.entries.len() as f64 * cell_area_m2.round()
    }

    fn rebuild_union(&mut self) {
        let union = self
            .entries
            .values()
            .filter(|entry| entry.is_valid())
            .fold(None, |acc, entry| Some(polygon_union(acc, &entry.polygon)));
        debug!(
            cells = self.entries.len(),
            polygons = union.as_ref().map(|u| u.0.len()).unwrap_or(0),
            "selection union rebuilt"
        );
        self.union = union;
    }
}
