//! GeoJSON view of a mission.
//!
//! Properties are attached to each feature individually, so merging the
//! collection elsewhere never strips them.

use aerosurvey_core::rounding::round5;
use aerosurvey_paths::FlightPath;
use aerosurvey_selection::CellEntry;
use geo::{LineString, Point};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value};
use tracing::warn;

use crate::{Mission, MissionWarning};

pub const CELL_FEATURE_NAME: &str = "Selected cell";
pub const AIRPORT_FEATURE_NAME: &str = "Airport";
pub const PARALLELS_FEATURE_NAME: &str = "Flight paths by parallels";
pub const MERIDIANS_FEATURE_NAME: &str = "Flight paths by meridians";

/// Feature collection plus the reason it is partial, if it is.
#[derive(Debug, Clone)]
pub struct Export {
    pub collection: FeatureCollection,
    pub warning: Option<MissionWarning>,
}

impl Mission {
    /// One feature per selected cell, one for the airport and one per flight path.
    pub fn to_feature_collection(&self) -> Export {
        let mut features: Vec<Feature> = self
            .selection()
            .iter()
            .map(|(_, entry)| self.cell_feature(entry))
            .collect();
        features.push(feature(
            Value::from(&Point::from(self.airport())),
            properties([("name", JsonValue::from(AIRPORT_FEATURE_NAME))]),
        ));

        let warning = match self.plan() {
            Some(plan) => {
                features.push(self.path_feature(PARALLELS_FEATURE_NAME, &plan.parallels));
                features.push(self.path_feature(MERIDIANS_FEATURE_NAME, &plan.meridians));
                None
            }
            None => {
                warn!(mission = %self.name(), "exporting without flight paths");
                Some(MissionWarning::NoPathsComputedYet)
            }
        };

        Export {
            collection: FeatureCollection {
                bbox: None,
                features,
                foreign_members: None,
            },
            warning,
        }
    }

    fn cell_feature(&self, entry: &CellEntry) -> Feature {
        let mut props = properties([
            ("name", JsonValue::from(CELL_FEATURE_NAME)),
            ("polygonName", JsonValue::from(entry.name.as_str())),
            ("minHeight", number(entry.min_height)),
            ("maxHeight", number(entry.max_height)),
        ]);
        match entry.metrics(self.camera().flight_height_m) {
            Ok(metrics) => {
                props.insert("meanHeight".into(), number(metrics.mean_height));
                props.insert("absoluteHeight".into(), number(metrics.absolute_height));
                props.insert("reliefType".into(), JsonValue::from(metrics.relief.to_string()));
                props.insert(
                    "elevationDifference".into(),
                    number(metrics.elevation_difference),
                );
            }
            Err(err) => {
                props.insert("error".into(), JsonValue::from(err.to_string()));
            }
        }
        feature(Value::from(&entry.polygon), props)
    }

    fn path_feature(&self, name: &str, path: &FlightPath) -> Feature {
        let camera = self.camera();
        let g = self.geometry();
        let coverage = self.coverage();
        let line: LineString<f64> = path.vertices.iter().map(|p| (p.lng, p.lat)).collect();
        let props = properties([
            ("name", JsonValue::from(name)),
            ("cameraWidth", JsonValue::from(camera.width_px)),
            ("cameraHeight", JsonValue::from(camera.height_px)),
            ("pixelWidth", number(camera.pixel_size_um)),
            ("focalLength", number(camera.focal_length_mm)),
            ("flightHeight", number(camera.flight_height_m)),
            ("overlapBetweenPaths", number(camera.overlap_between_paths_pct)),
            ("overlapBetweenImages", number(camera.overlap_between_images_pct)),
            ("aircraftSpeed", number(camera.speed_kmh)),
            ("m", number(g.scale)),
            ("imageScale", JsonValue::from(g.image_scale.as_str())),
            ("ly", number(g.image_width_m)),
            ("Ly", number(g.footprint_along_m)),
            ("By", number(g.basis_along_m)),
            ("lx", number(g.image_height_m)),
            ("Lx", number(g.footprint_across_m)),
            ("Bx", number(g.basis_across_m)),
            ("GSI", number(g.gsi_m)),
            ("IFOV", number(g.ifov_urad)),
            ("GIFOV", number(g.gifov_m)),
            ("FOV", number(g.fov)),
            ("GFOV", number(g.gfov_m)),
            ("latCellSizeInMeters", number(coverage.lat_cell_m)),
            ("lngCellSizeInMeters", number(coverage.lng_cell_m)),
            ("selectedArea", number(self.selected_area_m2())),
            ("pathLength", number(path.length_m)),
            ("flightTime", path.flight_time_h.map(JsonValue::from).unwrap_or(JsonValue::Null)),
            ("pathsCount", JsonValue::from(path.paths_per_cell)),
        ]);
        feature(Value::from(&line), props)
    }
}

fn number(value: f64) -> JsonValue {
    JsonValue::from(round5(value))
}

fn properties<const N: usize>(pairs: [(&str, JsonValue); N]) -> JsonObject {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

fn feature(value: Value, properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aerosurvey_camera::CameraParams;
    use aerosurvey_core::LatLng;
    use aerosurvey_grid::{CellKey, GridSpec};
    use aerosurvey_nomenclature::StandardScale;

    fn mission() -> Mission {
        let grid = GridSpec::for_standard_scale(StandardScale::Scale100K).unwrap();
        // m = 300 000, 13 lines per cell by parallels and 9 by meridians
        let camera = CameraParams {
            pixel_size_um: 10.0,
            flight_height_m: 15_000.0,
            focal_length_mm: 50.0,
            ..CameraParams::default()
        };
        Mission::new("export", grid, camera, LatLng::new(55.5, 37.0)).unwrap()
    }

    fn name_of(f: &Feature) -> Option<&str> {
        f.property("name").and_then(JsonValue::as_str)
    }

    #[test]
    fn partial_export_without_paths() {
        let mut m = mission();
        m.selection.select(CellKey::new(167, 75));
        let export = m.to_feature_collection();
        assert_eq!(export.warning, Some(MissionWarning::NoPathsComputedYet));
        let names: Vec<_> = export.collection.features.iter().filter_map(name_of).collect();
        assert_eq!(names, [CELL_FEATURE_NAME, AIRPORT_FEATURE_NAME]);
    }

    #[test]
    fn full_export_carries_per_feature_properties() {
        let mut m = mission();
        let key = m.grid().cell_at(LatLng::new(55.75, 37.62));
        m.select_cell(key);
        m.set_cell_heights(key, 100.0, 300.0).unwrap();
        let export = m.to_feature_collection();
        assert!(export.warning.is_none());

        let features = &export.collection.features;
        assert_eq!(features.len(), 4);
        let cell = &features[0];
        assert_eq!(
            cell.property("polygonName").and_then(JsonValue::as_str),
            Some("N-37-4")
        );
        assert_eq!(cell.property("meanHeight").and_then(JsonValue::as_f64), Some(100.0));
        assert_eq!(cell.property("reliefType").and_then(JsonValue::as_str), Some("Plain"));

        let parallels = &features[2];
        assert_eq!(name_of(parallels), Some(PARALLELS_FEATURE_NAME));
        assert_eq!(parallels.property("m").and_then(JsonValue::as_f64), Some(300_000.0));
        assert!(parallels.property("pathLength").and_then(JsonValue::as_f64).unwrap() > 0.0);
        assert_eq!(name_of(&features[3]), Some(MERIDIANS_FEATURE_NAME));
    }

    #[test]
    fn invalid_cells_report_their_error() {
        let mut m = mission();
        let key = CellKey::new(167, 75);
        m.select_cell(key);
        let _ = m.set_cell_heights(key, 10.0, 5.0);
        let export = m.to_feature_collection();
        let cell = &export.collection.features[0];
        assert!(cell.property("error").is_some());
        assert!(cell.property("meanHeight").is_none());
    }
}
