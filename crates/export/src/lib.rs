//! Export helpers for GeoJSON, CSV and JSON artifacts.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write export: {0}")]
    Io(#[from] io::Error),
    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Buffered writer for an export target; `-` is stdout, anything else a
/// file whose parent directories are created on demand.
pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)?,
        _ => {}
    }
    Ok(Box::new(BufWriter::new(File::create(path)?)))
}

pub mod features {
    use std::io::Write;
    use std::path::Path;

    use geojson::FeatureCollection;
    use serde_json::to_writer_pretty;

    use super::{ExportError, writer_for_path};

    /// Write the collection as pretty-printed GeoJSON.
    pub fn write_geojson(path: &Path, collection: &FeatureCollection) -> Result<(), ExportError> {
        let mut writer = writer_for_path(path)?;
        to_writer_pretty(&mut writer, collection)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}

pub mod cells {
    use std::io::Write;

    use serde::Serialize;

    use super::ExportError;

    /// CSV row describing one selected cell.
    #[derive(Debug, Clone, Serialize)]
    pub struct CellRecord {
        pub name: String,
        pub south: f64,
        pub west: f64,
        pub north: f64,
        pub east: f64,
        pub min_height: f64,
        pub max_height: f64,
        pub mean_height: Option<f64>,
        pub absolute_height: Option<f64>,
        pub elevation_difference: Option<f64>,
        pub relief: Option<String>,
    }

    /// Write a header and one row per record.
    pub fn write_cells_csv<W: Write>(writer: W, records: &[CellRecord]) -> Result<(), ExportError> {
        let mut csv = csv::Writer::from_writer(writer);
        for record in records {
            csv.serialize(record)?;
        }
        if records.is_empty() {
            csv.write_record(HEADER)?;
        }
        csv.flush()?;
        Ok(())
    }

    const HEADER: [&str; 11] = [
        "name",
        "south",
        "west",
        "north",
        "east",
        "min_height",
        "max_height",
        "mean_height",
        "absolute_height",
        "elevation_difference",
        "relief",
    ];
}

pub mod summary {
    use std::io::Write;
    use std::path::Path;

    use chrono::{SecondsFormat, Utc};
    use serde::Serialize;
    use serde_json::to_writer_pretty;

    use super::{ExportError, writer_for_path};

    /// Scalar results of one flight path.
    #[derive(Debug, Clone, Serialize)]
    pub struct PathSummary {
        pub orientation: String,
        pub length_m: f64,
        pub flight_time_h: Option<f64>,
        pub paths_per_cell: u32,
        pub passes: usize,
    }

    /// Scalar results of a mission, written next to the GeoJSON export.
    #[derive(Debug, Clone, Serialize)]
    pub struct MissionSummary {
        pub mission: String,
        pub generated_at: String,
        pub scale: String,
        pub lat_distance_deg: f64,
        pub lng_distance_deg: f64,
        pub selected_cells: usize,
        pub selected_area_m2: f64,
        pub image_scale: String,
        pub gsi_m: f64,
        pub basis_along_m: f64,
        pub basis_across_m: f64,
        pub paths: Vec<PathSummary>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        pub warnings: Vec<String>,
    }

    /// Current UTC time in RFC 3339, second precision.
    pub fn timestamp() -> String {
        Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    pub fn write_summary_json(path: &Path, summary: &MissionSummary) -> Result<(), ExportError> {
        let mut writer = writer_for_path(path)?;
        to_writer_pretty(&mut writer, summary)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::cells::{CellRecord, write_cells_csv};
    use super::features::write_geojson;
    use super::summary::{MissionSummary, timestamp, write_summary_json};

    fn record(name: &str) -> CellRecord {
        CellRecord {
            name: name.to_string(),
            south: 55.0,
            west: 37.0,
            north: 55.1,
            east: 37.1,
            min_height: 1.0,
            max_height: 1.0,
            mean_height: Some(0.0),
            absolute_height: Some(1000.0),
            elevation_difference: Some(0.0),
            relief: Some("Plain".to_string()),
        }
    }

    #[test]
    fn csv_has_header_and_rows() {
        let mut out = Vec::new();
        write_cells_csv(&mut out, &[record("a"), record("b")]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("name,south,west,north,east"));
        assert!(lines[1].starts_with("a,55.0,37.0"));
    }

    #[test]
    fn empty_csv_still_has_header() {
        let mut out = Vec::new();
        write_cells_csv(&mut out, &[]).unwrap();
        assert!(String::from_utf8(out).unwrap().starts_with("name,"));
    }

    #[test]
    fn geojson_and_summary_create_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let geo = dir.path().join("out/nested/mission.geojson");
        let collection = geojson::FeatureCollection {
            bbox: None,
            features: Vec::new(),
            foreign_members: None,
        };
        write_geojson(&geo, &collection).unwrap();
        let text = std::fs::read_to_string(&geo).unwrap();
        assert!(text.contains("FeatureCollection"));

        let json = dir.path().join("out/summary.json");
        let summary = MissionSummary {
            mission: "m".into(),
            generated_at: timestamp(),
            scale: "Custom".into(),
            lat_distance_deg: 0.1,
            lng_distance_deg: 0.1,
            selected_cells: 0,
            selected_area_m2: 0.0,
            image_scale: "1:10 000".into(),
            gsi_m: 0.01,
            basis_along_m: 16.384,
            basis_across_m: 20.48,
            paths: Vec::new(),
            warnings: Vec::new(),
        };
        write_summary_json(&json, &summary).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&json).unwrap()).unwrap();
        assert_eq!(value["mission"], "m");
        assert!(value.get("warnings").is_none());
        assert!(value["generated_at"].as_str().unwrap().ends_with('Z'));
    }
}
