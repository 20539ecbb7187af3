//! Mission manifests for the aerial survey planner.

use std::path::{Path, PathBuf};

use aerosurvey_camera::CameraParams;
use aerosurvey_core::LatLng;
use aerosurvey_nomenclature::StandardScale;
use serde::Deserialize;
use thiserror::Error;

/// Survey mission as described in a manifest file.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct MissionManifest {
    pub name: String,
    pub grid: GridConfig,
    #[serde(default)]
    pub camera: CameraParams,
    /// Take-off and landing point; defaults to the centre of the listed cells.
    #[serde(default)]
    pub airport: Option<LatLng>,
    #[serde(default)]
    pub cells: Vec<CellConfig>,
}

/// Grid definition. Cell distances may be omitted for a standard scale, in
/// which case cells are exactly one sheet of that scale.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct GridConfig {
    #[serde(default)]
    pub lat_distance: Option<f64>,
    #[serde(default)]
    pub lng_distance: Option<f64>,
    #[serde(default = "custom_scale")]
    pub scale: StandardScale,
}

fn custom_scale() -> StandardScale {
    StandardScale::Custom
}

/// A selected cell, given by any point inside it.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct CellConfig {
    pub lat: f64,
    pub lng: f64,
    #[serde(default = "default_height")]
    pub min_height: f64,
    #[serde(default = "default_height")]
    pub max_height: f64,
}

fn default_height() -> f64 {
    1.0
}

impl MissionManifest {
    /// Airport from the manifest, else the middle of the cell points, else `(0, 0)`.
    pub fn airport_or_default(&self) -> LatLng {
        if let Some(airport) = self.airport {
            return airport;
        }
        let mut points = self.cells.iter().map(|c| LatLng::new(c.lat, c.lng));
        let Some(first) = points.next() else {
            return LatLng::new(0.0, 0.0);
        };
        let (south, west, north, east) = points.fold(
            (first.lat, first.lng, first.lat, first.lng),
            |(s, w, n, e), p| (s.min(p.lat), w.min(p.lng), n.max(p.lat), e.max(p.lng)),
        );
        LatLng::new((south + north) / 2.0, (west + east) / 2.0)
    }
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read manifest: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("no mission manifest found in {0}")]
    Empty(PathBuf),
    #[error("{path} holds {count} manifests, expected exactly one")]
    Ambiguous { path: PathBuf, count: usize },
}

/// Load every manifest from a YAML file (one mapping or a list), a TOML
/// file, or a directory of TOML files.
pub fn load_manifests<P: AsRef<Path>>(path: P) -> Result<Vec<MissionManifest>, ConfigError> {
    let path = path.as_ref();
    if path.is_dir() {
        return manifest_dir(path);
    }
    let contents = std::fs::read_to_string(path)?;
    match ManifestFormat::of(path) {
        ManifestFormat::Toml => Ok(vec![toml::from_str(&contents)?]),
        ManifestFormat::Yaml => match serde_yaml::from_str(&contents)? {
            OneOrMany::Many(manifests) => Ok(manifests),
            OneOrMany::One(manifest) => Ok(vec![*manifest]),
        },
    }
}

/// Load exactly one manifest.
pub fn load_manifest<P: AsRef<Path>>(path: P) -> Result<MissionManifest, ConfigError> {
    let path = path.as_ref();
    let mut manifests = load_manifests(path)?;
    match manifests.len() {
        0 => Err(ConfigError::Empty(path.to_path_buf())),
        1 => Ok(manifests.remove(0)),
        count => Err(ConfigError::Ambiguous {
            path: path.to_path_buf(),
            count,
        }),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ManifestFormat {
    Toml,
    Yaml,
}

impl ManifestFormat {
    /// TOML by extension, YAML for everything else.
    fn of(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => ManifestFormat::Toml,
            _ => ManifestFormat::Yaml,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<MissionManifest>),
    One(Box<MissionManifest>),
}

/// One manifest per `.toml` file, in file name order.
fn manifest_dir(dir: &Path) -> Result<Vec<MissionManifest>, ConfigError> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| ManifestFormat::of(path) == ManifestFormat::Toml)
        .collect();
    files.sort();
    files
        .iter()
        .map(|file| -> Result<MissionManifest, ConfigError> {
            let contents = std::fs::read_to_string(file)?;
            Ok(toml::from_str(&contents)?)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    const YAML: &str = r#"
name: "Survey block 7"
grid: { lat_distance: 0.1, lng_distance: 0.1 }
camera: { focal_length_mm: 50, flight_height_m: 2000 }
airport: { lat: 55.3, lng: 37.2 }
cells:
  - { lat: 55.25, lng: 37.35, min_height: 120, max_height: 180 }
  - { lat: 55.35, lng: 37.35 }
"#;

    const TOML: &str = r#"
name = "Sheet survey"

[grid]
scale = "1:100 000"

[[cells]]
lat = 55.75
lng = 37.62
"#;

    fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn yaml_manifest_fills_camera_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "mission.yaml", YAML);
        let manifest = load_manifest(&path).unwrap();
        assert_eq!(manifest.name, "Survey block 7");
        assert_eq!(manifest.grid.scale, StandardScale::Custom);
        assert_eq!(manifest.grid.lat_distance, Some(0.1));
        assert_eq!(manifest.camera.focal_length_mm, 50.0);
        assert_eq!(manifest.camera.width_px, 4096);
        assert_eq!(manifest.camera.overlap_between_images_pct, 50.0);
        assert_eq!(manifest.cells.len(), 2);
        assert_eq!(manifest.cells[1].min_height, 1.0);
        assert_eq!(manifest.airport_or_default(), LatLng::new(55.3, 37.2));
    }

    #[test]
    fn toml_manifest_with_standard_scale() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "sheet.toml", TOML);
        let manifest = load_manifest(&path).unwrap();
        assert_eq!(manifest.grid.scale, StandardScale::Scale100K);
        assert_eq!(manifest.grid.lat_distance, None);
        assert_eq!(manifest.camera, CameraParams::default());
        assert_eq!(manifest.airport_or_default(), LatLng::new(55.75, 37.62));
    }

    #[test]
    fn directory_of_toml_files_loads_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "b.toml", &TOML.replace("Sheet survey", "second"));
        write(dir.path(), "a.toml", &TOML.replace("Sheet survey", "first"));
        write(dir.path(), "notes.txt", "ignored");
        let names: Vec<String> = load_manifests(dir.path())
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, ["first", "second"]);
        assert!(matches!(
            load_manifest(dir.path()),
            Err(ConfigError::Ambiguous { count: 2, .. })
        ));
    }

    #[test]
    fn yaml_list_holds_several_manifests() {
        let dir = tempfile::tempdir().unwrap();
        let body = r#"
- name: first
  grid: { lat_distance: 0.2, lng_distance: 0.3 }
- name: second
  grid: { scale: "1:50 000" }
"#;
        let path = write(dir.path(), "missions.yml", body);
        let manifests = load_manifests(&path).unwrap();
        assert_eq!(manifests.len(), 2);
        assert_eq!(manifests[0].grid.lng_distance, Some(0.3));
        assert_eq!(manifests[1].grid.scale, StandardScale::Scale50K);
        assert!(matches!(
            load_manifest(&path),
            Err(ConfigError::Ambiguous { count: 2, .. })
        ));
    }

    #[test]
    fn unknown_scale_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "bad.yaml",
            "name: bad\ngrid: { scale: \"1:75 000\" }\n",
        );
        assert!(matches!(load_manifest(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn empty_directory_has_no_manifest() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(load_manifest(dir.path()), Err(ConfigError::Empty(_))));
    }
}
