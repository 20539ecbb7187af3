use std::path::PathBuf;

use aerosurvey::config::load_manifest;
use aerosurvey::export::cells::write_cells_csv;
use aerosurvey::export::features::write_geojson;
use aerosurvey::export::summary::write_summary_json;
use aerosurvey::export::writer_for_path;
use aerosurvey::manifest::build_mission;
use aerosurvey::mission::Mission;
use aerosurvey::report;
use clap::Parser;
use tracing::{info, warn};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Plan parallel and meridian survey routes over the cells of a mission manifest"
)]
struct Cli {
    /// Mission manifest (YAML or TOML)
    #[arg(long)]
    config: PathBuf,

    /// GeoJSON output for cells, airport and flight paths ("-" for stdout)
    #[arg(long)]
    output: Option<PathBuf>,

    /// CSV listing of the selected cells ("-" for stdout)
    #[arg(long)]
    cells_csv: Option<PathBuf>,

    /// JSON file with the scalar results
    #[arg(long)]
    summary: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    aerosurvey_cli::init_logging()?;

    let manifest = load_manifest(&cli.config)?;
    let mission = build_mission(&manifest)?;
    print_summary(&mission);

    if let Some(path) = &cli.output {
        let export = mission.to_feature_collection();
        if let Some(warning) = export.warning {
            warn!("{warning}");
        }
        write_geojson(path, &export.collection)?;
        info!(
            path = %path.display(),
            features = export.collection.features.len(),
            "GeoJSON written"
        );
    }
    if let Some(path) = &cli.cells_csv {
        let writer = writer_for_path(path)?;
        write_cells_csv(writer, &report::cell_records(&mission))?;
        info!(path = %path.display(), "cell listing written");
    }
    if let Some(path) = &cli.summary {
        write_summary_json(path, &report::summary(&mission))?;
        info!(path = %path.display(), "summary written");
    }
    Ok(())
}

fn print_summary(mission: &Mission) {
    let summary = report::summary(mission);
    println!("=== Survey Mission: {} ===", summary.mission);
    println!(
        "Grid            : {} ({}° x {}°)",
        summary.scale, summary.lat_distance_deg, summary.lng_distance_deg
    );
    println!(
        "Selection       : {} cells, {} m²",
        summary.selected_cells, summary.selected_area_m2
    );
    println!(
        "Camera          : image scale {}, GSI = {:.3} m, By = {:.1} m, Bx = {:.1} m",
        summary.image_scale, summary.gsi_m, summary.basis_along_m, summary.basis_across_m
    );
    for path in &summary.paths {
        let time = path
            .flight_time_h
            .map(|h| format!("{h:.2} h"))
            .unwrap_or_else(|| "n/a".to_string());
        println!(
            "By {:<13}: {:.0} m, {} lines per cell, {} passes, flight time {}",
            path.orientation, path.length_m, path.paths_per_cell, path.passes, time
        );
    }
    if summary.paths.is_empty() {
        println!("No flight paths");
    }
    for warning in &summary.warnings {
        println!("Warning         : {warning}");
    }
}
