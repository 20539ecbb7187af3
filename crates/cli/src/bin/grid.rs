use std::io;

use aerosurvey::core::rounding::round5;
use aerosurvey::grid::{GridSpec, WindowBounds, visible_cells};
use aerosurvey::nomenclature::StandardScale;
use anyhow::bail;
use clap::Parser;
use tracing::info;

/// Refuse windows that would print more rows than this.
const MAX_CELLS: usize = 100_000;

#[derive(Parser)]
#[command(author, version, about = "List the grid cells intersecting a window as CSV")]
struct Cli {
    #[arg(long, allow_hyphen_values = true)]
    south: f64,

    #[arg(long, allow_hyphen_values = true)]
    west: f64,

    #[arg(long, allow_hyphen_values = true)]
    north: f64,

    #[arg(long, allow_hyphen_values = true)]
    east: f64,

    /// Cell height in degrees (defaults to the sheet size of --scale)
    #[arg(long)]
    lat_distance: Option<f64>,

    /// Cell width in degrees (defaults to the sheet size of --scale)
    #[arg(long)]
    lng_distance: Option<f64>,

    /// Map scale used to name the cells
    #[arg(long, default_value = "Custom")]
    scale: StandardScale,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    aerosurvey_cli::init_logging()?;

    let grid = aerosurvey::manifest::grid_from_config(&aerosurvey::config::GridConfig {
        lat_distance: cli.lat_distance,
        lng_distance: cli.lng_distance,
        scale: cli.scale,
    })?;
    let window = WindowBounds::new(cli.south, cli.west, cli.north, cli.east);
    let expected = estimated_cells(&window, &grid);
    if expected > MAX_CELLS {
        bail!("window covers about {expected} cells, narrow it or use larger cells");
    }

    let mut writer = csv::Writer::from_writer(io::stdout().lock());
    writer.write_record(["row", "col", "name", "south", "west", "north", "east"])?;
    let mut count = 0usize;
    for cell in visible_cells(&window, &grid) {
        writer.write_record([
            cell.key.row.to_string(),
            cell.key.col.to_string(),
            cell.name.clone(),
            round5(cell.sw.lat).to_string(),
            round5(cell.sw.lng).to_string(),
            round5(cell.ne.lat).to_string(),
            round5(cell.ne.lng).to_string(),
        ])?;
        count += 1;
    }
    writer.flush()?;
    info!(cells = count, "grid listed");
    Ok(())
}

fn estimated_cells(window: &WindowBounds, grid: &GridSpec) -> usize {
    let rows = ((window.north - window.south) / grid.lat_distance()).ceil() + 1.0;
    let cols = ((window.east - window.west) / grid.lng_distance()).ceil() + 1.0;
    (rows * cols) as usize
}
