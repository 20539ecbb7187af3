use aerosurvey::nomenclature::{StandardScale, name_for};
use clap::Parser;

#[derive(Parser)]
#[command(author, version, about = "Print the map sheet containing a point")]
struct Cli {
    /// Latitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,

    /// Longitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    lng: f64,

    /// Map scale, e.g. "1:100 000"
    #[arg(long, default_value = "1:1 000 000")]
    scale: StandardScale,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    aerosurvey_cli::init_logging()?;
    println!("{}", name_for(cli.lat, cli.lng, cli.scale));
    Ok(())
}
