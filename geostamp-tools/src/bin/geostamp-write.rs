use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use geostamp::{Location, MetadataInfo};

/// Writes GPS position, description and keywords into an image
#[derive(Parser, Debug)]
#[command(name = "geostamp-write", version)]
struct Cli {
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Latitude in decimal degrees
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    lat: Option<f64>,

    /// Longitude in decimal degrees
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lon: Option<f64>,

    #[arg(long)]
    description: Option<String>,

    /// Comma separated keywords
    #[arg(long)]
    keywords: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    geostamp_tools::init_logging();

    let mut metadata = MetadataInfo::new();
    if let (Some(lat), Some(lon)) = (cli.lat, cli.lon) {
        metadata = metadata.with_gps(Location::new(lat, lon)?);
    }
    metadata.description = cli.description;
    metadata.keywords = cli.keywords;

    anyhow::ensure!(
        metadata.has_writable_fields(),
        "Nothing to write, use --lat/--lon, --description or --keywords"
    );

    let (data, mime_type) = geostamp_tools::read_image(&cli.input)?;
    let new_data = geostamp::write_metadata(data, &metadata, mime_type)
        .map_err(|err| anyhow::anyhow!("{err} ({})", err.err().kind()))?;

    std::fs::write(&cli.output, new_data)
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;

    tracing::info!("Wrote {}", cli.output.display());

    Ok(())
}
