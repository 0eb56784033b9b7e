use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use geostamp::registry::{get_format_support, Format};
use geostamp_exif::internal::ExifRaw;

/// Prints all decoded Exif entries of an image
#[derive(Parser, Debug)]
#[command(name = "geostamp-exif-dump", version)]
struct Cli {
    #[arg(value_name = "FILE")]
    path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    geostamp_tools::init_logging();

    let (data, mime_type) = geostamp_tools::read_image(&cli.path)?;

    let exif = match get_format_support(mime_type).format {
        Some(Format::Jpeg) => geostamp_jpeg::Jpeg::new(&data)?.exif_data().next(),
        Some(Format::Tiff) => Some(geostamp_tiff::Tiff::new(&data)?.exif()),
        Some(Format::Heif) => geostamp_heif::Heif::new(&data)?.exif()?,
        Some(Format::WebP) => geostamp_webp::WebP::new(&data)?.exif(),
        Some(Format::Png) => geostamp_png::Png::new(&data)?.exif(),
        None => anyhow::bail!("Unsupported format {mime_type}"),
    }
    .context("No Exif data found")?;

    let mut decoder = ExifRaw::new(exif);
    decoder.decode()?;

    println!("{}", decoder.debug_dump());

    Ok(())
}
