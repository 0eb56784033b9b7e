use std::path::PathBuf;

use clap::Parser;
use geostamp::registry::{get_format_support, Format};

/// Lists the chunks, segments or boxes of an image
#[derive(Parser, Debug)]
#[command(name = "geostamp-structure", version)]
struct Cli {
    #[arg(value_name = "FILE")]
    path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    geostamp_tools::init_logging();

    let (data, mime_type) = geostamp_tools::read_image(&cli.path)?;

    match get_format_support(mime_type).format {
        Some(Format::Png) => show_png(&geostamp_png::Png::new(&data)?),
        Some(Format::WebP) => show_webp(&geostamp_webp::WebP::new(&data)?),
        Some(Format::Jpeg) => show_jpeg(&geostamp_jpeg::Jpeg::new(&data)?),
        Some(Format::Heif) => show_heif(&geostamp_heif::Heif::new(&data)?)?,
        Some(Format::Tiff) => {
            let tiff = geostamp_tiff::Tiff::new(&data)?;
            println!("TIFF: {} bytes of tag data", tiff.exif().len());
        }
        None => anyhow::bail!("Unsupported format {mime_type}"),
    }

    Ok(())
}

fn show_png(png: &geostamp_png::Png) {
    fn show_repeats(n: &mut u32, chunk_type: geostamp_png::ChunkType) {
        if *n > 1 {
            println!(" - {chunk_type:?} ({n}x)");
            *n = 1;
        } else {
            println!(" - {chunk_type:?}");
        }
    }

    println!("PNG Chunks:");
    let mut chunks = png.chunks().iter();
    let Some(first) = chunks.next() else {
        return;
    };

    let mut n_repeats = 1;
    let mut last_type = first.chunk_type();
    for chunk in chunks {
        if chunk.chunk_type() != last_type {
            show_repeats(&mut n_repeats, last_type);
            last_type = chunk.chunk_type();
        } else {
            n_repeats = n_repeats.saturating_add(1);
        }
    }
    show_repeats(&mut n_repeats, last_type);

    for chunk in png.chunks().iter().filter(|x| !x.crc_is_valid()) {
        println!("Invalid CRC: {:?}", chunk.chunk_type());
    }

    if !png.trailing().is_empty() {
        println!("{} bytes after IEND", png.trailing().len());
    }
}

fn show_webp(webp: &geostamp_webp::WebP) {
    println!("WebP Chunks:");
    for chunk in webp.chunks() {
        println!(
            " - {:?} at {} ({} bytes)",
            chunk.four_cc(),
            chunk.pos(),
            chunk.payload().len()
        );
    }

    if let Ok((width, height)) = webp.canvas_size() {
        println!("Canvas: {width}x{height}");
    }
}

fn show_jpeg(jpeg: &geostamp_jpeg::Jpeg) {
    println!("JPEG Segments:");
    for segment in jpeg.segments() {
        let exif = if segment.is_exif() { " (Exif)" } else { "" };
        println!(" - {:?} at {}{exif}", segment.marker(), segment.pos());
    }
}

fn show_heif(heif: &geostamp_heif::Heif) -> anyhow::Result<()> {
    match heif.exif()? {
        Some(exif) => println!("HEIF: Exif item with {} bytes", exif.len()),
        None => println!("HEIF: no Exif item"),
    }

    Ok(())
}
