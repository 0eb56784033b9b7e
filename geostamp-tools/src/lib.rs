//! Helpers shared by the command line tools

use std::path::Path;

use anyhow::Context;
use tracing_subscriber::prelude::*;

/// Installs the log output, filtered by `RUST_LOG`
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::builder().from_env_lossy())
        .with(tracing_subscriber::fmt::Layer::default().compact())
        .init();
}

/// Guesses the MIME type from the file extension
pub fn mime_type_for_path(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();

    let mime_type = match extension.as_str() {
        "jpg" | "jpeg" | "jpe" => "image/jpeg",
        "tif" | "tiff" => "image/tiff",
        "webp" => "image/webp",
        "png" => "image/png",
        "heic" => "image/heic",
        "heif" => "image/heif",
        _ => return None,
    };

    Some(mime_type)
}

/// Reads a file and determines its MIME type
pub fn read_image(path: &Path) -> anyhow::Result<(Vec<u8>, &'static str)> {
    let mime_type = mime_type_for_path(path)
        .with_context(|| format!("Unknown file extension: {}", path.display()))?;
    let data = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;

    Ok((data, mime_type))
}
