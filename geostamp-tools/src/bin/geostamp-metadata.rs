use std::path::PathBuf;

use clap::Parser;

/// Prints the metadata of an image
#[derive(Parser, Debug)]
#[command(name = "geostamp-metadata", version)]
struct Cli {
    #[arg(value_name = "FILE")]
    path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    geostamp_tools::init_logging();

    let (data, mime_type) = geostamp_tools::read_image(&cli.path)?;
    let metadata = geostamp::try_read_metadata(&data, mime_type)?;

    print_option("GPS", metadata.gps.map(|x| x.geo_uri()));
    print_option("Description", metadata.description);
    print_option("Keywords", metadata.keywords);
    print_option("Date/Time", metadata.date_time);
    print_option("Camera Make", metadata.camera_make);
    print_option("Camera Model", metadata.camera_model);

    Ok(())
}

fn print_option(title: &str, value: Option<String>) {
    let v = value.unwrap_or_else(|| String::from("–"));

    println!("{title}:\t{v}");
}
