#![warn(clippy::all)]

use std::path::PathBuf;

use anyhow::Result;
use clap::{App, Arg};
use mhac_tools::{
    config::MhacConfig,
    init_logging,
    locator::{parse_year, validate_tile_id},
    pipeline::{run, TileOutcome},
};

struct Args {
    pub year: String,
    pub tile_id: Option<String>,
    pub overwrite: bool,
    pub config_file: Option<PathBuf>,
}

fn get_args() -> Args {
    let matches = App::new("build-mhac-tiles")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Builds the MDS and HAG rasters of LiDAR tiles")
        .arg(
            Arg::with_name("YEAR")
                .long("year")
                .takes_value(true)
                .value_name("YEAR")
                .help("Survey campaign year (2017, 2020 or 2024 by default)")
                .required(true),
        )
        .arg(
            Arg::with_name("TILE_ID")
                .long("tile-id")
                .takes_value(true)
                .value_name("TILE_ID")
                .help("Tile to process. All tiles of the articulation index are processed if omitted"),
        )
        .arg(
            Arg::with_name("OVERWRITE")
                .long("overwrite")
                .help("Replace existing output rasters"),
        )
        .arg(
            Arg::with_name("CONFIG")
                .long("config")
                .takes_value(true)
                .value_name("FILE")
                .help("TOML configuration file"),
        )
        .get_matches();

    Args {
        year: matches.value_of("YEAR").unwrap_or_default().to_owned(),
        tile_id: matches.value_of("TILE_ID").map(str::to_owned),
        overwrite: matches.is_present("OVERWRITE"),
        config_file: matches.value_of("CONFIG").map(PathBuf::from),
    }
}

fn main() -> Result<()> {
    init_logging();
    let args = get_args();
    let config = MhacConfig::load(args.config_file.as_deref())?;

    let year = parse_year(&args.year, &config)?;
    let tile_id = args.tile_id.as_deref().map(validate_tile_id).transpose()?;

    let reports = run(&config, year, tile_id, args.overwrite)?;
    let skipped = reports
        .iter()
        .filter(|r| r.outcome == TileOutcome::Skipped)
        .count();
    log::info!(
        "{} tiles processed, {} skipped",
        reports.len() - skipped,
        skipped
    );
    Ok(())
}
