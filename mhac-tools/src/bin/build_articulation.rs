#![warn(clippy::all)]

use std::path::PathBuf;

use anyhow::Result;
use clap::{App, Arg};
use mhac_tools::{
    articulation_builder::build_articulation, config::MhacConfig, init_logging,
    locator::parse_year,
};

struct Args {
    pub year: String,
    pub output: Option<PathBuf>,
    pub config_file: Option<PathBuf>,
}

fn get_args() -> Args {
    let matches = App::new("build-articulation")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Builds an articulation index from the header bounds of the point cloud files of a campaign")
        .arg(
            Arg::with_name("YEAR")
                .long("year")
                .takes_value(true)
                .value_name("YEAR")
                .default_value("2024")
                .help("Survey campaign year"),
        )
        .arg(
            Arg::with_name("OUTPUT")
                .short("o")
                .long("output")
                .takes_value(true)
                .value_name("FILE")
                .help("GeoJSON output file. Defaults to articulacao_<YEAR>_from_laz.geojson in the LiDAR base directory"),
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
        output: matches.value_of("OUTPUT").map(PathBuf::from),
        config_file: matches.value_of("CONFIG").map(PathBuf::from),
    }
}

fn main() -> Result<()> {
    init_logging();
    let args = get_args();
    let config = MhacConfig::load(args.config_file.as_deref())?;
    let year = config.year(parse_year(&args.year, &config)?)?;

    let index = build_articulation(config.raw_dir(year), year)?;
    let output = args.output.unwrap_or_else(|| {
        config
            .lidar_base_dir
            .join(format!("articulacao_{}_from_laz.geojson", year.year))
    });
    index.write_to_path(&output)?;
    log::info!("{} tiles written to {}", index.len(), output.display());
    Ok(())
}
