#![warn(clippy::all)]

use std::path::PathBuf;

use anyhow::Result;
use clap::{App, Arg};
use mhac_tools::{
    config::MhacConfig,
    init_logging,
    jobs::{generate_jobs, write_jobs},
    locator::parse_year,
};

struct Args {
    pub years: Vec<String>,
    pub output: PathBuf,
    pub config_file: Option<PathBuf>,
}

fn get_args() -> Args {
    let matches = App::new("generate-jobs")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Writes one build-mhac-tiles command per tile that has not been processed yet")
        .arg(
            Arg::with_name("YEAR")
                .long("year")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .value_name("YEAR")
                .help("Campaign year to scan, can be repeated. Scans all configured years if omitted"),
        )
        .arg(
            Arg::with_name("OUTPUT")
                .short("o")
                .long("output")
                .takes_value(true)
                .value_name("FILE")
                .default_value("jobs.txt")
                .help("Job list file"),
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
        years: matches
            .values_of("YEAR")
            .map(|values| values.map(str::to_owned).collect())
            .unwrap_or_default(),
        output: PathBuf::from(matches.value_of("OUTPUT").unwrap_or("jobs.txt")),
        config_file: matches.value_of("CONFIG").map(PathBuf::from),
    }
}

fn main() -> Result<()> {
    init_logging();
    let args = get_args();
    let config = MhacConfig::load(args.config_file.as_deref())?;
    let years = if args.years.is_empty() {
        config.years()
    } else {
        args.years
            .iter()
            .map(|year| parse_year(year, &config))
            .collect::<Result<Vec<_>, _>>()?
    };

    let jobs = generate_jobs(&config, &years)?;
    write_jobs(&args.output, &jobs)?;
    log::info!("{} jobs written to {}", jobs.len(), args.output.display());
    Ok(())
}
