#![warn(clippy::all)]

use std::path::PathBuf;

use anyhow::Result;
use clap::{App, Arg};
use mhac_tools::{audit::audit_year, config::MhacConfig, init_logging, locator::parse_year};

struct Args {
    pub years: Vec<String>,
    pub config_file: Option<PathBuf>,
}

fn get_args() -> Args {
    let matches = App::new("audit-articulation")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Compares the articulation indices with the point cloud files on disk")
        .arg(
            Arg::with_name("YEAR")
                .long("year")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .value_name("YEAR")
                .help("Campaign year to audit, can be repeated. Audits all configured years if omitted"),
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

    for year in years {
        let report = audit_year(&config, year)?;
        let (files_not_in_index, index_not_on_disk) = report.write_to_dir(&config.audit_dir)?;
        println!("Audit {}", year);
        println!("\tTiles in index:           {}", report.index_tiles);
        println!("\tFiles on disk:            {}", report.files_on_disk);
        println!(
            "\tFiles without tile:       {}  ({})",
            report.files_not_in_index.len(),
            files_not_in_index.display()
        );
        println!(
            "\tTiles without file:       {}  ({})",
            report.index_not_on_disk.len(),
            index_not_on_disk.display()
        );
    }
    Ok(())
}
