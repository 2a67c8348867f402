#![warn(clippy::all)]

use std::{path::PathBuf, time::Instant};

use anyhow::{anyhow, Result};
use clap::{App, Arg};
use mhac_algorithms::minmax::{classification_histogram, minmax_dimension};
use mhac_core::{
    classification::classification_name,
    containers::{Dimension, PointCloud},
    math::MinMax,
};
use mhac_io::las::LasTileReader;
use mhac_tools::init_logging;

struct Args {
    pub input_file: PathBuf,
    pub detailed: bool,
}

fn get_args() -> Result<Args> {
    let matches = App::new("tile-info")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Prints information about the given LAS/LAZ tile")
        .arg(
            Arg::with_name("INPUT")
                .short("i")
                .takes_value(true)
                .value_name("INPUT")
                .help("Input point cloud file")
                .required(true),
        )
        .arg(
            Arg::with_name("DETAILED")
                .short("d")
                .long("detailed")
                .help("Also show the minimum and maximum elevation of the points"),
        )
        .get_matches();

    let input_file = matches
        .value_of("INPUT")
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("Missing input file"))?;
    let detailed = matches.is_present("DETAILED");

    Ok(Args {
        input_file,
        detailed,
    })
}

fn analyze_file(reader: &mut LasTileReader, detailed: bool) -> Result<()> {
    let total_points = reader.remaining_points();
    if total_points == 0 {
        return Ok(());
    }

    let t_start = Instant::now();
    println!("Analyzing point classifications...");

    let chunk_size = 1_000_000;
    let mut histogram = [0usize; 256];
    let mut minmax_z: Option<(f64, f64)> = None;
    loop {
        let mut chunk = PointCloud::with_capacity(chunk_size);
        if reader.read_into(&mut chunk, chunk_size)? == 0 {
            break;
        }
        for (total, chunk_count) in histogram.iter_mut().zip(classification_histogram(&chunk)) {
            *total += chunk_count;
        }
        if detailed {
            if let Some((chunk_min, chunk_max)) = minmax_dimension(&chunk, Dimension::Z) {
                minmax_z = Some(match minmax_z {
                    None => (chunk_min, chunk_max),
                    Some((old_min, old_max)) => {
                        (old_min.infimum(&chunk_min), old_max.supremum(&chunk_max))
                    }
                });
            }
        }
    }

    println!("Classifications");
    for (code, count) in histogram.iter().enumerate().filter(|(_, count)| **count > 0) {
        println!(
            "\t{:>3} {:<24} {:>12}  ({:.2}%)",
            code,
            classification_name(code as u8),
            count,
            100.0 * *count as f64 / total_points as f64
        );
    }
    if let Some((min, max)) = minmax_z {
        println!("\tZ:                      {}  {}", min, max);
    }

    println!("Took {:.2}s", t_start.elapsed().as_secs_f64());
    Ok(())
}

fn main() -> Result<()> {
    init_logging();
    let args = get_args()?;
    let mut reader = LasTileReader::from_path(&args.input_file)?;
    println!("Tile info report for {}", args.input_file.display());
    println!("{}", reader.metadata());

    analyze_file(&mut reader, args.detailed)
}
