use std::path::Path;

use anyhow::{Context, Result};

use crate::{
    config::MhacConfig,
    locator::{validate_tile_id, TileLocator},
    output::OutputPaths,
};

/// Command line that builds the rasters of one tile
pub fn job_command(year: u16, tile_id: &str) -> String {
    format!("build-mhac-tiles --year {} --tile-id {}", year, tile_id)
}

/// Tiles of `year` whose MDS and HAG rasters do not both exist yet, in index order. Index ids that
/// `build-mhac-tiles` would reject are left out with a warning
pub fn pending_tiles(config: &MhacConfig, year: u16) -> Result<Vec<String>> {
    let locator = TileLocator::open(config, year)?;
    Ok(locator
        .index()
        .tile_ids()
        .into_iter()
        .filter(|tile_id| match validate_tile_id(tile_id) {
            Ok(_) => true,
            Err(e) => {
                log::warn!("No job for tile of {}: {}", year, e);
                false
            }
        })
        .filter(|tile_id| !OutputPaths::for_tile(&config.output_base_dir, year, tile_id).all_exist())
        .map(str::to_owned)
        .collect())
}

/// One [job_command] per pending tile of each of the given years
pub fn generate_jobs(config: &MhacConfig, years: &[u16]) -> Result<Vec<String>> {
    let mut jobs = vec![];
    for &year in years {
        log::info!("[scan] {}", year);
        let pending = pending_tiles(config, year)?;
        log::debug!("{} pending tiles in {}", pending.len(), year);
        jobs.extend(pending.iter().map(|tile_id| job_command(year, tile_id)));
    }
    Ok(jobs)
}

/// Writes one job per line
pub fn write_jobs<P: AsRef<Path>>(path: P, jobs: &[String]) -> Result<()> {
    let path = path.as_ref();
    let mut contents = jobs.join("\n");
    contents.push('\n');
    std::fs::write(path, contents)
        .with_context(|| format!("Could not write job list {}", path.display()))
}
