use std::path::Path;

use anyhow::{bail, Context, Result};
use mhac_io::{
    articulation::{ArticulationEntry, ArticulationIndex},
    base::list_point_cloud_files,
    las::LasTileReader,
};

use crate::{config::YearConfig, locator::validate_tile_id};

/// Derives an articulation index from the point cloud files in `raw_dir` that follow the naming rule of `year`.
/// Each file becomes one tile whose footprint is the XY bounds from the file header. Points are not read
pub fn build_articulation<P: AsRef<Path>>(raw_dir: P, year: &YearConfig) -> Result<ArticulationIndex> {
    let raw_dir = raw_dir.as_ref();
    let files = list_point_cloud_files(raw_dir, &year.suffix)?;
    if files.is_empty() {
        bail!(
            "No point cloud files ending with '{}' found in {}",
            year.suffix,
            raw_dir.display()
        );
    }
    log::info!("Found {} point cloud files ({})", files.len(), year.year);

    let mut entries = Vec::with_capacity(files.len());
    for file in &files {
        let file_name = file
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default();
        let tile_id = match year.tile_id_from_file_name(file_name) {
            Some(tile_id) => tile_id.to_owned(),
            None => {
                log::warn!("Skipping {}, it does not follow the naming rule", file.display());
                continue;
            }
        };
        if let Err(e) = validate_tile_id(&tile_id) {
            log::warn!("Skipping {}: {}", file.display(), e);
            continue;
        }
        let reader = LasTileReader::from_path(file)
            .with_context(|| format!("Could not read header of {}", file.display()))?;
        entries.push(ArticulationEntry {
            tile_id,
            footprint: reader.metadata().extent(),
        });
    }
    Ok(ArticulationIndex::new(year.id_field.clone(), entries))
}
