use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use itertools::Itertools;
use mhac_core::MhacError;
use mhac_io::base::list_point_cloud_files;

use crate::{config::MhacConfig, locator::TileLocator};

/// Differences between the articulation index of a year and the point cloud files on disk. Files are compared by
/// their name without extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditReport {
    pub year: u16,
    pub index_tiles: usize,
    pub files_on_disk: usize,
    /// Files on disk that no index tile maps to
    pub files_not_in_index: Vec<String>,
    /// Files that index tiles map to but that are missing on disk
    pub index_not_on_disk: Vec<String>,
}

fn file_stem(file_name: &str) -> String {
    Path::new(file_name)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_owned())
}

/// Compares the articulation index of `year` with the files of its raw directory
pub fn audit_year(config: &MhacConfig, year: u16) -> Result<AuditReport> {
    let locator = TileLocator::open(config, year)?;
    let raw_dir = locator.raw_dir();
    if !raw_dir.is_dir() {
        return Err(MhacError::input_not_found("LiDAR directory", raw_dir).into());
    }

    let on_disk = list_point_cloud_files(&raw_dir, &locator.year().suffix)?
        .iter()
        .filter_map(|path| path.file_stem())
        .map(|stem| stem.to_string_lossy().into_owned())
        .collect::<BTreeSet<_>>();
    let tile_ids = locator.index().tile_ids();
    let expected = tile_ids
        .iter()
        .map(|tile_id| file_stem(&locator.year().file_name_for(tile_id)))
        .collect::<BTreeSet<_>>();

    let report = AuditReport {
        year,
        index_tiles: tile_ids.len(),
        files_on_disk: on_disk.len(),
        files_not_in_index: on_disk.difference(&expected).cloned().collect(),
        index_not_on_disk: expected.difference(&on_disk).cloned().collect(),
    };
    log::info!(
        "{}: {} tiles in index, {} files on disk, {} files without tile, {} tiles without file",
        year,
        report.index_tiles,
        report.files_on_disk,
        report.files_not_in_index.len(),
        report.index_not_on_disk.len()
    );
    Ok(report)
}

impl AuditReport {
    /// Writes `laz_not_in_articulacao_<year>.txt` and `articulacao_not_in_laz_<year>.txt` to `dir` and returns their
    /// paths
    pub fn write_to_dir<P: AsRef<Path>>(&self, dir: P) -> Result<(PathBuf, PathBuf)> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Could not create audit directory {}", dir.display()))?;
        let files_not_in_index = dir.join(format!("laz_not_in_articulacao_{}.txt", self.year));
        let index_not_on_disk = dir.join(format!("articulacao_not_in_laz_{}.txt", self.year));
        for (path, names) in [
            (&files_not_in_index, &self.files_not_in_index),
            (&index_not_on_disk, &self.index_not_on_disk),
        ] {
            std::fs::write(path, names.iter().join("\n"))
                .with_context(|| format!("Could not write audit report {}", path.display()))?;
        }
        Ok((files_not_in_index, index_not_on_disk))
    }
}
