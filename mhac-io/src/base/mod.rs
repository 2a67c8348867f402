use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use mhac_core::containers::PointCloud;

use crate::las::LasTileReader;

/// Point cloud formats the tile pipeline can read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointCloudFormat {
    /// LAS, or LAZ when compressed
    Las,
}

impl PointCloudFormat {
    /// Format of `path` judged by its extension, ignoring case. `None` for unknown or non-UTF-8 extensions
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        if extension.eq_ignore_ascii_case("las") || extension.eq_ignore_ascii_case("laz") {
            Some(PointCloudFormat::Las)
        } else {
            None
        }
    }
}

/// Checks whether `path` looks like a point cloud file that `read_all` can open
pub fn is_supported_file<P: AsRef<Path>>(path: P) -> bool {
    PointCloudFormat::from_path(path.as_ref()).is_some()
}

/// Returns all supported point cloud files directly inside `dir` whose file name ends with `suffix`, sorted by
/// path. Fails if `dir` is not a readable directory
pub fn list_point_cloud_files<P: AsRef<Path>>(dir: P, suffix: &str) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let mut files = vec![];
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("Could not list directory {}", dir.display()))?
    {
        let path = entry?.path();
        if !path.is_file() || !is_supported_file(&path) {
            continue;
        }
        let matches_suffix = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| name.ends_with(suffix))
            .unwrap_or(false);
        if matches_suffix {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Reads every point of the tile file at `path`
pub fn read_all<P: AsRef<Path>>(path: P) -> Result<PointCloud> {
    let path = path.as_ref();
    let format = PointCloudFormat::from_path(path)
        .ok_or_else(|| anyhow!("{} is not a LAS/LAZ file", path.display()))?;
    match format {
        PointCloudFormat::Las => {
            let mut reader = LasTileReader::from_path(path)?;
            log::debug!(
                "Reading {} points from {}",
                reader.metadata().number_of_points(),
                path.display()
            );
            reader
                .read_all()
                .with_context(|| format!("Failed to read points of {}", path.display()))
        }
    }
}
