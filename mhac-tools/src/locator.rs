use std::path::PathBuf;

use anyhow::Result;
use mhac_core::{math::Extent, raster::Grid, MhacError};
use mhac_io::articulation::{ArticulationEntry, ArticulationIndex};

use crate::config::{MhacConfig, YearConfig};

/// Parses a campaign year given on the command line and checks that it is configured
pub fn parse_year(year: &str, config: &MhacConfig) -> std::result::Result<u16, MhacError> {
    let parsed = year.trim().parse::<u16>().map_err(|_| {
        MhacError::InvalidArgument(format!("Year must be a number, got '{}'", year))
    })?;
    config.year(parsed)?;
    Ok(parsed)
}

/// Checks that `tile_id` is a non-empty identifier made of ASCII letters, digits, `_`, `-` and `.` that cannot
/// escape the directory it is joined to
/// ```
/// # use mhac_tools::locator::validate_tile_id;
/// assert!(validate_tile_id("3313-311").is_ok());
/// assert!(validate_tile_id("SP_2024.0042").is_ok());
/// assert!(validate_tile_id("../3313-311").is_err());
/// assert!(validate_tile_id("").is_err());
/// ```
pub fn validate_tile_id(tile_id: &str) -> std::result::Result<&str, MhacError> {
    let valid_chars = tile_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.');
    if tile_id.is_empty() || !valid_chars || tile_id.starts_with('.') || tile_id.contains("..") {
        return Err(MhacError::InvalidArgument(format!(
            "Invalid tile id '{}'",
            tile_id
        )));
    }
    Ok(tile_id)
}

/// Everything needed to process one tile
#[derive(Debug, Clone, PartialEq)]
pub struct TileLocation {
    pub tile_id: String,
    pub year: u16,
    pub footprint: Extent,
    /// Point cloud file of the tile
    pub input_path: PathBuf,
}

impl TileLocation {
    /// The raster grid of this tile. It only depends on the footprint, so all years share the same grid
    pub fn grid(&self, resolution: f64) -> std::result::Result<Grid, MhacError> {
        Grid::covering(&self.footprint, resolution)
    }
}

/// Resolves tile identifiers of one campaign year to point cloud files using the articulation index of that year
pub struct TileLocator<'a> {
    config: &'a MhacConfig,
    year: &'a YearConfig,
    index: ArticulationIndex,
}

impl<'a> TileLocator<'a> {
    /// Loads the articulation index of `year`. Fails with `InvalidArgument` for years that are not configured and
    /// with `InputNotFound` if the index file does not exist
    pub fn open(config: &'a MhacConfig, year: u16) -> Result<Self> {
        let year = config.year(year)?;
        let index_path = config.articulation_path(year);
        if !index_path.is_file() {
            return Err(MhacError::input_not_found("Articulation index", index_path).into());
        }
        let index = ArticulationIndex::from_path(&index_path, &year.id_field)?;
        log::debug!(
            "Loaded {} tiles for {} from {}",
            index.len(),
            year.year,
            index_path.display()
        );
        Ok(Self {
            config,
            year,
            index,
        })
    }

    pub fn year(&self) -> &YearConfig {
        self.year
    }

    pub fn index(&self) -> &ArticulationIndex {
        &self.index
    }

    pub fn raw_dir(&self) -> PathBuf {
        self.config.raw_dir(self.year)
    }

    /// Expected point cloud path of the tile, whether or not it exists
    pub fn input_path(&self, tile_id: &str) -> PathBuf {
        self.raw_dir().join(self.year.file_name_for(tile_id))
    }

    /// Looks `tile_id` up in the articulation index
    pub fn find(&self, tile_id: &str) -> std::result::Result<&ArticulationEntry, MhacError> {
        let tile_id = validate_tile_id(tile_id.trim())?;
        self.index.find(tile_id).ok_or_else(|| {
            MhacError::input_not_found(
                format!("Tile {} in articulation index {}", tile_id, self.year.year),
                self.config.articulation_path(self.year),
            )
        })
    }

    /// Resolves an index entry to its point cloud file. Fails with `InputNotFound` if the raw directory or the file
    /// do not exist
    pub fn locate_entry(
        &self,
        entry: &ArticulationEntry,
    ) -> std::result::Result<TileLocation, MhacError> {
        let tile_id = validate_tile_id(&entry.tile_id)?;
        let raw_dir = self.raw_dir();
        if !raw_dir.is_dir() {
            return Err(MhacError::input_not_found("LiDAR directory", raw_dir));
        }
        let input_path = self.input_path(tile_id);
        if !input_path.is_file() {
            return Err(MhacError::input_not_found(
                format!("Point cloud of tile {}", tile_id),
                input_path,
            ));
        }
        Ok(TileLocation {
            tile_id: tile_id.to_owned(),
            year: self.year.year,
            footprint: entry.footprint,
            input_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_year() {
        let config = MhacConfig::default();
        assert_eq!(2020, parse_year("2020", &config).unwrap());
        assert!(matches!(
            parse_year("1999", &config),
            Err(MhacError::InvalidArgument(_))
        ));
        assert!(matches!(
            parse_year("twenty", &config),
            Err(MhacError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_invalid_tile_ids() {
        for id in ["..", "a/b", "a\\b", ".hidden", "3313 311", "ç"] {
            assert!(validate_tile_id(id).is_err(), "'{}' should be rejected", id);
        }
    }

    #[test]
    fn test_missing_index_is_input_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let config = MhacConfig {
            lidar_base_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        let err = TileLocator::open(&config, 2020).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<MhacError>(),
            Some(MhacError::InputNotFound { .. })
        ));
    }
}
