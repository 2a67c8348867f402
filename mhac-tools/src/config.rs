use std::{
    collections::HashSet,
    ffi::OsString,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use mhac_algorithms::height_above_ground::HagParameters;
use mhac_core::{classification::ClassFilter, MhacError};
use mhac_io::geotiff::GeoTiffOptions;
use serde::Deserialize;

/// Configuration file that is picked up from the working directory if no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "mhac.toml";
/// Environment variable that overrides `lidar_base_dir`
pub const LIDAR_BASE_DIR_ENV: &str = "MHAC_LIDAR_BASE_DIR";

/// What to do when a product raster of a tile ends up without any valid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyTilePolicy {
    /// Write an all-nodata raster and log a warning
    Nodata,
    /// Abort the tile with an `EmptyResult` error
    Error,
}

impl Default for EmptyTilePolicy {
    fn default() -> Self {
        Self::Nodata
    }
}

/// Layout of the raw data of one survey campaign
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct YearConfig {
    pub year: u16,
    /// Property of the articulation index that holds the tile identifier
    pub id_field: String,
    /// Directory of the point cloud files, relative to `lidar_base_dir`
    pub raw_subdir: String,
    #[serde(default)]
    pub prefix: String,
    pub suffix: String,
    /// GeoJSON articulation index, relative to `lidar_base_dir` unless absolute
    pub articulation: PathBuf,
}

impl YearConfig {
    fn new(year: u16, id_field: &str, prefix: &str, suffix: &str) -> Self {
        Self {
            year,
            id_field: id_field.to_owned(),
            raw_subdir: format!("LiDAR-Sampa-{}", year),
            prefix: prefix.to_owned(),
            suffix: suffix.to_owned(),
            articulation: PathBuf::from(format!("articulacao_{}.geojson", year)),
        }
    }

    /// File name of the point cloud of the given tile
    pub fn file_name_for(&self, tile_id: &str) -> String {
        format!("{}{}{}", self.prefix, tile_id, self.suffix)
    }

    /// Inverse of [file_name_for](Self::file_name_for). Returns `None` if `file_name` does not follow the naming rule
    pub fn tile_id_from_file_name<'a>(&self, file_name: &'a str) -> Option<&'a str> {
        let tile_id = file_name
            .strip_prefix(self.prefix.as_str())?
            .strip_suffix(self.suffix.as_str())?;
        if tile_id.is_empty() {
            None
        } else {
            Some(tile_id)
        }
    }
}

/// Classification filters of the two raster products
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProductsConfig {
    pub mds: ClassFilter,
    pub hag: ClassFilter,
}

impl Default for ProductsConfig {
    fn default() -> Self {
        Self {
            mds: ClassFilter::without_vegetation(),
            hag: ClassFilter::without_vegetation(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HagConfig {
    pub neighbors: usize,
    pub max_distance: Option<f64>,
    pub allow_extrapolation: bool,
}

impl Default for HagConfig {
    fn default() -> Self {
        let defaults = HagParameters::default();
        Self {
            neighbors: defaults.neighbors,
            max_distance: defaults.max_distance,
            allow_extrapolation: defaults.allow_extrapolation,
        }
    }
}

/// Settings shared by all tools. Every field has a default, so an empty TOML document is a valid configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MhacConfig {
    pub lidar_base_dir: PathBuf,
    pub output_base_dir: PathBuf,
    pub audit_dir: PathBuf,
    /// Cell size in meters
    pub resolution: f64,
    pub nodata: f32,
    pub epsg: u16,
    pub compress: bool,
    pub empty_tile_policy: EmptyTilePolicy,
    pub products: ProductsConfig,
    pub hag: HagConfig,
    #[serde(rename = "year")]
    pub years: Vec<YearConfig>,
}

impl Default for MhacConfig {
    fn default() -> Self {
        Self {
            lidar_base_dir: PathBuf::from("data/raw"),
            output_base_dir: PathBuf::from("data/processed"),
            audit_dir: PathBuf::from("data/audit"),
            resolution: 1.0,
            nodata: -9999.0,
            epsg: 31983,
            compress: true,
            empty_tile_policy: EmptyTilePolicy::default(),
            products: ProductsConfig::default(),
            hag: HagConfig::default(),
            years: vec![
                YearConfig::new(2017, "cd_quadric", "MDS_color_", ".laz"),
                YearConfig::new(2020, "cd_quadric", "MDS_", "_1000.laz"),
                YearConfig::new(2024, "nome_arquivo", "", ".laz"),
            ],
        }
    }
}

impl MhacConfig {
    /// Parses and validates a configuration from TOML
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let config: MhacConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Loads the configuration for a tool run: the explicit `config_file` if given, else [DEFAULT_CONFIG_FILE] if it
    /// exists, else the defaults. `MHAC_LIDAR_BASE_DIR` overrides the raw data directory in all cases
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let config = match config_file {
            Some(path) => Self::from_path(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                log::debug!("Using config file {}", DEFAULT_CONFIG_FILE);
                Self::from_path(DEFAULT_CONFIG_FILE)?
            }
            None => Self::default(),
        };
        Ok(config.with_lidar_base_dir_override(std::env::var_os(LIDAR_BASE_DIR_ENV)))
    }

    /// Replaces `lidar_base_dir` with `dir` if it is set and not empty
    pub fn with_lidar_base_dir_override(mut self, dir: Option<OsString>) -> Self {
        if let Some(dir) = dir.filter(|d| !d.is_empty()) {
            self.lidar_base_dir = PathBuf::from(dir);
        }
        self
    }

    pub fn validate(&self) -> std::result::Result<(), MhacError> {
        if !(self.resolution.is_finite() && self.resolution > 0.0) {
            return Err(MhacError::InvalidArgument(format!(
                "resolution must be a positive number, got {}",
                self.resolution
            )));
        }
        if !self.nodata.is_finite() {
            return Err(MhacError::InvalidArgument(format!(
                "nodata must be a finite number, got {}",
                self.nodata
            )));
        }
        if self.hag.neighbors == 0 {
            return Err(MhacError::InvalidArgument(
                "hag.neighbors must be at least 1".into(),
            ));
        }
        if let Some(max_distance) = self.hag.max_distance {
            if !(max_distance > 0.0) {
                return Err(MhacError::InvalidArgument(format!(
                    "hag.max_distance must be positive, got {}",
                    max_distance
                )));
            }
        }
        let mut seen = HashSet::new();
        for year in &self.years {
            if !seen.insert(year.year) {
                return Err(MhacError::InvalidArgument(format!(
                    "year {} is configured more than once",
                    year.year
                )));
            }
            if year.id_field.is_empty() || year.suffix.is_empty() {
                return Err(MhacError::InvalidArgument(format!(
                    "year {} needs an id_field and a suffix",
                    year.year
                )));
            }
        }
        Ok(())
    }

    /// Configured campaign years in configuration order
    pub fn years(&self) -> Vec<u16> {
        self.years.iter().map(|y| y.year).collect()
    }

    pub fn year(&self, year: u16) -> std::result::Result<&YearConfig, MhacError> {
        self.years.iter().find(|y| y.year == year).ok_or_else(|| {
            MhacError::InvalidArgument(format!(
                "Unsupported year {}, expected one of {:?}",
                year,
                self.years()
            ))
        })
    }

    /// Directory with the point cloud files of a campaign
    pub fn raw_dir(&self, year: &YearConfig) -> PathBuf {
        self.lidar_base_dir.join(&year.raw_subdir)
    }

    pub fn articulation_path(&self, year: &YearConfig) -> PathBuf {
        if year.articulation.is_absolute() {
            year.articulation.clone()
        } else {
            self.lidar_base_dir.join(&year.articulation)
        }
    }

    pub fn hag_parameters(&self) -> HagParameters {
        HagParameters {
            neighbors: self.hag.neighbors,
            max_distance: self.hag.max_distance,
            allow_extrapolation: self.hag.allow_extrapolation,
        }
    }

    pub fn geotiff_options(&self) -> GeoTiffOptions {
        GeoTiffOptions {
            epsg: self.epsg,
            compress: self.compress,
        }
    }
}
