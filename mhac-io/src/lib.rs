#![warn(clippy::all)]
//! I/O for the MHAC pipeline
//!
//! Reading of LAS/LAZ point cloud tiles, reading and writing of articulation indices (GeoJSON tile footprints)
//! and writing of single-band GeoTIFF rasters with embedded spatial reference and no-data value.

/// Articulation index: tile identifiers and their footprints
pub mod articulation;
/// Common helpers for locating and reading point cloud files
pub mod base;
/// GeoTIFF raster I/O
pub mod geotiff;
/// LAS/LAZ point cloud reading
pub mod las;
