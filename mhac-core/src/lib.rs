#![warn(clippy::all)]

//! Core data structures for turning LiDAR tiles into height rasters
//!
//! The crate contains the in-memory point collection ([PointCloud](crate::containers::PointCloud)), the
//! ASPRS classification codes and filters, the fixed-resolution [Grid](crate::raster::Grid) that all
//! rasters of a tile are aligned to, and the [Raster](crate::raster::Raster) type itself. Reading and
//! writing lives in `mhac-io`, the processing stages in `mhac-algorithms`.

pub extern crate nalgebra;

/// ASPRS classification codes and classification filters
pub mod classification;
/// Point collections
pub mod containers;
mod error;
pub use self::error::*;
/// Useful mathematical tools when working with point cloud data
pub mod math;
/// Grids and rasters
pub mod raster;
