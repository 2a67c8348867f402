#![warn(clippy::all)]
//! Algorithms that turn LiDAR point clouds into height rasters.
//!
//! Every stage is a pure function over in-memory point collections, so stages can be tested and
//! combined without touching the file system.

// Keep or drop points by their ASPRS classification.
pub mod filter;
// Height above ground from a nearest-neighbour ground model, similar to PDAL's filters.hag_nn.
pub mod height_above_ground;
// Minimum and maximum values of point attributes.
pub mod minmax;
// Binning of points onto a fixed grid with maximum aggregation.
pub mod rasterize;
