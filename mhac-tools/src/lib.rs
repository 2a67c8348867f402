#![warn(clippy::all)]
//! Tile processing on top of `mhac-core`, `mhac-io` and `mhac-algorithms`, shared by the command line tools.

// Derive an articulation index from point cloud headers.
pub mod articulation_builder;
// Compare an articulation index with the files on disk.
pub mod audit;
pub mod config;
// Job lists for external parallel execution.
pub mod jobs;
pub mod locator;
pub mod output;
pub mod pipeline;

/// Initializes `pretty_env_logger` with the filters from `RUST_LOG`, defaulting to `info`
pub fn init_logging() {
    let filters = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_owned());
    pretty_env_logger::formatted_builder()
        .parse_filters(&filters)
        .init();
}
