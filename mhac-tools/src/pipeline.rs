use std::time::Instant;

use anyhow::{Context, Result};
use mhac_algorithms::{
    filter::filter_by_classification,
    height_above_ground::{normalize_heights, GroundModel},
    rasterize::rasterize_max,
};
use mhac_core::{containers::PointCloud, raster::Grid, raster::Raster, MhacError};
use mhac_io::base::read_all;

use crate::{
    config::{EmptyTilePolicy, MhacConfig},
    locator::{validate_tile_id, TileLocation, TileLocator},
    output::{write_raster, OutputPaths, Product, WriteOutcome},
};

/// MDS and HAG raster of one tile, both on the same grid
#[derive(Debug, Clone)]
pub struct TileRasters {
    pub mds: Raster,
    pub hag: Raster,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileOutcome {
    /// Both outputs existed, the point cloud was not read
    Skipped,
    Processed {
        points: usize,
        mds: WriteOutcome,
        hag: WriteOutcome,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileReport {
    pub tile_id: String,
    pub outcome: TileOutcome,
}

fn apply_empty_tile_policy(
    raster: Raster,
    product: Product,
    tile_id: &str,
    policy: EmptyTilePolicy,
) -> Result<Raster, MhacError> {
    if !raster.is_empty() {
        return Ok(raster);
    }
    match policy {
        EmptyTilePolicy::Nodata => {
            log::warn!(
                "Tile {}: no points left for {}, writing a raster without data",
                tile_id,
                product
            );
            Ok(raster)
        }
        EmptyTilePolicy::Error => Err(MhacError::empty_result(
            tile_id,
            format!("no points left for {}", product),
        )),
    }
}

/// Computes the MDS and HAG rasters of a tile from its unfiltered point cloud. Filtering, height normalization and
/// rasterization run in memory; nothing is written
///
/// The ground model uses the ground points of the unfiltered `cloud`, so a product filter that drops ground points
/// still gets heights relative to the terrain.
pub fn build_tile_rasters(
    cloud: &PointCloud,
    grid: &Grid,
    config: &MhacConfig,
    tile_id: &str,
) -> Result<TileRasters, MhacError> {
    let policy = config.empty_tile_policy;

    let mds_points = filter_by_classification(cloud, &config.products.mds);
    let mds = rasterize_max(&mds_points, Product::Mds.dimension(), grid, config.nodata);
    let mds = apply_empty_tile_policy(mds, Product::Mds, tile_id, policy)?;

    let hag_points = filter_by_classification(cloud, &config.products.hag);
    let hag = if hag_points.is_empty() {
        Raster::filled_with_nodata(*grid, config.nodata)
    } else {
        let ground = GroundModel::from_cloud(cloud)
            .ok_or_else(|| MhacError::empty_result(tile_id, "no ground-classified points"))?;
        log::debug!("Tile {}: ground model of {} points", tile_id, ground.len());
        let normalized = normalize_heights(&hag_points, &ground, &config.hag_parameters());
        rasterize_max(&normalized, Product::Hag.dimension(), grid, config.nodata)
    };
    let hag = apply_empty_tile_policy(hag, Product::Hag, tile_id, policy)?;

    Ok(TileRasters { mds, hag })
}

/// Reads, rasterizes and writes a single located tile
pub fn process_tile(
    config: &MhacConfig,
    location: &TileLocation,
    overwrite: bool,
) -> Result<TileReport> {
    let paths = OutputPaths::for_tile(&config.output_base_dir, location.year, &location.tile_id);
    if paths.all_exist() && !overwrite {
        log::info!("[skip] tile {}", location.tile_id);
        return Ok(TileReport {
            tile_id: location.tile_id.clone(),
            outcome: TileOutcome::Skipped,
        });
    }

    log::info!("[run] tile {}", location.tile_id);
    let t_start = Instant::now();
    let grid = location.grid(config.resolution)?;
    let cloud = read_all(&location.input_path).with_context(|| {
        format!(
            "Could not read point cloud of tile {}",
            location.tile_id
        )
    })?;
    log::debug!(
        "Tile {}: {} points, grid {}",
        location.tile_id,
        cloud.len(),
        grid
    );

    let rasters = build_tile_rasters(&cloud, &grid, config, &location.tile_id)?;
    let options = config.geotiff_options();
    let mds = write_raster(&rasters.mds, &paths.mds, overwrite, &options)?;
    let hag = write_raster(&rasters.hag, &paths.hag, overwrite, &options)?;
    log::info!(
        "Tile {} done in {:.2}s",
        location.tile_id,
        t_start.elapsed().as_secs_f64()
    );

    Ok(TileReport {
        tile_id: location.tile_id.clone(),
        outcome: TileOutcome::Processed {
            points: cloud.len(),
            mds,
            hag,
        },
    })
}

/// Processes one tile of `year`, or all tiles of its articulation index if `tile_id` is `None`. Tiles are processed
/// in index order and the first error, including an invalid tile id in the index, aborts the run
pub fn run(
    config: &MhacConfig,
    year: u16,
    tile_id: Option<&str>,
    overwrite: bool,
) -> Result<Vec<TileReport>> {
    let locator = TileLocator::open(config, year)?;
    let tile_ids = match tile_id {
        Some(tile_id) => vec![validate_tile_id(tile_id.trim())?],
        None => locator.index().tile_ids(),
    };
    log::info!("Processing {} tiles of {}", tile_ids.len(), year);

    let mut reports = Vec::with_capacity(tile_ids.len());
    for tile_id in tile_ids {
        let entry = locator.find(tile_id)?;
        let paths = OutputPaths::for_tile(&config.output_base_dir, year, &entry.tile_id);
        if paths.all_exist() && !overwrite {
            log::info!("[skip] tile {}", entry.tile_id);
            reports.push(TileReport {
                tile_id: entry.tile_id.clone(),
                outcome: TileOutcome::Skipped,
            });
            continue;
        }
        let location = locator.locate_entry(entry)?;
        reports.push(process_tile(config, &location, overwrite)?);
    }
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mhac_core::{
        classification::{codes, ClassFilter},
        containers::LidarPoint,
    };

    fn grid() -> Grid {
        Grid::new(333_000.0, 7_394_000.0, 1.0, 4, 4).unwrap()
    }

    fn tile_cloud() -> PointCloud {
        vec![
            LidarPoint::new(333_000.5, 7_394_000.5, 740.0, codes::GROUND),
            LidarPoint::new(333_003.5, 7_394_003.5, 741.0, codes::GROUND),
            LidarPoint::new(333_000.6, 7_394_000.6, 752.0, codes::BUILDING),
            LidarPoint::new(333_003.4, 7_394_003.6, 760.0, codes::HIGH_VEGETATION),
        ]
        .into()
    }

    #[test]
    fn test_build_tile_rasters() {
        let rasters =
            build_tile_rasters(&tile_cloud(), &grid(), &MhacConfig::default(), "t").unwrap();
        // Vegetation is removed from both products
        assert_eq!(Some(752.0), rasters.mds.get(0, 3));
        assert_eq!(Some(741.0), rasters.mds.get(3, 0));
        assert_eq!(Some(12.0), rasters.hag.get(0, 3));
        assert_eq!(Some(0.0), rasters.hag.get(3, 0));
        assert_eq!(None, rasters.mds.get(1, 1));
        assert_eq!(rasters.mds.grid(), rasters.hag.grid());
    }

    #[test]
    fn test_building_only_filter_keeps_terrain_reference() {
        let mut config = MhacConfig::default();
        config.products.hag = ClassFilter::buildings_only();
        let rasters = build_tile_rasters(&tile_cloud(), &grid(), &config, "t").unwrap();
        assert_eq!(Some(12.0), rasters.hag.get(0, 3));
        assert_eq!(1, rasters.hag.valid_cell_count());
    }

    #[test]
    fn test_empty_tile_policy() {
        let vegetation_only: PointCloud =
            vec![LidarPoint::new(333_000.5, 7_394_000.5, 760.0, codes::LOW_VEGETATION)].into();

        let rasters =
            build_tile_rasters(&vegetation_only, &grid(), &MhacConfig::default(), "t").unwrap();
        assert!(rasters.mds.is_empty());
        assert!(rasters.hag.is_empty());

        let config = MhacConfig {
            empty_tile_policy: EmptyTilePolicy::Error,
            ..Default::default()
        };
        let err = build_tile_rasters(&vegetation_only, &grid(), &config, "t").unwrap_err();
        assert!(matches!(err, MhacError::EmptyResult { .. }));
    }

    #[test]
    fn test_no_ground_points() {
        let buildings: PointCloud =
            vec![LidarPoint::new(333_000.5, 7_394_000.5, 760.0, codes::BUILDING)].into();
        let err =
            build_tile_rasters(&buildings, &grid(), &MhacConfig::default(), "t").unwrap_err();
        assert!(matches!(err, MhacError::EmptyResult { .. }));
    }
}
