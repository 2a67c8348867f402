use std::path::Path;

use anyhow::Result;
use las::{point::Classification, point::Format, Builder, Transform, Vector, Write, Writer};
use mhac_core::containers::LidarPoint;
use rand::{distributions::Uniform, prelude::Distribution, Rng};

/// Random points inside a square tile of 100 m starting at `(origin_x, origin_y)`, with ASPRS codes 1 to 6
pub struct TestTilePointDistribution {
    pub origin_x: f64,
    pub origin_y: f64,
}

impl Distribution<LidarPoint> for TestTilePointDistribution {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> LidarPoint {
        let offset = Uniform::new(0.0, 100.0);
        LidarPoint::new(
            self.origin_x + rng.sample(offset),
            self.origin_y + rng.sample(offset),
            rng.sample(Uniform::new(700.0, 800.0)),
            rng.sample(Uniform::new_inclusive(1u8, 6)),
        )
    }
}

/// Writes `points` as an uncompressed LAS 1.2 file (point format 0) with millimeter precision
pub fn write_las_file(path: &Path, points: &[LidarPoint]) -> Result<()> {
    let (offset_x, offset_y) = points
        .first()
        .map(|p| (p.x().floor(), p.y().floor()))
        .unwrap_or((0.0, 0.0));

    let mut builder = Builder::from((1, 2));
    builder.point_format = Format::new(0)?;
    builder.transforms = Vector {
        x: Transform {
            scale: 0.001,
            offset: offset_x,
        },
        y: Transform {
            scale: 0.001,
            offset: offset_y,
        },
        z: Transform {
            scale: 0.001,
            offset: 0.0,
        },
    };
    let header = builder.into_header()?;

    let mut writer = Writer::from_path(path, header)?;
    for point in points {
        writer.write(las::Point {
            x: point.x(),
            y: point.y(),
            z: point.z(),
            classification: Classification::new(point.classification)?,
            ..Default::default()
        })?;
    }
    writer.close()?;
    Ok(())
}
