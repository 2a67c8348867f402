use mhac_core::{
    containers::{Dimension, PointCloud},
    math::MinMax,
};

fn running_minmax<T: MinMax + Copy, I: IntoIterator<Item = T>>(values: I) -> Option<(T, T)> {
    values.into_iter().fold(None, |acc, val| match acc {
        None => Some((val, val)),
        Some((lo, hi)) => Some((val.infimum(&lo), val.supremum(&hi))),
    })
}

/// Returns the minimum and maximum value of the given `dimension` within `cloud`. Points that do not carry the
/// dimension are ignored. Returns `None` if no point carries it
pub fn minmax_dimension(cloud: &PointCloud, dimension: Dimension) -> Option<(f64, f64)> {
    running_minmax(cloud.iter().filter_map(|p| dimension.value(p)))
}

/// Number of points per classification code
pub fn classification_histogram(cloud: &PointCloud) -> [usize; 256] {
    let mut histogram = [0; 256];
    for point in cloud {
        histogram[point.classification as usize] += 1;
    }
    histogram
}

#[cfg(test)]
mod tests {
    use super::*;
    use mhac_core::containers::LidarPoint;

    #[test]
    fn test_minmax_ignores_missing_values() {
        let mut cloud: PointCloud = vec![
            LidarPoint::new(0.0, 0.0, 5.0, 6),
            LidarPoint::new(0.0, 0.0, 7.2, 2),
            LidarPoint::new(0.0, 0.0, 3.1, 6),
        ]
        .into();
        assert_eq!(Some((3.1, 7.2)), minmax_dimension(&cloud, Dimension::Z));
        assert_eq!(None, minmax_dimension(&cloud, Dimension::HeightAboveGround));

        cloud.iter_mut().next().unwrap().height_above_ground = Some(1.5);
        assert_eq!(
            Some((1.5, 1.5)),
            minmax_dimension(&cloud, Dimension::HeightAboveGround)
        );
    }

    #[test]
    fn test_classification_histogram() {
        let cloud: PointCloud = [2u8, 6, 6, 5]
            .iter()
            .map(|c| LidarPoint::new(0.0, 0.0, 0.0, *c))
            .collect();
        let histogram = classification_histogram(&cloud);
        assert_eq!(1, histogram[2]);
        assert_eq!(2, histogram[6]);
        assert_eq!(1, histogram[5]);
        assert_eq!(4, histogram.iter().sum::<usize>());
    }
}
