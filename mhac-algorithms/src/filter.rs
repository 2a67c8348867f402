use mhac_core::{classification::ClassFilter, containers::PointCloud};

/// Returns the points of `cloud` whose classification passes `filter`, in their original order
///
/// # Examples
/// ```
/// # use mhac_algorithms::filter::filter_by_classification;
/// # use mhac_core::{classification::ClassFilter, containers::{LidarPoint, PointCloud}};
/// let cloud: PointCloud = vec![
///     LidarPoint::new(0.0, 0.0, 12.0, 6),
///     LidarPoint::new(1.0, 0.0, 9.0, 5),
///     LidarPoint::new(2.0, 0.0, 1.0, 2),
/// ].into();
/// let filtered = filter_by_classification(&cloud, &ClassFilter::without_vegetation());
/// assert_eq!(filtered.len(), 2);
/// ```
pub fn filter_by_classification(cloud: &PointCloud, filter: &ClassFilter) -> PointCloud {
    let filtered = cloud
        .iter()
        .filter(|point| filter.accepts(point.classification))
        .copied()
        .collect::<PointCloud>();
    log::debug!(
        "{}: kept {} of {} points",
        filter,
        filtered.len(),
        cloud.len()
    );
    filtered
}
