use kd_tree::{KdPoint, KdTree};
use mhac_core::{
    classification::codes::GROUND, containers::PointCloud, math::Extent, nalgebra::Point2,
};

/// Parameters of the nearest-neighbour ground interpolation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HagParameters {
    /// Number of ground neighbours to interpolate from. With 1 the elevation of the nearest ground point is used,
    /// with more neighbours the elevations are weighted by inverse XY distance
    pub neighbors: usize,
    /// Ground points farther away than this (in XY) are ignored
    pub max_distance: Option<f64>,
    /// If false, points outside the XY extent of the ground points get a height of zero instead of being
    /// related to the closest ground point at the edge. Matches PDAL's `allow_extrapolation`
    pub allow_extrapolation: bool,
}

impl Default for HagParameters {
    fn default() -> Self {
        Self {
            neighbors: 1,
            max_distance: None,
            allow_extrapolation: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct GroundSample {
    x: f64,
    y: f64,
    z: f64,
}

// Ground samples are searched in the XY plane only
impl KdPoint for GroundSample {
    type Scalar = f64;
    type Dim = typenum::U2;
    fn at(&self, k: usize) -> f64 {
        if k == 0 {
            self.x
        } else {
            self.y
        }
    }
}

/// Terrain reference built from ground-classified points, queried by nearest neighbours in XY
pub struct GroundModel {
    tree: KdTree<GroundSample>,
    extent: Extent,
    len: usize,
}

impl GroundModel {
    /// Builds a ground model from all points of `cloud` with the ground classification. Returns `None` if the cloud
    /// has no ground points
    pub fn from_cloud(cloud: &PointCloud) -> Option<Self> {
        Self::from_samples(
            cloud
                .iter()
                .filter(|p| p.classification == GROUND)
                .map(|p| (p.x(), p.y(), p.z())),
        )
    }

    /// Builds a ground model from `(x, y, z)` samples. Returns `None` if there are no samples
    pub fn from_samples<I: IntoIterator<Item = (f64, f64, f64)>>(samples: I) -> Option<Self> {
        let samples = samples
            .into_iter()
            .filter(|(x, y, z)| x.is_finite() && y.is_finite() && z.is_finite())
            .map(|(x, y, z)| GroundSample { x, y, z })
            .collect::<Vec<_>>();
        let extent = Extent::from_points(samples.iter().map(|s| (s.x, s.y)))?;
        let len = samples.len();
        Some(Self {
            tree: KdTree::build_by_ordered_float(samples),
            extent,
            len,
        })
    }

    /// Number of ground samples
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns true if `(x, y)` lies within the XY extent of the ground samples, boundary included
    pub fn covers(&self, x: f64, y: f64) -> bool {
        self.extent.contains(&Point2::new(x, y))
    }

    /// Interpolated ground elevation at `(x, y)`, or `None` if no ground sample lies within the maximum distance
    pub fn ground_elevation(&self, x: f64, y: f64, params: &HagParameters) -> Option<f64> {
        let neighbors = params.neighbors.max(1);
        let max_squared_distance = params.max_distance.map(|d| d * d);
        let nearest = self
            .tree
            .nearests(&[x, y], neighbors)
            .into_iter()
            .filter(|n| match max_squared_distance {
                Some(max) => n.squared_distance <= max,
                None => true,
            })
            .collect::<Vec<_>>();

        match nearest.as_slice() {
            [] => None,
            [single] => Some(single.item.z),
            _ => {
                if let Some(exact) = nearest.iter().find(|n| n.squared_distance == 0.0) {
                    return Some(exact.item.z);
                }
                let (weighted_sum, weight_sum) =
                    nearest.iter().fold((0.0, 0.0), |(sum, weights), n| {
                        let weight = 1.0 / n.squared_distance.sqrt();
                        (sum + weight * n.item.z, weights + weight)
                    });
                Some(weighted_sum / weight_sum)
            }
        }
    }
}

/// Annotates every point of `cloud` with its height above the ground surface described by `ground`. Ground points
/// get a height of zero, as do points outside the ground extent unless `params.allow_extrapolation` is set. Points
/// without a usable ground neighbour keep `height_above_ground == None`
///
/// # Examples
/// ```
/// # use mhac_algorithms::height_above_ground::{normalize_heights, GroundModel, HagParameters};
/// # use mhac_core::containers::{LidarPoint, PointCloud};
/// let cloud: PointCloud = vec![
///     LidarPoint::new(0.0, 0.0, 740.0, 2),
///     LidarPoint::new(1.0, 1.0, 741.0, 2),
///     LidarPoint::new(0.2, 0.1, 752.5, 6),
///     LidarPoint::new(3.0, 0.5, 760.0, 6),
/// ].into();
/// let ground = GroundModel::from_cloud(&cloud).unwrap();
/// let normalized = normalize_heights(&cloud, &ground, &HagParameters::default());
/// assert_eq!(normalized.points()[2].height_above_ground, Some(12.5));
/// // Outside of the ground extent
/// assert_eq!(normalized.points()[3].height_above_ground, Some(0.0));
/// ```
pub fn normalize_heights(
    cloud: &PointCloud,
    ground: &GroundModel,
    params: &HagParameters,
) -> PointCloud {
    let mut without_ground = 0;
    let mut outside_ground = 0;
    let normalized = cloud
        .iter()
        .map(|point| {
            let mut point = *point;
            point.height_above_ground = if point.classification == GROUND {
                Some(0.0)
            } else if !params.allow_extrapolation && !ground.covers(point.x(), point.y()) {
                outside_ground += 1;
                Some(0.0)
            } else {
                match ground.ground_elevation(point.x(), point.y(), params) {
                    Some(elevation) => Some(point.z() - elevation),
                    None => {
                        without_ground += 1;
                        None
                    }
                }
            };
            point
        })
        .collect::<PointCloud>();
    if outside_ground > 0 {
        log::debug!(
            "{} of {} points lie outside the ground extent, their height is set to 0",
            outside_ground,
            cloud.len()
        );
    }
    if without_ground > 0 {
        log::warn!(
            "{} of {} points have no ground point within {:?} m",
            without_ground,
            cloud.len(),
            params.max_distance
        );
    }
    normalized
}
