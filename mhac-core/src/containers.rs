use nalgebra::Vector3;

/// A single LiDAR return
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LidarPoint {
    /// Position in world space (projected coordinates, meters)
    pub position: Vector3<f64>,
    /// ASPRS classification code
    pub classification: u8,
    /// Height above the interpolated ground surface. `None` until the point went through height
    /// normalization, or if no ground reference was found for it
    pub height_above_ground: Option<f64>,
}

impl LidarPoint {
    pub fn new(x: f64, y: f64, z: f64, classification: u8) -> Self {
        Self {
            position: Vector3::new(x, y, z),
            classification,
            height_above_ground: None,
        }
    }

    pub fn x(&self) -> f64 {
        self.position.x
    }

    pub fn y(&self) -> f64 {
        self.position.y
    }

    pub fn z(&self) -> f64 {
        self.position.z
    }
}

/// Point attribute that can be rasterized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    /// Raw elevation
    Z,
    /// Normalized height above ground
    HeightAboveGround,
}

impl Dimension {
    /// Returns the value of this dimension for `point`, or `None` if the point does not carry it
    /// ```
    /// # use mhac_core::containers::{Dimension, LidarPoint};
    /// let point = LidarPoint::new(0.0, 0.0, 742.5, 6);
    /// assert_eq!(Dimension::Z.value(&point), Some(742.5));
    /// assert_eq!(Dimension::HeightAboveGround.value(&point), None);
    /// ```
    pub fn value(&self, point: &LidarPoint) -> Option<f64> {
        match self {
            Dimension::Z => Some(point.position.z),
            Dimension::HeightAboveGround => point.height_above_ground,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Dimension::Z => "Z",
            Dimension::HeightAboveGround => "HeightAboveGround",
        }
    }
}

/// Ordered, owned collection of `LidarPoint`s
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloud {
    points: Vec<LidarPoint>,
}

impl PointCloud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, point: LidarPoint) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[LidarPoint] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LidarPoint> {
        self.points.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, LidarPoint> {
        self.points.iter_mut()
    }
}

impl From<Vec<LidarPoint>> for PointCloud {
    fn from(points: Vec<LidarPoint>) -> Self {
        Self { points }
    }
}

impl FromIterator<LidarPoint> for PointCloud {
    fn from_iter<I: IntoIterator<Item = LidarPoint>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for PointCloud {
    type Item = LidarPoint;
    type IntoIter = std::vec::IntoIter<LidarPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.into_iter()
    }
}

impl<'a> IntoIterator for &'a PointCloud {
    type Item = &'a LidarPoint;
    type IntoIter = std::slice::Iter<'a, LidarPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_keeps_order() {
        let cloud = (0..10)
            .map(|i| LidarPoint::new(i as f64, 2.0 * i as f64, 0.0, 2))
            .collect::<PointCloud>();
        assert_eq!(10, cloud.len());
        assert_eq!(18.0, cloud.points()[9].y());
        assert!(PointCloud::new().is_empty());
    }
}
