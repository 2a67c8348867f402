use nalgebra::Point2;

/// Axis-aligned 2D extent in projected map coordinates, used for tile footprints
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Extent {
    min: Point2<f64>,
    max: Point2<f64>,
}

impl Extent {
    /// Creates a new extent from the given minimum and maximum coordinates. Panics if the minimum position is
    /// not less than or equal to the maximum position
    /// ```
    /// # use mhac_core::math::Extent;
    /// let extent = Extent::from_min_max(nalgebra::Point2::new(0.0, 0.0), nalgebra::Point2::new(1.0, 1.0));
    /// ```
    pub fn from_min_max(min: Point2<f64>, max: Point2<f64>) -> Self {
        if min.x > max.x || min.y > max.y {
            panic!("Extent::from_min_max: Minimum position must be <= maximum position!");
        }
        Self { min, max }
    }

    /// Like [from_min_max](Extent::from_min_max) but performs no checks that min <= max
    pub fn from_min_max_unchecked(min: Point2<f64>, max: Point2<f64>) -> Self {
        Self { min, max }
    }

    /// Computes the smallest extent containing all `points`. Returns `None` for an empty iterator
    /// ```
    /// # use mhac_core::math::Extent;
    /// let extent = Extent::from_points([(2.0, 5.0), (-1.0, 3.0), (4.0, 0.5)]).unwrap();
    /// assert_eq!(*extent.min(), nalgebra::Point2::new(-1.0, 0.5));
    /// assert_eq!(*extent.max(), nalgebra::Point2::new(4.0, 5.0));
    /// ```
    pub fn from_points<I: IntoIterator<Item = (f64, f64)>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let (x, y) = iter.next()?;
        let first = Point2::new(x, y);
        Some(iter.fold(Self::from_min_max_unchecked(first, first), |extent, (x, y)| {
            extent.extend_with_point(&Point2::new(x, y))
        }))
    }

    /// Returns the minimum (south-west) corner of this extent
    pub fn min(&self) -> &Point2<f64> {
        &self.min
    }

    /// Returns the maximum (north-east) corner of this extent
    pub fn max(&self) -> &Point2<f64> {
        &self.max
    }

    /// Returns true if the given point is contained within this extent. Points right on the boundary
    /// count as contained
    pub fn contains(&self, point: &Point2<f64>) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Returns a copy of this extent grown so that it contains `point`
    pub fn extend_with_point(&self, point: &Point2<f64>) -> Self {
        Self {
            min: Point2::new(self.min.x.min(point.x), self.min.y.min(point.y)),
            max: Point2::new(self.max.x.max(point.x), self.max.y.max(point.y)),
        }
    }
}
