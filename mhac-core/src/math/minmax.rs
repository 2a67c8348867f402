/// Running minimum and maximum of point attribute values
pub trait MinMax {
    /// The smaller of `self` and `other`
    ///
    /// # Example
    /// ```
    /// use mhac_core::math::MinMax;
    ///
    /// assert_eq!(5u8.infimum(&3u8), 3u8);
    /// assert_eq!(742.5f64.infimum(&740.0), 740.0);
    /// ```
    fn infimum(&self, other: &Self) -> Self;
    /// The larger of `self` and `other`
    ///
    /// # Example
    /// ```
    /// use mhac_core::math::MinMax;
    ///
    /// assert_eq!(7.2f64.supremum(&5.0), 7.2);
    /// ```
    fn supremum(&self, other: &Self) -> Self;
}

// NaN on either side yields `self`
impl<T: PartialOrd + Copy> MinMax for T {
    fn infimum(&self, other: &Self) -> Self {
        if *other < *self {
            *other
        } else {
            *self
        }
    }

    fn supremum(&self, other: &Self) -> Self {
        if *other > *self {
            *other
        } else {
            *self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nan_is_ignored_on_the_right() {
        assert_eq!(1.0f64.infimum(&f64::NAN), 1.0);
        assert_eq!(1.0f64.supremum(&f64::NAN), 1.0);
    }
}
