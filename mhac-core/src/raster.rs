use std::fmt::Display;

use crate::{math::Extent, MhacError, Result};

/// Snaps `value` down to the closest multiple of `resolution` that is less than or equal to it
/// ```
/// # use mhac_core::raster::snap_origin;
/// assert_eq!(snap_origin(333_012.7, 1.0), 333_012.0);
/// assert_eq!(snap_origin(-0.5, 1.0), -1.0);
/// assert_eq!(snap_origin(7_394_017.0, 5.0), 7_394_015.0);
/// ```
pub fn snap_origin(value: f64, resolution: f64) -> f64 {
    let snapped = (value / resolution).floor() * resolution;
    // The division can round up onto the next grid line
    if snapped > value {
        snapped - resolution
    } else {
        snapped
    }
}

// Largest distance, in cells, at which a coordinate still counts as lying on a grid line
const ALIGNMENT_TOLERANCE: f64 = 1e-6;

/// Returns true if `value` is a multiple of `resolution` up to floating point error
/// ```
/// # use mhac_core::raster::{is_aligned, snap_origin};
/// assert!(is_aligned(snap_origin(334_954.3508709194, 0.7), 0.7));
/// assert!(!is_aligned(0.35, 0.7));
/// ```
pub fn is_aligned(value: f64, resolution: f64) -> bool {
    let cells = value / resolution;
    (cells - cells.round()).abs() <= ALIGNMENT_TOLERANCE
}

fn check_resolution(resolution: f64) -> Result<()> {
    if resolution.is_finite() && resolution > 0.0 {
        Ok(())
    } else {
        Err(MhacError::InvalidArgument(format!(
            "Grid resolution must be positive, got {}",
            resolution
        )))
    }
}

/// Fixed-origin, fixed-resolution 2D lattice. The origin is the lower-left (south-west) corner and lies on
/// an integer multiple of the resolution, so grids of the same tile line up pixel by pixel across years.
///
/// Cells are addressed as `(column, row)` with row 0 being the northernmost row, which is the order in which
/// rasters are stored and written.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    origin_x: f64,
    origin_y: f64,
    resolution: f64,
    width: usize,
    height: usize,
}

impl Grid {
    /// Creates a new `Grid`. Fails if `resolution` is not a positive finite number, if the origin is not aligned
    /// to the resolution (see [is_aligned]) or if the grid has no cells
    pub fn new(
        origin_x: f64,
        origin_y: f64,
        resolution: f64,
        width: usize,
        height: usize,
    ) -> Result<Self> {
        check_resolution(resolution)?;
        if !is_aligned(origin_x, resolution) || !is_aligned(origin_y, resolution) {
            return Err(MhacError::InvalidArgument(format!(
                "Grid origin ({}, {}) is not aligned to resolution {}",
                origin_x, origin_y, resolution
            )));
        }
        Self::with_size(origin_x, origin_y, resolution, width, height)
    }

    fn with_size(
        origin_x: f64,
        origin_y: f64,
        resolution: f64,
        width: usize,
        height: usize,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(MhacError::InvalidArgument(format!(
                "Grid must have at least one cell, got {}x{}",
                width, height
            )));
        }
        Ok(Self {
            origin_x,
            origin_y,
            resolution,
            width,
            height,
        })
    }

    /// Creates the grid that covers `extent` at the given `resolution`. The origin is the minimum corner of
    /// `extent` snapped down to the resolution, the size is rounded up so the whole extent is covered
    /// ```
    /// # use mhac_core::{math::Extent, raster::Grid};
    /// let footprint = Extent::from_min_max(
    ///     nalgebra::Point2::new(333_000.4, 7_394_000.6),
    ///     nalgebra::Point2::new(333_500.2, 7_394_400.0),
    /// );
    /// let grid = Grid::covering(&footprint, 1.0).unwrap();
    /// assert_eq!(grid.origin(), (333_000.0, 7_394_000.0));
    /// assert_eq!(grid.width(), 501);
    /// assert_eq!(grid.height(), 400);
    /// ```
    pub fn covering(extent: &Extent, resolution: f64) -> Result<Self> {
        check_resolution(resolution)?;
        let origin_x = snap_origin(extent.min().x, resolution);
        let origin_y = snap_origin(extent.min().y, resolution);
        let width = ((extent.max().x - origin_x) / resolution).ceil() as usize;
        let height = ((extent.max().y - origin_y) / resolution).ceil() as usize;
        Self::with_size(origin_x, origin_y, resolution, width, height)
    }

    /// Lower-left corner of the grid
    pub fn origin(&self) -> (f64, f64) {
        (self.origin_x, self.origin_y)
    }

    /// Upper-left corner of the grid, which is the tie point of the raster
    pub fn top_left(&self) -> (f64, f64) {
        (
            self.origin_x,
            self.origin_y + self.height as f64 * self.resolution,
        )
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// Returns the `(column, row)` of the cell that contains `(x, y)`, or `None` if the position lies outside of
    /// this grid. Cells are half-open: the west and south edges belong to the cell, the east and north edges
    /// belong to the neighbouring cell
    /// ```
    /// # use mhac_core::raster::Grid;
    /// let grid = Grid::new(0.0, 0.0, 1.0, 4, 3).unwrap();
    /// assert_eq!(grid.cell_of(0.0, 0.0), Some((0, 2)));
    /// assert_eq!(grid.cell_of(3.99, 2.5), Some((3, 0)));
    /// assert_eq!(grid.cell_of(4.0, 1.0), None);
    /// ```
    pub fn cell_of(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        let col = ((x - self.origin_x) / self.resolution).floor();
        let row_from_bottom = ((y - self.origin_y) / self.resolution).floor();
        if !(col >= 0.0 && row_from_bottom >= 0.0) {
            return None;
        }
        let (col, row_from_bottom) = (col as usize, row_from_bottom as usize);
        if col >= self.width || row_from_bottom >= self.height {
            return None;
        }
        Some((col, self.height - 1 - row_from_bottom))
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}x{} cells @ {} m, origin ({}, {})",
            self.width, self.height, self.resolution, self.origin_x, self.origin_y
        )
    }
}

/// Single-band `f32` raster aligned to a `Grid`. Values are stored row-major, north to south
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    grid: Grid,
    nodata: f32,
    data: Vec<f32>,
}

impl Raster {
    /// Creates a raster in which every cell holds `nodata`
    pub fn filled_with_nodata(grid: Grid, nodata: f32) -> Self {
        Self {
            grid,
            nodata,
            data: vec![nodata; grid.cell_count()],
        }
    }

    /// Creates a raster from existing row-major cell values. Fails if `data` does not match the grid size
    pub fn from_data(grid: Grid, nodata: f32, data: Vec<f32>) -> Result<Self> {
        if data.len() != grid.cell_count() {
            return Err(MhacError::InvalidArgument(format!(
                "Raster data has {} values but grid has {} cells",
                data.len(),
                grid.cell_count()
            )));
        }
        Ok(Self { grid, nodata, data })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn nodata(&self) -> f32 {
        self.nodata
    }

    /// Row-major cell values, north to south
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Returns true if `value` is the no-data sentinel of this raster
    pub fn is_nodata(&self, value: f32) -> bool {
        if self.nodata.is_nan() {
            value.is_nan()
        } else {
            value == self.nodata
        }
    }

    /// Raw cell value, including the no-data sentinel. Panics if the cell is out of bounds
    pub fn value(&self, col: usize, row: usize) -> f32 {
        self.data[self.index(col, row)]
    }

    /// Cell value, `None` for no-data cells. Panics if the cell is out of bounds
    pub fn get(&self, col: usize, row: usize) -> Option<f32> {
        let value = self.value(col, row);
        if self.is_nodata(value) {
            None
        } else {
            Some(value)
        }
    }

    /// Stores `value` in the cell if the cell holds no data yet or a smaller value
    pub fn update_max(&mut self, col: usize, row: usize, value: f32) {
        let index = self.index(col, row);
        let current = self.data[index];
        if self.is_nodata(current) || value > current {
            self.data[index] = value;
        }
    }

    /// Number of cells that hold a value
    pub fn valid_cell_count(&self) -> usize {
        self.data.iter().filter(|v| !self.is_nodata(**v)).count()
    }

    /// Returns true if no cell holds a value
    pub fn is_empty(&self) -> bool {
        self.valid_cell_count() == 0
    }

    fn index(&self, col: usize, row: usize) -> usize {
        assert!(
            col < self.grid.width && row < self.grid.height,
            "Cell ({}, {}) out of bounds for raster of size {}x{}",
            col,
            row,
            self.grid.width,
            self.grid.height
        );
        row * self.grid.width + col
    }
}
