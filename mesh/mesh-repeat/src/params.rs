//! Replication parameters.

use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest combined vertex count whose indices still fit in `u32`.
pub const DEFAULT_VERTEX_LIMIT: usize = u32::MAX as usize;

/// Default combined vertex count at which cell filling moves to the rayon pool.
pub const PARALLEL_THRESHOLD: usize = 16_384;

/// Configuration for [`replicate`](crate::replicate).
///
/// Axis counts below 1 are treated as 1. This is a normalization, not an
/// error: a count of 0 produces exactly the same result as a count of 1.
///
/// # Examples
///
/// ```
/// use mesh_repeat::RepeatParams;
/// use nalgebra::Vector3;
///
/// // Four copies along X, one unit apart
/// let params = RepeatParams::along_x(4, 1.0);
/// assert_eq!(params.counts(), [4, 1, 1]);
///
/// // A 3x2x2 block with different spacing per axis
/// let params = RepeatParams::new(3, 2, 2).with_offset(Vector3::new(2.0, 1.5, 1.0));
/// assert_eq!(params.cell_count(), 12);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RepeatParams {
    /// Number of copies along X.
    pub count_x: u32,

    /// Number of copies along Y.
    pub count_y: u32,

    /// Number of copies along Z.
    pub count_z: u32,

    /// Distance between adjacent copies on each axis.
    pub offset: Vector3<f64>,

    /// Ceiling on the combined vertex count.
    ///
    /// Values above [`DEFAULT_VERTEX_LIMIT`] are capped at it.
    pub vertex_limit: usize,

    /// Whether large replications may fill cells on the rayon pool.
    ///
    /// Output is identical either way.
    pub parallel: bool,

    /// Combined vertex count from which a parallel fill is used.
    pub parallel_threshold: usize,
}

impl Default for RepeatParams {
    fn default() -> Self {
        Self {
            count_x: 4,
            count_y: 1,
            count_z: 1,
            offset: Vector3::new(1.0, 1.0, 1.0),
            vertex_limit: DEFAULT_VERTEX_LIMIT,
            parallel: true,
            parallel_threshold: PARALLEL_THRESHOLD,
        }
    }
}

impl RepeatParams {
    /// Creates parameters with the given axis counts and unit spacing.
    #[must_use]
    pub fn new(count_x: u32, count_y: u32, count_z: u32) -> Self {
        Self {
            count_x,
            count_y,
            count_z,
            ..Default::default()
        }
    }

    /// Creates parameters for a single row along X.
    ///
    /// # Examples
    ///
    /// ```
    /// use mesh_repeat::RepeatParams;
    ///
    /// let params = RepeatParams::along_x(2, 1.0);
    /// assert_eq!(params.offset.x, 1.0);
    /// assert_eq!(params.offset.y, 0.0);
    /// ```
    #[must_use]
    pub fn along_x(count: u32, spacing: f64) -> Self {
        Self::new(count, 1, 1).with_offset(Vector3::new(spacing, 0.0, 0.0))
    }

    /// Sets the axis counts.
    #[must_use]
    pub const fn with_counts(mut self, count_x: u32, count_y: u32, count_z: u32) -> Self {
        self.count_x = count_x;
        self.count_y = count_y;
        self.count_z = count_z;
        self
    }

    /// Sets the per-axis spacing.
    #[must_use]
    pub const fn with_offset(mut self, offset: Vector3<f64>) -> Self {
        self.offset = offset;
        self
    }

    /// Sets the same spacing on every axis.
    #[must_use]
    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.offset = Vector3::repeat(spacing);
        self
    }

    /// Sets the vertex limit.
    #[must_use]
    pub const fn with_vertex_limit(mut self, limit: usize) -> Self {
        self.vertex_limit = limit;
        self
    }

    /// Enables or disables parallel cell filling.
    #[must_use]
    pub const fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the combined vertex count from which cells are filled in parallel.
    ///
    /// Has no effect while [`parallel`](Self::parallel) is off.
    #[must_use]
    pub const fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Axis counts after clamping to at least 1.
    ///
    /// # Examples
    ///
    /// ```
    /// use mesh_repeat::RepeatParams;
    ///
    /// assert_eq!(RepeatParams::new(0, 3, 0).counts(), [1, 3, 1]);
    /// ```
    #[must_use]
    pub fn counts(&self) -> [u32; 3] {
        [
            self.count_x.max(1),
            self.count_y.max(1),
            self.count_z.max(1),
        ]
    }

    /// Number of grid cells after clamping. Never overflows.
    #[must_use]
    pub fn cell_count(&self) -> u128 {
        self.counts().iter().map(|&c| u128::from(c)).product()
    }

    /// The vertex limit actually enforced.
    #[must_use]
    pub fn effective_vertex_limit(&self) -> usize {
        self.vertex_limit.min(DEFAULT_VERTEX_LIMIT)
    }

    /// Whether a replication producing `vertex_count` vertices fills in parallel.
    #[must_use]
    pub const fn fills_in_parallel(&self, vertex_count: usize) -> bool {
        self.parallel && vertex_count >= self.parallel_threshold
    }
}
