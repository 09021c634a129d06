//! Cell enumeration for the replication lattice.
//!
//! Cells are numbered row-major with X outermost and Z innermost, matching
//!
//! ```text
//! for x in 0..nx { for y in 0..ny { for z in 0..nz { ... } } }
//! ```
//!
//! A cell's index decides which vertex block and which index block it owns in
//! the combined mesh, so this ordering is part of the public contract.

use nalgebra::Vector3;

/// One position in the replication lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Zero-based position in the row-major enumeration.
    pub index: usize,
    /// Grid coordinate along X.
    pub x: u32,
    /// Grid coordinate along Y.
    pub y: u32,
    /// Grid coordinate along Z.
    pub z: u32,
}

impl Cell {
    /// Translation applied to this cell's copy: `offset` scaled per axis by
    /// the cell coordinate.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_repeat::Cell;
    /// use nalgebra::Vector3;
    ///
    /// let cell = Cell { index: 5, x: 1, y: 0, z: 2 };
    /// let t = cell.translation(&Vector3::new(2.0, 3.0, 0.5));
    /// assert_eq!(t, Vector3::new(2.0, 0.0, 1.0));
    /// ```
    #[must_use]
    pub fn translation(&self, offset: &Vector3<f64>) -> Vector3<f64> {
        Vector3::new(
            offset.x * f64::from(self.x),
            offset.y * f64::from(self.y),
            offset.z * f64::from(self.z),
        )
    }
}

/// The `nx × ny × nz` lattice of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellGrid {
    counts: [u32; 3],
}

impl CellGrid {
    /// Creates a grid. Counts below 1 are raised to 1.
    #[must_use]
    pub fn new(counts: [u32; 3]) -> Self {
        Self {
            counts: counts.map(|c| c.max(1)),
        }
    }

    /// Axis counts.
    #[must_use]
    pub const fn counts(&self) -> [u32; 3] {
        self.counts
    }

    /// Total number of cells.
    ///
    /// Only meaningful when the product fits `usize`; the replicator checks
    /// capacity before building a grid.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        let [nx, ny, nz] = self.counts;
        nx as usize * ny as usize * nz as usize
    }

    /// Cell at an enumeration index, `None` when out of range.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_repeat::CellGrid;
    ///
    /// let grid = CellGrid::new([2, 3, 4]);
    /// let cell = grid.cell(13).unwrap();
    /// assert_eq!((cell.x, cell.y, cell.z), (1, 0, 1));
    /// ```
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    // Truncation: each coordinate is below its axis count, which is a u32
    pub fn cell(&self, index: usize) -> Option<Cell> {
        if index >= self.cell_count() {
            return None;
        }
        let [_, ny, nz] = self.counts;
        let (ny, nz) = (ny as usize, nz as usize);
        Some(Cell {
            index,
            x: (index / (ny * nz)) as u32,
            y: ((index / nz) % ny) as u32,
            z: (index % nz) as u32,
        })
    }

    /// Iterate over all cells in enumeration order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        let [nx, ny, nz] = self.counts;
        (0..nx)
            .flat_map(move |x| (0..ny).flat_map(move |y| (0..nz).map(move |z| (x, y, z))))
            .enumerate()
            .map(|(index, (x, y, z))| Cell { index, x, y, z })
    }
}
