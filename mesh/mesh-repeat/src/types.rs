//! Replication output.

use std::ops::Range;

use mesh_types::{Aabb, BufferMesh, MeshTopology};

use crate::collider::{BoxVolume, derive_box_volume};
use crate::grid::CellGrid;

/// Result of [`replicate`](crate::replicate): the combined mesh and its
/// bounds.
///
/// Freshly allocated on every call; nothing aliases the source mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct Replication {
    /// The combined mesh.
    pub mesh: BufferMesh,

    /// Bounds of every combined position.
    pub bounds: Aabb,

    /// Axis counts used, after clamping.
    pub counts: [u32; 3],

    /// Vertices contributed by each cell.
    pub source_vertex_count: usize,
}

impl Replication {
    /// Number of vertices in the combined mesh.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.mesh.vertex_count()
    }

    /// Number of cells that were emitted.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        CellGrid::new(self.counts).cell_count()
    }

    /// The grid the mesh was replicated over.
    #[must_use]
    pub fn grid(&self) -> CellGrid {
        CellGrid::new(self.counts)
    }

    /// Range of combined vertices written for a cell, `None` if the cell
    /// index is out of range.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_repeat::{replicate, RepeatParams};
    /// use mesh_types::unit_cube;
    ///
    /// let result = replicate(&unit_cube(), &RepeatParams::along_x(3, 1.0)).unwrap();
    /// assert_eq!(result.cell_vertex_range(1), Some(8..16));
    /// assert_eq!(result.cell_vertex_range(3), None);
    /// ```
    #[must_use]
    pub fn cell_vertex_range(&self, cell: usize) -> Option<Range<usize>> {
        if cell >= self.cell_count() {
            return None;
        }
        let start = cell * self.source_vertex_count;
        Some(start..start + self.source_vertex_count)
    }

    /// Collider box enclosing the combined mesh.
    #[must_use]
    pub fn box_volume(&self) -> BoxVolume {
        derive_box_volume(&self.bounds)
    }

    /// Consume the result, keeping only the mesh.
    #[must_use]
    pub fn into_mesh(self) -> BufferMesh {
        self.mesh
    }
}
