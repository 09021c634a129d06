//! Traits for mesh types.

use crate::Aabb;
use nalgebra::Point3;

/// Trait for types that expose submesh topology counts.
///
/// Lets replication, I/O and tests size buffers without caring about the
/// concrete mesh representation.
pub trait MeshTopology {
    /// Number of vertices.
    fn vertex_count(&self) -> usize;

    /// Number of submeshes (index lists).
    fn submesh_count(&self) -> usize;

    /// Total number of indices across all submeshes.
    fn index_count(&self) -> usize;

    /// Number of whole triangles across all submeshes.
    fn triangle_count(&self) -> usize {
        self.index_count() / 3
    }

    /// Check if the mesh has no vertices.
    fn is_empty(&self) -> bool {
        self.vertex_count() == 0
    }
}

/// Trait for types that can compute a bounding box.
pub trait MeshBounds {
    /// Compute the axis-aligned bounding box.
    ///
    /// Returns an empty AABB if the mesh has no vertices.
    fn bounds(&self) -> Aabb;

    /// Compute the bounding box, returning `None` if empty.
    fn bounds_opt(&self) -> Option<Aabb> {
        let b = self.bounds();
        if b.is_empty() { None } else { Some(b) }
    }

    /// Get the center of the bounding box.
    fn center(&self) -> Point3<f64> {
        self.bounds().center()
    }
}
