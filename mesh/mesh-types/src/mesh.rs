//! Attribute-buffer mesh with submeshes.

use crate::{Aabb, MeshBounds, MeshTopology, VertexAttribute, VertexColor};
use nalgebra::{Point2, Point3, Vector3, Vector4};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A mesh stored as parallel per-vertex attribute buffers plus one triangle
/// index list per submesh.
///
/// # Memory Layout
///
/// - `positions`: `Vec<Point3<f64>>` - one entry per vertex, always present
/// - `uvs`, `normals`, `tangents`, `colors`: `Option<Vec<_>>` - `None` when the
///   channel is absent, otherwise exactly one entry per vertex
/// - `submeshes`: `Vec<Vec<u32>>` - triangle lists indexing the shared buffers
///
/// An absent channel is different from a zero-filled one. Builders store
/// `None` when handed an empty vector so the two states never blur.
///
/// # Example
///
/// ```
/// use mesh_types::{BufferMesh, MeshTopology, Point3, Vector3};
///
/// let mesh = BufferMesh::from_positions(vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ])
/// .with_normals(vec![Vector3::z(); 3])
/// .with_submesh(vec![0, 1, 2]);
///
/// assert_eq!(mesh.vertex_count(), 3);
/// assert_eq!(mesh.submesh_count(), 1);
/// assert!(mesh.uvs.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BufferMesh {
    /// Optional name hint, used when the mesh is saved as an asset.
    pub name: Option<String>,

    /// Vertex positions.
    pub positions: Vec<Point3<f64>>,

    /// Texture coordinates.
    pub uvs: Option<Vec<Point2<f64>>>,

    /// Vertex normals.
    pub normals: Option<Vec<Vector3<f64>>>,

    /// Tangents; `w` carries the bitangent sign.
    pub tangents: Option<Vec<Vector4<f64>>>,

    /// Vertex colors.
    pub colors: Option<Vec<VertexColor>>,

    /// Triangle index lists, one per submesh.
    pub submeshes: Vec<Vec<u32>>,
}

fn non_empty<T>(values: Vec<T>) -> Option<Vec<T>> {
    if values.is_empty() { None } else { Some(values) }
}

impl BufferMesh {
    /// Create a new empty mesh.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            name: None,
            positions: Vec::new(),
            uvs: None,
            normals: None,
            tangents: None,
            colors: None,
            submeshes: Vec::new(),
        }
    }

    /// Create a mesh with room for `vertex_count` positions and
    /// `submesh_count` empty submeshes.
    #[must_use]
    pub fn with_capacity(vertex_count: usize, submesh_count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertex_count),
            submeshes: vec![Vec::new(); submesh_count],
            ..Self::new()
        }
    }

    /// Create a mesh holding only positions and no submeshes.
    #[must_use]
    pub fn from_positions(positions: Vec<Point3<f64>>) -> Self {
        Self {
            positions,
            ..Self::new()
        }
    }

    /// Set the name hint.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set texture coordinates. An empty vector clears the channel.
    #[must_use]
    pub fn with_uvs(mut self, uvs: Vec<Point2<f64>>) -> Self {
        self.uvs = non_empty(uvs);
        self
    }

    /// Set normals. An empty vector clears the channel.
    #[must_use]
    pub fn with_normals(mut self, normals: Vec<Vector3<f64>>) -> Self {
        self.normals = non_empty(normals);
        self
    }

    /// Set tangents. An empty vector clears the channel.
    #[must_use]
    pub fn with_tangents(mut self, tangents: Vec<Vector4<f64>>) -> Self {
        self.tangents = non_empty(tangents);
        self
    }

    /// Set vertex colors. An empty vector clears the channel.
    #[must_use]
    pub fn with_colors(mut self, colors: Vec<VertexColor>) -> Self {
        self.colors = non_empty(colors);
        self
    }

    /// Append a submesh index list.
    #[must_use]
    pub fn with_submesh(mut self, indices: Vec<u32>) -> Self {
        self.submeshes.push(indices);
        self
    }

    /// Index list of one submesh.
    #[inline]
    #[must_use]
    pub fn submesh(&self, index: usize) -> Option<&[u32]> {
        self.submeshes.get(index).map(Vec::as_slice)
    }

    /// Length of an attribute channel, `None` when the channel is absent.
    ///
    /// Positions are always reported, even when there are none.
    #[must_use]
    pub fn attribute_len(&self, attribute: VertexAttribute) -> Option<usize> {
        match attribute {
            VertexAttribute::Position => Some(self.positions.len()),
            VertexAttribute::Uv => self.uvs.as_ref().map(Vec::len),
            VertexAttribute::Normal => self.normals.as_ref().map(Vec::len),
            VertexAttribute::Tangent => self.tangents.as_ref().map(Vec::len),
            VertexAttribute::Color => self.colors.as_ref().map(Vec::len),
        }
    }

    /// Check whether an attribute channel is present.
    #[inline]
    #[must_use]
    pub fn has_attribute(&self, attribute: VertexAttribute) -> bool {
        self.attribute_len(attribute).is_some()
    }

    /// Iterate over the channels that are present, positions first.
    pub fn present_attributes(&self) -> impl Iterator<Item = VertexAttribute> + '_ {
        VertexAttribute::ALL
            .into_iter()
            .filter(|attribute| self.has_attribute(*attribute))
    }

    /// Iterate over every submesh's triangles as index triples.
    ///
    /// A trailing partial triangle is skipped.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.submeshes
            .iter()
            .flat_map(|indices| indices.chunks_exact(3).map(|c| [c[0], c[1], c[2]]))
    }
}

impl MeshTopology for BufferMesh {
    #[inline]
    fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    fn submesh_count(&self) -> usize {
        self.submeshes.len()
    }

    fn index_count(&self) -> usize {
        self.submeshes.iter().map(Vec::len).sum()
    }
}

impl MeshBounds for BufferMesh {
    fn bounds(&self) -> Aabb {
        Aabb::from_points(self.positions.iter())
    }
}

/// Create a unit cube from (0,0,0) to (1,1,1).
///
/// Eight shared corners and a single submesh of 12 triangles (36 indices),
/// counter-clockwise when viewed from outside.
///
/// # Example
///
/// ```
/// use mesh_types::{unit_cube, MeshTopology};
///
/// let cube = unit_cube();
/// assert_eq!(cube.vertex_count(), 8);
/// assert_eq!(cube.index_count(), 36);
/// ```
#[must_use]
pub fn unit_cube() -> BufferMesh {
    let positions = vec![
        Point3::new(0.0, 0.0, 0.0), // 0
        Point3::new(1.0, 0.0, 0.0), // 1
        Point3::new(1.0, 1.0, 0.0), // 2
        Point3::new(0.0, 1.0, 0.0), // 3
        Point3::new(0.0, 0.0, 1.0), // 4
        Point3::new(1.0, 0.0, 1.0), // 5
        Point3::new(1.0, 1.0, 1.0), // 6
        Point3::new(0.0, 1.0, 1.0), // 7
    ];

    let indices = vec![
        0, 2, 1, 0, 3, 2, // bottom (-Z)
        4, 5, 6, 4, 6, 7, // top (+Z)
        0, 1, 5, 0, 5, 4, // front (-Y)
        3, 7, 6, 3, 6, 2, // back (+Y)
        0, 4, 7, 0, 7, 3, // left (-X)
        1, 2, 6, 1, 6, 5, // right (+X)
    ];

    BufferMesh::from_positions(positions)
        .with_name("unit_cube")
        .with_submesh(indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_mesh_is_empty() {
        let mesh = BufferMesh::new();
        assert!(mesh.is_empty());
        assert_eq!(mesh.submesh_count(), 0);
        assert_eq!(mesh, BufferMesh::default());
    }

    #[test]
    fn with_capacity_creates_empty_submeshes() {
        let mesh = BufferMesh::with_capacity(16, 3);
        assert_eq!(mesh.submesh_count(), 3);
        assert_eq!(mesh.index_count(), 0);
        assert!(mesh.positions.capacity() >= 16);
    }

    #[test]
    fn empty_attribute_vectors_become_absent() {
        let mesh = BufferMesh::from_positions(vec![Point3::origin()])
            .with_uvs(Vec::new())
            .with_normals(vec![Vector3::y()])
            .with_colors(Vec::new());

        assert!(mesh.uvs.is_none());
        assert!(mesh.colors.is_none());
        assert_eq!(mesh.attribute_len(VertexAttribute::Normal), Some(1));
        assert_eq!(mesh.attribute_len(VertexAttribute::Tangent), None);
    }

    #[test]
    fn present_attributes_lists_channels_in_order() {
        let mesh = BufferMesh::from_positions(vec![Point3::origin()])
            .with_tangents(vec![Vector4::new(1.0, 0.0, 0.0, 1.0)])
            .with_uvs(vec![Point2::new(0.5, 0.5)]);

        let present: Vec<_> = mesh.present_attributes().collect();
        assert_eq!(
            present,
            vec![
                VertexAttribute::Position,
                VertexAttribute::Uv,
                VertexAttribute::Tangent
            ]
        );
    }

    #[test]
    fn unit_cube_shape() {
        let cube = unit_cube();
        assert_eq!(cube.vertex_count(), 8);
        assert_eq!(cube.submesh_count(), 1);
        assert_eq!(cube.index_count(), 36);
        assert_eq!(cube.triangle_count(), 12);
        assert!(cube.triangles().flatten().all(|i| i < 8));
        assert_eq!(cube.name.as_deref(), Some("unit_cube"));
    }

    #[test]
    fn mesh_bounds() {
        let mesh = BufferMesh::from_positions(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(10.0, 5.0, 3.0),
            Point3::new(-2.0, 8.0, 1.0),
        ]);

        let bounds = mesh.bounds();
        assert_eq!(bounds.min, Point3::new(-2.0, 0.0, 0.0));
        assert_eq!(bounds.max, Point3::new(10.0, 8.0, 3.0));
        assert!(BufferMesh::new().bounds_opt().is_none());
    }

    #[test]
    fn submesh_lookup() {
        let mesh = unit_cube().with_submesh(Vec::new());
        assert_eq!(mesh.submesh(1), Some(&[][..]));
        assert!(mesh.submesh(2).is_none());
        assert_eq!(mesh.submesh(0).map(<[u32]>::len), Some(36));
    }
}
