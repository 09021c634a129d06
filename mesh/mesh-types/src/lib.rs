//! Core mesh types for the repeat-mesh toolkit.
//!
//! This crate provides the data model shared by replication and I/O:
//!
//! - [`BufferMesh`] - Parallel per-vertex attribute buffers with submeshes
//! - [`VertexAttribute`] - Names the attribute channels
//! - [`VertexColor`] - RGBA vertex color
//! - [`Aabb`] - Axis-aligned bounding box
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero engine dependencies**. It can be used in:
//! - Editor tooling
//! - CLI tools
//! - Web applications (WASM)
//! - Other game engines
//!
//! # Attribute Presence
//!
//! Every channel except positions is optional. `None` means the source mesh
//! never had that channel; a present channel has exactly one entry per
//! vertex. Consumers rely on this to tell "no tangents" from "all-zero
//! tangents".
//!
//! # Example
//!
//! ```
//! use mesh_types::{BufferMesh, MeshBounds, MeshTopology, Point3};
//!
//! let mesh = BufferMesh::from_positions(vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ])
//! .with_submesh(vec![0, 1, 2]);
//!
//! assert_eq!(mesh.triangle_count(), 1);
//! assert_eq!(mesh.bounds().max, Point3::new(1.0, 1.0, 0.0));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod bounds;
mod mesh;
mod traits;
mod vertex;

pub use bounds::Aabb;
pub use mesh::{BufferMesh, unit_cube};
pub use traits::{MeshBounds, MeshTopology};
pub use vertex::{VertexAttribute, VertexColor};

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector3, Vector4};
