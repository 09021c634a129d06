//! Grid-repeated meshes for level and prop building.
//!
//! This umbrella crate re-exports the mesh-* crates behind one API. All of
//! them are Layer 0 (no engine dependencies) and can be used from editor
//! tooling, CLI tools, or servers.
//!
//! # Quick Start
//!
//! ```no_run
//! use mesh::prelude::*;
//!
//! // Load a fence post
//! let post = mesh::io::load_mesh("post.obj").unwrap();
//!
//! // Ten posts along X, two units apart, with a collider box
//! let mut repeater = Repeater::new("Fence");
//! repeater.set_settings(
//!     RepeatSettings::new(RepeatParams::along_x(10, 2.0)).with_box_collider(true),
//! );
//! repeater.rebuild(&post).unwrap();
//!
//! // Store the combined mesh as RepeatMesh/Fence_mesh.ply
//! let output = repeater.output().unwrap();
//! AssetLibrary::new("assets").save(&output.mesh, MeshFormat::Ply).unwrap();
//! ```
//!
//! # Module Organization
//!
//! - [`types`] - Core data structures: `BufferMesh`, `VertexColor`, `Aabb`
//! - [`repeat`] - Grid replication, rebuild driver, collider boxes
//! - [`io`] - OBJ and PLY files, named asset library

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

// =============================================================================
// Re-exports
// =============================================================================

/// Core data structures: `BufferMesh`, `VertexColor`, `Aabb`.
pub use mesh_types as types;

/// Grid replication, rebuild driver, collider boxes.
pub use mesh_repeat as repeat;

/// OBJ and PLY files, named asset library.
pub use mesh_io as io;

// =============================================================================
// Prelude
// =============================================================================

/// Common imports for repeated meshes.
///
/// # Usage
///
/// ```
/// use mesh::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use mesh_types::{Aabb, BufferMesh, MeshBounds, MeshTopology, VertexAttribute, VertexColor};

    // Replication
    pub use mesh_repeat::{
        BoxVolume, RebuildOutcome, RepeatError, RepeatParams, RepeatSettings, Repeater,
        Replication, replicate,
    };

    // I/O
    pub use mesh_io::{AssetLibrary, MeshFormat, load_mesh, save_mesh};
}

// =============================================================================
// Tests
// =============================================================================
