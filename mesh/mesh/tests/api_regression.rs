//! API Regression Tests for the repeat-mesh crates
//!
//! These tests serve as a regression suite to ensure the public API remains
//! stable and consistent across the mesh crates. They are organized in 4
//! tiers of increasing scope:
//!
//! - Tier 1: Foundation (mesh-types)
//! - Tier 2: Replication (mesh-repeat core)
//! - Tier 3: Rebuild driver and colliders (mesh-repeat driver)
//! - Tier 4: Persistence of replicated meshes (mesh-io)
//!
//! If any of these tests fail after API changes, it indicates a breaking change
//! that needs documentation in CHANGELOG.md and a version bump.

// Allow test-specific patterns
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::cast_possible_truncation)]

use approx::assert_relative_eq;
use mesh::{io, prelude::*, repeat, types};

/// A two-material quad with every channel set.
fn painted_quad() -> BufferMesh {
    BufferMesh::from_positions(vec![
        types::Point3::new(0.0, 0.0, 0.0),
        types::Point3::new(1.0, 0.0, 0.0),
        types::Point3::new(1.0, 1.0, 0.0),
        types::Point3::new(0.0, 1.0, 0.0),
    ])
    .with_name("quad")
    .with_uvs(vec![
        types::Point2::new(0.0, 0.0),
        types::Point2::new(1.0, 0.0),
        types::Point2::new(1.0, 1.0),
        types::Point2::new(0.0, 1.0),
    ])
    .with_normals(vec![types::Vector3::z(); 4])
    .with_tangents(vec![types::Vector4::new(1.0, 0.0, 0.0, 1.0); 4])
    .with_colors(vec![VertexColor::BLUE; 4])
    .with_submesh(vec![0, 1, 2])
    .with_submesh(vec![0, 2, 3])
}

// =============================================================================
// TIER 1: Foundation - Basic Types
// =============================================================================

mod tier1_foundation {
    use super::*;

    #[test]
    fn buffer_mesh_construction() {
        let mesh = BufferMesh::new();
        assert!(mesh.is_empty());
        assert_eq!(mesh.submesh_count(), 0);

        let quad = painted_quad();
        assert_eq!(quad.vertex_count(), 4);
        assert_eq!(quad.submesh_count(), 2);
        assert_eq!(quad.triangle_count(), 2);
        assert_eq!(quad.present_attributes().count(), 5);
    }

    #[test]
    fn primitive_unit_cube() {
        let cube = types::unit_cube();
        assert_eq!(cube.vertex_count(), 8);
        assert_eq!(cube.index_count(), 36);
        assert_eq!(cube.triangles().count(), 12);
    }

    #[test]
    fn mesh_bounds_calculation() {
        let bounds = types::unit_cube().bounds();
        assert_relative_eq!(bounds.min, types::Point3::origin());
        assert_relative_eq!(bounds.max, types::Point3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(bounds.center(), types::Point3::new(0.5, 0.5, 0.5));
    }

    #[test]
    fn attribute_names() {
        let names: Vec<_> = VertexAttribute::ALL.iter().map(|a| a.name()).collect();
        assert_eq!(names, ["positions", "uvs", "normals", "tangents", "colors"]);
    }
}

// =============================================================================
// TIER 2: Replication
// =============================================================================

mod tier2_replication {
    use super::*;

    #[test]
    fn params_defaults_and_builders() {
        let params = RepeatParams::default();
        assert_eq!(params.counts(), [4, 1, 1]);
        assert_relative_eq!(params.offset, types::Vector3::new(1.0, 1.0, 1.0));

        let params = RepeatParams::new(2, 3, 4)
            .with_offset(types::Vector3::new(1.0, 2.0, 3.0))
            .with_vertex_limit(1_000)
            .with_parallel(false)
            .with_parallel_threshold(0);
        assert_eq!(params.cell_count(), 24);
        assert_eq!(params.effective_vertex_limit(), 1_000);
        assert!(!params.fills_in_parallel(24));
    }

    #[test]
    fn unit_cube_two_by_one_by_one() {
        let params = RepeatParams::new(2, 1, 1).with_offset(types::Vector3::new(1.0, 0.0, 0.0));
        let result = replicate(&types::unit_cube(), &params).unwrap();

        assert_eq!(result.mesh.positions.len(), 16);
        assert_eq!(result.mesh.index_count(), 72);
        let indices = result.mesh.submesh(0).unwrap();
        for k in 0..36 {
            assert_eq!(indices[36 + k], indices[k] + 8);
        }
        assert_relative_eq!(result.bounds.min, types::Point3::origin());
        assert_relative_eq!(result.bounds.max, types::Point3::new(2.0, 1.0, 1.0));
    }

    #[test]
    fn every_channel_is_tiled() {
        let quad = painted_quad();
        let result = replicate(&quad, &RepeatParams::new(2, 2, 1)).unwrap();

        assert_eq!(result.vertex_count(), 16);
        assert_eq!(result.mesh.submesh_count(), 2);
        for attribute in VertexAttribute::ALL {
            assert_eq!(result.mesh.attribute_len(attribute), Some(16), "{attribute}");
        }
        assert_eq!(result.mesh.colors.as_ref().unwrap()[13], VertexColor::BLUE);
        assert_eq!(result.mesh.uvs.as_ref().unwrap()[6], quad.uvs.as_ref().unwrap()[2]);
    }

    #[test]
    fn empty_channel_is_dropped() {
        let mut quad = painted_quad();
        quad.normals = Some(Vec::new());
        let result = replicate(&quad, &RepeatParams::new(2, 1, 1)).unwrap();
        assert!(result.mesh.normals.is_none());
        assert_eq!(result.mesh.attribute_len(VertexAttribute::Uv), Some(8));
    }

    #[test]
    fn grid_enumeration_is_public() {
        let grid = repeat::CellGrid::new([2, 1, 3]);
        let last = grid.cells().last().unwrap();
        assert_eq!((last.index, last.x, last.y, last.z), (5, 1, 0, 2));
        assert!(repeat::PARALLEL_THRESHOLD > 0);
    }
}

// =============================================================================
// TIER 3: Rebuild Driver and Colliders
// =============================================================================

mod tier3_driver {
    use super::*;

    #[test]
    fn repeater_lifecycle() {
        let source = painted_quad();
        let mut repeater = Repeater::new("Tiles");
        repeater.set_settings(RepeatSettings::new(RepeatParams::new(3, 1, 3)));

        assert_eq!(repeater.rebuild(&source).unwrap(), RebuildOutcome::Rebuilt);
        assert_eq!(repeater.rebuild(&source).unwrap(), RebuildOutcome::Unchanged);

        let locked = repeater.settings().clone().with_lock(true);
        repeater.set_settings(locked);
        repeater.mark_source_changed();
        assert_eq!(repeater.rebuild(&source).unwrap(), RebuildOutcome::Locked);

        let output = repeater.output().unwrap();
        assert_eq!(output.mesh.name.as_deref(), Some("Tiles_mesh"));
        assert_eq!(output.mesh.vertex_count(), 36);
    }

    #[test]
    fn collider_box_from_output() {
        let mut repeater = Repeater::new("Crates");
        repeater.set_settings(
            RepeatSettings::new(RepeatParams::new(2, 2, 2).with_spacing(1.0))
                .with_box_collider(true),
        );
        repeater.rebuild(&types::unit_cube()).unwrap();

        let BoxVolume { center, size } = repeater.output().unwrap().box_volume.unwrap();
        assert_relative_eq!(center, types::Point3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(size, types::Vector3::new(2.0, 2.0, 2.0));
    }
}

// =============================================================================
// TIER 4: Persistence of Replicated Meshes
// =============================================================================

mod tier4_persistence {
    use super::*;

    fn replicated_quad() -> BufferMesh {
        let mut repeater = Repeater::new("Floor");
        repeater.set_settings(RepeatSettings::new(RepeatParams::new(3, 1, 2)));
        repeater.rebuild(&painted_quad()).unwrap();
        repeater.take_output().unwrap().mesh
    }

    #[test]
    fn formats_preserve_submesh_structure() {
        let mesh = replicated_quad();
        let dir = tempfile::tempdir().unwrap();

        for file in ["floor.obj", "floor.ply"] {
            let path = dir.path().join(file);
            save_mesh(&mesh, &path).unwrap();
            let loaded = load_mesh(&path).unwrap();

            assert_eq!(loaded.name, mesh.name, "{file}");
            assert_eq!(loaded.vertex_count(), mesh.vertex_count(), "{file}");
            assert_eq!(loaded.submeshes, mesh.submeshes, "{file}");
            assert!(loaded.tangents.is_none(), "{file}");
            for (a, b) in loaded.positions.iter().zip(&mesh.positions) {
                assert_relative_eq!(*a, *b, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn ascii_ply_matches_binary() {
        let mesh = replicated_quad();
        let dir = tempfile::tempdir().unwrap();
        let ascii = dir.path().join("ascii.ply");
        let binary = dir.path().join("binary.ply");

        io::save_ply(&mesh, &ascii, false).unwrap();
        io::save_ply(&mesh, &binary, true).unwrap();

        assert_eq!(io::load_ply(&ascii).unwrap(), io::load_ply(&binary).unwrap());
    }

    #[test]
    fn asset_library_names_file_after_owner() {
        let dir = tempfile::tempdir().unwrap();
        let library = AssetLibrary::new(dir.path());

        let path = library.save(&replicated_quad(), MeshFormat::Obj).unwrap();
        assert_eq!(path, library.folder().join("Floor_mesh.obj"));
        assert_eq!(load_mesh(&path).unwrap().vertex_count(), 24);
    }
}

// =============================================================================
// Error Handling
// =============================================================================

mod error_handling {
    use super::*;
    use mesh::repeat::{RepeatErrorKind, SourceDefect};

    #[test]
    fn empty_source_is_invalid() {
        let err = replicate(&BufferMesh::new(), &RepeatParams::default()).unwrap_err();
        assert_eq!(err.kind(), RepeatErrorKind::InvalidSource);
        assert_eq!(err, RepeatError::InvalidSource(SourceDefect::NoVertices));
    }

    #[test]
    fn oversized_grid_is_rejected() {
        let params = RepeatParams::new(u32::MAX, u32::MAX, 2);
        let err = replicate(&types::unit_cube(), &params).unwrap_err();
        assert_eq!(err.kind(), RepeatErrorKind::CapacityExceeded);
    }

    #[test]
    fn unknown_extension() {
        let err = load_mesh("model.stl").unwrap_err();
        assert!(matches!(err, io::IoError::UnknownFormat { .. }));
    }
}
