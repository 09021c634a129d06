//! Property-based tests for grid replication.
//!
//! Run with: cargo test -p mesh-repeat -- proptest

#![allow(clippy::unwrap_used, clippy::cast_possible_truncation)]

use approx::assert_relative_eq;
use mesh_repeat::{RepeatParams, replicate};
use mesh_types::{Aabb, BufferMesh, MeshBounds, MeshTopology, Point2, Point3, Vector3};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

fn arb_position() -> impl Strategy<Value = Point3<f64>> {
    prop::array::uniform3(-50.0..50.0f64).prop_map(|[x, y, z]| Point3::new(x, y, z))
}

/// A mesh with valid indices, 1-3 submeshes, and UVs on some draws.
fn arb_mesh() -> impl Strategy<Value = BufferMesh> {
    (1usize..=12).prop_flat_map(|vertex_count| {
        let positions = prop::collection::vec(arb_position(), vertex_count);
        let n = vertex_count as u32;
        let triangle = prop::array::uniform3(0..n);
        let submesh = prop::collection::vec(triangle, 0..8)
            .prop_map(|tris| tris.into_iter().flatten().collect::<Vec<u32>>());
        let submeshes = prop::collection::vec(submesh, 1..=3);
        let with_uvs = any::<bool>();

        (positions, submeshes, with_uvs).prop_map(|(positions, submeshes, with_uvs)| {
            let uvs: Vec<Point2<f64>> = (0..positions.len())
                .map(|i| Point2::new(i as f64, 0.5))
                .collect();
            let mut mesh = BufferMesh::from_positions(positions);
            if with_uvs {
                mesh = mesh.with_uvs(uvs);
            }
            for indices in submeshes {
                mesh = mesh.with_submesh(indices);
            }
            mesh
        })
    })
}

fn arb_params() -> impl Strategy<Value = RepeatParams> {
    (
        prop::array::uniform3(0u32..=4),
        prop::array::uniform3(-3.0..3.0f64),
        any::<bool>(),
    )
        .prop_map(|([x, y, z], [ox, oy, oz], parallel)| {
            RepeatParams::new(x, y, z)
                .with_offset(Vector3::new(ox, oy, oz))
                .with_parallel(parallel)
        })
}

// =============================================================================
// Property Tests: Sizes
// =============================================================================

proptest! {
    /// Every buffer grows by exactly the number of cells.
    #[test]
    fn sizes_scale_with_cell_count(mesh in arb_mesh(), params in arb_params()) {
        let result = replicate(&mesh, &params).unwrap();
        let cells = params.cell_count() as usize;

        prop_assert_eq!(result.vertex_count(), mesh.vertex_count() * cells);
        prop_assert_eq!(result.mesh.submesh_count(), mesh.submesh_count());
        for (out, src) in result.mesh.submeshes.iter().zip(&mesh.submeshes) {
            prop_assert_eq!(out.len(), src.len() * cells);
        }
        prop_assert_eq!(
            result.mesh.uvs.as_ref().map(Vec::len),
            mesh.uvs.as_ref().map(|uvs| uvs.len() * cells)
        );
    }

    /// Rebased indices always land inside the combined vertex buffer.
    #[test]
    fn indices_stay_in_range(mesh in arb_mesh(), params in arb_params()) {
        let result = replicate(&mesh, &params).unwrap();
        let vertex_count = result.vertex_count() as u32;
        for submesh in &result.mesh.submeshes {
            for &index in submesh {
                prop_assert!(index < vertex_count, "index {} >= {}", index, vertex_count);
            }
        }
    }
}

// =============================================================================
// Property Tests: Per-cell content
// =============================================================================

proptest! {
    /// Each cell holds the source translated by its grid offset, and its
    /// index block is the source block shifted by the cell's vertex base.
    #[test]
    fn cells_are_translated_copies(mesh in arb_mesh(), params in arb_params()) {
        let result = replicate(&mesh, &params).unwrap();
        let v = mesh.vertex_count();

        for cell in result.grid().cells() {
            let t = cell.translation(&params.offset);
            let range = result.cell_vertex_range(cell.index).unwrap();
            for (out, src) in result.mesh.positions[range].iter().zip(&mesh.positions) {
                prop_assert_eq!(*out, *src + t);
            }

            let base = (cell.index * v) as u32;
            for (out, src) in result.mesh.submeshes.iter().zip(&mesh.submeshes) {
                let block = &out[cell.index * src.len()..(cell.index + 1) * src.len()];
                for (a, b) in block.iter().zip(src) {
                    prop_assert_eq!(*a, *b + base);
                }
            }
        }
    }

    /// Bounds enclose every combined position and equal the union of the
    /// translated source bounds.
    #[test]
    fn bounds_cover_all_copies(mesh in arb_mesh(), params in arb_params()) {
        let result = replicate(&mesh, &params).unwrap();
        for p in &result.mesh.positions {
            prop_assert!(result.bounds.contains(p));
        }

        let source_bounds = mesh.bounds();
        let expected = result
            .grid()
            .cells()
            .map(|cell| source_bounds.translated(cell.translation(&params.offset)))
            .fold(Aabb::empty(), |acc, b| acc.union(&b));
        assert_relative_eq!(result.bounds.min, expected.min, epsilon = 1e-9);
        assert_relative_eq!(result.bounds.max, expected.max, epsilon = 1e-9);
    }

    /// Zero counts behave exactly like one.
    #[test]
    fn zero_count_matches_one(mesh in arb_mesh(), params in arb_params()) {
        let [x, y, z] = params.counts();
        let raised = params.clone().with_counts(x.max(1), y.max(1), z.max(1));
        prop_assert_eq!(
            replicate(&mesh, &params).unwrap(),
            replicate(&mesh, &raised).unwrap()
        );
    }

    /// Parallel and sequential fills agree bit for bit.
    #[test]
    fn parallel_matches_sequential(mesh in arb_mesh(), params in arb_params()) {
        let on_pool = params.clone().with_parallel(true).with_parallel_threshold(0);
        let vertices = params.cell_count() as usize * mesh.vertex_count();
        prop_assert!(on_pool.fills_in_parallel(vertices));

        let seq = replicate(&mesh, &params.with_parallel(false)).unwrap();
        let par = replicate(&mesh, &on_pool).unwrap();
        prop_assert_eq!(seq, par);
    }
}
