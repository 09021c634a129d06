//! Benchmarks for mesh-io operations.
//!
//! Run with: cargo bench -p mesh-io
//!
//! To compare against baseline:
//! 1. First run: cargo bench -p mesh-io -- --save-baseline main
//! 2. After changes: cargo bench -p mesh-io -- --baseline main

#![allow(clippy::expect_used)]

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use mesh_io::{load_mesh, save_mesh};
use mesh_types::{BufferMesh, Point2, Point3, Vector3, VertexColor};
use tempfile::tempdir;

// =============================================================================
// Test Mesh Generation
// =============================================================================

/// A wavy `n × n` quad grid carrying every channel PLY can store, split
/// into two submeshes by row parity.
fn create_terrain(n: u32) -> BufferMesh {
    let side = n + 1;
    let mut positions = Vec::new();
    let mut uvs = Vec::new();
    for j in 0..side {
        for i in 0..side {
            let (u, v) = (f64::from(i) / f64::from(n), f64::from(j) / f64::from(n));
            let h = (u * 12.0).sin() * (v * 9.0).cos() * 0.1;
            positions.push(Point3::new(u, h, v));
            uvs.push(Point2::new(u, v));
        }
    }
    let normals = vec![Vector3::y(); positions.len()];
    let colors = vec![VertexColor::GREEN; positions.len()];

    let mut even = Vec::new();
    let mut odd = Vec::new();
    for j in 0..n {
        let target = if j % 2 == 0 { &mut even } else { &mut odd };
        for i in 0..n {
            let a = j * side + i;
            let c = a + side;
            target.extend_from_slice(&[a, c, a + 1, a + 1, c, c + 1]);
        }
    }

    BufferMesh::from_positions(positions)
        .with_name("terrain")
        .with_uvs(uvs)
        .with_normals(normals)
        .with_colors(colors)
        .with_submesh(even)
        .with_submesh(odd)
}

// =============================================================================
// I/O Benchmarks
// =============================================================================

fn bench_io(c: &mut Criterion) {
    let mut group = c.benchmark_group("IO");

    let terrain = create_terrain(100); // 20k triangles
    let temp_dir = tempdir().expect("failed to create temp dir");

    let obj_path = temp_dir.path().join("bench_terrain.obj");
    let ply_path = temp_dir.path().join("bench_terrain.ply");

    save_mesh(&terrain, &obj_path).expect("failed to save OBJ");
    save_mesh(&terrain, &ply_path).expect("failed to save PLY");

    let triangles: usize = terrain.submeshes.iter().map(|s| s.len() / 3).sum();
    group.throughput(Throughput::Elements(triangles as u64));

    group.bench_function("load_obj", |b| b.iter(|| load_mesh(black_box(&obj_path))));

    group.bench_function("load_ply", |b| b.iter(|| load_mesh(black_box(&ply_path))));

    let out_obj = temp_dir.path().join("bench_out.obj");
    let out_ply = temp_dir.path().join("bench_out.ply");

    group.bench_function("save_obj", |b| {
        b.iter(|| save_mesh(black_box(&terrain), black_box(&out_obj)));
    });

    group.bench_function("save_ply", |b| {
        b.iter(|| save_mesh(black_box(&terrain), black_box(&out_ply)));
    });

    group.finish();
}

// =============================================================================
// Criterion Setup
// =============================================================================

criterion_group!(benches, bench_io);
criterion_main!(benches);
