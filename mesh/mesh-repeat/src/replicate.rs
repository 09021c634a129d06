//! The replication pipeline.
//!
//! Three stages run in order:
//!
//! 1. attribute concatenation: one translated copy of the positions and a
//!    verbatim copy of every present attribute per cell
//! 2. index rebasing: every submesh list repeated per cell, shifted by
//!    `cell_index * source_vertex_count`
//! 3. bounds over the full combined position buffer
//!
//! Every output buffer is allocated at its final size and each cell writes
//! its own block by computed offset, so cells can be filled concurrently
//! without changing the result.

// Vertex and index counts are bounded by the vertex limit, which fits both
// usize and u32, before any of these casts run.
#![allow(clippy::cast_possible_truncation)]

use mesh_types::{Aabb, BufferMesh, MeshTopology, VertexAttribute};
use nalgebra::{Point3, Vector3};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::{RepeatError, RepeatResult, SourceDefect};
use crate::grid::CellGrid;
use crate::params::RepeatParams;
use crate::types::Replication;

/// Replicates a mesh over a grid of cells.
///
/// Each cell `(x, y, z)` receives a copy of the source translated by
/// `(offset.x * x, offset.y * y, offset.z * z)`. UVs, normals, tangents and
/// colors are copied unchanged. Submesh count and order are preserved; the
/// copy of submesh `s` in cell `c` holds the source indices plus
/// `c * source_vertex_count`.
///
/// The function is pure: the source is never modified and identical inputs
/// give identical output.
///
/// # Arguments
///
/// * `source` - The mesh to replicate
/// * `params` - Grid counts (clamped to at least 1) and spacing
///
/// # Errors
///
/// - [`RepeatError::InvalidSource`] if the source has no vertices, a present
///   attribute channel has the wrong length, or an index is out of range
/// - [`RepeatError::CapacityExceeded`] if the combined vertex count would
///   exceed the vertex limit, in which case nothing is allocated, or if the
///   output buffers cannot be allocated
///
/// # Examples
///
/// ```
/// use mesh_repeat::{replicate, RepeatParams};
/// use mesh_types::{unit_cube, MeshTopology};
///
/// let result = replicate(&unit_cube(), &RepeatParams::along_x(2, 1.0)).unwrap();
///
/// assert_eq!(result.mesh.vertex_count(), 16);
/// assert_eq!(result.mesh.submeshes[0].len(), 72);
/// assert_eq!(result.bounds.max.x, 2.0);
/// ```
pub fn replicate(source: &BufferMesh, params: &RepeatParams) -> RepeatResult<Replication> {
    validate_source(source)?;

    let source_vertex_count = source.vertex_count();
    let counts = params.counts();
    let limit = params.effective_vertex_limit();
    let requested = params.cell_count() * source_vertex_count as u128;
    let capacity = Capacity { requested, limit };
    if requested > limit as u128 {
        return Err(capacity.exceeded());
    }

    let grid = CellGrid::new(counts);
    let cell_count = grid.cell_count();
    let vertex_count = cell_count * source_vertex_count;
    let parallel = params.fills_in_parallel(vertex_count);

    debug!(
        cells = cell_count,
        vertices = vertex_count,
        parallel, "Filling replication buffers"
    );

    // Stage 1: attribute concatenation
    let positions =
        repeat_positions(&source.positions, &grid, &params.offset, parallel, capacity)?;
    let uvs = tile(source.uvs.as_deref(), cell_count, parallel, capacity)?;
    let normals = tile(source.normals.as_deref(), cell_count, parallel, capacity)?;
    let tangents = tile(source.tangents.as_deref(), cell_count, parallel, capacity)?;
    let colors = tile(source.colors.as_deref(), cell_count, parallel, capacity)?;

    // Stage 2: index rebasing
    let submeshes = source
        .submeshes
        .iter()
        .map(|indices| {
            rebase_indices(indices, cell_count, source_vertex_count, parallel, capacity)
        })
        .collect::<RepeatResult<Vec<_>>>()?;

    // Stage 3: bounds, after every cell is written
    let bounds = Aabb::from_points(positions.iter());

    let mesh = BufferMesh {
        name: source.name.clone(),
        positions,
        uvs,
        normals,
        tangents,
        colors,
        submeshes,
    };

    info!(
        cells = cell_count,
        vertices = mesh.vertex_count(),
        indices = mesh.index_count(),
        submeshes = mesh.submesh_count(),
        "Replicated mesh"
    );

    Ok(Replication {
        mesh,
        bounds,
        counts,
        source_vertex_count,
    })
}

/// Checks that a mesh can be used as a replication source.
///
/// An attribute channel that is present but empty is accepted and treated as
/// absent.
///
/// # Errors
///
/// Returns [`RepeatError::InvalidSource`] describing the first defect found.
pub fn validate_source(source: &BufferMesh) -> RepeatResult<()> {
    let vertex_count = source.vertex_count();
    if vertex_count == 0 {
        return Err(SourceDefect::NoVertices.into());
    }

    for attribute in VertexAttribute::ALL {
        match source.attribute_len(attribute) {
            Some(actual) if actual != 0 && actual != vertex_count => {
                return Err(SourceDefect::AttributeLength {
                    attribute,
                    expected: vertex_count,
                    actual,
                }
                .into());
            }
            _ => {}
        }
    }

    for (submesh, indices) in source.submeshes.iter().enumerate() {
        if let Some((position, &index)) = indices
            .iter()
            .enumerate()
            .find(|&(_, &index)| index as usize >= vertex_count)
        {
            return Err(SourceDefect::IndexOutOfRange {
                submesh,
                position,
                index,
                vertex_count,
            }
            .into());
        }
    }

    Ok(())
}

/// The request an allocation failure is reported against.
#[derive(Debug, Clone, Copy)]
struct Capacity {
    requested: u128,
    limit: usize,
}

impl Capacity {
    const fn exceeded(self) -> RepeatError {
        RepeatError::CapacityExceeded {
            requested: self.requested,
            limit: self.limit,
        }
    }

    /// Allocates `block_len * cell_count` copies of `value`, failing instead
    /// of aborting when the allocator refuses.
    fn buffer<T: Clone>(
        self,
        block_len: usize,
        cell_count: usize,
        value: T,
    ) -> RepeatResult<Vec<T>> {
        let len = block_len
            .checked_mul(cell_count)
            .ok_or_else(|| self.exceeded())?;
        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(len)
            .map_err(|_| self.exceeded())?;
        buffer.resize(len, value);
        Ok(buffer)
    }
}

/// Writes one translated copy of `source` per cell.
fn repeat_positions(
    source: &[Point3<f64>],
    grid: &CellGrid,
    offset: &Vector3<f64>,
    parallel: bool,
    capacity: Capacity,
) -> RepeatResult<Vec<Point3<f64>>> {
    let mut positions = capacity.buffer(source.len(), grid.cell_count(), Point3::origin())?;
    fill_cells(&mut positions, source.len(), parallel, |cell_index, block| {
        let Some(cell) = grid.cell(cell_index) else {
            return;
        };
        let translation = cell.translation(offset);
        for (dst, src) in block.iter_mut().zip(source) {
            *dst = *src + translation;
        }
    });
    Ok(positions)
}

/// Repeats an attribute channel verbatim once per cell. Absent and empty
/// channels come out absent.
fn tile<T: Copy + Send + Sync>(
    values: Option<&[T]>,
    cell_count: usize,
    parallel: bool,
    capacity: Capacity,
) -> RepeatResult<Option<Vec<T>>> {
    let Some(values) = values else {
        return Ok(None);
    };
    let Some(&first) = values.first() else {
        return Ok(None);
    };
    let mut out = capacity.buffer(values.len(), cell_count, first)?;
    fill_cells(&mut out, values.len(), parallel, |_, block| {
        block.copy_from_slice(values);
    });
    Ok(Some(out))
}

/// Repeats a submesh index list once per cell, shifting each block into its
/// cell's vertex range.
fn rebase_indices(
    indices: &[u32],
    cell_count: usize,
    source_vertex_count: usize,
    parallel: bool,
    capacity: Capacity,
) -> RepeatResult<Vec<u32>> {
    if indices.is_empty() {
        return Ok(Vec::new());
    }
    let mut out = capacity.buffer(indices.len(), cell_count, 0)?;
    fill_cells(&mut out, indices.len(), parallel, |cell_index, block| {
        let base = (cell_index * source_vertex_count) as u32;
        for (dst, &src) in block.iter_mut().zip(indices) {
            *dst = src + base;
        }
    });
    Ok(out)
}

/// Splits `buffer` into consecutive `block_len` blocks and hands each to
/// `fill` with its cell index.
fn fill_cells<T, F>(buffer: &mut [T], block_len: usize, parallel: bool, fill: F)
where
    T: Send,
    F: Fn(usize, &mut [T]) + Sync,
{
    if parallel {
        buffer
            .par_chunks_mut(block_len)
            .enumerate()
            .for_each(|(cell_index, block)| fill(cell_index, block));
    } else {
        buffer
            .chunks_mut(block_len)
            .enumerate()
            .for_each(|(cell_index, block)| fill(cell_index, block));
    }
}
