//! Grid replication of meshes.
//!
//! Given a source mesh, per-axis counts and an offset, this crate produces
//! one combined mesh holding a translated copy of the source in every cell
//! of an `nx × ny × nz` lattice:
//!
//! - Attribute buffers are concatenated cell by cell
//! - Submesh indices are rebased onto each cell's vertex block
//! - Bounds are recomputed over the combined positions
//!
//! # Quick Start
//!
//! ```
//! use mesh_repeat::{replicate, RepeatParams};
//! use mesh_types::{unit_cube, MeshTopology, Point3};
//!
//! let cube = unit_cube();
//! let params = RepeatParams::new(2, 1, 1).with_spacing(1.0);
//! let result = replicate(&cube, &params).unwrap();
//!
//! assert_eq!(result.vertex_count(), 16);
//! assert_eq!(result.mesh.index_count(), 72);
//! assert_eq!(result.bounds.max, Point3::new(2.0, 1.0, 1.0));
//! ```
//!
//! # Rebuilding
//!
//! Tools that keep a repeated object alive between edits use [`Repeater`],
//! which only re-runs [`replicate`] after settings or the source change and
//! can optionally derive a [`BoxVolume`] for a collider.
//!
//! # Architecture
//!
//! This is a Layer 0 crate with no engine dependencies. Large grids are
//! filled in parallel with rayon; the output is identical either way.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod collider;
mod error;
mod grid;
mod params;
mod repeater;
mod replicate;
mod types;

pub use collider::{BoxVolume, derive_box_volume};
pub use error::{RepeatError, RepeatErrorKind, RepeatResult, SourceDefect};
pub use grid::{Cell, CellGrid};
pub use params::{DEFAULT_VERTEX_LIMIT, PARALLEL_THRESHOLD, RepeatParams};
pub use repeater::{RebuildOutcome, RepeatOutput, RepeatSettings, Repeater};
pub use replicate::{replicate, validate_source};
pub use types::Replication;
