//! Mesh file I/O for repeated meshes.
//!
//! This crate persists [`BufferMesh`] values, keeping every attribute channel
//! the format can hold and one group per submesh:
//!
//! - **OBJ** (Wavefront) - ASCII, positions/UVs/normals, `g` group per submesh
//! - **PLY** (Polygon File Format) - Binary and ASCII, adds vertex colors
//!
//! [`AssetLibrary`] stores meshes by name under a `RepeatMesh` folder.
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero engine dependencies**. It can be used in:
//! - Editor tooling
//! - CLI tools
//! - Servers
//!
//! # Format Detection
//!
//! The crate can automatically detect file format from extension:
//!
//! ```no_run
//! use mesh_io::{load_mesh, save_mesh};
//!
//! // Format detected from .obj extension
//! let mesh = load_mesh("fence.obj").unwrap();
//!
//! // Save to a different format
//! save_mesh(&mesh, "fence.ply").unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod asset;
mod error;
mod obj;
mod ply;

pub use asset::{ASSET_FOLDER, AssetLibrary};
pub use error::{IoError, IoResult};
pub use obj::{ObjOptions, load_obj, read_obj, save_obj, write_obj};
pub use ply::{MAX_PLY_SUBMESHES, load_ply, save_ply};

use std::path::Path;

use mesh_types::BufferMesh;

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshFormat {
    /// OBJ (Wavefront) format.
    /// ASCII only; no tangent or color channel.
    Obj,
    /// PLY (Polygon File Format).
    /// Supports binary and ASCII variants.
    Ply,
}

impl MeshFormat {
    /// Detect format from file extension.
    ///
    /// Returns `None` if the extension is not recognized.
    #[must_use]
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "obj" => Some(Self::Obj),
            "ply" => Some(Self::Ply),
            _ => None,
        }
    }

    /// Get the canonical file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Obj => "obj",
            Self::Ply => "ply",
        }
    }
}

fn format_of(path: &Path) -> IoResult<MeshFormat> {
    MeshFormat::from_path(path).ok_or_else(|| IoError::UnknownFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })
}

/// Load a mesh from a file, detecting format from extension.
///
/// # Errors
///
/// Returns an error if:
/// - The file format cannot be determined from the extension
/// - The file cannot be read
/// - The file content is invalid for the detected format
pub fn load_mesh<P: AsRef<Path>>(path: P) -> IoResult<BufferMesh> {
    let path = path.as_ref();
    match format_of(path)? {
        MeshFormat::Obj => load_obj(path),
        MeshFormat::Ply => load_ply(path),
    }
}

/// Save a mesh to a file, detecting format from extension.
///
/// PLY files are written as binary.
///
/// # Errors
///
/// Returns an error if:
/// - The file format cannot be determined from the extension
/// - The file cannot be written
pub fn save_mesh<P: AsRef<Path>>(mesh: &BufferMesh, path: P) -> IoResult<()> {
    let path = path.as_ref();
    save_mesh_as(mesh, path, format_of(path)?)
}

/// Save a mesh in an explicit format, whatever the path's extension.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save_mesh_as<P: AsRef<Path>>(mesh: &BufferMesh, path: P, format: MeshFormat) -> IoResult<()> {
    match format {
        MeshFormat::Obj => save_obj(mesh, path),
        MeshFormat::Ply => save_ply(mesh, path, true),
    }
}
