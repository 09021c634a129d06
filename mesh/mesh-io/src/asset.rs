//! Named mesh assets under a project folder.
//!
//! Assets live in a fixed `RepeatMesh` folder below a caller-chosen root and
//! are named after the mesh. Saving again under the same name overwrites.

use std::fs;
use std::path::{Path, PathBuf};

use mesh_types::BufferMesh;
use tracing::info;

use crate::error::{IoError, IoResult};
use crate::{MeshFormat, save_mesh_as};

/// Folder created below the library root.
pub const ASSET_FOLDER: &str = "RepeatMesh";

/// Writes meshes to `<root>/RepeatMesh/<name>.<ext>`.
///
/// # Example
///
/// ```
/// use mesh_io::{AssetLibrary, MeshFormat};
/// use mesh_types::unit_cube;
///
/// let dir = tempfile::tempdir().unwrap();
/// let library = AssetLibrary::new(dir.path());
///
/// let path = library.save(&unit_cube(), MeshFormat::Obj).unwrap();
/// assert_eq!(path, dir.path().join("RepeatMesh").join("unit_cube.obj"));
/// assert!(path.exists());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLibrary {
    root: PathBuf,
}

impl AssetLibrary {
    /// Creates a library rooted at `root`. Nothing is touched on disk yet.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The library root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Folder that holds the assets.
    #[must_use]
    pub fn folder(&self) -> PathBuf {
        self.root.join(ASSET_FOLDER)
    }

    /// Path an asset with this name and format would be written to.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidAssetName`] if the name is empty or is not
    /// a plain file name.
    pub fn asset_path(&self, name: &str, format: MeshFormat) -> IoResult<PathBuf> {
        validate_name(name)?;
        Ok(self
            .folder()
            .join(format!("{name}.{}", format.extension())))
    }

    /// Save a mesh as an asset named after [`BufferMesh::name`].
    ///
    /// Creates the asset folder if it is missing. Returns the written path.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidAssetName`] if the mesh has no usable name,
    /// or an I/O error if the folder or file cannot be written.
    pub fn save(&self, mesh: &BufferMesh, format: MeshFormat) -> IoResult<PathBuf> {
        let name = mesh.name.as_deref().unwrap_or("");
        let path = self.asset_path(name, format)?;

        let folder = self.folder();
        if !folder.is_dir() {
            fs::create_dir_all(&folder)?;
            info!(folder = %folder.display(), "Created asset folder");
        }

        save_mesh_as(mesh, &path, format)?;
        info!(path = %path.display(), "Created asset: {name}");
        Ok(path)
    }
}

fn validate_name(name: &str) -> IoResult<()> {
    let reason = if name.trim().is_empty() {
        Some("name is empty")
    } else if name.contains(['/', '\\']) {
        Some("contains a path separator")
    } else if name == "." || name == ".." {
        Some("refers to a directory")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(IoError::InvalidAssetName {
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}
