//! Wavefront OBJ support.
//!
//! OBJ stores positions, texture coordinates and normals in separate pools and
//! lets each face corner pick one entry from each. Meshes here keep parallel
//! per-vertex buffers instead, so saving writes the same index for every pool.
//! Loading keeps the file's vertex order when every corner already uses
//! matching indices; otherwise `v/vt/vn` triples are de-duplicated into a
//! single vertex stream in order of first use.
//!
//! # Submeshes
//!
//! Each submesh is written as its own `g` group with a matching `usemtl`
//! line. On load, every `g` line opens a new submesh; faces that appear
//! before any group go into an implicit first submesh.
//!
//! # Example
//!
//! ```no_run
//! use mesh_io::{load_obj, save_obj};
//!
//! let mesh = load_obj("fence.obj").unwrap();
//! save_obj(&mesh, "fence_copy.obj").unwrap();
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use hashbrown::HashMap;
use mesh_types::{BufferMesh, Point2, Point3, Vector3};
use tracing::{debug, warn};

use crate::error::{IoError, IoResult};

/// Options for [`write_obj`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjOptions {
    /// Write `vt` lines when the mesh has UVs.
    pub write_uvs: bool,

    /// Write `vn` lines when the mesh has normals.
    pub write_normals: bool,

    /// Fixed number of decimals; `None` writes the shortest exact form.
    pub precision: Option<usize>,
}

impl Default for ObjOptions {
    fn default() -> Self {
        Self {
            write_uvs: true,
            write_normals: true,
            precision: None,
        }
    }
}

impl ObjOptions {
    /// Positions and faces only.
    #[must_use]
    pub const fn positions_only() -> Self {
        Self {
            write_uvs: false,
            write_normals: false,
            precision: None,
        }
    }

    /// Sets a fixed number of decimals.
    #[must_use]
    pub const fn with_precision(mut self, decimals: usize) -> Self {
        self.precision = Some(decimals);
        self
    }
}

/// Load a mesh from an OBJ file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or a line is malformed.
pub fn load_obj<P: AsRef<Path>>(path: P) -> IoResult<BufferMesh> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| IoError::from_open(path, e))?;
    read_obj(BufReader::new(file))
}

/// Parse OBJ text from a reader.
///
/// Supports `o`, `g`, `v`, `vt`, `vn` and `f` lines; anything else is
/// skipped. Polygons are fan triangulated. Negative (relative) indices are
/// resolved against the pools read so far.
///
/// # Errors
///
/// Returns [`IoError::InvalidContent`] for malformed or out-of-range
/// references and [`IoError::ParseFloat`] / [`IoError::ParseInt`] for bad
/// numbers.
///
/// # Example
///
/// ```
/// use mesh_io::read_obj;
/// use mesh_types::MeshTopology;
///
/// let text = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\ng quad\nf 1 2 3 4\n";
/// let mesh = read_obj(text.as_bytes()).unwrap();
/// assert_eq!(mesh.vertex_count(), 4);
/// assert_eq!(mesh.submesh(0), Some(&[0, 1, 2, 0, 2, 3][..]));
/// ```
pub fn read_obj<R: BufRead>(reader: R) -> IoResult<BufferMesh> {
    let mut pools = Pools::default();
    let mut builder = Builder::default();
    let mut name = None;

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.split('#').next().unwrap_or("").trim();
        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else {
            continue;
        };

        match keyword {
            "o" => name = Some(tokens.collect::<Vec<_>>().join(" ")),
            "g" => builder.open_submesh(),
            "v" => {
                let [x, y, z] = parse_floats::<3>(&mut tokens, line_no)?;
                pools.positions.push(Point3::new(x, y, z));
            }
            "vt" => {
                let [u, v] = parse_floats::<2>(&mut tokens, line_no)?;
                pools.uvs.push(Point2::new(u, v));
            }
            "vn" => {
                let [x, y, z] = parse_floats::<3>(&mut tokens, line_no)?;
                pools.normals.push(Vector3::new(x, y, z));
            }
            "f" => {
                let corners = tokens
                    .map(|token| pools.resolve(token, line_no))
                    .collect::<IoResult<Vec<_>>>()?;
                if corners.len() < 3 {
                    return Err(IoError::invalid_content(format!(
                        "line {}: face needs at least 3 corners",
                        line_no + 1
                    )));
                }
                builder.push_polygon(&corners);
            }
            _ => {}
        }
    }

    let mesh = builder.finish(&pools, name)?;
    debug!(
        vertices = mesh.positions.len(),
        submeshes = mesh.submeshes.len(),
        "Read OBJ"
    );
    Ok(mesh)
}

/// Save a mesh to an OBJ file with default options.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save_obj<P: AsRef<Path>>(mesh: &BufferMesh, path: P) -> IoResult<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_obj(mesh, &mut writer, &ObjOptions::default())?;
    writer.flush()?;
    Ok(())
}

/// Write a mesh as OBJ text.
///
/// Tangents and colors have no OBJ channel and are dropped with a warning.
///
/// # Errors
///
/// Returns an error if the writer fails.
pub fn write_obj<W: Write>(
    mesh: &BufferMesh,
    writer: &mut W,
    options: &ObjOptions,
) -> IoResult<()> {
    let label = mesh.name.as_deref().unwrap_or("");
    if mesh.tangents.is_some() {
        warn!(mesh = label, "OBJ has no tangent channel; tangents dropped");
    }
    if mesh.colors.is_some() {
        warn!(mesh = label, "OBJ has no color channel; colors dropped");
    }

    let uvs = mesh.uvs.as_deref().filter(|_| options.write_uvs);
    let normals = mesh.normals.as_deref().filter(|_| options.write_normals);
    let fmt = |value: f64| match options.precision {
        Some(decimals) => format!("{value:.decimals$}"),
        None => format!("{value}"),
    };

    writeln!(writer, "# Generated by mesh-io")?;
    if let Some(name) = &mesh.name {
        writeln!(writer, "o {name}")?;
    }
    for p in &mesh.positions {
        writeln!(writer, "v {} {} {}", fmt(p.x), fmt(p.y), fmt(p.z))?;
    }
    for uv in uvs.unwrap_or_default() {
        writeln!(writer, "vt {} {}", fmt(uv.x), fmt(uv.y))?;
    }
    for n in normals.unwrap_or_default() {
        writeln!(writer, "vn {} {} {}", fmt(n.x), fmt(n.y), fmt(n.z))?;
    }

    for (slot, indices) in mesh.submeshes.iter().enumerate() {
        writeln!(writer, "g submesh_{slot}")?;
        writeln!(writer, "usemtl material_{slot}")?;
        for tri in indices.chunks_exact(3) {
            write!(writer, "f")?;
            for &i in tri {
                let i = u64::from(i) + 1;
                match (uvs.is_some(), normals.is_some()) {
                    (false, false) => write!(writer, " {i}")?,
                    (true, false) => write!(writer, " {i}/{i}")?,
                    (false, true) => write!(writer, " {i}//{i}")?,
                    (true, true) => write!(writer, " {i}/{i}/{i}")?,
                }
            }
            writeln!(writer)?;
        }
    }

    Ok(())
}

fn parse_floats<'a, const N: usize>(
    tokens: &mut impl Iterator<Item = &'a str>,
    line_no: usize,
) -> IoResult<[f64; N]> {
    let mut out = [0.0; N];
    for slot in &mut out {
        let token = tokens.next().ok_or_else(|| {
            IoError::invalid_content(format!("line {}: expected {N} numbers", line_no + 1))
        })?;
        *slot = token.parse()?;
    }
    Ok(out)
}

/// Corner reference into the raw OBJ pools, zero-based.
type Corner = (usize, Option<usize>, Option<usize>);

#[derive(Default)]
struct Pools {
    positions: Vec<Point3<f64>>,
    uvs: Vec<Point2<f64>>,
    normals: Vec<Vector3<f64>>,
}

impl Pools {
    fn resolve(&self, token: &str, line_no: usize) -> IoResult<Corner> {
        let mut parts = token.split('/');
        let v = parts.next().unwrap_or("");
        let vt = parts.next().filter(|s| !s.is_empty());
        let vn = parts.next().filter(|s| !s.is_empty());

        let v = resolve_index(v, self.positions.len(), "v", line_no)?;
        let vt = vt
            .map(|s| resolve_index(s, self.uvs.len(), "vt", line_no))
            .transpose()?;
        let vn = vn
            .map(|s| resolve_index(s, self.normals.len(), "vn", line_no))
            .transpose()?;
        Ok((v, vt, vn))
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
// Truncation: bounds are checked against `len` before the cast
fn resolve_index(token: &str, len: usize, pool: &str, line_no: usize) -> IoResult<usize> {
    let raw: i64 = token.parse()?;
    let resolved = match raw {
        1.. if (raw as u64) <= len as u64 => Some(raw as usize - 1),
        ..=-1 if raw.unsigned_abs() <= len as u64 => Some(len - raw.unsigned_abs() as usize),
        _ => None,
    };
    resolved.ok_or_else(|| {
        IoError::invalid_content(format!(
            "line {}: {pool} index {raw} out of range for {len} entries",
            line_no + 1
        ))
    })
}

/// Triangulated face corners, grouped by submesh.
#[derive(Default)]
struct Builder {
    submeshes: Vec<Vec<Corner>>,
}

impl Builder {
    fn open_submesh(&mut self) {
        self.submeshes.push(Vec::new());
    }

    fn push_polygon(&mut self, corners: &[Corner]) {
        if self.submeshes.is_empty() {
            self.open_submesh();
        }
        let Some(target) = self.submeshes.last_mut() else {
            return;
        };
        for pair in corners[1..].windows(2) {
            target.extend_from_slice(&[corners[0], pair[0], pair[1]]);
        }
    }

    fn corners(&self) -> impl Iterator<Item = &Corner> {
        self.submeshes.iter().flatten()
    }

    fn finish(self, pools: &Pools, name: Option<String>) -> IoResult<BufferMesh> {
        let name = name.filter(|n| !n.is_empty());
        let uses_uvs = self.corners().any(|c| c.1.is_some());
        let uses_normals = self.corners().any(|c| c.2.is_some());

        // Files whose pools are already parallel keep their vertex order,
        // including vertices no face references.
        let aligned = self
            .corners()
            .all(|c| c.1.is_none_or(|t| t == c.0) && c.2.is_none_or(|n| n == c.0))
            && (!uses_uvs || pools.uvs.len() == pools.positions.len())
            && (!uses_normals || pools.normals.len() == pools.positions.len());

        if aligned {
            u32::try_from(pools.positions.len())
                .map_err(|_| IoError::invalid_content("more than u32::MAX vertices"))?;
            #[allow(clippy::cast_possible_truncation)]
            // Truncation: the position count was checked to fit u32
            let submeshes = self
                .submeshes
                .iter()
                .map(|corners| corners.iter().map(|c| c.0 as u32).collect())
                .collect();
            return Ok(BufferMesh {
                name,
                positions: pools.positions.clone(),
                uvs: uses_uvs.then(|| pools.uvs.clone()),
                normals: uses_normals.then(|| pools.normals.clone()),
                tangents: None,
                colors: None,
                submeshes,
            });
        }

        let mut unique: Vec<Corner> = Vec::new();
        let mut lookup: HashMap<Corner, u32> = HashMap::new();
        let mut submeshes = Vec::with_capacity(self.submeshes.len());
        for corners in &self.submeshes {
            let mut indices = Vec::with_capacity(corners.len());
            for &corner in corners {
                let index = match lookup.get(&corner) {
                    Some(&index) => index,
                    None => {
                        let index = u32::try_from(unique.len()).map_err(|_| {
                            IoError::invalid_content("more than u32::MAX distinct vertices")
                        })?;
                        unique.push(corner);
                        lookup.insert(corner, index);
                        index
                    }
                };
                indices.push(index);
            }
            submeshes.push(indices);
        }

        Ok(BufferMesh {
            name,
            positions: unique.iter().map(|c| pools.positions[c.0]).collect(),
            uvs: uses_uvs.then(|| {
                unique
                    .iter()
                    .map(|c| c.1.map_or_else(Point2::origin, |i| pools.uvs[i]))
                    .collect()
            }),
            normals: uses_normals.then(|| {
                unique
                    .iter()
                    .map(|c| c.2.map_or_else(Vector3::zeros, |i| pools.normals[i]))
                    .collect()
            }),
            tangents: None,
            colors: None,
            submeshes,
        })
    }
}
