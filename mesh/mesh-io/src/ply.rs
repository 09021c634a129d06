//! PLY (Polygon File Format) support.
//!
//! # Supported Properties
//!
//! - Vertex positions (`x`, `y`, `z`) - required
//! - Normals (`nx`, `ny`, `nz`)
//! - Texture coordinates (`s`, `t`, also read as `u`, `v`)
//! - Colors (`red`, `green`, `blue`, `alpha`) as `uchar` or `float`
//! - Face indices (`vertex_indices` or `vertex_index`)
//! - Face `submesh` slot; faces without one land in submesh 0
//!
//! Tangents have no PLY property and are not written. The submesh count and
//! mesh name travel in header comments so empty submeshes survive a round
//! trip.
//!
//! # Format Variants
//!
//! - **ASCII** - Human-readable, larger files
//! - **Binary Little Endian** - Compact, fast to read/write
//!
//! # Example
//!
//! ```no_run
//! use mesh_io::{load_ply, save_ply};
//!
//! let mesh = load_ply("model.ply").unwrap();
//! save_ply(&mesh, "output.ply", true).unwrap(); // Binary
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use mesh_types::{BufferMesh, Point2, Point3, Vector3, VertexColor};
use ply_rs::parser::Parser;
use ply_rs::ply::{
    Addable, DefaultElement, ElementDef, Encoding, Ply, Property, PropertyDef, PropertyType,
    ScalarType,
};
use ply_rs::writer::Writer;
use tracing::{debug, warn};

use crate::error::{IoError, IoResult};

const SUBMESH_COMMENT: &str = "submeshes";
const NAME_COMMENT: &str = "mesh";

/// Most submeshes a PLY file may declare or reference.
pub const MAX_PLY_SUBMESHES: usize = 1 << 16;

/// Load a mesh from a PLY file.
///
/// Supports ASCII, binary little-endian, and binary big-endian formats.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be read
/// - The file is not valid PLY format
/// - Vertex positions are missing or a face references a missing vertex
/// - The declared submesh count or a face's submesh slot reaches
///   [`MAX_PLY_SUBMESHES`]
///
/// # Example
///
/// ```no_run
/// use mesh_io::load_ply;
/// use mesh_types::MeshTopology;
///
/// let mesh = load_ply("model.ply").unwrap();
/// println!("Loaded {} vertices, {} submeshes", mesh.vertex_count(), mesh.submesh_count());
/// ```
pub fn load_ply<P: AsRef<Path>>(path: P) -> IoResult<BufferMesh> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| IoError::from_open(path, e))?;
    let mut reader = BufReader::new(file);

    let parser = Parser::<DefaultElement>::new();
    let header = parser
        .read_header(&mut reader)
        .map_err(|e| IoError::invalid_content(format!("failed to parse PLY header: {e}")))?;
    let payload = parser
        .read_payload(&mut reader, &header)
        .map_err(|e| IoError::invalid_content(format!("failed to read PLY payload: {e}")))?;

    let mut mesh = BufferMesh::new();
    let mut declared_submeshes = 0;
    for comment in &header.comments {
        let mut parts = comment.trim().splitn(2, ' ');
        match (parts.next(), parts.next()) {
            (Some(SUBMESH_COMMENT), Some(count)) => {
                declared_submeshes = count.trim().parse()?;
                if declared_submeshes > MAX_PLY_SUBMESHES {
                    return Err(IoError::invalid_content(format!(
                        "PLY declares {declared_submeshes} submeshes, more than {MAX_PLY_SUBMESHES}"
                    )));
                }
            }
            (Some(NAME_COMMENT), Some(name)) if !name.trim().is_empty() => {
                mesh.name = Some(name.trim().to_string());
            }
            _ => {}
        }
    }

    let has = |key: &str| {
        header
            .elements
            .get("vertex")
            .is_some_and(|def| def.properties.contains_key(key))
    };
    let uv_keys = if has("s") { ["s", "t"] } else { ["u", "v"] };
    let read_normals = has("nx");
    let read_uvs = has(uv_keys[0]);
    let read_colors = has("red");

    let empty = Vec::new();
    let vertices = payload.get("vertex").unwrap_or(&empty);
    let mut normals = Vec::new();
    let mut uvs = Vec::new();
    let mut colors = Vec::new();
    mesh.positions.reserve(vertices.len());
    for element in vertices {
        let coord = |key| {
            get_float(element, key).ok_or_else(|| {
                IoError::invalid_content(format!("PLY vertex is missing property {key}"))
            })
        };
        mesh.positions.push(Point3::new(coord("x")?, coord("y")?, coord("z")?));
        if read_normals {
            normals.push(Vector3::new(coord("nx")?, coord("ny")?, coord("nz")?));
        }
        if read_uvs {
            uvs.push(Point2::new(coord(uv_keys[0])?, coord(uv_keys[1])?));
        }
        if read_colors {
            colors.push(get_color(element));
        }
    }
    mesh.normals = read_normals.then_some(normals);
    mesh.uvs = read_uvs.then_some(uvs);
    mesh.colors = read_colors.then_some(colors);

    mesh.submeshes = vec![Vec::new(); declared_submeshes];
    let vertex_count = mesh.positions.len();
    for element in payload.get("face").unwrap_or(&empty) {
        let indices = get_index_list(element);
        if indices.len() < 3 {
            continue;
        }
        let mut corners = Vec::with_capacity(indices.len());
        for index in indices {
            let valid = usize::try_from(index)
                .ok()
                .filter(|&i| i < vertex_count)
                .and_then(|i| u32::try_from(i).ok());
            corners.push(valid.ok_or_else(|| {
                IoError::invalid_content(format!(
                    "PLY face index {index} out of range for {vertex_count} vertices"
                ))
            })?);
        }

        let slot = get_submesh(element);
        if slot >= MAX_PLY_SUBMESHES {
            return Err(IoError::invalid_content(format!(
                "PLY face submesh {slot} is out of range, the limit is {MAX_PLY_SUBMESHES}"
            )));
        }
        if mesh.submeshes.len() <= slot {
            mesh.submeshes.resize_with(slot + 1, Vec::new);
        }
        let target = &mut mesh.submeshes[slot];
        // Fan triangulation for convex polygons
        for pair in corners[1..].windows(2) {
            target.extend_from_slice(&[corners[0], pair[0], pair[1]]);
        }
    }

    debug!(
        vertices = mesh.positions.len(),
        submeshes = mesh.submeshes.len(),
        "Read PLY"
    );
    Ok(mesh)
}

/// Extract a numeric property from a PLY element as `f64`.
fn get_float(element: &DefaultElement, key: &str) -> Option<f64> {
    match element.get(key)? {
        Property::Float(v) => Some(f64::from(*v)),
        Property::Double(v) => Some(*v),
        Property::Char(v) => Some(f64::from(*v)),
        Property::UChar(v) => Some(f64::from(*v)),
        Property::Short(v) => Some(f64::from(*v)),
        Property::UShort(v) => Some(f64::from(*v)),
        Property::Int(v) => Some(f64::from(*v)),
        Property::UInt(v) => Some(f64::from(*v)),
        _ => None,
    }
}

/// Read a color channel: `uchar` as 0-255, floats as 0.0-1.0.
#[allow(clippy::cast_possible_truncation)]
fn get_channel(element: &DefaultElement, key: &str, default: f32) -> f32 {
    match element.get(key) {
        Some(Property::UChar(v)) => f32::from(*v) / 255.0,
        Some(Property::Float(v)) => *v,
        Some(Property::Double(v)) => *v as f32,
        _ => default,
    }
}

fn get_color(element: &DefaultElement) -> VertexColor {
    VertexColor::new(
        get_channel(element, "red", 1.0),
        get_channel(element, "green", 1.0),
        get_channel(element, "blue", 1.0),
        get_channel(element, "alpha", 1.0),
    )
}

/// Submesh slot of a face, 0 when absent or negative.
#[allow(clippy::cast_sign_loss)]
fn get_submesh(element: &DefaultElement) -> usize {
    match element.get("submesh") {
        Some(Property::Int(v)) if *v > 0 => *v as usize,
        Some(Property::UInt(v)) => *v as usize,
        Some(Property::UChar(v)) => usize::from(*v),
        Some(Property::UShort(v)) => usize::from(*v),
        Some(Property::Short(v)) if *v > 0 => *v as usize,
        _ => 0,
    }
}

/// Extract vertex index list from a face element.
fn get_index_list(element: &DefaultElement) -> Vec<i64> {
    for key in &["vertex_indices", "vertex_index"] {
        if let Some(prop) = element.get(*key) {
            return match prop {
                Property::ListInt(v) => v.iter().map(|&i| i64::from(i)).collect(),
                Property::ListUInt(v) => v.iter().map(|&i| i64::from(i)).collect(),
                Property::ListUChar(v) => v.iter().map(|&i| i64::from(i)).collect(),
                Property::ListChar(v) => v.iter().map(|&i| i64::from(i)).collect(),
                Property::ListShort(v) => v.iter().map(|&i| i64::from(i)).collect(),
                Property::ListUShort(v) => v.iter().map(|&i| i64::from(i)).collect(),
                _ => continue,
            };
        }
    }
    Vec::new()
}

/// Save a mesh to a PLY file.
///
/// # Arguments
///
/// * `mesh` - The mesh to save
/// * `path` - Output file path
/// * `binary` - If true, save as binary little-endian; if false, save as ASCII
///
/// # Errors
///
/// Returns an error if the file cannot be written.
///
/// # Example
///
/// ```no_run
/// use mesh_io::save_ply;
/// use mesh_types::unit_cube;
///
/// save_ply(&unit_cube(), "cube.ply", true).unwrap(); // Binary
/// save_ply(&unit_cube(), "cube_ascii.ply", false).unwrap(); // ASCII
/// ```
pub fn save_ply<P: AsRef<Path>>(mesh: &BufferMesh, path: P, binary: bool) -> IoResult<()> {
    if mesh.tangents.is_some() {
        warn!(
            mesh = mesh.name.as_deref().unwrap_or(""),
            "PLY has no tangent property; tangents dropped"
        );
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    if binary {
        save_ply_binary(mesh, &mut writer)?;
    } else {
        save_ply_ascii(mesh, &mut writer)?;
    }
    writer.flush()?;
    Ok(())
}

fn header_comments(mesh: &BufferMesh) -> Vec<String> {
    let mut comments = vec![
        "Generated by mesh-io".to_string(),
        format!("{SUBMESH_COMMENT} {}", mesh.submeshes.len()),
    ];
    if let Some(name) = mesh.name.as_deref().filter(|n| !n.is_empty()) {
        comments.push(format!("{NAME_COMMENT} {name}"));
    }
    comments
}

fn face_count(mesh: &BufferMesh) -> usize {
    mesh.submeshes.iter().map(|s| s.len() / 3).sum()
}

/// Faces in submesh order, each with its slot.
fn faces(mesh: &BufferMesh) -> impl Iterator<Item = (usize, &[u32])> {
    mesh.submeshes
        .iter()
        .enumerate()
        .flat_map(|(slot, indices)| indices.chunks_exact(3).map(move |tri| (slot, tri)))
}

/// Save mesh as binary PLY (little-endian).
///
/// Written by hand because ply-rs writes the element count instead of the
/// list length for binary list properties.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn save_ply_binary<W: Write>(mesh: &BufferMesh, writer: &mut W) -> IoResult<()> {
    writeln!(writer, "ply")?;
    writeln!(writer, "format binary_little_endian 1.0")?;
    for comment in header_comments(mesh) {
        writeln!(writer, "comment {comment}")?;
    }
    writeln!(writer, "element vertex {}", mesh.positions.len())?;
    for key in ["x", "y", "z"] {
        writeln!(writer, "property float {key}")?;
    }
    if mesh.normals.is_some() {
        for key in ["nx", "ny", "nz"] {
            writeln!(writer, "property float {key}")?;
        }
    }
    if mesh.uvs.is_some() {
        writeln!(writer, "property float s")?;
        writeln!(writer, "property float t")?;
    }
    if mesh.colors.is_some() {
        for key in ["red", "green", "blue", "alpha"] {
            writeln!(writer, "property uchar {key}")?;
        }
    }
    writeln!(writer, "element face {}", face_count(mesh))?;
    writeln!(writer, "property list uchar int vertex_indices")?;
    writeln!(writer, "property int submesh")?;
    writeln!(writer, "end_header")?;

    for (i, p) in mesh.positions.iter().enumerate() {
        for c in [p.x, p.y, p.z] {
            writer.write_all(&(c as f32).to_le_bytes())?;
        }
        if let Some(n) = mesh.normals.as_ref().map(|n| n[i]) {
            for c in [n.x, n.y, n.z] {
                writer.write_all(&(c as f32).to_le_bytes())?;
            }
        }
        if let Some(uv) = mesh.uvs.as_ref().map(|uv| uv[i]) {
            writer.write_all(&(uv.x as f32).to_le_bytes())?;
            writer.write_all(&(uv.y as f32).to_le_bytes())?;
        }
        if let Some(color) = mesh.colors.as_ref().map(|c| c[i]) {
            writer.write_all(&color.to_rgba8())?;
        }
    }

    for (slot, tri) in faces(mesh) {
        writer.write_all(&[3u8])?;
        for &index in tri {
            writer.write_all(&(index as i32).to_le_bytes())?;
        }
        writer.write_all(&(slot as i32).to_le_bytes())?;
    }

    Ok(())
}

fn scalar_def(name: &str, scalar: ScalarType) -> PropertyDef {
    PropertyDef::new(name.to_string(), PropertyType::Scalar(scalar))
}

/// Save mesh as ASCII PLY using ply-rs.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn save_ply_ascii<W: Write>(mesh: &BufferMesh, writer: &mut W) -> IoResult<()> {
    let mut ply = Ply::<DefaultElement>::new();
    ply.header.encoding = Encoding::Ascii;
    ply.header.comments.extend(header_comments(mesh));

    let mut vertex_def = ElementDef::new("vertex".to_string());
    for key in ["x", "y", "z"] {
        vertex_def.properties.add(scalar_def(key, ScalarType::Float));
    }
    if mesh.normals.is_some() {
        for key in ["nx", "ny", "nz"] {
            vertex_def.properties.add(scalar_def(key, ScalarType::Float));
        }
    }
    if mesh.uvs.is_some() {
        vertex_def.properties.add(scalar_def("s", ScalarType::Float));
        vertex_def.properties.add(scalar_def("t", ScalarType::Float));
    }
    if mesh.colors.is_some() {
        for key in ["red", "green", "blue", "alpha"] {
            vertex_def.properties.add(scalar_def(key, ScalarType::UChar));
        }
    }
    vertex_def.count = mesh.positions.len();
    ply.header.elements.add(vertex_def);

    let mut face_def = ElementDef::new("face".to_string());
    face_def.properties.add(PropertyDef::new(
        "vertex_indices".to_string(),
        PropertyType::List(ScalarType::UChar, ScalarType::Int),
    ));
    face_def.properties.add(scalar_def("submesh", ScalarType::Int));
    face_def.count = face_count(mesh);
    ply.header.elements.add(face_def);

    let mut vertex_elements = Vec::with_capacity(mesh.positions.len());
    for (i, p) in mesh.positions.iter().enumerate() {
        let mut element = DefaultElement::new();
        let mut put = |key: &str, value: f64| {
            element.insert(key.to_string(), Property::Float(value as f32));
        };
        put("x", p.x);
        put("y", p.y);
        put("z", p.z);
        if let Some(n) = mesh.normals.as_ref().map(|n| n[i]) {
            put("nx", n.x);
            put("ny", n.y);
            put("nz", n.z);
        }
        if let Some(uv) = mesh.uvs.as_ref().map(|uv| uv[i]) {
            put("s", uv.x);
            put("t", uv.y);
        }
        if let Some(color) = mesh.colors.as_ref().map(|c| c[i]) {
            let [r, g, b, a] = color.to_rgba8();
            for (key, value) in [("red", r), ("green", g), ("blue", b), ("alpha", a)] {
                element.insert(key.to_string(), Property::UChar(value));
            }
        }
        vertex_elements.push(element);
    }
    ply.payload.insert("vertex".to_string(), vertex_elements);

    let mut face_elements = Vec::with_capacity(face_count(mesh));
    for (slot, tri) in faces(mesh) {
        let mut element = DefaultElement::new();
        let indices = tri.iter().map(|&i| i as i32).collect();
        element.insert("vertex_indices".to_string(), Property::ListInt(indices));
        element.insert("submesh".to_string(), Property::Int(slot as i32));
        face_elements.push(element);
    }
    ply.payload.insert("face".to_string(), face_elements);

    let ply_writer = Writer::new();
    ply_writer
        .write_ply(writer, &mut ply)
        .map_err(|e| IoError::invalid_content(format!("failed to write PLY: {e}")))?;

    Ok(())
}
