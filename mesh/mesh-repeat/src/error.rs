//! Error types for mesh replication.

use mesh_types::VertexAttribute;
use thiserror::Error;

/// Result type for replication operations.
pub type RepeatResult<T> = Result<T, RepeatError>;

/// Errors that can occur while replicating a mesh.
///
/// Nothing is retried internally. On error no output is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum RepeatError {
    /// The source mesh is empty or malformed.
    #[error("invalid source mesh: {0}")]
    InvalidSource(#[from] SourceDefect),

    /// The combined mesh would exceed the vertex limit, or its buffers could
    /// not be allocated.
    #[error("replication needs {requested} vertices, beyond the capacity available (limit {limit})")]
    CapacityExceeded {
        /// Combined vertex count the parameters would produce.
        requested: u128,
        /// Effective vertex limit. `requested` may be under it when the
        /// allocator refused the buffers.
        limit: usize,
    },
}

impl RepeatError {
    /// The broad category of this error.
    #[must_use]
    pub const fn kind(&self) -> RepeatErrorKind {
        match self {
            Self::InvalidSource(_) => RepeatErrorKind::InvalidSource,
            Self::CapacityExceeded { .. } => RepeatErrorKind::CapacityExceeded,
        }
    }
}

/// Broad error categories reported by [`replicate`](crate::replicate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepeatErrorKind {
    /// Malformed or empty source mesh.
    InvalidSource,
    /// Requested replication is too large.
    CapacityExceeded,
}

/// What is wrong with a rejected source mesh.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SourceDefect {
    /// The mesh has no vertex positions.
    #[error("mesh has no vertices")]
    NoVertices,

    /// A non-empty attribute channel does not match the vertex count.
    #[error("{attribute} has {actual} entries, expected {expected}")]
    AttributeLength {
        /// The mismatched channel.
        attribute: VertexAttribute,
        /// The vertex count.
        expected: usize,
        /// The channel's actual length.
        actual: usize,
    },

    /// A submesh index references a vertex that does not exist.
    #[error(
        "submesh {submesh} index {index} at position {position} is out of range for {vertex_count} vertices"
    )]
    IndexOutOfRange {
        /// Submesh holding the bad index.
        submesh: usize,
        /// Position of the index within the submesh list.
        position: usize,
        /// The offending index value.
        index: u32,
        /// The vertex count.
        vertex_count: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds() {
        let invalid = RepeatError::from(SourceDefect::NoVertices);
        assert_eq!(invalid.kind(), RepeatErrorKind::InvalidSource);

        let capacity = RepeatError::CapacityExceeded {
            requested: 10,
            limit: 5,
        };
        assert_eq!(capacity.kind(), RepeatErrorKind::CapacityExceeded);
    }

    #[test]
    fn messages_name_the_problem() {
        let err = RepeatError::from(SourceDefect::AttributeLength {
            attribute: VertexAttribute::Normal,
            expected: 8,
            actual: 7,
        });
        assert_eq!(
            err.to_string(),
            "invalid source mesh: normals has 7 entries, expected 8"
        );

        let err = RepeatError::CapacityExceeded {
            requested: 12,
            limit: 10,
        };
        assert!(err.to_string().contains("12 vertices"));
    }
}
