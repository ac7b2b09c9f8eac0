//! Error types for the shape engine.
//!
//! Every fallible operation returns one of these; defensive faults are
//! explicit errors, never silent ignores.

use glam::DVec3;
use thiserror::Error;

use crate::types::{ShapeKind, VertexId, VertexTag};

/// Errors surfaced by registry and entity operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// A vertex id that is not (or no longer) in the store
    #[error("unknown vertex {0}")]
    UnknownVertex(VertexId),

    /// A tagged vertex whose tag resolves to no live entity
    #[error("vertex {id} is tagged {tag} but no live {tag} shape owns it")]
    UnknownShapeForVertex { id: VertexId, tag: VertexTag },

    /// Anchors coincide (or are otherwise unusable for direction math)
    #[error("degenerate {kind} geometry: anchors coincide at {position}")]
    DegenerateGeometry { kind: ShapeKind, position: DVec3 },

    /// A position containing NaN or infinity was handed to the engine
    #[error("non-finite position {0}")]
    NonFinitePosition(DVec3),

    /// AddVertex on a shape kind with a fixed anchor count
    #[error("{0} shapes do not grow")]
    GrowthNotSupported(ShapeKind),

    /// AddVertex after the entity was finalized
    #[error("shape is finalized and no longer accepts vertices")]
    Finalized,

    /// EndLine without a growable entity of at least two anchors
    #[error("nothing to finalize: need an in-progress line or polygon with 2+ points")]
    FinalizeRefused,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_name_the_vertex_and_tag() {
        let err = EngineError::UnknownShapeForVertex {
            id: VertexId(7),
            tag: VertexTag::Assigned(ShapeKind::Circle),
        };
        assert_eq!(
            err.to_string(),
            "vertex v7 is tagged circle but no live circle shape owns it"
        );
    }

    #[test]
    fn growth_error_names_the_kind() {
        assert_eq!(
            EngineError::GrowthNotSupported(ShapeKind::Square).to_string(),
            "square shapes do not grow"
        );
    }
}
