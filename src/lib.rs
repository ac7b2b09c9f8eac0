//! Procedural shape geometry for an AR measuring and drawing tool.
//!
//! The user aims a device at a detected horizontal surface and places anchor
//! points; the engine derives complete shapes from minimal anchor sets (six
//! kinds: line, circle, triangle, square, polygon, box), maintains their
//! meshes, outline polylines and measurement labels, and supports
//! interactive vertex editing including a view-locked vertical drag for box
//! height.
//!
//! The crate is renderer-agnostic: it computes world-space geometry and
//! label transforms, and the embedding app draws them, feeding input back
//! through [`registry::ShapeRegistry`] (directly, or via
//! [`adapter::InputAdapter`] for the center-of-view interaction model).
//!
//! ```
//! use glam::DVec3;
//! use planim::config::EngineConfig;
//! use planim::registry::ShapeRegistry;
//! use planim::shapes::ShapeBehavior;
//! use planim::types::ShapeKind;
//!
//! # fn main() -> Result<(), planim::errors::EngineError> {
//! let mut registry = ShapeRegistry::new(EngineConfig::default());
//! registry.change_wanted_shape(ShapeKind::Circle);
//! registry.place_vertex(DVec3::ZERO)?;
//! registry.place_vertex(DVec3::new(1.0, 0.0, 0.0))?;
//!
//! let (_, circle) = registry.shapes().next().unwrap();
//! // Outline ring plus the radius spoke.
//! assert_eq!(circle.outlines().len(), 2);
//! assert_eq!(circle.mesh().triangle_count(), 358);
//! # Ok(()) }
//! ```

pub mod adapter;
pub mod camera;
pub mod config;
pub mod errors;
pub mod geometry;
pub mod label;
mod log;
pub mod mesh;
pub mod registry;
pub mod shapes;
pub mod store;
pub mod types;

pub use crate::camera::Camera;
pub use crate::config::EngineConfig;
pub use crate::errors::EngineError;
pub use crate::registry::{BuildSession, ShapeRegistry};
pub use crate::shapes::{ShapeBehavior, ShapeEntity};
pub use crate::types::{ShapeId, ShapeKind, VertexId};
