//! Shape entities.
//!
//! Every measurable shape is a [`ShapeEntity`] variant implementing
//! [`ShapeBehavior`]: it owns its anchor vertices, derives the rest of its
//! geometry from them, and recomputes meshes, outlines and annotations after
//! every mutation. Dispatch across kinds is a tagged union via
//! `enum_dispatch`, so the registry never downcasts.

pub mod circle;
pub mod cuboid;
pub mod line;
pub mod polygon;
pub mod square;
pub mod triangle;

pub use circle::CircleShape;
pub use cuboid::BoxShape;
pub use line::LineShape;
pub use polygon::PolygonShape;
pub use square::SquareShape;
pub use triangle::TriangleShape;

use enum_dispatch::enum_dispatch;
use glam::DVec3;

use crate::camera::Camera;
use crate::errors::EngineError;
use crate::geometry;
use crate::label::{Annotation, LabelClass, LabelRenderer, LabelSet};
use crate::mesh::{EdgeLine, Mesh};
use crate::store::VertexStore;
use crate::types::{Meters, Quantity, ShapeKind, VertexId};

/// Outcome of deleting a vertex from an entity.
///
/// Fixed-arity shapes cannot lose an anchor and survive; growable shapes
/// survive as long as enough anchors remain to draw something.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexRemoval {
    /// The entity absorbed the removal and rebuilt itself.
    Kept,
    /// The entity released all remaining anchors and must be dropped.
    TornDown,
}

/// Uniform behavior contract for all shape kinds.
#[enum_dispatch]
pub trait ShapeBehavior {
    /// The kind tag this entity was built as.
    fn kind(&self) -> ShapeKind;

    /// Anchor vertices owned by this entity, in creation order.
    fn anchors(&self) -> &[VertexId];

    /// Whether `id` is one of this entity's anchors.
    fn owns(&self, id: VertexId) -> bool {
        self.anchors().contains(&id)
    }

    /// Recompute all derived geometry, outlines and annotations from the
    /// current anchor positions.
    fn rebuild(&mut self, store: &mut VertexStore) -> Result<(), EngineError>;

    /// Move one anchor to `target` and rebuild.
    ///
    /// If the move would degenerate the shape the anchor stays where it was
    /// and the previous geometry is kept.
    fn move_vertex(
        &mut self,
        store: &mut VertexStore,
        id: VertexId,
        target: DVec3,
        camera: &Camera,
    ) -> Result<(), EngineError>;

    /// Append a new anchor to a growable entity.
    fn add_vertex(&mut self, _store: &mut VertexStore, _id: VertexId) -> Result<(), EngineError> {
        Err(EngineError::GrowthNotSupported(self.kind()))
    }

    /// Remove one anchor, deciding whether the entity survives.
    ///
    /// The default covers fixed-arity shapes: losing any anchor tears the
    /// whole entity down.
    fn delete_vertex(
        &mut self,
        _store: &mut VertexStore,
        id: VertexId,
    ) -> Result<VertexRemoval, EngineError> {
        if !self.owns(id) {
            return Err(EngineError::UnknownVertex(id));
        }
        Ok(VertexRemoval::TornDown)
    }

    /// Stop accepting new anchors. Growable kinds override this; for fixed
    /// kinds it is a no-op since they are complete from creation.
    fn finalize(&mut self, _store: &mut VertexStore) -> Result<(), EngineError> {
        Ok(())
    }

    /// Release every anchor and destroy any labels still alive.
    fn teardown(&mut self, store: &mut VertexStore, renderer: &mut dyn LabelRenderer) {
        self.labels_mut().clear(renderer);
        for id in self.anchors().to_vec() {
            store.remove(id);
        }
    }

    /// Current surface mesh. Empty for shapes without one.
    fn mesh(&self) -> &Mesh;

    /// Current edge polylines.
    fn outlines(&self) -> &[EdgeLine];

    /// Measurement annotations derived from the current anchor positions.
    fn annotations(&self, store: &VertexStore) -> Result<Vec<Annotation>, EngineError>;

    fn labels_mut(&mut self) -> &mut LabelSet;

    /// Push the current annotations out to `renderer`.
    fn sync_labels(
        &mut self,
        store: &VertexStore,
        renderer: &mut dyn LabelRenderer,
        precision: usize,
    ) -> Result<(), EngineError> {
        let annotations = self.annotations(store)?;
        self.labels_mut().sync(&annotations, renderer, precision);
        Ok(())
    }

    /// Forget any in-progress drag state. Called when a grab starts or ends.
    fn reset_drag(&mut self) {}
}

/// All shape kinds behind one dispatchable type.
#[enum_dispatch(ShapeBehavior)]
#[derive(Debug)]
pub enum ShapeEntity {
    Line(LineShape),
    Circle(CircleShape),
    Triangle(TriangleShape),
    Square(SquareShape),
    Polygon(PolygonShape),
    Box(BoxShape),
}

/// Length annotation for the edge `a -> b`, anchored at its midpoint and
/// rotated to read along the edge.
pub(crate) fn edge_annotation(a: DVec3, b: DVec3) -> Annotation {
    Annotation {
        value: Quantity::Distance(Meters(a.distance(b))),
        anchor: (a + b) / 2.0,
        yaw: geometry::label_yaw(b - a),
        class: LabelClass::Measure,
    }
}

/// Area annotation anchored at `anchor`, facing the default direction.
pub(crate) fn area_annotation(area: crate::types::SquareMeters, anchor: DVec3) -> Annotation {
    Annotation {
        value: Quantity::Area(area),
        anchor,
        yaw: 0.0,
        class: LabelClass::Summary,
    }
}
