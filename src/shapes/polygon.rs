//! Closed-boundary surface measurements.
//!
//! Grows as an open chain, then closes back to its first anchor when the
//! user ends the shape. The closing segment is a reference to vertex 0, not
//! an extra owned anchor, so the outline of a closed N-gon has N + 1 points
//! while the shape still owns N.

use glam::DVec3;

use crate::camera::Camera;
use crate::config::EngineConfig;
use crate::errors::EngineError;
use crate::geometry;
use crate::label::{Annotation, LabelSet};
use crate::log::debug;
use crate::mesh::{EdgeLine, Mesh};
use crate::shapes::{area_annotation, edge_annotation, ShapeBehavior, VertexRemoval};
use crate::store::VertexStore;
use crate::types::{ShapeKind, VertexId};

#[derive(Debug)]
pub struct PolygonShape {
    anchors: Vec<VertexId>,
    closed: bool,
    mesh: Mesh,
    outlines: Vec<EdgeLine>,
    labels: LabelSet,
    config: EngineConfig,
}

impl PolygonShape {
    /// Build a polygon over already-placed anchors and claim them.
    pub fn create(
        store: &mut VertexStore,
        anchors: Vec<VertexId>,
        config: EngineConfig,
    ) -> Result<PolygonShape, EngineError> {
        let mut shape = PolygonShape {
            anchors,
            closed: false,
            mesh: Mesh::empty(),
            outlines: Vec::new(),
            labels: LabelSet::new(),
            config,
        };
        for &id in &shape.anchors {
            store.set_tag(id, ShapeKind::Polygon.into())?;
        }
        shape.rebuild(store)?;
        Ok(shape)
    }

    fn positions(&self, store: &VertexStore) -> Result<Vec<DVec3>, EngineError> {
        self.anchors
            .iter()
            .map(|&id| store.position(id))
            .collect()
    }

    fn draws_closed(&self) -> bool {
        self.closed && self.anchors.len() >= 3
    }
}

impl ShapeBehavior for PolygonShape {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Polygon
    }

    fn anchors(&self) -> &[VertexId] {
        &self.anchors
    }

    fn rebuild(&mut self, store: &mut VertexStore) -> Result<(), EngineError> {
        let points = self.positions(store)?;

        let mut ring = points.clone();
        if self.draws_closed() {
            ring.push(points[0]);
        }
        self.outlines = vec![EdgeLine::new(ring, self.config.outline_width)];

        self.mesh = if points.len() >= 3 {
            Mesh::double_sided_fan(&points)
        } else {
            Mesh::empty()
        };
        Ok(())
    }

    fn move_vertex(
        &mut self,
        store: &mut VertexStore,
        id: VertexId,
        target: DVec3,
        _camera: &Camera,
    ) -> Result<(), EngineError> {
        if !self.owns(id) {
            return Err(EngineError::UnknownVertex(id));
        }
        store.set_position(id, target)?;
        self.rebuild(store)
    }

    fn add_vertex(&mut self, store: &mut VertexStore, id: VertexId) -> Result<(), EngineError> {
        if self.closed {
            return Err(EngineError::Finalized);
        }
        store.set_tag(id, ShapeKind::Polygon.into())?;
        self.anchors.push(id);
        self.rebuild(store)
    }

    fn delete_vertex(
        &mut self,
        store: &mut VertexStore,
        id: VertexId,
    ) -> Result<VertexRemoval, EngineError> {
        if !self.owns(id) {
            return Err(EngineError::UnknownVertex(id));
        }
        self.anchors.retain(|&a| a != id);
        store.remove(id);
        if self.anchors.len() < 3 {
            debug!("polygon below three points, tearing down");
            return Ok(VertexRemoval::TornDown);
        }
        self.rebuild(store)?;
        Ok(VertexRemoval::Kept)
    }

    fn finalize(&mut self, store: &mut VertexStore) -> Result<(), EngineError> {
        self.closed = true;
        self.rebuild(store)
    }

    fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    fn outlines(&self) -> &[EdgeLine] {
        &self.outlines
    }

    fn annotations(&self, store: &VertexStore) -> Result<Vec<Annotation>, EngineError> {
        let points = self.positions(store)?;
        let mut annotations: Vec<Annotation> = points
            .windows(2)
            .map(|pair| edge_annotation(pair[0], pair[1]))
            .collect();
        if self.draws_closed() {
            annotations.push(edge_annotation(points[points.len() - 1], points[0]));
        }
        if points.len() >= 3 {
            annotations.push(area_annotation(
                geometry::polygon_fan_area(&points),
                geometry::centroid(&points),
            ));
        }
        Ok(annotations)
    }

    fn labels_mut(&mut self) -> &mut LabelSet {
        &mut self.labels
    }
}
