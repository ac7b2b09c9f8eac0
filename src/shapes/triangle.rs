//! Three-point surface measurements.

use glam::DVec3;

use crate::camera::Camera;
use crate::config::EngineConfig;
use crate::errors::EngineError;
use crate::geometry;
use crate::label::{Annotation, LabelSet};
use crate::mesh::{EdgeLine, Mesh};
use crate::shapes::{area_annotation, edge_annotation, ShapeBehavior};
use crate::store::VertexStore;
use crate::types::{ShapeKind, VertexId};

#[derive(Debug)]
pub struct TriangleShape {
    anchors: [VertexId; 3],
    mesh: Mesh,
    outlines: Vec<EdgeLine>,
    labels: LabelSet,
    config: EngineConfig,
}

impl TriangleShape {
    /// Build a triangle over three already-placed anchors and claim them.
    pub fn create(
        store: &mut VertexStore,
        anchors: [VertexId; 3],
        config: EngineConfig,
    ) -> Result<TriangleShape, EngineError> {
        let mut shape = TriangleShape {
            anchors,
            mesh: Mesh::empty(),
            outlines: Vec::new(),
            labels: LabelSet::new(),
            config,
        };
        for &id in &shape.anchors {
            store.set_tag(id, ShapeKind::Triangle.into())?;
        }
        shape.rebuild(store)?;
        Ok(shape)
    }

    fn positions(&self, store: &VertexStore) -> Result<[DVec3; 3], EngineError> {
        Ok([
            store.position(self.anchors[0])?,
            store.position(self.anchors[1])?,
            store.position(self.anchors[2])?,
        ])
    }
}

impl ShapeBehavior for TriangleShape {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Triangle
    }

    fn anchors(&self) -> &[VertexId] {
        &self.anchors
    }

    fn rebuild(&mut self, store: &mut VertexStore) -> Result<(), EngineError> {
        let [p0, p1, p2] = self.positions(store)?;
        self.outlines = vec![EdgeLine::new(
            vec![p0, p1, p2, p0],
            self.config.outline_width,
        )];
        self.mesh = Mesh::double_sided_fan(&[p0, p1, p2]);
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

    fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    fn outlines(&self) -> &[EdgeLine] {
        &self.outlines
    }

    fn annotations(&self, store: &VertexStore) -> Result<Vec<Annotation>, EngineError> {
        let points = self.positions(store)?;
        let mut annotations: Vec<Annotation> = (0..3)
            .map(|i| edge_annotation(points[i], points[(i + 1) % 3]))
            .collect();
        annotations.push(area_annotation(
            geometry::triangle_area(points[0], points[1], points[2]),
            geometry::centroid(&points),
        ));
        Ok(annotations)
    }

    fn labels_mut(&mut self) -> &mut LabelSet {
        &mut self.labels
    }
}
