//! Open polyline measurements.
//!
//! The simplest growable shape: an ordered chain of anchors with one
//! length label per segment and no surface mesh.

use glam::DVec3;

use crate::camera::Camera;
use crate::config::EngineConfig;
use crate::errors::EngineError;
use crate::label::{Annotation, LabelSet};
use crate::log::debug;
use crate::mesh::{EdgeLine, Mesh};
use crate::shapes::{edge_annotation, ShapeBehavior, VertexRemoval};
use crate::store::VertexStore;
use crate::types::{ShapeKind, VertexId};

#[derive(Debug)]
pub struct LineShape {
    anchors: Vec<VertexId>,
    finalized: bool,
    mesh: Mesh,
    outlines: Vec<EdgeLine>,
    labels: LabelSet,
    config: EngineConfig,
}

impl LineShape {
    /// Build a line over already-placed anchors and claim them.
    pub fn create(
        store: &mut VertexStore,
        anchors: Vec<VertexId>,
        config: EngineConfig,
    ) -> Result<LineShape, EngineError> {
        let mut shape = LineShape {
            anchors,
            finalized: false,
            mesh: Mesh::empty(),
            outlines: Vec::new(),
            labels: LabelSet::new(),
            config,
        };
        for &id in &shape.anchors {
            store.set_tag(id, ShapeKind::Line.into())?;
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
}

impl ShapeBehavior for LineShape {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Line
    }

    fn anchors(&self) -> &[VertexId] {
        &self.anchors
    }

    fn rebuild(&mut self, store: &mut VertexStore) -> Result<(), EngineError> {
        let points = self.positions(store)?;
        self.outlines = vec![EdgeLine::new(points, self.config.outline_width)];
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
        if self.finalized {
            return Err(EngineError::Finalized);
        }
        store.set_tag(id, ShapeKind::Line.into())?;
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
        if self.anchors.len() < 2 {
            debug!("line below two points, tearing down");
            return Ok(VertexRemoval::TornDown);
        }
        self.rebuild(store)?;
        Ok(VertexRemoval::Kept)
    }

    fn finalize(&mut self, _store: &mut VertexStore) -> Result<(), EngineError> {
        self.finalized = true;
        Ok(())
    }

    fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    fn outlines(&self) -> &[EdgeLine] {
        &self.outlines
    }

    fn annotations(&self, store: &VertexStore) -> Result<Vec<Annotation>, EngineError> {
        let points = self.positions(store)?;
        Ok(points
            .windows(2)
            .map(|pair| edge_annotation(pair[0], pair[1]))
            .collect())
    }

    fn labels_mut(&mut self) -> &mut LabelSet {
        &mut self.labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::testing::RecordingLabels;

    fn camera() -> Camera {
        Camera::looking_at(
            DVec3::new(0.0, 5.0, 5.0),
            DVec3::ZERO,
            std::f64::consts::FRAC_PI_3,
            16.0 / 9.0,
        )
    }

    fn chain(store: &mut VertexStore, points: &[(f64, f64)]) -> Vec<VertexId> {
        points
            .iter()
            .map(|&(x, z)| store.spawn(DVec3::new(x, 0.0, z), 0.1))
            .collect()
    }

    #[test]
    fn draws_one_open_polyline() {
        let mut store = VertexStore::new();
        let ids = chain(&mut store, &[(0.0, 0.0), (1.0, 0.0), (1.0, 2.0)]);
        let line = LineShape::create(&mut store, ids, EngineConfig::default()).unwrap();

        assert_eq!(line.outlines().len(), 1);
        assert_eq!(line.outlines()[0].segment_count(), 2);
        assert!(line.mesh().is_empty());
    }

    #[test]
    fn labels_each_segment_in_centimeters() {
        let mut store = VertexStore::new();
        let ids = chain(&mut store, &[(0.0, 0.0), (1.0, 0.0), (1.0, 3.0)]);
        let mut line = LineShape::create(&mut store, ids, EngineConfig::default()).unwrap();

        let mut renderer = RecordingLabels::new();
        line.sync_labels(&store, &mut renderer, 1).unwrap();
        assert_eq!(renderer.texts(), vec!["100.0 cm", "300.0 cm"]);
    }

    #[test]
    fn grows_until_finalized() {
        let mut store = VertexStore::new();
        let ids = chain(&mut store, &[(0.0, 0.0), (1.0, 0.0)]);
        let mut line = LineShape::create(&mut store, ids, EngineConfig::default()).unwrap();

        let extra = store.spawn(DVec3::new(2.0, 0.0, 0.0), 0.1);
        line.add_vertex(&mut store, extra).unwrap();
        assert_eq!(line.anchors().len(), 3);
        assert_eq!(line.outlines()[0].segment_count(), 2);

        line.finalize(&mut store).unwrap();
        let refused = store.spawn(DVec3::new(3.0, 0.0, 0.0), 0.1);
        assert_eq!(
            line.add_vertex(&mut store, refused),
            Err(EngineError::Finalized)
        );
    }

    #[test]
    fn moving_a_vertex_updates_lengths() {
        let mut store = VertexStore::new();
        let ids = chain(&mut store, &[(0.0, 0.0), (1.0, 0.0)]);
        let mut line = LineShape::create(&mut store, ids.clone(), EngineConfig::default()).unwrap();

        line.move_vertex(&mut store, ids[1], DVec3::new(2.0, 0.0, 0.0), &camera())
            .unwrap();

        let mut renderer = RecordingLabels::new();
        line.sync_labels(&store, &mut renderer, 1).unwrap();
        assert_eq!(renderer.texts(), vec!["200.0 cm"]);
    }

    #[test]
    fn survives_deletion_while_two_points_remain() {
        let mut store = VertexStore::new();
        let ids = chain(&mut store, &[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
        let mut line = LineShape::create(&mut store, ids.clone(), EngineConfig::default()).unwrap();

        assert_eq!(
            line.delete_vertex(&mut store, ids[1]).unwrap(),
            VertexRemoval::Kept
        );
        assert_eq!(line.anchors().len(), 2);
        assert!(!store.contains(ids[1]));

        assert_eq!(
            line.delete_vertex(&mut store, ids[0]).unwrap(),
            VertexRemoval::TornDown
        );
    }

    #[test]
    fn rejects_foreign_vertices() {
        let mut store = VertexStore::new();
        let ids = chain(&mut store, &[(0.0, 0.0), (1.0, 0.0)]);
        let mut line = LineShape::create(&mut store, ids, EngineConfig::default()).unwrap();

        let stranger = store.spawn(DVec3::ZERO, 0.1);
        assert_eq!(
            line.move_vertex(&mut store, stranger, DVec3::ONE, &camera()),
            Err(EngineError::UnknownVertex(stranger))
        );
    }
}
