//! Square measurements driven by a center handle and one edge-midpoint
//! handle.
//!
//! The four corners are derived, never stored as vertices: the side handle
//! fixes both the half extent and the orientation of the square in the
//! surface plane. Handle size tracks the square so small squares keep
//! grabbable but not overwhelming handles.

use glam::DVec3;

use crate::camera::Camera;
use crate::config::{EngineConfig, HANDLE_SCALE_FACTOR};
use crate::errors::EngineError;
use crate::geometry;
use crate::label::{Annotation, LabelSet};
use crate::mesh::{EdgeLine, Mesh};
use crate::shapes::{area_annotation, edge_annotation, ShapeBehavior};
use crate::store::VertexStore;
use crate::types::{Meters, ShapeKind, VertexId};

#[derive(Debug)]
pub struct SquareShape {
    /// Center handle, then side handle.
    anchors: [VertexId; 2],
    plane_y: f64,
    corners: [DVec3; 4],
    mesh: Mesh,
    outlines: Vec<EdgeLine>,
    labels: LabelSet,
    config: EngineConfig,
}

impl SquareShape {
    /// Build a square over a placed center and side handle and claim them.
    pub fn create(
        store: &mut VertexStore,
        anchors: [VertexId; 2],
        config: EngineConfig,
    ) -> Result<SquareShape, EngineError> {
        let plane_y = store.position(anchors[0])?.y;
        let mut shape = SquareShape {
            anchors,
            plane_y,
            corners: [DVec3::ZERO; 4],
            mesh: Mesh::empty(),
            outlines: Vec::new(),
            labels: LabelSet::new(),
            config,
        };
        shape.rebuild(store)?;
        for &id in &shape.anchors {
            store.set_tag(id, ShapeKind::Square.into())?;
        }
        Ok(shape)
    }

    fn center(&self) -> VertexId {
        self.anchors[0]
    }

    fn side(&self) -> VertexId {
        self.anchors[1]
    }

    /// Derived corners, ordered around the boundary.
    pub fn corners(&self) -> &[DVec3; 4] {
        &self.corners
    }
}

impl ShapeBehavior for SquareShape {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Square
    }

    fn anchors(&self) -> &[VertexId] {
        &self.anchors
    }

    fn rebuild(&mut self, store: &mut VertexStore) -> Result<(), EngineError> {
        let lift = self.plane_y + self.config.surface_epsilon;
        for &id in &self.anchors {
            let p = store.position(id)?;
            store.set_position(id, DVec3::new(p.x, lift, p.z))?;
        }

        let center = store.position(self.center())?;
        let side = store.position(self.side())?;
        self.corners = geometry::derive_square_corners(center, side);

        let mut ring = self.corners.to_vec();
        ring.push(self.corners[0]);
        self.outlines = vec![EdgeLine::new(ring, self.config.outline_width)];
        self.mesh = Mesh::double_sided_fan(&self.corners);

        let half = center.distance(side);
        for &id in &self.anchors {
            store.set_scale(id, HANDLE_SCALE_FACTOR * half)?;
        }
        Ok(())
    }

    fn move_vertex(
        &mut self,
        store: &mut VertexStore,
        id: VertexId,
        target: DVec3,
        _camera: &Camera,
    ) -> Result<(), EngineError> {
        if id == self.center() {
            let delta = target - store.position(self.center())?;
            store.translate(&self.anchors, delta)?;
        } else if id == self.side() {
            store.set_position(id, target)?;
        } else {
            return Err(EngineError::UnknownVertex(id));
        }
        self.rebuild(store)
    }

    fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    fn outlines(&self) -> &[EdgeLine] {
        &self.outlines
    }

    fn annotations(&self, _store: &VertexStore) -> Result<Vec<Annotation>, EngineError> {
        let side = Meters(self.corners[0].distance(self.corners[1]));
        Ok(vec![
            edge_annotation(self.corners[0], self.corners[1]),
            area_annotation(side * side, geometry::centroid(&self.corners)),
        ])
    }

    fn labels_mut(&mut self) -> &mut LabelSet {
        &mut self.labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::testing::RecordingLabels;
    use crate::shapes::VertexRemoval;

    fn camera() -> Camera {
        Camera::looking_at(
            DVec3::new(0.0, 5.0, 5.0),
            DVec3::ZERO,
            std::f64::consts::FRAC_PI_3,
            16.0 / 9.0,
        )
    }

    fn square(store: &mut VertexStore) -> SquareShape {
        let center = store.spawn(DVec3::ZERO, 0.1);
        let side = store.spawn(DVec3::new(1.0, 0.0, 0.0), 0.1);
        SquareShape::create(store, [center, side], EngineConfig::default()).unwrap()
    }

    #[test]
    fn corners_form_a_square_around_the_center() {
        let mut store = VertexStore::new();
        let shape = square(&mut store);

        let corners = shape.corners();
        for i in 0..4 {
            let edge = corners[i].distance(corners[(i + 1) % 4]);
            assert!((edge - 2.0).abs() < 1e-9);
        }
        let lift = EngineConfig::default().surface_epsilon;
        assert!((geometry::centroid(corners) - DVec3::new(0.0, lift, 0.0)).length() < 1e-9);
    }

    #[test]
    fn draws_a_closed_ring_and_four_triangles() {
        let mut store = VertexStore::new();
        let shape = square(&mut store);

        let ring = &shape.outlines()[0];
        assert_eq!(ring.points.len(), 5);
        assert_eq!(ring.points[0], ring.points[4]);
        assert_eq!(shape.mesh().indices, vec![0, 1, 2, 0, 2, 3, 2, 1, 0, 3, 2, 0]);
    }

    #[test]
    fn measures_one_side_and_the_squared_area() {
        let mut store = VertexStore::new();
        let mut shape = square(&mut store);

        let mut renderer = RecordingLabels::new();
        shape.sync_labels(&store, &mut renderer, 1).unwrap();
        assert_eq!(renderer.texts(), vec!["200.0 cm", "4.0 m²"]);
    }

    #[test]
    fn handles_scale_with_the_half_extent() {
        let mut store = VertexStore::new();
        let shape = square(&mut store);

        for &id in shape.anchors() {
            assert_eq!(store.get(id).unwrap().scale, HANDLE_SCALE_FACTOR);
        }
    }

    #[test]
    fn side_drag_onto_the_center_collapses_to_a_dot() {
        let mut store = VertexStore::new();
        let mut shape = square(&mut store);
        let [center, side] = shape.anchors;

        let on_center = store.position(center).unwrap();
        shape
            .move_vertex(&mut store, side, on_center, &camera())
            .unwrap();

        assert!(shape.corners().iter().all(|&c| c == on_center));
        let mut renderer = RecordingLabels::new();
        shape.sync_labels(&store, &mut renderer, 1).unwrap();
        assert_eq!(renderer.texts(), vec!["0.0 cm", "0.0 m²"]);
    }

    #[test]
    fn center_drag_slides_the_whole_square() {
        let mut store = VertexStore::new();
        let mut shape = square(&mut store);
        let center = shape.anchors[0];

        shape
            .move_vertex(&mut store, center, DVec3::new(10.0, 0.0, -3.0), &camera())
            .unwrap();

        let centroid = geometry::centroid(shape.corners());
        assert!((centroid.x - 10.0).abs() < 1e-9);
        assert!((centroid.z + 3.0).abs() < 1e-9);

        let mut renderer = RecordingLabels::new();
        shape.sync_labels(&store, &mut renderer, 1).unwrap();
        assert_eq!(renderer.texts(), vec!["200.0 cm", "4.0 m²"]);
    }

    #[test]
    fn any_deletion_tears_the_square_down() {
        let mut store = VertexStore::new();
        let mut shape = square(&mut store);
        let center = shape.anchors[0];

        assert_eq!(
            shape.delete_vertex(&mut store, center).unwrap(),
            VertexRemoval::TornDown
        );
    }
}
