//! Circle measurements: a center handle and a radius handle on the surface
//! plane.
//!
//! Both anchors are re-pinned slightly above the capture plane on every
//! rebuild so the handles stay pickable on top of the disc, and the whole
//! outline ring is resampled from the current radius.

use glam::DVec3;

use crate::camera::Camera;
use crate::config::EngineConfig;
use crate::errors::EngineError;
use crate::geometry;
use crate::label::{Annotation, LabelSet};
use crate::mesh::{EdgeLine, Mesh};
use crate::shapes::{area_annotation, edge_annotation, ShapeBehavior};
use crate::store::VertexStore;
use crate::types::{Meters, ShapeKind, VertexId};

#[derive(Debug)]
pub struct CircleShape {
    /// Center handle, then radius handle.
    anchors: [VertexId; 2],
    plane_y: f64,
    mesh: Mesh,
    outlines: Vec<EdgeLine>,
    labels: LabelSet,
    config: EngineConfig,
}

impl CircleShape {
    /// Build a circle over a placed center and radius handle and claim them.
    ///
    /// The center's altitude at creation time becomes the capture plane the
    /// circle stays glued to.
    pub fn create(
        store: &mut VertexStore,
        anchors: [VertexId; 2],
        config: EngineConfig,
    ) -> Result<CircleShape, EngineError> {
        let plane_y = store.position(anchors[0])?.y;
        let mut shape = CircleShape {
            anchors,
            plane_y,
            mesh: Mesh::empty(),
            outlines: Vec::new(),
            labels: LabelSet::new(),
            config,
        };
        for &id in &shape.anchors {
            store.set_tag(id, ShapeKind::Circle.into())?;
        }
        shape.rebuild(store)?;
        Ok(shape)
    }

    fn center(&self) -> VertexId {
        self.anchors[0]
    }

    fn radius_handle(&self) -> VertexId {
        self.anchors[1]
    }
}

impl ShapeBehavior for CircleShape {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Circle
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
        let rim = store.position(self.radius_handle())?;
        let radius = center.distance(rim);
        let width = self.config.outline_width;

        self.outlines = vec![
            EdgeLine::new(
                geometry::circle_ring(center, radius, self.config.circle_segments),
                width,
            ),
            EdgeLine::new(vec![center, rim], width),
        ];
        self.mesh = Mesh::fan(&geometry::circle_points(
            center,
            radius,
            self.config.circle_segments,
        ));
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
        } else if id == self.radius_handle() {
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

    fn annotations(&self, store: &VertexStore) -> Result<Vec<Annotation>, EngineError> {
        let center = store.position(self.center())?;
        let rim = store.position(self.radius_handle())?;
        let radius = Meters(center.distance(rim));
        Ok(vec![
            edge_annotation(center, rim),
            area_annotation(geometry::circle_area(radius), center),
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

    fn unit_circle(store: &mut VertexStore) -> CircleShape {
        let center = store.spawn(DVec3::ZERO, 0.1);
        let rim = store.spawn(DVec3::new(0.0, 0.0, 1.0), 0.1);
        CircleShape::create(store, [center, rim], EngineConfig::default()).unwrap()
    }

    #[test]
    fn ring_closes_and_spoke_reaches_the_rim() {
        let mut store = VertexStore::new();
        let circle = unit_circle(&mut store);

        let segments = EngineConfig::default().circle_segments;
        let ring = &circle.outlines()[0];
        assert_eq!(ring.points.len(), segments + 1);
        assert_eq!(ring.points[0], ring.points[segments]);

        let spoke = &circle.outlines()[1];
        assert_eq!(spoke.segment_count(), 1);
        assert_eq!(circle.mesh().triangle_count(), segments - 2);
    }

    #[test]
    fn handles_sit_just_above_the_capture_plane() {
        let mut store = VertexStore::new();
        let center = store.spawn(DVec3::new(0.0, 0.5, 0.0), 0.1);
        let rim = store.spawn(DVec3::new(1.0, 0.3, 0.0), 0.1);
        let circle = CircleShape::create(&mut store, [center, rim], EngineConfig::default())
            .unwrap();

        let lift = 0.5 + EngineConfig::default().surface_epsilon;
        assert_eq!(store.position(center).unwrap().y, lift);
        assert_eq!(store.position(rim).unwrap().y, lift);
        assert!(circle.mesh().positions.iter().all(|p| p.y == lift));
    }

    #[test]
    fn measures_radius_and_disc_area() {
        let mut store = VertexStore::new();
        let mut circle = unit_circle(&mut store);

        let mut renderer = RecordingLabels::new();
        circle.sync_labels(&store, &mut renderer, 1).unwrap();
        assert_eq!(renderer.texts(), vec!["100.0 cm", "3.1 m²"]);
    }

    #[test]
    fn center_drag_carries_the_rim_along() {
        let mut store = VertexStore::new();
        let mut circle = unit_circle(&mut store);
        let [center, rim] = circle.anchors;

        circle
            .move_vertex(&mut store, center, DVec3::new(5.0, 0.0, 5.0), &camera())
            .unwrap();

        let c = store.position(center).unwrap();
        let r = store.position(rim).unwrap();
        assert_eq!(c.distance(r), 1.0);
        assert_eq!(DVec3::new(c.x, 0.0, c.z), DVec3::new(5.0, 0.0, 5.0));
    }

    #[test]
    fn rim_drag_changes_only_the_radius() {
        let mut store = VertexStore::new();
        let mut circle = unit_circle(&mut store);
        let [center, rim] = circle.anchors;

        circle
            .move_vertex(&mut store, rim, DVec3::new(0.0, 0.0, 2.5), &camera())
            .unwrap();

        assert_eq!(store.position(center).unwrap().x, 0.0);
        let mut renderer = RecordingLabels::new();
        circle.sync_labels(&store, &mut renderer, 1).unwrap();
        assert!(renderer.texts().contains(&"250.0 cm".to_string()));
    }

    #[test]
    fn collapsed_radius_is_a_dot_not_an_error() {
        let mut store = VertexStore::new();
        let mut circle = unit_circle(&mut store);
        let [center, rim] = circle.anchors;

        circle
            .move_vertex(&mut store, rim, DVec3::ZERO, &camera())
            .unwrap();

        let c = store.position(center).unwrap();
        assert!(circle.outlines()[0].points.iter().all(|&p| p == c));
        let mut renderer = RecordingLabels::new();
        circle.sync_labels(&store, &mut renderer, 1).unwrap();
        assert_eq!(renderer.texts(), vec!["0.0 cm", "0.0 m²"]);
    }

    #[test]
    fn any_deletion_tears_the_circle_down() {
        let mut store = VertexStore::new();
        let mut circle = unit_circle(&mut store);
        let rim = circle.anchors[1];

        assert_eq!(
            circle.delete_vertex(&mut store, rim).unwrap(),
            VertexRemoval::TornDown
        );
    }
}
