//! Box measurements: a center, two base half-extent handles and a height
//! handle.
//!
//! The base stays rectangular by construction: whenever the width or length
//! handle moves, the other one is re-derived a quarter turn away at its own
//! preserved extent, and the height handle snaps back over the width handle.
//! The height handle itself moves in a view-locked vertical drag driven by
//! the camera, so walking the device up or down pulls the box with it.

use glam::DVec3;

use crate::camera::{Camera, VerticalDrag};
use crate::config::{
    EngineConfig, BOX_HANDLE_ADAPT_LIMIT, BOX_OUTLINE_ADAPT_LIMIT, HANDLE_SCALE_FACTOR,
};
use crate::errors::EngineError;
use crate::geometry::{self, BoxCorners, Turn};
use crate::label::{Annotation, LabelClass, LabelSet};
use crate::log::debug;
use crate::mesh::{EdgeLine, Mesh};
use crate::shapes::{edge_annotation, ShapeBehavior};
use crate::store::VertexStore;
use crate::types::{Meters, Quantity, ShapeKind, VertexId};

#[derive(Debug)]
pub struct BoxShape {
    /// Center, width, length, height handles.
    anchors: [VertexId; 4],
    corners: BoxCorners,
    height_drag: Option<VerticalDrag>,
    mesh: Mesh,
    outlines: Vec<EdgeLine>,
    labels: LabelSet,
    config: EngineConfig,
}

impl BoxShape {
    /// Build a box from a placed center and width handle.
    ///
    /// The length handle spawns a quarter turn from the width handle at the
    /// same extent (so the initial base is square) and the height handle
    /// spawns one width-extent above the width handle.
    pub fn create(
        store: &mut VertexStore,
        center: VertexId,
        width: VertexId,
        config: EngineConfig,
    ) -> Result<BoxShape, EngineError> {
        let center_pos = store.position(center)?;
        let width_pos = store.position(width)?;
        let half_width = center_pos.distance(width_pos);
        let length_pos =
            geometry::replace_perpendicular_anchor(center_pos, width_pos, half_width, Turn::Forward)?;

        let length = store.spawn(length_pos, config.handle_scale);
        let height = store.spawn(
            width_pos + DVec3::new(0.0, half_width, 0.0),
            config.handle_scale,
        );

        let mut shape = BoxShape {
            anchors: [center, width, length, height],
            corners: BoxCorners {
                bottom: [DVec3::ZERO; 4],
                top: [DVec3::ZERO; 4],
            },
            height_drag: None,
            mesh: Mesh::empty(),
            outlines: Vec::new(),
            labels: LabelSet::new(),
            config,
        };
        shape.rebuild(store)?;
        for &id in &shape.anchors {
            store.set_tag(id, ShapeKind::Box.into())?;
        }
        Ok(shape)
    }

    fn center(&self) -> VertexId {
        self.anchors[0]
    }

    fn width(&self) -> VertexId {
        self.anchors[1]
    }

    fn length(&self) -> VertexId {
        self.anchors[2]
    }

    fn height(&self) -> VertexId {
        self.anchors[3]
    }

    /// Derived corners, bottom ring then top ring.
    pub fn corners(&self) -> &BoxCorners {
        &self.corners
    }

    /// Width or length drag: commit the new position, swing the other base
    /// handle a quarter turn to keep the base rectangular, and pull the
    /// height column back over the width handle.
    fn drag_base_handle(
        &mut self,
        store: &mut VertexStore,
        id: VertexId,
        target: DVec3,
    ) -> Result<(), EngineError> {
        let (partner, turn) = if id == self.width() {
            (self.length(), Turn::Forward)
        } else {
            (self.width(), Turn::Back)
        };
        let center_pos = store.position(self.center())?;
        let partner_extent = store.position(partner)?.distance(center_pos);
        let replaced =
            geometry::replace_perpendicular_anchor(center_pos, target, partner_extent, turn)?;

        store.set_position(id, target)?;
        store.set_position(partner, replaced)?;
        let width_pos = store.position(self.width())?;
        let height_pos = store.position(self.height())?;
        store.set_position(
            self.height(),
            DVec3::new(width_pos.x, height_pos.y, width_pos.z),
        )?;
        self.height_drag = None;
        self.rebuild(store)
    }

    /// Height drag. The first call of a drag only records the reference
    /// frame; every following call re-derives the handle's altitude from
    /// where it sits in the current view.
    fn drag_height_handle(
        &mut self,
        store: &mut VertexStore,
        camera: &Camera,
    ) -> Result<(), EngineError> {
        let current = store.position(self.height())?;
        match self.height_drag {
            None => {
                debug!("height drag started at {current}");
                self.height_drag = Some(VerticalDrag::begin(camera, current));
            }
            Some(drag) => {
                store.set_position(self.height(), drag.update(camera, current))?;
            }
        }
        self.rebuild(store)
    }
}

impl ShapeBehavior for BoxShape {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Box
    }

    fn anchors(&self) -> &[VertexId] {
        &self.anchors
    }

    fn rebuild(&mut self, store: &mut VertexStore) -> Result<(), EngineError> {
        let center = store.position(self.center())?;
        let width = store.position(self.width())?;
        let length = store.position(self.length())?;
        let height = store.position(self.height())?;
        self.corners = geometry::derive_box_corners(center, width, length, height)?;

        let min_extent = center.distance(width).min(center.distance(length));
        let handle_scale = if min_extent < BOX_HANDLE_ADAPT_LIMIT {
            HANDLE_SCALE_FACTOR * min_extent
        } else {
            self.config.handle_scale
        };
        for &id in &self.anchors {
            store.set_scale(id, handle_scale)?;
        }
        let line_width = if min_extent < BOX_OUTLINE_ADAPT_LIMIT {
            min_extent / 10.0
        } else {
            self.config.outline_width
        };

        let mut down = self.corners.bottom.to_vec();
        down.push(self.corners.bottom[0]);
        let mut up = self.corners.top.to_vec();
        up.push(self.corners.top[0]);
        self.outlines = vec![
            EdgeLine::new(down, line_width),
            EdgeLine::new(up, line_width),
        ];
        for (bottom, top) in self.corners.vertical_edges() {
            self.outlines.push(EdgeLine::new(vec![bottom, top], line_width));
        }

        self.mesh = Mesh::cuboid(&self.corners);
        Ok(())
    }

    fn move_vertex(
        &mut self,
        store: &mut VertexStore,
        id: VertexId,
        target: DVec3,
        camera: &Camera,
    ) -> Result<(), EngineError> {
        if id == self.center() {
            self.height_drag = None;
            let delta = target - store.position(self.center())?;
            store.translate(&self.anchors, delta)?;
            return self.rebuild(store);
        }
        if id == self.height() {
            return self.drag_height_handle(store, camera);
        }
        if id == self.width() || id == self.length() {
            return self.drag_base_handle(store, id, target);
        }
        Err(EngineError::UnknownVertex(id))
    }

    fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    fn outlines(&self) -> &[EdgeLine] {
        &self.outlines
    }

    fn annotations(&self, store: &VertexStore) -> Result<Vec<Annotation>, EngineError> {
        let center = store.position(self.center())?;
        let height_pos = store.position(self.height())?;
        let bottom = &self.corners.bottom;
        let top = &self.corners.top;

        let width = Meters(bottom[0].distance(bottom[1]));
        let length = Meters(bottom[1].distance(bottom[2]));
        let height = Meters(height_pos.y - center.y);

        Ok(vec![
            edge_annotation(bottom[0], bottom[1]),
            edge_annotation(bottom[1], bottom[2]),
            Annotation {
                value: Quantity::Distance(height),
                anchor: (bottom[0] + top[0]) / 2.0,
                yaw: 0.0,
                class: LabelClass::Measure,
            },
            Annotation {
                value: Quantity::Volume(geometry::box_volume(width, length, height)),
                anchor: DVec3::new(center.x, height_pos.y, center.z),
                yaw: 0.0,
                class: LabelClass::Summary,
            },
        ])
    }

    fn labels_mut(&mut self) -> &mut LabelSet {
        &mut self.labels
    }

    fn reset_drag(&mut self) {
        self.height_drag = None;
    }
}
