//! End-to-end registry scenarios: the embedding app's view of the engine.
//!
//! Each test drives the public API the way a frame loop would (sample,
//! probe, mutate, tick) and observes results through a recording label
//! renderer, the vertex store, and the entity geometry accessors.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use approx::assert_relative_eq;
use glam::{DQuat, DVec3};

use planim::adapter::{HorizontalPlaneSampler, InputAdapter, RaycastTarget, SurfaceSampler};
use planim::camera::Camera;
use planim::config::EngineConfig;
use planim::label::{LabelClass, LabelHandle, LabelRenderer};
use planim::registry::ShapeRegistry;
use planim::shapes::ShapeBehavior;
use planim::types::ShapeKind;

/// Label recorder shared between the registry (boxed) and the test.
#[derive(Debug, Default, Clone)]
struct Recorder(Rc<RefCell<RecorderState>>);

#[derive(Debug, Default)]
struct RecorderState {
    next: u64,
    live: HashMap<LabelHandle, (LabelClass, String, DVec3, f64)>,
}

impl Recorder {
    fn new() -> Recorder {
        Recorder::default()
    }

    fn live_count(&self) -> usize {
        self.0.borrow().live.len()
    }

    fn count_of(&self, class: LabelClass) -> usize {
        self.0
            .borrow()
            .live
            .values()
            .filter(|(c, ..)| *c == class)
            .count()
    }

    fn texts(&self) -> Vec<String> {
        let mut texts: Vec<String> = self
            .0
            .borrow()
            .live
            .values()
            .map(|(_, text, _, _)| text.clone())
            .collect();
        texts.sort();
        texts
    }

    fn summary_anchor(&self) -> Option<DVec3> {
        self.0
            .borrow()
            .live
            .values()
            .find(|(class, ..)| *class == LabelClass::Summary)
            .map(|&(_, _, position, _)| position)
    }
}

impl LabelRenderer for Recorder {
    fn create(&mut self, class: LabelClass) -> LabelHandle {
        let mut state = self.0.borrow_mut();
        state.next += 1;
        let handle = LabelHandle(state.next);
        state
            .live
            .insert(handle, (class, String::new(), DVec3::ZERO, 0.0));
        handle
    }

    fn set_text(&mut self, handle: LabelHandle, text: &str) {
        if let Some(entry) = self.0.borrow_mut().live.get_mut(&handle) {
            entry.1 = text.to_string();
        }
    }

    fn set_transform(&mut self, handle: LabelHandle, position: DVec3, yaw: f64) {
        if let Some(entry) = self.0.borrow_mut().live.get_mut(&handle) {
            entry.2 = position;
            entry.3 = yaw;
        }
    }

    fn destroy(&mut self, handle: LabelHandle) {
        self.0.borrow_mut().live.remove(&handle);
    }
}

fn engine() -> (ShapeRegistry, Recorder) {
    let recorder = Recorder::new();
    let registry =
        ShapeRegistry::with_renderer(EngineConfig::default(), Box::new(recorder.clone()));
    (registry, recorder)
}

/// Device pose two meters up and two meters back, aimed at `(x, 0, z)`
fn aimed_at(x: f64, z: f64) -> Camera {
    Camera::looking_at(
        DVec3::new(x, 2.0, z + 2.0),
        DVec3::new(x, 0.0, z),
        60f64.to_radians(),
        16.0 / 9.0,
    )
}

/// Identity rotation looks along -Z; tan(fov/2) = 0.5 keeps drag math exact
fn level_camera(position: DVec3) -> Camera {
    Camera::new(position, DQuat::IDENTITY, 2.0 * 0.5f64.atan(), 1.0)
}

fn at(x: f64, z: f64) -> DVec3 {
    DVec3::new(x, 0.0, z)
}

#[test]
fn draw_a_polyline_through_the_reticle() {
    let (mut registry, labels) = engine();
    let mut adapter = InputAdapter::new();
    let sampler = HorizontalPlaneSampler::new(0.0);
    registry.change_wanted_shape(ShapeKind::Line);

    for (x, z) in [(0.0, 0.0), (2.0, 0.0), (2.0, 3.0)] {
        let camera = aimed_at(x, z);
        let target = sampler.sample(&camera);
        adapter.probe(&mut registry, target, &camera).unwrap();
        let id = adapter.place_pressed(&mut registry).unwrap().unwrap();
        let placed = registry.store().position(id).unwrap();
        assert_relative_eq!(placed.x, x, epsilon = 1e-9);
        assert_relative_eq!(placed.y, 0.0, epsilon = 1e-9);
        assert_relative_eq!(placed.z, z, epsilon = 1e-9);
    }

    assert!(registry.can_end_line());
    adapter.finish_pressed(&mut registry).unwrap();
    registry.tick().unwrap();

    let (_, line) = registry.shapes().next().unwrap();
    assert_eq!(line.anchors().len(), 3);
    assert_eq!(line.outlines()[0].points.len(), 3);
    assert_eq!(labels.texts(), vec!["200.0 cm", "300.0 cm"]);
}

#[test]
fn measure_a_box_by_raising_the_device() {
    let (mut registry, labels) = engine();
    registry.change_wanted_shape(ShapeKind::Box);
    registry.place_vertex(at(0.0, 0.0)).unwrap();
    registry.place_vertex(at(1.0, 0.0)).unwrap();

    let height = registry
        .store()
        .iter()
        .find(|(_, v)| v.position.y > 0.5)
        .map(|(id, _)| id)
        .unwrap();
    // Base handles keep the default scale while the base is roomy.
    assert_eq!(registry.store().get(height).unwrap().scale, 0.1);

    // The handle starts centered in the view; raising the camera by one
    // meter raises it by exactly one meter.
    registry.start_move(height).unwrap();
    let hold = level_camera(DVec3::new(1.0, 1.0, 10.0));
    registry.move_vertex(height, DVec3::ZERO, &hold).unwrap();
    let raised = level_camera(DVec3::new(1.0, 2.0, 10.0));
    registry.move_vertex(height, DVec3::ZERO, &raised).unwrap();
    registry.stop_move(height).unwrap();
    assert_eq!(registry.store().position(height).unwrap().y, 2.0);

    registry.tick().unwrap();
    // 2 x 2 base, 2 high: every edge reads 200 cm and the volume is 8.
    assert_eq!(
        labels.texts(),
        vec!["200.0 cm", "200.0 cm", "200.0 cm", "8.0 m³"]
    );
    assert_eq!(labels.summary_anchor(), Some(DVec3::new(0.0, 2.0, 0.0)));
}

#[test]
fn square_anchors_round_trip_through_the_corners() {
    let (mut registry, labels) = engine();
    registry.change_wanted_shape(ShapeKind::Square);
    let center = registry.place_vertex(at(1.0, 1.0)).unwrap();
    let side = registry.place_vertex(at(2.0, 1.0)).unwrap();
    registry.tick().unwrap();

    let (_, square) = registry.shapes().next().unwrap();
    let ring = &square.outlines()[0].points;
    assert_eq!(ring.len(), 5);

    // Corners are centered on the center anchor.
    let centroid = (ring[0] + ring[1] + ring[2] + ring[3]) / 4.0;
    let center_pos = registry.store().position(center).unwrap();
    assert_relative_eq!(centroid.x, center_pos.x, epsilon = 1e-9);
    assert_relative_eq!(centroid.z, center_pos.z, epsilon = 1e-9);

    // The side anchor sits on the midpoint of its edge.
    let side_pos = registry.store().position(side).unwrap();
    let midpoint = (ring[3] + ring[0]) / 2.0;
    assert_relative_eq!(midpoint.x, side_pos.x, epsilon = 1e-9);
    assert_relative_eq!(midpoint.z, side_pos.z, epsilon = 1e-9);

    assert_eq!(labels.texts(), vec!["200.0 cm", "4.0 m²"]);
}

#[test]
fn box_base_stays_rectangular_after_anchor_moves() {
    let (mut registry, _) = engine();
    registry.change_wanted_shape(ShapeKind::Box);
    let center = registry.place_vertex(at(0.0, 0.0)).unwrap();
    let width = registry.place_vertex(at(1.0, 0.0)).unwrap();

    let camera = aimed_at(0.0, 0.0);
    registry
        .move_vertex(width, at(0.0, -3.0), &camera)
        .unwrap();

    let center_pos = registry.store().position(center).unwrap();
    let width_pos = registry.store().position(width).unwrap();
    assert_relative_eq!(center_pos.distance(width_pos), 3.0, epsilon = 1e-9);

    let (_, cuboid) = registry.shapes().next().unwrap();
    let bottom = &cuboid.outlines()[0].points;
    let across = bottom[1] - bottom[0];
    let along = bottom[2] - bottom[1];
    assert_relative_eq!(across.dot(along), 0.0, epsilon = 1e-9);
    assert_relative_eq!(across.length(), 6.0, epsilon = 1e-9);
    assert_relative_eq!(along.length(), 2.0, epsilon = 1e-9);

    // The height handle follows the width handle's footprint.
    let height = registry
        .store()
        .iter()
        .find(|(_, v)| v.position.y > 0.5)
        .map(|(id, _)| id)
        .unwrap();
    let height_pos = registry.store().position(height).unwrap();
    assert_relative_eq!(height_pos.x, width_pos.x, epsilon = 1e-9);
    assert_relative_eq!(height_pos.z, width_pos.z, epsilon = 1e-9);
}

#[test]
fn switching_modes_keeps_finished_work() {
    let (mut registry, labels) = engine();

    registry.change_wanted_shape(ShapeKind::Circle);
    registry.place_vertex(at(0.0, 0.0)).unwrap();
    registry.place_vertex(at(1.0, 0.0)).unwrap();

    // A growing polyline dies with the mode switch.
    registry.change_wanted_shape(ShapeKind::Line);
    registry.place_vertex(at(10.0, 0.0)).unwrap();
    registry.place_vertex(at(11.0, 0.0)).unwrap();
    registry.change_wanted_shape(ShapeKind::Polygon);
    assert_eq!(registry.shape_count(), 1);

    registry.place_vertex(at(5.0, 0.0)).unwrap();
    registry.place_vertex(at(7.0, 0.0)).unwrap();
    registry.place_vertex(at(7.0, 2.0)).unwrap();
    registry.end_line().unwrap();

    registry.change_wanted_shape(ShapeKind::Box);
    registry.tick().unwrap();

    assert_eq!(registry.shape_count(), 2);
    assert_eq!(registry.store().len(), 5);
    assert_eq!(labels.count_of(LabelClass::Measure), 4);
    assert_eq!(labels.count_of(LabelClass::Summary), 2);
    assert_eq!(labels.live_count(), 6);
}

#[test]
fn a_polyline_shrinks_then_vanishes() {
    let (mut registry, labels) = engine();
    registry.change_wanted_shape(ShapeKind::Line);
    let a = registry.place_vertex(at(0.0, 0.0)).unwrap();
    let b = registry.place_vertex(at(1.0, 0.0)).unwrap();
    registry.place_vertex(at(3.0, 0.0)).unwrap();
    registry.end_line().unwrap();
    registry.tick().unwrap();
    assert_eq!(labels.live_count(), 2);

    registry.delete_vertex(b).unwrap();
    registry.tick().unwrap();
    assert_eq!(labels.texts(), vec!["300.0 cm"]);

    registry.delete_vertex(a).unwrap();
    registry.tick().unwrap();
    assert_eq!(registry.shape_count(), 0);
    assert_eq!(registry.store().len(), 0);
    assert_eq!(labels.live_count(), 0);
}

#[test]
fn finalized_polygon_closes_its_boundary() {
    let (mut registry, labels) = engine();
    registry.change_wanted_shape(ShapeKind::Polygon);
    for (x, z) in [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)] {
        registry.place_vertex(at(x, z)).unwrap();
    }
    registry.end_line().unwrap();
    registry.tick().unwrap();

    let (_, polygon) = registry.shapes().next().unwrap();
    assert_eq!(polygon.anchors().len(), 4);
    let ring = &polygon.outlines()[0].points;
    assert_eq!(ring.len(), 5);
    assert_eq!(ring[4], ring[0]);

    // Four sides of a unit square, each labeled, plus the area.
    assert_eq!(
        labels.texts(),
        vec!["1.0 m²", "100.0 cm", "100.0 cm", "100.0 cm", "100.0 cm"]
    );
}

#[test]
fn stretch_a_square_through_the_reticle() {
    let (mut registry, labels) = engine();
    let mut adapter = InputAdapter::new();
    registry.change_wanted_shape(ShapeKind::Square);
    registry.place_vertex(at(0.0, 0.0)).unwrap();
    let side = registry.place_vertex(at(1.0, 0.0)).unwrap();

    let camera = aimed_at(1.0, 0.0);
    adapter
        .probe(&mut registry, Some(RaycastTarget::Vertex { id: side }), &camera)
        .unwrap();
    assert!(adapter.move_pressed(&mut registry).unwrap());
    adapter
        .probe(
            &mut registry,
            Some(RaycastTarget::Plane { point: at(2.0, 0.0) }),
            &camera,
        )
        .unwrap();
    assert!(adapter.move_released(&mut registry).unwrap());
    registry.tick().unwrap();

    assert_eq!(labels.texts(), vec!["16.0 m²", "400.0 cm"]);
    // Square handles scale with the half extent.
    assert_eq!(registry.store().get(side).unwrap().scale, 0.7);
}
