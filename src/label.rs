//! Annotation labels and the label-renderer collaborator interface.
//!
//! The engine computes annotation values and transforms; an embedding
//! renderer displays them. Without a renderer the engine degrades silently:
//! geometry and measurements still compute, nothing is displayed.

use glam::DVec3;

use crate::types::Quantity;

/// Opaque handle to a displayed label, minted by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LabelHandle(pub u64);

/// The two label prefab classes the renderer distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelClass {
    /// Per-edge distance readout
    Measure,
    /// Shape-level readout (area, volume)
    Summary,
}

/// One annotation a shape wants displayed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Annotation {
    pub value: Quantity,
    /// World anchor, typically an edge midpoint or the shape center
    pub anchor: DVec3,
    /// Rotation about +Y aligning the text with its edge
    pub yaw: f64,
    pub class: LabelClass,
}

/// Display collaborator for annotation labels
pub trait LabelRenderer {
    fn create(&mut self, class: LabelClass) -> LabelHandle;
    fn set_text(&mut self, handle: LabelHandle, text: &str);
    fn set_transform(&mut self, handle: LabelHandle, position: DVec3, yaw: f64);
    fn destroy(&mut self, handle: LabelHandle);
}

/// A renderer that displays nothing but keeps handle bookkeeping valid
#[derive(Debug, Default)]
pub struct NullLabelRenderer {
    next: u64,
}

impl LabelRenderer for NullLabelRenderer {
    fn create(&mut self, _class: LabelClass) -> LabelHandle {
        self.next += 1;
        LabelHandle(self.next)
    }

    fn set_text(&mut self, _handle: LabelHandle, _text: &str) {}

    fn set_transform(&mut self, _handle: LabelHandle, _position: DVec3, _yaw: f64) {}

    fn destroy(&mut self, _handle: LabelHandle) {}
}

/// The label handles a single shape owns, kept in step with its annotation
/// list.
///
/// `sync` reconciles handle count and class against the annotations (slots
/// are positional: a class mismatch at a position recreates that handle),
/// then pushes text and transform for every pair.
#[derive(Debug, Default)]
pub struct LabelSet {
    slots: Vec<(LabelHandle, LabelClass)>,
}

impl LabelSet {
    pub fn new() -> LabelSet {
        LabelSet::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Bring the displayed labels in line with `annotations`
    pub fn sync(
        &mut self,
        annotations: &[Annotation],
        renderer: &mut dyn LabelRenderer,
        precision: usize,
    ) {
        while self.slots.len() > annotations.len() {
            if let Some((handle, _)) = self.slots.pop() {
                renderer.destroy(handle);
            }
        }
        for (i, annotation) in annotations.iter().enumerate() {
            match self.slots.get(i) {
                Some(&(handle, class)) if class != annotation.class => {
                    renderer.destroy(handle);
                    self.slots[i] = (renderer.create(annotation.class), annotation.class);
                }
                Some(_) => {}
                None => {
                    self.slots
                        .push((renderer.create(annotation.class), annotation.class));
                }
            }
            let (handle, _) = self.slots[i];
            renderer.set_text(handle, &annotation.value.label_text(precision));
            renderer.set_transform(handle, annotation.anchor, annotation.yaw);
        }
    }

    /// Destroy every owned handle (shape teardown)
    pub fn clear(&mut self, renderer: &mut dyn LabelRenderer) {
        for (handle, _) in self.slots.drain(..) {
            renderer.destroy(handle);
        }
    }
}
