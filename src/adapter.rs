//! Center-of-view input adapter and the raycast collaborator interface.
//!
//! The embedding app raycasts through the reticle every frame and feeds the
//! result here; the adapter manages hover transitions, drives an active drag,
//! and translates UI trigger presses into registry calls. Button visibility
//! follows the returned [`SceneProbe`].

use glam::DVec3;

use crate::camera::Camera;
use crate::errors::EngineError;
use crate::registry::ShapeRegistry;
use crate::types::VertexId;

/// What the reticle ray hit this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RaycastTarget {
    /// The detected surface, at a world point
    Plane { point: DVec3 },
    /// A vertex handle
    Vertex { id: VertexId },
}

/// Raycast source collaborator. Implementations respect handle pickability:
/// a handle being moved is never reported.
pub trait SurfaceSampler {
    fn sample(&self, camera: &Camera) -> Option<RaycastTarget>;
}

/// Samples the camera center ray against a fixed-height horizontal plane.
///
/// Stands in for real AR plane detection in tests and demos; it never
/// reports vertex hits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizontalPlaneSampler {
    pub plane_y: f64,
}

impl HorizontalPlaneSampler {
    pub fn new(plane_y: f64) -> HorizontalPlaneSampler {
        HorizontalPlaneSampler { plane_y }
    }
}

impl SurfaceSampler for HorizontalPlaneSampler {
    fn sample(&self, camera: &Camera) -> Option<RaycastTarget> {
        camera
            .center_ray()
            .hit_horizontal_plane(self.plane_y)
            .map(|point| RaycastTarget::Plane { point })
    }
}

/// The per-frame probe result the UI keys its buttons off
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneProbe {
    PlaneHit { point: DVec3 },
    VertexHit { id: VertexId },
    Nothing,
}

/// Reticle interaction state between frames.
///
/// `probe` runs once per frame with the sampler result; the `*_pressed` /
/// `*_released` methods are called from UI events. Methods that need a
/// hovered vertex or a plane point under the reticle return `Ok(false)` /
/// `Ok(None)` when there is none: the corresponding button should not have
/// been visible, so the press is a no-op, not a fault.
#[derive(Debug, Default)]
pub struct InputAdapter {
    hovered: Option<VertexId>,
    grabbed: Option<VertexId>,
    plane_point: Option<DVec3>,
}

impl InputAdapter {
    pub fn new() -> InputAdapter {
        InputAdapter::default()
    }

    pub fn hovered(&self) -> Option<VertexId> {
        self.hovered
    }

    /// Whether a grabbed vertex is currently following the reticle
    pub fn is_moving(&self) -> bool {
        self.grabbed.is_some()
    }

    /// Feed this frame's raycast result.
    ///
    /// A plane hit drives the active drag (or drops a stale hover); a vertex
    /// hit moves the hover there unless a drag is live; a miss clears the
    /// hover. The grab itself survives misses: the drag resumes on the next
    /// plane hit.
    pub fn probe(
        &mut self,
        registry: &mut ShapeRegistry,
        target: Option<RaycastTarget>,
        camera: &Camera,
    ) -> Result<SceneProbe, EngineError> {
        match target {
            Some(RaycastTarget::Plane { point }) => {
                self.plane_point = Some(point);
                if let Some(id) = self.grabbed {
                    registry.move_vertex(id, point, camera)?;
                } else {
                    self.drop_hover(registry)?;
                }
                Ok(SceneProbe::PlaneHit { point })
            }
            Some(RaycastTarget::Vertex { id }) => {
                self.plane_point = None;
                if self.grabbed.is_none() && self.hovered != Some(id) {
                    self.drop_hover(registry)?;
                    registry.hover(id, true)?;
                    self.hovered = Some(id);
                }
                Ok(SceneProbe::VertexHit { id })
            }
            None => {
                self.plane_point = None;
                self.drop_hover(registry)?;
                Ok(SceneProbe::Nothing)
            }
        }
    }

    /// Place a point at the plane position under the reticle
    pub fn place_pressed(
        &mut self,
        registry: &mut ShapeRegistry,
    ) -> Result<Option<VertexId>, EngineError> {
        match self.plane_point {
            Some(point) => registry.place_vertex(point).map(Some),
            None => Ok(None),
        }
    }

    /// Grab the hovered vertex; it follows plane hits until released
    pub fn move_pressed(&mut self, registry: &mut ShapeRegistry) -> Result<bool, EngineError> {
        if self.grabbed.is_some() {
            return Ok(false);
        }
        match self.hovered.take() {
            Some(id) if registry.store().contains(id) => {
                registry.start_move(id)?;
                self.grabbed = Some(id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Release the grabbed vertex
    pub fn move_released(&mut self, registry: &mut ShapeRegistry) -> Result<bool, EngineError> {
        match self.grabbed.take() {
            Some(id) if registry.store().contains(id) => {
                registry.stop_move(id)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Delete the hovered vertex
    pub fn delete_pressed(&mut self, registry: &mut ShapeRegistry) -> Result<bool, EngineError> {
        match self.hovered.take() {
            Some(id) if registry.store().contains(id) => {
                registry.delete_vertex(id)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Finish the growing line or polygon
    pub fn finish_pressed(&mut self, registry: &mut ShapeRegistry) -> Result<(), EngineError> {
        registry.end_line()
    }

    /// Un-hover the previously hovered vertex, tolerating one that was
    /// despawned since last frame.
    fn drop_hover(&mut self, registry: &mut ShapeRegistry) -> Result<(), EngineError> {
        if let Some(id) = self.hovered.take() {
            if registry.store().contains(id) {
                registry.hover(id, false)?;
            }
        }
        Ok(())
    }
}
